pub mod recommend;
pub mod rules;
pub mod summary;

pub use recommend::{recommend, MAX_RECOMMENDATIONS, RECOMMENDATION_RULES};
pub use rules::{evaluate, NarrativeContext, Rule};
pub use summary::{summarize, MAX_SUMMARY_SENTENCES, SUMMARY_RULES};
