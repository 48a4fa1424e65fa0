pub mod formatter;

pub use formatter::{
    format_breakdown, format_json, format_points, format_report, should_use_colors, wrap_text,
    Report,
};
