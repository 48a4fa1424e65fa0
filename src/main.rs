use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use hearing_fit::app::{self, OutputFormat, RunError, EXIT_FAILURE, EXIT_INPUT, EXIT_SUCCESS};
use hearing_fit::config;
use hearing_fit::output;

#[derive(Args, Debug)]
struct PredictArgs {
    /// Patient input file (JSON or YAML)
    input: Option<PathBuf>,

    /// Weights file (defaults to ~/.config/hearing-fit/weights.yaml, then the bundled table)
    #[arg(short, long)]
    weights: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict satisfaction for a patient (default if no subcommand)
    Predict(PredictArgs),
    /// Write the bundled weight table for local tuning (JSON for a .json path, else YAML)
    Init {
        /// Where to write (prompts, defaulting to ~/.config/hearing-fit/weights.yaml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
    /// Check a weights file and list every problem
    Validate {
        /// Weights file (JSON or YAML)
        path: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "hearing-fit")]
#[command(about = "Hearing-aid fitting satisfaction predictor", long_about = None)]
#[command(version, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    predict: PredictArgs,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = hearing_fit::telemetry::init(cli.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let code = match cli.command.unwrap_or(Commands::Predict(cli.predict)) {
        Commands::Predict(args) => run_predict(args),
        Commands::Init { path, force } => run_init(path, force),
        Commands::Validate { path } => {
            app::exit_code(app::run_validate(&path, &mut io::stdout().lock()))
        }
    };

    std::process::exit(code);
}

fn run_predict(args: PredictArgs) -> i32 {
    let Some(input_path) = args.input else {
        eprintln!("No input file given.");
        eprintln!("Usage: hearing-fit predict <INPUT> [--weights <PATH>] [--format text|json]");
        return EXIT_INPUT;
    };

    let weights_path = config::resolve_weights_path(args.weights);
    debug!(weights = ?weights_path, "resolved weights path");

    let use_colors = output::should_use_colors();
    app::exit_code(app::run_predict(
        &input_path,
        weights_path.as_deref(),
        args.format,
        use_colors,
        &mut io::stdout().lock(),
    ))
}

fn run_init(path: Option<PathBuf>, force: bool) -> i32 {
    match config::write_default_weights(path, force) {
        Ok(Some(path)) => {
            let mut out = io::stdout().lock();
            let written = writeln!(out, "Weights written to {}", path.display()).and_then(|_| {
                writeln!(out, "Check edits with `hearing-fit validate {}`.", path.display())
            });
            app::exit_code(written.map_err(RunError::from))
        }
        Ok(None) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Init failed: {:#}", e);
            EXIT_FAILURE
        }
    }
}
