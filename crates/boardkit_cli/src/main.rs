//! The boardkit CLI. Inspects board definitions and programs FPGA boards.
//!
//! Provides `boardkit boards` to list the catalogue, `boardkit resources` and
//! `boardkit pins` to inspect a board, `boardkit check` to validate it, and
//! `boardkit program` to load a build artifact onto the device.

#![warn(missing_docs)]

mod check;
mod inspect;
mod program;
mod project;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// boardkit: FPGA board definitions and device programming.
#[derive(Parser, Debug)]
#[command(name = "boardkit", version, about = "FPGA board definitions and programming")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `boardkit.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the boards in the catalogue.
    Boards(BoardsArgs),
    /// List the resources of a board.
    Resources(InspectArgs),
    /// List the constrained ports of a board and their pins.
    Pins(InspectArgs),
    /// Assemble a board and check it for pin conflicts.
    Check(CheckArgs),
    /// Program a build artifact onto the board.
    Program(ProgramArgs),
}

/// Arguments for the `boardkit boards` subcommand.
#[derive(Parser, Debug)]
pub struct BoardsArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `boardkit resources` and `boardkit pins` subcommands.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Board name (default: `[board].name` from `boardkit.toml`).
    #[arg(short, long)]
    pub board: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `boardkit check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Board name (default: `[board].name` from `boardkit.toml`).
    #[arg(short, long)]
    pub board: Option<String>,
}

/// Arguments for the `boardkit program` subcommand.
#[derive(Parser, Debug)]
pub struct ProgramArgs {
    /// Artifact base name (default: `project.top` from `boardkit.toml`).
    pub name: Option<String>,

    /// Board name (default: `[board].name` from `boardkit.toml`).
    #[arg(short, long)]
    pub board: Option<String>,

    /// Directory holding the build products (default: `[products].dir`).
    #[arg(short, long)]
    pub products: Option<String>,
}

/// Listing output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Returns the log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

fn init_logging(global: &GlobalArgs) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(global.default_log_filter()),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Boards(ref args) => inspect::run_boards(args),
        Command::Resources(ref args) => inspect::run_resources(args, &global),
        Command::Pins(ref args) => inspect::run_pins(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Program(ref args) => program::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
