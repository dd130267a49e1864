use crate::constants::{verbosity, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// CLI arguments for hreports.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON).
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List configured reports.
    List,
    /// Print the output of a report's query, or of a literal query.
    Run(RunArgs),
    /// Print a report's rendered document.
    Render(RenderArgs),
    /// Render reports and convert them into their output files.
    Save(SaveArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Report whose query to run.
    #[arg(value_name = "REPORT", required_unless_present = "query")]
    pub report: Option<String>,

    /// Literal query template to run instead of a report's.
    #[arg(short, long, conflicts_with = "report")]
    pub query: Option<String>,

    /// Ledger file for a literal query.
    #[arg(short, long, requires = "query")]
    pub ledger: Option<String>,

    /// Also print the executed command to stderr.
    #[arg(long = "show-command")]
    pub show_command: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Report to render.
    #[arg(value_name = "REPORT")]
    pub report: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SaveArgs {
    /// Reports to export, in order.
    #[arg(value_name = "REPORT", required = true)]
    pub reports: Vec<String>,

    /// Continue with the remaining reports when one fails.
    #[arg(long = "keep-going")]
    pub keep_going: bool,
}

/// Parse command line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
