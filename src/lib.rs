/// Handles argument parsing and command dispatch.
pub mod cli;

/// Defines custom error types.
pub mod error;

/// Constants shared across modules.
pub mod constants;

/// Configuration file loading and section lookups.
pub mod config;

/// Template search locations and resolution.
pub mod loader;

/// Template rendering functionality.
pub mod renderer;

/// Layered rendering context.
pub mod context;

/// Ledger query construction and execution.
pub mod query;

/// Document conversion.
pub mod convert;

/// Report generation: run, render and save.
pub mod report;

pub use config::Config;
pub use error::{Error, Result};
pub use report::Hreport;
