use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file '{path}'. Original error: {reason}")]
    ConfigParseError { path: String, reason: String },

    /// Missing `global` section, unknown report or a malformed value.
    #[error("Configuration error: {0}.")]
    ConfigurationError(String),

    #[error("Template '{name}' not found. Searched: {searched}.")]
    TemplateNotFound { name: String, searched: String },

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// The query engine exited with a non-zero status or produced output
    /// that is not valid UTF-8.
    #[error("Query `{command}` failed: {reason}")]
    QueryEngineError { command: String, reason: String },

    /// The document converter could not be started or exited unsuccessfully.
    #[error("Conversion `{command}` failed: {reason}")]
    ConversionError { command: String, reason: String },
}

/// Convenience type alias for Results with hreports' Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
