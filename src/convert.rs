//! Document conversion of rendered reports into their output format.

use crate::constants::{CONVERTER_PROGRAM, CONVERTER_TARGET_FORMAT};
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One invocation of the document converter:
/// `<program> <input> -t <format> -o <output> [--css <stylesheet>]`
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertCommand {
    pub program: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub stylesheet: Option<PathBuf>,
}

impl ConvertCommand {
    pub fn args(&self) -> Vec<&std::ffi::OsStr> {
        let mut args = vec![
            self.input.as_os_str(),
            "-t".as_ref(),
            CONVERTER_TARGET_FORMAT.as_ref(),
            "-o".as_ref(),
            self.output.as_os_str(),
        ];
        if let Some(stylesheet) = &self.stylesheet {
            args.push("--css".as_ref());
            args.push(stylesheet.as_os_str());
        }
        args
    }
}

impl fmt::Display for ConvertCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in self.args() {
            write!(f, " {}", Path::new(arg).display())?;
        }
        Ok(())
    }
}

/// Trait for converting a rendered document into its final format.
pub trait DocumentConverter: Send + Sync {
    fn convert(&self, command: &ConvertCommand) -> Result<()>;

    /// Executable name commands are built for.
    fn program(&self) -> &str;
}

/// Converts documents with the `pandoc` executable.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: String,
}

impl Pandoc {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new(CONVERTER_PROGRAM)
    }
}

impl DocumentConverter for Pandoc {
    fn convert(&self, command: &ConvertCommand) -> Result<()> {
        let failure = |reason: String| Error::ConversionError {
            command: command.to_string(),
            reason,
        };

        log::info!("Converting: {command}");
        let output = Command::new(&command.program)
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failure(format!("cannot start '{}': {e}", command.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("{} {}", output.status, stderr.trim())));
        }
        Ok(())
    }

    fn program(&self) -> &str {
        &self.program
    }
}
