//! Ledger query commands and the engine that executes them.

use crate::constants::QUERY_PROGRAM;
use crate::error::{Error, Result};
use std::fmt;
use std::process::{Command, Stdio};

/// What [`crate::report::Hreport::run_query`] should execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Query<'a> {
    /// `query` and `ledger` come from the report, falling back to `global`.
    Report(&'a str),
    /// A literal query template; the ledger falls back to `global.ledger`.
    Literal { query: &'a str, ledger: Option<&'a str> },
}

/// One invocation of the query engine.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCommand {
    program: String,
    args: Vec<String>,
}

impl QueryCommand {
    /// `<program> [-f <ledger>] <query arguments...>`
    ///
    /// The ledger path is passed as a single argument; the query is split
    /// with [`split_arguments`].
    pub fn new(program: impl Into<String>, ledger: Option<&str>, query: &str) -> Self {
        let mut args = Vec::new();
        if let Some(ledger) = ledger {
            args.push("-f".to_string());
            args.push(ledger.to_string());
        }
        args.extend(split_arguments(query));
        Self { program: program.into(), args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for QueryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Splits a rendered query into arguments.
///
/// Whitespace separates arguments except inside single or double quotes,
/// and a backslash outside single quotes takes the next character literally,
/// so `bal "assets:bank account"` yields two arguments.
pub fn split_arguments(query: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = query.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some('\''), '\'') => quote = None,
            (Some('"'), '"') => quote = None,
            (Some('"') | None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), ch) => current.push(ch),
            (None, '\'' | '"') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, ch) if ch.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, ch) => {
                current.push(ch);
                in_word = true;
            }
        }
    }
    if in_word {
        args.push(current);
    }
    args
}

/// Result of running a query, with the exact invocation kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub command: QueryCommand,
    pub stdout: String,
}

/// Trait for executing ledger queries.
pub trait QueryEngine: Send + Sync {
    /// Runs `command` to completion and returns its standard output.
    fn execute(&self, command: &QueryCommand) -> Result<String>;

    /// Executable name commands are built for.
    fn program(&self) -> &str;
}

/// Runs queries through the `hledger` executable.
#[derive(Debug, Clone)]
pub struct Hledger {
    program: String,
}

impl Hledger {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for Hledger {
    fn default() -> Self {
        Self::new(QUERY_PROGRAM)
    }
}

impl QueryEngine for Hledger {
    fn execute(&self, command: &QueryCommand) -> Result<String> {
        let failure = |reason: String| Error::QueryEngineError {
            command: command.to_string(),
            reason,
        };

        log::info!("Running query: {command}");
        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| failure(format!("cannot start '{}': {e}", command.program())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("{} {}", output.status, stderr.trim())));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| failure(format!("output is not valid UTF-8: {e}")))
    }

    fn program(&self) -> &str {
        &self.program
    }
}
