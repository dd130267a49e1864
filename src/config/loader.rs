//! Configuration loading and section lookups

use crate::constants::{sections, CONFIG_TEMPLATES_DIR};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A section of the configuration (`global` or one report).
pub type Section = Map<String, Value>;

/// The parsed configuration file.
///
/// Read-only once loaded; every report of a run looks things up here.
#[derive(Debug, Clone)]
pub struct Config {
    data: Section,
    path: PathBuf,
}

impl Config {
    /// Loads a YAML (`.yml`, `.yaml`) or JSON (`.json`) configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigurationError(format!(
                "cannot read config file '{}': {e}",
                path.display()
            ))
        })?;

        let parse_error = |reason: String| Error::ConfigParseError {
            path: path.display().to_string(),
            reason,
        };

        let value: Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        };

        log::debug!("Loaded configuration from {}", path.display());
        Self::from_value(value, path)
    }

    /// Builds a configuration from an already parsed mapping.
    ///
    /// `path` is the location the mapping was read from; the per-configuration
    /// template directory is derived from it.
    pub fn from_value<P: AsRef<Path>>(value: Value, path: P) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self { data, path: path.as_ref().to_path_buf() }),
            other => Err(Error::ConfigurationError(format!(
                "expected a mapping at the top level, found {}",
                type_name(&other)
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<directory of the config file>/templates`
    pub fn templates_dir(&self) -> PathBuf {
        let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
        parent.join(CONFIG_TEMPLATES_DIR)
    }

    /// The `global` section. Every lookup falls back to it, so its absence is fatal.
    pub fn global(&self) -> Result<&Section> {
        self.data
            .get(sections::GLOBAL)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Error::ConfigurationError(format!(
                    "'{}' section is missing in {}",
                    sections::GLOBAL,
                    self.path.display()
                ))
            })
    }

    pub fn reports(&self) -> Option<&Section> {
        self.data.get(sections::REPORTS).and_then(Value::as_object)
    }

    pub fn report(&self, name: &str) -> Option<&Section> {
        self.reports().and_then(|reports| reports.get(name)).and_then(Value::as_object)
    }

    /// Like [`Config::report`], for operations that cannot run without the report.
    pub fn require_report(&self, name: &str) -> Result<&Section> {
        self.report(name).ok_or_else(|| {
            Error::ConfigurationError(format!("report '{name}' is not defined"))
        })
    }

    /// Report names in the order they appear in the file.
    pub fn report_names(&self) -> Vec<&str> {
        self.reports()
            .map(|reports| reports.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn global_value(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.global()?.get(key))
    }

    /// Looks `key` up in the report and falls back to the same `key` in the
    /// `global` section when the report value is missing or falsy.
    pub fn report_value(&self, name: &str, key: &str) -> Result<Option<&Value>> {
        let value = self.report(name).and_then(|report| report.get(key));
        match value {
            Some(value) if is_truthy(value) => Ok(Some(value)),
            _ => {
                log::debug!("'{key}' not set for report '{name}', using '{}'", sections::GLOBAL);
                self.global_value(key)
            }
        }
    }

    /// [`Config::report_value`] narrowed to strings; falsy results become `None`.
    pub fn report_str(&self, name: &str, key: &str) -> Result<Option<&str>> {
        let value = self.report_value(name, key)?.filter(|value| is_truthy(value));
        match value {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(Error::ConfigurationError(format!(
                "'{key}' of report '{name}' must be a string, found {}",
                type_name(other)
            ))),
        }
    }

    /// [`Config::global_value`] narrowed to strings; falsy results become `None`.
    pub fn global_str(&self, key: &str) -> Result<Option<&str>> {
        match self.global_value(key)?.filter(|value| is_truthy(value)) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(Error::ConfigurationError(format!(
                "global '{key}' must be a string, found {}",
                type_name(other)
            ))),
        }
    }
}

/// Template truthiness: null, false, zero, and empty strings, lists and
/// mappings are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
