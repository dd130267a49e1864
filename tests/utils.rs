#![allow(dead_code)]

use hreports::convert::{ConvertCommand, DocumentConverter};
use hreports::error::{Error, Result};
use hreports::loader::{TemplateLocation, TemplateResolver};
use hreports::query::{QueryCommand, QueryEngine};
use hreports::{Config, Hreport};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Query engine returning canned output and recording every command.
#[derive(Clone, Default)]
pub struct FakeQueryEngine {
    pub output: Option<String>,
    pub fail: bool,
    pub commands: Arc<Mutex<Vec<QueryCommand>>>,
}

impl FakeQueryEngine {
    /// Answers every query with `output`.
    pub fn returning(output: &str) -> Self {
        Self { output: Some(output.to_string()), ..Default::default() }
    }

    /// Answers every query with its own arguments joined by spaces.
    pub fn echoing() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn commands(&self) -> Vec<QueryCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl QueryEngine for FakeQueryEngine {
    fn execute(&self, command: &QueryCommand) -> Result<String> {
        self.commands.lock().unwrap().push(command.clone());
        if self.fail {
            return Err(Error::QueryEngineError {
                command: command.to_string(),
                reason: "exit status: 1".into(),
            });
        }
        Ok(self.output.clone().unwrap_or_else(|| command.args().join(" ")))
    }

    fn program(&self) -> &str {
        "hledger"
    }
}

/// Converter that checks its input exists while converting and records commands.
#[derive(Clone, Default)]
pub struct FakeConverter {
    pub fail: bool,
    pub commands: Arc<Mutex<Vec<ConvertCommand>>>,
    pub inputs: Arc<Mutex<Vec<String>>>,
}

impl FakeConverter {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn commands(&self) -> Vec<ConvertCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl DocumentConverter for FakeConverter {
    fn convert(&self, command: &ConvertCommand) -> Result<()> {
        let input = std::fs::read_to_string(&command.input)?;
        self.inputs.lock().unwrap().push(input);
        self.commands.lock().unwrap().push(command.clone());
        if self.fail {
            return Err(Error::ConversionError {
                command: command.to_string(),
                reason: "simulated failure".into(),
            });
        }
        std::fs::write(&command.output, "converted")?;
        Ok(())
    }

    fn program(&self) -> &str {
        "pandoc"
    }
}

/// Scratch layout: a stand-in working directory for template lookup, the
/// configuration file with its `templates/` directory, and a work directory.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["cwd", "templates", "work"] {
            std::fs::create_dir(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("hreports.yml")
    }

    pub fn cwd(&self) -> PathBuf {
        self.root.path().join("cwd")
    }

    pub fn templates(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    pub fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub fn write_template(&self, dir: &PathBuf, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    /// Files left in the work directory, sorted.
    pub fn work_files(&self) -> Vec<String> {
        let mut files: Vec<String> = std::fs::read_dir(self.work())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        files.sort();
        files
    }

    pub fn engine(
        &self,
        config: serde_json::Value,
        query_engine: FakeQueryEngine,
        converter: FakeConverter,
    ) -> Hreport {
        let config = Config::from_value(config, self.config_path()).unwrap();
        let resolver = TemplateResolver::new(vec![
            TemplateLocation::Directory(self.cwd()),
            TemplateLocation::Directory(config.templates_dir()),
            TemplateLocation::Bundled,
        ]);
        Hreport::new(config)
            .with_resolver(resolver)
            .with_query_engine(query_engine)
            .with_converter(converter)
            .with_work_dir(self.work())
    }
}
