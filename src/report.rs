//! The report engine: query execution, document rendering and export.

use crate::{
    config::Config,
    constants::{context_keys, sections, DEFAULT_OUTPUT_EXTENSION, STYLESHEET_EXTENSION},
    context::{Context, ContextBuilder, RunReport},
    convert::{ConvertCommand, DocumentConverter, Pandoc},
    error::{Error, Result},
    loader::TemplateResolver,
    query::{Hledger, Query, QueryCommand, QueryEngine, QueryOutput},
    renderer::{MiniJinjaRenderer, TemplateRenderer},
};
use minijinja::Value;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Prefix of the scratch file a document is converted from
const SCRATCH_FILE_PREFIX: &str = ".hreports-";

/// Generates reports from one configuration.
///
/// Cloning is cheap; clones share the configuration, renderer and external tools.
#[derive(Clone)]
pub struct Hreport {
    config: Arc<Config>,
    renderer: Arc<dyn TemplateRenderer>,
    query_engine: Arc<dyn QueryEngine>,
    converter: Arc<dyn DocumentConverter>,
    work_dir: PathBuf,
}

impl Hreport {
    /// Engine with the standard template search order, `hledger`, `pandoc`
    /// and the current working directory.
    pub fn new(config: Config) -> Self {
        let resolver = TemplateResolver::standard(config.templates_dir());
        Self {
            renderer: Arc::new(MiniJinjaRenderer::new(resolver)),
            config: Arc::new(config),
            query_engine: Arc::new(Hledger::default()),
            converter: Arc::new(Pandoc::default()),
            work_dir: PathBuf::from("."),
        }
    }

    pub fn with_resolver(mut self, resolver: TemplateResolver) -> Self {
        self.renderer = Arc::new(MiniJinjaRenderer::new(resolver));
        self
    }

    pub fn with_query_engine(mut self, engine: impl QueryEngine + 'static) -> Self {
        self.query_engine = Arc::new(engine);
        self
    }

    pub fn with_converter(mut self, converter: impl DocumentConverter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    /// Directory for scratch files and relative output filenames.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a fresh rendering context for `report`.
    pub fn context(&self, report: Option<&str>) -> Result<Context> {
        let engine = self.clone();
        let run: RunReport = Arc::new(move |name: &str| engine.run(name));
        ContextBuilder::new(self.renderer.as_ref(), &self.config)
            .with_report_handle(run)
            .build(report)
    }

    /// Runs a report's query and returns the query engine's output.
    pub fn run(&self, name: &str) -> Result<String> {
        Ok(self.run_query(Query::Report(name))?.stdout)
    }

    /// Renders and executes a query, keeping the invocation for diagnostics.
    pub fn run_query(&self, query: Query<'_>) -> Result<QueryOutput> {
        let (report, template, ledger) = match query {
            Query::Report(name) => {
                self.config.require_report(name)?;
                let template = self.config.report_str(name, sections::QUERY)?.ok_or_else(|| {
                    Error::ConfigurationError(format!("report '{name}' has no query"))
                })?;
                (Some(name), template, self.config.report_str(name, sections::LEDGER)?)
            }
            Query::Literal { query, ledger } => {
                let ledger = match ledger.filter(|ledger| !ledger.is_empty()) {
                    Some(ledger) => Some(ledger),
                    None => self.config.global_str(sections::LEDGER)?,
                };
                (None, query, ledger)
            }
        };

        let context = self.context(report)?;
        let rendered = self.renderer.render(template, &context, None)?;
        let ledger = ledger
            .map(|ledger| self.renderer.render(ledger, &context, None))
            .transpose()?;

        let command =
            QueryCommand::new(self.query_engine.program(), ledger.as_deref(), &rendered);
        log::debug!("Query for {}: {command}", report.unwrap_or("literal query"));
        let stdout = self.query_engine.execute(&command)?;
        Ok(QueryOutput { command, stdout })
    }

    /// Renders a report's document.
    ///
    /// Reports without a `template` are data reports and return the raw
    /// query output.
    pub fn render(&self, name: &str) -> Result<String> {
        self.config.require_report(name)?;
        let Some(template) = self.config.report_str(name, sections::TEMPLATE)? else {
            log::debug!("Report '{name}' has no template, returning query output");
            return self.run(name);
        };

        self.renderer.load_template(template)?;
        let context = self.context(Some(name))?;
        let output = self.run(name)?;
        let lines: Vec<Value> = output.lines().map(Value::from).collect();
        let context = context.with(context_keys::OUTPUT, Value::from(lines));
        self.renderer.render_template(template, &context)
    }

    /// Renders a report and converts it into its output file.
    ///
    /// The document is written to a scratch file in the work directory that
    /// is removed whether or not the conversion succeeds.
    pub fn save(&self, name: &str) -> Result<PathBuf> {
        let document = self.render(name)?;
        let output = self.output_path(name)?;
        let stylesheet = self.stylesheet(name)?;

        let mut input = tempfile::Builder::new()
            .prefix(SCRATCH_FILE_PREFIX)
            .tempfile_in(&self.work_dir)?;
        input.write_all(document.as_bytes())?;
        input.flush()?;

        let command = ConvertCommand {
            program: self.converter.program().to_string(),
            input: input.path().to_path_buf(),
            output: output.clone(),
            stylesheet,
        };
        let converted = self.converter.convert(&command);
        let removed = input.close();
        converted?;
        removed?;

        log::info!("Saved report '{name}' to {}", output.display());
        Ok(output)
    }

    /// `filename` rendered against the report's context, or `<name>.pdf`.
    pub fn output_path(&self, name: &str) -> Result<PathBuf> {
        let filename = match self.config.report_str(name, sections::FILENAME)? {
            Some(filename) => filename.to_string(),
            None => format!("{name}.{DEFAULT_OUTPUT_EXTENSION}"),
        };
        let context = self.context(Some(name))?;
        let rendered = self.renderer.render(&filename, &context, None)?;
        let rendered = rendered.trim();
        if rendered.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "filename of report '{name}' renders to nothing"
            )));
        }
        Ok(self.work_dir.join(rendered))
    }

    /// Explicit `styling` wins; otherwise a stylesheet named after the
    /// document template is used when it exists.
    pub fn stylesheet(&self, name: &str) -> Result<Option<PathBuf>> {
        let templates_dir = self.config.templates_dir();
        if let Some(styling) = self.config.report_str(name, sections::STYLING)? {
            return Ok(Some(templates_dir.join(styling)));
        }

        let Some(template) = self.config.report_str(name, sections::TEMPLATE)? else {
            return Ok(None);
        };
        let stem = template.split('.').next().unwrap_or(template);
        let candidate = templates_dir.join(format!("{stem}.{STYLESHEET_EXTENSION}"));
        if candidate.exists() {
            Ok(Some(candidate))
        } else {
            log::warn!("No stylesheet at {}, converting without one", candidate.display());
            Ok(None)
        }
    }
}
