//! Rendering context for query, filename and document templates.
//!
//! The context is assembled in layers, each rendered against everything
//! before it:
//!
//! 1. builtins (`now`)
//! 2. `global.variables`, flattened
//! 3. the `global` section, under `global`
//! 4. the report's `variables`, flattened
//! 5. the report section, under `report`
//! 6. the `hreport` handle for running other reports from templates
//!
//! Later layers see earlier ones, never the reverse, and report variables
//! shadow global variables of the same name.

use crate::config::{Config, Section};
use crate::constants::{context_keys, sections, NOW_FORMAT};
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use chrono::{Datelike, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use minijinja::value::{from_args, Object, ObjectRepr, Value};
use minijinja::{ErrorKind, State};
use std::fmt;
use std::sync::Arc;

/// Names mapped to values, visible to one report's templates.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: IndexMap<String, Value>,
}

impl Context {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns this context with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Returns this context with every entry of `entries` set, later entries winning.
    pub fn merged<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.values.extend(entries);
        self
    }

    pub fn to_value(&self) -> Value {
        Value::from_iter(self.values.iter().map(|(key, value)| (key.as_str(), value.clone())))
    }
}

/// The `now` builtin.
///
/// Renders as ISO text (`2024-05-17T09:30:00`), which the date filters
/// accept, and exposes `year`, `month`, `day`, `hour`, `minute`, `second`
/// and `weekday` (Monday is 0).
#[derive(Debug, Clone, Copy)]
pub struct Timestamp(pub NaiveDateTime);

impl Object for Timestamp {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let now = self.0;
        let value = match key.as_str()? {
            "year" => now.year(),
            "month" => now.month() as i32,
            "day" => now.day() as i32,
            "hour" => now.hour() as i32,
            "minute" => now.minute() as i32,
            "second" => now.second() as i32,
            "weekday" => now.weekday().num_days_from_monday() as i32,
            _ => return None,
        };
        Some(Value::from(value))
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(NOW_FORMAT))
    }
}

/// Runs a report's query by name and returns its output.
pub type RunReport = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// The `hreport` template object.
///
/// It exposes a single method, `run(name)`, so templates can pull in the
/// output of any configured report and nothing else of the engine.
pub struct ReportHandle {
    run: RunReport,
}

impl ReportHandle {
    pub fn new(run: RunReport) -> Self {
        Self { run }
    }
}

impl fmt::Debug for ReportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReportHandle")
    }
}

impl Object for ReportHandle {
    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> std::result::Result<Value, minijinja::Error> {
        if method != "run" {
            return Err(minijinja::Error::from(ErrorKind::UnknownMethod));
        }
        let (name,): (&str,) = from_args(args)?;
        (self.run)(name).map(Value::from).map_err(|e| {
            minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("running report '{name}' failed"),
            )
            .with_source(e)
        })
    }
}

/// Builds the [`Context`] for one render call.
pub struct ContextBuilder<'a> {
    renderer: &'a dyn TemplateRenderer,
    config: &'a Config,
    handle: Option<Value>,
    now: Option<NaiveDateTime>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, config: &'a Config) -> Self {
        Self { renderer, config, handle: None, now: None }
    }

    /// Exposes `run` to templates as `hreport.run(name)`.
    pub fn with_report_handle(mut self, run: RunReport) -> Self {
        self.handle = Some(Value::from_object(ReportHandle::new(run)));
        self
    }

    /// Pins the `now` builtin instead of reading the clock.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Builds the context for `report`, or for no report at all.
    ///
    /// An unknown or absent report yields an empty `report` view.
    pub fn build(&self, report: Option<&str>) -> Result<Context> {
        let global = self.config.global()?;
        let report_section = report.and_then(|name| self.config.report(name));
        if let (Some(name), None) = (report, report_section) {
            log::debug!("Report '{name}' has no section, using an empty report view");
        }

        let context = self.builtins();
        let context = self.layer_variables(context, global.get(sections::VARIABLES))?;
        let context = self.layer_section(context, Some(global), context_keys::GLOBAL)?;
        let context = self.layer_variables(
            context,
            report_section.and_then(|section| section.get(sections::VARIABLES)),
        )?;
        let context = self.layer_section(context, report_section, context_keys::REPORT)?;

        Ok(match &self.handle {
            Some(handle) => context.with(context_keys::ENGINE, handle.clone()),
            None => context,
        })
    }

    fn builtins(&self) -> Context {
        let now = self.now.unwrap_or_else(|| chrono::Local::now().naive_local());
        Context::default()
            .with(context_keys::NOW, Value::from_object(Timestamp(now)))
    }

    /// Renders string values against `context` and flattens them into it.
    fn layer_variables(
        &self,
        context: Context,
        variables: Option<&serde_json::Value>,
    ) -> Result<Context> {
        let variables = match variables {
            None | Some(serde_json::Value::Null) => return Ok(context),
            Some(serde_json::Value::Object(variables)) => variables,
            Some(_) => {
                return Err(Error::ConfigurationError(format!(
                    "'{}' must be a mapping",
                    sections::VARIABLES
                )))
            }
        };

        for key in variables.keys() {
            if context_keys::RESERVED.contains(&key.as_str()) {
                log::warn!("Variable '{key}' shadows a reserved context name");
            }
        }

        let rendered = self.render_entries(&context, variables)?;
        Ok(context.merged(rendered))
    }

    /// Renders string values against `context` and stores them as one mapping under `key`.
    fn layer_section(
        &self,
        context: Context,
        section: Option<&Section>,
        key: &str,
    ) -> Result<Context> {
        let view = match section {
            Some(section) => self.render_entries(&context, section)?,
            None => Vec::new(),
        };
        Ok(context.with(key, Value::from_iter(view)))
    }

    fn render_entries(
        &self,
        context: &Context,
        entries: &Section,
    ) -> Result<Vec<(String, Value)>> {
        entries
            .iter()
            .map(|(key, value)| -> Result<(String, Value)> {
                let value = match value {
                    serde_json::Value::String(template) => {
                        Value::from(self.renderer.render(template, context, None)?)
                    }
                    other => Value::from_serialize(other),
                };
                Ok((key.clone(), value))
            })
            .collect()
    }
}
