use crate::context::Context;
use crate::error::Result;

/// Trait for template rendering engines.
pub trait TemplateRenderer: Send + Sync {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    /// * `template_name` - Optional name for the template (used in error messages)
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(
        &self,
        template: &str,
        context: &Context,
        template_name: Option<&str>,
    ) -> Result<String>;

    /// Loads and compiles a named template without rendering it.
    ///
    /// # Returns
    /// * `Err(Error::TemplateNotFound)` - No location provides `name`
    fn load_template(&self, name: &str) -> Result<()>;

    /// Looks up a named template through the search locations and renders it.
    ///
    /// # Returns
    /// * `Err(Error::TemplateNotFound)` - No location provides `name`
    fn render_template(&self, name: &str, context: &Context) -> Result<String>;
}
