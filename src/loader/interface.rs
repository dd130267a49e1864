use crate::error::Result;

/// Trait for looking templates up in one search location.
pub trait TemplateLoader {
    /// Loads the source of the template called `name`.
    ///
    /// # Returns
    /// * `Ok(None)` - The location has no such template
    /// * `Ok(Some(source))` - Template source
    fn load(&self, name: &str) -> Result<Option<String>>;
}
