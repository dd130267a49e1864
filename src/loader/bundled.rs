use crate::error::Result;
use crate::loader::interface::TemplateLoader;

/// Templates compiled into the binary, used when no directory provides one.
const BUNDLED_TEMPLATES: &[(&str, &str)] =
    &[("default.html", include_str!("../../templates/default.html"))];

/// Loader for the bundled default templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledLoader;

impl BundledLoader {
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED_TEMPLATES.iter().map(|(name, _)| *name)
    }
}

impl TemplateLoader for BundledLoader {
    fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(BUNDLED_TEMPLATES
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, source)| source.to_string()))
    }
}
