use crate::error::Result;
use crate::loader::interface::TemplateLoader;
use std::path::{Component, Path};

/// Loader for templates stored in a filesystem directory.
pub struct LocalLoader<P: AsRef<Path>> {
    path: P,
}

impl<P: AsRef<Path>> LocalLoader<P> {
    /// Creates a new LocalLoader instance.
    pub fn new(path: P) -> Self {
        Self { path }
    }
}

impl<P: AsRef<Path>> TemplateLoader for LocalLoader<P> {
    fn load(&self, name: &str) -> Result<Option<String>> {
        let relative = Path::new(name);
        // Template names must stay inside the search directory.
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Ok(None);
        }

        let candidate = self.path.as_ref().join(relative);
        if !candidate.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(candidate)?))
    }
}
