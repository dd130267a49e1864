use crate::constants::SYSTEM_TEMPLATES_DIR;
use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use crate::loader::{bundled::BundledLoader, local::LocalLoader};
use std::path::{Path, PathBuf};

pub mod bundled;
pub mod interface;
pub mod local;

/// One place a template can be found in.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateLocation {
    /// Filesystem directory
    Directory(PathBuf),
    /// Templates shipped inside the binary
    Bundled,
}

impl std::fmt::Display for TemplateLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateLocation::Directory(path) => write!(f, "'{}'", path.display()),
            TemplateLocation::Bundled => write!(f, "bundled templates"),
        }
    }
}

impl TemplateLocation {
    fn load(&self, name: &str) -> Result<Option<String>> {
        match self {
            TemplateLocation::Directory(path) => LocalLoader::new(path).load(name),
            TemplateLocation::Bundled => BundledLoader.load(name),
        }
    }
}

/// Looks named templates up across an ordered list of locations.
///
/// The first location that has the template wins.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateResolver {
    locations: Vec<TemplateLocation>,
}

impl TemplateResolver {
    pub fn new(locations: Vec<TemplateLocation>) -> Self {
        Self { locations }
    }

    /// Working directory, the system-wide directory, the configuration's
    /// template directory, then the bundled defaults.
    pub fn standard<P: AsRef<Path>>(config_templates: P) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(vec![
            TemplateLocation::Directory(cwd),
            TemplateLocation::Directory(PathBuf::from(SYSTEM_TEMPLATES_DIR)),
            TemplateLocation::Directory(config_templates.as_ref().to_path_buf()),
            TemplateLocation::Bundled,
        ])
    }

    pub fn locations(&self) -> &[TemplateLocation] {
        &self.locations
    }

    /// Returns the source of the first template called `name`, or `None`.
    pub fn find(&self, name: &str) -> Result<Option<String>> {
        for location in &self.locations {
            if let Some(source) = location.load(name)? {
                log::debug!("Resolved template '{name}' from {location}");
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    /// Like [`TemplateResolver::find`], failing with `TemplateNotFound`.
    pub fn resolve(&self, name: &str) -> Result<String> {
        self.find(name)?.ok_or_else(|| self.not_found(name))
    }

    pub fn not_found(&self, name: &str) -> Error {
        let searched =
            self.locations.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        Error::TemplateNotFound { name: name.to_string(), searched }
    }
}
