//! Template rendering engine for hreports
//!
//! This module provides template rendering capabilities using MiniJinja.
//!
//! The module is structured as:
//! - `interface`: Core trait definitions for template rendering
//! - `minijinja`: MiniJinja-based implementation of the template renderer
//! - `filters`: Date and number filters for report templates

pub mod filters;
pub mod interface;
pub mod minijinja;

pub use interface::TemplateRenderer;
pub use self::minijinja::MiniJinjaRenderer;
