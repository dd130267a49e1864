//! Configuration management for hreports
//!
//! - `loader`: reading the configuration file and looking values up in its
//!   `global` and `reports` sections

pub mod loader;


pub use loader::{is_truthy, Config, Section};
