//! Configuration
//!
//! Optional YAML catalog file overriding the built-in layer registry.

mod file;

pub use file::CatalogFile;
