//! Catalog file management
//!
//! Handles finding, loading, and validating YAML layer catalogs. When no
//! catalog file is present the built-in registry is used instead.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::Layer;
use crate::registry::LayerRegistry;

/// Catalog file locations (in order of precedence)
const CATALOG_LOCATIONS: &[&str] = &["./layers.yaml", "./layers.yml", "./.layer-runner/layers.yaml"];

/// On-disk layer catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Version of the catalog file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Declared layers, in execution-registry order
    pub layers: Vec<Layer>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl CatalogFile {
    /// Find a catalog file in the standard locations
    pub fn find() -> Option<PathBuf> {
        CATALOG_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Load and validate a catalog from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

        let catalog: CatalogFile = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse catalog file: {}", path.display()))?;

        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject empty catalogs and duplicate keys
    fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            bail!("catalog declares no layers");
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if layer.key.is_empty() {
                bail!("catalog contains a layer with an empty key");
            }
            if !seen.insert(layer.key.as_str()) {
                bail!("duplicate layer key '{}' in catalog", layer.key);
            }
        }

        Ok(())
    }

    /// Convert into a registry, preserving declaration order
    pub fn into_registry(self) -> LayerRegistry {
        LayerRegistry::new(self.layers)
    }
}
