//! Layer registry
//!
//! Static catalog of named layers. Constructed once at startup, read-only
//! afterwards; lookup order matches declaration order.

#![allow(dead_code)]

use crate::models::{Layer, LayerColor};

/// Read-only catalog of registered layers
#[derive(Clone, Debug)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
}

impl LayerRegistry {
    /// Build a registry from a declared list of layers
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Built-in catalog for a hexagonal service template
    pub fn builtin() -> Self {
        Self::new(vec![
            Layer::new("domain", "Domain", "tests/domain/run.sh")
                .describe("Entity and value object tests")
                .colored(LayerColor::Blue),
            Layer::new("application", "Application", "tests/application/run.sh")
                .describe("Use case and business logic tests")
                .depends_on("domain")
                .colored(LayerColor::Green),
            Layer::new("infrastructure", "Infrastructure", "tests/infrastructure/run.sh")
                .describe("Database and external service tests")
                .depends_on("domain")
                .depends_on("application")
                .colored(LayerColor::Yellow)
                // In-memory SQLite keeps layer runs isolated
                .with_env("SQLITE_FILE", ":memory:"),
            Layer::new("presentation", "Presentation", "tests/presentation/run.sh")
                .describe("Controller and HTTP endpoint tests")
                .depends_on("domain")
                .depends_on("application")
                .colored(LayerColor::Magenta)
                // Port 0 binds a random available port
                .with_env("SERVICE_PORT", "0"),
            Layer::new("e2e", "End-to-End", "tests/e2e/run.sh")
                .describe("Full system integration tests")
                .depends_on("domain")
                .depends_on("application")
                .depends_on("infrastructure")
                .depends_on("presentation")
                .colored(LayerColor::Cyan)
                .with_env("SERVICE_PORT", "0")
                .with_env("SQLITE_FILE", ":memory:"),
        ])
    }

    /// Look up a layer by key
    pub fn get(&self, key: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All registered keys, in declaration order
    pub fn keys(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.key.clone()).collect()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
