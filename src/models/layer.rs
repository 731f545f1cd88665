//! Layer definitions
//!
//! A layer is a named, independently invocable test suite with declared
//! dependencies on other layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// ANSI reset sequence
pub const RESET: &str = "\x1b[0m";

/// Display color for a layer (no semantic effect)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerColor {
    Blue,
    Green,
    Yellow,
    Magenta,
    Cyan,
    Red,
    Gray,
}

impl LayerColor {
    /// ANSI escape code for this color
    pub fn code(&self) -> &'static str {
        match self {
            LayerColor::Blue => "\x1b[34m",
            LayerColor::Green => "\x1b[32m",
            LayerColor::Yellow => "\x1b[33m",
            LayerColor::Magenta => "\x1b[35m",
            LayerColor::Cyan => "\x1b[36m",
            LayerColor::Red => "\x1b[31m",
            LayerColor::Gray => "\x1b[90m",
        }
    }

    /// Wrap text in this color
    pub fn paint(&self, text: impl AsRef<str>) -> String {
        format!("{}{}{}", self.code(), text.as_ref(), RESET)
    }
}

fn default_color() -> LayerColor {
    LayerColor::Gray
}

/// A registered test layer
///
/// Immutable after registration. Dependencies reference other layer keys
/// and are validated at resolution time, not registration time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier
    pub key: String,
    /// Display name
    pub name: String,
    /// Path to the external runner script or executable
    pub path: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Keys of layers that must run before this one (sequential mode)
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Display color
    #[serde(default = "default_color")]
    pub color: LayerColor,
    /// Layer-specific environment overrides
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Layer {
    /// Create a new layer
    pub fn new(key: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            path: path.into(),
            description: String::new(),
            dependencies: Vec::new(),
            color: default_color(),
            env: HashMap::new(),
        }
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a dependency on another layer
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.dependencies.push(key.into());
        self
    }

    /// Set the display color
    pub fn colored(mut self, color: LayerColor) -> Self {
        self.color = color;
        self
    }

    /// Add a layer-specific environment override
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}
