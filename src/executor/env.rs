//! Environment composition
//!
//! Builds the environment block for one layer's child process as a
//! strict-precedence merge: ambient process environment, then the layer's
//! declared overrides, then global `--env` overrides.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RunnerError;
use crate::models::Layer;

/// A single `KEY=VALUE` override from the command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvOverride {
    pub key: String,
    pub value: String,
}

impl FromStr for EnvOverride {
    type Err = RunnerError;

    /// Split on the first `=`; the value may itself contain `=`, and an
    /// empty value is legal. A missing `=` or empty key is malformed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self {
                key: key.to_string(),
                value: value.to_string(),
            }),
            _ => Err(RunnerError::InvalidEnvFormat(s.to_string())),
        }
    }
}

impl fmt::Display for EnvOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Compose the child environment for one layer.
///
/// Later tiers win on overlapping keys. Color output is forced on so that
/// captured or streamed output keeps ANSI formatting when piped.
pub fn compose_env(layer: &Layer, overrides: &[EnvOverride]) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = std::env::vars().collect();

    for (key, value) in &layer.env {
        env.insert(key.clone(), value.clone());
    }

    for o in overrides {
        env.insert(o.key.clone(), o.value.clone());
    }

    env.insert("FORCE_COLOR".to_string(), "1".to_string());
    env.remove("NO_COLOR");

    env
}
