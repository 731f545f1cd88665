//! Data models for the layer runner
//!
//! This module contains the data structures used throughout the application.

mod layer;
mod result;

pub use layer::{Layer, LayerColor, RESET};
pub use result::{ExecutionResult, RunSummary};
