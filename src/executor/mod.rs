//! Layer execution engine
//!
//! Environment composition, output sinks, and the per-layer process runner.

mod env;
mod runner;
mod sink;

pub use env::{compose_env, EnvOverride};
pub use runner::LayerExecutor;
pub use sink::OutputSink;
