//! Output rendering module
//!
//! Renders execution plans, per-layer progress lines, and run summaries.

mod reporter;

pub use reporter::Reporter;
