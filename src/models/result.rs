//! Execution results and run summary
//!
//! One `ExecutionResult` per executed layer; results accumulate in an
//! ordered sequence for the life of one run and are never persisted
//! beyond process exit unless explicitly exported.

use serde::Serialize;
use std::fmt;

/// Result of executing a single layer
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionResult {
    /// Key of the executed layer
    pub layer_key: String,
    /// True iff the child process exited with code zero
    pub success: bool,
    /// Wall-clock duration of the child process
    pub duration_ms: u64,
    /// Combined captured stdout/stderr; empty when streamed or inherited
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output: String,
}

impl ExecutionResult {
    pub fn passed(layer_key: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            layer_key: layer_key.into(),
            success: true,
            duration_ms,
            output: String::new(),
        }
    }

    pub fn failed(layer_key: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            layer_key: layer_key.into(),
            success: false,
            duration_ms,
            output: String::new(),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = if self.success { "✓" } else { "✗" };
        write!(f, "{} {} [{}ms]", symbol, self.layer_key, self.duration_ms)
    }
}

/// Aggregate outcome of one orchestrator run
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
    pub results: Vec<ExecutionResult>,
}

impl RunSummary {
    pub fn new(results: Vec<ExecutionResult>, total_duration_ms: u64) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.success).count();
        let failed = total - passed;

        Self {
            total,
            passed,
            failed,
            total_duration_ms,
            results,
        }
    }

    /// Summary for a run that executed nothing (dry run, empty plan)
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Keys of the layers that failed, in completion order
    pub fn failed_keys(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.layer_key.as_str())
            .collect()
    }

    /// Process exit status: zero iff every executed layer succeeded
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}
