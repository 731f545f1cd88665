//! Error types for the layer runner
//!
//! All fatal pre-execution errors abort the run before any process is
//! spawned. Per-layer failures (spawn errors, non-zero exits) are not
//! errors at this level; they surface as failed execution results.

use thiserror::Error;

/// Fatal planning and parsing errors
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("unknown layer '{0}'")]
    UnknownLayer(String),

    #[error("test runner not found for layer '{layer}': {path}")]
    MissingRunner { layer: String, path: String },

    #[error("circular dependency detected involving '{0}'")]
    CircularDependency(String),

    #[error("invalid environment override '{0}', expected KEY=VALUE")]
    InvalidEnvFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RunnerError::UnknownLayer("databse".to_string());
        assert_eq!(err.to_string(), "unknown layer 'databse'");

        let err = RunnerError::MissingRunner {
            layer: "domain".to_string(),
            path: "tests/domain/run.sh".to_string(),
        };
        assert!(err.to_string().contains("tests/domain/run.sh"));

        let err = RunnerError::InvalidEnvFormat("FOO".to_string());
        assert!(err.to_string().contains("KEY=VALUE"));
    }
}
