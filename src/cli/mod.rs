//! CLI argument parsing
//!
//! Defines the command-line interface using clap and converts parsed
//! arguments into immutable execution options. `--help` is handled by
//! clap before any validation runs.

use clap::Parser;
use std::path::PathBuf;

use crate::error::RunnerError;
use crate::executor::EnvOverride;

/// Test-layer orchestration runner
#[derive(Parser, Debug)]
#[command(name = "layer-runner")]
#[command(version = "0.1.0")]
#[command(about = "Run test layers in dependency order or in parallel")]
#[command(long_about = None)]
#[command(after_help = "\
EXAMPLES:
  layer-runner                         # run all layers in dependency order
  layer-runner domain application      # run specific layers
  layer-runner -l domain -l e2e        # same, via flags
  layer-runner -e e2e                  # run all except e2e
  layer-runner -p                      # run all layers in parallel
  layer-runner -d                      # dry run, show the execution plan
  layer-runner -E SQLITE_FILE=./t.db   # override an environment variable
")]
pub struct Args {
    /// Run specific layer(s), can be repeated
    #[arg(short = 'l', long = "layer", value_name = "LAYER")]
    pub layer: Vec<String>,

    /// Exclude specific layer(s), can be repeated
    #[arg(short = 'e', long = "exclude", value_name = "LAYER")]
    pub exclude: Vec<String>,

    /// Run layers in parallel (ignores dependency order)
    #[arg(short, long)]
    pub parallel: bool,

    /// Run in watch mode (advisory)
    #[arg(short, long)]
    pub watch: bool,

    /// Verbose output; child processes inherit the terminal
    #[arg(short, long)]
    pub verbose: bool,

    /// Stop after the first failing layer (sequential mode)
    #[arg(short = 'f', long = "fail-fast")]
    pub fail_fast: bool,

    /// Show what would be executed without running anything
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Override environment variables, can be repeated
    #[arg(short = 'E', long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Path to a YAML layer catalog
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save the run summary as JSON
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Layers to run (same as --layer)
    #[arg(value_name = "LAYERS")]
    pub layers: Vec<String>,
}

/// Immutable options for one orchestrator run
#[derive(Clone, Debug, Default)]
pub struct ExecutionOptions {
    /// Requested layer keys; empty means all registered layers
    pub requested: Vec<String>,
    /// Layer keys removed from the selected set
    pub excluded: Vec<String>,
    pub parallel: bool,
    pub watch: bool,
    pub verbose: bool,
    pub fail_fast: bool,
    pub dry_run: bool,
    /// Global overrides, highest precedence, in flag order
    pub env_overrides: Vec<EnvOverride>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ExecutionOptions {
    /// Build options from parsed arguments.
    ///
    /// Positional layer names are folded into the requested set ahead of
    /// `--layer` flags. Malformed `--env` values fail here, before any
    /// planning, including under `--dry-run`.
    pub fn from_args(args: Args) -> Result<Self, RunnerError> {
        let mut requested = args.layers;
        requested.extend(args.layer);

        let env_overrides = args
            .env
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<EnvOverride>, RunnerError>>()?;

        Ok(Self {
            requested,
            excluded: args.exclude,
            parallel: args.parallel,
            watch: args.watch,
            verbose: args.verbose,
            fail_fast: args.fail_fast,
            dry_run: args.dry_run,
            env_overrides,
            config: args.config,
            output: args.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["layer-runner", "-l", "domain", "--parallel"]);
        assert_eq!(args.layer, vec!["domain"]);
        assert!(args.parallel);
        assert!(!args.fail_fast);
    }

    #[test]
    fn test_positionals_merge_with_layer_flags() {
        let args = Args::parse_from(["layer-runner", "domain", "application", "-l", "e2e"]);
        let options = ExecutionOptions::from_args(args).unwrap();
        assert_eq!(options.requested, vec!["domain", "application", "e2e"]);
    }

    #[test]
    fn test_repeated_flags() {
        let args = Args::parse_from([
            "layer-runner",
            "-e",
            "e2e",
            "-e",
            "presentation",
            "-E",
            "A=1",
            "-E",
            "B=2",
        ]);
        let options = ExecutionOptions::from_args(args).unwrap();

        assert_eq!(options.excluded, vec!["e2e", "presentation"]);
        assert_eq!(options.env_overrides.len(), 2);
        assert_eq!(options.env_overrides[0].to_string(), "A=1");
        assert_eq!(options.env_overrides[1].to_string(), "B=2");
    }

    #[test]
    fn test_malformed_env_rejected() {
        let args = Args::parse_from(["layer-runner", "-E", "FOO"]);
        let err = ExecutionOptions::from_args(args).unwrap_err();
        assert!(matches!(err, RunnerError::InvalidEnvFormat(ref s) if s == "FOO"));
    }

    #[test]
    fn test_malformed_env_rejected_even_with_dry_run() {
        let args = Args::parse_from(["layer-runner", "--dry-run", "-E", "FOO"]);
        assert!(ExecutionOptions::from_args(args).is_err());
    }

    #[test]
    fn test_boolean_flags() {
        let args = Args::parse_from(["layer-runner", "-p", "-w", "-v", "-f", "-d"]);
        let options = ExecutionOptions::from_args(args).unwrap();
        assert!(options.parallel);
        assert!(options.watch);
        assert!(options.verbose);
        assert!(options.fail_fast);
        assert!(options.dry_run);
    }
}
