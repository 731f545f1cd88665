//! Layer execution
//!
//! Spawns one layer's external runner process, wires up output handling
//! per execution mode, and resolves to an execution result. A spawn
//! failure and a non-zero exit are reported identically upstream: a
//! failed result for that layer only.

use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::executor::env::{compose_env, EnvOverride};
use crate::executor::sink::OutputSink;
use crate::models::{ExecutionResult, Layer};
use crate::output::Reporter;
use crate::utils::Timer;

/// Executes a single layer's runner process
pub struct LayerExecutor {
    verbose: bool,
    parallel: bool,
}

impl LayerExecutor {
    pub fn new(verbose: bool, parallel: bool) -> Self {
        Self { verbose, parallel }
    }

    /// Run the layer to completion and resolve to a result.
    ///
    /// Output handling depends on mode: verbose inherits the parent's
    /// streams, sequential buffers for replay-on-failure, parallel streams
    /// live with a per-line layer tag.
    pub async fn execute(&self, layer: &Layer, overrides: &[EnvOverride]) -> ExecutionResult {
        let timer = Timer::start(&layer.key);

        println!("{}", Reporter::render_layer_start(layer));

        if self.verbose {
            println!("  \x1b[90mFile: {}\x1b[0m", layer.path);
            self.print_override_summary(layer, overrides);
        }

        let env = compose_env(layer, overrides);

        let mut command = Command::new(&layer.path);
        command.env_clear().envs(&env);

        if self.verbose {
            self.run_inherited(layer, command, timer).await
        } else {
            self.run_captured(layer, command, timer).await
        }
    }

    /// Verbose mode: the child owns the terminal, nothing is captured
    async fn run_inherited(
        &self,
        layer: &Layer,
        mut command: Command,
        timer: Timer,
    ) -> ExecutionResult {
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => return self.spawn_failure(layer, &err.to_string(), timer),
        };

        let success = matches!(child.wait().await, Ok(status) if status.success());
        let duration_ms = timer.elapsed_ms();

        println!("{}", Reporter::render_layer_result(layer, success, duration_ms));
        self.finish(layer, success, duration_ms, String::new())
    }

    /// Piped mode: both streams drain line-by-line into the sink
    async fn run_captured(
        &self,
        layer: &Layer,
        mut command: Command,
        timer: Timer,
    ) -> ExecutionResult {
        command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => return self.spawn_failure(layer, &err.to_string(), timer),
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<(String, bool)>();

        if let Some(stdout) = child.stdout.take() {
            spawn_line_reader(stdout, tx.clone(), false);
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, tx.clone(), true);
        }
        drop(tx);

        let mut sink = if self.parallel {
            OutputSink::stream(layer)
        } else {
            OutputSink::buffer()
        };

        // Channel closes once both readers hit EOF
        while let Some((line, from_stderr)) = rx.recv().await {
            sink.append(&line, from_stderr);
        }

        let success = matches!(child.wait().await, Ok(status) if status.success());
        let duration_ms = timer.elapsed_ms();

        println!("{}", Reporter::render_layer_result(layer, success, duration_ms));

        let captured = sink.into_captured();
        if !success && !self.parallel && !captured.is_empty() {
            println!("{}", Reporter::render_failure_output(layer, &captured));
        }

        self.finish(layer, success, duration_ms, captured)
    }

    fn spawn_failure(&self, layer: &Layer, error: &str, timer: Timer) -> ExecutionResult {
        println!("{}", Reporter::render_spawn_error(layer, error));
        ExecutionResult::failed(&layer.key, timer.elapsed_ms())
            .with_output(format!("spawn failed: {error}\n"))
    }

    fn finish(
        &self,
        layer: &Layer,
        success: bool,
        duration_ms: u64,
        captured: String,
    ) -> ExecutionResult {
        debug!("layer {} finished: success={success} ({duration_ms}ms)", layer.key);

        if success {
            ExecutionResult::passed(&layer.key, duration_ms).with_output(captured)
        } else {
            ExecutionResult::failed(&layer.key, duration_ms).with_output(captured)
        }
    }

    fn print_override_summary(&self, layer: &Layer, overrides: &[EnvOverride]) {
        if layer.env.is_empty() && overrides.is_empty() {
            return;
        }

        println!("  \x1b[90mEnvironment overrides:\x1b[0m");
        for (key, value) in &layer.env {
            println!("  \x1b[90m  {key}={value}\x1b[0m");
        }
        for o in overrides {
            println!("  \x1b[90m  {o}\x1b[0m");
        }
    }
}

/// Forward each line of a child stream into the shared channel
fn spawn_line_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    tx: mpsc::UnboundedSender<(String, bool)>,
    from_stderr: bool,
) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send((line, from_stderr)).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        drop(file);

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_successful_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "pass.sh", "echo all good\nexit 0\n");
        let layer = Layer::new("pass", "Pass", path);

        let result = LayerExecutor::new(false, false).execute(&layer, &[]).await;
        assert!(result.success);
        assert!(result.output.contains("all good"));
    }

    #[tokio::test]
    async fn test_failing_layer_captures_both_streams() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(
            dir.path(),
            "fail.sh",
            "echo from stdout\necho from stderr >&2\nexit 3\n",
        );
        let layer = Layer::new("fail", "Fail", path);

        let result = LayerExecutor::new(false, false).execute(&layer, &[]).await;
        assert!(!result.success);
        assert!(result.output.contains("from stdout"));
        assert!(result.output.contains("from stderr"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_a_failed_result() {
        let layer = Layer::new("ghost", "Ghost", "/nonexistent/runner.sh");

        let result = LayerExecutor::new(false, false).execute(&layer, &[]).await;
        assert!(!result.success);
        assert!(result.output.contains("spawn failed"));
    }

    #[tokio::test]
    async fn test_child_sees_composed_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "env.sh", "echo \"SQLITE_FILE=$SQLITE_FILE\"\n");
        let layer = Layer::new("env", "Env", path).with_env("SQLITE_FILE", "./layer.db");

        let overrides = vec!["SQLITE_FILE=:memory:".parse().unwrap()];
        let result = LayerExecutor::new(false, false)
            .execute(&layer, &overrides)
            .await;

        assert!(result.success);
        assert!(result.output.contains("SQLITE_FILE=:memory:"));
    }

    #[tokio::test]
    async fn test_parallel_mode_streams_without_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "stream.sh", "echo streamed\nexit 1\n");
        let layer = Layer::new("stream", "Stream", path);

        let result = LayerExecutor::new(false, true).execute(&layer, &[]).await;
        assert!(!result.success);
        assert!(result.output.is_empty());
    }
}
