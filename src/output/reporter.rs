//! Run reporting
//!
//! Pure presentation over execution results: every function renders to a
//! `String` and is deterministic given the same inputs. Callers decide
//! when to print.

use crate::cli::ExecutionOptions;
use crate::models::{Layer, RunSummary, RESET};
use crate::registry::LayerRegistry;

const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";

/// Stateless renderer for all user-facing output
pub struct Reporter;

impl Reporter {
    /// Banner plus execution plan: mode, ordered layer list, advisory flags
    pub fn render_plan(
        plan: &[String],
        registry: &LayerRegistry,
        options: &ExecutionOptions,
    ) -> String {
        let mut out = String::new();

        out.push_str(&format!("{BOLD}{BLUE}🧪 Layer Test Runner{RESET}\n"));
        out.push_str(&format!("{BOLD}{}{RESET}\n", "=".repeat(50)));

        if options.dry_run {
            out.push_str(&format!("{BOLD}DRY RUN - Execution Plan:{RESET}\n"));
        }

        let mode = if options.parallel {
            format!("{YELLOW}Parallel{RESET}")
        } else {
            format!("{GREEN}Sequential{RESET}")
        };
        out.push_str(&format!("Mode: {mode}\n"));

        let layers = plan
            .iter()
            .map(|key| match registry.get(key) {
                Some(layer) => layer.color.paint(key),
                None => key.clone(),
            })
            .collect::<Vec<_>>()
            .join(" → ");
        out.push_str(&format!("Layers: {layers}\n"));

        if options.watch {
            out.push_str(&format!("{CYAN}Watch mode enabled{RESET}\n"));
        }

        out.push('\n');
        out
    }

    /// Dry-run command listing; nothing is executed
    pub fn render_dry_run(plan: &[String], registry: &LayerRegistry) -> String {
        let mut out = format!("{BOLD}Would execute:{RESET}\n");

        for key in plan {
            if let Some(layer) = registry.get(key) {
                out.push_str(&format!(
                    "  {}: {}\n",
                    layer.color.paint(&layer.name),
                    layer.path
                ));
            }
        }

        out
    }

    /// Global `--env` overrides applied to every executed layer
    pub fn render_overrides(options: &ExecutionOptions) -> String {
        let pairs = options
            .env_overrides
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("Global environment overrides: {pairs}\n")
    }

    pub fn render_layer_start(layer: &Layer) -> String {
        layer
            .color
            .paint(format!("▶ Running {} tests...", layer.name))
    }

    pub fn render_layer_result(layer: &Layer, success: bool, duration_ms: u64) -> String {
        let status = if success {
            layer.color.paint(format!("✓ {} tests passed", layer.name))
        } else {
            format!("{RED}✗ {} tests failed{RESET}", layer.name)
        };
        format!("{status} {GRAY}({duration_ms}ms){RESET}")
    }

    pub fn render_spawn_error(layer: &Layer, error: &str) -> String {
        format!("{RED}✗ {} tests errored: {error}{RESET}", layer.name)
    }

    /// Buffered output replay for a failed layer, one vertical-bar marker
    /// per non-empty line
    pub fn render_failure_output(layer: &Layer, captured: &str) -> String {
        let rule = format!("{GRAY}{}{RESET}", "─".repeat(40));
        let mut out = format!("\n{GRAY}{} Test Output:{RESET}\n{rule}\n", layer.name);

        for line in captured.lines() {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("{GRAY}│{RESET} {line}\n"));
            }
        }

        out.push_str(&rule);
        out.push('\n');
        out
    }

    /// Final tally: pass/fail counts, failed layer names, total time
    pub fn render_summary(summary: &RunSummary, registry: &LayerRegistry) -> String {
        let mut out = String::new();

        out.push_str(&format!("\n{BOLD}Test Summary{RESET}\n"));
        out.push_str(&format!("{}\n", "=".repeat(20)));
        out.push_str(&format!("{GREEN}✓ Passed: {}{RESET}\n", summary.passed));
        out.push_str(&format!("{RED}✗ Failed: {}{RESET}\n", summary.failed));
        out.push_str(&format!(
            "{GRAY}Total time: {}ms{RESET}\n",
            summary.total_duration_ms
        ));

        if summary.failed > 0 {
            out.push_str(&format!("\n{RED}Failed layers:{RESET}\n"));
            for key in summary.failed_keys() {
                let name = registry.get(key).map(|l| l.name.as_str()).unwrap_or(key);
                out.push_str(&format!("  {RED}✗ {name}{RESET}\n"));
            }
        } else {
            out.push_str(&format!("\n{GREEN}All tests passed! 🎉{RESET}\n"));
        }

        out
    }

    pub fn render_no_layers() -> String {
        format!("{YELLOW}No test layers to run.{RESET}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionResult;

    fn options() -> ExecutionOptions {
        ExecutionOptions::default()
    }

    #[test]
    fn test_plan_sequential_mode() {
        let registry = LayerRegistry::builtin();
        let plan = vec!["domain".to_string(), "application".to_string()];

        let rendered = Reporter::render_plan(&plan, &registry, &options());
        assert!(rendered.contains("Sequential"));
        assert!(rendered.contains("domain"));
        assert!(rendered.contains("→"));
    }

    #[test]
    fn test_plan_parallel_and_watch() {
        let registry = LayerRegistry::builtin();
        let plan = vec!["domain".to_string()];
        let opts = ExecutionOptions {
            parallel: true,
            watch: true,
            ..Default::default()
        };

        let rendered = Reporter::render_plan(&plan, &registry, &opts);
        assert!(rendered.contains("Parallel"));
        assert!(rendered.contains("Watch mode enabled"));
    }

    #[test]
    fn test_dry_run_lists_commands() {
        let registry = LayerRegistry::builtin();
        let plan = vec!["domain".to_string(), "e2e".to_string()];

        let rendered = Reporter::render_dry_run(&plan, &registry);
        assert!(rendered.contains("Would execute:"));
        assert!(rendered.contains("tests/domain/run.sh"));
        assert!(rendered.contains("tests/e2e/run.sh"));
    }

    #[test]
    fn test_summary_counts_and_failures() {
        let registry = LayerRegistry::builtin();
        let summary = RunSummary::new(
            vec![
                ExecutionResult::passed("domain", 10),
                ExecutionResult::failed("application", 20),
            ],
            35,
        );

        let rendered = Reporter::render_summary(&summary, &registry);
        assert!(rendered.contains("✓ Passed: 1"));
        assert!(rendered.contains("✗ Failed: 1"));
        assert!(rendered.contains("Failed layers:"));
        assert!(rendered.contains("Application"));
        assert!(rendered.contains("Total time: 35ms"));
    }

    #[test]
    fn test_summary_all_passed() {
        let registry = LayerRegistry::builtin();
        let summary = RunSummary::new(vec![ExecutionResult::passed("domain", 10)], 12);

        let rendered = Reporter::render_summary(&summary, &registry);
        assert!(rendered.contains("All tests passed!"));
        assert!(!rendered.contains("Failed layers:"));
    }

    #[test]
    fn test_failure_output_markers() {
        let layer = Layer::new("domain", "Domain", "d.sh");
        let rendered = Reporter::render_failure_output(&layer, "line one\n\nline two\n");

        assert!(rendered.contains("Domain Test Output:"));
        assert_eq!(rendered.matches("│").count(), 2);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let registry = LayerRegistry::builtin();
        let summary = RunSummary::new(vec![ExecutionResult::failed("e2e", 5)], 5);

        let a = Reporter::render_summary(&summary, &registry);
        let b = Reporter::render_summary(&summary, &registry);
        assert_eq!(a, b);
    }
}
