//! Run orchestration
//!
//! Decides the requested layer set, resolves execution order, drives
//! sequential or parallel execution, and applies the fail-fast policy.
//! All fatal planning errors surface before any process is spawned.

use futures::future::join_all;
use std::path::Path;
use tracing::debug;

use crate::cli::ExecutionOptions;
use crate::error::RunnerError;
use crate::executor::LayerExecutor;
use crate::models::{ExecutionResult, RunSummary};
use crate::output::Reporter;
use crate::registry::LayerRegistry;
use crate::resolver::resolve_order;
use crate::utils::Timer;

/// Ordered sequence of layer keys to execute.
///
/// Order is significant in sequential mode; parallel mode preserves the
/// requested order as declared but does not act on it.
#[derive(Clone, Debug)]
pub struct ExecutionPlan {
    pub layers: Vec<String>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

/// Drives one run from planning through reporting
pub struct Orchestrator {
    registry: LayerRegistry,
    options: ExecutionOptions,
}

impl Orchestrator {
    pub fn new(registry: LayerRegistry, options: ExecutionOptions) -> Self {
        Self { registry, options }
    }

    /// Resolve requested-minus-excluded keys into an execution plan.
    ///
    /// Any unknown requested or excluded name is fatal. In parallel mode
    /// the dependency resolver is skipped and the declared order kept.
    pub fn plan(&self) -> Result<ExecutionPlan, RunnerError> {
        for key in &self.options.excluded {
            if !self.registry.contains(key) {
                return Err(RunnerError::UnknownLayer(key.clone()));
            }
        }

        let requested = if self.options.requested.is_empty() {
            self.registry.keys()
        } else {
            self.options.requested.clone()
        };

        for key in &requested {
            if !self.registry.contains(key) {
                return Err(RunnerError::UnknownLayer(key.clone()));
            }
        }

        let selected: Vec<String> = requested
            .into_iter()
            .filter(|key| !self.options.excluded.contains(key))
            .collect();

        let layers = if self.options.parallel {
            selected
        } else {
            resolve_order(&selected, &self.registry)?
        };

        debug!("planned {} layer(s)", layers.len());
        Ok(ExecutionPlan { layers })
    }

    /// Every planned layer's runner must exist on disk before any spawn
    fn check_runners(&self, plan: &ExecutionPlan) -> Result<(), RunnerError> {
        for key in &plan.layers {
            if let Some(layer) = self.registry.get(key) {
                if !Path::new(&layer.path).exists() {
                    return Err(RunnerError::MissingRunner {
                        layer: layer.key.clone(),
                        path: layer.path.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Plan, execute, and report one run
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let plan = self.plan()?;

        if plan.is_empty() {
            println!("{}", Reporter::render_no_layers());
            return Ok(RunSummary::empty());
        }

        self.check_runners(&plan)?;

        print!(
            "{}",
            Reporter::render_plan(&plan.layers, &self.registry, &self.options)
        );

        if self.options.dry_run {
            print!("{}", Reporter::render_dry_run(&plan.layers, &self.registry));
            return Ok(RunSummary::empty());
        }

        if !self.options.env_overrides.is_empty() {
            println!("{}", Reporter::render_overrides(&self.options));
        }

        let timer = Timer::start("run");
        let results = if self.options.parallel {
            self.run_parallel(&plan).await
        } else {
            self.run_sequential(&plan).await
        };

        let total = timer.stop();
        let summary = RunSummary::new(results, total.as_millis() as u64);
        print!("{}", Reporter::render_summary(&summary, &self.registry));

        Ok(summary)
    }

    /// Strict await-chain: layer N+1 does not start until N's result is
    /// known. Under fail-fast, layers after the first failure are skipped
    /// entirely and absent from the results.
    async fn run_sequential(&self, plan: &ExecutionPlan) -> Vec<ExecutionResult> {
        let executor = LayerExecutor::new(self.options.verbose, false);
        let mut results = Vec::with_capacity(plan.len());

        for key in &plan.layers {
            let Some(layer) = self.registry.get(key) else {
                continue;
            };

            let result = executor.execute(layer, &self.options.env_overrides).await;
            let failed = !result.success;
            results.push(result);

            if failed && self.options.fail_fast {
                println!("\x1b[31mStopping due to failure (--fail-fast enabled)\x1b[0m");
                break;
            }
        }

        results
    }

    /// Fan-out every planned layer at once, fan-in on completion. Each
    /// completion appends its own result; fail-fast has no effect here
    /// since all layers are already in flight.
    async fn run_parallel(&self, plan: &ExecutionPlan) -> Vec<ExecutionResult> {
        let mut handles = Vec::with_capacity(plan.len());

        for key in &plan.layers {
            let Some(layer) = self.registry.get(key) else {
                continue;
            };

            let layer = layer.clone();
            let overrides = self.options.env_overrides.clone();
            let verbose = self.options.verbose;

            handles.push(tokio::spawn(async move {
                LayerExecutor::new(verbose, true)
                    .execute(&layer, &overrides)
                    .await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| joined.ok())
            .collect()
    }
}
