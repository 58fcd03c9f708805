//! The harness facade: the surface a dashboard (or CLI) consumes.

use crate::coordinator::RunLock;
use crate::error::HarnessError;
use crate::outcome::Outcome;
use crate::registry::ScenarioRegistry;
use crate::report::{Aggregate, Summary, Verdict};
use crate::scenario::Scenario;
use crate::store::ResultStore;
use chainprobe_chain::ChainCapability;
use std::sync::Arc;
use std::time::Duration;

/// Harness tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    /// Upper bound on a single scenario run. When it expires, the run is
    /// recorded as errored and the coordinator returns to idle; without
    /// it, a hung external call leaves the harness busy indefinitely.
    pub run_timeout: Option<Duration>,
}

impl HarnessConfig {
    /// Creates the default configuration (no per-run timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-run timeout.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }
}

/// Orchestrates scenario execution against one chain capability.
///
/// Owns the registry, the single-flight coordinator, and the result
/// store. All methods take `&self`; the store and lock use interior
/// mutability so a UI can hold the harness behind an `Arc` and read
/// aggregates from its render loop while a run is in flight.
pub struct Harness {
    registry: ScenarioRegistry,
    chain: Arc<dyn ChainCapability>,
    lock: RunLock,
    store: ResultStore,
    config: HarnessConfig,
}

impl Harness {
    /// Creates a harness with default configuration.
    pub fn new(registry: ScenarioRegistry, chain: Arc<dyn ChainCapability>) -> Self {
        Self::with_config(registry, chain, HarnessConfig::default())
    }

    /// Creates a harness with explicit configuration.
    pub fn with_config(
        registry: ScenarioRegistry,
        chain: Arc<dyn ChainCapability>,
        config: HarnessConfig,
    ) -> Self {
        Self {
            registry,
            chain,
            lock: RunLock::new(),
            store: ResultStore::new(),
            config,
        }
    }

    /// Returns the registered scenarios in declaration order.
    pub fn scenarios(&self) -> Vec<&dyn Scenario> {
        self.registry.list()
    }

    /// Whether a scenario run is currently in flight. Consumers disable
    /// their run triggers while this reports true.
    pub fn is_busy(&self) -> bool {
        self.lock.is_busy()
    }

    /// Runs one scenario and records its outcome.
    ///
    /// Fails with [`HarnessError::NotFound`] for an unregistered id and
    /// [`HarnessError::Busy`] while another run is in flight; in both
    /// cases the store is left untouched. Everything that happens inside
    /// the runner (capability failures, timeout) is captured into the
    /// recorded [`Outcome`] instead of being raised.
    pub async fn run_one(&self, id: &str) -> Result<Outcome, HarnessError> {
        let scenario = self.registry.get(id)?;
        let _guard = self.lock.try_acquire()?;

        tracing::debug!(scenario = id, "scenario run started");
        let outcome = self.execute(scenario).await;
        tracing::info!(scenario = id, status = %outcome.status, "scenario run settled");

        self.store.record(id, outcome.clone());
        Ok(outcome)
    }

    /// Runs every registered scenario sequentially, in declaration order.
    ///
    /// One scenario's failure or error never prevents the next from
    /// running; each outcome lands in the store as its run settles. Only
    /// [`HarnessError::Busy`] can surface, when another run was already
    /// in flight.
    pub async fn run_all(&self) -> Result<(), HarnessError> {
        let ids: Vec<String> = self
            .registry
            .list()
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        for id in ids {
            self.run_one(&id).await?;
        }
        Ok(())
    }

    /// Returns the latest outcome for a scenario, or `None` when it has
    /// not run since the last reset.
    pub fn outcome(&self, id: &str) -> Option<Outcome> {
        self.store.get(id)
    }

    /// Resets every scenario to "not yet run".
    pub fn reset(&self) {
        self.store.clear();
    }

    /// Computes the current aggregate from a live store snapshot.
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::compute(&self.registry, &self.store.snapshot())
    }

    /// Completion ratio in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.aggregate().progress()
    }

    /// Pass counts over recorded outcomes.
    pub fn summary(&self) -> Summary {
        self.aggregate().summary()
    }

    /// Security verdict gated by the critical scenarios.
    pub fn critical_verdict(&self) -> Verdict {
        self.aggregate().critical_verdict()
    }

    /// Settles one runner into an outcome. This is the uniform wrapping:
    /// nothing a runner does can escape past here.
    async fn execute(&self, scenario: &dyn Scenario) -> Outcome {
        let run = scenario.run(self.chain.as_ref());

        let settled = match self.config.run_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, run).await {
                Ok(settled) => settled,
                Err(_) => {
                    tracing::warn!(scenario = scenario.id(), ?timeout, "scenario timed out");
                    return Outcome::errored(format!("timed out after {timeout:?}"));
                }
            },
            None => run.await,
        };

        match settled {
            Ok(report) if report.success => Outcome::passed(report.detail, report.metrics),
            Ok(report) => Outcome::failed(report.detail, report.metrics),
            Err(err) => {
                tracing::warn!(scenario = scenario.id(), error = %err, "scenario errored");
                Outcome::errored(err.to_string())
            }
        }
    }
}
