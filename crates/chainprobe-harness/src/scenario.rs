//! The `Scenario` trait.

use crate::outcome::RunReport;
use async_trait::async_trait;
use chainprobe_chain::{ChainCapability, ChainError};

/// A named, registered test workflow against the protocol.
///
/// Scenarios are immutable definitions: metadata plus a runner. The
/// runner performs one or more calls through the injected
/// [`ChainCapability`] and reports a [`RunReport`] on the non-error path.
/// A raised [`ChainError`] is recorded as an errored outcome by the
/// harness; it never aborts sibling scenarios.
///
/// Runners may assume they are never invoked concurrently with another
/// scenario (the harness serializes runs), but they must not rely on any
/// particular sibling having run before them.
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Unique stable id (e.g. `"stake-cycle"`).
    fn id(&self) -> &str;

    /// Short display name.
    fn name(&self) -> &str;

    /// Human-readable description of what the scenario probes.
    fn description(&self) -> &str;

    /// Whether this scenario gates the overall security verdict.
    ///
    /// Only meaningful for the security family; defaults to `false`.
    fn critical(&self) -> bool {
        false
    }

    /// Executes the workflow against the capability.
    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError>;
}

impl std::fmt::Debug for dyn Scenario + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("id", &self.id()).finish()
    }
}
