//! # chainprobe-harness
//!
//! Scenario test-orchestration engine for DeFi protocol deployments.
//!
//! The harness drives named multi-step workflows (scenarios) against an
//! external wallet/contract capability, with per-scenario failure
//! isolation, single-flight serialization, and live aggregation:
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌──────────────────┐
//! │ Registry │────▶│  RunLock  │────▶│ Scenario runner  │
//! └──────────┘     └───────────┘     └──────────────────┘
//!                        │                    │
//!                        ▼                    ▼
//!                 ┌─────────────┐     ┌────────────────┐
//!                 │ ResultStore │◀────│ ChainCapability│
//!                 └─────────────┘     └────────────────┘
//!                        │
//!                        ▼
//!                  Aggregate (progress / summary / verdict)
//! ```
//!
//! At most one scenario run is in flight at any instant: the underlying
//! wallet cannot safely process concurrent requests, so a second trigger
//! is rejected with [`HarnessError::Busy`] while one is running. A
//! runner's failure only ever affects its own recorded [`Outcome`].

mod coordinator;
mod error;
mod harness;
mod outcome;
mod registry;
mod report;
mod scenario;
pub mod scenarios;
mod store;

pub use coordinator::{RunGuard, RunLock};
pub use error::HarnessError;
pub use harness::{Harness, HarnessConfig};
pub use outcome::{MetricValue, Metrics, Outcome, OutcomeStatus, RunReport};
pub use registry::ScenarioRegistry;
pub use report::{Aggregate, Summary, Verdict};
pub use scenario::Scenario;
pub use store::ResultStore;
