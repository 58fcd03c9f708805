//! Built-in scenario catalogue.
//!
//! Three families: security probes (critical, they gate the overall
//! verdict), yield-strategy round trips, and token-suite checks. Each
//! scenario drives only the [`ChainCapability`] it is handed and reverses
//! its own side effects where the protocol allows it, so a full pass
//! leaves balances where it found them.
//!
//! [`ChainCapability`]: chainprobe_chain::ChainCapability

mod security;
mod token_suite;
mod yield_strategy;

pub use security::{AdminRoleScenario, AllowanceCapScenario, PauseControlScenario};
pub use token_suite::{LiquidityScenario, TransferScenario};
pub use yield_strategy::{StakeCycleScenario, VaultRoundTripScenario};

use crate::scenario::Scenario;

/// The full catalogue in its canonical order: security first, then
/// yield, then token suite.
pub fn catalogue() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(AdminRoleScenario),
        Box::new(PauseControlScenario),
        Box::new(AllowanceCapScenario::default()),
        Box::new(StakeCycleScenario::default()),
        Box::new(VaultRoundTripScenario::default()),
        Box::new(TransferScenario::default()),
        Box::new(LiquidityScenario::default()),
    ]
}

/// Only the critical security probes.
pub fn security_catalogue() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(AdminRoleScenario),
        Box::new(PauseControlScenario),
        Box::new(AllowanceCapScenario::default()),
    ]
}
