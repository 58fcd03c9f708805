//! Critical security probes.
//!
//! These run against the live wallet, so they are written to prove a
//! negative (our wallet cannot do the privileged thing) rather than to
//! exercise the privileged path itself. When a probe does manage to
//! mutate protocol state it was not supposed to, it undoes the mutation
//! before reporting the failure.

use crate::outcome::RunReport;
use crate::scenario::Scenario;
use async_trait::async_trait;
use chainprobe_chain::{Address, Amount, ChainCapability, ChainError};

/// Spender used by the allowance probe. Nothing ever pulls from it.
const PROBE_SPENDER: &str = "0x00000000000000000000000000000000c0ffee01";

/// Allowance granted (and then revoked) by the allowance probe.
const PROBE_CAP: Amount = 1_000;

/// Verifies the connected wallet holds no privileged protocol roles.
///
/// A dashboard wallet with `admin` or `pauser` rights is one misclick
/// away from taking the protocol down, so holding either role fails the
/// probe even though nothing privileged was attempted.
pub struct AdminRoleScenario;

#[async_trait]
impl Scenario for AdminRoleScenario {
    fn id(&self) -> &str {
        "security.admin-role"
    }

    fn name(&self) -> &str {
        "Admin role audit"
    }

    fn description(&self) -> &str {
        "Checks that the connected wallet holds neither the admin nor the pauser role"
    }

    fn critical(&self) -> bool {
        true
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let signer = chain.signer().await?;
        let holds_admin = chain.has_role("admin", &signer.address).await?;
        let holds_pauser = chain.has_role("pauser", &signer.address).await?;

        let clean = !holds_admin && !holds_pauser;
        let detail = if clean {
            "wallet holds no privileged roles".to_string()
        } else {
            format!(
                "wallet {} holds a privileged role (admin: {holds_admin}, pauser: {holds_pauser})",
                signer.address
            )
        };
        Ok(RunReport::new(clean, detail)
            .with_metric("holds_admin", holds_admin)
            .with_metric("holds_pauser", holds_pauser)
            .with_metric("wallet", signer.address.to_string()))
    }
}

/// Verifies the pause switch rejects an unprivileged wallet.
///
/// The probe attempts `set_paused(true)` and expects a revert. If the
/// call is accepted the protocol let us pause it, which is the finding;
/// the probe un-pauses before reporting so the chain is not left frozen.
pub struct PauseControlScenario;

#[async_trait]
impl Scenario for PauseControlScenario {
    fn id(&self) -> &str {
        "security.pause-control"
    }

    fn name(&self) -> &str {
        "Pause switch access"
    }

    fn description(&self) -> &str {
        "Attempts to pause the protocol and expects the call to revert"
    }

    fn critical(&self) -> bool {
        true
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let signer = chain.signer().await?;
        match chain.set_paused(true).await {
            Err(ChainError::Reverted(reason)) => Ok(RunReport::new(
                true,
                "pause switch rejected the unprivileged wallet",
            )
            .with_metric("revert_reason", reason)
            .with_metric("wallet", signer.address.to_string())),
            Err(other) => Err(other),
            Ok(receipt) => {
                // We just paused the protocol. Undo before reporting.
                chain.set_paused(false).await?;
                Ok(RunReport::new(
                    false,
                    "pause switch accepted the unprivileged wallet",
                )
                .with_metric("tx_hash", receipt.tx_hash)
                .with_metric("wallet", signer.address.to_string()))
            }
        }
    }
}

/// Grants a bounded allowance to a dead-end spender, verifies the cap is
/// exactly what was approved, then revokes it and verifies the revoke.
pub struct AllowanceCapScenario {
    spender: Address,
    cap: Amount,
}

impl Default for AllowanceCapScenario {
    fn default() -> Self {
        Self {
            spender: Address::new(PROBE_SPENDER),
            cap: PROBE_CAP,
        }
    }
}

#[async_trait]
impl Scenario for AllowanceCapScenario {
    fn id(&self) -> &str {
        "security.allowance-cap"
    }

    fn name(&self) -> &str {
        "Allowance cap round trip"
    }

    fn description(&self) -> &str {
        "Approves a bounded allowance, verifies it, then revokes it"
    }

    fn critical(&self) -> bool {
        true
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let owner = chain.signer().await?.address;

        chain.approve(&self.spender, self.cap).await?;
        let granted = chain.allowance(&owner, &self.spender).await?;
        if granted != self.cap {
            // Revoke whatever the token actually recorded.
            chain.approve(&self.spender, 0).await?;
            return Ok(RunReport::new(
                false,
                format!("allowance after approve is {granted}, expected {}", self.cap),
            )
            .with_metric("granted", granted));
        }

        chain.approve(&self.spender, 0).await?;
        let residual = chain.allowance(&owner, &self.spender).await?;
        let revoked = residual == 0;
        let detail = if revoked {
            "allowance granted and revoked cleanly".to_string()
        } else {
            format!("allowance after revoke is {residual}, expected 0")
        };
        Ok(RunReport::new(revoked, detail)
            .with_metric("granted", granted)
            .with_metric("residual", residual))
    }
}
