//! Yield-strategy round trips: staking and the vault.

use crate::outcome::RunReport;
use crate::scenario::Scenario;
use async_trait::async_trait;
use chainprobe_chain::{Amount, ChainCapability, ChainError};

/// Stakes a fixed amount, verifies both balances moved by exactly that
/// amount, then unstakes and verifies the full restore.
pub struct StakeCycleScenario {
    amount: Amount,
}

impl Default for StakeCycleScenario {
    fn default() -> Self {
        Self { amount: 1_000 }
    }
}

#[async_trait]
impl Scenario for StakeCycleScenario {
    fn id(&self) -> &str {
        "yield.stake-cycle"
    }

    fn name(&self) -> &str {
        "Stake and unstake cycle"
    }

    fn description(&self) -> &str {
        "Stakes a fixed amount, checks the position, then unstakes it"
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let me = chain.signer().await?.address;
        let balance_before = chain.balance_of(&me).await?;
        if balance_before < self.amount {
            return Ok(RunReport::new(
                false,
                format!(
                    "balance {balance_before} is below the probe amount {}",
                    self.amount
                ),
            ));
        }
        let staked_before = chain.staked_balance(&me).await?;

        chain.stake(self.amount).await?;
        let staked_mid = chain.staked_balance(&me).await?;
        let balance_mid = chain.balance_of(&me).await?;

        chain.unstake(self.amount).await?;
        let staked_after = chain.staked_balance(&me).await?;
        let balance_after = chain.balance_of(&me).await?;
        let rate = chain.reward_rate().await?;

        let moved = staked_mid == staked_before + self.amount
            && balance_mid == balance_before - self.amount;
        let restored = staked_after == staked_before && balance_after == balance_before;

        let detail = if moved && restored {
            format!("staked and unstaked {} cleanly", self.amount)
        } else if !moved {
            "stake did not move balances by the staked amount".to_string()
        } else {
            "unstake did not restore the original balances".to_string()
        };
        Ok(RunReport::new(moved && restored, detail)
            .with_metric("amount", self.amount)
            .with_metric("reward_rate", rate))
    }
}

/// Deposits into the vault, captures the minted shares, withdraws them
/// all, and verifies the token balance came back whole.
pub struct VaultRoundTripScenario {
    amount: Amount,
}

impl Default for VaultRoundTripScenario {
    fn default() -> Self {
        Self { amount: 2_500 }
    }
}

#[async_trait]
impl Scenario for VaultRoundTripScenario {
    fn id(&self) -> &str {
        "yield.vault-round-trip"
    }

    fn name(&self) -> &str {
        "Vault deposit round trip"
    }

    fn description(&self) -> &str {
        "Deposits into the vault, then withdraws the minted shares"
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let me = chain.signer().await?.address;
        let balance_before = chain.balance_of(&me).await?;
        if balance_before < self.amount {
            return Ok(RunReport::new(
                false,
                format!(
                    "balance {balance_before} is below the probe amount {}",
                    self.amount
                ),
            ));
        }
        let shares_before = chain.vault_balance(&me).await?;

        chain.deposit(self.amount).await?;
        let minted = chain.vault_balance(&me).await?.saturating_sub(shares_before);
        if minted == 0 {
            return Ok(RunReport::new(false, "deposit minted no vault shares")
                .with_metric("amount", self.amount));
        }

        chain.withdraw(minted).await?;
        let shares_after = chain.vault_balance(&me).await?;
        let balance_after = chain.balance_of(&me).await?;
        let price = chain.share_price().await?;

        let restored = shares_after == shares_before && balance_after == balance_before;
        let detail = if restored {
            format!("deposited {} and withdrew {minted} shares cleanly", self.amount)
        } else {
            format!(
                "withdraw left shares at {shares_after} and balance at {balance_after}"
            )
        };
        Ok(RunReport::new(restored, detail)
            .with_metric("amount", self.amount)
            .with_metric("minted_shares", minted)
            .with_metric("share_price", price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainprobe_chain::testing::SimulatedChain;

    #[tokio::test]
    async fn test_stake_cycle_passes_and_restores_balances() {
        let chain = SimulatedChain::new().with_balance(10_000);
        let report = StakeCycleScenario::default().run(&chain).await.unwrap();

        assert!(report.success, "{}", report.detail);
        let me = chain.signer_address();
        assert_eq!(chain.balance_of(&me).await.unwrap(), 10_000);
        assert_eq!(chain.staked_balance(&me).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stake_cycle_reports_failed_on_low_balance() {
        let chain = SimulatedChain::new().with_balance(10);
        let report = StakeCycleScenario::default().run(&chain).await.unwrap();
        assert!(!report.success);
        assert!(report.detail.contains("below the probe amount"));
    }

    #[tokio::test]
    async fn test_stake_cycle_propagates_paused_revert() {
        let chain = SimulatedChain::new().with_role("pauser");
        chain.set_paused(true).await.unwrap();

        let err = StakeCycleScenario::default().run(&chain).await.unwrap_err();
        assert!(matches!(err, ChainError::Reverted(ref r) if r.contains("paused")));
    }

    #[tokio::test]
    async fn test_stake_cycle_reports_reward_rate_metric() {
        let chain = SimulatedChain::new().with_reward_rate(0.07);
        let report = StakeCycleScenario::default().run(&chain).await.unwrap();
        assert_eq!(
            report.metrics.get("reward_rate").map(ToString::to_string),
            Some("0.07".to_string())
        );
    }

    #[tokio::test]
    async fn test_vault_round_trip_passes() {
        let chain = SimulatedChain::new().with_balance(50_000);
        let report = VaultRoundTripScenario::default().run(&chain).await.unwrap();

        assert!(report.success, "{}", report.detail);
        let me = chain.signer_address();
        assert_eq!(chain.balance_of(&me).await.unwrap(), 50_000);
        assert_eq!(chain.vault_balance(&me).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_vault_round_trip_propagates_chain_errors() {
        let chain = SimulatedChain::new();
        chain.fail_next("deposit", ChainError::Rpc("node down".into()));

        let err = VaultRoundTripScenario::default()
            .run(&chain)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Rpc(_)));
    }
}
