//! Token-suite checks: transfer accounting and pool liquidity.

use crate::outcome::RunReport;
use crate::scenario::Scenario;
use async_trait::async_trait;
use chainprobe_chain::{Address, Amount, ChainCapability, ChainError};

/// Where probe transfers land. The conventional burn address, so the
/// probe never enriches a live account.
const PROBE_SINK: &str = "0x000000000000000000000000000000000000dEaD";

/// Transfers a fixed amount to the sink and verifies both balances moved
/// by exactly that amount.
pub struct TransferScenario {
    amount: Amount,
}

impl Default for TransferScenario {
    fn default() -> Self {
        Self { amount: 750 }
    }
}

#[async_trait]
impl Scenario for TransferScenario {
    fn id(&self) -> &str {
        "token.transfer"
    }

    fn name(&self) -> &str {
        "Token transfer accounting"
    }

    fn description(&self) -> &str {
        "Transfers a fixed amount to the burn address and checks both balances"
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let me = chain.signer().await?.address;
        let sink = Address::new(PROBE_SINK);

        let mine_before = chain.balance_of(&me).await?;
        if mine_before < self.amount {
            return Ok(RunReport::new(
                false,
                format!(
                    "balance {mine_before} is below the probe amount {}",
                    self.amount
                ),
            ));
        }
        let sink_before = chain.balance_of(&sink).await?;

        let receipt = chain.transfer(&sink, self.amount).await?;

        let mine_after = chain.balance_of(&me).await?;
        let sink_after = chain.balance_of(&sink).await?;
        let balanced = mine_after == mine_before - self.amount
            && sink_after == sink_before + self.amount;

        let detail = if balanced {
            format!("transferred {} with exact accounting", self.amount)
        } else {
            format!(
                "transfer accounting is off: sender moved {}, sink moved {}",
                mine_before - mine_after,
                sink_after - sink_before
            )
        };
        Ok(RunReport::new(balanced, detail)
            .with_metric("amount", self.amount)
            .with_metric("block", receipt.block))
    }
}

/// Adds liquidity to the pool, verifies both reserve legs moved, then
/// removes the minted shares and verifies the pool and wallet restore.
pub struct LiquidityScenario {
    amount_a: Amount,
    amount_b: Amount,
}

impl Default for LiquidityScenario {
    fn default() -> Self {
        Self {
            amount_a: 3_000,
            amount_b: 3_000,
        }
    }
}

#[async_trait]
impl Scenario for LiquidityScenario {
    fn id(&self) -> &str {
        "token.liquidity"
    }

    fn name(&self) -> &str {
        "Pool liquidity round trip"
    }

    fn description(&self) -> &str {
        "Adds liquidity to the pool, then removes the minted shares"
    }

    async fn run(&self, chain: &dyn ChainCapability) -> Result<RunReport, ChainError> {
        let me = chain.signer().await?.address;
        let total = self.amount_a + self.amount_b;

        let balance_before = chain.balance_of(&me).await?;
        if balance_before < total {
            return Ok(RunReport::new(
                false,
                format!("balance {balance_before} is below the probe amount {total}"),
            ));
        }
        let shares_before = chain.lp_balance(&me).await?;
        let (reserve_a, reserve_b) = chain.pool_reserves().await?;

        chain.add_liquidity(self.amount_a, self.amount_b).await?;
        let (mid_a, mid_b) = chain.pool_reserves().await?;
        if mid_a != reserve_a + self.amount_a || mid_b != reserve_b + self.amount_b {
            return Ok(RunReport::new(
                false,
                "pool reserves did not grow by the added amounts",
            )
            .with_metric("reserve_a", mid_a)
            .with_metric("reserve_b", mid_b));
        }

        let minted = chain.lp_balance(&me).await?.saturating_sub(shares_before);
        if minted == 0 {
            return Ok(RunReport::new(false, "add_liquidity minted no shares"));
        }

        chain.remove_liquidity(minted).await?;
        let shares_after = chain.lp_balance(&me).await?;
        let balance_after = chain.balance_of(&me).await?;
        let reserves_after = chain.pool_reserves().await?;

        let restored = shares_after == shares_before
            && balance_after == balance_before
            && reserves_after == (reserve_a, reserve_b);
        let detail = if restored {
            format!("added and removed {minted} pool shares cleanly")
        } else {
            "remove_liquidity did not restore the pool and wallet".to_string()
        };
        Ok(RunReport::new(restored, detail)
            .with_metric("minted_shares", minted)
            .with_metric("reserve_a", reserves_after.0)
            .with_metric("reserve_b", reserves_after.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainprobe_chain::testing::SimulatedChain;

    #[tokio::test]
    async fn test_transfer_passes_with_exact_accounting() {
        let chain = SimulatedChain::new().with_balance(5_000);
        let report = TransferScenario::default().run(&chain).await.unwrap();

        assert!(report.success, "{}", report.detail);
        let me = chain.signer_address();
        assert_eq!(chain.balance_of(&me).await.unwrap(), 5_000 - 750);
        assert_eq!(
            chain.balance_of(&Address::new(PROBE_SINK)).await.unwrap(),
            750
        );
    }

    #[tokio::test]
    async fn test_transfer_reports_failed_on_low_balance() {
        let chain = SimulatedChain::new().with_balance(100);
        let report = TransferScenario::default().run(&chain).await.unwrap();
        assert!(!report.success);
        assert!(report.detail.contains("below the probe amount"));
    }

    #[tokio::test]
    async fn test_transfer_propagates_not_connected() {
        let chain = SimulatedChain::disconnected();
        let err = TransferScenario::default().run(&chain).await.unwrap_err();
        assert!(matches!(err, ChainError::NotConnected));
    }

    #[tokio::test]
    async fn test_liquidity_round_trip_passes() {
        let chain = SimulatedChain::new().with_balance(100_000);
        let (reserve_a, reserve_b) = chain.pool_reserves().await.unwrap();

        let report = LiquidityScenario::default().run(&chain).await.unwrap();

        assert!(report.success, "{}", report.detail);
        let me = chain.signer_address();
        assert_eq!(chain.balance_of(&me).await.unwrap(), 100_000);
        assert_eq!(chain.lp_balance(&me).await.unwrap(), 0);
        assert_eq!(chain.pool_reserves().await.unwrap(), (reserve_a, reserve_b));
    }

    #[tokio::test]
    async fn test_liquidity_propagates_chain_errors() {
        let chain = SimulatedChain::new();
        chain.fail_next("add_liquidity", ChainError::Rpc("node down".into()));

        let err = LiquidityScenario::default().run(&chain).await.unwrap_err();
        assert!(matches!(err, ChainError::Rpc(_)));
    }
}
