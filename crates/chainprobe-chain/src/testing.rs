//! Deterministic simulated chain for tests and local harness runs.

use crate::capability::ChainCapability;
use crate::error::ChainError;
use crate::types::{Address, Amount, Signer, TxReceipt};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// In-memory [`ChainCapability`] implementation with scripted failures.
///
/// Balances, staking positions, vault shares, pool reserves, roles, and
/// the pause switch all live behind one mutex, so every operation is
/// atomic and the whole thing is deterministic. Tests can inject a
/// failure for the next invocation of any named operation and inspect
/// the call log afterwards.
#[derive(Debug, Clone)]
pub struct SimulatedChain {
    state: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    connected: bool,
    signer: Signer,
    balances: HashMap<Address, Amount>,
    staked: HashMap<Address, Amount>,
    vault_shares: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    lp_shares: HashMap<Address, Amount>,
    lp_contrib: HashMap<Address, (Amount, Amount)>,
    reserves: (Amount, Amount),
    roles: HashSet<(String, Address)>,
    paused: bool,
    reward_rate: f64,
    share_price: f64,
    block: u64,
    calls: Vec<String>,
    injected: HashMap<String, ChainError>,
}

impl State {
    /// Records the call and consumes any failure scripted for it.
    fn enter(&mut self, op: &str) -> Result<(), ChainError> {
        self.calls.push(op.to_string());
        match self.injected.remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn require_signer(&self) -> Result<Address, ChainError> {
        if self.connected {
            Ok(self.signer.address.clone())
        } else {
            Err(ChainError::NotConnected)
        }
    }

    fn require_unpaused(&self) -> Result<(), ChainError> {
        if self.paused {
            Err(ChainError::Reverted("protocol is paused".to_string()))
        } else {
            Ok(())
        }
    }

    fn debit(&mut self, who: &Address, amount: Amount) -> Result<(), ChainError> {
        let available = self.balances.get(who).copied().unwrap_or(0);
        if available < amount {
            return Err(ChainError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        *self.balances.entry(who.clone()).or_insert(0) -= amount;
        Ok(())
    }

    fn credit(&mut self, who: &Address, amount: Amount) {
        *self.balances.entry(who.clone()).or_insert(0) += amount;
    }

    fn next_receipt(&mut self) -> TxReceipt {
        self.block += 1;
        TxReceipt {
            tx_hash: format!("0x{:064x}", self.block),
            block: self.block,
        }
    }
}

/// Default wallet the simulation connects as.
pub const DEFAULT_SIGNER: &str = "0xDa5hb0a4dADDbeEF00000000000000000000c0DE";

/// Default chain id (the usual local devnet id).
pub const DEFAULT_CHAIN_ID: u64 = 31337;

const DEFAULT_BALANCE: Amount = 1_000_000_000;

impl SimulatedChain {
    /// Creates a connected simulation with the default wallet and balance.
    pub fn new() -> Self {
        let signer = Signer {
            address: Address::new(DEFAULT_SIGNER),
            chain_id: DEFAULT_CHAIN_ID,
        };
        let mut balances = HashMap::new();
        balances.insert(signer.address.clone(), DEFAULT_BALANCE);
        Self {
            state: Arc::new(Mutex::new(State {
                connected: true,
                signer,
                balances,
                staked: HashMap::new(),
                vault_shares: HashMap::new(),
                allowances: HashMap::new(),
                lp_shares: HashMap::new(),
                lp_contrib: HashMap::new(),
                reserves: (5_000_000, 5_000_000),
                roles: HashSet::new(),
                paused: false,
                reward_rate: 0.042,
                share_price: 1.0,
                block: 0,
                calls: Vec::new(),
                injected: HashMap::new(),
            })),
        }
    }

    /// Creates a simulation with no wallet session.
    pub fn disconnected() -> Self {
        let chain = Self::new();
        chain.disconnect();
        chain
    }

    /// Sets the signer's starting token balance.
    pub fn with_balance(self, amount: Amount) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let signer = state.signer.address.clone();
            state.balances.insert(signer, amount);
        }
        self
    }

    /// Grants a role to the signer.
    pub fn with_role(self, role: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let signer = state.signer.address.clone();
            state.roles.insert((role.to_string(), signer));
        }
        self
    }

    /// Sets the reported staking reward rate.
    pub fn with_reward_rate(self, rate: f64) -> Self {
        self.state.lock().unwrap().reward_rate = rate;
        self
    }

    /// Returns the signer's address.
    pub fn signer_address(&self) -> Address {
        self.state.lock().unwrap().signer.address.clone()
    }

    /// Ends the wallet session.
    pub fn disconnect(&self) {
        self.state.lock().unwrap().connected = false;
    }

    /// Restores the wallet session.
    pub fn connect(&self) {
        self.state.lock().unwrap().connected = true;
    }

    /// Scripts a failure for the next invocation of `op`.
    ///
    /// `op` is the trait method name (e.g. `"stake"`). The failure is
    /// consumed by the first matching call.
    pub fn fail_next(&self, op: &str, err: ChainError) {
        self.state.lock().unwrap().injected.insert(op.to_string(), err);
    }

    /// Returns the names of all operations invoked so far.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainCapability for SimulatedChain {
    async fn signer(&self) -> Result<Signer, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("signer")?;
        if state.connected {
            Ok(state.signer.clone())
        } else {
            Err(ChainError::NotConnected)
        }
    }

    async fn balance_of(&self, who: &Address) -> Result<Amount, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("balance_of")?;
        Ok(state.balances.get(who).copied().unwrap_or(0))
    }

    async fn transfer(&self, to: &Address, amount: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("transfer")?;
        let signer = state.require_signer()?;
        state.debit(&signer, amount)?;
        state.credit(to, amount);
        tracing::debug!(%to, amount, "simulated transfer");
        Ok(state.next_receipt())
    }

    async fn approve(&self, spender: &Address, amount: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("approve")?;
        let signer = state.require_signer()?;
        state.allowances.insert((signer, spender.clone()), amount);
        Ok(state.next_receipt())
    }

    async fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("allowance")?;
        Ok(state
            .allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0))
    }

    async fn stake(&self, amount: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("stake")?;
        let signer = state.require_signer()?;
        state.require_unpaused()?;
        state.debit(&signer, amount)?;
        *state.staked.entry(signer).or_insert(0) += amount;
        Ok(state.next_receipt())
    }

    async fn unstake(&self, amount: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("unstake")?;
        let signer = state.require_signer()?;
        let staked = state.staked.get(&signer).copied().unwrap_or(0);
        if staked < amount {
            return Err(ChainError::Reverted(
                "insufficient staked balance".to_string(),
            ));
        }
        *state.staked.entry(signer.clone()).or_insert(0) -= amount;
        state.credit(&signer, amount);
        Ok(state.next_receipt())
    }

    async fn staked_balance(&self, who: &Address) -> Result<Amount, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("staked_balance")?;
        Ok(state.staked.get(who).copied().unwrap_or(0))
    }

    async fn reward_rate(&self) -> Result<f64, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("reward_rate")?;
        Ok(state.reward_rate)
    }

    async fn deposit(&self, amount: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("deposit")?;
        let signer = state.require_signer()?;
        state.require_unpaused()?;
        state.debit(&signer, amount)?;
        let minted = (amount as f64 / state.share_price) as Amount;
        *state.vault_shares.entry(signer).or_insert(0) += minted;
        Ok(state.next_receipt())
    }

    async fn withdraw(&self, shares: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("withdraw")?;
        let signer = state.require_signer()?;
        let held = state.vault_shares.get(&signer).copied().unwrap_or(0);
        if held < shares {
            return Err(ChainError::Reverted(
                "insufficient vault shares".to_string(),
            ));
        }
        *state.vault_shares.entry(signer.clone()).or_insert(0) -= shares;
        let out = (shares as f64 * state.share_price) as Amount;
        state.credit(&signer, out);
        Ok(state.next_receipt())
    }

    async fn vault_balance(&self, who: &Address) -> Result<Amount, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("vault_balance")?;
        Ok(state.vault_shares.get(who).copied().unwrap_or(0))
    }

    async fn share_price(&self) -> Result<f64, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("share_price")?;
        Ok(state.share_price)
    }

    async fn add_liquidity(
        &self,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("add_liquidity")?;
        let signer = state.require_signer()?;
        state.require_unpaused()?;
        state.debit(&signer, amount_a + amount_b)?;
        state.reserves.0 += amount_a;
        state.reserves.1 += amount_b;
        let minted = amount_a + amount_b;
        *state.lp_shares.entry(signer.clone()).or_insert(0) += minted;
        let contrib = state.lp_contrib.entry(signer).or_insert((0, 0));
        contrib.0 += amount_a;
        contrib.1 += amount_b;
        Ok(state.next_receipt())
    }

    async fn remove_liquidity(&self, shares: Amount) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("remove_liquidity")?;
        let signer = state.require_signer()?;
        let held = state.lp_shares.get(&signer).copied().unwrap_or(0);
        if held < shares {
            return Err(ChainError::Reverted(
                "insufficient liquidity shares".to_string(),
            ));
        }
        let (contrib_a, contrib_b) = state.lp_contrib.get(&signer).copied().unwrap_or((0, 0));
        let out_a = contrib_a * shares / held;
        let out_b = contrib_b * shares / held;
        *state.lp_shares.entry(signer.clone()).or_insert(0) -= shares;
        let contrib = state.lp_contrib.entry(signer.clone()).or_insert((0, 0));
        contrib.0 -= out_a;
        contrib.1 -= out_b;
        state.reserves.0 -= out_a;
        state.reserves.1 -= out_b;
        state.credit(&signer, out_a + out_b);
        Ok(state.next_receipt())
    }

    async fn lp_balance(&self, who: &Address) -> Result<Amount, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("lp_balance")?;
        Ok(state.lp_shares.get(who).copied().unwrap_or(0))
    }

    async fn pool_reserves(&self) -> Result<(Amount, Amount), ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("pool_reserves")?;
        Ok(state.reserves)
    }

    async fn has_role(&self, role: &str, who: &Address) -> Result<bool, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("has_role")?;
        Ok(state.roles.contains(&(role.to_string(), who.clone())))
    }

    async fn paused(&self) -> Result<bool, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("paused")?;
        Ok(state.paused)
    }

    async fn set_paused(&self, paused: bool) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.enter("set_paused")?;
        let signer = state.require_signer()?;
        if !state.roles.contains(&("pauser".to_string(), signer)) {
            return Err(ChainError::Reverted("missing role: pauser".to_string()));
        }
        state.paused = paused;
        Ok(state.next_receipt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_moves_balance() {
        let chain = SimulatedChain::new().with_balance(1_000);
        let sink = Address::new("0xsink");

        chain.transfer(&sink, 400).await.unwrap();

        assert_eq!(chain.balance_of(&chain.signer_address()).await.unwrap(), 600);
        assert_eq!(chain.balance_of(&sink).await.unwrap(), 400);
    }

    #[tokio::test]
    async fn test_transfer_insufficient_balance() {
        let chain = SimulatedChain::new().with_balance(100);
        let sink = Address::new("0xsink");

        let err = chain.transfer(&sink, 500).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::InsufficientBalance {
                needed: 500,
                available: 100
            }
        ));
    }

    #[tokio::test]
    async fn test_stake_unstake_cycle() {
        let chain = SimulatedChain::new().with_balance(10_000);
        let me = chain.signer_address();

        chain.stake(4_000).await.unwrap();
        assert_eq!(chain.staked_balance(&me).await.unwrap(), 4_000);
        assert_eq!(chain.balance_of(&me).await.unwrap(), 6_000);

        chain.unstake(4_000).await.unwrap();
        assert_eq!(chain.staked_balance(&me).await.unwrap(), 0);
        assert_eq!(chain.balance_of(&me).await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn test_unstake_more_than_staked_reverts() {
        let chain = SimulatedChain::new();
        let err = chain.unstake(1).await.unwrap_err();
        assert!(matches!(err, ChainError::Reverted(_)));
    }

    #[tokio::test]
    async fn test_vault_round_trip() {
        let chain = SimulatedChain::new().with_balance(50_000);
        let me = chain.signer_address();

        chain.deposit(20_000).await.unwrap();
        let shares = chain.vault_balance(&me).await.unwrap();
        assert_eq!(shares, 20_000);

        chain.withdraw(shares).await.unwrap();
        assert_eq!(chain.vault_balance(&me).await.unwrap(), 0);
        assert_eq!(chain.balance_of(&me).await.unwrap(), 50_000);
    }

    #[tokio::test]
    async fn test_liquidity_round_trip() {
        let chain = SimulatedChain::new().with_balance(100_000);
        let me = chain.signer_address();
        let (ra, rb) = chain.pool_reserves().await.unwrap();

        chain.add_liquidity(4_000, 6_000).await.unwrap();
        assert_eq!(chain.pool_reserves().await.unwrap(), (ra + 4_000, rb + 6_000));
        let minted = chain.lp_balance(&me).await.unwrap();
        assert_eq!(minted, 10_000);

        chain.remove_liquidity(minted).await.unwrap();
        assert_eq!(chain.pool_reserves().await.unwrap(), (ra, rb));
        assert_eq!(chain.balance_of(&me).await.unwrap(), 100_000);
    }

    #[tokio::test]
    async fn test_pause_requires_role() {
        let chain = SimulatedChain::new();
        let err = chain.set_paused(true).await.unwrap_err();
        assert!(matches!(err, ChainError::Reverted(_)));
        assert!(!chain.paused().await.unwrap());

        let chain = SimulatedChain::new().with_role("pauser");
        chain.set_paused(true).await.unwrap();
        assert!(chain.paused().await.unwrap());
    }

    #[tokio::test]
    async fn test_paused_protocol_rejects_stake() {
        let chain = SimulatedChain::new().with_role("pauser");
        chain.set_paused(true).await.unwrap();

        let err = chain.stake(1).await.unwrap_err();
        assert!(matches!(err, ChainError::Reverted(ref r) if r.contains("paused")));
    }

    #[tokio::test]
    async fn test_disconnected_operations_fail() {
        let chain = SimulatedChain::disconnected();
        assert!(matches!(
            chain.signer().await.unwrap_err(),
            ChainError::NotConnected
        ));
        assert!(matches!(
            chain.stake(1).await.unwrap_err(),
            ChainError::NotConnected
        ));
        // Views stay readable without a session.
        assert!(chain.paused().await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed_once() {
        let chain = SimulatedChain::new();
        chain.fail_next("reward_rate", ChainError::Rpc("node down".into()));

        let err = chain.reward_rate().await.unwrap_err();
        assert!(matches!(err, ChainError::Rpc(_)));
        assert!(chain.reward_rate().await.is_ok());
    }

    #[tokio::test]
    async fn test_call_log_records_operations() {
        let chain = SimulatedChain::new();
        chain.signer().await.unwrap();
        chain.reward_rate().await.unwrap();

        assert_eq!(chain.calls(), vec!["signer", "reward_rate"]);
    }

    #[tokio::test]
    async fn test_approve_and_allowance() {
        let chain = SimulatedChain::new();
        let me = chain.signer_address();
        let router = Address::new("0xrouter");

        chain.approve(&router, 777).await.unwrap();
        assert_eq!(chain.allowance(&me, &router).await.unwrap(), 777);

        chain.approve(&router, 0).await.unwrap();
        assert_eq!(chain.allowance(&me, &router).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_receipts_are_monotonic() {
        let chain = SimulatedChain::new();
        let sink = Address::new("0xsink");
        let r1 = chain.transfer(&sink, 1).await.unwrap();
        let r2 = chain.transfer(&sink, 1).await.unwrap();
        assert!(r2.block > r1.block);
        assert_ne!(r1.tx_hash, r2.tx_hash);
    }
}
