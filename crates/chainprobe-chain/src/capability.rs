//! The contract-call capability trait.

use crate::error::ChainError;
use crate::types::{Address, Amount, Signer, TxReceipt};
use async_trait::async_trait;

/// The external, side-effecting interface the harness depends on.
///
/// An implementation wraps a wallet session plus the deployed protocol
/// contracts (token, staking, vault, liquidity pool, access control).
/// Mutating operations return a [`TxReceipt`]; views return values.
/// Every operation may fail with a [`ChainError`].
///
/// Implementations must tolerate sequential calls only: the harness
/// serializes access, so no operation is ever invoked concurrently with
/// another on the same capability.
#[async_trait]
pub trait ChainCapability: Send + Sync {
    /// Returns the current signing identity.
    ///
    /// Fails with [`ChainError::NotConnected`] when no wallet session
    /// exists.
    async fn signer(&self) -> Result<Signer, ChainError>;

    // --- token ---

    /// Token balance of an account.
    async fn balance_of(&self, who: &Address) -> Result<Amount, ChainError>;

    /// Transfers tokens from the signer to `to`.
    async fn transfer(&self, to: &Address, amount: Amount) -> Result<TxReceipt, ChainError>;

    /// Sets the signer's allowance for `spender`.
    async fn approve(&self, spender: &Address, amount: Amount) -> Result<TxReceipt, ChainError>;

    /// Current allowance granted by `owner` to `spender`.
    async fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, ChainError>;

    // --- staking ---

    /// Stakes tokens from the signer's balance.
    async fn stake(&self, amount: Amount) -> Result<TxReceipt, ChainError>;

    /// Withdraws staked tokens back to the signer's balance.
    async fn unstake(&self, amount: Amount) -> Result<TxReceipt, ChainError>;

    /// Staked balance of an account.
    async fn staked_balance(&self, who: &Address) -> Result<Amount, ChainError>;

    /// Current staking reward rate (fraction per year).
    async fn reward_rate(&self) -> Result<f64, ChainError>;

    // --- vault ---

    /// Deposits tokens into the vault, minting shares to the signer.
    async fn deposit(&self, amount: Amount) -> Result<TxReceipt, ChainError>;

    /// Burns vault shares, returning underlying tokens to the signer.
    async fn withdraw(&self, shares: Amount) -> Result<TxReceipt, ChainError>;

    /// Vault share balance of an account.
    async fn vault_balance(&self, who: &Address) -> Result<Amount, ChainError>;

    /// Current vault share price in underlying tokens.
    async fn share_price(&self) -> Result<f64, ChainError>;

    // --- liquidity pool ---

    /// Adds liquidity to the pool, minting LP shares to the signer.
    async fn add_liquidity(
        &self,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<TxReceipt, ChainError>;

    /// Burns LP shares, returning both legs to the signer.
    async fn remove_liquidity(&self, shares: Amount) -> Result<TxReceipt, ChainError>;

    /// LP share balance of an account.
    async fn lp_balance(&self, who: &Address) -> Result<Amount, ChainError>;

    /// Current pool reserves, both legs.
    async fn pool_reserves(&self) -> Result<(Amount, Amount), ChainError>;

    // --- access control ---

    /// Whether `who` holds the named role.
    async fn has_role(&self, role: &str, who: &Address) -> Result<bool, ChainError>;

    /// Whether the protocol is paused.
    async fn paused(&self) -> Result<bool, ChainError>;

    /// Flips the protocol pause switch. Requires the `pauser` role.
    async fn set_paused(&self, paused: bool) -> Result<TxReceipt, ChainError>;
}
