//! Capability-level error taxonomy.

use crate::types::Amount;

/// Errors raised by contract-call operations.
///
/// Consumers above the capability boundary treat every variant opaquely:
/// only the rendered message crosses into recorded outcomes. The variants
/// exist so implementations and tests can construct failures precisely,
/// not so callers can branch on chain semantics.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// No wallet session exists.
    #[error("no wallet connected")]
    NotConnected,

    /// The transaction was submitted and reverted on-chain.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// The wallet balance cannot cover the requested amount.
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance {
        /// Base units required by the operation.
        needed: Amount,
        /// Base units actually available.
        available: Amount,
    },

    /// Transport-level failure talking to the node.
    #[error("rpc error: {0}")]
    Rpc(String),
}
