//! # chainprobe-chain
//!
//! The contract-call capability boundary for Chainprobe.
//!
//! This crate provides:
//! - Typed value types for wallet/contract interactions ([`Address`],
//!   [`Amount`], [`Signer`], [`TxReceipt`])
//! - The [`ChainCapability`] trait, the single seam through which the
//!   harness performs external side effects
//! - The [`ChainError`] taxonomy surfaced by every operation
//! - A deterministic [`testing::SimulatedChain`] for tests and local runs
//!
//! The harness never interprets chain-specific failures; it only forwards
//! their message strings. Anything that needs richer semantics belongs
//! behind this boundary, not above it.

mod capability;
mod error;
pub mod testing;
mod types;

pub use capability::ChainCapability;
pub use error::ChainError;
pub use types::{Address, Amount, Signer, TxReceipt};
