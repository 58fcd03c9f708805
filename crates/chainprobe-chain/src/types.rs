//! Value types shared across the capability boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amounts in base units (the wei-style smallest denomination).
pub type Amount = u128;

/// An account address.
///
/// Stored as the checksummed display string; the harness never does
/// address arithmetic, so an opaque newtype is all that is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Creates an address from its display string.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(addr: &str) -> Self {
        Self::new(addr)
    }
}

/// The current wallet session's signing identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    /// Address of the connected wallet.
    pub address: Address,

    /// Chain the wallet session is bound to.
    pub chain_id: u64,
}

/// Receipt for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: String,

    /// Block the transaction was included in.
    pub block: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_roundtrip() {
        let addr = Address::new("0xabc123");
        assert_eq!(addr.as_str(), "0xabc123");
        assert_eq!(addr.to_string(), "0xabc123");
    }

    #[test]
    fn test_address_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Address::new("0x1"));
        set.insert(Address::new("0x1"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_signer_serialization() {
        let signer = Signer {
            address: Address::new("0xfeed"),
            chain_id: 31337,
        };
        let json = serde_json::to_string(&signer).unwrap();
        let back: Signer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signer);
    }
}
