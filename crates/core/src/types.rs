//! Fundamental identifier types
//!
//! This module defines the types used to address principals and moments in
//! time throughout the system:
//! - [`AccountId`]: opaque 32-byte principal identifier
//! - [`Timestamp`]: seconds on the host ledger's global clock

use serde::{Deserialize, Serialize};

/// Seconds on the host ledger's immutable global clock.
///
/// Deadlines and clock readings are plain unsigned seconds; the engine only
/// ever compares them, it never does arithmetic on them.
pub type Timestamp = u64;

/// Number of bytes in an [`AccountId`].
pub const ACCOUNT_ID_LEN: usize = 32;

/// Opaque 32-byte principal identifier.
///
/// An `AccountId` names a party on the host ledger: the creator funding a
/// bounty, the worker doing it, or the verifier gating release. The engine
/// never interprets the bytes; it only compares them.
///
/// The all-zero id is reserved: it marks "no worker yet" in the stored
/// record layout and is never accepted as a caller.
///
/// # Examples
///
/// ```
/// use taskvault_core::types::AccountId;
///
/// let a = AccountId::from_bytes([7u8; 32]);
/// let b = AccountId::from_bytes([7u8; 32]);
/// assert_eq!(a, b);
/// assert!(!a.is_zero());
/// assert!(AccountId::ZERO.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The reserved all-zero id ("unset" marker in the record layout).
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LEN]);

    /// Create an id from raw bytes.
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        AccountId(bytes)
    }

    /// Get the raw bytes representation.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Check whether this is the reserved all-zero id.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ACCOUNT_ID_LEN]
    }
}

impl std::fmt::Display for AccountId {
    /// Display as lowercase hex.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        AccountId(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; ACCOUNT_ID_LEN])
    }

    #[test]
    fn test_account_id_roundtrip() {
        let id = acct(0xAB);
        let restored = AccountId::from_bytes(*id.as_bytes());
        assert_eq!(id, restored, "AccountId should roundtrip through bytes");
    }

    #[test]
    fn test_zero_is_zero() {
        assert!(AccountId::ZERO.is_zero());
        assert!(!acct(1).is_zero());
    }

    #[test]
    fn test_display_is_hex() {
        let id = acct(0x0F);
        let s = id.to_string();
        assert_eq!(s.len(), 64, "32 bytes should render as 64 hex chars");
        assert!(s.chars().all(|c| c == '0' || c == 'f'));
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashSet;

        let id = acct(9);
        let mut set = HashSet::new();
        set.insert(id);
        assert!(set.contains(&id));
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = acct(0x42);
        let json = serde_json::to_string(&id).unwrap();
        let restored: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
