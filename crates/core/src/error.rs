//! Canonical error taxonomy for escrow operations
//!
//! Every guard in the transition engine maps to exactly one variant here,
//! so a caller can always tell *which* precondition failed: wrong status,
//! wrong principal, wrong side of the deadline, or a refused transfer.
//! All variants are local to a single operation and fully recoverable —
//! none poisons the engine.
//!
//! ## Error codes
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | NotFound | Unknown bounty id |
//! | AlreadyExists | Bounty id already allocated |
//! | InvalidState | Operation not valid for the current status |
//! | PermissionDenied | Caller lacks the required role |
//! | Expired | Deadline already passed |
//! | NotYetExpired | Deadline not reached yet |
//! | InvalidAmount | Zero or mismatched amount |
//! | CapacityExceeded | Description too long for the allocated box |
//! | InsufficientEscrowBalance | Escrow-side transfer refused |
//! | InsufficientFunds | Depositor-side transfer refused |
//! | VerifierRequired | No verifier supplied and fallback is disabled |
//! | Corrupted | Stored bytes describe an impossible state |

use crate::record::Status;
use crate::types::{AccountId, Timestamp};
use thiserror::Error;

/// All escrow errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// Unknown bounty id.
    #[error("bounty not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// A record already exists under this id.
    #[error("bounty already exists: {id}")]
    AlreadyExists {
        /// The colliding id.
        id: u64,
    },

    /// The operation is not valid for the record's current status.
    #[error("{operation} is not valid while the bounty is {status}")]
    InvalidState {
        /// The refused operation.
        operation: &'static str,
        /// The status the record was in.
        status: Status,
    },

    /// The caller does not hold the role the operation requires.
    #[error("{operation} denied: {reason}")]
    PermissionDenied {
        /// The refused operation.
        operation: &'static str,
        /// Which role check failed.
        reason: String,
    },

    /// The deadline has already passed.
    #[error("deadline passed: deadline {deadline}, now {now}")]
    Expired {
        /// The record's deadline.
        deadline: Timestamp,
        /// The clock reading at validation time.
        now: Timestamp,
    },

    /// The deadline has not been reached yet.
    #[error("deadline not reached: deadline {deadline}, now {now}")]
    NotYetExpired {
        /// The record's deadline.
        deadline: Timestamp,
        /// The clock reading at validation time.
        now: Timestamp,
    },

    /// Zero or otherwise unusable amount.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The refused amount.
        amount: u64,
    },

    /// The encoded record does not fit the allocated box.
    #[error("record needs {required} bytes, box capacity is {capacity}")]
    CapacityExceeded {
        /// Bytes the encoded record requires.
        required: usize,
        /// Bytes the box can hold.
        capacity: usize,
    },

    /// The escrow holding account cannot cover the payout.
    #[error("escrow balance too low: need {required}, have {available}")]
    InsufficientEscrowBalance {
        /// Units the settlement requires.
        required: u64,
        /// Units actually held.
        available: u64,
    },

    /// The depositing account cannot cover the escrow deposit.
    #[error("account {account} balance too low: need {required}, have {available}")]
    InsufficientFunds {
        /// The depositing account.
        account: AccountId,
        /// Units the deposit requires.
        required: u64,
        /// Units the account holds.
        available: u64,
    },

    /// No verifier was supplied and falling back to the creator is disabled.
    #[error("no verifier supplied and creator fallback is disabled")]
    VerifierRequired,

    /// Stored bytes describe a state the engine can never produce.
    #[error("corrupted record: {reason}")]
    Corrupted {
        /// What the decoder or consistency check found.
        reason: String,
    },
}

/// Result type for escrow operations.
pub type Result<T> = std::result::Result<T, EscrowError>;

impl EscrowError {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EscrowError::NotFound { .. })
    }

    /// Check if this error came from a deadline comparison (either side).
    pub fn is_deadline(&self) -> bool {
        matches!(
            self,
            EscrowError::Expired { .. } | EscrowError::NotYetExpired { .. }
        )
    }

    /// Check if this error reports corrupted stored state.
    ///
    /// Corruption is the only taxonomy member that indicates a bug rather
    /// than a caller mistake; everything else is retryable with corrected
    /// arguments or a later clock.
    pub fn is_corruption(&self) -> bool {
        matches!(self, EscrowError::Corrupted { .. })
    }
}
