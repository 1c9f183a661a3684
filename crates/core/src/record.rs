//! Escrow record and status machine
//!
//! A [`BountyRecord`] is the unit of escrow: one task, one deposit, one
//! lifecycle. Records are created `Open`, move through the acceptance and
//! review steps, and end in exactly one of the terminal statuses. Once a
//! record is terminal it is retained for audit and never mutated again.

use crate::error::{EscrowError, Result};
use crate::types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a bounty record.
///
/// The discriminants are the stable wire codes used in the stored record
/// layout; they must not change.
///
/// Happy path: `Open → Accepted → Submitted → Approved → Claimed`
/// (the `Submitted` step may be skipped; review acts on `Accepted` too).
/// Abort paths end in `Rejected` or `Refunded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    /// Created and funded, waiting for a worker.
    Open = 0,
    /// A worker has committed to the task.
    Accepted = 1,
    /// The worker has handed in the result.
    Submitted = 2,
    /// The verifier has signed off; payout is claimable.
    Approved = 3,
    /// Funds paid out to the worker. Terminal.
    Claimed = 4,
    /// Funds returned to the creator. Terminal.
    Refunded = 5,
    /// Work refused by the verifier, funds returned to the creator. Terminal.
    Rejected = 6,
}

impl Status {
    /// Check if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Claimed | Status::Refunded | Status::Rejected)
    }

    /// Check if a record in this status must carry a worker.
    pub fn requires_worker(&self) -> bool {
        matches!(
            self,
            Status::Accepted | Status::Submitted | Status::Approved | Status::Claimed
        )
    }

    /// The stable wire code for this status.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Decode a wire code. Returns `None` for unknown codes.
    pub fn from_u8(code: u8) -> Option<Status> {
        match code {
            0 => Some(Status::Open),
            1 => Some(Status::Accepted),
            2 => Some(Status::Submitted),
            3 => Some(Status::Approved),
            4 => Some(Status::Claimed),
            5 => Some(Status::Refunded),
            6 => Some(Status::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Open => "open",
            Status::Accepted => "accepted",
            Status::Submitted => "submitted",
            Status::Approved => "approved",
            Status::Claimed => "claimed",
            Status::Refunded => "refunded",
            Status::Rejected => "rejected",
        };
        write!(f, "{}", name)
    }
}

/// One escrow record: a task, the value held for it, and its lifecycle.
///
/// Field immutability after creation:
/// - `id`, `creator`, `verifier`, `deadline`, `description`: never change.
/// - `worker`: set once by `accept`; cleared again only when the escrow is
///   returned (`Rejected`/`Refunded`), so exactly the worker-bearing
///   statuses carry a worker.
/// - `amount`: the value currently held in escrow for this record. It is
///   strictly positive while the record is live and is zeroed in the same
///   write that records a terminal status — the two must never be split.
/// - `status`: advanced by the transition engine only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyRecord {
    /// Stable key, assigned once at creation.
    pub id: u64,
    /// The payer who funded the escrow.
    pub creator: AccountId,
    /// The reviewer who gates release.
    pub verifier: AccountId,
    /// The committed worker; `None` until accepted.
    pub worker: Option<AccountId>,
    /// Value currently held in escrow for this record.
    pub amount: u64,
    /// Acceptance/refund cutoff, fixed at creation.
    pub deadline: Timestamp,
    /// Lifecycle status.
    pub status: Status,
    /// Opaque task text, immutable after creation.
    pub description: Vec<u8>,
}

impl BountyRecord {
    /// Create a fresh `Open` record with no worker.
    pub fn new(
        id: u64,
        creator: AccountId,
        verifier: AccountId,
        amount: u64,
        deadline: Timestamp,
        description: Vec<u8>,
    ) -> Self {
        Self {
            id,
            creator,
            verifier,
            worker: None,
            amount,
            deadline,
            status: Status::Open,
            description,
        }
    }

    /// Check if this record has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Verify the record-local consistency rules.
    ///
    /// - a terminal record holds no value (`amount == 0`);
    /// - a live record holds value (`amount > 0`);
    /// - the worker is set exactly for the statuses that imply one.
    ///
    /// A violation means the record bytes do not describe a state this
    /// system can ever produce, so it surfaces as [`EscrowError::Corrupted`].
    pub fn check_consistency(&self) -> Result<()> {
        if self.is_terminal() && self.amount != 0 {
            return Err(EscrowError::Corrupted {
                reason: format!(
                    "bounty {} is {} but still reports {} units in escrow",
                    self.id, self.status, self.amount
                ),
            });
        }
        if !self.is_terminal() && self.amount == 0 {
            return Err(EscrowError::Corrupted {
                reason: format!("live bounty {} reports zero escrowed value", self.id),
            });
        }
        if self.status.requires_worker() != self.worker.is_some() {
            return Err(EscrowError::Corrupted {
                reason: format!(
                    "bounty {} is {} but worker is {}",
                    self.id,
                    self.status,
                    if self.worker.is_some() { "set" } else { "unset" }
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn record() -> BountyRecord {
        BountyRecord::new(7, acct(1), acct(2), 500, 1_000, b"paint the fence".to_vec())
    }

    #[test]
    fn test_new_record_is_open_and_unassigned() {
        let r = record();
        assert_eq!(r.status, Status::Open);
        assert_eq!(r.worker, None);
        assert_eq!(r.amount, 500);
        assert!(r.check_consistency().is_ok());
    }

    #[test]
    fn test_status_codes_are_stable() {
        for (status, code) in [
            (Status::Open, 0u8),
            (Status::Accepted, 1),
            (Status::Submitted, 2),
            (Status::Approved, 3),
            (Status::Claimed, 4),
            (Status::Refunded, 5),
            (Status::Rejected, 6),
        ] {
            assert_eq!(status.as_u8(), code);
            assert_eq!(Status::from_u8(code), Some(status));
        }
        assert_eq!(Status::from_u8(7), None);
        assert_eq!(Status::from_u8(255), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(Status::Claimed.is_terminal());
        assert!(Status::Refunded.is_terminal());
        assert!(Status::Rejected.is_terminal());
        assert!(!Status::Open.is_terminal());
        assert!(!Status::Accepted.is_terminal());
        assert!(!Status::Submitted.is_terminal());
        assert!(!Status::Approved.is_terminal());
    }

    #[test]
    fn test_worker_bearing_statuses() {
        assert!(!Status::Open.requires_worker());
        assert!(Status::Accepted.requires_worker());
        assert!(Status::Submitted.requires_worker());
        assert!(Status::Approved.requires_worker());
        assert!(Status::Claimed.requires_worker());
        assert!(!Status::Refunded.requires_worker());
        assert!(!Status::Rejected.requires_worker());
    }

    #[test]
    fn test_consistency_rejects_terminal_with_value() {
        let mut r = record();
        r.status = Status::Refunded;
        // amount left stale - the classic stuck-funds shape
        assert!(r.check_consistency().is_err());

        r.amount = 0;
        assert!(r.check_consistency().is_ok());
    }

    #[test]
    fn test_consistency_rejects_live_without_value() {
        let mut r = record();
        r.amount = 0;
        assert!(r.check_consistency().is_err());
    }

    #[test]
    fn test_consistency_rejects_worker_mismatch() {
        let mut r = record();
        r.status = Status::Accepted;
        assert!(r.check_consistency().is_err(), "accepted but no worker");

        r.worker = Some(acct(3));
        assert!(r.check_consistency().is_ok());

        r.status = Status::Open;
        assert!(r.check_consistency().is_err(), "open but worker set");
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let mut r = record();
        r.worker = Some(acct(3));
        r.status = Status::Accepted;
        let json = serde_json::to_string(&r).unwrap();
        let restored: BountyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r, restored);
    }
}
