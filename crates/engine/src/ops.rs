//! The closed operation set
//!
//! Callers submit an [`Operation`] value; the engine matches it
//! exhaustively, so every operation provably has a handler and an unknown
//! operation cannot be expressed at all.

use serde::{Deserialize, Serialize};
use taskvault_core::types::{AccountId, Timestamp};

/// One escrow operation, as submitted by a caller.
///
/// Everything except `CreateBounty` addresses an existing record by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Fund and open a new bounty.
    CreateBounty {
        /// Value to deposit into escrow; strictly positive.
        amount: u64,
        /// Acceptance/refund cutoff; must be in the future.
        deadline: Timestamp,
        /// Opaque task text.
        description: Vec<u8>,
        /// Reviewer gating release. `None` falls back to the creator only
        /// if the engine is configured to allow it.
        verifier: Option<AccountId>,
    },
    /// Commit to work on an open bounty.
    Accept {
        /// Target bounty.
        id: u64,
    },
    /// Hand in the result (worker only).
    Submit {
        /// Target bounty.
        id: u64,
    },
    /// Sign off on the work (verifier only).
    Approve {
        /// Target bounty.
        id: u64,
    },
    /// Refuse the work and return funds to the creator (verifier only).
    Reject {
        /// Target bounty.
        id: u64,
    },
    /// Collect an approved payout (worker only).
    Claim {
        /// Target bounty.
        id: u64,
    },
    /// Return funds to the creator before the deadline (creator or
    /// verifier).
    Refund {
        /// Target bounty.
        id: u64,
    },
    /// Return funds to the creator once the deadline has passed (any
    /// caller).
    AutoRefund {
        /// Target bounty.
        id: u64,
    },
}

impl Operation {
    /// Stable operation name, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateBounty { .. } => "create_bounty",
            Operation::Accept { .. } => "accept",
            Operation::Submit { .. } => "submit",
            Operation::Approve { .. } => "approve",
            Operation::Reject { .. } => "reject",
            Operation::Claim { .. } => "claim",
            Operation::Refund { .. } => "refund",
            Operation::AutoRefund { .. } => "auto_refund",
        }
    }

    /// The bounty this operation addresses; `None` for creates.
    pub fn bounty_id(&self) -> Option<u64> {
        match self {
            Operation::CreateBounty { .. } => None,
            Operation::Accept { id }
            | Operation::Submit { id }
            | Operation::Approve { id }
            | Operation::Reject { id }
            | Operation::Claim { id }
            | Operation::Refund { id }
            | Operation::AutoRefund { id } => Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_stable() {
        assert_eq!(
            Operation::CreateBounty {
                amount: 1,
                deadline: 2,
                description: Vec::new(),
                verifier: None,
            }
            .name(),
            "create_bounty"
        );
        assert_eq!(Operation::AutoRefund { id: 0 }.name(), "auto_refund");
    }

    #[test]
    fn test_bounty_id_extraction() {
        assert_eq!(Operation::Claim { id: 9 }.bounty_id(), Some(9));
        assert_eq!(
            Operation::CreateBounty {
                amount: 1,
                deadline: 2,
                description: Vec::new(),
                verifier: None,
            }
            .bounty_id(),
            None
        );
    }
}
