//! The transition engine
//!
//! One method per operation, each an atomic unit: load the record, check
//! every precondition against that one read, then move value and commit
//! the updated record. A failed check returns its taxonomy error with no
//! store mutation and no transfer, so a rejected operation is
//! indistinguishable from one that was never attempted.
//!
//! Settlements (`reject`, `claim`, `refund`, `auto_refund`) zero the
//! escrowed amount and write the terminal status in the same record write
//! that follows the transfer. The two are never split: a record must never
//! read as settled while still claiming to hold value.

use crate::auth;
use crate::host::{Clock, ValueTransfer};
use crate::ops::Operation;
use std::sync::Arc;
use taskvault_core::record::{BountyRecord, Status};
use taskvault_core::types::{AccountId, Timestamp};
use taskvault_core::{EscrowError, Result};
use taskvault_store::{codec, BountyCounter, RecordStore};
use tracing::{debug, info};

/// Default cap on the opaque task description.
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 1024;

/// Behavior toggles for the transition engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// When a create supplies no verifier, record the creator as its own
    /// verifier instead of failing with
    /// [`EscrowError::VerifierRequired`].
    ///
    /// Off by default: a creator who reviews their own work collapses the
    /// trust model, so hosts must opt in explicitly.
    pub creator_as_fallback_verifier: bool,
    /// Upper bound on the description accepted at creation. The record box
    /// is sized to the description once and never grows.
    pub max_description_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            creator_as_fallback_verifier: false,
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
        }
    }
}

/// The escrow state machine.
///
/// Owns the id allocator; shares the record store with whoever needs
/// read access; talks to the host ledger through the [`Clock`] and
/// [`ValueTransfer`] traits.
pub struct TransitionEngine {
    store: Arc<RecordStore>,
    counter: BountyCounter,
    clock: Arc<dyn Clock>,
    transfers: Arc<dyn ValueTransfer>,
    config: EngineConfig,
}

impl TransitionEngine {
    /// Create an engine over the given store and host collaborators.
    pub fn new(
        store: Arc<RecordStore>,
        clock: Arc<dyn Clock>,
        transfers: Arc<dyn ValueTransfer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            counter: BountyCounter::new(),
            clock,
            transfers,
            config,
        }
    }

    /// Create an engine resuming a previously persisted id counter.
    pub fn with_counter(
        store: Arc<RecordStore>,
        counter: BountyCounter,
        clock: Arc<dyn Clock>,
        transfers: Arc<dyn ValueTransfer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            counter,
            clock,
            transfers,
            config,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of bounties ever created (the next id to be allocated).
    pub fn bounty_count(&self) -> u64 {
        self.counter.peek()
    }

    /// Dispatch one operation for `caller`.
    ///
    /// Returns the id of the bounty the operation acted on (for creates,
    /// the freshly allocated id).
    pub fn apply(&self, caller: &AccountId, op: &Operation) -> Result<u64> {
        debug!(operation = op.name(), caller = %caller, "dispatching");
        match op {
            Operation::CreateBounty {
                amount,
                deadline,
                description,
                verifier,
            } => self.create_bounty(caller, *amount, *deadline, description, *verifier),
            Operation::Accept { id } => self.accept(caller, *id).map(|_| *id),
            Operation::Submit { id } => self.submit(caller, *id).map(|_| *id),
            Operation::Approve { id } => self.approve(caller, *id).map(|_| *id),
            Operation::Reject { id } => self.reject(caller, *id).map(|_| *id),
            Operation::Claim { id } => self.claim(caller, *id).map(|_| *id),
            Operation::Refund { id } => self.refund(caller, *id).map(|_| *id),
            Operation::AutoRefund { id } => self.auto_refund(caller, *id).map(|_| *id),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Fund and open a new bounty.
    ///
    /// The caller becomes the creator. The deposit into escrow happens
    /// only after every argument check passes, and the id counter is
    /// consumed only after the deposit succeeds — a failed create
    /// allocates nothing.
    pub fn create_bounty(
        &self,
        caller: &AccountId,
        amount: u64,
        deadline: Timestamp,
        description: &[u8],
        verifier: Option<AccountId>,
    ) -> Result<u64> {
        const OP: &str = "create_bounty";

        ensure_acting_account(OP, caller)?;
        if amount == 0 {
            return Err(EscrowError::InvalidAmount { amount });
        }
        let now = self.clock.now();
        if deadline <= now {
            return Err(EscrowError::Expired { deadline, now });
        }
        if description.len() > self.config.max_description_len {
            return Err(EscrowError::CapacityExceeded {
                required: description.len(),
                capacity: self.config.max_description_len,
            });
        }
        // An explicit zero verifier is the same as not naming one.
        let verifier = match verifier.filter(|v| !v.is_zero()) {
            Some(v) => v,
            None if self.config.creator_as_fallback_verifier => *caller,
            None => return Err(EscrowError::VerifierRequired),
        };

        // All checks passed: move the deposit, then allocate the id and
        // write the record. The deposit is the last fallible external
        // step, so a refused deposit consumes no id.
        self.transfers.deposit(caller, amount)?;
        let id = self.counter.next();
        let record = BountyRecord::new(
            id,
            *caller,
            verifier,
            amount,
            deadline,
            description.to_vec(),
        );
        self.store.create(id, codec::encoded_len(&record))?;
        self.store.put(id, &record)?;

        info!(id, amount, deadline, "bounty created");
        Ok(id)
    }

    /// Commit to work on an open bounty.
    ///
    /// Any principal except the creator (and the zero account) may accept,
    /// once, before the deadline.
    pub fn accept(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "accept";

        let mut record = self.store.get(id)?;
        if record.status != Status::Open {
            return Err(EscrowError::InvalidState {
                operation: OP,
                status: record.status,
            });
        }
        let now = self.clock.now();
        if now >= record.deadline {
            return Err(EscrowError::Expired {
                deadline: record.deadline,
                now,
            });
        }
        ensure_acting_account(OP, caller)?;
        if auth::is_creator(caller, &record) {
            return Err(EscrowError::PermissionDenied {
                operation: OP,
                reason: "the creator cannot work its own bounty".to_string(),
            });
        }

        record.worker = Some(*caller);
        record.status = Status::Accepted;
        self.store.put(id, &record)?;

        info!(id, worker = %caller, "bounty accepted");
        Ok(())
    }

    /// Hand in the result. Worker only, from `Accepted`.
    pub fn submit(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "submit";

        let mut record = self.store.get(id)?;
        if record.status != Status::Accepted {
            return Err(EscrowError::InvalidState {
                operation: OP,
                status: record.status,
            });
        }
        if !auth::is_worker(caller, &record) {
            return Err(EscrowError::PermissionDenied {
                operation: OP,
                reason: "only the committed worker can submit".to_string(),
            });
        }

        record.status = Status::Submitted;
        self.store.put(id, &record)?;

        info!(id, "work submitted");
        Ok(())
    }

    /// Sign off on the work. Verifier only, from `Accepted` or
    /// `Submitted` — the submit step is optional.
    ///
    /// Approval moves no funds; the payout waits for the worker's
    /// [`claim`](Self::claim).
    pub fn approve(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "approve";

        let mut record = self.store.get(id)?;
        ensure_reviewable(OP, &record)?;
        if !auth::is_verifier(caller, &record) {
            return Err(EscrowError::PermissionDenied {
                operation: OP,
                reason: "only the verifier can approve".to_string(),
            });
        }

        record.status = Status::Approved;
        self.store.put(id, &record)?;

        info!(id, "work approved");
        Ok(())
    }

    /// Refuse the work and return the escrowed value to the creator.
    /// Verifier only, from `Accepted` or `Submitted`.
    pub fn reject(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "reject";

        let record = self.store.get(id)?;
        ensure_reviewable(OP, &record)?;
        if !auth::is_verifier(caller, &record) {
            return Err(EscrowError::PermissionDenied {
                operation: OP,
                reason: "only the verifier can reject".to_string(),
            });
        }

        let creator = record.creator;
        self.settle(OP, record, creator, Status::Rejected)
    }

    /// Collect an approved payout. Worker only, from `Approved`.
    pub fn claim(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "claim";

        let record = self.store.get(id)?;
        if record.status != Status::Approved {
            return Err(EscrowError::InvalidState {
                operation: OP,
                status: record.status,
            });
        }
        if !auth::is_worker(caller, &record) {
            return Err(EscrowError::PermissionDenied {
                operation: OP,
                reason: "only the committed worker can claim".to_string(),
            });
        }

        let worker = record.worker.ok_or_else(|| EscrowError::Corrupted {
            reason: format!("bounty {} is approved but has no worker", id),
        })?;
        self.settle(OP, record, worker, Status::Claimed)
    }

    /// Return the escrowed value to the creator before the deadline.
    /// Creator or verifier only, from any non-terminal status.
    pub fn refund(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "refund";

        let record = self.store.get(id)?;
        if record.is_terminal() {
            return Err(EscrowError::InvalidState {
                operation: OP,
                status: record.status,
            });
        }
        let now = self.clock.now();
        if now >= record.deadline {
            return Err(EscrowError::Expired {
                deadline: record.deadline,
                now,
            });
        }
        if !auth::is_creator(caller, &record) && !auth::is_verifier(caller, &record) {
            return Err(EscrowError::PermissionDenied {
                operation: OP,
                reason: "only the creator or verifier can refund early".to_string(),
            });
        }

        let creator = record.creator;
        self.settle(OP, record, creator, Status::Refunded)
    }

    /// Return the escrowed value to the creator once the deadline has
    /// passed. Any caller, from any non-terminal status — this is the
    /// permissionless cleanup path, so funds can never be stranded behind
    /// an absent creator.
    pub fn auto_refund(&self, caller: &AccountId, id: u64) -> Result<()> {
        const OP: &str = "auto_refund";

        let record = self.store.get(id)?;
        if record.is_terminal() {
            return Err(EscrowError::InvalidState {
                operation: OP,
                status: record.status,
            });
        }
        let now = self.clock.now();
        if now < record.deadline {
            return Err(EscrowError::NotYetExpired {
                deadline: record.deadline,
                now,
            });
        }

        debug!(id, caller = %caller, "expired bounty refunded by third party");
        let creator = record.creator;
        self.settle(OP, record, creator, Status::Refunded)
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Pay out the escrowed value and finalize the record.
    ///
    /// The transfer, the amount zeroing, and the terminal status are one
    /// inseparable unit: the record is written exactly once, after the
    /// transfer succeeded, with both fields updated. If the transfer is
    /// refused the record is untouched and stays live.
    fn settle(
        &self,
        operation: &'static str,
        mut record: BountyRecord,
        recipient: AccountId,
        final_status: Status,
    ) -> Result<()> {
        let amount = record.amount;
        if amount == 0 {
            // A live record always holds value; the decoder refuses
            // anything else, so this cannot be reached through the store.
            return Err(EscrowError::Corrupted {
                reason: format!("live bounty {} holds no value to settle", record.id),
            });
        }

        self.transfers.withdraw(&recipient, amount)?;
        record.amount = 0;
        record.status = final_status;
        if !final_status.requires_worker() {
            // Only the worker-bearing statuses carry a worker; a returned
            // escrow releases the commitment along with the funds.
            record.worker = None;
        }
        self.store.put(record.id, &record)?;

        info!(
            id = record.id,
            operation,
            amount,
            recipient = %recipient,
            status = %final_status,
            "escrow settled"
        );
        Ok(())
    }
}

/// Refuse the reserved zero account as an acting principal.
fn ensure_acting_account(operation: &'static str, caller: &AccountId) -> Result<()> {
    if caller.is_zero() {
        return Err(EscrowError::PermissionDenied {
            operation,
            reason: "the zero account cannot act".to_string(),
        });
    }
    Ok(())
}

/// Review operations act on `Accepted` or `Submitted` records.
fn ensure_reviewable(operation: &'static str, record: &BountyRecord) -> Result<()> {
    match record.status {
        Status::Accepted | Status::Submitted => Ok(()),
        status => Err(EscrowError::InvalidState { operation, status }),
    }
}
