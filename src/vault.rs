//! Main entry point for TaskVault.
//!
//! [`TaskVault`] wires the transition engine to an in-memory host ledger
//! and a clock, and exposes the escrow operations plus read-only
//! inspection. Hosts that bring their own ledger or clock embed the
//! engine crate directly; this facade is the batteries-included path.

use crate::error::Result;
use std::sync::Arc;
use taskvault_core::record::BountyRecord;
use taskvault_core::types::{AccountId, Timestamp};
use taskvault_engine::{
    Clock, EngineConfig, InMemoryLedger, Operation, SystemClock, TransitionEngine, ValueTransfer,
};
use taskvault_store::RecordStore;

/// The escrow vault.
///
/// Create one with [`TaskVault::new`] for defaults or
/// [`TaskVault::builder`] for configuration. All methods take `&self`;
/// the vault is safe to share across threads.
pub struct TaskVault {
    store: Arc<RecordStore>,
    ledger: Arc<InMemoryLedger>,
    clock: Arc<dyn Clock>,
    engine: TransitionEngine,
}

impl TaskVault {
    /// Create a vault with default settings: system clock, empty ledger,
    /// no creator-verifier fallback.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for vault configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use taskvault::prelude::*;
    ///
    /// let payer = AccountId::from_bytes([1; 32]);
    /// let vault = TaskVault::builder()
    ///     .fund(payer, 1_000)
    ///     .allow_creator_verifier(true)
    ///     .build();
    /// assert_eq!(vault.balance_of(&payer), 1_000);
    /// ```
    pub fn builder() -> VaultBuilder {
        VaultBuilder::new()
    }

    // =========================================================================
    // Escrow operations
    // =========================================================================

    /// Fund and open a new bounty with an explicit verifier.
    ///
    /// Deposits `amount` from `caller` into escrow and returns the fresh
    /// bounty id. For the no-verifier form (engine fallback permitting),
    /// submit an [`Operation::CreateBounty`] through [`apply`](Self::apply).
    pub fn create_bounty(
        &self,
        caller: &AccountId,
        verifier: AccountId,
        amount: u64,
        deadline: Timestamp,
        description: &[u8],
    ) -> Result<u64> {
        self.engine
            .create_bounty(caller, amount, deadline, description, Some(verifier))
    }

    /// Commit to work on an open bounty.
    pub fn accept(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.accept(caller, id)
    }

    /// Hand in the result (worker only).
    pub fn submit(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.submit(caller, id)
    }

    /// Sign off on the work (verifier only).
    pub fn approve(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.approve(caller, id)
    }

    /// Refuse the work and return funds to the creator (verifier only).
    pub fn reject(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.reject(caller, id)
    }

    /// Collect an approved payout (worker only).
    pub fn claim(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.claim(caller, id)
    }

    /// Return funds to the creator before the deadline (creator or
    /// verifier only).
    pub fn refund(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.refund(caller, id)
    }

    /// Return funds to the creator after the deadline (any caller).
    pub fn auto_refund(&self, caller: &AccountId, id: u64) -> Result<()> {
        self.engine.auto_refund(caller, id)
    }

    /// Dispatch any operation as `caller`; returns the affected bounty id.
    pub fn apply(&self, caller: &AccountId, op: &Operation) -> Result<u64> {
        self.engine.apply(caller, op)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Load the record for a bounty.
    pub fn bounty(&self, id: u64) -> Result<BountyRecord> {
        self.store.get(id)
    }

    /// Number of bounties ever created.
    pub fn bounty_count(&self) -> u64 {
        self.engine.bounty_count()
    }

    /// Balance of a principal on the in-memory host ledger.
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.ledger.balance_of(account)
    }

    /// Balance of the escrow holding account.
    pub fn escrow_balance(&self) -> u64 {
        self.ledger.escrow_balance()
    }

    /// Current reading of the vault's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Mint units into an account (host funding surface).
    pub fn credit(&self, account: &AccountId, amount: u64) -> Result<()> {
        self.ledger.credit(account, amount)
    }
}

impl Default for TaskVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`TaskVault`] configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskvault::prelude::*;
/// use taskvault::ManualClock;
///
/// let clock = Arc::new(ManualClock::starting_at(1_000));
/// let vault = TaskVault::builder()
///     .clock(clock.clone())
///     .build();
/// assert_eq!(vault.now(), 1_000);
/// clock.advance(60);
/// assert_eq!(vault.now(), 1_060);
/// ```
pub struct VaultBuilder {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    initial_balances: Vec<(AccountId, u64)>,
}

impl VaultBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            clock: Arc::new(SystemClock),
            initial_balances: Vec::new(),
        }
    }

    /// Replace the engine configuration wholesale.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Let a create without a verifier fall back to the creator.
    ///
    /// Off by default: it lets a creator approve their own work.
    pub fn allow_creator_verifier(mut self, allow: bool) -> Self {
        self.config.creator_as_fallback_verifier = allow;
        self
    }

    /// Cap the task description length accepted at creation.
    pub fn max_description_len(mut self, len: usize) -> Self {
        self.config.max_description_len = len;
        self
    }

    /// Use a custom clock (tests and embedding hosts drive time
    /// themselves).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed an account balance before the vault opens.
    pub fn fund(mut self, account: AccountId, amount: u64) -> Self {
        self.initial_balances.push((account, amount));
        self
    }

    /// Build the vault.
    pub fn build(self) -> TaskVault {
        let store = Arc::new(RecordStore::new());
        let ledger = Arc::new(InMemoryLedger::new());
        for (account, amount) in &self.initial_balances {
            // Credit only refuses on u64 overflow, in which case the
            // account keeps its prior balance.
            let _ = ledger.credit(account, *amount);
        }
        let engine = TransitionEngine::new(
            Arc::clone(&store),
            Arc::clone(&self.clock),
            Arc::clone(&ledger) as Arc<dyn ValueTransfer>,
            self.config,
        );
        TaskVault {
            store,
            ledger,
            clock: self.clock,
            engine,
        }
    }
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    #[test]
    fn test_builder_seeds_balances() {
        let vault = TaskVault::builder()
            .fund(acct(1), 100)
            .fund(acct(2), 200)
            .build();
        assert_eq!(vault.balance_of(&acct(1)), 100);
        assert_eq!(vault.balance_of(&acct(2)), 200);
        assert_eq!(vault.escrow_balance(), 0);
        assert_eq!(vault.bounty_count(), 0);
    }

    #[test]
    fn test_credit_after_build() {
        let vault = TaskVault::new();
        vault.credit(&acct(1), 50).unwrap();
        assert_eq!(vault.balance_of(&acct(1)), 50);
    }

    #[test]
    fn test_unknown_bounty_is_not_found() {
        let vault = TaskVault::new();
        assert!(vault.bounty(0).unwrap_err().is_not_found());
    }
}
