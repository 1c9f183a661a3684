//! Host ledger collaborators
//!
//! The engine does not own a clock or the money. Both come from the host
//! ledger through two narrow traits:
//! - [`Clock`]: the immutable global timestamp oracle
//! - [`ValueTransfer`]: the atomic transfer primitive in and out of the
//!   escrow holding account
//!
//! [`InMemoryLedger`] and [`ManualClock`] are the reference
//! implementations used by the facade, embedding hosts, and tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use taskvault_core::types::{AccountId, Timestamp};
use taskvault_core::{EscrowError, Result};

/// The host ledger's timestamp oracle.
///
/// Readings only ever move forward; the engine compares them against
/// record deadlines and never does arithmetic on them.
pub trait Clock: Send + Sync {
    /// Current time in seconds.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp().max(0) as Timestamp
    }
}

/// A settable clock for tests and embedding hosts that drive time
/// themselves.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock pinned at `start`.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Pin the clock to an absolute reading.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::Release);
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::Acquire)
    }
}

/// The host ledger's atomic value transfer primitive.
///
/// Both directions move units between a named principal and the escrow
/// holding account in one all-or-nothing step. A transfer that would
/// overdraw MUST fail and leave every balance untouched — the engine
/// relies on that refusal to abort the enclosing operation.
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` units from `from` into the escrow holding account.
    fn deposit(&self, from: &AccountId, amount: u64) -> Result<()>;

    /// Move `amount` units from the escrow holding account to `to`.
    fn withdraw(&self, to: &AccountId, amount: u64) -> Result<()>;
}

#[derive(Debug, Default)]
struct Balances {
    accounts: HashMap<AccountId, u64>,
    escrow: u64,
}

/// In-memory host ledger: per-account balances plus the escrow holding
/// balance, all behind one lock so each transfer is atomic.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: Mutex<Balances>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` units into `account` (host/test funding surface).
    pub fn credit(&self, account: &AccountId, amount: u64) -> Result<()> {
        let mut inner = self.inner.lock();
        let balance = inner.accounts.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(EscrowError::InvalidAmount { amount })?;
        Ok(())
    }

    /// Current balance of `account`.
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.inner
            .lock()
            .accounts
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Current balance of the escrow holding account.
    pub fn escrow_balance(&self) -> u64 {
        self.inner.lock().escrow
    }
}

impl ValueTransfer for InMemoryLedger {
    fn deposit(&self, from: &AccountId, amount: u64) -> Result<()> {
        let mut inner = self.inner.lock();
        let available = inner.accounts.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(EscrowError::InsufficientFunds {
                account: *from,
                required: amount,
                available,
            });
        }
        let escrow = inner
            .escrow
            .checked_add(amount)
            .ok_or(EscrowError::InvalidAmount { amount })?;
        inner.accounts.insert(*from, available - amount);
        inner.escrow = escrow;
        Ok(())
    }

    fn withdraw(&self, to: &AccountId, amount: u64) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.escrow < amount {
            return Err(EscrowError::InsufficientEscrowBalance {
                required: amount,
                available: inner.escrow,
            });
        }
        let balance = inner.accounts.get(to).copied().unwrap_or(0);
        let credited = balance
            .checked_add(amount)
            .ok_or(EscrowError::InvalidAmount { amount })?;
        inner.escrow -= amount;
        inner.accounts.insert(*to, credited);
        Ok(())
    }
}
