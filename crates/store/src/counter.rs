//! Monotonic bounty id allocator
//!
//! A single process-wide counter produces bounty ids. The engine calls
//! [`BountyCounter::next`] exactly once per successful create and never on
//! a failed attempt, so ids are unique, strictly increasing in creation
//! order, and never reused — even after a record reaches a terminal
//! status.
//!
//! The counter persists separately from the records as a single
//! big-endian `u64`.

use byteorder::{BigEndian, ByteOrder};
use std::sync::atomic::{AtomicU64, Ordering};

/// Serialized size of the counter.
pub const COUNTER_LEN: usize = 8;

/// The monotonically increasing bounty id counter.
#[derive(Debug, Default)]
pub struct BountyCounter {
    next_id: AtomicU64,
}

impl BountyCounter {
    /// Start a fresh counter at zero.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
        }
    }

    /// Resume a counter at a known value (e.g. loaded from persistence).
    pub fn starting_at(value: u64) -> Self {
        Self {
            next_id: AtomicU64::new(value),
        }
    }

    /// Allocate the next id: returns the current value, then increments
    /// by exactly one.
    #[inline]
    pub fn next(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::AcqRel)
    }

    /// Read the counter without consuming an id.
    ///
    /// This equals the number of ids allocated so far.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.next_id.load(Ordering::Acquire)
    }

    /// Serialize to the persisted 8-byte big-endian form.
    pub fn to_bytes(&self) -> [u8; COUNTER_LEN] {
        let mut buf = [0u8; COUNTER_LEN];
        BigEndian::write_u64(&mut buf, self.peek());
        buf
    }

    /// Restore a counter from its persisted 8-byte big-endian form.
    pub fn from_bytes(bytes: [u8; COUNTER_LEN]) -> Self {
        Self::starting_at(BigEndian::read_u64(&bytes))
    }
}
