//! Keyed record store
//!
//! Escrow records live in fixed-capacity byte boxes addressed by bounty
//! id. The map is sharded (DashMap + FxHash) so operations on distinct
//! bounties never contend — the whole point of keying the store is that
//! unrelated records are fully independent.
//!
//! # Contract
//!
//! - `create(id, capacity)`: allocate a box once; capacity never grows.
//! - `get(id)`: decode the stored blob into a typed record.
//! - `put(id, record)`: full overwrite; the encoding must fit the box.
//! - No scans, no partial updates, no deletes. Terminal records stay.

use crate::codec;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use taskvault_core::record::BountyRecord;
use taskvault_core::{EscrowError, Result};
use tracing::debug;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// A fixed-capacity byte box holding one encoded record.
#[derive(Debug)]
struct RecordBox {
    /// Allocated size, fixed at creation.
    capacity: usize,
    /// Current encoded record bytes.
    bytes: Vec<u8>,
}

/// Keyed storage for escrow records.
///
/// # Thread safety
///
/// All operations are thread-safe; only the target id's shard is touched,
/// so distinct bounties never contend.
#[derive(Debug, Default)]
pub struct RecordStore {
    boxes: DashMap<u64, RecordBox, FxBuildHasher>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            boxes: DashMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Allocate a box for a new record.
    ///
    /// `capacity` must be sized for the record that will live here
    /// (fixed header plus description length); it never grows afterwards.
    pub fn create(&self, id: u64, capacity: usize) -> Result<()> {
        match self.boxes.entry(id) {
            Entry::Occupied(_) => Err(EscrowError::AlreadyExists { id }),
            Entry::Vacant(slot) => {
                slot.insert(RecordBox {
                    capacity,
                    bytes: Vec::with_capacity(capacity),
                });
                debug!(id, capacity, "record box allocated");
                Ok(())
            }
        }
    }

    /// Load and decode the record stored under `id`.
    pub fn get(&self, id: u64) -> Result<BountyRecord> {
        let slot = self
            .boxes
            .get(&id)
            .ok_or(EscrowError::NotFound { id })?;
        codec::decode_record(id, &slot.bytes)
    }

    /// Overwrite the record stored under `id`.
    ///
    /// The record is encoded in full; there are no partial updates. Fails
    /// with [`EscrowError::CapacityExceeded`] if the encoding outgrew the
    /// box (cannot happen for records whose description is immutable, but
    /// the contract is enforced regardless).
    pub fn put(&self, id: u64, record: &BountyRecord) -> Result<()> {
        let mut slot = self
            .boxes
            .get_mut(&id)
            .ok_or(EscrowError::NotFound { id })?;
        let encoded = codec::encode_record(record);
        if encoded.len() > slot.capacity {
            return Err(EscrowError::CapacityExceeded {
                required: encoded.len(),
                capacity: slot.capacity,
            });
        }
        slot.bytes = encoded;
        Ok(())
    }

    /// Check whether a box exists for `id`.
    pub fn contains(&self, id: u64) -> bool {
        self.boxes.contains_key(&id)
    }

    /// Number of allocated boxes (live and terminal records alike).
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Allocated capacity of the box under `id`, if it exists.
    pub fn capacity_of(&self, id: u64) -> Option<usize> {
        self.boxes.get(&id).map(|slot| slot.capacity)
    }
}
