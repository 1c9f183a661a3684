//! Record storage for the escrow ledger
//!
//! This crate implements the keyed record store and its persistence
//! formats:
//! - [`RecordStore`]: fixed-capacity byte boxes addressed by bounty id
//! - [`codec`]: the stable binary record layout
//! - [`BountyCounter`]: the monotonic id allocator and its 8-byte format
//!
//! The store is deliberately not a database: full-record overwrites only,
//! no partial updates, no scans, no deletes. Terminal records are retained
//! for audit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod counter;
pub mod store;

pub use codec::{DESCRIPTION_OFFSET, FIXED_HEADER_LEN};
pub use counter::BountyCounter;
pub use store::RecordStore;
