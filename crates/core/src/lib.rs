//! Core types for the escrow ledger
//!
//! This crate defines the fundamental types shared by every layer of the
//! system:
//! - [`types::AccountId`]: opaque 32-byte principal identifier
//! - [`record::BountyRecord`]: the escrow record and its status machine
//! - [`error::EscrowError`]: the canonical error taxonomy
//!
//! It has no I/O and no dependencies on the store or engine crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod types;

pub use error::{EscrowError, Result};
pub use record::{BountyRecord, Status};
pub use types::{AccountId, Timestamp};
