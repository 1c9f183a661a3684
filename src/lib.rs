//! # TaskVault
//!
//! Embedded escrow ledger engine for task-based payments.
//!
//! A payer funds a bounty into an escrow holding account, a worker accepts
//! it, a verifier gates release, and settlement pays out or refunds based
//! on recorded state and deadlines. Every operation is an atomic unit:
//! all checks pass or nothing moves.
//!
//! ## Quick Start
//!
//! ```
//! use taskvault::prelude::*;
//!
//! let creator = AccountId::from_bytes([1; 32]);
//! let verifier = AccountId::from_bytes([2; 32]);
//! let worker = AccountId::from_bytes([3; 32]);
//!
//! let vault = TaskVault::builder()
//!     .fund(creator, 5_000_000)
//!     .build();
//!
//! // Fund a bounty; the deposit moves into escrow immediately.
//! let deadline = vault.now() + 7 * 24 * 3600;
//! let id = vault
//!     .create_bounty(&creator, verifier, 3_000_000, deadline, b"build landing page")
//!     .unwrap();
//!
//! // Lifecycle: accept, approve, claim.
//! vault.accept(&worker, id).unwrap();
//! vault.approve(&verifier, id).unwrap();
//! vault.claim(&worker, id).unwrap();
//!
//! assert_eq!(vault.balance_of(&worker), 3_000_000);
//! assert_eq!(vault.bounty(id).unwrap().status, Status::Claimed);
//! ```
//!
//! ## Layering
//!
//! - [`taskvault_core`]: record, status machine, error taxonomy
//! - [`taskvault_store`]: keyed fixed-capacity record boxes + wire layout
//! - [`taskvault_engine`]: the transition engine and host adapters
//! - this crate: the [`TaskVault`] facade wiring them together over an
//!   in-memory host ledger

#![warn(missing_docs)]

mod error;
mod vault;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use vault::{TaskVault, VaultBuilder};

// Re-export the vocabulary types
pub use taskvault_core::record::{BountyRecord, Status};
pub use taskvault_core::types::{AccountId, Timestamp};
pub use taskvault_engine::{Clock, EngineConfig, ManualClock, Operation, SystemClock};
