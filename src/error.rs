//! Errors surfaced by the facade.
//!
//! The engine's taxonomy is already user-facing — one distinct variant per
//! guard, nothing internal to hide — so the facade re-exports it directly
//! instead of wrapping it. See [`taskvault_core::error`] for the full
//! catalogue of variants and their meanings.

pub use taskvault_core::error::EscrowError as Error;

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, Error>;
