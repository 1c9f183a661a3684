//! Convenience re-exports for typical usage.
//!
//! ```
//! use taskvault::prelude::*;
//! ```

pub use crate::error::{Error, Result};
pub use crate::vault::{TaskVault, VaultBuilder};
pub use taskvault_core::record::{BountyRecord, Status};
pub use taskvault_core::types::{AccountId, Timestamp};
pub use taskvault_engine::{EngineConfig, Operation};
