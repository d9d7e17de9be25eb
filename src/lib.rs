// slotpool - Fixed-slot block pool
// Lowest-index reuse, doubling growth, no compaction

#![warn(rust_2018_idioms)]

pub mod config;
pub mod pool;

// Re-exports for convenience
pub use config::PoolConfig;
pub use error::{Error, Result};
pub use pool::{PoolStats, SharedSlotAllocator, SlotAllocator, SlotIndex, SlotValue};

/// Slot pool error types
///
/// Every failing operation leaves the pool exactly as it was.
pub mod error {
    use crate::pool::SlotIndex;
    use std::collections::TryReserveError;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// Index at or past the end of the pool
        #[error("Illegal access: {index} is outside capacity {capacity}")]
        OutOfRange { index: SlotIndex, capacity: usize },

        /// Slot exists but holds no live value
        #[error("Block not in use: {index}")]
        NotInUse { index: SlotIndex },

        /// Resize that would not grow the pool
        #[error("New size must be larger: requested {requested}, capacity {capacity}")]
        InvalidResize { requested: usize, capacity: usize },

        /// Growth blocked by the configured limit
        #[error("Capacity exceeded: pool has {capacity} slots, limit is {limit}")]
        CapacityExceeded { capacity: usize, limit: usize },

        /// Backing storage could not be reserved
        #[error("Allocation failed: {0}")]
        Reserve(#[from] TryReserveError),

        #[error("Configuration error: {0}")]
        Config(String),
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
