//! Slot handles and the scalar bound for slot payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a slot in the pool
///
/// Returned by [`SlotAllocator::allocate`](super::SlotAllocator::allocate).
/// An index stays valid across growth; it only stops referring to live data
/// once the slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Create a slot index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this slot in the backing storage
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for SlotIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<SlotIndex> for usize {
    fn from(index: SlotIndex) -> Self {
        index.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// Scalar payload stored in a slot
///
/// Free slots keep whatever value they last held (or `Default::default()` for
/// slots that were never claimed); that value is never handed out.
pub trait SlotValue: Copy + Default + fmt::Debug {}

impl<T: Copy + Default + fmt::Debug> SlotValue for T {}
