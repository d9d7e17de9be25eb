//! Slot pool
//!
//! A contiguous table of scalar slots, each either used or free, with
//! lowest-index reuse and doubling growth. Nothing is ever compacted and
//! capacity never shrinks, so a [`SlotIndex`] keeps pointing at the same
//! slot for the life of the pool.
//!
//! # Architecture
//!
//! ```text
//! SlotAllocator<T>
//!   ├─→ values: [42, 73, ??, 10, ??, ??]
//!   ├─→ used:   [ 1,  1,  0,  1,  0,  0]
//!   └─→ free_cursor = 2   (no free slot below it)
//!
//! allocate(v) ─→ cursor == size? ─→ grow ×2 (clamped to max_capacity)
//!             └─→ claim slot[cursor], scan forward to next free slot
//! free(i)     ─→ mark free, cursor = min(cursor, i)
//!
//! SharedSlotAllocator<T>
//!   └─→ Arc<Mutex<SlotAllocator<T>>>  (one lock for the whole table)
//! ```

pub mod allocator;
pub mod shared;
pub mod slot;
pub mod stats;

pub use allocator::SlotAllocator;
pub use shared::SharedSlotAllocator;
pub use slot::{SlotIndex, SlotValue};
pub use stats::PoolStats;
