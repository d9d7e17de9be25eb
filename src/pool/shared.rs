//! Thread-safe handle around a slot pool
//!
//! The cursor and the slot table change together, so the whole pool sits
//! behind one exclusive lock. Each call holds it for exactly one operation.

use super::allocator::SlotAllocator;
use super::slot::{SlotIndex, SlotValue};
use super::stats::PoolStats;
use crate::config::PoolConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, lock-guarded [`SlotAllocator`]
///
/// Clones share the same pool.
#[derive(Debug)]
pub struct SharedSlotAllocator<T = i32> {
    inner: Arc<Mutex<SlotAllocator<T>>>,
}

impl<T> Clone for SharedSlotAllocator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: SlotValue> SharedSlotAllocator<T> {
    /// Create a shared pool with `initial_capacity` free slots
    pub fn new(initial_capacity: usize) -> Self {
        SlotAllocator::new(initial_capacity).into()
    }

    /// Create a shared pool from a [`PoolConfig`]
    ///
    /// # Errors
    ///
    /// Same as [`SlotAllocator::with_config`].
    pub fn with_config(config: &PoolConfig) -> Result<Self> {
        SlotAllocator::with_config(config).map(Self::from)
    }

    /// See [`SlotAllocator::allocate`]
    pub fn allocate(&self, value: T) -> Result<SlotIndex> {
        self.inner.lock().allocate(value)
    }

    /// See [`SlotAllocator::free`]
    pub fn free(&self, index: SlotIndex) -> Result<()> {
        self.inner.lock().free(index)
    }

    /// See [`SlotAllocator::write`]
    pub fn write(&self, index: SlotIndex, value: T) -> Result<()> {
        self.inner.lock().write(index, value)
    }

    /// See [`SlotAllocator::read`]
    pub fn read(&self, index: SlotIndex) -> Result<T> {
        self.inner.lock().read(index)
    }

    /// See [`SlotAllocator::resize`]
    pub fn resize(&self, new_capacity: usize) -> Result<()> {
        self.inner.lock().resize(new_capacity)
    }

    /// See [`SlotAllocator::is_used`]
    pub fn is_used(&self, index: SlotIndex) -> Result<bool> {
        self.inner.lock().is_used(index)
    }

    /// See [`SlotAllocator::size`]
    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    /// See [`SlotAllocator::count_free`]
    pub fn count_free(&self) -> usize {
        self.inner.lock().count_free()
    }

    /// See [`SlotAllocator::stats`]
    pub fn stats(&self) -> PoolStats {
        self.inner.lock().stats()
    }

    /// Run `f` with exclusive access to the pool
    ///
    /// Use this to make several operations atomic with respect to other
    /// handles.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut SlotAllocator<T>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<T> From<SlotAllocator<T>> for SharedSlotAllocator<T> {
    fn from(pool: SlotAllocator<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}
