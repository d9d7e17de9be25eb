//! Slot allocator implementation
//!
//! Slots live in two parallel vectors: the payloads and the used flags. A
//! free cursor remembers where the next allocation should land.
//!
//! # Free cursor
//!
//! `allocate` claims the slot under the cursor and then scans forward over the
//! run of used slots that follows it. `free` pulls the cursor back down to the
//! freed index when it is lower, so holes are always refilled lowest index
//! first. In the common case of filling a freshly grown region the scan stops
//! after one step. After a low hole is refilled inside a densely used pool the
//! scan is O(n) in the length of the used run above the hole.

use super::slot::{SlotIndex, SlotValue};
use super::stats::PoolStats;
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use tracing::{debug, info, warn};

/// Fixed-slot pool of scalar values
///
/// Every slot is either used (holds a live value) or free. Capacity only
/// grows: either explicitly through [`resize`](Self::resize) or by doubling
/// when [`allocate`](Self::allocate) runs out of free slots.
#[derive(Debug, Clone)]
pub struct SlotAllocator<T = i32> {
    /// Slot payloads. Only meaningful where `used` is set.
    values: Vec<T>,
    /// Occupancy flags, parallel to `values`
    used: Vec<bool>,
    /// No free slot exists below this index
    free_cursor: usize,
    /// Upper bound for growth, if any
    max_capacity: Option<usize>,
}

impl<T: SlotValue> SlotAllocator<T> {
    /// Create a pool with `initial_capacity` free slots
    ///
    /// A capacity of zero is allowed; the first allocation grows it to one.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated. Use
    /// [`try_new`](Self::try_new) for sizes that come from user input.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            values: vec![T::default(); initial_capacity],
            used: vec![false; initial_capacity],
            free_cursor: 0,
            max_capacity: None,
        }
    }

    /// Create a pool with `initial_capacity` free slots, reporting allocation failure
    ///
    /// # Errors
    ///
    /// [`Error::Reserve`] if the storage could not be reserved.
    pub fn try_new(initial_capacity: usize) -> Result<Self> {
        let mut pool = Self {
            values: Vec::new(),
            used: Vec::new(),
            free_cursor: 0,
            max_capacity: None,
        };
        if initial_capacity > 0 {
            pool.grow_to(initial_capacity)?;
        }
        Ok(pool)
    }

    /// Create a pool from a [`PoolConfig`], honoring its growth limit
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the config fails [`PoolConfig::validate`],
    /// [`Error::Reserve`] if the initial storage could not be reserved.
    pub fn with_config(config: &PoolConfig) -> Result<Self> {
        config.validate()?;
        let mut pool = Self::try_new(config.initial_capacity)?;
        pool.max_capacity = config.max_capacity;
        Ok(pool)
    }

    /// Store `value` in a free slot and return its index
    ///
    /// Reuses the lowest freed slot if one exists, otherwise takes the next
    /// never-used slot. When every slot is taken the pool doubles first.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if the pool is full and already at its
    /// growth limit, [`Error::Reserve`] if the larger storage could not be
    /// reserved. The pool is left untouched in both cases.
    pub fn allocate(&mut self, value: T) -> Result<SlotIndex> {
        if self.free_cursor >= self.size() {
            let target = self.growth_target()?;
            info!(from = self.size(), to = target, "Pool exhausted, growing");
            self.grow_to(target)?;
        }

        let index = self.free_cursor;
        self.values[index] = value;
        self.used[index] = true;

        // Skip past the run of used slots that follows the claimed one
        self.free_cursor = self.used[index..]
            .iter()
            .position(|used| !used)
            .map_or(self.used.len(), |offset| index + offset);

        let index = SlotIndex::new(index);
        debug!(index = %index, cursor = self.free_cursor, "Allocated slot");
        Ok(index)
    }

    /// Release a used slot
    ///
    /// The next allocation reuses it if it is the lowest free slot.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] past the end of the pool, [`Error::NotInUse`] if
    /// the slot is already free.
    pub fn free(&mut self, index: SlotIndex) -> Result<()> {
        let slot = self.live_slot(index)?;
        self.used[slot] = false;
        if slot < self.free_cursor {
            self.free_cursor = slot;
        }

        debug!(index = %index, cursor = self.free_cursor, "Freed slot");
        Ok(())
    }

    /// Overwrite the value of a used slot
    ///
    /// # Errors
    ///
    /// Same as [`free`](Self::free).
    pub fn write(&mut self, index: SlotIndex, value: T) -> Result<()> {
        let slot = self.live_slot(index)?;
        self.values[slot] = value;

        debug!(index = %index, "Wrote slot");
        Ok(())
    }

    /// Read the value of a used slot
    ///
    /// # Errors
    ///
    /// Same as [`free`](Self::free).
    pub fn read(&self, index: SlotIndex) -> Result<T> {
        let slot = self.live_slot(index)?;
        Ok(self.values[slot])
    }

    /// Grow the pool to `new_capacity` slots
    ///
    /// Existing slots keep their values and state; the new slots start free.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidResize`] unless `new_capacity` is strictly larger than
    /// the current size, [`Error::CapacityExceeded`] if it passes the growth
    /// limit, [`Error::Reserve`] if the memory could not be reserved.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let capacity = self.size();
        if new_capacity <= capacity {
            return Err(Error::InvalidResize {
                requested: new_capacity,
                capacity,
            });
        }
        if let Some(limit) = self.max_capacity {
            if new_capacity > limit {
                return Err(Error::CapacityExceeded { capacity, limit });
            }
        }

        self.grow_to(new_capacity)
    }

    /// Whether the slot at `index` currently holds a live value
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] past the end of the pool.
    pub fn is_used(&self, index: SlotIndex) -> Result<bool> {
        self.used
            .get(index.get())
            .copied()
            .ok_or(Error::OutOfRange {
                index,
                capacity: self.size(),
            })
    }

    /// Current number of slots
    pub fn size(&self) -> usize {
        self.used.len()
    }

    /// Number of free slots (linear scan)
    pub fn count_free(&self) -> usize {
        self.used.iter().filter(|&&used| !used).count()
    }

    /// Number of used slots (linear scan)
    pub fn used_count(&self) -> usize {
        self.size() - self.count_free()
    }

    /// Index the next allocation starts from
    ///
    /// Equal to [`size`](Self::size) when the pool must grow first.
    pub fn free_cursor(&self) -> usize {
        self.free_cursor
    }

    /// Growth limit, if one was configured
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Iterate over used slots in index order
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, T)> + '_ {
        self.used
            .iter()
            .zip(&self.values)
            .enumerate()
            .filter_map(|(i, (&used, &value))| used.then_some((SlotIndex::new(i), value)))
    }

    /// Snapshot of the pool's occupancy
    pub fn stats(&self) -> PoolStats {
        let free = self.count_free();
        PoolStats {
            capacity: self.size(),
            used: self.size() - free,
            free,
            free_cursor: self.free_cursor,
            max_capacity: self.max_capacity,
        }
    }

    /// Resolve `index` to a position holding live data
    fn live_slot(&self, index: SlotIndex) -> Result<usize> {
        match self.used.get(index.get()) {
            None => Err(Error::OutOfRange {
                index,
                capacity: self.size(),
            }),
            Some(false) => Err(Error::NotInUse { index }),
            Some(true) => Ok(index.get()),
        }
    }

    /// Capacity the pool doubles to when it runs out of slots
    fn growth_target(&self) -> Result<usize> {
        let capacity = self.size();
        let doubled = capacity.saturating_mul(2).max(1);
        let target = match self.max_capacity {
            Some(limit) => doubled.min(limit),
            None => doubled,
        };

        if target <= capacity {
            let limit = self.max_capacity.unwrap_or(usize::MAX);
            warn!(capacity, limit, "Pool full and cannot grow");
            return Err(Error::CapacityExceeded { capacity, limit });
        }
        Ok(target)
    }

    /// Extend both sequences to `new_capacity`; new slots are free
    ///
    /// Memory for both vectors is reserved before either is touched, so a
    /// failed reservation leaves the pool as it was.
    fn grow_to(&mut self, new_capacity: usize) -> Result<()> {
        let additional = new_capacity - self.size();
        self.values.try_reserve_exact(additional)?;
        self.used.try_reserve_exact(additional)?;

        self.values.resize(new_capacity, T::default());
        self.used.resize(new_capacity, false);

        debug!(capacity = new_capacity, cursor = self.free_cursor, "Resized pool");
        Ok(())
    }
}

impl<T: SlotValue> Default for SlotAllocator<T> {
    fn default() -> Self {
        Self::new(PoolConfig::DEFAULT_INITIAL_CAPACITY)
    }
}
