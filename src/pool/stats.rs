//! Occupancy statistics for a slot pool

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time occupancy of a [`SlotAllocator`](super::SlotAllocator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total number of slots
    pub capacity: usize,
    /// Slots holding live values
    pub used: usize,
    /// Slots available for allocation
    pub free: usize,
    /// Index the next allocation starts from
    pub free_cursor: usize,
    /// Growth limit, if any
    pub max_capacity: Option<usize>,
}

impl PoolStats {
    /// Fraction of slots in use, `0.0` for an empty pool
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.used as f64 / self.capacity as f64
        }
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity={} used={} free={} cursor={}",
            self.capacity, self.used, self.free, self.free_cursor
        )?;
        if let Some(limit) = self.max_capacity {
            write!(f, " limit={}", limit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PoolStats {
        PoolStats {
            capacity: 8,
            used: 2,
            free: 6,
            free_cursor: 2,
            max_capacity: None,
        }
    }

    #[test]
    fn test_utilization() {
        assert_eq!(sample().utilization(), 0.25);

        let empty = PoolStats {
            capacity: 0,
            used: 0,
            free: 0,
            free_cursor: 0,
            max_capacity: None,
        };
        assert_eq!(empty.utilization(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "capacity=8 used=2 free=6 cursor=2");

        let limited = PoolStats {
            max_capacity: Some(64),
            ..sample()
        };
        assert_eq!(
            limited.to_string(),
            "capacity=8 used=2 free=6 cursor=2 limit=64"
        );
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["capacity"], 8);
        assert_eq!(value["free_cursor"], 2);
        assert!(value["max_capacity"].is_null());
    }
}
