//! End-to-end pool scenarios
//!
//! Mirrors the walkthrough the `demo` subcommand prints, checking every
//! intermediate result.

use slotpool::{Error, PoolConfig, Result, SharedSlotAllocator, SlotAllocator, SlotIndex};

fn idx(i: usize) -> SlotIndex {
    SlotIndex::new(i)
}

#[test]
fn test_basic_allocation_and_reading() -> Result<()> {
    let mut pool = SlotAllocator::new(3);

    assert_eq!(pool.allocate(42)?, idx(0));
    assert_eq!(pool.allocate(73)?, idx(1));
    assert_eq!(pool.read(idx(0))?, 42);
    assert_eq!(pool.read(idx(1))?, 73);
    Ok(())
}

#[test]
fn test_demo_walkthrough() -> Result<()> {
    let mut pool = SlotAllocator::new(3);
    let first = pool.allocate(42)?;
    let second = pool.allocate(73)?;

    // Writing
    pool.write(first, 100)?;
    assert_eq!(pool.read(first)?, 100);

    // Freeing and reusing
    assert_eq!(pool.count_free(), 1);
    pool.free(first)?;
    assert_eq!(pool.count_free(), 2);
    let reused = pool.allocate(999)?;
    assert_eq!(reused, first);
    assert_eq!(pool.read(reused)?, 999);

    // Error cases: the reused slot is live, so the first free succeeds
    pool.free(reused)?;
    assert_eq!(pool.free(reused), Err(Error::NotInUse { index: idx(0) }));
    assert_eq!(pool.read(reused), Err(Error::NotInUse { index: idx(0) }));
    assert_eq!(
        pool.write(idx(99), 42),
        Err(Error::OutOfRange {
            index: idx(99),
            capacity: 3
        })
    );
    assert!(matches!(pool.free(idx(99)), Err(Error::OutOfRange { .. })));

    // Automatic growth: holes at 0 and 2 are filled before the pool doubles
    assert_eq!(pool.size(), 3);
    let placed: Vec<_> = (0..5).map(|v| pool.allocate(v)).collect::<Result<_>>()?;
    assert_eq!(placed, vec![idx(0), idx(2), idx(3), idx(4), idx(5)]);
    assert_eq!(pool.size(), 6);

    // Manual resize keeps existing data
    pool.resize(20)?;
    assert_eq!(pool.size(), 20);
    assert_eq!(pool.read(second)?, 73);
    for (index, value) in placed.iter().zip(0..5) {
        assert_eq!(pool.read(*index)?, value);
    }
    Ok(())
}

#[test]
fn test_growth_on_fourth_allocation() -> Result<()> {
    let mut pool = SlotAllocator::new(3);

    for v in 0..3 {
        pool.allocate(v)?;
    }
    assert_eq!(pool.size(), 3);

    pool.allocate(3)?;
    assert_eq!(pool.size(), 6);
    pool.allocate(4)?;
    assert_eq!(pool.size(), 6);
    assert_eq!(pool.count_free(), 1);
    Ok(())
}

#[test]
fn test_stress_free_every_other() -> Result<()> {
    let mut pool = SlotAllocator::new(2);
    let indices: Vec<_> = (0..10).map(|v| pool.allocate(v)).collect::<Result<_>>()?;

    assert_eq!(indices, (0..10).map(idx).collect::<Vec<_>>());
    // 2 → 4 → 8 → 16
    assert_eq!(pool.size(), 16);

    for index in indices.iter().step_by(2) {
        pool.free(*index)?;
    }
    assert_eq!(pool.count_free(), 11);
    assert_eq!(pool.free_cursor(), 0);

    // Refill goes to the even holes in ascending order
    for expected in [0, 2, 4, 6, 8, 10] {
        assert_eq!(pool.allocate(-1)?, idx(expected));
    }
    Ok(())
}

#[test]
fn test_limited_pool_reports_exhaustion() -> Result<()> {
    let config = PoolConfig {
        initial_capacity: 1,
        max_capacity: Some(4),
    };
    let mut pool = SlotAllocator::with_config(&config)?;
    for v in 0..4 {
        pool.allocate(v)?;
    }

    // Growth failure is an error, never a sentinel slot 0
    let err = pool.allocate(4).unwrap_err();
    assert_eq!(
        err,
        Error::CapacityExceeded {
            capacity: 4,
            limit: 4
        }
    );
    assert_eq!(pool.read(idx(0))?, 0);
    assert_eq!(pool.stats().used, 4);
    Ok(())
}

#[test]
fn test_shared_pool_across_threads() {
    let pool: SharedSlotAllocator<i32> = SharedSlotAllocator::new(4);

    let workers: Vec<_> = (0..4)
        .map(|t| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    let index = pool.allocate(t * 1000 + i).unwrap();
                    assert_eq!(pool.read(index).unwrap(), t * 1000 + i);
                    if i % 2 == 0 {
                        pool.free(index).unwrap();
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.used, 200);
    assert_eq!(stats.used + stats.free, stats.capacity);
}
