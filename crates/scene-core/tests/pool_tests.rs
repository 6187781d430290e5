use glam::Vec3;
use scene_core::{ArcCurve, ArcPool, ArcSlot};

fn slot(line: u32) -> ArcSlot {
    ArcSlot {
        line,
        marker: None,
        curve: ArcCurve {
            a: Vec3::X,
            ctrl: Vec3::Y,
            b: Vec3::Z,
        },
    }
}

#[test]
fn pool_never_exceeds_capacity() {
    let mut pool = ArcPool::new(4);
    for i in 0..100 {
        pool.push(slot(i));
        assert!(pool.len() <= pool.capacity());
    }
    assert_eq!(pool.len(), 4);
}

#[test]
fn pool_below_capacity_evicts_nothing() {
    let mut pool = ArcPool::new(3);
    assert!(pool.push(slot(0)).is_none());
    assert!(pool.push(slot(1)).is_none());
    assert!(pool.push(slot(2)).is_none());
    assert_eq!(pool.len(), 3);
}

#[test]
fn pool_evicts_oldest_first() {
    let mut pool = ArcPool::new(3);
    for i in 0..3 {
        assert!(pool.push(slot(i)).is_none());
    }
    // each further push evicts in insertion order
    for i in 3..20 {
        let evicted = pool.push(slot(i)).expect("over capacity must evict");
        assert_eq!(evicted.line, i - 3);
    }
}

#[test]
fn pool_iterates_in_fifo_order() {
    let mut pool = ArcPool::new(3);
    for i in 0..5 {
        pool.push(slot(i));
    }
    let lines: Vec<u32> = pool.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn pool_drain_empties() {
    let mut pool = ArcPool::new(2);
    pool.push(slot(0));
    pool.push(slot(1));
    let drained: Vec<u32> = pool.drain().map(|s| s.line).collect();
    assert_eq!(drained, vec![0, 1]);
    assert!(pool.is_empty());
}
