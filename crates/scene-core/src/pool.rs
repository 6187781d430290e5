use crate::entity::EntityId;
use crate::generators::ArcCurve;
use std::collections::VecDeque;

/// Traveling marker riding a pooled arc. `progress` wraps modulo 1.
#[derive(Clone, Copy, Debug)]
pub struct ArcMarker {
    pub entity: EntityId,
    pub progress: f32,
    pub speed: f32,
}

/// One pooled connector: its polyline entity, an optional marker and the
/// curve the marker follows. Entities are referenced by id only, so
/// eviction never leaves a dangling back-reference.
#[derive(Clone, Copy, Debug)]
pub struct ArcSlot {
    pub line: EntityId,
    pub marker: Option<ArcMarker>,
    pub curve: ArcCurve,
}

/// Bounded FIFO of connector slots. Pushing past capacity returns the
/// evicted oldest slot; the caller releases its entities in the same tick.
#[derive(Debug)]
pub struct ArcPool {
    slots: VecDeque<ArcSlot>,
    capacity: usize,
}

impl ArcPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn push(&mut self, slot: ArcSlot) -> Option<ArcSlot> {
        self.slots.push_back(slot);
        if self.slots.len() > self.capacity {
            self.slots.pop_front()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArcSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ArcSlot> + '_ {
        self.slots.iter_mut()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ArcSlot> + '_ {
        self.slots.drain(..)
    }
}
