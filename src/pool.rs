/// Fixed-capacity object pool for bullets and pickups.
///
/// Slots are created lazily up to `capacity` and then recycled forever.  A
/// released slot keeps its memory; only its `active` flag and velocity change.
/// When every slot is busy `acquire` returns `None` and the caller simply
/// skips the spawn.

use crate::entities::Body;

/// Handle to a slot inside a [`Pool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotRef(pub usize);

#[derive(Clone, Debug)]
pub struct Slot<K> {
    pub body: Body,
    pub kind: K,
    pub active: bool,
}

#[derive(Clone, Debug)]
pub struct Pool<K> {
    slots: Vec<Slot<K>>,
    capacity: usize,
}

impl<K: Copy> Pool<K> {
    pub fn new(capacity: usize) -> Self {
        Pool {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reactivate any free slot with the given body, or `None` when full.
    pub fn acquire(&mut self, x: f32, y: f32, vx: f32, vy: f32, kind: K) -> Option<SlotRef> {
        let body = Body { x, y, vx, vy };
        if let Some(i) = self.slots.iter().position(|s| !s.active) {
            self.slots[i] = Slot { body, kind, active: true };
            return Some(SlotRef(i));
        }
        if self.slots.len() < self.capacity {
            self.slots.push(Slot { body, kind, active: true });
            return Some(SlotRef(self.slots.len() - 1));
        }
        None
    }

    /// Return a slot to the pool.  Releasing an already free slot is harmless.
    pub fn release(&mut self, slot: SlotRef) {
        if let Some(s) = self.slots.get_mut(slot.0) {
            s.active = false;
            s.body.vx = 0.0;
            s.body.vy = 0.0;
        }
    }

    pub fn get(&self, slot: SlotRef) -> Option<&Slot<K>> {
        self.slots.get(slot.0).filter(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (SlotRef, &Slot<K>)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotRef(i), s))
    }

    /// Refs of all active slots, collected so callers may release while walking.
    pub fn active_refs(&self) -> Vec<SlotRef> {
        self.iter_active().map(|(r, _)| r).collect()
    }

    /// Advance every active slot by its velocity over `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        for s in self.slots.iter_mut().filter(|s| s.active) {
            s.body.x += s.body.vx * dt;
            s.body.y += s.body.vy * dt;
        }
    }

    /// Release every active slot whose body matches `pred`; returns how many.
    pub fn release_where(&mut self, mut pred: impl FnMut(&Body) -> bool) -> usize {
        let doomed: Vec<SlotRef> = self
            .iter_active()
            .filter(|(_, s)| pred(&s.body))
            .map(|(r, _)| r)
            .collect();
        for r in &doomed {
            self.release(*r);
        }
        doomed.len()
    }

    pub fn clear(&mut self) -> usize {
        self.release_where(|_| true)
    }
}
