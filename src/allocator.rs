// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-capacity entity allocator.
//!
//! A slot table of generation counters plus a ring buffer of released
//! indices. Recycled indices are handed out before fresh ones so the live
//! index range stays compact. Nothing here grows: the memory footprint is
//! decided by `CAPACITY` at compile time.

use crate::entity::{Entity, EntityIndex, Generation, MAX_ENTITIES};

/// Issues and invalidates [`Entity`] handles.
pub struct EntityAllocator<const CAPACITY: usize = MAX_ENTITIES> {
    /// Current generation per slot. Only ever incremented (wrapping).
    generations: Box<[Generation]>,
    /// Whether the slot is currently issued
    live: Box<[bool]>,
    /// Released indices waiting for reuse
    ring: Box<[EntityIndex]>,
    head: usize,
    tail: usize,
    /// Number of indices in the ring. Kept separately so a ring holding
    /// every slot is not confused with an empty one.
    recycled: usize,
    /// Next never-issued index
    high_water: usize,
    alive: usize,
}

impl<const CAPACITY: usize> EntityAllocator<CAPACITY> {
    const MASK: usize = {
        assert!(
            CAPACITY.is_power_of_two(),
            "entity capacity must be a power of two"
        );
        // Keeps every issuable handle distinct from Entity::NULL
        assert!(CAPACITY <= 1 << 15, "entity capacity must not exceed 32768");
        CAPACITY - 1
    };

    /// Create an empty allocator with every generation at zero.
    pub fn new() -> Self {
        let _ = Self::MASK;
        Self {
            generations: vec![0; CAPACITY].into_boxed_slice(),
            live: vec![false; CAPACITY].into_boxed_slice(),
            ring: vec![0; CAPACITY].into_boxed_slice(),
            head: 0,
            tail: 0,
            recycled: 0,
            high_water: 0,
            alive: 0,
        }
    }

    /// Issue a handle, or `None` when every slot is in use.
    #[inline]
    pub fn try_acquire(&mut self) -> Option<Entity> {
        let index = if self.recycled > 0 {
            let index = self.ring[self.head];
            self.head = (self.head + 1) & Self::MASK;
            self.recycled -= 1;
            index
        } else {
            if self.high_water == CAPACITY {
                return None;
            }
            let index = self.high_water as EntityIndex;
            self.high_water += 1;
            index
        };

        let slot = index as usize;
        self.live[slot] = true;
        self.alive += 1;
        Some(Entity::new(index, self.generations[slot]))
    }

    /// Issue a handle.
    ///
    /// # Panics
    /// Panics when all `CAPACITY` slots are live. Capacity is a compile-time
    /// choice of the caller, so running out is a bug rather than a runtime condition.
    #[inline]
    pub fn acquire(&mut self) -> Entity {
        match self.try_acquire() {
            Some(entity) => entity,
            None => {
                #[cfg(feature = "profiling")]
                tracing::error!(capacity = CAPACITY, "entity allocator exhausted");
                panic!("entity allocator exhausted: all {CAPACITY} slots are live");
            }
        }
    }

    /// Return `index` to circulation and bump its generation, which makes
    /// every handle previously issued for it stale.
    ///
    /// The index must be currently issued. Callers gate this through
    /// [`is_valid`](Self::is_valid).
    #[inline]
    pub fn release(&mut self, index: EntityIndex) {
        let slot = index as usize;
        debug_assert!(slot < self.high_water, "released index {index} was never issued");
        debug_assert!(self.live[slot], "index {index} released twice");

        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.live[slot] = false;
        self.ring[self.tail] = index;
        self.tail = (self.tail + 1) & Self::MASK;
        self.recycled += 1;
        self.alive -= 1;
    }

    /// O(1) liveness check: the slot has been issued, is not released, and
    /// its generation matches the handle.
    #[inline]
    pub fn is_valid(&self, entity: Entity) -> bool {
        let slot = entity.index() as usize;
        slot < self.high_water
            && self.live[slot]
            && self.generations[slot] == entity.generation()
    }

    /// Reset to the freshly constructed state.
    pub fn clear(&mut self) {
        self.generations.fill(0);
        self.live.fill(false);
        self.head = 0;
        self.tail = 0;
        self.recycled = 0;
        self.high_water = 0;
        self.alive = 0;
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.alive
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Number of indices ever issued since construction or the last `clear`.
    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    pub fn recycled_len(&self) -> usize {
        self.recycled
    }

    pub fn has_recycled(&self) -> bool {
        self.recycled > 0
    }

    /// Current generation of a slot.
    pub fn generation(&self, index: EntityIndex) -> Generation {
        self.generations[index as usize]
    }
}

impl<const CAPACITY: usize> Default for EntityAllocator<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
