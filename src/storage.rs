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

//! Per-type sparse set storage
//!
//! - `sparse[entity.index()]` → position in `dense` (or `EMPTY`)
//! - `dense` → packed component values
//! - `entities` → owning handle of each dense position
//!
//! Invariant: `dense.len() == entities.len()` and for every occupied sparse
//! slot `s`, `entities[sparse[s]].index() == s`.
//!
//! # Aliasing
//! References returned by `emplace`/`get` borrow the store, so the borrow
//! checker ends them before the next `emplace` or `remove`. Dense order is not
//! stable across removals; keep an [`Entity`] and look the value up again when
//! it has to survive a structural change.

use std::any::{type_name, Any};

use crate::component::Component;
use crate::entity::{Entity, EntityIndex, MAX_ENTITIES};

/// Sparse slot marker for "no component"
const EMPTY: EntityIndex = EntityIndex::MAX;

/// Smallest dense allocation
const MIN_CAPACITY: usize = 8;

/// Dense storage for one component type.
pub struct ComponentStore<T> {
    sparse: Box<[EntityIndex]>,
    dense: Vec<T>,
    entities: Vec<Entity>,
}

impl<T> ComponentStore<T> {
    /// Empty store with a sparse table covering every entity slot.
    pub fn new() -> Self {
        Self {
            sparse: vec![EMPTY; MAX_ENTITIES].into_boxed_slice(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Attach `value` to `entity`. If the entity already has a value, that
    /// value is kept and returned and `value` is dropped.
    #[inline]
    pub fn emplace(&mut self, entity: Entity, value: T) -> &mut T {
        self.emplace_with(entity, || value)
    }

    /// Like [`emplace`](Self::emplace) but only runs `make` when the entity
    /// has no value yet.
    pub fn emplace_with<F>(&mut self, entity: Entity, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let slot = entity.index() as usize;
        assert!(slot < self.sparse.len(), "{entity} is out of range");

        let pos = self.sparse[slot];
        if pos != EMPTY {
            debug_assert_eq!(
                self.entities[pos as usize], entity,
                "slot {slot} holds a component of another generation"
            );
            return &mut self.dense[pos as usize];
        }

        // Build the value before touching any array so a panicking
        // constructor leaves the store untouched.
        let value = make();
        self.reserve_for_push();

        let pos = self.dense.len();
        self.dense.push(value);
        self.entities.push(entity);
        self.sparse[slot] = pos as EntityIndex;
        &mut self.dense[pos]
    }

    /// Unchecked-precondition read. The entity must hold a value.
    ///
    /// # Panics
    /// Debug builds assert membership; release builds panic on the out of
    /// range dense index instead of returning garbage.
    #[inline]
    pub fn get(&self, entity: Entity) -> &T {
        debug_assert!(
            self.contains(entity),
            "{entity} has no {} component",
            type_name::<T>()
        );
        &self.dense[self.sparse[entity.index() as usize] as usize]
    }

    /// Mutable form of [`get`](Self::get).
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        debug_assert!(
            self.contains(entity),
            "{entity} has no {} component",
            type_name::<T>()
        );
        let pos = self.sparse[entity.index() as usize] as usize;
        &mut self.dense[pos]
    }

    #[inline]
    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        let pos = self.position(entity)?;
        Some(&self.dense[pos])
    }

    #[inline]
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let pos = self.position(entity)?;
        Some(&mut self.dense[pos])
    }

    /// O(1) membership. Compares the full handle, so a stale handle for a
    /// reused index reports `false`.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    /// Detach the entity's value. No-op returning `None` when absent.
    ///
    /// O(1): the last dense element moves into the hole, so dense order
    /// changes.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let pos = self.position(entity)?;
        Some(self.swap_remove_at(pos))
    }

    /// Drop every value. Only the sparse slots actually in use are reset.
    pub fn clear(&mut self) {
        for entity in &self.entities {
            self.sparse[entity.index() as usize] = EMPTY;
        }
        self.dense.clear();
        self.entities.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Allocated dense capacity, counted in owner slots.
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Owning handle of each dense position.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_at(&self, pos: usize) -> Option<Entity> {
        self.entities.get(pos).copied()
    }

    /// Component values in dense order.
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    #[inline]
    fn position(&self, entity: Entity) -> Option<usize> {
        let pos = *self.sparse.get(entity.index() as usize)?;
        if pos == EMPTY {
            return None;
        }
        let pos = pos as usize;
        (self.entities[pos] == entity).then_some(pos)
    }

    /// Grow dense values and owners together: double, minimum 8.
    ///
    /// Sized from the owner array: a `Vec` of zero-sized values reports
    /// `usize::MAX` capacity.
    fn reserve_for_push(&mut self) {
        let len = self.entities.len();
        if len < self.entities.capacity() {
            return;
        }
        let target = (self.entities.capacity() * 2).max(MIN_CAPACITY);
        self.entities.reserve_exact(target - len);
        self.dense.reserve_exact(target - len);
    }

    /// The one place that edits all three arrays on removal.
    fn swap_remove_at(&mut self, pos: usize) -> T {
        let removed = self.entities.swap_remove(pos);
        let value = self.dense.swap_remove(pos);
        if let Some(&moved) = self.entities.get(pos) {
            self.sparse[moved.index() as usize] = pos as EntityIndex;
        }
        self.sparse[removed.index() as usize] = EMPTY;
        value
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStore`], held by the registry.
///
/// Used for the operations that do not need `T`: detaching on entity
/// destruction, clearing, and handing the owner list to a view.
pub trait AnyStore: Any + Send + Sync {
    /// Remove the entity's value if present. Returns whether one was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entities(&self) -> &[Entity];

    fn contains(&self, entity: Entity) -> bool;

    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStore for ComponentStore<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn clear(&mut self) {
        ComponentStore::clear(self)
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn entities(&self) -> &[Entity] {
        ComponentStore::entities(self)
    }

    fn contains(&self, entity: Entity) -> bool {
        ComponentStore::contains(self, entity)
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
