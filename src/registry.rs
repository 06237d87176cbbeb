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

//! Registry: central entity and component storage
//!
//! Owns the entity allocator, one [`Signature`] per entity slot, and one
//! type-erased [`ComponentStore`] per registered component type. The
//! signature bit is the authority on "does E have T"; every operation here
//! keeps it in lockstep with store membership.
//!
//! Two access tiers:
//! - unchecked (`get`, `get_mut`): the caller guarantees the entity is alive
//!   and has the component. Debug builds assert it.
//! - checked (`try_*`, `is_alive`, `has`): never panic on dead handles or
//!   missing components.

use std::any::type_name;

#[cfg(feature = "profiling")]
use tracing::info_span;

use crate::allocator::EntityAllocator;
use crate::component::{Component, ComponentId, ComponentRegistry, ComponentSet};
use crate::entity::{Entity, MAX_ENTITIES};
use crate::error::{EcsError, Result};
use crate::signature::{Signature, MAX_COMPONENTS};
use crate::storage::{AnyStore, ComponentStore};
use crate::view::View;

/// Slot for one component type's store; `None` until first use
type StoreSlot = Option<Box<dyn AnyStore>>;

/// Central ECS registry
pub struct Registry {
    allocator: EntityAllocator<MAX_ENTITIES>,

    /// Component bits per entity slot. Zero for free slots.
    signatures: Box<[Signature]>,

    /// Indexed by `ComponentId`. Stores are created lazily so unused
    /// component types cost nothing.
    stores: Vec<StoreSlot>,

    /// Fixed set of component types, decided before construction
    components: ComponentRegistry,
}

impl Registry {
    /// Create an empty registry for the given component set.
    pub fn new(components: ComponentRegistry) -> Self {
        let mut stores = Vec::with_capacity(MAX_COMPONENTS);
        stores.resize_with(MAX_COMPONENTS, || None);

        Self {
            allocator: EntityAllocator::new(),
            signatures: vec![Signature::EMPTY; MAX_ENTITIES].into_boxed_slice(),
            stores,
            components,
        }
    }

    /// Component types known to this registry
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    // ========== Entity lifecycle ==========

    /// Create an entity with no components.
    ///
    /// # Panics
    /// Panics if all `MAX_ENTITIES` slots are live. Use
    /// [`try_create_entity`](Self::try_create_entity) to get an error instead.
    pub fn create_entity(&mut self) -> Entity {
        // Signature is already zero: fresh slots start empty and destroy clears them
        self.allocator.acquire()
    }

    /// Create an entity, reporting exhaustion as an error.
    pub fn try_create_entity(&mut self) -> Result<Entity> {
        self.allocator
            .try_acquire()
            .ok_or(EcsError::CapacityExhausted {
                capacity: self.allocator.capacity(),
            })
    }

    /// Check if an entity is alive
    ///
    /// Returns false for null, stale, and never-issued handles.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_valid(entity)
    }

    /// Destroy an entity and every component attached to it.
    ///
    /// # Panics
    /// Panics if the entity is dead or stale (double destroy).
    pub fn destroy_entity(&mut self, entity: Entity) {
        assert!(self.is_alive(entity), "{entity} is dead or stale");
        self.destroy_unchecked(entity);
    }

    /// Destroy an entity, reporting a dead or stale handle as an error.
    pub fn try_destroy_entity(&mut self, entity: Entity) -> Result<()> {
        if !self.is_alive(entity) {
            return Err(EcsError::EntityNotFound);
        }
        self.destroy_unchecked(entity);
        Ok(())
    }

    fn destroy_unchecked(&mut self, entity: Entity) {
        let slot = entity.index() as usize;
        let signature = self.signatures[slot];

        #[cfg(feature = "profiling")]
        let span = info_span!(
            "registry.destroy",
            entity = %entity,
            components = signature.count()
        );
        #[cfg(feature = "profiling")]
        let _span_guard = span.enter();

        if signature.is_full() {
            // Every type attached: walking all slots is as cheap as bit extraction
            for store in self.stores.iter_mut().flatten() {
                store.remove_entity(entity);
            }
        } else {
            // Cost follows the number of attached components, not MAX_COMPONENTS
            for id in signature.ones() {
                if let Some(store) = self.stores[id.index()].as_deref_mut() {
                    store.remove_entity(entity);
                }
            }
        }

        self.signatures[slot].reset();
        // Generation bump here makes every earlier handle for this slot stale
        self.allocator.release(entity.index());
    }

    // ========== Component access ==========

    /// Check if entity has a specific component. False for dead handles.
    #[inline]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        match self.components.id_of::<T>() {
            Some(id) => self.signatures[entity.index() as usize].contains(id),
            None => false,
        }
    }

    /// Attach a component. If the entity already has one, the existing value
    /// is kept and returned.
    ///
    /// The returned reference ends before the next structural change; hold on
    /// to the [`Entity`] instead when the value is needed later.
    ///
    /// # Panics
    /// Panics if the entity is dead or `T` is not registered.
    pub fn emplace<T: Component>(&mut self, entity: Entity, value: T) -> &mut T {
        self.emplace_with(entity, || value)
    }

    /// Like [`emplace`](Self::emplace), building the value only when absent.
    pub fn emplace_with<T, F>(&mut self, entity: Entity, make: F) -> &mut T
    where
        T: Component,
        F: FnOnce() -> T,
    {
        assert!(self.is_alive(entity), "{entity} is dead or stale");
        let id = self.component_id::<T>();
        self.attach(entity, id, make)
    }

    /// Checked form of [`emplace`](Self::emplace).
    pub fn try_emplace<T: Component>(&mut self, entity: Entity, value: T) -> Result<&mut T> {
        if !self.is_alive(entity) {
            return Err(EcsError::EntityNotFound);
        }
        let id = self.checked_component_id::<T>()?;
        Ok(self.attach(entity, id, || value))
    }

    fn attach<T, F>(&mut self, entity: Entity, id: ComponentId, make: F) -> &mut T
    where
        T: Component,
        F: FnOnce() -> T,
    {
        let store = store_entry::<T>(&mut self.stores[id.index()]);
        let value = store.emplace_with(entity, make);
        // Set after the store insert so a panicking constructor leaves no stale bit
        self.signatures[entity.index() as usize].set(id);
        value
    }

    /// Unchecked-precondition read for hot loops.
    ///
    /// # Panics
    /// The entity must be alive and carry `T`. Debug builds assert both; use
    /// [`try_get`](Self::try_get) when that is not guaranteed.
    #[inline]
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        debug_assert!(self.is_alive(entity), "{entity} is dead or stale");
        let id = self.component_id::<T>();
        debug_assert!(
            self.signatures[entity.index() as usize].contains(id),
            "{entity} has no {} component, use try_get for unchecked handles",
            type_name::<T>()
        );
        match self.typed_store::<T>(id) {
            Some(store) => store.get(entity),
            None => panic!("{entity} has no {} component", type_name::<T>()),
        }
    }

    /// Mutable form of [`get`](Self::get).
    #[inline]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        debug_assert!(self.is_alive(entity), "{entity} is dead or stale");
        let id = self.component_id::<T>();
        debug_assert!(
            self.signatures[entity.index() as usize].contains(id),
            "{entity} has no {} component, use try_get_mut for unchecked handles",
            type_name::<T>()
        );
        match self.typed_store_mut::<T>(id) {
            Some(store) => store.get_mut(entity),
            None => panic!("{entity} has no {} component", type_name::<T>()),
        }
    }

    /// Checked read: `None` for dead handles, missing components, or
    /// unregistered types.
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = self.present_id::<T>(entity)?;
        self.typed_store::<T>(id)?.try_get(entity)
    }

    /// Checked mutable read.
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.present_id::<T>(entity)?;
        self.typed_store_mut::<T>(id)?.try_get_mut(entity)
    }

    /// Detach a component and return it. No-op returning `None` when absent.
    ///
    /// # Panics
    /// Panics if the entity is dead or `T` is not registered.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        assert!(self.is_alive(entity), "{entity} is dead or stale");
        let id = self.component_id::<T>();
        self.detach(entity, id)
    }

    /// Checked form of [`remove`](Self::remove).
    pub fn try_remove<T: Component>(&mut self, entity: Entity) -> Result<Option<T>> {
        if !self.is_alive(entity) {
            return Err(EcsError::EntityNotFound);
        }
        let id = self.checked_component_id::<T>()?;
        Ok(self.detach(entity, id))
    }

    fn detach<T: Component>(&mut self, entity: Entity, id: ComponentId) -> Option<T> {
        // Signature first: it is the authority, a stale bit must never claim presence
        self.signatures[entity.index() as usize].clear(id);
        self.typed_store_mut::<T>(id)?.remove(entity)
    }

    // ========== Queries ==========

    /// Iterate entities that carry every component in `Q`.
    ///
    /// ```ignore
    /// for entity in registry.view::<(Position, Velocity)>().iter() {
    ///     let pos = registry.get::<Position>(entity);
    /// }
    /// ```
    pub fn view<Q: ComponentSet>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Typed store for `T`, if it has been created.
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let id = self.components.id_of::<T>()?;
        self.typed_store::<T>(id)
    }

    /// Number of entities carrying `T`.
    pub fn component_len<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, ComponentStore::len)
    }

    /// Component bits of a live entity.
    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.is_alive(entity)
            .then(|| self.signatures[entity.index() as usize])
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }

    /// Maximum number of simultaneously live entities
    pub fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// Drop every entity and component.
    ///
    /// Store slots created so far are kept (emptied), so later use needs no
    /// re-creation. Behaves like a freshly constructed registry afterwards.
    pub fn clear(&mut self) {
        #[cfg(feature = "profiling")]
        let span = info_span!("registry.clear", entities = self.allocator.len());
        #[cfg(feature = "profiling")]
        let _span_guard = span.enter();

        for store in self.stores.iter_mut().flatten() {
            store.clear();
        }
        self.signatures.fill(Signature::EMPTY);
        self.allocator.clear();
    }

    // ========== Internal helpers ==========

    pub(crate) fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub(crate) fn erased_store(&self, id: ComponentId) -> Option<&(dyn AnyStore + 'static)> {
        self.stores[id.index()].as_deref()
    }

    #[inline]
    fn component_id<T: Component>(&self) -> ComponentId {
        match self.components.id_of::<T>() {
            Some(id) => id,
            None => panic!("component type {} is not registered", type_name::<T>()),
        }
    }

    #[inline]
    fn checked_component_id<T: Component>(&self) -> Result<ComponentId> {
        self.components
            .id_of::<T>()
            .ok_or(EcsError::ComponentNotRegistered(type_name::<T>()))
    }

    /// Id of `T` if the entity is alive and its signature carries it
    #[inline]
    fn present_id<T: Component>(&self, entity: Entity) -> Option<ComponentId> {
        if !self.is_alive(entity) {
            return None;
        }
        let id = self.components.id_of::<T>()?;
        self.signatures[entity.index() as usize]
            .contains(id)
            .then_some(id)
    }

    #[inline]
    fn typed_store<T: Component>(&self, id: ComponentId) -> Option<&ComponentStore<T>> {
        self.stores[id.index()].as_deref().map(downcast_store::<T>)
    }

    #[inline]
    fn typed_store_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut ComponentStore<T>> {
        self.stores[id.index()]
            .as_deref_mut()
            .map(downcast_store_mut::<T>)
    }
}

/// Typed store in `slot`, creating it on first use.
fn store_entry<T: Component>(slot: &mut StoreSlot) -> &mut ComponentStore<T> {
    let store = slot.get_or_insert_with(|| {
        #[cfg(feature = "profiling")]
        tracing::debug!(component = type_name::<T>(), "creating component store");
        Box::new(ComponentStore::<T>::new()) as Box<dyn AnyStore>
    });
    downcast_store_mut::<T>(&mut **store)
}

fn downcast_store<'a, T: Component>(
    store: &'a (dyn AnyStore + 'static),
) -> &'a ComponentStore<T> {
    match store.as_any().downcast_ref::<ComponentStore<T>>() {
        Some(typed) => typed,
        None => unreachable!(
            "store holds {} but was looked up as {}",
            store.component_name(),
            type_name::<T>()
        ),
    }
}

fn downcast_store_mut<'a, T: Component>(
    store: &'a mut (dyn AnyStore + 'static),
) -> &'a mut ComponentStore<T> {
    let held = store.component_name();
    match store.as_any_mut().downcast_mut::<ComponentStore<T>>() {
        Some(typed) => typed,
        None => unreachable!(
            "store holds {held} but was looked up as {}",
            type_name::<T>()
        ),
    }
}
