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

//! Multi-component views
//!
//! Construction is the only step that goes through the type-erased store
//! interface: it picks the requested store with the fewest entries, caches
//! that store's owner list, and ORs the requested bits into one required
//! signature. Iteration then walks the cached slice and tests
//! `signature & required == required` per candidate. The rarest component
//! type bounds the walk, not the total entity count.
//!
//! A view borrows the registry, so structural changes are rejected by the
//! borrow checker while it is alive. To mutate inside a pass, collect the
//! handles first:
//!
//! ```ignore
//! let movers: Vec<Entity> = registry.view::<(Position, Velocity)>().iter().collect();
//! for entity in movers {
//!     let vel = *registry.get::<Velocity>(entity);
//!     let pos = registry.get_mut::<Position>(entity);
//!     pos.x += vel.vx;
//! }
//! ```

use std::iter::FusedIterator;
use std::marker::PhantomData;

#[cfg(feature = "profiling")]
use tracing::trace;

use crate::component::{Component, ComponentSet};
use crate::entity::Entity;
use crate::registry::Registry;
use crate::signature::Signature;

/// Short-lived query over the component types in `Q`.
pub struct View<'r, Q: ComponentSet> {
    registry: &'r Registry,
    /// Owner list of the smallest requested store
    entities: &'r [Entity],
    signatures: &'r [Signature],
    required: Signature,
    _phantom: PhantomData<fn() -> Q>,
}

impl<'r, Q: ComponentSet> View<'r, Q> {
    /// Build a view over `registry`.
    ///
    /// # Panics
    /// Panics if a type in `Q` is not registered.
    pub fn new(registry: &'r Registry) -> Self {
        let mut required = Signature::EMPTY;
        let mut entities: &'r [Entity] = &[];
        let mut smallest = usize::MAX;

        for (type_id, name) in Q::type_ids().into_iter().zip(Q::type_names()) {
            let id = match registry.components().id_of_type(type_id) {
                Some(id) => id,
                None => panic!("component type {name} is not registered"),
            };
            required.set(id);

            // A store that was never created counts as empty
            let candidates: &'r [Entity] = match registry.erased_store(id) {
                Some(store) => store.entities(),
                None => &[],
            };
            if candidates.len() < smallest {
                smallest = candidates.len();
                entities = candidates;
            }
        }

        #[cfg(feature = "profiling")]
        trace!(
            candidates = entities.len(),
            required = required.bits(),
            "view constructed"
        );

        Self {
            registry,
            entities,
            signatures: registry.signatures(),
            required,
            _phantom: PhantomData,
        }
    }

    /// Iterator positioned at the first match.
    pub fn iter(&self) -> ViewIter<'r> {
        self.begin()
    }

    pub fn begin(&self) -> ViewIter<'r> {
        ViewIter::new(self.entities, self.signatures, self.required, 0)
    }

    /// Past-the-end position, for position comparisons.
    pub fn end(&self) -> ViewIter<'r> {
        ViewIter::new(
            self.entities,
            self.signatures,
            self.required,
            self.entities.len(),
        )
    }

    /// Length of the driving list: an upper bound on the number of matches.
    pub fn candidates(&self) -> usize {
        self.entities.len()
    }

    /// OR of the requested component bits
    pub fn required(&self) -> Signature {
        self.required
    }

    /// True when the entity is alive and carries every requested component.
    pub fn contains(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity)
            && self.signatures[entity.index() as usize].is_superset_of(self.required)
    }

    /// Read a component of an entity produced by this view.
    #[inline]
    pub fn get<T: Component>(&self, entity: Entity) -> &'r T {
        self.registry.get::<T>(entity)
    }

    #[inline]
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&'r T> {
        self.registry.try_get::<T>(entity)
    }

    /// Read-only parallel pass over the same matches.
    #[cfg(feature = "parallel")]
    pub fn par_iter(&self) -> impl rayon::iter::ParallelIterator<Item = Entity> + 'r {
        use rayon::prelude::*;

        let signatures = self.signatures;
        let required = self.required;
        self.entities
            .par_iter()
            .copied()
            .filter(move |entity| signatures[entity.index() as usize].is_superset_of(required))
    }
}

impl<'v, 'r, Q: ComponentSet> IntoIterator for &'v View<'r, Q> {
    type Item = Entity;
    type IntoIter = ViewIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward-only, position-based iterator over a [`View`].
///
/// Always rests on a matching candidate or at the end. Equality compares
/// position only.
#[derive(Clone, Debug)]
pub struct ViewIter<'r> {
    entities: &'r [Entity],
    signatures: &'r [Signature],
    required: Signature,
    position: usize,
}

impl<'r> ViewIter<'r> {
    fn new(
        entities: &'r [Entity],
        signatures: &'r [Signature],
        required: Signature,
        position: usize,
    ) -> Self {
        let mut iter = Self {
            entities,
            signatures,
            required,
            position,
        };
        iter.skip_non_matching();
        iter
    }

    /// Move at least one position, then past every non-matching candidate.
    #[inline]
    pub fn advance(&mut self) {
        self.position += 1;
        self.skip_non_matching();
    }

    /// Entity at the current position, `None` at the end.
    #[inline]
    pub fn current(&self) -> Option<Entity> {
        self.entities.get(self.position).copied()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_end(&self) -> bool {
        self.position >= self.entities.len()
    }

    #[inline]
    fn matches(&self, candidate: Entity) -> bool {
        self.signatures[candidate.index() as usize].is_superset_of(self.required)
    }

    #[inline]
    fn skip_non_matching(&mut self) {
        while let Some(&candidate) = self.entities.get(self.position) {
            if self.matches(candidate) {
                break;
            }
            self.position += 1;
        }
    }
}

impl PartialEq for ViewIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for ViewIter<'_> {}

impl Iterator for ViewIter<'_> {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.current()?;
        self.advance();
        Some(entity)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entities.len().saturating_sub(self.position)))
    }
}

impl FusedIterator for ViewIter<'_> {}
