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

//! Component types and their registration.
//!
//! Component ids are handed out by an explicit [`ComponentRegistry`] built at
//! startup, in registration order. The resulting set is moved into a
//! [`Registry`](crate::Registry) and stays fixed for its lifetime.

use std::any::{type_name, TypeId};

use ahash::AHashMap;
use smallvec::{smallvec, SmallVec};

use crate::error::{EcsError, Result};
use crate::signature::MAX_COMPONENTS;

/// Maximum number of component types in one [`ComponentSet`] tuple
pub const MAX_SET_COMPONENTS: usize = 8;

/// Marker trait for components
///
/// Components must be 'static (no borrowed data)
pub trait Component: 'static + Send + Sync {}

/// Automatically implement Component for all valid types
impl<T: 'static + Send + Sync> Component for T {}

/// Small integer identifying a registered component type.
///
/// Doubles as the bit position in a [`Signature`](crate::Signature) and the
/// slot of the type's store inside the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u8);

impl ComponentId {
    #[inline]
    pub const fn new(id: u8) -> Self {
        debug_assert!((id as usize) < MAX_COMPONENTS);
        ComponentId(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered, append-only table of component types.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    ids: AHashMap<TypeId, ComponentId>,
    names: Vec<&'static str>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its Rust type name.
    pub fn register<T: Component>(&mut self) -> Result<ComponentId> {
        self.register_named::<T>(type_name::<T>())
    }

    /// Register `T` under a caller-chosen display name (e.g. the name a
    /// scripting layer uses for it).
    pub fn register_named<T: Component>(&mut self, name: &'static str) -> Result<ComponentId> {
        let type_id = TypeId::of::<T>();
        if self.ids.contains_key(&type_id) {
            return Err(EcsError::ComponentAlreadyRegistered(type_name::<T>()));
        }
        if self.names.len() == MAX_COMPONENTS {
            return Err(EcsError::ComponentLimitExceeded {
                limit: MAX_COMPONENTS,
            });
        }

        let id = ComponentId::new(self.names.len() as u8);
        self.ids.insert(type_id, id);
        self.names.push(name);
        Ok(id)
    }

    /// Register every type of a tuple, left to right.
    pub fn register_set<S: ComponentSet>(
        &mut self,
    ) -> Result<SmallVec<[ComponentId; MAX_SET_COMPONENTS]>> {
        S::register(self)
    }

    #[inline]
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.id_of_type(TypeId::of::<T>())
    }

    #[inline]
    pub fn id_of_type(&self, type_id: TypeId) -> Option<ComponentId> {
        self.ids.get(&type_id).copied()
    }

    pub fn id_by_name(&self, name: &str) -> Option<ComponentId> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| ComponentId::new(i as u8))
    }

    pub fn name(&self, id: ComponentId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(id, name)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &'static str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ComponentId::new(i as u8), *name))
    }
}

/// A tuple of component types, used to name the types a
/// [`View`](crate::View) requires or to register several types at once.
pub trait ComponentSet: 'static {
    /// Type ids of the members, in tuple order
    fn type_ids() -> SmallVec<[TypeId; MAX_SET_COMPONENTS]>;

    /// Rust type names of the members, in tuple order
    fn type_names() -> SmallVec<[&'static str; MAX_SET_COMPONENTS]>;

    /// Register every member with `registry`
    fn register(registry: &mut ComponentRegistry)
        -> Result<SmallVec<[ComponentId; MAX_SET_COMPONENTS]>>;
}

// DO NOT implement ComponentSet for T: Component
// This conflicts with tuple implementations
// Instead, implement only for tuples

macro_rules! impl_component_set {
    ($($T:ident),*) => {
        impl<$($T: Component),*> ComponentSet for ($($T,)*) {
            fn type_ids() -> SmallVec<[TypeId; MAX_SET_COMPONENTS]> {
                smallvec![$(TypeId::of::<$T>()),*]
            }

            fn type_names() -> SmallVec<[&'static str; MAX_SET_COMPONENTS]> {
                smallvec![$(type_name::<$T>()),*]
            }

            fn register(
                registry: &mut ComponentRegistry,
            ) -> Result<SmallVec<[ComponentId; MAX_SET_COMPONENTS]>> {
                Ok(smallvec![$(registry.register::<$T>()?),*])
            }
        }
    };
}

// Implement for tuples of 1-8 components
impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    #![allow(dead_code)]
    use super::*;

    struct Position {
        x: f32,
        y: f32,
    }

    struct Velocity {
        vx: f32,
        vy: f32,
    }

    struct Sprite;

    #[test]
    fn test_ids_follow_registration_order() -> Result<()> {
        let mut components = ComponentRegistry::new();
        let vel = components.register::<Velocity>()?;
        let pos = components.register::<Position>()?;

        assert_eq!(vel.index(), 0);
        assert_eq!(pos.index(), 1);
        assert_eq!(components.id_of::<Position>(), Some(pos));
        assert_eq!(components.id_of::<Sprite>(), None);
        assert_eq!(components.len(), 2);
        Ok(())
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut components = ComponentRegistry::new();
        components.register::<Position>().unwrap();
        let err = components.register::<Position>().unwrap_err();
        assert!(matches!(err, EcsError::ComponentAlreadyRegistered(_)));
        assert_eq!(components.len(), 1);
    }

    #[test]
    fn test_names() -> Result<()> {
        let mut components = ComponentRegistry::new();
        let pos = components.register_named::<Position>("Transform")?;
        let vel = components.register::<Velocity>()?;

        assert_eq!(components.name(pos), Some("Transform"));
        assert_eq!(components.id_by_name("Transform"), Some(pos));
        assert!(components.name(vel).unwrap().ends_with("Velocity"));
        assert_eq!(components.id_by_name("Missing"), None);
        Ok(())
    }

    #[test]
    fn test_register_set_in_tuple_order() -> Result<()> {
        let mut components = ComponentRegistry::new();
        let ids = components.register_set::<(Sprite, Position, Velocity)>()?;
        assert_eq!(
            ids.iter().map(|id| id.index()).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(components.id_of::<Sprite>(), Some(ids[0]));
        Ok(())
    }

    #[test]
    fn test_limit() {
        // 64 distinct types via const generics
        struct Tag<const N: usize>;

        macro_rules! register_tags {
            ($reg:ident; $($n:literal)*) => {
                $($reg.register::<Tag<$n>>().unwrap();)*
            };
        }

        let mut components = ComponentRegistry::new();
        register_tags!(components;
            0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
            32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47
            48 49 50 51 52 53 54 55 56 57 58 59 60 61 62 63);
        assert_eq!(components.len(), MAX_COMPONENTS);

        let err = components.register::<Position>().unwrap_err();
        assert!(matches!(
            err,
            EcsError::ComponentLimitExceeded { limit: MAX_COMPONENTS }
        ));
    }

    #[test]
    fn test_set_type_ids() {
        let ids = <(Position, Velocity)>::type_ids();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], TypeId::of::<Position>());
        assert_eq!(<(Sprite,)>::type_names().len(), 1);
    }
}
