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

//! Sparse ECS - Entity Component System on per-type sparse sets
//!
//! - [`Entity`]: 32-bit handle, 16-bit slot index + 16-bit generation
//! - [`EntityAllocator`]: fixed-capacity slot table with a recycling ring
//! - [`ComponentStore`]: sparse/dense storage per component type
//! - [`Registry`]: owns entities, signatures and stores
//! - [`View`]: smallest-store-first, signature-filtered iteration
//!
//! ```
//! use sparse_ecs::prelude::*;
//!
//! struct Position { x: f32, y: f32 }
//! struct Velocity { vx: f32, vy: f32 }
//!
//! let mut components = ComponentRegistry::new();
//! components.register_set::<(Position, Velocity)>().unwrap();
//! let mut registry = Registry::new(components);
//!
//! let e = registry.create_entity();
//! registry.emplace(e, Position { x: 0.0, y: 0.0 });
//! registry.emplace(e, Velocity { vx: 1.0, vy: 2.0 });
//!
//! let movers: Vec<Entity> = registry.view::<(Position, Velocity)>().iter().collect();
//! for entity in movers {
//!     let vel = registry.get::<Velocity>(entity);
//!     let (vx, vy) = (vel.vx, vel.vy);
//!     let pos = registry.get_mut::<Position>(entity);
//!     pos.x += vx;
//!     pos.y += vy;
//! }
//! assert_eq!(registry.get::<Position>(e).y, 2.0);
//! ```

pub mod allocator;
pub mod component;
pub mod entity;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod signature;
pub mod storage;
pub mod view;

#[cfg(test)]
mod tests;

pub use allocator::*;
pub use component::*;
pub use entity::*;
pub use error::*;
pub use registry::*;
pub use signature::*;
pub use storage::*;
pub use view::*;
