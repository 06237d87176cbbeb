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

//! Entity handles.
//!
//! An [`Entity`] packs a 16-bit slot index and a 16-bit generation into one
//! `u32`. The handle is a plain value: it can be copied, hashed, handed to a
//! scripting layer as an integer and turned back into a handle later.

use std::fmt;

/// Slot index part of a handle.
pub type EntityIndex = u16;

/// Generation part of a handle.
pub type Generation = u16;

/// Number of entity slots in a [`Registry`](crate::Registry).
///
/// Must stay a power of two (the recycling ring masks instead of using modulo).
pub const MAX_ENTITIES: usize = 16384;

const INDEX_MASK: u32 = 0xFFFF;
const GENERATION_SHIFT: u32 = 16;
const NULL_BITS: u32 = u32::MAX;

/// Generation-checked entity handle: `[generation:16 | index:16]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// The null handle. Never issued by an allocator.
    pub const NULL: Entity = Entity(NULL_BITS);

    #[inline]
    pub const fn new(index: EntityIndex, generation: Generation) -> Self {
        Entity(((generation as u32) << GENERATION_SHIFT) | index as u32)
    }

    #[inline]
    pub const fn index(self) -> EntityIndex {
        (self.0 & INDEX_MASK) as EntityIndex
    }

    #[inline]
    pub const fn generation(self) -> Generation {
        (self.0 >> GENERATION_SHIFT) as Generation
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == NULL_BITS
    }

    /// Raw packed value, for carrying the handle across an FFI or scripting boundary.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuild a handle from [`to_bits`](Self::to_bits). Liveness is not checked here;
    /// pass the result through [`Registry::is_alive`](crate::Registry::is_alive).
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Entity(bits)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
