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

//! Component signature: one bit per registered component type.
//! Single `u64` word, direct bitwise ops, no allocation.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::component::ComponentId;

/// Maximum number of distinct component types.
pub const MAX_COMPONENTS: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u64);

impl Signature {
    pub const EMPTY: Signature = Signature(0);
    pub const FULL: Signature = Signature(u64::MAX);

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Signature(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, id: ComponentId) {
        self.0 |= 1 << id.index();
    }

    #[inline]
    pub fn clear(&mut self, id: ComponentId) {
        self.0 &= !(1 << id.index());
    }

    #[inline]
    pub fn contains(self, id: ComponentId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    /// True when every bit of `required` is also set here.
    #[inline]
    pub fn is_superset_of(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every one of the `MAX_COMPONENTS` bits is set.
    #[inline]
    pub fn is_full(self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Iterator over set bit positions, lowest first.
    pub fn ones(self) -> Ones {
        Ones { word: self.0 }
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Signature) -> Signature {
        Signature(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#066b})", self.0)
    }
}

/// Set bit positions of a [`Signature`].
pub struct Ones {
    word: u64,
}

impl Iterator for Ones {
    type Item = ComponentId;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.word == 0 {
            return None;
        }
        let trailing = self.word.trailing_zeros();
        self.word &= self.word - 1; // clear lowest set bit
        Some(ComponentId::new(trailing as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.word.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Ones {}
