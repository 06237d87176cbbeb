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

//! Error types
//!
//! Only the checked entry points (`try_*`, component registration) return
//! these. Unchecked accessors treat the same conditions as caller bugs and panic.

use std::fmt;

/// ECS error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Handle is null, stale, or was never issued
    EntityNotFound,

    /// Component type was not part of the registry's component set
    ComponentNotRegistered(&'static str),

    /// Component type registered twice
    ComponentAlreadyRegistered(&'static str),

    /// More component types than a signature can hold
    ComponentLimitExceeded { limit: usize },

    /// Every entity slot is live
    CapacityExhausted { capacity: usize },
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::EntityNotFound => write!(f, "Entity not found"),
            EcsError::ComponentNotRegistered(name) => {
                write!(f, "Component type not registered: {name}")
            }
            EcsError::ComponentAlreadyRegistered(name) => {
                write!(f, "Component type already registered: {name}")
            }
            EcsError::ComponentLimitExceeded { limit } => {
                write!(f, "Component limit exceeded: at most {limit} types")
            }
            EcsError::CapacityExhausted { capacity } => {
                write!(f, "Entity capacity exhausted: all {capacity} slots are live")
            }
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(EcsError::EntityNotFound.to_string(), "Entity not found");
        assert_eq!(
            EcsError::CapacityExhausted { capacity: 8 }.to_string(),
            "Entity capacity exhausted: all 8 slots are live"
        );
        assert_eq!(
            EcsError::ComponentNotRegistered("Foo").to_string(),
            "Component type not registered: Foo"
        );
    }
}
