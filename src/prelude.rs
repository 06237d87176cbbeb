//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use sparse_ecs::prelude::*;
//! ```

pub use crate::component::{Component, ComponentId, ComponentRegistry, ComponentSet};
pub use crate::entity::Entity;
pub use crate::error::{EcsError, Result};
pub use crate::registry::Registry;
pub use crate::storage::ComponentStore;
pub use crate::view::View;
