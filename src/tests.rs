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

//! Integration tests for registry, stores and views working together

#[cfg(test)]
mod tests {
    #![allow(dead_code)]
    #![allow(clippy::module_inception)]
    use crate::{ComponentRegistry, Entity, Registry, Result};
    use std::collections::HashSet;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Transform {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        vx: f32,
        vy: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tag;

    fn registry() -> Result<Registry> {
        let mut components = ComponentRegistry::new();
        components.register_named::<Transform>("Transform")?;
        components.register_named::<Velocity>("Velocity")?;
        components.register_named::<Tag>("Tag")?;
        Ok(Registry::new(components))
    }

    /// Five entities with Transform (x=0..40, y=5..45) and Velocity (vx=0..4, vy=0..8)
    fn spawn_five(reg: &mut Registry) -> Vec<Entity> {
        (0..5)
            .map(|i| {
                let e = reg.create_entity();
                reg.emplace(
                    e,
                    Transform {
                        x: (i * 10) as f32,
                        y: (i * 10 + 5) as f32,
                    },
                );
                reg.emplace(
                    e,
                    Velocity {
                        vx: i as f32,
                        vy: (i * 2) as f32,
                    },
                );
                e
            })
            .collect()
    }

    fn view_set(reg: &Registry) -> HashSet<Entity> {
        reg.view::<(Transform, Velocity)>().iter().collect()
    }

    #[test]
    fn test_view_yields_all_five_in_creation_order() -> Result<()> {
        let mut reg = registry()?;
        let entities = spawn_five(&mut reg);

        let view = reg.view::<(Transform, Velocity)>();
        let seen: Vec<Entity> = view.iter().collect();
        assert_eq!(seen, entities);

        for (i, e) in seen.iter().enumerate() {
            let t = view.get::<Transform>(*e);
            let v = view.get::<Velocity>(*e);
            assert_eq!(t.x, (i * 10) as f32);
            assert_eq!(t.y, (i * 10 + 5) as f32);
            assert_eq!(v.vx, i as f32);
            assert_eq!(v.vy, (i * 2) as f32);
        }
        Ok(())
    }

    #[test]
    fn test_destroy_middle_entity() -> Result<()> {
        let mut reg = registry()?;
        let entities = spawn_five(&mut reg);
        let doomed = entities[2];
        let doomed_transform = *reg.get::<Transform>(doomed);

        reg.destroy_entity(doomed);

        let view = reg.view::<(Transform, Velocity)>();
        assert_eq!(view.iter().count(), 4);
        for e in view.iter() {
            assert_ne!(*view.get::<Transform>(e), doomed_transform);
        }
        assert!(!reg.is_alive(doomed));

        let reborn = reg.create_entity();
        assert_eq!(reborn.index(), doomed.index());
        assert_eq!(reborn.generation(), doomed.generation() + 1);
        assert!(!reg.has::<Transform>(reborn));
        Ok(())
    }

    #[test]
    fn test_remove_one_component_narrows_view() -> Result<()> {
        let mut reg = registry()?;
        let entities = spawn_five(&mut reg);
        let target = entities[3];

        reg.remove::<Velocity>(target);

        assert!(!view_set(&reg).contains(&target));
        assert_eq!(view_set(&reg).len(), 4);
        let transforms: HashSet<Entity> = reg.view::<(Transform,)>().iter().collect();
        assert!(transforms.contains(&target));
        assert_eq!(transforms.len(), 5);
        Ok(())
    }

    #[test]
    fn test_churn_ten_thousand() -> Result<()> {
        let mut reg = registry()?;
        let first: Vec<Entity> = (0..10_000)
            .map(|i| {
                let e = reg.create_entity();
                reg.emplace(e, Transform { x: i as f32, y: 0.0 });
                e
            })
            .collect();

        for &e in &first[..5_000] {
            reg.destroy_entity(e);
        }
        for i in 0..5_000 {
            let e = reg.create_entity();
            reg.emplace(e, Transform { x: -(i as f32), y: 0.0 });
        }

        assert_eq!(reg.len(), 10_000);
        assert_eq!(reg.view::<(Transform,)>().iter().count(), 10_000);
        assert_eq!(reg.component_len::<Transform>(), 10_000);
        for &e in &first[..5_000] {
            assert!(!reg.is_alive(e));
        }
        Ok(())
    }

    #[test]
    fn test_view_independent_of_attach_order() -> Result<()> {
        let mut reg = registry()?;
        let mut expected = HashSet::new();
        for i in 0..50u32 {
            let e = reg.create_entity();
            // Alternate the attach order and leave some entities incomplete
            if i % 2 == 0 {
                reg.emplace(e, Velocity { vx: 0.0, vy: 0.0 });
                if i % 3 != 0 {
                    reg.emplace(e, Transform { x: 0.0, y: 0.0 });
                }
            } else {
                reg.emplace(e, Transform { x: 0.0, y: 0.0 });
                if i % 5 != 0 {
                    reg.emplace(e, Velocity { vx: 0.0, vy: 0.0 });
                }
            }
            if reg.has::<Transform>(e) && reg.has::<Velocity>(e) {
                expected.insert(e);
            }
        }
        assert_eq!(view_set(&reg), expected);
        Ok(())
    }

    #[test]
    fn test_view_with_three_types() -> Result<()> {
        let mut reg = registry()?;
        let entities = spawn_five(&mut reg);
        reg.emplace(entities[1], Tag);
        reg.emplace(entities[4], Tag);

        let view = reg.view::<(Transform, Velocity, Tag)>();
        assert_eq!(view.candidates(), 2);
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![entities[1], entities[4]]);
        Ok(())
    }

    #[test]
    fn test_clear_then_reuse_behaves_like_fresh() -> Result<()> {
        let mut used = registry()?;
        spawn_five(&mut used);
        let e = used.create_entity();
        used.emplace(e, Tag);
        used.destroy_entity(e);
        used.clear();

        let mut fresh = registry()?;
        let a = spawn_five(&mut used);
        let b = spawn_five(&mut fresh);
        assert_eq!(a, b);
        assert_eq!(used.len(), fresh.len());
        assert_eq!(view_set(&used), view_set(&fresh));
        assert_eq!(used.component_len::<Tag>(), 0);
        Ok(())
    }

    #[test]
    fn test_mutation_through_collected_handles() -> Result<()> {
        let mut reg = registry()?;
        let entities = spawn_five(&mut reg);

        let movers: Vec<Entity> = reg.view::<(Transform, Velocity)>().iter().collect();
        for e in movers {
            let v = *reg.get::<Velocity>(e);
            let t = reg.get_mut::<Transform>(e);
            t.x += v.vx;
            t.y += v.vy;
        }

        let last = reg.get::<Transform>(entities[4]);
        assert_eq!((last.x, last.y), (44.0, 53.0));
        Ok(())
    }

    #[test]
    fn test_handle_round_trips_through_bits() -> Result<()> {
        let mut reg = registry()?;
        let e = reg.create_entity();
        reg.emplace(e, Tag);

        let carried = e.to_bits();
        let back = Entity::from_bits(carried);
        assert!(reg.is_alive(back));
        assert!(reg.has::<Tag>(back));

        reg.destroy_entity(e);
        assert!(!reg.is_alive(Entity::from_bits(carried)));
        Ok(())
    }
}
