use sparse_ecs::prelude::*;
use sparse_ecs::{EntityAllocator, MAX_ENTITIES};

struct Marker;

fn new_registry() -> Registry {
    let mut components = ComponentRegistry::new();
    components.register::<Marker>().unwrap();
    Registry::new(components)
}

#[test]
fn test_fill_to_capacity_then_recycle() -> Result<()> {
    let mut reg = new_registry();
    let mut handles = Vec::with_capacity(MAX_ENTITIES);
    for _ in 0..MAX_ENTITIES {
        let e = reg.try_create_entity()?;
        reg.emplace(e, Marker);
        handles.push(e);
    }
    assert_eq!(reg.len(), reg.capacity());
    assert!(matches!(
        reg.try_create_entity(),
        Err(EcsError::CapacityExhausted { .. })
    ));

    reg.destroy_entity(handles[100]);
    let reused = reg.try_create_entity()?;
    assert_eq!(reused.index(), handles[100].index());
    assert_eq!(reg.view::<(Marker,)>().iter().count(), MAX_ENTITIES - 1);
    Ok(())
}

#[test]
#[should_panic(expected = "entity allocator exhausted")]
fn test_create_past_capacity_panics() {
    let mut reg = new_registry();
    for _ in 0..=MAX_ENTITIES {
        reg.create_entity();
    }
}

#[test]
fn test_small_allocator_round_trip() {
    let mut alloc = EntityAllocator::<16>::new();
    let all: Vec<Entity> = (0..16).map(|_| alloc.acquire()).collect();
    for e in all.iter().rev() {
        alloc.release(e.index());
    }
    // Released newest first, so reissue comes back in that order
    let again: Vec<u16> = (0..16).map(|_| alloc.acquire().index()).collect();
    let expected: Vec<u16> = (0..16).rev().collect();
    assert_eq!(again, expected);
    assert!(alloc.try_acquire().is_none());
}
