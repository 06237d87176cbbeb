#![allow(dead_code, unused_imports)]

use sparse_ecs::prelude::*;
use std::{fs::File, time::Instant};

#[cfg(feature = "profiling")]
use tracing_subscriber::{self, prelude::*};

#[derive(Debug, Clone)]
struct Position(f32, f32);

#[derive(Debug, Clone)]
struct Velocity(f32, f32);

fn new_registry() -> Result<Registry> {
    let mut components = ComponentRegistry::new();
    components.register_set::<(Position, Velocity)>()?;
    Ok(Registry::new(components))
}

fn churn(registry: &mut Registry, rounds: usize, count: usize) {
    for round in 0..rounds {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("churn_round", round = round).entered();

        let handles: Vec<Entity> = (0..count)
            .map(|i| {
                let e = registry.create_entity();
                registry.emplace(e, Position(i as f32, 0.0));
                if i % 2 == 0 {
                    registry.emplace(e, Velocity(1.0, 1.0));
                }
                e
            })
            .collect();

        let movers: Vec<Entity> = registry.view::<(Position, Velocity)>().iter().collect();
        for e in movers {
            let (dx, dy) = {
                let v = registry.get::<Velocity>(e);
                (v.0, v.1)
            };
            let p = registry.get_mut::<Position>(e);
            p.0 += dx;
            p.1 += dy;
        }

        for e in handles {
            registry.destroy_entity(e);
        }

        #[cfg(feature = "profiling")]
        if round % 10 == 0 {
            tracing::info!("Finished churn round {}/{}", round, rounds);
        }
        #[cfg(not(feature = "profiling"))]
        let _ = round;
    }
}

#[cfg(feature = "profiling")]
fn main() -> Result<()> {
    // Set up tracing subscriber to write to a file
    let (non_blocking, _guard) = match File::create("trace.json") {
        Ok(file) => tracing_appender::non_blocking(file),
        Err(err) => {
            eprintln!("trace.json unavailable ({err}), tracing to stdout");
            tracing_appender::non_blocking(std::io::stdout())
        }
    };
    tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut registry = new_registry()?;
    let start = Instant::now();
    churn(&mut registry, 100, 10_000);
    println!("100 churn rounds of 10k entities in: {:?}", start.elapsed());
    Ok(())
}

#[cfg(not(feature = "profiling"))]
fn main() -> Result<()> {
    let mut registry = new_registry()?;
    let start = Instant::now();
    churn(&mut registry, 100, 10_000);
    println!("100 churn rounds of 10k entities in: {:?}", start.elapsed());
    println!("Enable the `profiling` feature to record a trace.");
    Ok(())
}
