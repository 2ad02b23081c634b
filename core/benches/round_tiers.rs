use criterion::{Criterion, criterion_group, criterion_main};
use gemmines_core::{AutoReveal, GameConfig, MinesEngine, RevealCap, initialize_grid, multiplier_table};
use std::hint::black_box;

fn grid_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialize_grid");
    for mines in [1u16, 5, 12, 20, 24] {
        group.bench_function(format!("5x5_{mines}_mines"), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(initialize_grid(5, black_box(mines), seed))
            })
        });
    }
    group.finish();
}

fn auto_rounds(c: &mut Criterion) {
    c.bench_function("auto_round_5_tiles", |b| {
        let mut seed = 0u64;
        let mut engine = MinesEngine::new();
        b.iter(|| {
            seed = seed.wrapping_add(1);
            engine.reset();
            engine.place_bet(GameConfig::classic(5), 50, seed).unwrap();
            let mut auto = AutoReveal::new(engine.round().unwrap(), Some(5), seed);
            black_box(auto.run_to_end(&mut engine).unwrap())
        })
    });
}

fn tables(c: &mut Criterion) {
    c.bench_function("multiplier_table_all_mines", |b| {
        b.iter(|| {
            for mines in 1u16..25 {
                black_box(multiplier_table(25, mines, RevealCap::CLASSIC));
            }
        })
    });
}

criterion_group!(benches, grid_generation, auto_rounds, tables);
criterion_main!(benches);
