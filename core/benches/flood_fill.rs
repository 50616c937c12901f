use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use minegrid_core::*;

fn bench_generation(c: &mut Criterion) {
    let settings = Settings::default();
    let mut group = c.benchmark_group("generate");

    for mode in [Mode::Normal, Mode::Tournament] {
        let config = settings.game_config(mode);
        group.bench_function(format!("{mode:?}"), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                RandomMineGenerator::new(seed, (20, 20))
                    .generate(black_box(&config))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_flood_fill(c: &mut Criterion) {
    let open = MineLayout::from_mine_coords((40, 40), &[]).unwrap();
    let border: Vec<_> = (0..40).map(|row| (row, 39)).collect();
    let walled = MineLayout::from_mine_coords((40, 40), &border).unwrap();

    let mut group = c.benchmark_group("flood_fill");
    for (name, layout) in [("open", open), ("walled", walled)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || GameEngine::from_layout(Settings::default(), Mode::Normal, layout.clone()),
                |mut engine| engine.reveal(black_box((0, 0))).unwrap(),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generation, bench_flood_fill);
criterion_main!(benches);
