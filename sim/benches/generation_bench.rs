use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sim::{BaseScenario, ScenarioConfig};
use sector_models::SectorType;

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for layers in [1, 10, 50, 200] {
        let scenario = ScenarioConfig {
            shape: SectorType::X,
            base: BaseScenario::OverflierClimber,
            seed: 223,
            ..Default::default()
        }
        .with_extra_layers(layers)
        .build()
        .unwrap();

        group.bench_function(format!("{layers}_layers"), |b| {
            b.iter(|| black_box(scenario.collect_aircraft().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
