// Serializer benchmarks: synthesis, cache hits and per-record rendering
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use featx::{
    serializer, synthesize, Interaction, ItemContext, LineConfig, LineVisitor, SerializerCache, SimpleLabel,
    UserContext,
};
use rand::prelude::*;

const CITIES: [&str; 4] = ["Seattle", "Paris", "Oslo", "Lima"];

fn generate_random_interaction(rng: &mut impl Rng, dim: usize) -> Interaction {
    Interaction {
        label: Some(SimpleLabel::new(if rng.random_bool(0.5) { 1.0 } else { -1.0 })),
        user: UserContext {
            age: Some(rng.random_range(18..80)),
            city: CITIES[rng.random_range(0..CITIES.len())].to_string(),
            segment: rng.random_bool(0.3).then(|| "returning".to_string()),
            premium: rng.random_bool(0.1),
        },
        item: ItemContext {
            id: format!("sku{}", rng.random_range(0..10_000)),
            category: "books".to_string(),
            price: rng.random_range(1.0..500.0),
            tags: vec!["sale".to_string(), "new".to_string()],
        },
        embedding: (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect(),
    }
}

fn benchmark_synthesize(c: &mut Criterion) {
    c.bench_function("synthesize_interaction", |b| {
        b.iter(|| {
            let compiled = synthesize::<Interaction, LineVisitor>().unwrap();
            black_box(compiled);
        });
    });
}

fn benchmark_cache_hit(c: &mut Criterion) {
    let cache = SerializerCache::new();
    cache.get_or_create::<Interaction, LineVisitor>().unwrap();

    c.bench_function("cache_hit", |b| {
        b.iter(|| {
            let compiled = cache.get_or_create::<Interaction, LineVisitor>().unwrap();
            black_box(compiled);
        });
    });
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_line");
    let compiled = serializer::<Interaction, LineVisitor>().unwrap();
    let mut rng = rand::rng();

    for dim in [0, 32, 256].iter() {
        let records: Vec<_> = (0..1000).map(|_| generate_random_interaction(&mut rng, *dim)).collect();
        group.bench_with_input(BenchmarkId::new("embedding_dim", dim), &records, |b, records| {
            let mut visitor = LineVisitor::new(LineConfig::default());
            b.iter(|| {
                for record in records {
                    black_box(compiled.serialize(black_box(record), &mut visitor));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_synthesize, benchmark_cache_hit, benchmark_serialize);
criterion_main!(benches);
