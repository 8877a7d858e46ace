use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use backoffice_core::LocationId;
use backoffice_inventory::InventoryAllocationTable;
use backoffice_products::{AttributeSet, KeyAllocator, VariantTemplate, generate, reconcile};

/// Three attributes with `n` values each (n^3 combinations).
fn cube(n: usize) -> AttributeSet {
    let mut set = AttributeSet::new(3);
    for name in ["Color", "Size", "Material"] {
        let key = set.add_attribute(name).expect("attribute");
        for i in 0..n {
            set.add_value(key, &format!("{name}-{i}")).expect("value");
        }
    }
    set
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for n in [2usize, 5, 10] {
        let set = cube(n);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &set, |b, set| {
            b.iter(|| generate(black_box(set)))
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let allocation = InventoryAllocationTable::for_locations([LocationId::new(1), LocationId::new(2)]);
    let template = VariantTemplate::default();

    for n in [2usize, 5, 10] {
        let set = cube(n);
        let combinations = generate(&set);
        let mut keys = KeyAllocator::new();
        let previous =
            reconcile(Vec::new(), &combinations, &template, &allocation, &mut keys).variants;

        group.throughput(Throughput::Elements(combinations.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &previous, |b, previous| {
            b.iter(|| {
                let mut keys = KeyAllocator::new();
                reconcile(
                    black_box(previous.clone()),
                    &combinations,
                    &template,
                    &allocation,
                    &mut keys,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_reconcile);
criterion_main!(benches);
