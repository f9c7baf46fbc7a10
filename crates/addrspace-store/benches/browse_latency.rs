//! Browse Latency Benchmark
//!
//! Measures Browse against a single node with a growing reference list.
//!
//! This benchmark tests:
//! - Unfiltered browse scaling from 100 to 10,000 references
//! - Exact reference-type filtering
//! - Subtype-expanded filtering over a reference type hierarchy

use addrspace_core::ids::reference_types;
use addrspace_core::{
    AddNodesItem, AddReferencesItem, BrowseDescription, BrowseDirection, NodeClass, NodeId,
    QualifiedName,
};
use addrspace_store::AddressSpace;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of reference types in the synthetic hierarchy
const TYPE_COUNT: u32 = 32;

/// Target node classes to spread references over
const CLASSES: &[NodeClass] = &[
    NodeClass::Object,
    NodeClass::Variable,
    NodeClass::Method,
    NodeClass::ObjectType,
];

fn type_id(n: u32) -> NodeId {
    NodeId::numeric(1, 1000 + n)
}

/// Builds a binary tree of reference types rooted at `type_id(0)` and a
/// start node carrying `size` forward references of random type and class.
fn setup_space(size: usize) -> (AddressSpace, NodeId) {
    let mut space = AddressSpace::new();
    let mut rng = StdRng::seed_from_u64(0x0A0D);

    let types: Vec<_> = (0..TYPE_COUNT)
        .map(|n| {
            let item = AddNodesItem::new(
                type_id(n),
                QualifiedName::new(1, format!("Ref{n}")),
                NodeClass::ReferenceType,
            );
            if n == 0 {
                item
            } else {
                item.with_parent(type_id((n - 1) / 2), reference_types::HAS_SUBTYPE)
            }
        })
        .collect();
    space.add_nodes(&types);

    let start = NodeId::string(1, "Start");
    space.add_nodes(&[AddNodesItem::new(
        start.clone(),
        QualifiedName::new(1, "Start"),
        NodeClass::Object,
    )]);

    let references: Vec<_> = (0..size)
        .map(|i| {
            AddReferencesItem::forward(
                start.clone(),
                type_id(rng.gen_range(0..TYPE_COUNT)),
                NodeId::numeric(1, 100_000 + i as u32),
                CLASSES[rng.gen_range(0..CLASSES.len())],
            )
        })
        .collect();
    space.add_references(&references);

    (space, start)
}

/// Benchmarks unfiltered browse at various reference counts
fn browse_latency_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("browse_latency");

    for size in [100, 1000, 5000, 10000] {
        let (space, start) = setup_space(size);
        let desc = [BrowseDescription::new(start).with_direction(BrowseDirection::Both)];

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("references", size), &size, |b, _| {
            b.iter(|| black_box(space.browse(&desc)))
        });
    }

    group.finish();
}

/// Benchmarks reference-type filtering with and without subtype expansion
fn type_filter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_filter");
    let (space, start) = setup_space(5000);

    for include_subtypes in [false, true] {
        let desc = [BrowseDescription::new(start.clone())
            .with_reference_type(type_id(1), include_subtypes)
            .with_node_class_mask(NodeClass::Object.bits() | NodeClass::Variable.bits())];

        group.bench_with_input(
            BenchmarkId::new("include_subtypes", include_subtypes),
            &include_subtypes,
            |b, _| b.iter(|| black_box(space.browse(&desc))),
        );
    }

    group.finish();
}

criterion_group!(benches, browse_latency_benchmark, type_filter_benchmark);
criterion_main!(benches);
