//! Reachability and variable ordering benchmarks.
//!
//! Compares the fixed-order reachability fixpoint with the edge workset algorithm, and
//! measures the ordering algorithms on random hyper-edges.
//!
//! Run with:
//! ```bash
//! cargo bench --bench workset
//! ```

use bdd_synth::bitset::BitSet;
use bdd_synth::config::{DependencySetsKind, ReachabilityConfig, VarOrderConfig};
use bdd_synth::helper::VarOrderHelper;
use bdd_synth::orderers::{VarOrder, VarOrdererData};
use bdd_synth::reference::Ref;
use bdd_synth::symbolic::{BddAutomaton, Direction, SymbolicAutomaton};
use bdd_synth::workset::Reachability;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// Helper: automata
// ============================================================================

/// An n-bit counter, with one increment edge per bit and a reset.
fn counter(n: usize) -> BddAutomaton<String> {
    let mut aut = BddAutomaton::new(n);
    for i in 0..n {
        // Bits below 'i' are all one, bit 'i' is zero.
        let mut guard = -aut.var(i);
        for j in 0..i {
            guard = aut.bdd().apply_and(guard, aut.var(j));
        }
        let mut updates: Vec<(usize, Ref)> = (0..i).map(|j| (j, aut.bdd().zero)).collect();
        updates.push((i, aut.bdd().one));
        aut.add_edge(format!("inc{}", i), guard, &updates);
    }
    let updates: Vec<(usize, Ref)> = (0..n).map(|j| (j, aut.bdd().zero)).collect();
    let one = aut.bdd().one;
    aut.add_edge("reset".to_string(), one, &updates);
    aut
}

/// A random automaton, where each edge tests and sets a few variables.
fn random_automaton(num_vars: usize, num_edges: usize, seed: u64) -> BddAutomaton<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut aut = BddAutomaton::new(num_vars);
    for e in 0..num_edges {
        let mut guard = aut.bdd().one;
        for _ in 0..2 {
            let k = rng.random_range(0..num_vars);
            let lit = if rng.random_bool(0.5) { aut.var(k) } else { -aut.var(k) };
            guard = aut.bdd().apply_and(guard, lit);
        }
        let k = rng.random_range(0..num_vars);
        let value = if rng.random_bool(0.5) { aut.bdd().one } else { aut.bdd().zero };
        aut.add_edge(format!("e{}", e), guard, &[(k, value)]);
    }
    aut
}

fn run_reachability(aut: &BddAutomaton<String>, config: &ReachabilityConfig, direction: Direction, start: Ref) -> Ref {
    let deps = config.prepare(aut);
    let mask = BitSet::ones(aut.ordered_edges(direction).len());
    let reach = Reachability::new(aut, direction, "States");
    config.perform(&reach, start, &mask, deps.as_ref()).pred
}

// ============================================================================
// Benchmarks: reachability
// ============================================================================

fn configs() -> Vec<(&'static str, ReachabilityConfig)> {
    let workset = |kind| ReachabilityConfig {
        edge_workset: true,
        dependency_sets: kind,
        ..ReachabilityConfig::default()
    };
    vec![
        ("fixed", ReachabilityConfig::default()),
        ("workset_bdd", workset(DependencySetsKind::BddBased)),
        ("workset_all", workset(DependencySetsKind::AllEdges)),
    ]
}

fn bench_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_forward");
    group.sample_size(20);

    for n in [4, 6, 8] {
        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                b.iter(|| {
                    let aut = counter(n);
                    let init = aut.state(&vec![false; n]);
                    run_reachability(&aut, &config, Direction::Forward, init)
                });
            });
        }
    }

    group.finish();
}

fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_automaton");
    group.sample_size(20);

    for num_edges in [20, 50] {
        for (name, config) in configs() {
            for direction in [Direction::Forward, Direction::Backward] {
                let id = format!("{}/{}", name, direction);
                group.bench_with_input(BenchmarkId::new(id, num_edges), &num_edges, |b, &num_edges| {
                    b.iter(|| {
                        let aut = random_automaton(10, num_edges, 42);
                        let start = aut.state(&[false; 10]);
                        run_reachability(&aut, &config, direction, start)
                    });
                });
            }
        }
    }

    group.finish();
}

// ============================================================================
// Benchmarks: variable ordering
// ============================================================================

fn random_data(num_vars: usize, num_edges: usize, seed: u64) -> VarOrdererData<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let vars: Vec<String> = (0..num_vars).map(|i| format!("v{}", i)).collect();
    let edges: Vec<BitSet> = (0..num_edges)
        .map(|_| {
            let count = rng.random_range(2..=4);
            BitSet::from_indices(num_vars, (0..count).map(|_| rng.random_range(0..num_vars)))
        })
        .collect();
    let helper = VarOrderHelper::with_hyper_edges(vars.clone(), edges);
    VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars), helper)
}

fn bench_orderers(c: &mut Criterion) {
    let mut group = c.benchmark_group("var_order");
    group.sample_size(10);

    for num_vars in [20, 50] {
        let data = random_data(num_vars, num_vars * 2, 7);
        group.bench_with_input(BenchmarkId::new("default", num_vars), &data, |b, data| {
            let orderer = VarOrderConfig::default().build_orderer::<String>().unwrap();
            b.iter(|| orderer.order(data, 0));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_counter, bench_random, bench_orderers);

criterion_main!(benches);
