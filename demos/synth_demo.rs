use clap::Parser;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use bdd_synth::bitset::BitSet;
use bdd_synth::config::{DependencySetsKind, HyperEdgeAlgo, InitialVarOrder, ReachabilityConfig, VarOrderConfig};
use bdd_synth::helper::{RelationsKind, VarOrderHelper};
use bdd_synth::orderers::{VarOrder, VarOrdererData};
use bdd_synth::reference::Ref;
use bdd_synth::symbolic::{BddAutomaton, Direction, SymbolicAutomaton};
use bdd_synth::workset::Reachability;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of variables in the random ordering problem.
    #[arg(long, value_name = "INT", default_value = "20")]
    vars: usize,

    /// Number of hyper-edges in the random ordering problem.
    #[arg(long, value_name = "INT", default_value = "40")]
    hyper_edges: usize,

    /// Initial variable order.
    #[arg(long, value_name = "ORDER", default_value = "sorted")]
    initial: InitialVarOrder,

    /// Hyper-edge algorithm.
    #[arg(long, value_name = "ALGO", default_value = "default")]
    hyper_edge_algo: HyperEdgeAlgo,

    /// Maximum sliding window length.
    #[arg(long, value_name = "INT", default_value = "4")]
    window: usize,

    /// Disable DCSH.
    #[arg(long)]
    no_dcsh: bool,

    /// Disable FORCE.
    #[arg(long)]
    no_force: bool,

    /// Disable the sliding window algorithm.
    #[arg(long)]
    no_slidwin: bool,

    /// Number of bits of the counter automaton used for reachability.
    #[arg(long, value_name = "INT", default_value = "6")]
    bits: usize,

    /// Use the edge workset algorithm.
    #[arg(long)]
    workset: bool,

    /// Dependency sets for the edge workset algorithm.
    #[arg(long, value_name = "KIND", default_value = "bdd-based")]
    deps: DependencySetsKind,

    /// Random seed.
    #[arg(long, value_name = "INT", default_value = "42")]
    seed: u64,

    /// Enable debug output.
    #[arg(long)]
    debug: bool,
}

/// An n-bit counter, with one increment edge per bit and a reset.
fn counter(n: usize) -> BddAutomaton<String> {
    let mut aut = BddAutomaton::new(n);
    for i in 0..n {
        let mut guard = -aut.var(i);
        for j in 0..i {
            guard = aut.bdd().apply_and(guard, aut.var(j));
        }
        let zero = aut.bdd().zero;
        let one = aut.bdd().one;
        let mut updates: Vec<(usize, Ref)> = (0..i).map(|j| (j, zero)).collect();
        updates.push((i, one));
        aut.add_edge(format!("inc{}", i), guard, &updates);
    }
    let zero = aut.bdd().zero;
    let one = aut.bdd().one;
    let updates: Vec<(usize, Ref)> = (0..n).map(|j| (j, zero)).collect();
    aut.add_edge("reset".to_string(), one, &updates);
    aut
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.debug {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    // Variable ordering on random hyper-edges.
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let vars: Vec<String> = (0..args.vars).map(|i| format!("v{}", i)).collect();
    let hyper_edges: Vec<BitSet> = (0..args.hyper_edges)
        .map(|_| {
            let count = rng.random_range(2..=4);
            BitSet::from_indices(args.vars, (0..count).map(|_| rng.random_range(0..args.vars)))
        })
        .collect();
    let helper = VarOrderHelper::with_hyper_edges(vars.clone(), hyper_edges);
    let data = VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars.clone()), helper);

    let config = VarOrderConfig {
        initial: args.initial,
        dcsh: !args.no_dcsh,
        force: !args.no_force,
        sliding_window: !args.no_slidwin,
        sliding_window_size: args.window,
        hyper_edge_algo: args.hyper_edge_algo,
    };
    let orderer = config.build_orderer::<String>()?;
    println!("orderer = {}", orderer);

    let time_order = std::time::Instant::now();
    let result = orderer.order(&data, 0);
    let order = result.var_order.ordered_vars();
    println!("Ordering done in {:?}", time_order.elapsed());
    println!("order = {:?}", order);

    let helper = &data.helper;
    let kind = RelationsKind::Legacy;
    let model_indices: Vec<usize> = (0..vars.len()).collect();
    println!("{}", helper.fmt_metrics(&model_indices, "model", kind));
    let new_indices = helper.get_new_indices_for_var_order(&order);
    println!("{}", helper.fmt_metrics(&new_indices, "ordered", kind));

    // Reachability on a counter.
    let aut = counter(args.bits);
    let reach_config = ReachabilityConfig {
        edge_workset: args.workset,
        dependency_sets: args.deps,
        ..ReachabilityConfig::default()
    };
    let deps = reach_config.prepare(&aut);

    let init = aut.state(&vec![false; args.bits]);
    let mask = BitSet::ones(aut.ordered_edges(Direction::Forward).len());
    let time_reach = std::time::Instant::now();
    let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
    let result = reach_config.perform(&reach, init, &mask, deps.as_ref());
    println!(
        "Forward reachability: {} states ({} BDD nodes), {} edge applications, in {:?}",
        aut.count_states(result.pred),
        aut.bdd().size(result.pred),
        result.applications,
        time_reach.elapsed()
    );

    let last = aut.state(&vec![true; args.bits]);
    let reach = Reachability::new(&aut, Direction::Backward, "Nonblocking states");
    let result = reach_config.perform(&reach, last, &mask, deps.as_ref());
    println!(
        "Backward reachability: {} states, {} edge applications",
        aut.count_states(result.pred),
        result.applications
    );

    println!("BDD nodes allocated: {}", aut.bdd().num_nodes());

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
