//! # bdd-synth: BDD variable ordering and edge workset scheduling
//!
//! **`bdd-synth`** contains the parts of a symbolic supervisor synthesis engine that decide
//! *in which order* things happen: the order of the BDD variables, and the order in which
//! transition edges are applied during reachability fixpoints.
//!
//! ## Variable ordering
//!
//! The size of a BDD depends heavily on its variable order. Variables that interact (occur
//! together in the guard, updates or synchronization of one transition) form a *hyper-edge*.
//! Orders that keep interacting variables close together tend to yield small BDDs.
//!
//! - The [`helper`] turns hyper-edges into a weighted [`graph`] (clique expansion) and
//!   converts between variable orders and permutations.
//! - The [`metrics`] score an order: total span and weighted event span (WES).
//! - The [`node_order`] algorithms (Weighted Cuthill-McKee, Sloan) order graph nodes.
//! - The [`orderers`] combine all of the above: DCSH, FORCE, sliding window and more.
//!
//! ```rust
//! use bdd_synth::bitset::BitSet;
//! use bdd_synth::config::VarOrderConfig;
//! use bdd_synth::helper::VarOrderHelper;
//! use bdd_synth::orderers::{VarOrder, VarOrdererData};
//!
//! // 'x' and 'z' interact a lot, 'y' only with 'z'.
//! let vars = vec!["x", "y", "z"];
//! let edges = vec![
//!     BitSet::from_indices(3, [0, 2]),
//!     BitSet::from_indices(3, [0, 2]),
//!     BitSet::from_indices(3, [1, 2]),
//! ];
//! let helper = VarOrderHelper::with_hyper_edges(vars.clone(), edges);
//! let data = VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars), helper);
//!
//! let orderer = VarOrderConfig::default().build_orderer::<&str>().unwrap();
//! let result = orderer.order(&data, 0);
//! let order = result.var_order.ordered_vars();
//! assert_eq!(order[1], "z");
//! ```
//!
//! ## Edge workset algorithm
//!
//! A reachability fixpoint applies edges until none of them adds states. Rather than sweeping
//! over all edges again and again, the [`workset`] algorithm only revisits the edges that may
//! have become enabled, based on per-edge dependency sets.
//!
//! The algorithms only need a few capabilities from the synthesis automaton, captured by the
//! [`symbolic`] traits. [`BddAutomaton`][crate::symbolic::BddAutomaton] implements them with
//! the small [`bdd`] engine included in this crate.
//!
//! ```rust
//! use bdd_synth::bitset::BitSet;
//! use bdd_synth::symbolic::{BddAutomaton, Direction};
//! use bdd_synth::workset::{BddBasedEdgeDependencySetCreator, EdgeDependencySetCreator, Reachability};
//!
//! // A single boolean 'on', switched on and off by two events.
//! let mut aut = BddAutomaton::new(1);
//! let on = aut.var(0);
//! let off = aut.bdd().apply_not(on);
//! let (zero, one) = (aut.bdd().zero, aut.bdd().one);
//! aut.add_edge("switch_on", off, &[(0, one)]);
//! aut.add_edge("switch_off", on, &[(0, zero)]);
//!
//! let deps = BddBasedEdgeDependencySetCreator.create(&aut, true);
//! let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
//! let result = reach.perform(off, &BitSet::ones(2), deps.forward());
//! assert!(aut.bdd().is_one(result.pred));
//! ```
//!
//! ## Core Components
//!
//! - **[`orderers`]**: Variable orderers, and the [`VarOrderer`][crate::orderers::VarOrderer] trait.
//! - **[`workset`]**: Dependency sets, pruners, selectors and the reachability driver.
//! - **[`config`]**: Option structs with defaults, parsed from the option syntax.

pub mod bdd;
pub mod bitset;
pub mod config;
pub mod error;
pub mod graph;
pub mod helper;
pub mod metrics;
pub mod node;
pub mod node_order;
pub mod orderers;
pub mod reference;
pub mod symbolic;
pub mod workset;
