//! Edge workset algorithm.
//!
//! During a reachability fixpoint, the workset holds the edges that may still
//! have an effect. After an edge is applied to a fixed point, only the edges in
//! its dependency set can have become enabled, so only those are added back.
//!
//! - [`dependencies`] computes the dependency sets, once, before the fixpoint.
//! - [`pruners`] narrow the workset down to the most promising edges.
//! - [`selectors`] pick the next edge to apply.
//! - [`reachability`] drives the fixpoint, with or without a workset.

pub mod dependencies;
pub mod pruners;
pub mod reachability;
pub mod selectors;

pub use dependencies::{
    AllEdgesEdgeDependencySetCreator, BddBasedEdgeDependencySetCreator, EdgeDependencies, EdgeDependencySetCreator,
};
pub use pruners::{EdgePruner, MaxCardinalityEdgePruner, RewardBasedEdgePruner, SequentialEdgePruner};
pub use reachability::{Reachability, ReachabilityResult};
pub use selectors::{EdgeSelector, FirstEdgeSelector, PruningEdgeSelector, RandomEdgeSelector};
