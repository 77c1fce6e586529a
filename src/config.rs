//! Configuration of variable ordering and reachability.
//!
//! Enum options use the names of the option syntax, e.g. `"reverse-sorted"` or `"bdd-based"`,
//! both for parsing and for display.

use std::fmt;
use std::str::FromStr;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::helper::{RelationsKind, Variable};
use crate::metrics::VarOrderMetricKind;
use crate::node_order::PseudoPeripheralNodeFinderKind;
use crate::orderers::{
    DcshVarOrderer, ForceVarOrderer, ModelVarOrderer, RandomVarOrderer, ReverseVarOrderer, SequentialVarOrderer,
    SlidingWindowVarOrderer, SortedVarOrderer, VarOrderer, VarOrdererEffect,
};
use crate::symbolic::{Direction, ReachabilityHost, SymbolicAutomaton};
use crate::workset::{
    AllEdgesEdgeDependencySetCreator, BddBasedEdgeDependencySetCreator, EdgeDependencies, EdgeDependencySetCreator,
    PruningEdgeSelector, Reachability, ReachabilityResult,
};

/// The initial variable order, before any ordering algorithm is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InitialVarOrder {
    Model,
    ReverseModel,
    Sorted,
    ReverseSorted,
    /// A random order, with an optional seed.
    Random(Option<u64>),
}

impl fmt::Display for InitialVarOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialVarOrder::Model => f.write_str("model"),
            InitialVarOrder::ReverseModel => f.write_str("reverse-model"),
            InitialVarOrder::Sorted => f.write_str("sorted"),
            InitialVarOrder::ReverseSorted => f.write_str("reverse-sorted"),
            InitialVarOrder::Random(None) => f.write_str("random"),
            InitialVarOrder::Random(Some(seed)) => write!(f, "random:{}", seed),
        }
    }
}

impl FromStr for InitialVarOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim().to_lowercase();
        match text.as_str() {
            "model" => Ok(InitialVarOrder::Model),
            "reverse-model" => Ok(InitialVarOrder::ReverseModel),
            "sorted" => Ok(InitialVarOrder::Sorted),
            "reverse-sorted" => Ok(InitialVarOrder::ReverseSorted),
            "random" => Ok(InitialVarOrder::Random(None)),
            _ => match text.strip_prefix("random:") {
                Some(seed) => match seed.trim().parse::<u64>() {
                    Ok(seed) => Ok(InitialVarOrder::Random(Some(seed))),
                    Err(_) => Err(Error::option("initial order", s, "invalid random seed number")),
                },
                None => Err(Error::option(
                    "initial order",
                    s,
                    concat!(
                        "expected \"model\", \"reverse-model\", \"sorted\", ",
                        "\"reverse-sorted\", \"random\" or \"random:SEED\""
                    ),
                )),
            },
        }
    }
}

/// Which relations the ordering algorithms use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HyperEdgeAlgo {
    Legacy,
    Linearized,
    /// Linearized for FORCE and sliding window, legacy otherwise.
    Default,
}

impl HyperEdgeAlgo {
    /// Returns the relations to use for the orderer with the given option name.
    pub fn relations_for(self, orderer: &str) -> RelationsKind {
        match self {
            HyperEdgeAlgo::Legacy => RelationsKind::Legacy,
            HyperEdgeAlgo::Linearized => RelationsKind::Linearized,
            HyperEdgeAlgo::Default => match orderer {
                "force" | "slidwin" => RelationsKind::Linearized,
                _ => RelationsKind::Legacy,
            },
        }
    }
}

impl fmt::Display for HyperEdgeAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HyperEdgeAlgo::Legacy => "legacy",
            HyperEdgeAlgo::Linearized => "linearized",
            HyperEdgeAlgo::Default => "default",
        })
    }
}

impl FromStr for HyperEdgeAlgo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(HyperEdgeAlgo::Legacy),
            "linearized" => Ok(HyperEdgeAlgo::Linearized),
            "default" => Ok(HyperEdgeAlgo::Default),
            _ => Err(Error::option(
                "hyper-edge algorithm",
                s,
                "expected \"legacy\", \"linearized\" or \"default\"",
            )),
        }
    }
}

/// Variable ordering configuration. Use `VarOrderConfig::default()` for standard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarOrderConfig {
    /// Initial variable order (default: sorted)
    pub initial: InitialVarOrder,
    /// Whether to apply DCSH (default: true)
    pub dcsh: bool,
    /// Whether to apply FORCE (default: true)
    pub force: bool,
    /// Whether to apply the sliding window algorithm (default: true)
    pub sliding_window: bool,
    /// Maximum sliding window length, in `1..=12` (default: 4)
    pub sliding_window_size: usize,
    /// Relations used by the algorithms (default: default)
    pub hyper_edge_algo: HyperEdgeAlgo,
}

impl Default for VarOrderConfig {
    fn default() -> Self {
        Self {
            initial: InitialVarOrder::Sorted,
            dcsh: true,
            force: true,
            sliding_window: true,
            sliding_window_size: 4,
            hyper_edge_algo: HyperEdgeAlgo::Default,
        }
    }
}

impl VarOrderConfig {
    fn initial_orderer<V: Variable + 'static>(&self) -> Result<Box<dyn VarOrderer<V>>> {
        let reverse = || -> Box<dyn VarOrderer<V>> {
            Box::new(ReverseVarOrderer::new(
                self.hyper_edge_algo.relations_for("reverse"),
                VarOrdererEffect::Both,
            ))
        };
        Ok(match self.initial {
            InitialVarOrder::Model => Box::new(ModelVarOrderer::new(VarOrdererEffect::Both)),
            InitialVarOrder::ReverseModel => Box::new(SequentialVarOrderer::new(vec![
                Box::new(ModelVarOrderer::new(VarOrdererEffect::VarOrder)),
                reverse(),
            ])?),
            InitialVarOrder::Sorted => Box::new(SortedVarOrderer::new(VarOrdererEffect::Both)),
            InitialVarOrder::ReverseSorted => Box::new(SequentialVarOrderer::new(vec![
                Box::new(SortedVarOrderer::new(VarOrdererEffect::VarOrder)),
                reverse(),
            ])?),
            InitialVarOrder::Random(seed) => Box::new(RandomVarOrderer::new(seed, VarOrdererEffect::Both)),
        })
    }

    /// Builds the orderer: the initial order, followed by the enabled algorithms.
    pub fn build_orderer<V: Variable + 'static>(&self) -> Result<Box<dyn VarOrderer<V>>> {
        let algo = self.hyper_edge_algo;
        let mut orderers = vec![self.initial_orderer()?];
        if self.dcsh {
            orderers.push(Box::new(DcshVarOrderer::new(
                PseudoPeripheralNodeFinderKind::GeorgeLiu,
                VarOrderMetricKind::Wes,
                algo.relations_for("dcsh"),
                VarOrdererEffect::VarOrder,
            )));
        }
        if self.force {
            orderers.push(Box::new(ForceVarOrderer::new(
                VarOrderMetricKind::TotalSpan,
                algo.relations_for("force"),
                VarOrdererEffect::VarOrder,
            )));
        }
        if self.sliding_window {
            orderers.push(Box::new(SlidingWindowVarOrderer::new(
                self.sliding_window_size,
                VarOrderMetricKind::TotalSpan,
                algo.relations_for("slidwin"),
                VarOrdererEffect::VarOrder,
            )?));
        }

        if orderers.len() == 1 {
            return Ok(orderers.remove(0));
        }
        Ok(Box::new(SequentialVarOrderer::new(orderers)?))
    }
}

/// How to compute edge dependency sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DependencySetsKind {
    BddBased,
    AllEdges,
}

impl fmt::Display for DependencySetsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DependencySetsKind::BddBased => "bdd-based",
            DependencySetsKind::AllEdges => "all-edges",
        })
    }
}

impl FromStr for DependencySetsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bdd-based" => Ok(DependencySetsKind::BddBased),
            "all-edges" => Ok(DependencySetsKind::AllEdges),
            _ => Err(Error::option("dependency sets", s, "expected \"bdd-based\" or \"all-edges\"")),
        }
    }
}

/// Reachability configuration. Use `ReachabilityConfig::default()` for standard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityConfig {
    /// Whether to use the edge workset algorithm (default: false)
    pub edge_workset: bool,
    /// How to compute the dependency sets (default: bdd-based)
    pub dependency_sets: DependencySetsKind,
    /// Whether forward reachability is performed, so forward dependency sets are needed (default: true)
    pub forward_enabled: bool,
    /// Reward for applying an edge with an effect (default: 1)
    pub effect_reward: i32,
    /// Reward for applying an edge without an effect (default: -1)
    pub no_effect_reward: i32,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            edge_workset: false,
            dependency_sets: DependencySetsKind::BddBased,
            forward_enabled: true,
            effect_reward: 1,
            no_effect_reward: -1,
        }
    }
}

impl ReachabilityConfig {
    pub fn dependency_set_creator<A: SymbolicAutomaton>(&self) -> Box<dyn EdgeDependencySetCreator<A>> {
        match self.dependency_sets {
            DependencySetsKind::BddBased => Box::new(BddBasedEdgeDependencySetCreator),
            DependencySetsKind::AllEdges => Box::new(AllEdgesEdgeDependencySetCreator),
        }
    }

    /// Creates the dependency sets, if the edge workset algorithm is enabled.
    pub fn prepare<A: SymbolicAutomaton>(&self, aut: &A) -> Option<EdgeDependencies> {
        self.edge_workset
            .then(|| self.dependency_set_creator::<A>().create(aut, self.forward_enabled))
    }

    /// Creates the edge selector for the workset algorithm.
    pub fn edge_selector(&self, dependencies: &[BitSet]) -> PruningEdgeSelector {
        PruningEdgeSelector::with_rewards(dependencies, self.effect_reward, self.no_effect_reward)
    }

    /// Computes a reachability fixed point, with the configured algorithm.
    ///
    /// # Panics
    ///
    /// Panics if the edge workset algorithm is enabled, but `dependencies` lacks the sets for the
    /// direction of `reachability`.
    pub fn perform<H: ReachabilityHost>(
        &self,
        reachability: &Reachability<'_, H>,
        pred: H::Pred,
        edge_mask: &BitSet,
        dependencies: Option<&EdgeDependencies>,
    ) -> ReachabilityResult<H::Pred> {
        if !self.edge_workset {
            return reachability.perform(pred, edge_mask, None);
        }
        let direction = reachability.direction();
        let Some(deps) = dependencies.and_then(|deps| deps.get(direction)) else {
            panic!("No {} dependency sets for the edge workset algorithm", direction);
        };
        if direction == Direction::Forward {
            assert!(self.forward_enabled, "Forward reachability is not enabled");
        }
        let mut selector = self.edge_selector(deps);
        reachability.perform_workset_with(pred, edge_mask, deps, &mut selector)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::orderers::tests::data;
    use crate::symbolic::tests::counter;

    #[test]
    fn test_initial_order_text() {
        for initial in [
            InitialVarOrder::Model,
            InitialVarOrder::ReverseModel,
            InitialVarOrder::Sorted,
            InitialVarOrder::ReverseSorted,
            InitialVarOrder::Random(None),
            InitialVarOrder::Random(Some(123)),
        ] {
            assert_eq!(initial.to_string().parse::<InitialVarOrder>(), Ok(initial));
        }
        assert_eq!(" Random: 7 ".parse::<InitialVarOrder>(), Ok(InitialVarOrder::Random(Some(7))));
        assert!("random:-1".parse::<InitialVarOrder>().is_err());
        assert!("a,b,c".parse::<InitialVarOrder>().is_err());
    }

    #[test]
    fn test_hyper_edge_algo() {
        let algo = HyperEdgeAlgo::Default;
        assert_eq!(algo.relations_for("force"), RelationsKind::Linearized);
        assert_eq!(algo.relations_for("slidwin"), RelationsKind::Linearized);
        assert_eq!(algo.relations_for("dcsh"), RelationsKind::Legacy);
        assert_eq!(HyperEdgeAlgo::Legacy.relations_for("force"), RelationsKind::Legacy);
        assert_eq!("linearized".parse(), Ok(HyperEdgeAlgo::Linearized));
        assert!("linear".parse::<HyperEdgeAlgo>().is_err());
    }

    #[test]
    fn test_default_orderer() {
        let orderer = VarOrderConfig::default().build_orderer::<&str>().unwrap();
        assert_eq!(
            orderer.to_string(),
            "sorted(effect=both) -> \
             dcsh(node-finder=george-liu, metric=wes, relations=legacy, effect=var-order) -> \
             force(metric=total-span, relations=linearized, effect=var-order) -> \
             slidwin(size=4, metric=total-span, relations=linearized, effect=var-order)"
        );
        let result = orderer.order(&data(), 0);
        let mut vars = result.var_order.ordered_vars();
        vars.sort();
        assert_eq!(vars, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_initial_only() {
        let config = VarOrderConfig {
            initial: InitialVarOrder::ReverseModel,
            dcsh: false,
            force: false,
            sliding_window: false,
            ..VarOrderConfig::default()
        };
        let orderer = config.build_orderer::<&str>().unwrap();
        assert_eq!(
            orderer.to_string(),
            "model(effect=var-order) -> reverse(relations=legacy, effect=both)"
        );
        let result = orderer.order(&data(), 0);
        assert_eq!(result.var_order.ordered_vars(), vec!["e", "d", "c", "b", "a"]);
    }

    #[test]
    fn test_invalid_window_size() {
        let config = VarOrderConfig {
            sliding_window_size: 13,
            ..VarOrderConfig::default()
        };
        assert!(matches!(
            config.build_orderer::<&str>(),
            Err(Error::InvalidOption { option: "size", .. })
        ));
    }

    #[test]
    fn test_dependency_sets_kind() {
        assert_eq!("all-edges".parse(), Ok(DependencySetsKind::AllEdges));
        assert_eq!(DependencySetsKind::BddBased.to_string(), "bdd-based");
        assert!("bdd".parse::<DependencySetsKind>().is_err());
    }

    #[test]
    fn test_prepare() {
        let aut = counter();
        assert_eq!(ReachabilityConfig::default().prepare(&aut), None);

        let config = ReachabilityConfig {
            edge_workset: true,
            dependency_sets: DependencySetsKind::AllEdges,
            forward_enabled: false,
            ..ReachabilityConfig::default()
        };
        let deps = config.prepare(&aut).unwrap();
        assert_eq!(deps.forward(), None);
        assert_eq!(deps.backward().len(), 3);
    }

    #[test]
    fn test_perform_both_algorithms() {
        let aut = counter();
        let mask = BitSet::ones(3);
        let init = aut.state(&[false, false]);
        let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");

        let fixed_config = ReachabilityConfig::default();
        let fixed = fixed_config.perform(&reach, init, &mask, None);

        let workset_config = ReachabilityConfig {
            edge_workset: true,
            ..ReachabilityConfig::default()
        };
        let deps = workset_config.prepare(&aut);
        let workset = workset_config.perform(&reach, init, &mask, deps.as_ref());
        assert_eq!(workset.pred, fixed.pred);
        assert_eq!(workset.pred, aut.bdd().one);
    }

    #[test]
    #[should_panic(expected = "No forward dependency sets")]
    fn test_perform_without_dependencies() {
        let aut = counter();
        let config = ReachabilityConfig {
            edge_workset: true,
            ..ReachabilityConfig::default()
        };
        let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
        config.perform(&reach, aut.state(&[false, false]), &BitSet::ones(3), None);
    }
}
