//! `viper-opt`: CFG/dominator/liveness analyses and the pass-manager
//! contract (spec §4.8 "Optimizer shell").
//!
//! Every analysis here operates on an already-verified [`viper_il::Module`]
//! and every [`pass::Pass`] is required to hand one back — `viper-opt`
//! never decides *whether* a module is well-formed, only what shape a
//! rewrite of one may take. The analyses are grounded on the teacher's
//! `call_graph.rs`: the same "adjacency map, worklist to a fixed point"
//! idiom, carried from a call graph over function names to a control-flow
//! graph over basic blocks.

pub mod cfg;
pub mod dominators;
pub mod liveness;
pub mod pass;
pub mod passes;

pub use cfg::Cfg;
pub use dominators::Dominators;
pub use liveness::Liveness;
pub use pass::{Pass, PassError, PassManager, PreservedAnalyses};
pub use passes::nop::NopPass;
pub use passes::prune_unreachable::PruneUnreachablePass;
