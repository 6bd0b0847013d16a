//! Dominator-tree analysis (spec §2 item 7), built over a [`Cfg`] with the
//! same worklist-fixpoint idiom the teacher's SCC finder iterates a
//! `HashMap<NodeId, Vec<NodeId>>` adjacency map to a fixed point, here
//! applied to dominator sets instead of strongly-connected components.
//!
//! `block` dominates `other` iff every path from the entry block to
//! `other` passes through `block`. Unreachable blocks (spec: a block with
//! no path from the entry) are left out of the result entirely — they have
//! no well-defined dominator set.

use crate::cfg::Cfg;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct Dominators {
    /// `block -> every block that dominates it (block included)`.
    dominates: HashMap<String, HashSet<String>>,
    /// `block -> its immediate dominator`, absent only for the entry block.
    idom: HashMap<String, String>,
}

impl Dominators {
    pub fn compute(cfg: &Cfg) -> Self {
        let reachable = cfg.reachable_from_entry();
        let Some(entry) = &cfg.entry else {
            return Dominators::default();
        };
        if !reachable.contains(entry) {
            return Dominators::default();
        }

        let mut dominates: HashMap<String, HashSet<String>> = HashMap::new();
        for block in &reachable {
            dominates.insert(block.clone(), reachable.clone());
        }
        dominates.insert(entry.clone(), [entry.clone()].into_iter().collect());

        let mut changed = true;
        while changed {
            changed = false;
            for block in &reachable {
                if block == entry {
                    continue;
                }
                let preds: Vec<&String> = cfg
                    .predecessors_of(block)
                    .iter()
                    .filter(|p| reachable.contains(*p))
                    .collect();
                if preds.is_empty() {
                    continue;
                }
                let mut new_set = dominates[preds[0]].clone();
                for p in &preds[1..] {
                    new_set = new_set.intersection(&dominates[*p]).cloned().collect();
                }
                new_set.insert(block.clone());
                if &new_set != dominates.get(block).unwrap() {
                    dominates.insert(block.clone(), new_set);
                    changed = true;
                }
            }
        }

        let mut idom = HashMap::new();
        for block in &reachable {
            if block == entry {
                continue;
            }
            let strict: Vec<&String> = dominates[block].iter().filter(|d| *d != block).collect();
            // The immediate dominator is the strict dominator that is
            // itself dominated by every other strict dominator.
            if let Some(imm) = strict
                .iter()
                .find(|candidate| strict.iter().all(|other| *other == **candidate || dominates[**candidate].contains(*other)))
            {
                idom.insert(block.clone(), (*imm).clone());
            }
        }

        Dominators { dominates, idom }
    }

    pub fn dominates(&self, block: &str, other: &str) -> bool {
        self.dominates.get(other).is_some_and(|set| set.contains(block))
    }

    pub fn immediate_dominator(&self, block: &str) -> Option<&str> {
        self.idom.get(block).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    fn cfg_of(src: &str) -> Cfg {
        let module = parse_text(src).unwrap();
        Cfg::build(module.function("main").unwrap())
    }

    #[test]
    fn entry_dominates_every_reachable_block() {
        let cfg = cfg_of("il 0.2.0\nfunc @main() -> i64 {\nentry:\ncbr true, t(), f()\nt:\nret 1\nf:\nret 0\n}\n");
        let doms = Dominators::compute(&cfg);
        assert!(doms.dominates("entry", "t"));
        assert!(doms.dominates("entry", "f"));
        assert!(!doms.dominates("t", "f"));
    }

    #[test]
    fn a_join_point_is_immediately_dominated_by_the_branch_that_precedes_it() {
        let cfg = cfg_of(
            "il 0.2.0\nfunc @main() -> i64 {\n\
             entry:\ncbr true, t(), f()\n\
             t:\nbr join()\n\
             f:\nbr join()\n\
             join:\nret 0\n}\n",
        );
        let doms = Dominators::compute(&cfg);
        assert_eq!(doms.immediate_dominator("join"), Some("entry"));
        assert!(!doms.dominates("t", "join"));
        assert!(!doms.dominates("f", "join"));
    }
}
