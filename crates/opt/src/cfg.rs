//! Control-flow graph over one function's basic blocks (spec §2 item 7,
//! §4.8 "Optimizer shell").
//!
//! Grounded on the teacher's `call_graph.rs`: same adjacency idiom (a name
//! keyed `HashMap` of successor lists, built by one pass over the function
//! rather than lazily), generalized from "word calls word" edges to "block
//! branches to block" edges — a block's successors are exactly its
//! terminator's `labels` (spec §3.4: `Br`/`CBr`/`SwitchI32` each list every
//! target they can transfer control to).

use std::collections::{HashMap, HashSet};
use viper_il::Function;

#[derive(Debug, Clone, Default)]
pub struct Cfg {
    pub entry: Option<String>,
    successors: HashMap<String, Vec<String>>,
    predecessors: HashMap<String, Vec<String>>,
}

impl Cfg {
    pub fn build(f: &Function) -> Self {
        let mut successors: HashMap<String, Vec<String>> = HashMap::new();
        let mut predecessors: HashMap<String, Vec<String>> = HashMap::new();
        for block in &f.blocks {
            successors.entry(block.label.clone()).or_default();
            predecessors.entry(block.label.clone()).or_default();
        }
        for block in &f.blocks {
            let Some(terminator) = block.terminator() else {
                continue;
            };
            for label in &terminator.labels {
                if !successors.contains_key(label) {
                    continue; // dangling target; the verifier's job to flag this, not ours
                }
                successors.get_mut(&block.label).unwrap().push(label.clone());
                predecessors.get_mut(label).unwrap().push(block.label.clone());
            }
        }
        Cfg {
            entry: f.entry_block().map(|b| b.label.clone()),
            successors,
            predecessors,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &str> {
        self.successors.keys().map(String::as_str)
    }

    pub fn successors_of(&self, label: &str) -> &[String] {
        self.successors.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors_of(&self, label: &str) -> &[String] {
        self.predecessors.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Blocks reachable from the entry block, walking `successors` with a
    /// worklist rather than recursion so a pathological CFG can't blow the
    /// Rust stack (the same worklist idiom the teacher's SCC finder uses
    /// over the call graph).
    pub fn reachable_from_entry(&self) -> HashSet<String> {
        let mut seen = HashSet::new();
        let Some(entry) = &self.entry else {
            return seen;
        };
        let mut worklist = vec![entry.clone()];
        while let Some(label) = worklist.pop() {
            if !seen.insert(label.clone()) {
                continue;
            }
            for succ in self.successors_of(&label) {
                if !seen.contains(succ) {
                    worklist.push(succ.clone());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn successors_follow_a_conditional_branch_to_both_targets() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\ncbr true, t(), f()\nt:\nret 1\nf:\nret 0\n}\n";
        let module = parse_text(src).unwrap();
        let f = module.function("main").unwrap();
        let cfg = Cfg::build(f);
        let mut succs = cfg.successors_of("entry").to_vec();
        succs.sort();
        assert_eq!(succs, vec!["f".to_string(), "t".to_string()]);
        assert_eq!(cfg.predecessors_of("t"), &["entry".to_string()]);
    }

    #[test]
    fn a_block_unreachable_from_entry_is_excluded() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nret 0\ndead:\nret 1\n}\n";
        let module = parse_text(src).unwrap();
        let f = module.function("main").unwrap();
        let cfg = Cfg::build(f);
        let reachable = cfg.reachable_from_entry();
        assert!(reachable.contains("entry"));
        assert!(!reachable.contains("dead"));
    }
}
