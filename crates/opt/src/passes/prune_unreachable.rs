//! Dead-block elimination (spec §2 item 7 / §4.8). A genuine rewrite, not
//! a lint: blocks unreachable from the entry are removed outright rather
//! than flagged.
//!
//! A block reached only through `eh.push`'s handler label (spec §4.6) has
//! no ordinary predecessor in the CFG — control reaches it through the
//! trap dispatch the verifier's `eh` module tracks, not through a `Br`/
//! `CBr`/`SwitchI32` edge. Those labels are added as extra roots before
//! walking reachability, so a handler block that catches no ordinary
//! fallthrough is never mistaken for dead code.

use crate::cfg::Cfg;
use crate::pass::{Pass, PreservedAnalyses};
use std::collections::HashSet;
use viper_il::{Function, Module, Opcode};

fn handler_roots(f: &Function) -> HashSet<String> {
    let mut roots = HashSet::new();
    for block in &f.blocks {
        for instr in &block.instructions {
            if instr.opcode == Opcode::EhPush {
                if let Some(label) = instr.labels.first() {
                    roots.insert(label.clone());
                }
            }
        }
    }
    roots
}

fn reachable_blocks(f: &Function) -> HashSet<String> {
    let cfg = Cfg::build(f);
    let mut roots: Vec<String> = cfg.entry.clone().into_iter().collect();
    roots.extend(handler_roots(f));

    let mut seen = HashSet::new();
    let mut worklist = roots;
    while let Some(label) = worklist.pop() {
        if !seen.insert(label.clone()) {
            continue;
        }
        for succ in cfg.successors_of(&label) {
            if !seen.contains(succ) {
                worklist.push(succ.clone());
            }
        }
    }
    seen
}

pub struct PruneUnreachablePass;

impl Pass for PruneUnreachablePass {
    fn name(&self) -> &'static str {
        "prune-unreachable"
    }

    fn preserves(&self) -> PreservedAnalyses {
        PreservedAnalyses::none()
    }

    fn run(&self, module: &mut Module) {
        for f in &mut module.functions {
            let keep = reachable_blocks(f);
            f.blocks.retain(|b| keep.contains(&b.label));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassManager;
    use viper_abi::Registry;
    use viper_io::parse_text;

    #[test]
    fn an_unreachable_block_is_removed() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nret 0\ndead:\nret 1\n}\n";
        let module = parse_text(src).unwrap();
        let pm = PassManager::new().add(PruneUnreachablePass);
        let out = pm.run(module, &Registry::new()).unwrap();
        let f = out.function("main").unwrap();
        assert!(f.block("dead").is_none());
        assert!(f.block("entry").is_some());
    }

    #[test]
    fn a_handler_block_reached_only_through_eh_push_survives() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\n\
                   entry:\neh.push H\n%0 = sdiv.chk0 i64 10, 0 : i64\neh.pop\nret %0\n\
                   H(error %1, resume_tok %2):\nresume.next %2\n}\n";
        let module = parse_text(src).unwrap();
        let pm = PassManager::new().add(PruneUnreachablePass);
        let out = pm.run(module, &Registry::new()).unwrap();
        let f = out.function("main").unwrap();
        assert!(f.block("H").is_some());
    }

    #[test]
    fn a_module_with_no_dead_blocks_is_unchanged() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\ncbr true, t(), f()\nt:\nret 1\nf:\nret 0\n}\n";
        let module = parse_text(src).unwrap();
        let before = module.clone();
        let pm = PassManager::new().add(PruneUnreachablePass);
        let out = pm.run(module, &Registry::new()).unwrap();
        assert_eq!(out, before);
    }
}
