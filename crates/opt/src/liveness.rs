//! Liveness analysis over SSA temporaries (spec §2 item 7).
//!
//! A temp is live at a program point if some later use can still reach it
//! along some execution path. This object model gives an SSA id function-
//! wide scope rather than block-local scope (spec §3.5: ids are unique
//! across the whole function, not just within one block), so liveness has
//! to cross block boundaries exactly like the teacher's call graph crosses
//! word boundaries — same backward worklist-to-fixpoint shape, applied to
//! `live_in`/`live_out` sets instead of reachable-word sets.

use crate::cfg::Cfg;
use std::collections::{HashMap, HashSet};
use viper_il::{Function, Value};

#[derive(Debug, Clone, Default)]
pub struct Liveness {
    pub live_in: HashMap<String, HashSet<u32>>,
    pub live_out: HashMap<String, HashSet<u32>>,
}

fn temp_ids(values: &[Value], out: &mut HashSet<u32>) {
    for v in values {
        if let Value::Temp(id) = v {
            out.insert(*id);
        }
    }
}

/// `(uses, defs)` for one block: `uses` are temps read before any local
/// definition (so they must flow in from elsewhere), `defs` are every
/// temp this block defines (its own params plus each instruction's
/// result).
fn uses_and_defs(f: &Function, label: &str) -> (HashSet<u32>, HashSet<u32>) {
    let block = f.block(label).expect("cfg and function disagree on blocks");
    let mut uses = HashSet::new();
    let mut defs: HashSet<u32> = block.params.iter().map(|p| p.id).collect();

    for instr in &block.instructions {
        let mut read = HashSet::new();
        temp_ids(&instr.operands, &mut read);
        for args in &instr.br_args {
            temp_ids(args, &mut read);
        }
        for id in read {
            if !defs.contains(&id) {
                uses.insert(id);
            }
        }
        if let Some(id) = instr.result_id {
            defs.insert(id);
        }
    }
    (uses, defs)
}

impl Liveness {
    pub fn compute(f: &Function, cfg: &Cfg) -> Self {
        let labels: Vec<&str> = cfg.blocks().collect();
        let mut uses = HashMap::new();
        let mut defs = HashMap::new();
        let mut live_in: HashMap<String, HashSet<u32>> = HashMap::new();
        let mut live_out: HashMap<String, HashSet<u32>> = HashMap::new();
        for &label in &labels {
            let (u, d) = uses_and_defs(f, label);
            uses.insert(label.to_string(), u);
            defs.insert(label.to_string(), d);
            live_in.insert(label.to_string(), HashSet::new());
            live_out.insert(label.to_string(), HashSet::new());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &label in &labels {
                let mut out_set = HashSet::new();
                for succ in cfg.successors_of(label) {
                    out_set.extend(live_in[succ].iter().copied());
                }
                let in_set: HashSet<u32> = uses[label]
                    .iter()
                    .copied()
                    .chain(out_set.difference(&defs[label]).copied())
                    .collect();

                if &out_set != live_out.get(label).unwrap() {
                    live_out.insert(label.to_string(), out_set);
                    changed = true;
                }
                if &in_set != live_in.get(label).unwrap() {
                    live_in.insert(label.to_string(), in_set);
                    changed = true;
                }
            }
        }

        Liveness { live_in, live_out }
    }

    pub fn live_in_at(&self, label: &str) -> &HashSet<u32> {
        static EMPTY: std::sync::OnceLock<HashSet<u32>> = std::sync::OnceLock::new();
        self.live_in.get(label).unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    pub fn live_out_at(&self, label: &str) -> &HashSet<u32> {
        static EMPTY: std::sync::OnceLock<HashSet<u32>> = std::sync::OnceLock::new();
        self.live_out.get(label).unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn a_value_used_in_a_later_block_is_live_out_of_its_defining_block() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\n\
                   entry:\n%0 = add 41, 0 : i64\nbr next()\n\
                   next:\n%1 = add %0, 1 : i64\nret %1\n}\n";
        let module = parse_text(src).unwrap();
        let f = module.function("main").unwrap();
        let cfg = Cfg::build(f);
        let live = Liveness::compute(f, &cfg);
        assert!(live.live_out_at("entry").contains(&0));
        assert!(live.live_in_at("next").contains(&0));
    }

    #[test]
    fn a_value_dead_after_its_own_block_is_not_live_out() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = add 1, 0 : i64\nret %0\n}\n";
        let module = parse_text(src).unwrap();
        let f = module.function("main").unwrap();
        let cfg = Cfg::build(f);
        let live = Liveness::compute(f, &cfg);
        assert!(live.live_out_at("entry").is_empty());
    }
}
