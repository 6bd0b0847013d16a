//! SSA checks (spec §4.3 "SSA"): every temp is defined exactly once, and
//! every use is defined by an earlier instruction in the same function.
//!
//! "Earlier" is taken in block-list order (spec §3.5: blocks are stored in
//! definition order, the entry block first) — the same linearization the
//! writer emits and the reader preserves, so a module built by this
//! workspace's own tools always has a well-defined earlier/later relation
//! even though control flow can jump both forward and backward between
//! blocks at runtime.

use std::collections::HashSet;
use viper_il::{Anchor, Diagnostic, Diagnostics, Function, Value};

pub fn check(f: &Function, diags: &mut Diagnostics) {
    check_single_definition(f, diags);
    check_uses_are_defined_earlier(f, diags);
}

fn check_single_definition(f: &Function, diags: &mut Diagnostics) {
    let mut defined = HashSet::new();
    for param in &f.params {
        if !defined.insert(param.id) {
            diags.push(Diagnostic::error(
                Anchor::Function { function: f.name.clone() },
                format!("SSA id %{} is defined more than once", param.id),
            ));
        }
    }
    for block in &f.blocks {
        for param in &block.params {
            if !defined.insert(param.id) {
                diags.push(Diagnostic::error(
                    Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                    format!("SSA id %{} is defined more than once", param.id),
                ));
            }
        }
        for instr in &block.instructions {
            if let Some(id) = instr.result_id {
                if !defined.insert(id) {
                    diags.push(Diagnostic::error(
                        Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                        format!("SSA id %{id} is defined more than once"),
                    ));
                }
            }
        }
    }
}

fn check_uses_are_defined_earlier(f: &Function, diags: &mut Diagnostics) {
    let mut defined: HashSet<u32> = f.params.iter().map(|p| p.id).collect();
    for block in &f.blocks {
        for param in &block.params {
            defined.insert(param.id);
        }
        for (index, instr) in block.instructions.iter().enumerate() {
            for operand in &instr.operands {
                check_value(operand, &defined, f, block, index, diags);
            }
            for args in &instr.br_args {
                for arg in args {
                    check_value(arg, &defined, f, block, index, diags);
                }
            }
            if let Some(id) = instr.result_id {
                defined.insert(id);
            }
        }
    }
}

fn check_value(
    v: &Value,
    defined: &HashSet<u32>,
    f: &Function,
    block: &viper_il::BasicBlock,
    index: usize,
    diags: &mut Diagnostics,
) {
    if let Value::Temp(id) = v {
        if !defined.contains(id) {
            diags.push(Diagnostic::error(
                Anchor::Instr { function: f.name.clone(), block: block.label.clone(), index },
                format!("use of %{id} before its definition"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn using_a_temp_before_it_is_defined_is_rejected() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\n%0 = add %1, %1 : i64\n%1 = const.null\nret\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        check(&m.functions[0], &mut diags);
        assert!(diags.has_errors());
    }

    #[test]
    fn well_formed_ssa_has_no_diagnostics() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = add 1, 2 : i64\nret %0\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        check(&m.functions[0], &mut diags);
        assert!(!diags.has_errors());
    }
}
