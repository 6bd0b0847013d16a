//! Module-level checks (spec §4.3 "Module-level").

use std::collections::HashMap;
use viper_abi::Registry;
use viper_il::{Anchor, Diagnostic, Diagnostics, Function, Linkage, Module, Opcode, Value};

pub fn check(module: &Module, registry: &Registry, diags: &mut Diagnostics) {
    check_unique_names(module, diags);
    check_linkage_rules(module, diags);
    check_extern_signatures(module, registry, diags);
    check_references_resolve(module, diags);
}

fn check_unique_names(module: &Module, diags: &mut Diagnostics) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut note = |name: &str, kind: &'static str, diags: &mut Diagnostics| {
        if let Some(prev_kind) = seen.get(name) {
            diags.push(Diagnostic::error(
                Anchor::Module,
                format!("duplicate top-level name '{name}' ({prev_kind} and {kind})"),
            ));
        } else {
            seen.insert(name, kind);
        }
    };
    for e in &module.externs {
        note(&e.name, "extern", diags);
    }
    for g in &module.globals {
        note(&g.name, "global", diags);
    }
    for f in &module.functions {
        note(&f.name, "function", diags);
    }
}

fn check_linkage_rules(module: &Module, diags: &mut Diagnostics) {
    for f in &module.functions {
        match f.linkage {
            Linkage::Import => {
                if !f.blocks.is_empty() {
                    diags.push(Diagnostic::error(
                        Anchor::Function { function: f.name.clone() },
                        "an Import function must have zero blocks",
                    ));
                }
            }
            Linkage::Export | Linkage::Internal => {
                if f.blocks.is_empty() {
                    diags.push(Diagnostic::error(
                        Anchor::Function { function: f.name.clone() },
                        "an Export/Internal function must have at least one block",
                    ));
                    continue;
                }
                for block in &f.blocks {
                    if !block.terminated() {
                        diags.push(Diagnostic::error(
                            Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                            "block does not end in a terminator",
                        ));
                    }
                }
            }
        }
    }
}

fn check_extern_signatures(module: &Module, registry: &Registry, diags: &mut Diagnostics) {
    for e in &module.externs {
        if !registry.signature_matches(&e.name, &e.params, e.ret) {
            let entry = registry.lookup(&e.name).expect("signature_matches false implies a lookup hit");
            diags.push(Diagnostic::error(
                Anchor::Module,
                format!(
                    "extern '{}' does not match the runtime ABI registry (expected ({}) -> {})",
                    e.name,
                    entry.params.iter().map(|t| t.mnemonic()).collect::<Vec<_>>().join(", "),
                    entry.ret
                ),
            ));
        }
    }
}

fn check_references_resolve(module: &Module, diags: &mut Diagnostics) {
    for f in &module.functions {
        for block in &f.blocks {
            for (index, instr) in block.instructions.iter().enumerate() {
                if matches!(instr.opcode, Opcode::Call) && !module.resolves(&instr.callee) {
                    diags.push(Diagnostic::error(
                        Anchor::Instr { function: f.name.clone(), block: block.label.clone(), index },
                        format!("call references unknown symbol '@{}'", instr.callee),
                    ));
                }
                for operand in &instr.operands {
                    if let Value::GlobalAddr(name) = operand {
                        if !module.resolves(name) {
                            diags.push(Diagnostic::error(
                                Anchor::Instr { function: f.name.clone(), block: block.label.clone(), index },
                                format!("reference to unknown symbol '@{name}'"),
                            ));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn duplicate_function_and_global_names_are_rejected() {
        let src = "il 0.2.0\nglobal i64 @x\nfunc @x() -> void {\nentry:\nret\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        check(&m, &Registry::new(), &mut diags);
        assert!(diags.has_errors());
    }

    #[test]
    fn import_function_with_a_body_is_rejected() {
        let mut m = Module::new("0.2.0");
        let mut f = Function::new("H", viper_il::Type::Void, Linkage::Import);
        f.blocks.push(viper_il::BasicBlock::new("entry"));
        m.functions.push(f);
        let mut diags = Diagnostics::new();
        check(&m, &Registry::new(), &mut diags);
        assert!(diags.has_errors());
    }
}
