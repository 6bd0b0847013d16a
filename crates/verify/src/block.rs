//! Block-level checks (spec §4.3 "Block-level").

use viper_il::{Anchor, BasicBlock, Diagnostic, Diagnostics, Function, Module, Opcode, Type, Value};

pub fn check(_module: &Module, f: &Function, block: &BasicBlock, diags: &mut Diagnostics) {
    check_terminator_kind(f, block, diags);
    check_branch_targets(f, block, diags);
}

fn check_terminator_kind(f: &Function, block: &BasicBlock, diags: &mut Diagnostics) {
    match block.terminator() {
        Some(instr) => {
            let valid = matches!(
                instr.opcode,
                Opcode::Ret
                    | Opcode::Br
                    | Opcode::CBr
                    | Opcode::SwitchI32
                    | Opcode::Trap
                    | Opcode::TrapKind
                    | Opcode::TrapErr
                    | Opcode::TrapFromErr
                    | Opcode::ResumeSame
                    | Opcode::ResumeNext
                    | Opcode::ResumeLabel
            );
            if !valid {
                diags.push(Diagnostic::error(
                    Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                    format!("'{}' is not a valid block terminator", instr.opcode),
                ));
            }
        }
        None => {
            // Missing-terminator is already reported by
            // `module::check_linkage_rules` for Export/Internal functions;
            // avoid a second, redundant diagnostic here.
        }
    }
}

fn check_branch_targets(f: &Function, block: &BasicBlock, diags: &mut Diagnostics) {
    let Some(instr) = block.terminator() else { return };
    for (label, args) in instr.labels.iter().zip(instr.br_args.iter()) {
        let Some(target) = f.block(label) else {
            diags.push(Diagnostic::error(
                Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                format!("branch target '{label}' is not a block of this function"),
            ));
            continue;
        };
        if args.len() != target.params.len() {
            diags.push(Diagnostic::error(
                Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                format!(
                    "branch to '{label}' passes {} argument(s), target expects {}",
                    args.len(),
                    target.params.len()
                ),
            ));
            continue;
        }
        for (arg, param) in args.iter().zip(target.params.iter()) {
            if let Some(ty) = infer_const_type(arg) {
                if ty != param.ty {
                    diags.push(Diagnostic::error(
                        Anchor::Block { function: f.name.clone(), block: block.label.clone() },
                        format!(
                            "branch argument to '{label}' has type {ty} but parameter '%{}' expects {}",
                            param.id, param.ty
                        ),
                    ));
                }
            }
        }
    }
}

/// Best-effort type of a literal operand; `Value::Temp` ids need the
/// SSA def map `ssa::check` builds, so those are left unchecked here
/// (type mismatches on a temp surface once `ssa`/`instr` checks resolve
/// its defining instruction's declared `result_type`).
fn infer_const_type(v: &Value) -> Option<Type> {
    match v {
        Value::ConstInt(_, is_bool) => Some(if *is_bool { Type::I1 } else { Type::I64 }),
        Value::ConstFloat(_) => Some(Type::F64),
        Value::ConstStr(_) => Some(Type::Str),
        Value::NullPtr => Some(Type::Ptr),
        Value::GlobalAddr(_) => Some(Type::Ptr),
        Value::Temp(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn branch_to_an_unknown_label_is_rejected() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\nbr nowhere()\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        check(&m, &m.functions[0], &m.functions[0].blocks[0], &mut diags);
        assert!(diags.has_errors());
    }

    #[test]
    fn branch_argument_arity_mismatch_is_rejected() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\nbr loop(1)\nloop(i64 %0, i64 %1):\nret\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        check(&m, &m.functions[0], &m.functions[0].blocks[0], &mut diags);
        assert!(diags.has_errors());
    }
}
