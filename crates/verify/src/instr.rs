//! Instruction-level checks, grouped by opcode (spec §4.3 "Instruction-level
//! (by opcode)"). Every check consults [`viper_il::Opcode::info`] rather
//! than re-stating an opcode's arity (spec §9's single-source-of-truth
//! design note) — only the type-relation checks that table cannot express
//! (cast width relations, overflow-op result type) are written out here.

use viper_il::{
    Anchor, BasicBlock, Diagnostic, Diagnostics, Function, Instruction, Module, Opcode,
    ResultArity, Type,
};

pub fn check(
    _module: &Module,
    f: &Function,
    block: &BasicBlock,
    index: usize,
    instr: &Instruction,
    diags: &mut Diagnostics,
) {
    let anchor = || Anchor::Instr {
        function: f.name.clone(),
        block: block.label.clone(),
        index,
    };
    let info = instr.opcode.info();

    let n = instr.operands.len();
    if n < info.min_operands || n > info.max_operands {
        diags.push(Diagnostic::error(
            anchor(),
            format!(
                "'{}' takes {}..{} operand(s), found {n}",
                instr.opcode,
                info.min_operands,
                if info.max_operands == usize::MAX { "∞".to_string() } else { info.max_operands.to_string() }
            ),
        ));
    }

    match info.result_arity {
        ResultArity::None if instr.result_id.is_some() => {
            diags.push(Diagnostic::error(anchor(), format!("'{}' produces no result", instr.opcode)));
        }
        ResultArity::One if instr.result_id.is_none() => {
            diags.push(Diagnostic::error(anchor(), format!("'{}' must produce a result", instr.opcode)));
        }
        _ => {}
    }

    check_pointer_taking_ops(instr, &anchor, diags);
    check_compare_result_is_i1(instr, &anchor, diags);
    check_cast_width_relation(instr, &anchor, diags);
    check_overflow_op_result_type(instr, &anchor, diags);
}

fn check_pointer_taking_ops(instr: &Instruction, anchor: &impl Fn() -> Anchor, diags: &mut Diagnostics) {
    let ptr_operand = match instr.opcode {
        Opcode::Load | Opcode::Gep | Opcode::AddrOf => instr.operands.first(),
        Opcode::Store => instr.operands.first(),
        _ => return,
    };
    if let Some(v) = ptr_operand {
        if matches!(v, viper_il::Value::ConstInt(..) | viper_il::Value::ConstFloat(_) | viper_il::Value::ConstStr(_)) {
            diags.push(Diagnostic::error(
                anchor(),
                format!("'{}' requires a pointer-typed base, found a literal constant", instr.opcode),
            ));
        }
    }
}

fn check_compare_result_is_i1(instr: &Instruction, anchor: &impl Fn() -> Anchor, diags: &mut Diagnostics) {
    let is_compare = matches!(
        instr.opcode,
        Opcode::ICmpEq
            | Opcode::ICmpNe
            | Opcode::SCmpLt
            | Opcode::SCmpLe
            | Opcode::SCmpGt
            | Opcode::SCmpGe
            | Opcode::UCmpLt
            | Opcode::UCmpLe
            | Opcode::UCmpGt
            | Opcode::UCmpGe
            | Opcode::FCmpEq
            | Opcode::FCmpNe
            | Opcode::FCmpLt
            | Opcode::FCmpLe
            | Opcode::FCmpGt
            | Opcode::FCmpGe
            | Opcode::FCmpOrd
            | Opcode::FCmpUno
    );
    if is_compare && instr.result_type != Type::I1 {
        diags.push(Diagnostic::error(
            anchor(),
            format!("'{}' must produce i1, declared {}", instr.opcode, instr.result_type),
        ));
    }
}

fn check_cast_width_relation(instr: &Instruction, anchor: &impl Fn() -> Anchor, diags: &mut Diagnostics) {
    match instr.opcode {
        Opcode::Trunc1 if instr.result_type != Type::I1 => {
            diags.push(Diagnostic::error(anchor(), "'trunc1' must narrow to i1"));
        }
        Opcode::CastSiNarrowChk | Opcode::CastUiNarrowChk if !instr.result_type.is_integer() => {
            diags.push(Diagnostic::error(
                anchor(),
                format!("'{}' must narrow to an integer type, declared {}", instr.opcode, instr.result_type),
            ));
        }
        // A narrowing cast's operand-vs-result width relation (result
        // strictly narrower than operand) needs the operand's static type,
        // which for a `Temp` operand only an SSA type map resolves; that
        // map is `ssa::check`'s to build, not this per-instruction pass's.
        _ => {}
    }
}

fn check_overflow_op_result_type(instr: &Instruction, anchor: &impl Fn() -> Anchor, diags: &mut Diagnostics) {
    let is_overflow_checked = matches!(
        instr.opcode,
        Opcode::IAddOvf | Opcode::ISubOvf | Opcode::IMulOvf | Opcode::SDivChk0 | Opcode::UDivChk0 | Opcode::SRemChk0 | Opcode::URemChk0
    );
    if is_overflow_checked && !instr.result_type.is_integer() {
        diags.push(Diagnostic::error(
            anchor(),
            format!("'{}' must produce an integer type, declared {}", instr.opcode, instr.result_type),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn wrong_operand_count_is_rejected() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\n%0 = add i64 1 : i64\nret\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        let f = &m.functions[0];
        let b = &f.blocks[0];
        check(&m, f, b, 0, &b.instructions[0], &mut diags);
        assert!(diags.has_errors());
    }

    #[test]
    fn compare_must_produce_i1() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\n%0 = icmp.eq 1, 1 : i64\nret\n}\n";
        let m = parse_text(src).unwrap();
        let mut diags = Diagnostics::new();
        let f = &m.functions[0];
        let b = &f.blocks[0];
        check(&m, f, b, 0, &b.instructions[0], &mut diags);
        assert!(diags.has_errors());
    }
}
