//! Canonical / pretty serializer (spec §4.2).
//!
//! `write_text(module, canonical)` is the inverse of [`crate::reader::parse_text`];
//! together they satisfy P1/P2 (spec §8): parsing pretty output reproduces
//! the module structurally, and canonical output is byte-identical across
//! repeated emission of the same module (there is no hidden nondeterminism
//! here — no `HashMap` iteration drives output order, everything is sorted
//! explicitly when `canonical` is true).

use std::fmt::Write as _;
use viper_il::{
    BasicBlock, Extern, Function, Global, Instruction, Linkage, Loc, Module, Opcode, Param, Value,
};

pub fn write_text(module: &Module, canonical: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "il {}", module.version);
    if let Some(target) = &module.target {
        let _ = writeln!(out, "target \"{}\"", escape_str(target));
    }

    let mut externs: Vec<&Extern> = module.externs.iter().collect();
    if canonical {
        externs.sort_by(|a, b| a.name.cmp(&b.name));
    }
    for e in externs {
        write_extern(&mut out, e);
    }

    let mut globals: Vec<&Global> = module.globals.iter().collect();
    if canonical {
        globals.sort_by(|a, b| a.name.cmp(&b.name));
    }
    for g in globals {
        write_global(&mut out, g);
    }

    for f in &module.functions {
        write_function(&mut out, f, canonical);
    }
    out
}

fn write_extern(out: &mut String, e: &Extern) {
    let params = e
        .params
        .iter()
        .map(|t| t.mnemonic())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "extern @{}({}) -> {}", e.name, params, e.ret.mnemonic());
}

fn write_global(out: &mut String, g: &Global) {
    match &g.init {
        Some(v) => {
            let _ = writeln!(out, "global {} @{} = {}", g.ty.mnemonic(), g.name, write_value(v));
        }
        None => {
            let _ = writeln!(out, "global {} @{}", g.ty.mnemonic(), g.name);
        }
    }
}

fn write_function(out: &mut String, f: &Function, canonical: bool) {
    let mut head = "func".to_string();
    match f.linkage {
        Linkage::Internal => {}
        Linkage::Export => head.push_str(".export"),
        Linkage::Import => head.push_str(".import"),
    }
    if f.attrs.nothrow {
        head.push_str(".nothrow");
    }
    if f.attrs.pure {
        head.push_str(".pure");
    }
    if f.attrs.readonly {
        head.push_str(".readonly");
    }

    let params = write_params(&f.params);
    let _ = write!(out, "{} @{}({}) -> {}", head, f.name, params, f.return_type.mnemonic());

    if matches!(f.linkage, Linkage::Import) {
        let _ = writeln!(out);
        return;
    }

    let _ = writeln!(out, " {{");
    // `canonical` mode sorts top-level declarations but never block order
    // within a function: block order is control-flow-meaningful (the first
    // block is the entry block, spec §3.5) and reordering it would not be
    // "the same module, printed deterministically" but a different module.
    let _ = canonical;
    for block in &f.blocks {
        write_block(out, block);
    }
    let _ = writeln!(out, "}}");
}

fn write_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} %{}", p.ty.mnemonic(), p.id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_block(out: &mut String, block: &BasicBlock) {
    if block.params.is_empty() {
        let _ = writeln!(out, "{}:", block.label);
    } else {
        let _ = writeln!(out, "{}({}):", block.label, write_params(&block.params));
    }
    let mut last_loc: Option<Loc> = None;
    for instr in &block.instructions {
        if instr.loc.is_known() && Some(instr.loc) != last_loc {
            let _ = writeln!(out, ".loc {} {} {}", instr.loc.file_id, instr.loc.line, instr.loc.col);
        }
        last_loc = Some(instr.loc);
        write_instruction(out, instr);
    }
}

fn write_instruction(out: &mut String, instr: &Instruction) {
    if let Some(id) = instr.result_id {
        let _ = write!(out, "%{id} = ");
    }
    let _ = write!(out, "{}", instr.opcode.mnemonic());

    match instr.opcode {
        Opcode::Call => {
            let args = instr.operands.iter().map(write_value).collect::<Vec<_>>().join(", ");
            let _ = write!(out, " @{}({})", instr.callee, args);
            if instr.call_attrs.tail {
                let _ = write!(out, " tail");
            }
        }
        Opcode::CallIndirect => {
            let mut it = instr.operands.iter();
            let ptr = it.next().map(write_value).unwrap_or_default();
            let args = it.map(write_value).collect::<Vec<_>>().join(", ");
            let _ = write!(out, " {}({})", ptr, args);
        }
        Opcode::Br => {
            let _ = write!(out, " {}", write_label_args(&instr.labels[0], &instr.br_args[0]));
        }
        Opcode::CBr => {
            let _ = write!(
                out,
                " {}, {}, {}",
                write_value(&instr.operands[0]),
                write_label_args(&instr.labels[0], &instr.br_args[0]),
                write_label_args(&instr.labels[1], &instr.br_args[1]),
            );
        }
        Opcode::SwitchI32 => {
            let _ = write!(
                out,
                " i32 {}, default: {}",
                write_value(&instr.operands[0]),
                write_label_args(&instr.labels[0], &instr.br_args[0]),
            );
            for (value, label, args) in instr.switch_arms() {
                let _ = write!(out, ", {}: {}", value, write_label_args(label, args));
            }
        }
        Opcode::ResumeLabel => {
            let _ = write!(
                out,
                " {}, {}",
                write_value(&instr.operands[0]),
                write_label_args(&instr.labels[0], &instr.br_args[0]),
            );
        }
        Opcode::EhPush => {
            let _ = write!(out, " {}", write_label_args(&instr.labels[0], &instr.br_args[0]));
        }
        _ => {
            let ops = instr.operands.iter().map(write_value).collect::<Vec<_>>().join(", ");
            if !ops.is_empty() {
                let _ = write!(out, " {ops}");
            }
        }
    }

    if instr.result_id.is_some() || matches!(instr.opcode.info().result_arity, viper_il::ResultArity::One) {
        let _ = write!(out, " : {}", instr.result_type.mnemonic());
    }
    let _ = writeln!(out);
}

fn write_label_args(label: &str, args: &[Value]) -> String {
    if args.is_empty() {
        label.to_string()
    } else {
        format!("{}({})", label, args.iter().map(write_value).collect::<Vec<_>>().join(", "))
    }
}

fn write_value(v: &Value) -> String {
    match v {
        Value::Temp(id) => format!("%{id}"),
        Value::ConstInt(n, is_bool) => {
            if *is_bool {
                if *n != 0 { "true".to_string() } else { "false".to_string() }
            } else {
                n.to_string()
            }
        }
        Value::ConstFloat(f) => format_float(*f),
        Value::ConstStr(s) => format!("\"{}\"", escape_str(s)),
        Value::GlobalAddr(name) => format!("@{name}"),
        Value::NullPtr => "null".to_string(),
    }
}

/// Locale-independent, round-trippable float formatting (spec §4.2:
/// "numeric formatting locale-independent"). Rust's `Display` for `f64` is
/// already locale-independent and round-trips exactly; this wrapper only
/// guarantees a decimal point survives for integral values (`1` -> `1.0`)
/// so the reader's float-vs-int lexing rule (presence of `.`/`e`) holds.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        let s = format!("{f}");
        if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("nan") {
            s
        } else {
            format!("{s}.0")
        }
    }
}

fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_text;

    const S1: &str = "il 0.2.0\nextern @X(i64) -> void\nfunc @main() -> void {\nentry:\ncall @X(1)\nret\n}\n";

    #[test]
    fn round_trip_s5_identity() {
        let m = parse_text(S1).unwrap();
        let pretty = write_text(&m, false);
        let reparsed = parse_text(&pretty).unwrap();
        assert_eq!(m, reparsed);
    }

    #[test]
    fn canonical_output_is_byte_identical_across_runs() {
        let m = parse_text(S1).unwrap();
        let a = write_text(&m, true);
        let b = write_text(&m, true);
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_sorts_externs_lexicographically() {
        let src = "il 0.2.0\nextern @Zeta() -> void\nextern @Alpha() -> void\nfunc @main() -> void {\nentry:\nret\n}\n";
        let m = parse_text(src).unwrap();
        let out = write_text(&m, true);
        let alpha_pos = out.find("@Alpha").unwrap();
        let zeta_pos = out.find("@Zeta").unwrap();
        assert!(alpha_pos < zeta_pos);
    }

    #[test]
    fn eh_push_round_trips_through_write_and_reparse() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\neh.push H\neh.pop\nret 0\nH(error %0, resume_tok %1):\nret 1\n}\n";
        let m = parse_text(src).unwrap();
        let pretty = write_text(&m, false);
        assert!(pretty.contains("eh.push H"));
        let reparsed = parse_text(&pretty).unwrap();
        assert_eq!(m, reparsed);
    }

    #[test]
    fn float_constants_always_print_a_decimal_point() {
        assert_eq!(format_float(4.0), "4.0");
        assert_eq!(format_float(0.5), "0.5");
    }
}
