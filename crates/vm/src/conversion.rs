//! Cast opcode handlers (spec §4.4 "Casts": "Checked variants trap on
//! domain errors").
//!
//! The instruction table gives cast opcodes no separate "source type"
//! field — only the destination (`instr.result_type`). The narrowing
//! checks below exploit [`arithmetic::truncate`]'s canonical-width
//! invariant instead: a value fits the destination width iff truncating
//! to it and sign-extending back reproduces the original bit pattern.

use crate::arithmetic::truncate;
use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::slot::Slot;
use crate::trap::{TrapKind, VmError};
use viper_il::{Instruction, Opcode, Type};

fn trap(kind: TrapKind, ip: usize, instr: &Instruction) -> HandlerOutcome {
    HandlerOutcome::Trap {
        error: VmError::new(kind, 0, ip as u64, instr.loc.line as i32),
        message: format!("{kind} in '{}'", instr.opcode),
        origin: None,
    }
}

fn finish_int(frame: &mut Frame, instr: &Instruction, n: i64) -> HandlerOutcome {
    frame.set(instr.result_id.unwrap(), Slot::I(truncate(n, instr.result_type)));
    HandlerOutcome::Next
}

fn finish_float(frame: &mut Frame, instr: &Instruction, f: f64) -> HandlerOutcome {
    frame.set(instr.result_id.unwrap(), Slot::F(f));
    HandlerOutcome::Next
}

fn signed_range(ty: Type) -> (f64, f64) {
    let w = ty.int_width().unwrap_or(64);
    if w >= 64 {
        (i64::MIN as f64, i64::MAX as f64)
    } else {
        (-(1i64 << (w - 1)) as f64, ((1i64 << (w - 1)) - 1) as f64)
    }
}

fn unsigned_range(ty: Type) -> (f64, f64) {
    let w = ty.int_width().unwrap_or(64);
    if w >= 64 {
        (0.0, u64::MAX as f64)
    } else {
        (0.0, ((1u64 << w) - 1) as f64)
    }
}

pub fn handle(interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, ip: usize) -> HandlerOutcome {
    use Opcode::*;
    match instr.opcode {
        Sitofp | CastSiToFp => {
            let n = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            finish_float(frame, instr, n as f64)
        }
        CastUiToFp => {
            let n = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            finish_float(frame, instr, (n as u64) as f64)
        }
        Fptosi => {
            let f = interp.eval(frame, &instr.operands[0]).as_f64().unwrap_or(0.0);
            finish_int(frame, instr, f as i64)
        }
        CastFpToSiRteChk => {
            let f = interp.eval(frame, &instr.operands[0]).as_f64().unwrap_or(f64::NAN);
            if f.is_nan() || f.is_infinite() {
                return trap(TrapKind::InvalidCast, ip, instr);
            }
            let rounded = f.round_ties_even();
            let (lo, hi) = signed_range(instr.result_type);
            if rounded < lo || rounded > hi {
                return trap(TrapKind::DomainError, ip, instr);
            }
            finish_int(frame, instr, rounded as i64)
        }
        CastFpToUiRteChk => {
            let f = interp.eval(frame, &instr.operands[0]).as_f64().unwrap_or(f64::NAN);
            if f.is_nan() || f.is_infinite() {
                return trap(TrapKind::InvalidCast, ip, instr);
            }
            let rounded = f.round_ties_even();
            let (lo, hi) = unsigned_range(instr.result_type);
            if rounded < lo || rounded > hi {
                return trap(TrapKind::DomainError, ip, instr);
            }
            finish_int(frame, instr, rounded as u64 as i64)
        }
        CastSiNarrowChk => {
            let n = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            if truncate(n, instr.result_type) != n {
                trap(TrapKind::Overflow, ip, instr)
            } else {
                finish_int(frame, instr, n)
            }
        }
        CastUiNarrowChk => {
            let n = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            let w = instr.result_type.int_width().unwrap_or(64);
            let fits = if w >= 64 { n >= 0 } else { n >= 0 && (n as u64) < (1u64 << w) };
            if fits {
                finish_int(frame, instr, n)
            } else {
                trap(TrapKind::Overflow, ip, instr)
            }
        }
        Trunc1 => {
            let n = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            frame.set(instr.result_id.unwrap(), Slot::bool(n & 1 != 0));
            HandlerOutcome::Next
        }
        Zext1 => {
            let b = interp.eval(frame, &instr.operands[0]).as_bool().unwrap_or(false);
            finish_int(frame, instr, b as i64)
        }
        _ => unreachable!("non-conversion opcode routed to conversion::handle: {:?}", instr.opcode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::UnboundBridge;
    use crate::config::VmConfig;
    use crate::trap::TrapReport;
    use viper_abi::Registry;
    use viper_io::parse_text;

    fn run_src(src: &str) -> Result<Slot, TrapReport> {
        let module = parse_text(src).unwrap();
        let registry = Registry::new();
        Interpreter::new(&module, &registry, Box::new(UnboundBridge), VmConfig::new()).run()
    }

    #[test]
    fn sitofp_converts_an_integer_to_a_float() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = sitofp 7 : f64\nret 0\n}\n";
        assert!(run_src(src).is_ok());
    }

    #[test]
    fn narrowing_a_value_that_does_not_fit_traps_overflow() {
        let src = "il 0.2.0\nfunc @main() -> i16 {\nentry:\n%0 = cast.si_narrow.chk 100000 : i16\nret %0\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::Overflow);
    }

    #[test]
    fn fp_to_si_rte_chk_rejects_nan_as_invalid_cast() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = fdiv 0.0, 0.0 : f64\n%1 = cast.fp_to_si.rte.chk %0 : i64\nret %1\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::InvalidCast);
    }
}
