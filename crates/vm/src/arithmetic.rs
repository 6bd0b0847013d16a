//! Integer and float arithmetic opcode handlers (spec §4.4 "Integer arith
//! (wrap)", "Checked integer", "Float arith" groups).
//!
//! Every integer handler writes its result back through [`truncate`] so a
//! slot produced here always carries the canonical sign-extended bit
//! pattern for its declared width — `SCmp`/`UCmp`/shift handlers then trust
//! that representation instead of re-deriving it, since the instruction
//! table gives comparisons no operand-type field of their own.

use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::slot::Slot;
use crate::trap::{TrapKind, VmError};
use viper_il::{Instruction, Opcode, Type};

pub(crate) fn width_bits(ty: Type) -> u32 {
    ty.int_width().unwrap_or(64)
}

/// Sign-extends the low `width_bits(ty)` bits of `n` back out to i64.
pub(crate) fn truncate(n: i64, ty: Type) -> i64 {
    let w = width_bits(ty);
    if w >= 64 {
        n
    } else {
        let shift = 64 - w;
        (n << shift) >> shift
    }
}

/// The unsigned magnitude of `n` at `ty`'s declared width (mask off
/// whatever sign-extension bits [`truncate`] put above it).
fn as_unsigned(n: i64, ty: Type) -> u64 {
    let w = width_bits(ty);
    if w >= 64 {
        n as u64
    } else {
        (n as u64) & ((1u64 << w) - 1)
    }
}

fn trap(kind: TrapKind, ip: usize, instr: &Instruction) -> HandlerOutcome {
    HandlerOutcome::Trap {
        error: VmError::new(kind, 0, ip as u64, instr.loc.line as i32),
        message: format!("{kind} in '{}'", instr.opcode),
        origin: None,
    }
}

fn int_operands(interp: &mut Interpreter, frame: &Frame, instr: &Instruction) -> (i64, i64) {
    let a = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
    let b = interp.eval(frame, &instr.operands[1]).as_i64().unwrap_or(0);
    (a, b)
}

fn finish(frame: &mut Frame, instr: &Instruction, n: i64) -> HandlerOutcome {
    frame.set(instr.result_id.unwrap(), Slot::I(truncate(n, instr.result_type)));
    HandlerOutcome::Next
}

pub fn handle(interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, ip: usize) -> HandlerOutcome {
    use Opcode::*;
    match instr.opcode {
        Add | Sub | Mul | And | Or | Xor | Shl | LShr | AShr | SDiv | UDiv | SRem | URem => {
            let (a, b) = int_operands(interp, frame, instr);
            let ty = instr.result_type;
            match instr.opcode {
                Add => finish(frame, instr, a.wrapping_add(b)),
                Sub => finish(frame, instr, a.wrapping_sub(b)),
                Mul => finish(frame, instr, a.wrapping_mul(b)),
                And => finish(frame, instr, a & b),
                Or => finish(frame, instr, a | b),
                Xor => finish(frame, instr, a ^ b),
                Shl => {
                    let shift = (b as u64 as u32) % width_bits(ty).max(1);
                    finish(frame, instr, a.wrapping_shl(shift))
                }
                LShr => {
                    let shift = (b as u64 as u32) % width_bits(ty).max(1);
                    finish(frame, instr, (as_unsigned(a, ty) >> shift) as i64)
                }
                AShr => {
                    let shift = (b as u64 as u32) % width_bits(ty).max(1);
                    finish(frame, instr, a.wrapping_shr(shift))
                }
                // Division by zero with the unchecked opcode is spec §4.4
                // "undefined"; this workspace traps instead of risking a
                // Rust-level panic on the unchecked path.
                SDiv | SRem if b == 0 => trap(TrapKind::DivideByZero, ip, instr),
                SDiv => finish(frame, instr, a.wrapping_div(b)),
                SRem => finish(frame, instr, a.wrapping_rem(b)),
                UDiv | URem if as_unsigned(b, ty) == 0 => trap(TrapKind::DivideByZero, ip, instr),
                UDiv => finish(frame, instr, (as_unsigned(a, ty) / as_unsigned(b, ty)) as i64),
                URem => finish(frame, instr, (as_unsigned(a, ty) % as_unsigned(b, ty)) as i64),
                _ => unreachable!(),
            }
        }
        IAddOvf | ISubOvf | IMulOvf => {
            let (a, b) = int_operands(interp, frame, instr);
            let ty = instr.result_type;
            let checked = match instr.opcode {
                IAddOvf => a.checked_add(b),
                ISubOvf => a.checked_sub(b),
                IMulOvf => a.checked_mul(b),
                _ => unreachable!(),
            };
            match checked {
                Some(n) if truncate(n, ty) == n => finish(frame, instr, n),
                _ => trap(TrapKind::Overflow, ip, instr),
            }
        }
        SDivChk0 | UDivChk0 | SRemChk0 | URemChk0 => {
            let (a, b) = int_operands(interp, frame, instr);
            let ty = instr.result_type;
            let zero = match instr.opcode {
                SDivChk0 | SRemChk0 => b == 0,
                _ => as_unsigned(b, ty) == 0,
            };
            if zero {
                return trap(TrapKind::DivideByZero, ip, instr);
            }
            match instr.opcode {
                SDivChk0 if a == i64::MIN && b == -1 => trap(TrapKind::Overflow, ip, instr),
                SDivChk0 => finish(frame, instr, a.wrapping_div(b)),
                SRemChk0 if a == i64::MIN && b == -1 => finish(frame, instr, 0),
                SRemChk0 => finish(frame, instr, a.wrapping_rem(b)),
                UDivChk0 => finish(frame, instr, (as_unsigned(a, ty) / as_unsigned(b, ty)) as i64),
                URemChk0 => finish(frame, instr, (as_unsigned(a, ty) % as_unsigned(b, ty)) as i64),
                _ => unreachable!(),
            }
        }
        IdxChk => {
            let idx = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            let bound = interp.eval(frame, &instr.operands[1]).as_i64().unwrap_or(0);
            if idx < 0 || idx >= bound {
                trap(TrapKind::Bounds, ip, instr)
            } else {
                finish(frame, instr, idx)
            }
        }
        FAdd | FSub | FMul | FDiv => {
            let a = interp.eval(frame, &instr.operands[0]).as_f64().unwrap_or(0.0);
            let b = interp.eval(frame, &instr.operands[1]).as_f64().unwrap_or(0.0);
            let result = match instr.opcode {
                FAdd => a + b,
                FSub => a - b,
                FMul => a * b,
                FDiv => a / b,
                _ => unreachable!(),
            };
            frame.set(instr.result_id.unwrap(), Slot::F(result));
            HandlerOutcome::Next
        }
        _ => unreachable!("non-arithmetic opcode routed to arithmetic::handle: {:?}", instr.opcode),
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
    fn checked_add_overflow_traps() {
        let src = format!(
            "il 0.2.0\nfunc @main() -> i64 {{\nentry:\n%0 = iaddovf {}, 1 : i64\nret %0\n}}\n",
            i64::MAX
        );
        let err = run_src(&src).unwrap_err();
        assert_eq!(err.kind, TrapKind::Overflow);
    }

    #[test]
    fn idx_chk_out_of_range_traps_bounds() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = idx.chk 5, 3 : i64\nret %0\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::Bounds);
    }

    #[test]
    fn unchecked_shift_wraps_the_shift_amount_by_width() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = shl 1, 64 : i64\nret %0\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(1));
    }

    #[test]
    fn float_division_by_zero_yields_infinity_not_a_trap() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = fdiv 1.0, 0.0 : f64\nret 0\n}\n";
        assert!(run_src(src).is_ok());
    }
}
