//! Integer and float comparison opcode handlers (spec §4.4 "Integer
//! compare", "Float compare" groups); every result is `i1`.

use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::slot::Slot;
use viper_il::{Instruction, Opcode};

fn set_bool(frame: &mut Frame, instr: &Instruction, v: bool) -> HandlerOutcome {
    frame.set(instr.result_id.unwrap(), Slot::bool(v));
    HandlerOutcome::Next
}

pub fn handle(interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, _ip: usize) -> HandlerOutcome {
    use Opcode::*;
    match instr.opcode {
        ICmpEq | ICmpNe | SCmpLt | SCmpLe | SCmpGt | SCmpGe | UCmpLt | UCmpLe | UCmpGt | UCmpGe => {
            let a = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            let b = interp.eval(frame, &instr.operands[1]).as_i64().unwrap_or(0);
            let (ua, ub) = (a as u64, b as u64);
            let result = match instr.opcode {
                ICmpEq => a == b,
                ICmpNe => a != b,
                SCmpLt => a < b,
                SCmpLe => a <= b,
                SCmpGt => a > b,
                SCmpGe => a >= b,
                UCmpLt => ua < ub,
                UCmpLe => ua <= ub,
                UCmpGt => ua > ub,
                UCmpGe => ua >= ub,
                _ => unreachable!(),
            };
            set_bool(frame, instr, result)
        }
        FCmpEq | FCmpNe | FCmpLt | FCmpLe | FCmpGt | FCmpGe | FCmpOrd | FCmpUno => {
            let a = interp.eval(frame, &instr.operands[0]).as_f64().unwrap_or(f64::NAN);
            let b = interp.eval(frame, &instr.operands[1]).as_f64().unwrap_or(f64::NAN);
            let result = match instr.opcode {
                FCmpEq => a == b,
                FCmpNe => a != b,
                FCmpLt => a < b,
                FCmpLe => a <= b,
                FCmpGt => a > b,
                FCmpGe => a >= b,
                FCmpOrd => !a.is_nan() && !b.is_nan(),
                FCmpUno => a.is_nan() || b.is_nan(),
                _ => unreachable!(),
            };
            set_bool(frame, instr, result)
        }
        _ => unreachable!("non-comparison opcode routed to comparison::handle: {:?}", instr.opcode),
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
    fn unsigned_compare_treats_negative_one_as_the_largest_value() {
        let src = "il 0.2.0\nfunc @main() -> i1 {\nentry:\n%0 = ucmp.gt -1, 1 : i1\nret %0\n}\n";
        assert_eq!(run_src(src).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn fcmp_uno_is_true_when_either_side_is_nan() {
        let src = "il 0.2.0\nfunc @main() -> i1 {\nentry:\n%0 = fdiv 0.0, 0.0 : f64\n%1 = fcmp.uno %0, 1.0 : i1\nret %1\n}\n";
        assert_eq!(run_src(src).unwrap().as_bool(), Some(true));
    }
}
