//! Control-flow and constant opcode handlers (spec §4.4 "Control",
//! "Constants" groups — constants dispatch through `Control` in the
//! metadata table since evaluating one is just forwarding
//! [`Interpreter::eval`]'s own literal handling into a named result).

use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::slot::Slot;
use crate::trap::{TrapKind, VmError, TRAP_KIND_ORDER};
use viper_il::{Instruction, Opcode};

fn jump(interp: &mut Interpreter, frame: &Frame, label: &str, args: &[viper_il::Value]) -> HandlerOutcome {
    let args = args.iter().map(|v| interp.eval(frame, v)).collect();
    HandlerOutcome::Jump { label: label.to_string(), args }
}

pub fn handle(interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, ip: usize) -> HandlerOutcome {
    match instr.opcode {
        Opcode::ConstF64 | Opcode::ConstStr | Opcode::GAddr => {
            let v = interp.eval(frame, &instr.operands[0]);
            frame.set(instr.result_id.unwrap(), v);
            HandlerOutcome::Next
        }
        Opcode::ConstNull => {
            frame.set(instr.result_id.unwrap(), Slot::Ptr(0));
            HandlerOutcome::Next
        }
        Opcode::Br => jump(interp, frame, &instr.labels[0], &instr.br_args[0]),
        Opcode::CBr => {
            let cond = interp.eval(frame, &instr.operands[0]).as_bool().unwrap_or(false);
            if cond {
                jump(interp, frame, &instr.labels[0], &instr.br_args[0])
            } else {
                jump(interp, frame, &instr.labels[1], &instr.br_args[1])
            }
        }
        Opcode::SwitchI32 => {
            let scrutinee = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            for (value, label, args) in instr.switch_arms() {
                if value == scrutinee {
                    return jump(interp, frame, label, args);
                }
            }
            jump(interp, frame, &instr.labels[0], &instr.br_args[0])
        }
        Opcode::Ret => {
            let value = instr
                .operands
                .first()
                .map(|v| interp.eval(frame, v))
                .unwrap_or(Slot::Void);
            HandlerOutcome::Return(value)
        }
        Opcode::Trap => HandlerOutcome::Trap {
            error: VmError::new(TrapKind::RuntimeError, 0, ip as u64, instr.loc.line as i32),
            message: "trap".to_string(),
            origin: None,
        },
        Opcode::TrapKind => {
            let code = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0);
            let kind = TRAP_KIND_ORDER
                .get(code as usize)
                .copied()
                .unwrap_or(TrapKind::RuntimeError);
            HandlerOutcome::Trap {
                error: VmError::new(kind, code as i32, ip as u64, instr.loc.line as i32),
                message: format!("trap.kind {kind}"),
                origin: None,
            }
        }
        // `TrapErr`/`TrapFromErr` both re-raise a value of type `Error`;
        // this workspace doesn't distinguish "rethrow verbatim" from
        // "construct a new trap from the error's kind" (the opcode table
        // gives `Error` no payload beyond the frame's `active_error`), so
        // both re-raise whatever is currently active.
        Opcode::TrapErr | Opcode::TrapFromErr => {
            let error = frame
                .active_error
                .unwrap_or_else(|| VmError::new(TrapKind::RuntimeError, 0, ip as u64, instr.loc.line as i32));
            HandlerOutcome::Trap {
                error,
                message: format!("{} re-raised", instr.opcode),
                origin: None,
            }
        }
        _ => unreachable!("non-control opcode routed to control::handle: {:?}", instr.opcode),
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
    fn conditional_branch_takes_the_true_target() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\ncbr true, t(), f()\nt:\nret 1\nf:\nret 0\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(1));
    }

    #[test]
    fn switch_falls_back_to_default_on_no_match() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nswitch i32 9, default: d(), 1: a()\nd:\nret 0\na:\nret 1\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(0));
    }

    #[test]
    fn bare_trap_surfaces_a_runtime_error() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\ntrap\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::RuntimeError);
    }
}
