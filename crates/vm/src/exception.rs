//! Exception-handling opcode handlers: `eh.push`, `eh.pop`, `eh.entry`,
//! the `resume.*` family, and `err.get_*` (spec §4.6 "Trap and Structured
//! Exception Handling").
//!
//! `eh.push`/`eh.pop` only maintain [`Frame::eh_stack`] — the actual
//! dispatch-on-trap walk lives in
//! [`crate::interpreter::Interpreter::execute_function`] (spec §4.6 step
//! 2), since that's the one place that sees every opcode's `Trap` outcome,
//! not just the ones raised here. A `Resume*` opcode always consumes
//! (pops) the handler record its containing block was entered through —
//! spec §4.6 gives a `ResumeTok` to exactly one handler invocation, so
//! once it's spent the EH stack must return to the state it was in before
//! the trap that triggered this handler.

use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::slot::Slot;
use crate::trap::{trap_kind_code, TrapKind, VmError};
use viper_il::{Instruction, Opcode};

pub fn handle(_interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, ip: usize) -> HandlerOutcome {
    match instr.opcode {
        Opcode::EhPush => {
            let label = instr.labels.first().cloned().unwrap_or_default();
            frame.eh_stack.push(crate::frame::HandlerRecord {
                handler_block_label: label,
                protected_block_label: frame.current_block.clone(),
                ip_snapshot: ip,
            });
            HandlerOutcome::Next
        }
        Opcode::EhPop => {
            frame.eh_stack.pop();
            HandlerOutcome::Next
        }
        // The `(Error, ResumeTok)` parameters are already bound by the
        // branch that transferred control here (spec §4.6 dispatch step
        // 2 stages them as ordinary block args); this opcode is a marker
        // with no further effect.
        Opcode::EhEntry => HandlerOutcome::Next,
        Opcode::ResumeSame => {
            let error = frame
                .active_error
                .take()
                .unwrap_or_else(|| VmError::new(TrapKind::RuntimeError, 0, ip as u64, instr.loc.line as i32));
            frame.eh_stack.pop();
            HandlerOutcome::Trap {
                error,
                message: "resume.same re-raised the active error".to_string(),
                origin: None,
            }
        }
        Opcode::ResumeNext => {
            let handler = frame.eh_stack.pop();
            frame.active_error = None;
            match handler {
                Some(h) => HandlerOutcome::ResumeAt { label: h.protected_block_label, ip: h.ip_snapshot + 1 },
                None => HandlerOutcome::Trap {
                    error: VmError::new(TrapKind::InvalidOperation, 0, ip as u64, instr.loc.line as i32),
                    message: "resume.next with no active handler".to_string(),
                    origin: None,
                },
            }
        }
        Opcode::ResumeLabel => {
            frame.eh_stack.pop();
            frame.active_error = None;
            let label = instr.labels.first().cloned().unwrap_or_default();
            HandlerOutcome::Jump { label, args: Vec::new() }
        }
        Opcode::ErrGetKind => {
            let code = frame.active_error.map(|e| trap_kind_code(e.kind)).unwrap_or(-1);
            frame.set(instr.result_id.unwrap(), Slot::I(code as i64));
            HandlerOutcome::Next
        }
        Opcode::ErrGetCode => {
            let code = frame.active_error.map(|e| e.code).unwrap_or(0);
            frame.set(instr.result_id.unwrap(), Slot::I(code as i64));
            HandlerOutcome::Next
        }
        Opcode::ErrGetIp => {
            let ip_val = frame.active_error.map(|e| e.ip as i64).unwrap_or(0);
            frame.set(instr.result_id.unwrap(), Slot::I(ip_val));
            HandlerOutcome::Next
        }
        Opcode::ErrGetLine => {
            let line = frame.active_error.map(|e| e.line).unwrap_or(0);
            frame.set(instr.result_id.unwrap(), Slot::I(line as i64));
            HandlerOutcome::Next
        }
        _ => unreachable!("non-exception opcode routed to exception::handle: {:?}", instr.opcode),
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
    fn handler_resumes_next_after_the_protected_instruction() {
        // Spec §8 scenario S3.
        let src = "il 0.2.0\nfunc @main() -> i64 {\n\
                   entry:\neh.push H\n%0 = sdiv.chk0 i64 10, 0 : i64\neh.pop\nret 7\n\
                   H(error %1, resume_tok %2):\n%3 = err.get_kind %1 : i32\nresume.next %2\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(7));
    }

    #[test]
    fn handler_resumes_to_an_explicit_label() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\n\
                   entry:\neh.push H\n%0 = sdiv.chk0 i64 10, 0 : i64\neh.pop\nret %0\n\
                   H(error %1, resume_tok %2):\nresume.label %2, done()\n\
                   done:\nret 99\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(99));
    }

    #[test]
    fn resume_same_re_raises_to_an_outer_handler() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\n\
                   entry:\neh.push OUTER\neh.push INNER\n%0 = sdiv.chk0 i64 10, 0 : i64\neh.pop\neh.pop\nret %0\n\
                   INNER(error %1, resume_tok %2):\nresume.same %2\n\
                   OUTER(error %3, resume_tok %4):\nret 5\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(5));
    }

    #[test]
    fn err_get_kind_reports_the_trapping_kind() {
        let src = "il 0.2.0\nfunc @main() -> i32 {\n\
                   entry:\neh.push H\n%0 = sdiv.chk0 i64 10, 0 : i64\neh.pop\nret 0\n\
                   H(error %1, resume_tok %2):\n%3 = err.get_kind %1 : i32\nret %3\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(0));
    }
}
