//! `Call`/`CallIndirect` opcode handlers (spec §4.4 "Calls", §4.5 "Tail
//! call", §4.7 "Runtime Bridge").
//!
//! A direct call to a name the module defines as a function recurses into
//! [`Interpreter::call_function`] (the Rust call stack *is* the VM's call
//! stack, per spec §9 "Frame ownership"); a direct call to anything else
//! goes through [`Interpreter::call_extern`] and the runtime bridge. A
//! call marked tail never recurses at all — it hands `HandlerOutcome::
//! TailCall` back to [`crate::interpreter::Interpreter::execute_function`],
//! which swaps frames in place, giving tail-recursive IL programs constant
//! Rust stack depth (spec §4.5, property P7).

use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::{Interpreter, TrapCarrier};
use crate::slot::Slot;
use crate::trap::{TrapKind, VmError};
use viper_il::{Instruction, Opcode};

fn propagate(carrier: TrapCarrier) -> HandlerOutcome {
    HandlerOutcome::Trap {
        error: carrier.error,
        message: carrier.message,
        origin: Some((carrier.function, carrier.block)),
    }
}

fn finish(instr: &Instruction, frame: &mut Frame, result: Result<Slot, TrapCarrier>) -> HandlerOutcome {
    match result {
        Ok(value) => {
            if let Some(id) = instr.result_id {
                frame.set(id, value);
            }
            HandlerOutcome::Next
        }
        Err(carrier) => propagate(carrier),
    }
}

pub fn handle(interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, ip: usize) -> HandlerOutcome {
    match instr.opcode {
        Opcode::Call => {
            let args: Vec<Slot> = instr.operands.iter().map(|v| interp.eval(frame, v)).collect();
            let is_module_fn = interp.module.function(&instr.callee).is_some();
            // Frame-reuse tail calls (spec §4.5, P7) only make sense for a
            // callee the VM itself owns a frame for; an extern call always
            // returns straight back through the bridge, so `tail` on one is
            // executed as an ordinary call.
            if instr.call_attrs.tail && is_module_fn {
                return HandlerOutcome::TailCall { callee: instr.callee.clone(), args };
            }
            let result = if is_module_fn {
                interp.call_function(&instr.callee, args)
            } else {
                interp.call_extern(&instr.callee, args, instr.loc, &frame.function.name, &frame.current_block)
            };
            finish(instr, frame, result)
        }
        Opcode::CallIndirect => {
            let fn_ptr = interp.eval(frame, &instr.operands[0]).as_ptr().unwrap_or(0);
            let args: Vec<Slot> = instr.operands[1..].iter().map(|v| interp.eval(frame, v)).collect();
            let callee = match interp.function_name_for_ptr(fn_ptr) {
                Some(name) => name.to_string(),
                None => {
                    return HandlerOutcome::Trap {
                        error: VmError::new(TrapKind::InvalidOperation, 0, ip as u64, instr.loc.line as i32),
                        message: "call_indirect: pointer does not name a function".to_string(),
                        origin: None,
                    };
                }
            };
            if instr.call_attrs.tail {
                return HandlerOutcome::TailCall { callee, args };
            }
            let result = interp.call_function(&callee, args);
            finish(instr, frame, result)
        }
        _ => unreachable!("non-call opcode routed to calls::handle: {:?}", instr.opcode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeError, HostBridge, UnboundBridge};
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
    fn a_direct_call_to_a_defined_function_recurses_and_returns_its_value() {
        let src = "il 0.2.0\n\
                   func @add_one(i64 %n) -> i64 {\nentry:\n%0 = add %n, 1 : i64\nret %0\n}\n\
                   func @main() -> i64 {\nentry:\n%0 = call @add_one(41)\nret %0\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(42));
    }

    #[test]
    fn a_call_with_no_matching_function_goes_through_the_bridge() {
        struct Echo;
        impl HostBridge for Echo {
            fn call(&mut self, name: &str, args: &[Slot]) -> Result<Slot, BridgeError> {
                assert_eq!(name, "Viper.Terminal.SayInt");
                assert_eq!(args[0].as_i64(), Some(42));
                Ok(Slot::Void)
            }
        }
        let src = "il 0.2.0\nextern @Viper.Terminal.SayInt(i64) -> void\n\
                   func @main() -> void {\nentry:\ncall @Viper.Terminal.SayInt(42)\nret\n}\n";
        let module = parse_text(src).unwrap();
        let registry = Registry::new();
        let result = Interpreter::new(&module, &registry, Box::new(Echo), VmConfig::new()).run();
        assert!(result.is_ok());
    }

    #[test]
    fn tail_recursive_sum_returns_the_same_value_a_loop_would() {
        // Spec §8 scenario S6: sum(1_000_000, 0) == 500000500000, reusing
        // the current frame on every recursive step via `tail`.
        let src = "il 0.2.0\n\
                   func @sum(i64 %n, i64 %acc) -> i64 {\n\
                   entry:\n%0 = icmp.eq %n, 0 : i1\ncbr %0, base(%acc), step()\n\
                   step:\n%1 = sub %n, 1 : i64\n%2 = add %acc, %n : i64\n\
                   %3 = call @sum(%1, %2) tail\nret %3\n\
                   base(i64 %acc2):\nret %acc2\n}\n\
                   func @main() -> i64 {\nentry:\n%0 = call @sum(1000000, 0)\nret %0\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(500_000_500_000));
    }

    #[test]
    fn a_tail_call_to_an_extern_goes_through_the_bridge_instead_of_frame_reuse() {
        struct Echo;
        impl HostBridge for Echo {
            fn call(&mut self, name: &str, args: &[Slot]) -> Result<Slot, BridgeError> {
                assert_eq!(name, "Viper.Terminal.SayInt");
                assert_eq!(args[0].as_i64(), Some(42));
                Ok(Slot::Void)
            }
        }
        let src = "il 0.2.0\nextern @Viper.Terminal.SayInt(i64) -> void\n\
                   func @main() -> void {\nentry:\ncall @Viper.Terminal.SayInt(42) tail\nret\n}\n";
        let module = parse_text(src).unwrap();
        let registry = Registry::new();
        let result = Interpreter::new(&module, &registry, Box::new(Echo), VmConfig::new()).run();
        assert!(result.is_ok());
    }
}
