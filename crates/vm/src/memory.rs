//! `Alloca`/`Load`/`Store`/`Gep`/`AddrOf` opcode handlers.
//!
//! The instruction table gives `Store`/`Alloca`/`Gep` no leading type
//! operand — only `Load` carries one, as its own declared result type —
//! so every memory cell this workspace allocates, frame-local or global,
//! is a fixed 8 bytes. `Store` encodes whichever `Slot` variant it's
//! handed; `Load` decodes those same 8 bytes back out through its result
//! type.

use crate::arithmetic::truncate;
use crate::dispatch::HandlerOutcome;
use crate::frame::Frame;
use crate::interpreter::{self, Interpreter};
use crate::slot::{Slot, StrHandle};
use crate::trap::{TrapKind, VmError};
use viper_il::{Instruction, Opcode, Type};

pub(crate) const CELL_WIDTH: usize = 8;

pub(crate) fn encode(slot: Slot) -> [u8; CELL_WIDTH] {
    match slot {
        Slot::I(n) => n.to_le_bytes(),
        Slot::F(f) => f.to_le_bytes(),
        Slot::Ptr(p) => p.to_le_bytes(),
        Slot::Str(StrHandle(id)) => (id as i64).to_le_bytes(),
        Slot::Error(_) | Slot::ResumeTok(_) | Slot::Void => 0i64.to_le_bytes(),
    }
}

pub(crate) fn decode(bytes: &[u8], ty: Type) -> Slot {
    let mut buf = [0u8; CELL_WIDTH];
    let n = bytes.len().min(CELL_WIDTH);
    buf[..n].copy_from_slice(&bytes[..n]);
    match ty {
        Type::Void | Type::Error | Type::ResumeTok => Slot::Void,
        Type::I1 | Type::I16 | Type::I32 | Type::I64 => Slot::I(truncate(i64::from_le_bytes(buf), ty)),
        Type::F64 => Slot::F(f64::from_le_bytes(buf)),
        Type::Ptr => Slot::Ptr(u64::from_le_bytes(buf)),
        Type::Str => Slot::Str(StrHandle(i64::from_le_bytes(buf) as u32)),
    }
}

fn trap(kind: TrapKind, ip: usize, instr: &Instruction) -> HandlerOutcome {
    HandlerOutcome::Trap {
        error: VmError::new(kind, 0, ip as u64, instr.loc.line as i32),
        message: format!("{kind} in '{}'", instr.opcode),
        origin: None,
    }
}

pub fn handle(interp: &mut Interpreter, frame: &mut Frame, instr: &Instruction, ip: usize) -> HandlerOutcome {
    match instr.opcode {
        Opcode::Alloca => {
            let requested = interp.eval(frame, &instr.operands[0]).as_i64().unwrap_or(0).max(0) as usize;
            match frame.alloca(requested.max(CELL_WIDTH)) {
                Ok(offset) => {
                    frame.set(instr.result_id.unwrap(), Slot::Ptr(offset));
                    HandlerOutcome::Next
                }
                Err(kind) => trap(kind, ip, instr),
            }
        }
        Opcode::Load => {
            let ptr = interp.eval(frame, &instr.operands[0]).as_ptr().unwrap_or(0);
            if ptr == 0 {
                return trap(TrapKind::Bounds, ip, instr);
            }
            let bytes = if interpreter::is_global_ptr(ptr) {
                interp.read_global_bytes(interpreter::untag(ptr), CELL_WIDTH)
            } else {
                frame.read_bytes(ptr, CELL_WIDTH)
            };
            match bytes {
                Ok(bytes) => {
                    let slot = decode(bytes, instr.result_type);
                    frame.set(instr.result_id.unwrap(), slot);
                    HandlerOutcome::Next
                }
                Err(kind) => trap(kind, ip, instr),
            }
        }
        Opcode::Store => {
            let ptr = interp.eval(frame, &instr.operands[0]).as_ptr().unwrap_or(0);
            if ptr == 0 {
                return trap(TrapKind::Bounds, ip, instr);
            }
            let value = interp.eval(frame, &instr.operands[1]);
            let bytes = encode(value);
            let written = if interpreter::is_global_ptr(ptr) {
                interp.write_global_bytes(interpreter::untag(ptr), &bytes)
            } else {
                frame.write_bytes(ptr, &bytes)
            };
            match written {
                Ok(()) => HandlerOutcome::Next,
                Err(kind) => trap(kind, ip, instr),
            }
        }
        Opcode::Gep => {
            let base = interp.eval(frame, &instr.operands[0]).as_ptr().unwrap_or(0);
            let index = interp.eval(frame, &instr.operands[1]).as_i64().unwrap_or(0);
            let is_global = interpreter::is_global_ptr(base);
            let offset = interpreter::untag(base) as i64 + index * CELL_WIDTH as i64;
            if offset < 0 {
                return trap(TrapKind::Bounds, ip, instr);
            }
            let offset = offset as u64;
            let ptr = if is_global { interpreter::tag_global(offset) } else { offset };
            frame.set(instr.result_id.unwrap(), Slot::Ptr(ptr));
            HandlerOutcome::Next
        }
        // No computation of its own — every pointer-producing opcode
        // already hands back an addressable `Slot::Ptr`, so "take the
        // address of" one is just forwarding it.
        Opcode::AddrOf => {
            let ptr = interp.eval(frame, &instr.operands[0]);
            frame.set(instr.result_id.unwrap(), ptr);
            HandlerOutcome::Next
        }
        _ => unreachable!("non-memory opcode routed to memory::handle: {:?}", instr.opcode),
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
    fn store_then_load_round_trips_a_value() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = alloca 8 : ptr\nstore %0, 42\n%1 = load %0 : i64\nret %1\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(42));
    }

    #[test]
    fn gep_advances_by_whole_cells() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = alloca 16 : ptr\nstore %0, 1\n%1 = gep %0, 1 : ptr\nstore %1, 2\n%2 = load %1 : i64\nret %2\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(2));
    }

    #[test]
    fn alloca_exhaustion_traps_overflow() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = alloca 1000000 : ptr\nret 0\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::Overflow);
    }

    #[test]
    fn loading_through_a_null_pointer_traps_bounds() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = const.null : ptr\n%1 = load %0 : i64\nret %1\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::Bounds);
    }

    #[test]
    fn storing_through_a_null_pointer_traps_bounds() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = const.null : ptr\nstore %0, 1\nret 0\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::Bounds);
    }
}
