//! The opcode dispatch contract (spec §4.5 "Dispatch strategies"): three
//! interchangeable drivers sharing the same handler bodies, selected by
//! [`crate::config::DispatchStrategy`].
//!
//! Handlers are grouped the way spec §2's size budget groups them
//! (arithmetic, comparison, conversion, memory, control, calls,
//! exception); each group owns one `handle` entry point that matches on
//! the specific opcode inside. `Table` looks the group handler up through
//! a `fn`-pointer array indexed by `Opcode as usize`; `Switch` reaches the
//! same group handler through a `match` on [`viper_il::DispatchKind`].
//! Both paths call the identical function, so the two strategies are
//! observably identical by construction (spec: "All three must produce
//! *identical* observable behavior").

use crate::config::DispatchStrategy;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::slot::Slot;
use crate::trap::VmError;
use std::sync::OnceLock;
use viper_il::{DispatchKind, Instruction, Opcode};

/// Finalize step of the interpretation loop (spec §4.5 step 5): "handler
/// returns one of {Next, JumpTo(block, args), Return(value), Trap(kind,
/// info)}". `TailCall` is an addition this workspace needs to implement
/// the frame-reuse behavior spec §4.5 describes for tail calls without a
/// trampoline living outside the handler contract.
#[derive(Debug, Clone)]
pub enum HandlerOutcome {
    Next,
    Jump { label: String, args: Vec<Slot> },
    /// Re-enter `label` at a specific instruction index rather than at 0,
    /// with no block-parameter rebinding — how `resume.same`/`resume.next`
    /// pick back up mid-block inside the region a handler protected.
    ResumeAt { label: String, ip: usize },
    Return(Slot),
    TailCall { callee: String, args: Vec<Slot> },
    Trap { error: VmError, message: String, origin: Option<(String, String)> },
}

pub type HandlerFn = fn(&mut Interpreter, &mut Frame, &Instruction, usize) -> HandlerOutcome;

fn handler_for(op: Opcode) -> HandlerFn {
    match op.info().dispatch_kind {
        DispatchKind::Arithmetic => crate::arithmetic::handle,
        DispatchKind::Comparison => crate::comparison::handle,
        DispatchKind::Conversion => crate::conversion::handle,
        DispatchKind::Memory => crate::memory::handle,
        DispatchKind::Control => crate::control::handle,
        DispatchKind::Call => crate::calls::handle,
        DispatchKind::Exception => crate::exception::handle,
    }
}

fn build_table() -> Vec<HandlerFn> {
    let mut table: Vec<HandlerFn> = vec![crate::control::handle; viper_il::ALL_OPCODES.len()];
    for &op in viper_il::ALL_OPCODES {
        table[op as usize] = handler_for(op);
    }
    table
}

static TABLE: OnceLock<Vec<HandlerFn>> = OnceLock::new();

pub fn dispatch(
    interp: &mut Interpreter,
    frame: &mut Frame,
    instr: &Instruction,
    ip: usize,
    strategy: DispatchStrategy,
) -> HandlerOutcome {
    let f = match strategy {
        DispatchStrategy::Switch => handler_for(instr.opcode),
        DispatchStrategy::Table | DispatchStrategy::Auto => {
            TABLE.get_or_init(build_table)[instr.opcode as usize]
        }
    };
    f(interp, frame, instr, ip)
}
