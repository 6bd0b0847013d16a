//! `viper-vm`: the stack-based interpreter (spec §4.5-§4.9).
//!
//! Frame/slot model, opcode dispatch (three interchangeable strategies
//! sharing one set of handler bodies), control flow, exception handling
//! with structured resume semantics, the runtime-bridge seam, and the
//! trace/debug hooks. Everything here consumes an already-verified
//! [`viper_il::Module`]; this crate never re-checks the invariants
//! `viper-verify` owns.

pub mod arithmetic;
pub mod bridge;
mod calls;
pub mod comparison;
pub mod config;
pub mod control;
pub mod conversion;
pub mod debug;
mod dispatch;
mod exception;
pub mod frame;
pub mod interpreter;
pub mod memory;
pub mod slot;
pub mod trace;
pub mod trap;

pub use bridge::{BridgeError, HostBridge, RuntimeCallContext, UnboundBridge};
pub use config::{DispatchStrategy, PollConfig, TraceConfig, VmConfig};
pub use debug::{Breakpoint, DebugAction, DebugController, FrameView};
pub use dispatch::HandlerOutcome;
pub use frame::{Frame, HandlerRecord, ResumeRequest};
pub use interpreter::Interpreter;
pub use slot::{ErrorHandle, ResumeTokHandle, Slot, StrHandle};
pub use trace::TraceSink;
pub use trap::{TrapKind, TrapReport, VmError};
