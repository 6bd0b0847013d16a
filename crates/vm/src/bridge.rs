//! Runtime bridge: the thread-local call context (spec §4.7 step 2) and
//! the adapter seam a host implements to answer `Call @name` against an
//! extern. The thread-local itself follows the teacher's `LAST_ERROR`
//! pattern (`crates/runtime/src/error.rs`) almost verbatim — a `RefCell`
//! behind a `thread_local!`, set before a call and cleared after.

use crate::slot::Slot;
use crate::trap::TrapKind;
use std::cell::RefCell;
use viper_il::Loc;

/// Spec §4.7 step 2: "`{loc, function, block, descriptor, args}`".
#[derive(Debug, Clone)]
pub struct RuntimeCallContext {
    pub loc: Loc,
    pub function: String,
    pub block: String,
    pub descriptor_name: String,
    pub args: Vec<Slot>,
}

thread_local! {
    static CALL_CONTEXT: RefCell<Option<RuntimeCallContext>> = const { RefCell::new(None) };
}

pub fn set_call_context(ctx: RuntimeCallContext) {
    CALL_CONTEXT.with(|c| *c.borrow_mut() = Some(ctx));
}

pub fn clear_call_context() {
    CALL_CONTEXT.with(|c| *c.borrow_mut() = None);
}

/// Spec §4.7: "The host runtime may call back into the VM's `trap(kind,
/// message)` entry point to raise a structured trap carrying the active
/// context." `f` sees the live context, if any was set.
pub fn with_call_context<R>(f: impl FnOnce(Option<&RuntimeCallContext>) -> R) -> R {
    CALL_CONTEXT.with(|c| f(c.borrow().as_ref()))
}

/// Raised by a `HostBridge::call` to request a structured trap; the
/// interpreter attaches `ip`/`line` from the active call context.
#[derive(Debug, Clone)]
pub struct BridgeError {
    pub kind: TrapKind,
    pub message: String,
}

impl BridgeError {
    pub fn new(kind: TrapKind, message: impl Into<String>) -> Self {
        BridgeError { kind, message: message.into() }
    }
}

/// The seam a host implements to marshal slots to/from its own ABI
/// (integers, doubles, raw pointers, opaque string handles) for a single
/// named helper call (spec §4.7 step 3).
pub trait HostBridge {
    fn call(&mut self, name: &str, args: &[Slot]) -> Result<Slot, BridgeError>;
}

/// No host wired up: every call traps, naming the missing helper. Real
/// embedders supply their own `HostBridge`; this exists so the VM crate
/// is runnable standalone in tests without a host present.
#[derive(Debug, Default)]
pub struct UnboundBridge;

impl HostBridge for UnboundBridge {
    fn call(&mut self, name: &str, _args: &[Slot]) -> Result<Slot, BridgeError> {
        Err(BridgeError::new(
            TrapKind::RuntimeError,
            format!("no host bridge registered for '{name}'"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_context_is_visible_while_set_and_gone_after_clear() {
        clear_call_context();
        assert!(with_call_context(|c| c.is_none()));
        set_call_context(RuntimeCallContext {
            loc: Loc::UNKNOWN,
            function: "main".into(),
            block: "entry".into(),
            descriptor_name: "Viper.Terminal.SayInt".into(),
            args: vec![Slot::I(7)],
        });
        assert!(with_call_context(|c| c.unwrap().descriptor_name == "Viper.Terminal.SayInt"));
        clear_call_context();
        assert!(with_call_context(|c| c.is_none()));
    }

    #[test]
    fn unbound_bridge_traps_with_runtime_error() {
        let mut bridge = UnboundBridge;
        let err = bridge.call("Viper.Terminal.SayInt", &[Slot::I(1)]).unwrap_err();
        assert_eq!(err.kind, TrapKind::RuntimeError);
    }
}
