//! The interpreter loop itself (spec §4.5 "Interpretation loop",
//! "Execution state").

use crate::bridge::{BridgeError, HostBridge, RuntimeCallContext};
use crate::config::VmConfig;
use crate::debug::DebugController;
use crate::dispatch::{self, HandlerOutcome};
use crate::frame::Frame;
use crate::slot::{ErrorHandle, ResumeTokHandle, Slot, StrHandle};
use crate::trace::TraceSink;
use crate::trap::{TrapKind, TrapReport, VmError};
use std::collections::HashMap;
use viper_abi::Registry;
use viper_il::{Function, Module, Type, Value};

/// Tags a `Slot::Ptr` as addressing the module-wide global arena rather
/// than the current frame's local one (spec §4.5 gives globals and
/// `Alloca` cells the same `Ptr` type; this workspace needs one more bit
/// than the spec's field list to tell the two memory spaces apart at
/// `Load`/`Store` time).
const GLOBAL_PTR_TAG: u64 = 1 << 63;

pub(crate) fn tag_global(offset: u64) -> u64 {
    offset | GLOBAL_PTR_TAG
}

pub(crate) fn is_global_ptr(p: u64) -> bool {
    p & GLOBAL_PTR_TAG != 0
}

pub(crate) fn untag(p: u64) -> u64 {
    p & !GLOBAL_PTR_TAG
}

/// Tags a `Slot::Ptr` as addressing a function, for `gaddr @f` /
/// `call_indirect` (spec §4.4 "Calls": `CallIndirect %fn(args)`). Disjoint
/// from [`GLOBAL_PTR_TAG`] so the two address spaces never collide.
const FUNC_PTR_TAG: u64 = 1 << 62;

pub(crate) fn tag_function(index: u64) -> u64 {
    index | FUNC_PTR_TAG
}

pub(crate) fn is_function_ptr(p: u64) -> bool {
    p & FUNC_PTR_TAG != 0
}

pub(crate) fn type_width(ty: Type) -> usize {
    match ty {
        Type::Void | Type::Error | Type::ResumeTok => 0,
        Type::I1 => 1,
        Type::I16 => 2,
        Type::I32 => 4,
        Type::I64 => 8,
        Type::F64 => 8,
        Type::Ptr => 8,
        Type::Str => 4,
    }
}

/// Propagated across frame boundaries (spec §4.6 step 2's "pop the frame,
/// propagate to the caller's `eh_stack`") while still carrying the
/// function/block/message of the site where the trap first originated,
/// for the `TrapReport` eventually surfaced by `run()`.
pub(crate) struct TrapCarrier {
    pub error: VmError,
    pub function: String,
    pub block: String,
    pub message: String,
}

pub struct Interpreter<'m> {
    pub(crate) module: &'m Module,
    pub(crate) registry: &'m Registry,
    pub(crate) bridge: Box<dyn HostBridge>,
    pub(crate) config: VmConfig,
    pub(crate) trace: TraceSink,
    pub(crate) debug: Option<DebugController>,
    pub(crate) poll_callback: Option<Box<dyn FnMut() -> bool>>,
    pub(crate) instructions_executed: u64,
    string_table: Vec<String>,
    string_lookup: HashMap<String, u32>,
    globals_arena: Vec<u8>,
    global_offsets: HashMap<String, u64>,
    function_index: HashMap<String, u32>,
}

impl<'m> Interpreter<'m> {
    pub fn new(module: &'m Module, registry: &'m Registry, bridge: Box<dyn HostBridge>, config: VmConfig) -> Self {
        let mut string_table = Vec::new();
        let mut string_lookup: HashMap<String, u32> = HashMap::new();
        let mut globals_arena = Vec::new();
        let mut global_offsets = HashMap::new();

        for g in &module.globals {
            let offset = globals_arena.len() as u64;
            global_offsets.insert(g.name.clone(), offset);
            let width = type_width(g.ty).max(8);
            let bytes = match &g.init {
                Some(Value::ConstInt(n, _)) => n.to_le_bytes().to_vec(),
                Some(Value::ConstFloat(f)) => f.to_le_bytes().to_vec(),
                Some(Value::ConstStr(s)) => {
                    let id = string_lookup.get(s.as_str()).copied().unwrap_or_else(|| {
                        let id = string_table.len() as u32;
                        string_table.push(s.clone());
                        string_lookup.insert(s.clone(), id);
                        id
                    });
                    (id as i64).to_le_bytes().to_vec()
                }
                _ => 0i64.to_le_bytes().to_vec(),
            };
            globals_arena.resize(globals_arena.len() + width, 0);
            let start = offset as usize;
            globals_arena[start..start + bytes.len().min(width)]
                .copy_from_slice(&bytes[..bytes.len().min(width)]);
        }

        let trace = TraceSink::new(config.trace);
        let debug = config.debug_enabled.then(DebugController::new);

        let function_index = module
            .functions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i as u32))
            .collect();

        Interpreter {
            module,
            registry,
            bridge,
            config,
            trace,
            debug,
            poll_callback: None,
            instructions_executed: 0,
            string_table,
            string_lookup,
            globals_arena,
            global_offsets,
            function_index,
        }
    }

    pub fn set_poll_callback(&mut self, callback: Box<dyn FnMut() -> bool>) {
        self.poll_callback = Some(callback);
    }

    pub fn debug_controller_mut(&mut self) -> Option<&mut DebugController> {
        self.debug.as_mut()
    }

    pub fn intern_str(&mut self, s: &str) -> StrHandle {
        if let Some(&id) = self.string_lookup.get(s) {
            return StrHandle(id);
        }
        let id = self.string_table.len() as u32;
        self.string_table.push(s.to_string());
        self.string_lookup.insert(s.to_string(), id);
        StrHandle(id)
    }

    pub fn resolve_str(&self, handle: StrHandle) -> &str {
        self.string_table
            .get(handle.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Resolves a `@name` operand to an addressable `Slot::Ptr` bit
    /// pattern: a function name tags its index (spec §4.4 `CallIndirect`),
    /// anything else falls back to the global arena offset.
    pub(crate) fn global_ptr(&self, name: &str) -> u64 {
        if let Some(&idx) = self.function_index.get(name) {
            return tag_function(idx as u64);
        }
        self.global_offsets.get(name).copied().map(tag_global).unwrap_or(0)
    }

    /// Inverse of [`Interpreter::global_ptr`]'s function branch, consulted
    /// by `call_indirect` to turn a `Slot::Ptr` back into a callee name.
    pub(crate) fn function_name_for_ptr(&self, ptr: u64) -> Option<&str> {
        if !is_function_ptr(ptr) {
            return None;
        }
        let idx = (ptr & !FUNC_PTR_TAG) as usize;
        self.module.functions.get(idx).map(|f| f.name.as_str())
    }

    pub(crate) fn read_global_bytes(&self, offset: u64, len: usize) -> Result<&[u8], TrapKind> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(TrapKind::Bounds)?;
        self.globals_arena.get(start..end).ok_or(TrapKind::Bounds)
    }

    pub(crate) fn write_global_bytes(&mut self, offset: u64, bytes: &[u8]) -> Result<(), TrapKind> {
        let start = offset as usize;
        let end = start.checked_add(bytes.len()).ok_or(TrapKind::Bounds)?;
        if end > self.globals_arena.len() {
            return Err(TrapKind::Bounds);
        }
        self.globals_arena[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Spec §3's shared "evaluate a `Value` in the current frame" rule,
    /// consulted by every handler rather than re-implemented per opcode.
    pub(crate) fn eval(&mut self, frame: &Frame<'_>, v: &Value) -> Slot {
        match v {
            Value::Temp(id) => frame.get(*id),
            Value::ConstInt(n, is_bool) => {
                if *is_bool {
                    Slot::bool(*n != 0)
                } else {
                    Slot::I(*n)
                }
            }
            Value::ConstFloat(f) => Slot::F(*f),
            Value::ConstStr(s) => Slot::Str(self.intern_str(s)),
            Value::GlobalAddr(name) => Slot::Ptr(self.global_ptr(name)),
            Value::NullPtr => Slot::Ptr(0),
        }
    }

    /// Entry point (spec §6.5): "`run() -> Result<Slot, TrapReport>`...
    /// returns the value of the `Ret` instruction in `main`".
    pub fn run(&mut self) -> Result<Slot, TrapReport> {
        let main = self
            .module
            .function("main")
            .expect("module must declare @main to run");
        self.execute_function(main, Vec::new()).map_err(|carrier| TrapReport {
            kind: carrier.error.kind,
            message: carrier.message,
            function: carrier.function,
            block: carrier.block,
            ip: carrier.error.ip,
            source_loc: None,
        })
    }

    pub(crate) fn call_function(&mut self, name: &str, args: Vec<Slot>) -> Result<Slot, TrapCarrier> {
        let f = self
            .module
            .function(name)
            .unwrap_or_else(|| panic!("verified module: callee '{name}' exists"));
        self.execute_function(f, args)
    }

    pub(crate) fn call_extern(
        &mut self,
        name: &str,
        args: Vec<Slot>,
        loc: viper_il::Loc,
        function: &str,
        block: &str,
    ) -> Result<Slot, TrapCarrier> {
        crate::bridge::set_call_context(RuntimeCallContext {
            loc,
            function: function.to_string(),
            block: block.to_string(),
            descriptor_name: name.to_string(),
            args: args.clone(),
        });
        let result = self.bridge.call(name, &args);
        crate::bridge::clear_call_context();
        result.map_err(|BridgeError { kind, message }| TrapCarrier {
            error: VmError::new(kind, 0, 0, loc.line as i32),
            function: function.to_string(),
            block: block.to_string(),
            message,
        })
    }

    /// Spec §4.6 step 2: search the top-down `eh_stack`, bind `(Error,
    /// ResumeTok)` branch args and hand back the handler block to jump to,
    /// or `None` if no handler claims it (caller propagates).
    fn dispatch_trap(&self, frame: &mut Frame<'_>, error: VmError) -> Option<(String, Vec<Slot>)> {
        let ip = error.ip as usize;
        let handler = frame.eh_stack.last_mut()?;
        handler.ip_snapshot = ip;
        frame.active_error = Some(error);
        Some((
            handler.handler_block_label.clone(),
            vec![Slot::Error(ErrorHandle), Slot::ResumeTok(ResumeTokHandle)],
        ))
    }

    pub(crate) fn execute_function(&mut self, f: &'m Function, args: Vec<Slot>) -> Result<Slot, TrapCarrier> {
        let mut function = f;
        let mut frame = Frame::new(function, self.config.operand_stack_capacity);
        bind_params(&mut frame, function, &args);
        let mut block_label = function
            .entry_block()
            .map(|b| b.label.clone())
            .unwrap_or_default();
        let mut ip = 0usize;

        loop {
            self.instructions_executed += 1;
            if self.config.max_instruction_count != 0
                && self.instructions_executed > self.config.max_instruction_count
            {
                return Err(TrapCarrier {
                    error: VmError::new(TrapKind::InvalidOperation, 0, ip as u64, 0),
                    function: function.name.clone(),
                    block: block_label,
                    message: "instruction budget exhausted".to_string(),
                });
            }
            if self.config.poll.enabled
                && self.instructions_executed % self.config.poll.interval_instructions.max(1) == 0
            {
                let keep_going = self.poll_callback.as_mut().map(|cb| cb()).unwrap_or(true);
                if !keep_going {
                    return Err(TrapCarrier {
                        error: VmError::new(TrapKind::InvalidOperation, 0, ip as u64, 0),
                        function: function.name.clone(),
                        block: block_label,
                        message: "cancelled by host".to_string(),
                    });
                }
            }

            let block = function
                .block(&block_label)
                .unwrap_or_else(|| panic!("verified module: block '{block_label}' exists"));
            let instr = &block.instructions[ip];

            if let Some(debug) = self.debug.as_mut() {
                let source_loc = instr.loc.is_known().then(|| (instr.loc.file_id, instr.loc.line));
                let _ = debug.before_dispatch(&function.name, &block_label, source_loc);
            }
            self.trace
                .record_dispatch(&function.name, &block_label, ip, instr.opcode.mnemonic(), None, instr.loc);

            let strategy = self.config.dispatch_strategy;
            let outcome = dispatch::dispatch(self, &mut frame, instr, ip, strategy);

            match outcome {
                HandlerOutcome::Next => ip += 1,
                HandlerOutcome::Jump { label, args } => {
                    let target = function
                        .block(&label)
                        .unwrap_or_else(|| panic!("verified module: branch target '{label}' exists"));
                    for (param, value) in target.params.iter().zip(args.iter()) {
                        frame.set(param.id, *value);
                    }
                    block_label = label;
                    frame.current_block = block_label.clone();
                    ip = 0;
                }
                HandlerOutcome::ResumeAt { label, ip: target_ip } => {
                    let _ = function
                        .block(&label)
                        .unwrap_or_else(|| panic!("verified module: resume target '{label}' exists"));
                    block_label = label;
                    frame.current_block = block_label.clone();
                    ip = target_ip;
                }
                HandlerOutcome::Return(slot) => return Ok(slot),
                HandlerOutcome::TailCall { callee, args } => {
                    let callee_fn = self
                        .module
                        .function(&callee)
                        .unwrap_or_else(|| panic!("verified module: tail callee '{callee}' exists"));
                    function = callee_fn;
                    frame = Frame::new(function, self.config.operand_stack_capacity);
                    bind_params(&mut frame, function, &args);
                    block_label = function.entry_block().map(|b| b.label.clone()).unwrap_or_default();
                    frame.current_block = block_label.clone();
                    ip = 0;
                }
                HandlerOutcome::Trap { error, message, origin } => {
                    let (origin_fn, origin_block) =
                        origin.unwrap_or_else(|| (function.name.clone(), block_label.clone()));
                    match self.dispatch_trap(&mut frame, error) {
                        Some((label, args)) => {
                            let target = function
                                .block(&label)
                                .unwrap_or_else(|| panic!("verified module: handler block '{label}' exists"));
                            for (param, value) in target.params.iter().zip(args.iter()) {
                                frame.set(param.id, *value);
                            }
                            block_label = label;
                            frame.current_block = block_label.clone();
                            ip = 0;
                        }
                        None => {
                            return Err(TrapCarrier { error, function: origin_fn, block: origin_block, message })
                        }
                    }
                }
            }
        }
    }
}

fn bind_params(frame: &mut Frame<'_>, function: &Function, args: &[Slot]) {
    for (i, param) in function.params.iter().enumerate() {
        frame.set(param.id, args.get(i).copied().unwrap_or(Slot::Void));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::UnboundBridge;
    use viper_abi::Registry;
    use viper_io::parse_text;

    fn run_src(src: &str) -> Result<Slot, TrapReport> {
        let module = parse_text(src).unwrap();
        let registry = Registry::new();
        Interpreter::new(&module, &registry, Box::new(UnboundBridge), VmConfig::new())
            .run()
    }

    #[test]
    fn constant_addition_returns_the_sum() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = add 2, 3 : i64\nret %0\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(5));
    }

    #[test]
    fn branch_carries_a_value_into_a_block_parameter() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nbr next(7)\nnext(i64 %0):\nret %0\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(7));
    }

    #[test]
    fn division_by_zero_without_a_handler_surfaces_a_trap_report() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = sdiv.chk0 i64 10, 0 : i64\nret %0\n}\n";
        let err = run_src(src).unwrap_err();
        assert_eq!(err.kind, TrapKind::DivideByZero);
    }

    #[test]
    fn a_handler_block_catches_a_trap_and_returns_normally() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\neh.push H\n%0 = sdiv.chk0 i64 10, 0 : i64\neh.pop\nret %0\nH(error %1, resume_tok %2):\nret 99\n}\n";
        assert_eq!(run_src(src).unwrap().as_i64(), Some(99));
    }
}
