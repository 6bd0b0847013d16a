//! Per-function activation record (spec §4.5 "Frame").

use crate::memory::CELL_WIDTH;
use crate::slot::Slot;
use crate::trap::{TrapKind, VmError};
use viper_il::Function;

/// Spec §4.6 "EH entry/exit": `eh.push L` installs this; `eh.pop` removes
/// the top-most one.
#[derive(Debug, Clone)]
pub struct HandlerRecord {
    pub handler_block_label: String,
    /// Block the `eh.push` guarded, so `resume.next` knows where to pick
    /// back up — `ip_snapshot` alone names an instruction index, not which
    /// block it's relative to.
    pub protected_block_label: String,
    pub ip_snapshot: usize,
}

/// What a `Resume*` opcode, executed inside a handler block, asked the
/// dispatch loop to do next (spec §4.6 "Resume variants").
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeRequest {
    Same,
    Next,
    Label(String),
}

/// Default per-frame arena size (spec §5 "Resources": "64 KiB per frame
/// (default)").
pub const DEFAULT_OPERAND_STACK_CAPACITY: usize = 64 * 1024;

pub struct Frame<'m> {
    pub function: &'m Function,
    pub registers: Vec<Slot>,
    /// Byte arena backing `Alloca`/`AddrOf` cells, addressed by
    /// frame-relative offset (spec §4.5: "`operand_stack: [u8]` with
    /// capacity 64 KiB (configurable) and `sp: usize`").
    pub operand_stack: Vec<u8>,
    pub sp: usize,
    pub capacity: usize,
    /// Staged branch arguments, written by the branching instruction's
    /// handler and drained when control actually enters the target block
    /// (spec §4.5: "stage branch arguments before entering the new
    /// block").
    pub block_params_pending: Vec<Slot>,
    pub eh_stack: Vec<HandlerRecord>,
    pub active_error: Option<VmError>,
    pub resume_request: Option<ResumeRequest>,
    /// Label of the block currently dispatching, kept in sync by the
    /// interpreter loop on every jump. `eh.push` captures it as the
    /// protected block; `calls::handle` reports it as part of the extern
    /// call context.
    pub current_block: String,
}

impl<'m> Frame<'m> {
    pub fn new(function: &'m Function, operand_stack_capacity: usize) -> Self {
        let register_count = function.max_ssa_id().map_or(0, |id| id as usize + 1);
        let current_block = function.entry_block().map(|b| b.label.clone()).unwrap_or_default();
        Frame {
            function,
            registers: vec![Slot::Void; register_count],
            operand_stack: vec![0u8; operand_stack_capacity],
            // Offset 0 is reserved so a frame-local `Ptr` can never collide
            // with a null pointer (`ConstNull`/`Value::NullPtr` both encode
            // as `Slot::Ptr(0)`, spec §4.5).
            sp: CELL_WIDTH,
            capacity: operand_stack_capacity,
            block_params_pending: Vec::new(),
            eh_stack: Vec::new(),
            active_error: None,
            resume_request: None,
            current_block,
        }
    }

    pub fn get(&self, id: u32) -> Slot {
        self.registers
            .get(id as usize)
            .copied()
            .unwrap_or(Slot::Void)
    }

    pub fn set(&mut self, id: u32, value: Slot) {
        if id as usize >= self.registers.len() {
            self.registers.resize(id as usize + 1, Slot::Void);
        }
        self.registers[id as usize] = value;
    }

    /// Bump-allocates `len` bytes from the frame's arena, returning the
    /// offset of the new cell. Traps with `Overflow` on exhaustion (spec
    /// §5 "Resources": "overflow traps with `Overflow` kind").
    pub fn alloca(&mut self, len: usize) -> Result<u64, TrapKind> {
        let end = self.sp.checked_add(len).ok_or(TrapKind::Overflow)?;
        if end > self.capacity {
            return Err(TrapKind::Overflow);
        }
        let offset = self.sp;
        self.sp = end;
        Ok(offset as u64)
    }

    pub fn write_bytes(&mut self, offset: u64, bytes: &[u8]) -> Result<(), TrapKind> {
        let start = offset as usize;
        let end = start.checked_add(bytes.len()).ok_or(TrapKind::Bounds)?;
        if end > self.operand_stack.len() {
            return Err(TrapKind::Bounds);
        }
        self.operand_stack[start..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn read_bytes(&self, offset: u64, len: usize) -> Result<&[u8], TrapKind> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(TrapKind::Bounds)?;
        if end > self.operand_stack.len() {
            return Err(TrapKind::Bounds);
        }
        Ok(&self.operand_stack[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_il::{BasicBlock, Function, Instruction, Linkage, Opcode, Type};

    fn sample_function() -> Function {
        let mut f = Function::new("main", Type::Void, Linkage::Export);
        let mut b = BasicBlock::new("entry");
        b.push(Instruction::new(Opcode::Ret).with_result(2, Type::I64));
        f.blocks.push(b);
        f
    }

    #[test]
    fn register_file_is_sized_from_max_ssa_id() {
        let f = sample_function();
        let frame = Frame::new(&f, DEFAULT_OPERAND_STACK_CAPACITY);
        assert_eq!(frame.registers.len(), 3);
    }

    #[test]
    fn alloca_reserves_offset_zero_for_null_then_bumps_sp() {
        let f = sample_function();
        let mut frame = Frame::new(&f, 24);
        assert_eq!(frame.alloca(8).unwrap(), 8);
        assert_eq!(frame.alloca(8).unwrap(), 16);
        assert_eq!(frame.alloca(1), Err(TrapKind::Overflow));
    }

    #[test]
    fn write_then_read_bytes_round_trips() {
        let f = sample_function();
        let mut frame = Frame::new(&f, 64);
        let off = frame.alloca(8).unwrap();
        frame.write_bytes(off, &42i64.to_le_bytes()).unwrap();
        let bytes = frame.read_bytes(off, 8).unwrap();
        assert_eq!(i64::from_le_bytes(bytes.try_into().unwrap()), 42);
    }
}
