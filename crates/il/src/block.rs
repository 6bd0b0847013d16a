//! Basic blocks (spec §3.4).

use crate::instr::Instruction;
use crate::param::Param;

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub label: String,
    pub params: Vec<Param>,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(label: impl Into<String>) -> Self {
        BasicBlock {
            label: label.into(),
            params: Vec::new(),
            instructions: Vec::new(),
        }
    }

    /// Spec §3.4: "the last instruction is a terminator iff `terminated` is
    /// true". Rather than a redundant stored flag that could drift from the
    /// instruction list, `terminated` is derived from the last instruction
    /// whenever it is observed.
    pub fn terminated(&self) -> bool {
        self.instructions
            .last()
            .is_some_and(Instruction::is_terminator)
    }

    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|i| i.is_terminator())
    }

    pub fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    #[test]
    fn empty_block_is_not_terminated() {
        let block = BasicBlock::new("entry");
        assert!(!block.terminated());
        assert!(block.terminator().is_none());
    }

    #[test]
    fn block_ending_in_ret_is_terminated() {
        let mut block = BasicBlock::new("entry");
        block.push(Instruction::new(Opcode::Ret));
        assert!(block.terminated());
        assert!(block.terminator().is_some());
    }
}
