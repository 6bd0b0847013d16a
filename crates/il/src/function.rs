//! Functions (spec §3.5).

use crate::block::BasicBlock;
use crate::param::Param;
use crate::types::Type;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    Internal,
    Export,
    Import,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FnAttrs {
    pub nothrow: bool,
    pub pure: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub blocks: Vec<BasicBlock>,
    pub linkage: Linkage,
    pub attrs: FnAttrs,
    /// Diagnostic SSA names, for pretty-printing only — never consulted by
    /// the verifier or the VM (spec §3.5: "diagnostic SSA names").
    pub value_names: HashMap<u32, String>,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: Type, linkage: Linkage) -> Self {
        Function {
            name: name.into(),
            return_type,
            params: Vec::new(),
            blocks: Vec::new(),
            linkage,
            attrs: FnAttrs::default(),
            value_names: HashMap::new(),
        }
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn block(&self, label: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.label == label)
    }

    pub fn block_index(&self, label: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.label == label)
    }

    /// Highest SSA id defined anywhere in the function (a block param or an
    /// instruction `result_id`), used by the VM to size a frame's register
    /// file (spec §4.5: "sized by the function's max SSA id + 1").
    pub fn max_ssa_id(&self) -> Option<u32> {
        let mut max = None;
        for block in &self.blocks {
            for p in &block.params {
                max = Some(max.map_or(p.id, |m: u32| m.max(p.id)));
            }
            for instr in &block.instructions {
                if let Some(id) = instr.result_id {
                    max = Some(max.map_or(id, |m: u32| m.max(id)));
                }
            }
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_block_is_the_first_block() {
        let mut f = Function::new("main", Type::Void, Linkage::Export);
        f.blocks.push(BasicBlock::new("entry"));
        f.blocks.push(BasicBlock::new("next"));
        assert_eq!(f.entry_block().unwrap().label, "entry");
    }

    #[test]
    fn max_ssa_id_is_none_for_an_empty_function() {
        let f = Function::new("main", Type::Void, Linkage::Import);
        assert_eq!(f.max_ssa_id(), None);
    }
}
