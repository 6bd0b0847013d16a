//! The uniform instruction record (spec §3.3, §9 "uniform record").
//!
//! Every opcode, regardless of shape, is represented by one `Instruction`
//! struct. Opcode-specific payloads (switch arms, branch arguments, call
//! attributes) live in the shared `labels`/`br_args`/`operands` arrays by
//! convention documented per-opcode in spec §4.4, rather than as per-opcode
//! enum variants — the reader, verifier, and VM dispatcher all index into
//! the same fields instead of matching on a payload shape unique to each
//! opcode.

use crate::loc::Loc;
use crate::opcode::Opcode;
use crate::types::Type;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CallAttrs {
    pub nothrow: bool,
    pub pure: bool,
    pub readonly: bool,
    /// Not in spec §3.3's field list verbatim but named by spec §4.5
    /// ("a `Call` marked tail"); carried here rather than as a separate
    /// opcode so `CallAttrs` is the single place call-site flags live.
    pub tail: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// `Some` iff this opcode's `result_arity` is `One`, or `Optional` and
    /// the call site captured a result (spec §3.3).
    pub result_id: Option<u32>,
    pub result_type: Type,
    pub operands: Vec<Value>,
    /// Branch target labels, in target order (`br_args[i]` pairs with
    /// `labels[i]`). For `switch`, `labels[0]` is the default target.
    pub labels: Vec<String>,
    /// One argument list per label, evaluated in the source frame before
    /// control transfers (spec §4.5, §5 "Ordering").
    pub br_args: Vec<Vec<Value>>,
    /// Callee name for `Call`; empty for every other opcode.
    pub callee: String,
    pub call_attrs: CallAttrs,
    pub loc: Loc,
}

impl Instruction {
    pub fn new(opcode: Opcode) -> Self {
        Instruction {
            opcode,
            result_id: None,
            result_type: Type::Void,
            operands: Vec::new(),
            labels: Vec::new(),
            br_args: Vec::new(),
            callee: String::new(),
            call_attrs: CallAttrs::default(),
            loc: Loc::UNKNOWN,
        }
    }

    pub fn with_result(mut self, id: u32, ty: Type) -> Self {
        self.result_id = Some(id);
        self.result_type = ty;
        self
    }

    pub fn with_operands(mut self, operands: Vec<Value>) -> Self {
        self.operands = operands;
        self
    }

    pub fn with_loc(mut self, loc: Loc) -> Self {
        self.loc = loc;
        self
    }

    pub fn is_terminator(&self) -> bool {
        self.opcode.is_terminator()
    }

    /// Switch arms as `(value, label, args)` triples, skipping the default
    /// target at index 0 (spec §4.1 switch grammar: "default: label(args)
    /// [, value: label(args)]*").
    pub fn switch_arms(&self) -> impl Iterator<Item = (i64, &str, &[Value])> {
        self.operands[1..]
            .iter()
            .zip(self.labels[1..].iter())
            .zip(self.br_args[1..].iter())
            .map(|((value, label), args)| {
                let v = match value {
                    Value::ConstInt(n, _) => *n,
                    _ => 0,
                };
                (v, label.as_str(), args.as_slice())
            })
    }

    pub fn default_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_result_and_operands() {
        let instr = Instruction::new(Opcode::Add)
            .with_result(3, Type::I64)
            .with_operands(vec![Value::Temp(1), Value::Temp(2)]);
        assert_eq!(instr.result_id, Some(3));
        assert_eq!(instr.result_type, Type::I64);
        assert_eq!(instr.operands.len(), 2);
        assert!(!instr.is_terminator());
    }

    #[test]
    fn ret_is_a_terminator() {
        let instr = Instruction::new(Opcode::Ret);
        assert!(instr.is_terminator());
    }
}
