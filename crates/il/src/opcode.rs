//! The closed opcode catalogue (spec §4.4) and its metadata table.
//!
//! Per the design note in spec §9 ("Opcode metadata: a single
//! source-of-truth table"), the reader, the verifier, and the VM dispatcher
//! all consume [`OpcodeInfo`] instead of re-stating an opcode's arity or
//! result shape. Opcodes whose shape genuinely varies per use (`Call`,
//! `CallIndirect`, `SwitchI32`, `Br`, `CBr`) carry `Variadic`/`Dynamic`
//! markers here; the variable part (branch targets, call arguments) is
//! carried by `Instruction::labels`/`br_args`/`operands` and validated by
//! dedicated verifier checks, not by this table.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Integer arithmetic (wrap)
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,

    // Checked integer
    IAddOvf,
    ISubOvf,
    IMulOvf,
    SDivChk0,
    UDivChk0,
    SRemChk0,
    URemChk0,
    IdxChk,

    // Integer compare
    ICmpEq,
    ICmpNe,
    SCmpLt,
    SCmpLe,
    SCmpGt,
    SCmpGe,
    UCmpLt,
    UCmpLe,
    UCmpGt,
    UCmpGe,

    // Float arithmetic
    FAdd,
    FSub,
    FMul,
    FDiv,

    // Float compare
    FCmpEq,
    FCmpNe,
    FCmpLt,
    FCmpLe,
    FCmpGt,
    FCmpGe,
    FCmpOrd,
    FCmpUno,

    // Casts
    Sitofp,
    Fptosi,
    CastSiToFp,
    CastUiToFp,
    CastFpToSiRteChk,
    CastFpToUiRteChk,
    CastSiNarrowChk,
    CastUiNarrowChk,
    Trunc1,
    Zext1,

    // Constants
    ConstF64,
    ConstStr,
    ConstNull,
    GAddr,

    // Memory
    Alloca,
    Load,
    Store,
    Gep,
    AddrOf,

    // Control
    Br,
    CBr,
    SwitchI32,
    Ret,
    Trap,
    TrapKind,
    TrapErr,
    TrapFromErr,

    // Calls
    Call,
    CallIndirect,

    // Exception handling
    EhPush,
    EhPop,
    EhEntry,
    ResumeSame,
    ResumeNext,
    ResumeLabel,
    ErrGetKind,
    ErrGetCode,
    ErrGetIp,
    ErrGetLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandCategory {
    Any,
    I1,
    I16,
    I32,
    I64,
    F64,
    Ptr,
    Str,
    Error,
    ResumeTok,
    /// Category is whatever type the verifier infers dynamically (e.g. a
    /// `Load`'s result type, which is carried on the instruction itself).
    Dynamic,
    /// Category equals the instruction's declared `result_type`.
    InstrType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultArity {
    None,
    One,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryEffect {
    None,
    Reads,
    Writes,
    ReadsWrites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successors {
    /// Falls through to the next instruction; not a terminator.
    Fallthrough,
    /// Terminates the block with exactly this many successor labels,
    /// taken from `Instruction::labels` in order.
    Fixed(usize),
    /// Terminates the block; successor count is `1 + switch arm count`.
    Variable,
    /// Terminates the block with no successors (`ret`, uncaught `trap`).
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Arithmetic,
    Comparison,
    Conversion,
    Constant,
    Memory,
    Control,
    Call,
    Exception,
}

#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub min_operands: usize,
    pub max_operands: usize,
    pub operand_categories: &'static [OperandCategory],
    pub result_arity: ResultArity,
    pub result_category: OperandCategory,
    pub successors: Successors,
    pub memory_effect: MemoryEffect,
    pub dispatch_kind: DispatchKind,
}

macro_rules! binop_info {
    ($mnemonic:expr, $cat:expr, $kind:expr) => {
        OpcodeInfo {
            mnemonic: $mnemonic,
            min_operands: 2,
            max_operands: 2,
            operand_categories: &[$cat, $cat],
            result_arity: ResultArity::One,
            result_category: OperandCategory::InstrType,
            successors: Successors::Fallthrough,
            memory_effect: MemoryEffect::None,
            dispatch_kind: $kind,
        }
    };
}

macro_rules! cmp_info {
    ($mnemonic:expr, $cat:expr) => {
        OpcodeInfo {
            mnemonic: $mnemonic,
            min_operands: 2,
            max_operands: 2,
            operand_categories: &[$cat, $cat],
            result_arity: ResultArity::One,
            result_category: OperandCategory::I1,
            successors: Successors::Fallthrough,
            memory_effect: MemoryEffect::None,
            dispatch_kind: DispatchKind::Comparison,
        }
    };
}

macro_rules! cast_info {
    ($mnemonic:expr, $operand:expr, $result:expr) => {
        OpcodeInfo {
            mnemonic: $mnemonic,
            min_operands: 1,
            max_operands: 1,
            operand_categories: &[$operand],
            result_arity: ResultArity::One,
            result_category: $result,
            successors: Successors::Fallthrough,
            memory_effect: MemoryEffect::None,
            dispatch_kind: DispatchKind::Conversion,
        }
    };
}

impl Opcode {
    pub fn info(self) -> OpcodeInfo {
        use DispatchKind::*;
        use MemoryEffect as Mem;
        use OperandCategory::*;
        use Successors as Succ;
        match self {
            Opcode::Add => binop_info!("add", Dynamic, Arithmetic),
            Opcode::Sub => binop_info!("sub", Dynamic, Arithmetic),
            Opcode::Mul => binop_info!("mul", Dynamic, Arithmetic),
            Opcode::SDiv => binop_info!("sdiv", Dynamic, Arithmetic),
            Opcode::UDiv => binop_info!("udiv", Dynamic, Arithmetic),
            Opcode::SRem => binop_info!("srem", Dynamic, Arithmetic),
            Opcode::URem => binop_info!("urem", Dynamic, Arithmetic),
            Opcode::And => binop_info!("and", Dynamic, Arithmetic),
            Opcode::Or => binop_info!("or", Dynamic, Arithmetic),
            Opcode::Xor => binop_info!("xor", Dynamic, Arithmetic),
            Opcode::Shl => binop_info!("shl", Dynamic, Arithmetic),
            Opcode::LShr => binop_info!("lshr", Dynamic, Arithmetic),
            Opcode::AShr => binop_info!("ashr", Dynamic, Arithmetic),

            Opcode::IAddOvf => binop_info!("iaddovf", Dynamic, Arithmetic),
            Opcode::ISubOvf => binop_info!("isubovf", Dynamic, Arithmetic),
            Opcode::IMulOvf => binop_info!("imulovf", Dynamic, Arithmetic),
            Opcode::SDivChk0 => binop_info!("sdiv.chk0", Dynamic, Arithmetic),
            Opcode::UDivChk0 => binop_info!("udiv.chk0", Dynamic, Arithmetic),
            Opcode::SRemChk0 => binop_info!("srem.chk0", Dynamic, Arithmetic),
            Opcode::URemChk0 => binop_info!("urem.chk0", Dynamic, Arithmetic),
            Opcode::IdxChk => OpcodeInfo {
                mnemonic: "idx.chk",
                min_operands: 2,
                max_operands: 2,
                operand_categories: &[Dynamic, I64],
                result_arity: ResultArity::One,
                result_category: InstrType,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Arithmetic,
            },

            Opcode::ICmpEq => cmp_info!("icmp.eq", Dynamic),
            Opcode::ICmpNe => cmp_info!("icmp.ne", Dynamic),
            Opcode::SCmpLt => cmp_info!("scmp.lt", Dynamic),
            Opcode::SCmpLe => cmp_info!("scmp.le", Dynamic),
            Opcode::SCmpGt => cmp_info!("scmp.gt", Dynamic),
            Opcode::SCmpGe => cmp_info!("scmp.ge", Dynamic),
            Opcode::UCmpLt => cmp_info!("ucmp.lt", Dynamic),
            Opcode::UCmpLe => cmp_info!("ucmp.le", Dynamic),
            Opcode::UCmpGt => cmp_info!("ucmp.gt", Dynamic),
            Opcode::UCmpGe => cmp_info!("ucmp.ge", Dynamic),

            Opcode::FAdd => binop_info!("fadd", F64, Arithmetic),
            Opcode::FSub => binop_info!("fsub", F64, Arithmetic),
            Opcode::FMul => binop_info!("fmul", F64, Arithmetic),
            Opcode::FDiv => binop_info!("fdiv", F64, Arithmetic),

            Opcode::FCmpEq => cmp_info!("fcmp.eq", F64),
            Opcode::FCmpNe => cmp_info!("fcmp.ne", F64),
            Opcode::FCmpLt => cmp_info!("fcmp.lt", F64),
            Opcode::FCmpLe => cmp_info!("fcmp.le", F64),
            Opcode::FCmpGt => cmp_info!("fcmp.gt", F64),
            Opcode::FCmpGe => cmp_info!("fcmp.ge", F64),
            Opcode::FCmpOrd => cmp_info!("fcmp.ord", F64),
            Opcode::FCmpUno => cmp_info!("fcmp.uno", F64),

            Opcode::Sitofp => cast_info!("sitofp", I64, F64),
            Opcode::Fptosi => cast_info!("fptosi", F64, I64),
            Opcode::CastSiToFp => cast_info!("cast.si_to_fp", Dynamic, F64),
            Opcode::CastUiToFp => cast_info!("cast.ui_to_fp", Dynamic, F64),
            Opcode::CastFpToSiRteChk => cast_info!("cast.fp_to_si.rte.chk", F64, Dynamic),
            Opcode::CastFpToUiRteChk => cast_info!("cast.fp_to_ui.rte.chk", F64, Dynamic),
            Opcode::CastSiNarrowChk => cast_info!("cast.si_narrow.chk", Dynamic, Dynamic),
            Opcode::CastUiNarrowChk => cast_info!("cast.ui_narrow.chk", Dynamic, Dynamic),
            Opcode::Trunc1 => cast_info!("trunc1", Dynamic, I1),
            Opcode::Zext1 => cast_info!("zext1", I1, Dynamic),

            Opcode::ConstF64 => OpcodeInfo {
                mnemonic: "const.f64",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Any],
                result_arity: ResultArity::One,
                result_category: F64,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::ConstStr => OpcodeInfo {
                mnemonic: "const.str",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Any],
                result_arity: ResultArity::One,
                result_category: Str,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::ConstNull => OpcodeInfo {
                mnemonic: "const.null",
                min_operands: 0,
                max_operands: 0,
                operand_categories: &[],
                result_arity: ResultArity::One,
                result_category: Ptr,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::GAddr => OpcodeInfo {
                mnemonic: "gaddr",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Any],
                result_arity: ResultArity::One,
                result_category: Ptr,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },

            Opcode::Alloca => OpcodeInfo {
                mnemonic: "alloca",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[I64],
                result_arity: ResultArity::One,
                result_category: Ptr,
                successors: Succ::Fallthrough,
                memory_effect: Mem::Writes,
                dispatch_kind: Memory,
            },
            Opcode::Load => OpcodeInfo {
                mnemonic: "load",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Ptr],
                result_arity: ResultArity::One,
                result_category: InstrType,
                successors: Succ::Fallthrough,
                memory_effect: Mem::Reads,
                dispatch_kind: Memory,
            },
            Opcode::Store => OpcodeInfo {
                mnemonic: "store",
                min_operands: 2,
                max_operands: 2,
                operand_categories: &[Ptr, Dynamic],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fallthrough,
                memory_effect: Mem::Writes,
                dispatch_kind: Memory,
            },
            Opcode::Gep => OpcodeInfo {
                mnemonic: "gep",
                min_operands: 2,
                max_operands: 2,
                operand_categories: &[Ptr, I64],
                result_arity: ResultArity::One,
                result_category: Ptr,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Memory,
            },
            Opcode::AddrOf => OpcodeInfo {
                mnemonic: "addr_of",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Ptr],
                result_arity: ResultArity::One,
                result_category: Ptr,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Memory,
            },

            Opcode::Br => OpcodeInfo {
                mnemonic: "br",
                min_operands: 0,
                max_operands: usize::MAX,
                operand_categories: &[],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fixed(1),
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::CBr => OpcodeInfo {
                mnemonic: "cbr",
                min_operands: 1,
                max_operands: usize::MAX,
                operand_categories: &[I1],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fixed(2),
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::SwitchI32 => OpcodeInfo {
                mnemonic: "switch",
                min_operands: 1,
                max_operands: usize::MAX,
                operand_categories: &[I32],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Variable,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::Ret => OpcodeInfo {
                mnemonic: "ret",
                min_operands: 0,
                max_operands: 1,
                operand_categories: &[Dynamic],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::Trap => OpcodeInfo {
                mnemonic: "trap",
                min_operands: 0,
                max_operands: 0,
                operand_categories: &[],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::TrapKind => OpcodeInfo {
                mnemonic: "trap.kind",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Any],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::TrapErr => OpcodeInfo {
                mnemonic: "trap.err",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Error],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },
            Opcode::TrapFromErr => OpcodeInfo {
                mnemonic: "trap.from_err",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Error],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Control,
            },

            Opcode::Call => OpcodeInfo {
                mnemonic: "call",
                min_operands: 0,
                max_operands: usize::MAX,
                operand_categories: &[],
                result_arity: ResultArity::Optional,
                result_category: InstrType,
                successors: Succ::Fallthrough,
                memory_effect: Mem::ReadsWrites,
                dispatch_kind: Call,
            },
            Opcode::CallIndirect => OpcodeInfo {
                mnemonic: "call_indirect",
                min_operands: 1,
                max_operands: usize::MAX,
                operand_categories: &[Ptr],
                result_arity: ResultArity::Optional,
                result_category: InstrType,
                successors: Succ::Fallthrough,
                memory_effect: Mem::ReadsWrites,
                dispatch_kind: Call,
            },

            Opcode::EhPush => OpcodeInfo {
                mnemonic: "eh.push",
                min_operands: 0,
                max_operands: 0,
                operand_categories: &[],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::EhPop => OpcodeInfo {
                mnemonic: "eh.pop",
                min_operands: 0,
                max_operands: 0,
                operand_categories: &[],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::EhEntry => OpcodeInfo {
                mnemonic: "eh.entry",
                min_operands: 0,
                max_operands: 0,
                operand_categories: &[],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ResumeSame => OpcodeInfo {
                mnemonic: "resume.same",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[ResumeTok],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ResumeNext => OpcodeInfo {
                mnemonic: "resume.next",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[ResumeTok],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::None,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ResumeLabel => OpcodeInfo {
                mnemonic: "resume.label",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[ResumeTok],
                result_arity: ResultArity::None,
                result_category: Any,
                successors: Succ::Fixed(1),
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ErrGetKind => OpcodeInfo {
                mnemonic: "err.get_kind",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Error],
                result_arity: ResultArity::One,
                result_category: I32,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ErrGetCode => OpcodeInfo {
                mnemonic: "err.get_code",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Error],
                result_arity: ResultArity::One,
                result_category: I32,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ErrGetIp => OpcodeInfo {
                mnemonic: "err.get_ip",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Error],
                result_arity: ResultArity::One,
                result_category: I64,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
            Opcode::ErrGetLine => OpcodeInfo {
                mnemonic: "err.get_line",
                min_operands: 1,
                max_operands: 1,
                operand_categories: &[Error],
                result_arity: ResultArity::One,
                result_category: I32,
                successors: Succ::Fallthrough,
                memory_effect: Mem::None,
                dispatch_kind: Exception,
            },
        }
    }

    pub fn mnemonic(self) -> &'static str {
        self.info().mnemonic
    }

    pub fn is_terminator(self) -> bool {
        !matches!(self.info().successors, Successors::Fallthrough)
    }

    pub fn from_mnemonic(s: &str) -> Option<Opcode> {
        ALL_OPCODES.iter().copied().find(|op| op.mnemonic() == s)
    }
}

pub const ALL_OPCODES: &[Opcode] = &[
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::SDiv,
    Opcode::UDiv,
    Opcode::SRem,
    Opcode::URem,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Shl,
    Opcode::LShr,
    Opcode::AShr,
    Opcode::IAddOvf,
    Opcode::ISubOvf,
    Opcode::IMulOvf,
    Opcode::SDivChk0,
    Opcode::UDivChk0,
    Opcode::SRemChk0,
    Opcode::URemChk0,
    Opcode::IdxChk,
    Opcode::ICmpEq,
    Opcode::ICmpNe,
    Opcode::SCmpLt,
    Opcode::SCmpLe,
    Opcode::SCmpGt,
    Opcode::SCmpGe,
    Opcode::UCmpLt,
    Opcode::UCmpLe,
    Opcode::UCmpGt,
    Opcode::UCmpGe,
    Opcode::FAdd,
    Opcode::FSub,
    Opcode::FMul,
    Opcode::FDiv,
    Opcode::FCmpEq,
    Opcode::FCmpNe,
    Opcode::FCmpLt,
    Opcode::FCmpLe,
    Opcode::FCmpGt,
    Opcode::FCmpGe,
    Opcode::FCmpOrd,
    Opcode::FCmpUno,
    Opcode::Sitofp,
    Opcode::Fptosi,
    Opcode::CastSiToFp,
    Opcode::CastUiToFp,
    Opcode::CastFpToSiRteChk,
    Opcode::CastFpToUiRteChk,
    Opcode::CastSiNarrowChk,
    Opcode::CastUiNarrowChk,
    Opcode::Trunc1,
    Opcode::Zext1,
    Opcode::ConstF64,
    Opcode::ConstStr,
    Opcode::ConstNull,
    Opcode::GAddr,
    Opcode::Alloca,
    Opcode::Load,
    Opcode::Store,
    Opcode::Gep,
    Opcode::AddrOf,
    Opcode::Br,
    Opcode::CBr,
    Opcode::SwitchI32,
    Opcode::Ret,
    Opcode::Trap,
    Opcode::TrapKind,
    Opcode::TrapErr,
    Opcode::TrapFromErr,
    Opcode::Call,
    Opcode::CallIndirect,
    Opcode::EhPush,
    Opcode::EhPop,
    Opcode::EhEntry,
    Opcode::ResumeSame,
    Opcode::ResumeNext,
    Opcode::ResumeLabel,
    Opcode::ErrGetKind,
    Opcode::ErrGetCode,
    Opcode::ErrGetIp,
    Opcode::ErrGetLine,
];

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_mnemonic_round_trips_through_from_mnemonic() {
        for &op in ALL_OPCODES {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op), "{op}");
        }
    }

    #[test]
    fn terminators_have_non_fallthrough_successors() {
        assert!(Opcode::Ret.is_terminator());
        assert!(Opcode::Br.is_terminator());
        assert!(Opcode::CBr.is_terminator());
        assert!(Opcode::SwitchI32.is_terminator());
        assert!(Opcode::Trap.is_terminator());
        assert!(Opcode::ResumeSame.is_terminator());
        assert!(!Opcode::Add.is_terminator());
        assert!(!Opcode::Call.is_terminator());
    }

    #[test]
    fn checked_division_is_arithmetic_dispatch() {
        assert_eq!(Opcode::SDivChk0.info().dispatch_kind, DispatchKind::Arithmetic);
    }
}
