//! Trap kinds, the structured `VmError`, and the trap report surfaced by
//! `run()` (spec §4.6, §6.5, §7 "Runtime traps").

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapKind {
    DivideByZero,
    Overflow,
    InvalidCast,
    DomainError,
    Bounds,
    FileNotFound,
    Eof,
    IoError,
    InvalidOperation,
    RuntimeError,
}

impl fmt::Display for TrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrapKind::DivideByZero => "DivideByZero",
            TrapKind::Overflow => "Overflow",
            TrapKind::InvalidCast => "InvalidCast",
            TrapKind::DomainError => "DomainError",
            TrapKind::Bounds => "Bounds",
            TrapKind::FileNotFound => "FileNotFound",
            TrapKind::Eof => "EOF",
            TrapKind::IoError => "IOError",
            TrapKind::InvalidOperation => "InvalidOperation",
            TrapKind::RuntimeError => "RuntimeError",
        };
        f.write_str(s)
    }
}

/// Spec §4.6: "`{kind: TrapKind, code: i32, ip: u64, line: i32}`".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VmError {
    pub kind: TrapKind,
    pub code: i32,
    pub ip: u64,
    pub line: i32,
}

impl VmError {
    pub fn new(kind: TrapKind, code: i32, ip: u64, line: i32) -> Self {
        VmError { kind, code, ip, line }
    }
}

/// Stable ordering consulted by `trap.kind <code>` (encode) and
/// `err.get_kind` (decode) so the two opcodes agree on what an integer
/// code means (spec §4.4 "Control" / "Exception" groups give `TrapKind` no
/// canonical numbering of its own).
pub const TRAP_KIND_ORDER: [TrapKind; 10] = [
    TrapKind::DivideByZero,
    TrapKind::Overflow,
    TrapKind::InvalidCast,
    TrapKind::DomainError,
    TrapKind::Bounds,
    TrapKind::FileNotFound,
    TrapKind::Eof,
    TrapKind::IoError,
    TrapKind::InvalidOperation,
    TrapKind::RuntimeError,
];

pub fn trap_kind_code(kind: TrapKind) -> i32 {
    TRAP_KIND_ORDER
        .iter()
        .position(|&k| k == kind)
        .map(|i| i as i32)
        .unwrap_or(-1)
}

/// Surfaced by `run()` when no handler claims a trap anywhere on the call
/// stack (spec §4.6 step 3, §6.5).
#[derive(Debug, Clone, PartialEq)]
pub struct TrapReport {
    pub kind: TrapKind,
    pub message: String,
    pub function: String,
    pub block: String,
    pub ip: u64,
    pub source_loc: Option<(u32, u32, u32)>,
}

impl fmt::Display for TrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ", self.function, self.block)?;
        if let Some((file, line, col)) = self.source_loc {
            write!(f, "({file}:{line}:{col}) ")?;
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TrapReport {}
