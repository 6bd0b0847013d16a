//! The closed set of IL types (spec §3.1).
//!
//! `Error` and `ResumeTok` are opaque handle types produced only by specific
//! opcodes (spec §4.4): `Error` by `TrapErr`/`TrapFromErr`/EH dispatch,
//! `ResumeTok` by entry into a handler block.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    I1,
    I16,
    I32,
    I64,
    F64,
    Ptr,
    Str,
    Error,
    ResumeTok,
}

impl Type {
    /// Textual mnemonic (lowercase, spec §3.1).
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::I1 => "i1",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::Ptr => "ptr",
            Type::Str => "str",
            Type::Error => "error",
            Type::ResumeTok => "resume_tok",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Type> {
        Some(match s {
            "void" => Type::Void,
            "i1" => Type::I1,
            "i16" => Type::I16,
            "i32" => Type::I32,
            "i64" => Type::I64,
            "f64" => Type::F64,
            "ptr" => Type::Ptr,
            "str" => Type::Str,
            "error" => Type::Error,
            "resume_tok" => Type::ResumeTok,
            _ => return None,
        })
    }

    /// Integer types in ascending-width order, used by cast width-relation
    /// checks (spec §4.3: "casts enforce width relations").
    pub fn int_width(&self) -> Option<u32> {
        match self {
            Type::I1 => Some(1),
            Type::I16 => Some(16),
            Type::I32 => Some(32),
            Type::I64 => Some(64),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.int_width().is_some()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_round_trips() {
        for ty in [
            Type::Void,
            Type::I1,
            Type::I16,
            Type::I32,
            Type::I64,
            Type::F64,
            Type::Ptr,
            Type::Str,
            Type::Error,
            Type::ResumeTok,
        ] {
            assert_eq!(Type::from_mnemonic(ty.mnemonic()), Some(ty));
        }
    }

    #[test]
    fn widths_are_ascending() {
        assert!(Type::I1.int_width() < Type::I16.int_width());
        assert!(Type::I16.int_width() < Type::I32.int_width());
        assert!(Type::I32.int_width() < Type::I64.int_width());
    }
}
