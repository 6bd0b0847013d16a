//! Source location metadata attached to IL instructions.
//!
//! A `Loc` is deliberately tiny: a file id plus a 1-indexed line/column.
//! File ids are opaque; the host maps them to real paths via whatever
//! source manager it keeps (spec §6.2). `Loc::UNKNOWN` (all zeros) is the
//! sentinel meaning "no location known" and is what a block starts with
//! before any `.loc` directive is seen.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Loc {
    pub file_id: u32,
    pub line: u32,
    pub col: u32,
}

impl Loc {
    pub const UNKNOWN: Loc = Loc {
        file_id: 0,
        line: 0,
        col: 0,
    };

    pub fn new(file_id: u32, line: u32, col: u32) -> Self {
        Loc { file_id, line, col }
    }

    pub fn is_known(&self) -> bool {
        *self != Loc::UNKNOWN
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "file{}:{}:{}", self.file_id, self.line, self.col)
        } else {
            write!(f, "<unknown>")
        }
    }
}
