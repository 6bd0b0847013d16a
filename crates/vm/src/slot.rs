//! The runtime value cell (spec §4.5: "Slot... a tagged-or-untagged cell
//! large enough for i64, f64, raw pointer, or runtime string handle").
//!
//! The reference model allows an untagged cell because static typing
//! (enforced by the verifier) fixes each slot's interpretation at every use
//! site. This workspace still tags the cell, the way the teacher's own
//! `Value` enum (`crates/runtime/src/value.rs`) tags its stack cells rather
//! than reinterpreting raw bytes: a tag costs one discriminant word and
//! buys `as_*` accessors that fail loudly instead of reading garbage if a
//! handler and the verifier ever disagree.

use std::fmt;

/// An interned or runtime-allocated string, identified by a handle rather
/// than carried inline (spec §5 "Resources": "string handles... interned
/// once per VM lifetime... cached in a per-VM table").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrHandle(pub u32);

/// Produced by `TrapErr`/`TrapFromErr`/EH dispatch (spec §3.1 doc on
/// `Type::Error`); carries no payload itself, the payload lives in the
/// frame's `active_error`, this handle just proves one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorHandle;

/// Produced by entry into a handler block; consumed by exactly one
/// `Resume*` opcode (spec §4.6 "EH entry/exit").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResumeTokHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    I(i64),
    F(f64),
    Ptr(u64),
    Str(StrHandle),
    Error(ErrorHandle),
    ResumeTok(ResumeTokHandle),
    Void,
}

impl Slot {
    pub fn bool(b: bool) -> Slot {
        Slot::I(b as i64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Slot::I(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|n| n != 0)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Slot::F(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_ptr(&self) -> Option<u64> {
        match self {
            Slot::Ptr(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_str_handle(&self) -> Option<StrHandle> {
        match self {
            Slot::Str(h) => Some(*h),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::I(n) => write!(f, "{n}"),
            Slot::F(x) => write!(f, "{x}"),
            Slot::Ptr(p) => write!(f, "ptr:{p:#x}"),
            Slot::Str(h) => write!(f, "str#{}", h.0),
            Slot::Error(_) => write!(f, "<error>"),
            Slot::ResumeTok(_) => write!(f, "<resume_tok>"),
            Slot::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_slot_round_trips_through_as_bool() {
        assert_eq!(Slot::bool(true).as_bool(), Some(true));
        assert_eq!(Slot::bool(false).as_bool(), Some(false));
    }

    #[test]
    fn accessors_return_none_for_the_wrong_tag() {
        let s = Slot::F(1.5);
        assert_eq!(s.as_i64(), None);
        assert_eq!(s.as_ptr(), None);
    }
}
