//! Concrete passes exercising the [`crate::pass::Pass`] contract end to
//! end (spec §4.8, property P8).

pub mod nop;
pub mod prune_unreachable;
