//! Debug controller (spec §4.9): breakpoints by block label or by
//! source file+line, plus step-count requests, consulted before every
//! instruction dispatch.

use crate::frame::Frame;
use crate::slot::Slot;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Block { function: String, block: String },
    SourceLine { file_id: u32, line: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    Continue,
    Suspend,
}

/// Inspection view of the current frame, handed to a debug loop while
/// suspended (spec §4.9: "inspection of the current frame's registers and
/// operand stack").
pub struct FrameView<'a> {
    pub registers: &'a [Slot],
    pub operand_stack_used: usize,
}

impl<'a> FrameView<'a> {
    pub fn of(frame: &'a Frame<'_>) -> Self {
        FrameView { registers: &frame.registers, operand_stack_used: frame.sp }
    }
}

#[derive(Debug, Default)]
pub struct DebugController {
    breakpoints: HashSet<Breakpoint>,
    remaining_steps: Option<u64>,
}

impl DebugController {
    pub fn new() -> Self {
        DebugController::default()
    }

    pub fn add_breakpoint(&mut self, bp: Breakpoint) {
        self.breakpoints.insert(bp);
    }

    pub fn remove_breakpoint(&mut self, bp: &Breakpoint) {
        self.breakpoints.remove(bp);
    }

    /// `continue` (spec §4.9).
    pub fn resume(&mut self) {
        self.remaining_steps = None;
    }

    /// `step N` (spec §4.9).
    pub fn step(&mut self, n: u64) {
        self.remaining_steps = Some(n);
    }

    pub fn before_dispatch(
        &mut self,
        function: &str,
        block: &str,
        source_loc: Option<(u32, u32)>,
    ) -> DebugAction {
        if let Some(steps) = self.remaining_steps {
            if steps == 0 {
                return DebugAction::Suspend;
            }
            self.remaining_steps = Some(steps - 1);
            if steps == 1 {
                return DebugAction::Suspend;
            }
        }
        let hits_block_bp = self.breakpoints.contains(&Breakpoint::Block {
            function: function.to_string(),
            block: block.to_string(),
        });
        let hits_line_bp = source_loc.is_some_and(|(file_id, line)| {
            self.breakpoints.contains(&Breakpoint::SourceLine { file_id, line })
        });
        if hits_block_bp || hits_line_bp {
            DebugAction::Suspend
        } else {
            DebugAction::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_block_breakpoint_suspends_on_entry_to_that_block() {
        let mut ctrl = DebugController::new();
        ctrl.add_breakpoint(Breakpoint::Block { function: "main".into(), block: "loop".into() });
        assert_eq!(ctrl.before_dispatch("main", "entry", None), DebugAction::Continue);
        assert_eq!(ctrl.before_dispatch("main", "loop", None), DebugAction::Suspend);
    }

    #[test]
    fn step_n_suspends_after_n_instructions() {
        let mut ctrl = DebugController::new();
        ctrl.step(2);
        assert_eq!(ctrl.before_dispatch("main", "entry", None), DebugAction::Continue);
        assert_eq!(ctrl.before_dispatch("main", "entry", None), DebugAction::Suspend);
    }

    #[test]
    fn resume_clears_a_pending_step_count() {
        let mut ctrl = DebugController::new();
        ctrl.step(1);
        ctrl.resume();
        assert_eq!(ctrl.before_dispatch("main", "entry", None), DebugAction::Continue);
    }
}
