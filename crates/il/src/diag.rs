//! Diagnostics shared by the reader, the verifier, and (via `viper-vm`) trap
//! reporting. One small hierarchy serves all three so a caller never has to
//! special-case "a parse error" vs. "a verify error" when just deciding
//! whether to keep going.

use crate::loc::Loc;
use std::fmt;

/// How serious a diagnostic is. `Error` aborts the phase that produced it
/// (spec §4.3: "structural errors abort"); anything lower is advisory and
/// is collected alongside a still-successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Hint,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Where a diagnostic is anchored. Parse errors anchor at a raw byte offset
/// in the source text (spec §7: "attached to source offset"); verification
/// errors anchor at `(function, block, instruction index)` (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Raw source offset, with best-effort line/col for display.
    Source { offset: usize, line: u32, col: u32 },
    /// A specific instruction within a function's block.
    Instr {
        function: String,
        block: String,
        index: usize,
    },
    /// A whole block (missing terminator, duplicate label, ...).
    Block { function: String, block: String },
    /// A whole function (missing entry block, bad linkage, ...).
    Function { function: String },
    /// Module-wide (duplicate top-level name, unresolved reference, ...).
    Module,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Source { offset, line, col } => {
                write!(f, "offset {offset} ({line}:{col})")
            }
            Anchor::Instr {
                function,
                block,
                index,
            } => write!(f, "{function}:{block}#{index}"),
            Anchor::Block { function, block } => write!(f, "{function}:{block}"),
            Anchor::Function { function } => write!(f, "{function}"),
            Anchor::Module => write!(f, "<module>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub anchor: Anchor,
    pub loc: Option<Loc>,
}

impl Diagnostic {
    pub fn error(anchor: Anchor, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            anchor,
            loc: None,
        }
    }

    pub fn warning(anchor: Anchor, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            anchor,
            loc: None,
        }
    }

    pub fn with_loc(mut self, loc: Loc) -> Self {
        self.loc = Some(loc);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loc {
            Some(loc) if loc.is_known() => {
                write!(
                    f,
                    "{}: at {} [{}] \u{2014} {}",
                    self.severity, self.anchor, loc, self.message
                )
            }
            _ => write!(f, "{}: at {} \u{2014} {}", self.severity, self.anchor, self.message),
        }
    }
}

/// A collected batch of diagnostics from one phase (parse or verify).
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    pub fn push(&mut self, d: Diagnostic) {
        self.0.push(d);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn advisories(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| !d.is_error())
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_error_above_warning() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Hint);
    }

    #[test]
    fn diagnostics_has_errors_only_when_an_error_is_present() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning(Anchor::Module, "unused extern"));
        assert!(!diags.has_errors());
        diags.push(Diagnostic::error(Anchor::Module, "duplicate name"));
        assert!(diags.has_errors());
        assert_eq!(diags.errors().count(), 1);
        assert_eq!(diags.advisories().count(), 1);
    }
}
