//! Parse error type (spec §7: "Parse errors ... attached to source offset").
//!
//! Matches the teacher's `CodeGenError` shape (`codegen/error.rs`): a thin
//! newtype around the payload, `Display` forwarding, `std::error::Error`,
//! and a `From` impl so `?` works from the lower-level token/diagnostic
//! plumbing.

use viper_il::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub Diagnostic);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(d: Diagnostic) -> Self {
        ParseError(d)
    }
}
