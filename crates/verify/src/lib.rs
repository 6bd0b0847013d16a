//! `viper-verify`: the structural/typing/control-flow/EH verifier (spec
//! §4.3).
//!
//! Checks are grouped exactly as spec §4.3 groups them — module-level,
//! block-level, instruction-level, exception-handling, SSA — each in its
//! own module, all writing into one shared [`viper_il::Diagnostics`] batch.
//! "Advisory-vs-hard" (spec §4.3) is `Severity::Error` vs. anything lower:
//! [`VerifyReport::ok`] is true as long as no `Error`-severity diagnostic
//! was produced, even if advisories were.

mod block;
mod eh;
mod function;
mod instr;
mod module;
mod ssa;

use viper_abi::Registry;
use viper_il::{Diagnostics, Module};

#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub diagnostics: Diagnostics,
}

impl VerifyReport {
    /// Spec §4.3 / P3: structural errors abort; a module with no
    /// `Error`-severity diagnostic is accepted even if advisories remain.
    pub fn ok(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Runs every check in spec §4.3 against `module`, cross-checking externs
/// against `registry` (spec §4.7). Never panics on a malformed module —
/// every check degrades to "diagnostic and move on" rather than assuming
/// invariants earlier checks would otherwise guarantee.
pub fn verify(module: &Module, registry: &Registry) -> VerifyReport {
    let mut diagnostics = Diagnostics::new();
    module::check(module, registry, &mut diagnostics);
    for function in &module.functions {
        function::check(module, function, &mut diagnostics);
        for block in &function.blocks {
            block::check(module, function, block, &mut diagnostics);
            for (index, instr) in block.instructions.iter().enumerate() {
                instr::check(module, function, block, index, instr, &mut diagnostics);
            }
        }
        eh::check(function, &mut diagnostics);
        ssa::check(function, &mut diagnostics);
    }
    VerifyReport { diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn hello_integer_module_verifies_cleanly() {
        let src = "il 0.2.0\nextern @Viper.Terminal.SayInt(i64) -> void\nfunc @main() -> void {\nentry:\ncall @Viper.Terminal.SayInt(42)\nret\n}\n";
        let m = parse_text(src).unwrap();
        let report = verify(&m, &viper_abi::catalog::default_registry());
        assert!(report.ok(), "{}", report.diagnostics);
    }

    #[test]
    fn a_block_without_a_terminator_is_rejected() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\n%0 = const.null\n}\n";
        let m = parse_text(src).unwrap();
        let report = verify(&m, &Registry::new());
        assert!(!report.ok());
    }
}
