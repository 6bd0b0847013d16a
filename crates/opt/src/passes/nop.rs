//! The identity pass: proves the pass-manager contract holds even when a
//! pass does nothing (spec §4.8, property P8 "must produce a verified
//! module" — the trivial case of preserving observable behavior).

use crate::pass::{Pass, PreservedAnalyses};
use viper_il::Module;

pub struct NopPass;

impl Pass for NopPass {
    fn name(&self) -> &'static str {
        "nop"
    }

    fn preserves(&self) -> PreservedAnalyses {
        PreservedAnalyses::all()
    }

    fn run(&self, _module: &mut Module) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use viper_io::parse_text;

    #[test]
    fn nop_never_changes_the_module() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nret 0\n}\n";
        let mut module = parse_text(src).unwrap();
        let before = module.clone();
        NopPass.run(&mut module);
        assert_eq!(module, before);
    }
}
