//! The pass-manager contract (spec §4.8 "Optimizer shell", property P8).
//!
//! Spec §4.8: "A pass consumes a verified module and must produce a
//! verified module; it must not change any program's observable behavior
//! except as the pass's own documented transformation." This module is
//! the contract, not a particular pass — [`PassManager::run`] re-verifies
//! after every single pass rather than once at the end, so a misbehaving
//! pass is blamed immediately instead of laundered through whatever ran
//! after it.

use viper_abi::Registry;
use viper_il::Module;
use viper_verify::VerifyReport;

/// Which per-function analyses a pass leaves valid. A pass manager would
/// consult this to avoid recomputing [`crate::cfg::Cfg`] /
/// [`crate::dominators::Dominators`] / [`crate::liveness::Liveness`] after
/// a pass that provably didn't touch control flow or def/use edges; this
/// workspace always rebuilds them fresh for simplicity, but a pass still
/// declares its impact so a caller auditing the pipeline can tell which
/// passes are CFG-preserving without reading their bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreservedAnalyses {
    pub cfg: bool,
    pub dominators: bool,
    pub liveness: bool,
}

impl PreservedAnalyses {
    pub fn none() -> Self {
        PreservedAnalyses::default()
    }

    pub fn all() -> Self {
        PreservedAnalyses { cfg: true, dominators: true, liveness: true }
    }
}

/// A single optimizer pass, operating on the whole module (spec §4.8
/// distinguishes a module-wide pass from one scoped to a single function;
/// every concrete pass here happens to be module-wide, since even
/// [`crate::passes::prune_unreachable::PruneUnreachablePass`] just applies
/// its per-function rewrite to every function in turn).
pub trait Pass {
    fn name(&self) -> &'static str;

    fn preserves(&self) -> PreservedAnalyses {
        PreservedAnalyses::none()
    }

    /// Rewrites `module` in place. Must not leave it in a state the
    /// verifier would reject — [`PassManager::run`] treats that as this
    /// pass's bug, not the next pass's problem.
    fn run(&self, module: &mut Module);
}

#[derive(Debug)]
pub enum PassError {
    /// `run_on_module` left the module unverifiable; `pass` names which
    /// one, `report` is the verifier's diagnostics for the failing state.
    BrokeVerification { pass: &'static str, report: VerifyReport },
}

impl std::fmt::Display for PassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassError::BrokeVerification { pass, report } => {
                write!(f, "pass '{pass}' produced an unverifiable module: {}", report.diagnostics)
            }
        }
    }
}

impl std::error::Error for PassError {}

pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for PassManager {
    fn default() -> Self {
        PassManager::new()
    }
}

impl PassManager {
    pub fn new() -> Self {
        PassManager { passes: Vec::new() }
    }

    pub fn add(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Requires `module` to already be verified (spec §4.8: "consumes a
    /// verified module"); runs every pass in sequence, re-verifying after
    /// each one, and fails closed on the first pass that breaks
    /// verification rather than continuing with a broken module.
    pub fn run(&self, mut module: Module, registry: &Registry) -> Result<Module, PassError> {
        for pass in &self.passes {
            pass.run(&mut module);
            let report = viper_verify::verify(&module, registry);
            if !report.ok() {
                return Err(PassError::BrokeVerification { pass: pass.name(), report });
            }
        }
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::nop::NopPass;
    use viper_io::parse_text;

    #[test]
    fn an_empty_pipeline_returns_the_module_unchanged() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nret 0\n}\n";
        let module = parse_text(src).unwrap();
        let pm = PassManager::new();
        let out = pm.run(module.clone(), &Registry::new()).unwrap();
        assert_eq!(out, module);
    }

    #[test]
    fn the_nop_pass_leaves_the_module_verified() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\nret 0\n}\n";
        let module = parse_text(src).unwrap();
        let pm = PassManager::new().add(NopPass);
        assert!(pm.run(module, &Registry::new()).is_ok());
    }
}
