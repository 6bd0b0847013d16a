//! Trace sink (spec §4.9): "a configurable output channel... each
//! instruction's dispatch emits a deterministic record." Emits through the
//! `tracing` crate, the way the teacher's `lsp` crate reports its own
//! diagnostics (`crates/lsp/src/diagnostics.rs`), rather than writing to a
//! bespoke log file.

use crate::config::TraceConfig;
use crate::slot::Slot;
use viper_il::Loc;

pub struct TraceSink {
    config: TraceConfig,
}

impl TraceSink {
    pub fn new(config: TraceConfig) -> Self {
        TraceSink { config }
    }

    pub fn enabled(&self) -> bool {
        self.config.il_trace || self.config.source_trace
    }

    /// `[func:block:ip] opcode operands → result` (spec §4.5 step 2).
    pub fn record_dispatch(
        &self,
        function: &str,
        block: &str,
        ip: usize,
        mnemonic: &str,
        result: Option<Slot>,
        loc: Loc,
    ) {
        if self.config.il_trace {
            match result {
                Some(r) => tracing::debug!(target: "viper_vm::trace", "[{function}:{block}:{ip}] {mnemonic} -> {r}"),
                None => tracing::debug!(target: "viper_vm::trace", "[{function}:{block}:{ip}] {mnemonic}"),
            }
        }
        if self.config.source_trace && loc != Loc::UNKNOWN {
            tracing::trace!(target: "viper_vm::trace", "  at {}:{}:{}", loc.file_id, loc.line, loc.col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let sink = TraceSink::new(TraceConfig::default());
        assert!(!sink.enabled());
    }

    #[test]
    fn il_trace_flag_enables_the_sink() {
        let sink = TraceSink::new(TraceConfig { il_trace: true, source_trace: false });
        assert!(sink.enabled());
    }
}
