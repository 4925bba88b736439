//! Unit tests for runtime configuration

use signalwatch::core::runtime::RuntimeConfig;

#[test]
fn test_runtime_config_default() {
    let config = RuntimeConfig::default();
    assert_eq!(config.evaluation_interval_seconds, 300);
    assert!(config.symbols.is_empty());
}
