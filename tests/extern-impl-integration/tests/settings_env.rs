//! Environment variable overrides for crossbinder settings
//!
//! 环境变量是进程级状态，本文件只包含一个测试。
use anyhow::Result;
use crossbinder_composition::{CrossbinderSettings, ExternBootstrapper};
use std::io::Write;

#[test]
fn test_environment_overrides_settings_file() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    writeln!(file, "resolver:\n  cache_descriptors: true\nlogging:\n  level: info")?;

    std::env::set_var("CROSSBINDER__RESOLVER__CACHE_DESCRIPTORS", "false");
    std::env::set_var("CROSSBINDER__LOGGING__LEVEL", "debug");
    let loaded = CrossbinderSettings::from_file(file.path());
    let bootstrapper = ExternBootstrapper::from_config(None);
    std::env::remove_var("CROSSBINDER__RESOLVER__CACHE_DESCRIPTORS");
    std::env::remove_var("CROSSBINDER__LOGGING__LEVEL");

    let settings = loaded?;
    assert!(!settings.resolver.cache_descriptors);
    assert_eq!(settings.logging.level, "debug");
    assert!(settings.resolver.anonymous_includes_named);

    let bootstrapper = bootstrapper?;
    assert!(!bootstrapper.settings().resolver.cache_descriptors);
    Ok(())
}
