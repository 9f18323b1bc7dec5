// Tests for analyzer configuration

use pagecheck_core::config::{AnalyzerConfig, CONFIG_FILE_NAME, default_config_path};
use pagecheck_core::error::ConfigError;
use pagecheck_fetch::{DEFAULT_PROXY_ENDPOINT, ProxyEnvelope};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_config() {
    let config = AnalyzerConfig::default();

    assert!(config.use_proxy);
    assert_eq!(config.proxy_endpoint, DEFAULT_PROXY_ENDPOINT);
    assert_eq!(config.proxy_envelope, ProxyEnvelope::Json);
    assert_eq!(config.timeout_secs, 30);
    assert!(config.user_agent.starts_with("pagecheck/"));
}

#[test]
fn test_default_config_path() {
    let path = default_config_path();
    assert!(path.ends_with(format!("pagecheck/{}", CONFIG_FILE_NAME)));
}

#[test]
fn test_toml_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let config = AnalyzerConfig {
        use_proxy: false,
        proxy_endpoint: "https://relay.example/raw?url=".to_string(),
        proxy_envelope: ProxyEnvelope::Raw,
        timeout_secs: 7,
        user_agent: "custom/1.0".to_string(),
    };

    let dir = TempDir::new()?;
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, config.to_toml_string()?)?;

    let loaded = AnalyzerConfig::load_from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_partial_file_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "timeout_secs = 5")?;
    writeln!(file, "proxy_envelope = \"raw\"")?;

    let config = AnalyzerConfig::load_from_file(file.path())?;

    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.proxy_envelope, ProxyEnvelope::Raw);
    assert!(config.use_proxy);
    assert_eq!(config.proxy_endpoint, DEFAULT_PROXY_ENDPOINT);
    Ok(())
}

#[test]
fn test_invalid_file_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "timeout_secs = \"soon\"")?;

    let result = AnalyzerConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
    Ok(())
}

#[test]
fn test_missing_explicit_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = AnalyzerConfig::load_or_default(Some(&path));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_build_analyzer_from_config() {
    let direct = AnalyzerConfig {
        use_proxy: false,
        ..AnalyzerConfig::default()
    };
    assert!(direct.build_analyzer().is_ok());
    assert!(AnalyzerConfig::default().build_fetcher().is_ok());
}

#[test]
fn test_zero_timeout_in_file_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "timeout_secs = 0")?;

    let result = AnalyzerConfig::load_from_file(file.path());
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "timeout_secs",
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_zero_timeout_cannot_build_analyzer() {
    let config = AnalyzerConfig {
        use_proxy: false,
        timeout_secs: 0,
        ..AnalyzerConfig::default()
    };

    assert!(config.validate().is_err());
    assert!(matches!(
        config.build_analyzer(),
        Err(ConfigError::Invalid { .. })
    ));
    assert!(matches!(
        config.build_fetcher(),
        Err(ConfigError::Invalid { .. })
    ));

    let one_second = AnalyzerConfig {
        timeout_secs: 1,
        ..config
    };
    assert!(one_second.validate().is_ok());
}
