use crate::analyzer::PageAnalyzer;
use crate::error::ConfigError;
use pagecheck_fetch::{
    DEFAULT_PROXY_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DirectFetcher, Fetcher,
    ProxyEnvelope, ProxyFetcher, build_client,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/pagecheck/";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Retrieval settings for the analyzer. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Route requests through `proxy_endpoint` instead of fetching directly
    pub use_proxy: bool,

    /// Relay URL prefix; the percent-encoded target is appended to it
    pub proxy_endpoint: String,

    /// Shape of the relay's response body
    pub proxy_envelope: ProxyEnvelope,

    /// Timeout in seconds for the whole retrieval
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            use_proxy: true,
            proxy_endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            proxy_envelope: ProxyEnvelope::Json,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub fn default_config_dir() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_DIR).as_ref())
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

impl AnalyzerConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AnalyzerConfig = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise the default location when it exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load_from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Rejects settings that would make every retrieval fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn build_fetcher(&self) -> Result<Arc<dyn Fetcher>, ConfigError> {
        self.validate()?;
        let client = build_client(&self.user_agent, self.timeout_secs)?;

        if self.use_proxy {
            let fetcher = ProxyFetcher::new(client)
                .with_endpoint(self.proxy_endpoint.clone())
                .with_envelope(self.proxy_envelope);
            debug!(
                "Fetching through {} ({:?} envelope)",
                fetcher.endpoint(),
                self.proxy_envelope
            );
            Ok(Arc::new(fetcher))
        } else {
            debug!("Fetching pages directly");
            Ok(Arc::new(DirectFetcher::new(client)))
        }
    }

    pub fn build_analyzer(&self) -> Result<PageAnalyzer, ConfigError> {
        Ok(PageAnalyzer::new(self.build_fetcher()?)
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}
