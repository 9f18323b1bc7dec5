use pagecheck_fetch::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid URL '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Failed to retrieve page: {0}")]
    RetrievalFailed(#[from] FetchError),
}

impl AnalysisError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("An analysis is already in progress")]
    Busy,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
