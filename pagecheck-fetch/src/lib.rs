pub mod error;
pub mod fetcher;

pub use error::FetchError;
pub use fetcher::{
    DEFAULT_PROXY_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DirectFetcher, Fetcher,
    ProxyEnvelope, ProxyFetcher, StaticFetcher, build_client,
};
