use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// allorigins relay; the target URL is appended percent-encoded.
pub const DEFAULT_PROXY_ENDPOINT: &str = "https://api.allorigins.win/get?url=";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!(
    "pagecheck/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/trapdoorsec/pagecheck)"
);

/// Retrieves the body of a page as text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> Result<String>;
}

/// How the proxy wraps the page it relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyEnvelope {
    /// `{"contents": "<html>..."}`
    #[default]
    Json,
    /// The page body itself.
    Raw,
}

#[derive(Deserialize)]
struct JsonEnvelope {
    contents: Option<String>,
}

pub fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching {}", url);

    let response = client.get(url.as_str()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    debug!("Received {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Fetches pages through a relay that adds permissive CORS headers.
pub struct ProxyFetcher {
    client: Client,
    endpoint: String,
    envelope: ProxyEnvelope,
}

impl ProxyFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            envelope: ProxyEnvelope::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_envelope(mut self, envelope: ProxyEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The relay URL that retrieves `target`.
    pub fn proxied_url(&self, target: &Url) -> Result<Url> {
        let encoded: String =
            url::form_urlencoded::byte_serialize(target.as_str().as_bytes()).collect();
        let raw = format!("{}{}", self.endpoint, encoded);

        Url::parse(&raw)
            .map_err(|e| FetchError::InvalidProxyEndpoint(format!("{}: {}", self.endpoint, e)))
    }
}

#[async_trait]
impl Fetcher for ProxyFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let proxied = self.proxied_url(url)?;
        info!("Retrieving {} via proxy {}", url, self.endpoint);

        let body = get_text(&self.client, &proxied).await?;

        match self.envelope {
            ProxyEnvelope::Raw => Ok(body),
            ProxyEnvelope::Json => {
                let envelope: JsonEnvelope = serde_json::from_str(&body)?;
                Ok(envelope.contents.unwrap_or_default())
            }
        }
    }
}

/// Fetches pages straight from their origin.
pub struct DirectFetcher {
    client: Client,
}

impl DirectFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for DirectFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        info!("Retrieving {} directly", url);
        get_text(&self.client, url).await
    }
}

/// Serves the same body for every URL.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    body: String,
}

impl StaticFetcher {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)?;
        Ok(Self::new(body))
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        debug!("Serving static body for {}", url);
        Ok(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn test_client() -> Client {
        build_client(DEFAULT_USER_AGENT, 5).unwrap()
    }

    fn target() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_proxied_url_encodes_target() {
        let fetcher = ProxyFetcher::new(test_client());
        let proxied = fetcher
            .proxied_url(&Url::parse("https://example.com/a?b=c").unwrap())
            .unwrap();

        assert_eq!(
            proxied.as_str(),
            "https://api.allorigins.win/get?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn test_proxied_url_invalid_endpoint() {
        let fetcher = ProxyFetcher::new(test_client()).with_endpoint("not an endpoint ");
        let result = fetcher.proxied_url(&target());

        assert!(matches!(result, Err(FetchError::InvalidProxyEndpoint(_))));
    }

    #[tokio::test]
    async fn test_proxy_json_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("url", "https://example.com/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contents": "<html><h1>Hello</h1></html>",
                "status": { "http_code": 200 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = ProxyFetcher::new(test_client())
            .with_endpoint(format!("{}/get?url=", mock_server.uri()));

        let body = fetcher.fetch_text(&target()).await.unwrap();
        assert_eq!(body, "<html><h1>Hello</h1></html>");
    }

    #[tokio::test]
    async fn test_proxy_json_envelope_null_contents() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "contents": null })),
            )
            .mount(&mock_server)
            .await;

        let fetcher = ProxyFetcher::new(test_client())
            .with_endpoint(format!("{}/get?url=", mock_server.uri()));

        let body = fetcher.fetch_text(&target()).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_proxy_malformed_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = ProxyFetcher::new(test_client())
            .with_endpoint(format!("{}/get?url=", mock_server.uri()));

        let result = fetcher.fetch_text(&target()).await;
        assert!(matches!(result, Err(FetchError::Envelope(_))));
    }

    #[tokio::test]
    async fn test_proxy_raw_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw"))
            .and(query_param("url", "https://example.com/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><img src=a.png></html>"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = ProxyFetcher::new(test_client())
            .with_endpoint(format!("{}/raw?url=", mock_server.uri()))
            .with_envelope(ProxyEnvelope::Raw);

        let body = fetcher.fetch_text(&target()).await.unwrap();
        assert_eq!(body, "<html><img src=a.png></html>");
    }

    #[tokio::test]
    async fn test_proxy_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let fetcher = ProxyFetcher::new(test_client())
            .with_endpoint(format!("{}/get?url=", mock_server.uri()));

        match fetcher.fetch_text(&target()).await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 502),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_direct_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>Landing</body></html>"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = DirectFetcher::new(test_client());
        let url = Url::parse(&format!("{}/landing", mock_server.uri())).unwrap();

        let body = fetcher.fetch_text(&url).await.unwrap();
        assert!(body.contains("Landing"));
    }

    #[tokio::test]
    async fn test_direct_fetch_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = DirectFetcher::new(test_client());
        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();

        let result = fetcher.fetch_text(&url).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_static_fetcher_ignores_url() {
        let fetcher = StaticFetcher::new("<h1>static</h1>");

        let a = fetcher.fetch_text(&target()).await.unwrap();
        let b = fetcher
            .fetch_text(&Url::parse("http://other.test/x").unwrap())
            .await
            .unwrap();

        assert_eq!(a, "<h1>static</h1>");
        assert_eq!(a, b);
    }

    #[test]
    fn test_static_fetcher_missing_file() {
        let result = StaticFetcher::from_file(Path::new("/definitely/not/here.html"));
        assert!(matches!(result, Err(FetchError::Io(_))));
    }
}
