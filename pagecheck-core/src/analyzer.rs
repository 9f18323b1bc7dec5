use crate::error::{AnalysisError, Result};
use crate::model::AnalysisResult;
use crate::report::AnalysisReport;
use crate::rules::evaluate_rules;
use crate::signals::{PageSignals, extract_title};
use crate::timing::{LoadTimeSource, SimulatedLoadTime};
use pagecheck_fetch::{FetchError, Fetcher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Checks that `input` is an absolute URL with a host.
pub fn validate_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::invalid(input, "URL is empty"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| AnalysisError::invalid(input, e.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(AnalysisError::invalid(input, "URL has no host")),
    }
}

/// Signals and issues for an already retrieved page.
pub fn analyze_html(html: &str, requested_url: &str, load_time_seconds: f64) -> AnalysisResult {
    let signals = PageSignals::derive(html, requested_url, load_time_seconds);
    debug!("Derived signals for {}: {:?}", requested_url, signals);

    AnalysisResult {
        metrics: signals.to_metrics(),
        issues: evaluate_rules(&signals),
    }
}

pub struct PageAnalyzer {
    fetcher: Arc<dyn Fetcher>,
    load_time: Arc<dyn LoadTimeSource>,
    timeout: Option<Duration>,
}

impl PageAnalyzer {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            load_time: Arc::new(SimulatedLoadTime),
            timeout: None,
        }
    }

    pub fn with_load_time_source(mut self, source: Arc<dyn LoadTimeSource>) -> Self {
        self.load_time = source;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult> {
        self.run_checks(url).await.map(|(_, result)| result)
    }

    /// Like [`analyze`](Self::analyze), wrapped with page metadata for display.
    pub async fn inspect(&self, url: &str) -> Result<AnalysisReport> {
        let (html, result) = self.run_checks(url).await?;
        Ok(AnalysisReport::new(url.trim(), extract_title(&html), result))
    }

    // Validate, retrieve and evaluate. Returns the body alongside the result.
    async fn run_checks(&self, url: &str) -> Result<(String, AnalysisResult)> {
        let target = validate_url(url)?;

        info!("Analyzing {}", target);
        let html = self.retrieve(&target).await?;
        if html.is_empty() {
            warn!("Empty response for {}", target);
            return Err(FetchError::EmptyBody.into());
        }

        let result = analyze_html(&html, url.trim(), self.load_time.sample());
        info!(
            "Analysis of {} complete: {} issue(s)",
            target,
            result.issues.len()
        );

        Ok((html, result))
    }

    async fn retrieve(&self, target: &Url) -> std::result::Result<String, FetchError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch_text(target))
                .await
                .map_err(|_| FetchError::Timeout(limit.as_secs()))?,
            None => self.fetcher.fetch_text(target).await,
        }
    }
}
