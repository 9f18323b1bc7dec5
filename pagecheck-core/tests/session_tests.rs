// Tests for the single-flight analysis session

use async_trait::async_trait;
use pagecheck_core::analyzer::PageAnalyzer;
use pagecheck_core::error::{AnalysisError, SessionError};
use pagecheck_core::session::AnalysisSession;
use pagecheck_core::timing::FixedLoadTime;
use pagecheck_fetch::{FetchError, Fetcher};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use url::Url;

/// Returns the next queued body, optionally waiting on a gate first.
struct ScriptedFetcher {
    bodies: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_text(&self, _url: &Url) -> Result<String, FetchError> {
        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        let mut bodies = self.bodies.lock().await;
        if bodies.is_empty() {
            Ok(String::new())
        } else {
            Ok(bodies.remove(0))
        }
    }
}

fn session_with(bodies: &[&str], gate: Option<Arc<Notify>>) -> AnalysisSession {
    let fetcher = ScriptedFetcher {
        bodies: Mutex::new(bodies.iter().map(|b| b.to_string()).collect()),
        gate,
    };
    AnalysisSession::new(
        PageAnalyzer::new(Arc::new(fetcher)).with_load_time_source(Arc::new(FixedLoadTime(1.0))),
    )
}

#[tokio::test]
async fn test_successful_run_fills_slot() {
    let session = session_with(&["<title>First</title><h1>x</h1>"], None);
    assert!(session.latest().is_none());

    let report = session.run("https://example.com").await.unwrap();

    assert_eq!(report.title.as_deref(), Some("First"));
    assert_eq!(session.latest(), Some(report));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_failure_keeps_previous_result() {
    // Second body is empty, which fails retrieval
    let session = session_with(&["<title>First</title>", ""], None);

    let first = session.run("https://example.com").await.unwrap();
    let second = session.run("https://example.com/other").await;

    assert!(matches!(
        second,
        Err(SessionError::Analysis(AnalysisError::RetrievalFailed(_)))
    ));
    assert_eq!(session.latest(), Some(first));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_success_replaces_previous_result() {
    let session = session_with(&["<title>First</title>", "<title>Second</title>"], None);

    session.run("https://example.com/a").await.unwrap();
    session.run("https://example.com/b").await.unwrap();

    let latest = session.latest().unwrap();
    assert_eq!(latest.url, "https://example.com/b");
    assert_eq!(latest.title.as_deref(), Some("Second"));
}

#[tokio::test]
async fn test_invalid_input_does_not_mark_busy() {
    let session = session_with(&["<title>First</title>"], None);

    let result = session.run("not a url").await;

    assert!(matches!(
        result,
        Err(SessionError::Analysis(AnalysisError::InvalidInput { .. }))
    ));
    assert!(!session.is_busy());
    assert!(session.latest().is_none());
}

#[tokio::test]
async fn test_overlapping_run_is_rejected() {
    let gate = Arc::new(Notify::new());
    let session = Arc::new(session_with(&["<title>Slow</title>"], Some(gate.clone())));

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.run("https://example.com").await })
    };

    // Wait until the first run has claimed the session
    while !session.is_busy() {
        tokio::task::yield_now().await;
    }

    let second = session.run("https://example.com/again").await;
    assert!(matches!(second, Err(SessionError::Busy)));

    gate.notify_one();
    let report = first.await.unwrap().unwrap();
    assert_eq!(report.title.as_deref(), Some("Slow"));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_cancelled_run_releases_session() {
    let gate = Arc::new(Notify::new());
    let session = Arc::new(session_with(&["<title>Later</title>"], Some(gate.clone())));

    let handle = {
        let session = session.clone();
        tokio::spawn(async move { session.run("https://example.com").await })
    };
    while !session.is_busy() {
        tokio::task::yield_now().await;
    }

    handle.abort();
    let _ = handle.await;

    assert!(!session.is_busy());
    assert!(session.latest().is_none());
}
