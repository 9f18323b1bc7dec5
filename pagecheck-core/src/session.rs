use crate::analyzer::PageAnalyzer;
use crate::error::SessionError;
use crate::report::AnalysisReport;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// One analyzer with a single result slot.
///
/// At most one analysis runs at a time; a second `run` while the first is in
/// flight fails with [`SessionError::Busy`] instead of queueing. The slot is
/// only replaced by a successful run.
pub struct AnalysisSession {
    analyzer: PageAnalyzer,
    busy: AtomicBool,
    latest: StdMutex<Option<AnalysisReport>>,
}

// Clears the busy flag on completion, failure or cancellation.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AnalysisSession {
    pub fn new(analyzer: PageAnalyzer) -> Self {
        Self {
            analyzer,
            busy: AtomicBool::new(false),
            latest: StdMutex::new(None),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn latest(&self) -> Option<AnalysisReport> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub async fn run(&self, url: &str) -> Result<AnalysisReport, SessionError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejecting analysis of {}: session busy", url);
            return Err(SessionError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let report = self.analyzer.inspect(url).await?;

        *self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(report.clone());

        Ok(report)
    }
}
