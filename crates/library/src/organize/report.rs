use crate::organize::outcome::{Outcome, Status};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Receives exactly one [`Outcome`] per processed file.
///
/// Implementations are called from whichever lane processed the file, so
/// they must tolerate being called concurrently.
pub trait ReportSink: Send + Sync {
    fn report(&self, source: &Path, outcome: &Outcome);
}

/// Writes each outcome as a `tracing` event.
///
/// Skips are `debug`, successes `info` (plus one `warn` per warning), failures
/// `error` with the full error tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, source: &Path, outcome: &Outcome) {
        let source = source.display();
        match outcome {
            Outcome::Skipped { .. } => tracing::debug!(%source, "{outcome}"),
            Outcome::Succeeded(organized) => {
                tracing::info!(%source, "{outcome}");
                for warning in &organized.warnings {
                    tracing::warn!(%source, %warning, "Organized with a warning");
                }
            },
            Outcome::Failed(error) => tracing::error!(%source, ?error, "{outcome}"),
        }
    }
}

/// A recorded outcome line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub source: PathBuf,
    pub status: Status,
    pub path: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub line: String,
}

/// Keeps every outcome in memory, in the order reported.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Report>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ReportSink for MemorySink {
    fn report(&self, source: &Path, outcome: &Outcome) {
        let report = Report {
            source: source.to_path_buf(),
            status: outcome.status(),
            path: outcome.path().cloned(),
            warnings: outcome.warnings().iter().map(ToString::to_string).collect(),
            line: outcome.to_string(),
        };
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).push(report);
    }
}

// Shared sinks, so a caller can keep a handle to what it passed in.
impl<T: ReportSink + ?Sized> ReportSink for std::sync::Arc<T> {
    fn report(&self, source: &Path, outcome: &Outcome) {
        (**self).report(source, outcome);
    }
}
