//! The reporting handle passed to step handlers.
//!
//! A [`Reporter`] is how a handler signals its own pass or fail outcome. The
//! handle is cheap to clone and forwards every message to a [`ReportSink`],
//! which a test harness implements to feed its own reporting. The crate ships
//! [`RecordingSink`], an in-memory sink suited to tests and simple runners.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for messages emitted through a [`Reporter`].
#[cfg_attr(test, mockall::automock)]
pub trait ReportSink: Send + Sync {
    /// Records an informational message.
    fn log(&self, message: &str);

    /// Records a failure of the running step.
    fn fail(&self, message: &str);
}

/// In-memory sink that keeps every message it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    logs: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Returns the informational messages received so far.
    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the failure messages received so far.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for RecordingSink {
    fn log(&self, message: &str) {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }

    fn fail(&self, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }
}

struct ReporterState {
    name: String,
    sink: Arc<dyn ReportSink>,
    failed: AtomicBool,
}

/// Handle through which a step handler reports its outcome.
///
/// Clones share state: a failure recorded through one clone is visible
/// through every other clone of the same handle.
#[derive(Clone)]
pub struct Reporter {
    state: Arc<ReporterState>,
}

impl Reporter {
    /// Creates a handle for the named test, forwarding to `sink`.
    #[must_use]
    pub fn new(name: impl Into<String>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            state: Arc::new(ReporterState {
                name: name.into(),
                sink,
                failed: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a handle backed by a fresh [`RecordingSink`], returning both.
    #[must_use]
    pub fn recording(name: impl Into<String>) -> (Self, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let reporter = Self::new(name, Arc::clone(&sink) as Arc<dyn ReportSink>);
        (reporter, sink)
    }

    /// Creates the handle used before any test has bound one.
    #[must_use]
    pub fn detached() -> Self {
        Self::new("", Arc::new(RecordingSink::default()))
    }

    /// Returns the name of the test this handle reports for.
    ///
    /// A detached handle has an empty name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Returns `true` when this handle was not bound by a test invocation.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.state.name.is_empty()
    }

    /// Records an informational message.
    pub fn log(&self, message: impl AsRef<str>) {
        let text = message.as_ref();
        tracing::info!(test = self.name(), "{text}");
        self.state.sink.log(text);
    }

    /// Marks the test as failed and records `message`.
    pub fn fail(&self, message: impl AsRef<str>) {
        let text = message.as_ref();
        tracing::warn!(test = self.name(), "step failed: {text}");
        self.state.failed.store(true, Ordering::SeqCst);
        self.state.sink.fail(text);
    }

    /// Returns `true` once any failure has been recorded.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.state.failed.load(Ordering::SeqCst)
    }

    /// Returns `true` when both values are clones of the same handle.
    #[must_use]
    pub fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("name", &self.state.name)
            .field("failed", &self.failed())
            .finish_non_exhaustive()
    }
}
