//! Scenario state for step dispatch BDD tests.

use std::sync::{Arc, Mutex, PoisonError};

use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use stepwise::{DispatchSummary, ExecutionContext, RecordingSink, Reporter};

/// Convenience alias for step outcomes.
pub type StepResult<T> = Result<T, String>;

/// Entries pushed by registered handlers, shared with the scenario.
#[derive(Clone, Debug, Default)]
pub struct HandlerCalls(Arc<Mutex<Vec<String>>>);

impl HandlerCalls {
    /// Records one handler invocation.
    pub fn push(&self, entry: impl Into<String>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// Returns every entry recorded so far.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// State shared across step dispatch scenarios.
#[derive(ScenarioState)]
pub struct DispatchState {
    /// The context under test.
    pub(crate) context: Slot<ExecutionContext>,
    /// Log written by the registered handlers.
    pub(crate) calls: Slot<HandlerCalls>,
    /// Reporter bound for the running test, when one was supplied.
    pub(crate) reporter: Slot<Reporter>,
    /// Sink behind [`Self::reporter`].
    pub(crate) sink: Slot<Arc<RecordingSink>>,
    /// Summary of the last successful dispatch.
    pub(crate) summary: Slot<DispatchSummary>,
    /// Message of the last dispatch error.
    pub(crate) error: Slot<String>,
}

#[expect(
    clippy::derivable_impls,
    reason = "ScenarioState guidance discourages deriving Default in this module"
)]
impl Default for DispatchState {
    fn default() -> Self {
        Self {
            context: Slot::default(),
            calls: Slot::default(),
            reporter: Slot::default(),
            sink: Slot::default(),
            summary: Slot::default(),
            error: Slot::default(),
        }
    }
}

impl DispatchState {
    /// Returns the handler log, creating it on first use.
    pub(crate) fn calls(&self) -> HandlerCalls {
        self.calls.get().unwrap_or_else(|| {
            let calls = HandlerCalls::default();
            self.calls.set(calls.clone());
            calls
        })
    }
}

/// Fixture providing fresh state for each step dispatch scenario.
#[rstest::fixture]
pub fn dispatch_state() -> DispatchState {
    DispatchState::default()
}
