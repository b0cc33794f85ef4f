//! Then step definitions for step dispatch BDD tests.

use rstest_bdd_macros::then;
use stepwise::DispatchSummary;

use super::state::{DispatchState, StepResult};

fn summary(dispatch_state: &DispatchState) -> StepResult<DispatchSummary> {
    if let Some(error) = dispatch_state.error.get() {
        return Err(format!("expected dispatch to succeed, got: {error}"));
    }
    dispatch_state
        .summary
        .get()
        .ok_or_else(|| String::from("dispatch summary should be set"))
}

#[then("{count} bindings were invoked")]
fn bindings_were_invoked(dispatch_state: &DispatchState, count: usize) -> StepResult<()> {
    let summary = summary(dispatch_state)?;
    if summary.invoked == count {
        Ok(())
    } else {
        Err(format!("expected {count} invocations, got {summary:?}"))
    }
}

#[then("{count} bindings were skipped")]
fn bindings_were_skipped(dispatch_state: &DispatchState, count: usize) -> StepResult<()> {
    let summary = summary(dispatch_state)?;
    if summary.skipped == count {
        Ok(())
    } else {
        Err(format!("expected {count} skipped bindings, got {summary:?}"))
    }
}

#[then("no binding matched")]
fn no_binding_matched(dispatch_state: &DispatchState) -> StepResult<()> {
    let summary = summary(dispatch_state)?;
    if summary.is_unmatched() {
        Ok(())
    } else {
        Err(format!("expected no matches, got {summary:?}"))
    }
}

#[then("the handlers recorded {expected:string}")]
fn handlers_recorded(dispatch_state: &DispatchState, expected: String) -> StepResult<()> {
    let recorded = dispatch_state.calls().entries().join(",");
    if recorded == expected {
        Ok(())
    } else {
        Err(format!("expected handlers to record '{expected}', got '{recorded}'"))
    }
}

#[then("no handler recorded anything")]
fn no_handler_recorded_anything(dispatch_state: &DispatchState) -> StepResult<()> {
    let recorded = dispatch_state.calls().entries();
    if recorded.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no handler output, got {recorded:?}"))
    }
}

#[then("the test {name:string} failed with {message:string}")]
fn test_failed_with(
    dispatch_state: &DispatchState,
    name: String,
    message: String,
) -> StepResult<()> {
    let reporter = dispatch_state
        .reporter
        .get()
        .ok_or_else(|| String::from("reporter should be set"))?;
    let sink = dispatch_state
        .sink
        .get()
        .ok_or_else(|| String::from("sink should be set"))?;
    if reporter.name() != name {
        return Err(format!("expected test '{name}', got '{}'", reporter.name()));
    }
    if !reporter.failed() {
        return Err(format!("expected test '{name}' to fail"));
    }
    if sink.failures() == vec![message.clone()] {
        Ok(())
    } else {
        Err(format!("expected failure '{message}', got {:?}", sink.failures()))
    }
}

#[then("the test {name:string} passed")]
fn test_passed(dispatch_state: &DispatchState, name: String) -> StepResult<()> {
    summary(dispatch_state)?;
    let reporter = dispatch_state
        .reporter
        .get()
        .ok_or_else(|| String::from("reporter should be set"))?;
    if reporter.name() == name && !reporter.failed() {
        Ok(())
    } else {
        Err(format!("expected test '{name}' to pass, got {reporter:?}"))
    }
}

#[then("dispatch fails with {expected:string}")]
fn dispatch_fails_with(dispatch_state: &DispatchState, expected: String) -> StepResult<()> {
    let error = dispatch_state
        .error
        .get()
        .ok_or_else(|| String::from("expected dispatch to fail"))?;
    if error == expected {
        Ok(())
    } else {
        Err(format!("expected error '{expected}', got '{error}'"))
    }
}
