//! Given and When step definitions for step dispatch BDD tests.

use rstest_bdd_macros::{given, when};
use stepwise::config::{DispatchConfig, NumericPolicy};
use stepwise::{ExecutionContext, Reporter, StepArgument, StepError, Table};

use super::state::{DispatchState, HandlerCalls, StepResult};

/// Registers handlers built by `build` on a fresh context and stores it.
fn install(
    dispatch_state: &DispatchState,
    config: DispatchConfig,
    build: impl FnOnce(&mut ExecutionContext, &HandlerCalls) -> Result<(), StepError>,
) -> StepResult<()> {
    let calls = dispatch_state.calls();
    let mut context = ExecutionContext::with_config(config);
    build(&mut context, &calls).map_err(|e| format!("registration should succeed: {e}"))?;
    dispatch_state.context.set(context);
    Ok(())
}

fn numeric_context(dispatch_state: &DispatchState, policy: NumericPolicy) -> StepResult<()> {
    let config = DispatchConfig {
        numeric_coercion: policy,
        ..DispatchConfig::default()
    };
    install(dispatch_state, config, |context, calls| {
        let recorder = calls.clone();
        context.given(r"^I have (\S+) cukes$", move |count: i32| {
            recorder.push(count.to_string());
        })
    })
}

/// Runs `dispatch` against the stored context and records the outcome.
fn dispatch(
    dispatch_state: &DispatchState,
    line: &str,
    argument: Option<&StepArgument>,
    reporter: Option<Reporter>,
) -> StepResult<()> {
    let mut context = dispatch_state
        .context
        .take()
        .ok_or_else(|| String::from("context should be set"))?;
    let result = match reporter {
        Some(handle) => context.execute_for_test(handle, line, argument),
        None => context.execute(line, argument),
    };
    match result {
        Ok(summary) => dispatch_state.summary.set(summary),
        Err(error) => dispatch_state.error.set(error.to_string()),
    }
    dispatch_state.context.set(context);
    Ok(())
}

#[given("a context with overlapping cucumber steps")]
fn overlapping_cucumber_steps(dispatch_state: &DispatchState) -> StepResult<()> {
    install(dispatch_state, DispatchConfig::default(), |context, calls| {
        let recorder = calls.clone();
        context.given(r"^I have (\d+) cukes in my belly$", move |count: i32| {
            recorder.push(format!("given {count}"));
        })?;
        let recorder = calls.clone();
        context.when("cukes", move || recorder.push("when cukes"))?;
        let recorder = calls.clone();
        context.then(r"^I eat (\d+)$", move |count: i32| {
            recorder.push(format!("then {count}"));
        })
    })
}

#[given("a context with handlers of differing arity")]
fn handlers_of_differing_arity(dispatch_state: &DispatchState) -> StepResult<()> {
    install(dispatch_state, DispatchConfig::default(), |context, calls| {
        let recorder = calls.clone();
        context.when(r"^I eat (\d+)$", move |_first: i32, _second: i32| {
            recorder.push("two");
        })?;
        let recorder = calls.clone();
        context.when(r"^I eat (\d+)$", move |count: i32| {
            recorder.push(format!("one {count}"));
        })
    })
}

#[given("a context expecting 3 cukes")]
fn context_expecting_three_cukes(dispatch_state: &DispatchState) -> StepResult<()> {
    install(dispatch_state, DispatchConfig::default(), |context, _calls| {
        context.then(
            r"^I should have (\d+) cukes$",
            |reporter: Reporter, count: i32| {
                if count != 3 {
                    reporter.fail(format!("expected 3 cukes, found {count}"));
                }
            },
        )
    })
}

#[given("a context that counts table rows")]
fn context_counting_table_rows(dispatch_state: &DispatchState) -> StepResult<()> {
    install(dispatch_state, DispatchConfig::default(), |context, calls| {
        let recorder = calls.clone();
        context.given(r"^the following (\w+):$", move |what: String, table: Table| {
            recorder.push(format!("{what} x{}", table.len()));
        })
    })
}

#[given("a context that stores file contents")]
fn context_storing_file_contents(dispatch_state: &DispatchState) -> StepResult<()> {
    install(dispatch_state, DispatchConfig::default(), |context, calls| {
        let recorder = calls.clone();
        context.given(
            r"^a file named (\S+) containing:$",
            move |name: String, body: String| {
                recorder.push(format!("{name}={body}"));
            },
        )
    })
}

#[given("a lenient context with a numeric step")]
fn lenient_numeric_context(dispatch_state: &DispatchState) -> StepResult<()> {
    numeric_context(dispatch_state, NumericPolicy::Lenient)
}

#[given("a strict context with a numeric step")]
fn strict_numeric_context(dispatch_state: &DispatchState) -> StepResult<()> {
    numeric_context(dispatch_state, NumericPolicy::Strict)
}

#[when("the step {line:string} is dispatched")]
fn step_is_dispatched(dispatch_state: &DispatchState, line: String) -> StepResult<()> {
    dispatch(dispatch_state, &line, None, None)
}

#[when("the step {line:string} is dispatched for test {name:string}")]
fn step_is_dispatched_for_test(
    dispatch_state: &DispatchState,
    line: String,
    name: String,
) -> StepResult<()> {
    let (reporter, sink) = Reporter::recording(name);
    dispatch_state.reporter.set(reporter.clone());
    dispatch_state.sink.set(sink);
    dispatch(dispatch_state, &line, None, Some(reporter))
}

#[when("the step {line:string} is dispatched with a {rows}-row table")]
fn step_is_dispatched_with_table(
    dispatch_state: &DispatchState,
    line: String,
    rows: usize,
) -> StepResult<()> {
    let table = Table::new(
        (0..rows)
            .map(|row| vec![format!("name {row}"), row.to_string()])
            .collect(),
    );
    dispatch(dispatch_state, &line, Some(&StepArgument::from(table)), None)
}

#[when("the step {line:string} is dispatched with doc string {text:string}")]
fn step_is_dispatched_with_doc_string(
    dispatch_state: &DispatchState,
    line: String,
    text: String,
) -> StepResult<()> {
    dispatch(dispatch_state, &line, Some(&StepArgument::from(text)), None)
}
