//! Step dispatch: matching a line against the registry and invoking handlers.
//!
//! [`ExecutionContext`] owns the registry, the dispatcher configuration, and
//! the reporting handle bound to the test currently running. Dispatch is
//! synchronous and sequential: for one step line every binding is scanned in
//! registration order and each one whose pattern matches is invoked, so
//! overlapping patterns all fire.
//!
//! A matching binding whose handler arity disagrees with the line (captures,
//! plus a leading reporter, plus the step argument when present) is skipped
//! without error. Coercion failures that cannot be resolved abort the step:
//! bindings after the failing one are not scanned.

mod coerce;

use crate::argument::StepArgument;
use crate::config::DispatchConfig;
use crate::error::StepError;
use crate::handler::{StepFn, StepHandler, StepOutcome};
use crate::registry::{StepBinding, StepKind, StepRegistry};
use crate::reporter::Reporter;

/// Counts gathered while dispatching one step line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Bindings whose pattern matched the line.
    pub matched: usize,
    /// Bindings whose handler was invoked.
    pub invoked: usize,
    /// Matching bindings skipped because their arity did not fit.
    pub skipped: usize,
}

impl DispatchSummary {
    /// Returns `true` when no binding matched the line.
    #[must_use]
    pub const fn is_unmatched(&self) -> bool {
        self.matched == 0
    }
}

/// Registry, configuration and active reporting handle for a test suite.
///
/// Registration takes `&mut self` and is expected to finish before the first
/// dispatch. [`execute_for_test`](Self::execute_for_test) rebinds the active
/// reporter; [`execute_with`](Self::execute_with) threads a reporter through a
/// single call without touching the bound one, so shared contexts can serve
/// several tests at once.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    registry: StepRegistry,
    config: DispatchConfig,
    reporter: Reporter,
}

impl ExecutionContext {
    /// Creates a context with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context using `config`.
    #[must_use]
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            registry: StepRegistry::with_anchoring(config.anchor_patterns),
            config,
            reporter: Reporter::detached(),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Returns the reporting handle bound by the last test invocation.
    ///
    /// Before any test binds one this is a detached handle.
    #[must_use]
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Binds `reporter` as the active handle, returning the previous one.
    pub const fn bind_reporter(&mut self, reporter: Reporter) -> Reporter {
        std::mem::replace(&mut self.reporter, reporter)
    }

    /// Registers a typed handler under `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn register_step<F, Args>(
        &mut self,
        kind: StepKind,
        pattern: &str,
        handler: F,
    ) -> Result<(), StepError>
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        self.registry.register(kind, pattern, handler)
    }

    /// Registers a prepared handler, such as one built by
    /// [`StepHandler::dynamic`].
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn register_handler(
        &mut self,
        kind: StepKind,
        pattern: &str,
        handler: StepHandler,
    ) -> Result<(), StepError> {
        self.registry.register_handler(kind, pattern, handler)
    }

    /// Registers a `Given` step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn given<F, Args>(&mut self, pattern: &str, handler: F) -> Result<(), StepError>
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        self.register_step(StepKind::Given, pattern, handler)
    }

    /// Registers a `When` step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn when<F, Args>(&mut self, pattern: &str, handler: F) -> Result<(), StepError>
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        self.register_step(StepKind::When, pattern, handler)
    }

    /// Registers a `Then` step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn then<F, Args>(&mut self, pattern: &str, handler: F) -> Result<(), StepError>
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        self.register_step(StepKind::Then, pattern, handler)
    }

    /// Registers an `And` step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn and<F, Args>(&mut self, pattern: &str, handler: F) -> Result<(), StepError>
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        self.register_step(StepKind::And, pattern, handler)
    }

    /// Dispatches `line` using the currently bound reporter.
    ///
    /// A line that matches nothing is not an error.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](Self::execute_with).
    pub fn execute(
        &self,
        line: &str,
        argument: Option<&StepArgument>,
    ) -> Result<DispatchSummary, StepError> {
        self.execute_with(&self.reporter, line, argument)
    }

    /// Binds `reporter` for the test now running, then dispatches `line`.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](Self::execute_with).
    pub fn execute_for_test(
        &mut self,
        reporter: Reporter,
        line: &str,
        argument: Option<&StepArgument>,
    ) -> Result<DispatchSummary, StepError> {
        self.reporter = reporter;
        self.execute(line, argument)
    }

    /// Dispatches `line`, handing `reporter` to handlers that ask for one.
    ///
    /// Every binding whose pattern matches is considered in registration
    /// order. Handler failures are recorded through `reporter` and do not stop
    /// dispatch.
    ///
    /// # Errors
    ///
    /// Aborts the step and returns the error when a matching binding's
    /// arguments cannot be coerced: a table or string parameter given the
    /// wrong kind of argument, a numeric parameter with no capture left, or an
    /// unparsable number under [`crate::config::NumericPolicy::Strict`].
    pub fn execute_with(
        &self,
        reporter: &Reporter,
        line: &str,
        argument: Option<&StepArgument>,
    ) -> Result<DispatchSummary, StepError> {
        let mut summary = DispatchSummary::default();
        let argument_present = argument.is_some_and(StepArgument::is_present);

        for binding in self.registry.bindings() {
            let Some(captures) = binding.captures(line) else {
                continue;
            };
            summary.matched += 1;

            if !arity_fits(binding, captures.len(), argument_present) {
                tracing::debug!(
                    pattern = binding.source(),
                    line,
                    captures = captures.len(),
                    signature = %binding.handler().signature(),
                    "skipping step binding with mismatched arity"
                );
                summary.skipped += 1;
                continue;
            }

            self.invoke(binding, &captures, argument, reporter, line)?;
            summary.invoked += 1;
        }

        if summary.is_unmatched() {
            tracing::debug!(line, "no step binding matched");
        }
        Ok(summary)
    }

    fn invoke(
        &self,
        binding: &StepBinding,
        captures: &[String],
        argument: Option<&StepArgument>,
        reporter: &Reporter,
        line: &str,
    ) -> Result<(), StepError> {
        let handler = binding.handler();
        let values = coerce::coerce_all(
            handler.signature(),
            captures,
            argument,
            reporter,
            self.config.numeric_coercion,
        )
        .inspect_err(|err| {
            tracing::warn!(pattern = binding.source(), line, "step aborted: {err}");
        })?;

        tracing::debug!(
            kind = %binding.kind(),
            pattern = binding.source(),
            line,
            "invoking step handler"
        );
        if let StepOutcome::Failed(message) = handler.invoke(values)? {
            reporter.fail(message);
        }
        Ok(())
    }
}

/// Whether a binding's handler takes exactly the slots this line provides.
fn arity_fits(binding: &StepBinding, capture_count: usize, argument_present: bool) -> bool {
    let signature = binding.handler().signature();
    let expected = capture_count
        + usize::from(signature.takes_reporter_first())
        + usize::from(argument_present);
    expected == signature.len()
}
