//! Pattern registry for step handlers.
//!
//! The registry is an append-only list of [`StepBinding`]s kept in
//! registration order. Patterns are compiled once, when registered, so a
//! malformed pattern fails during setup rather than on first use. Duplicate
//! patterns are allowed and every matching binding fires at dispatch time.

use std::fmt;

use regex::Regex;

use crate::error::StepError;
use crate::handler::{StepFn, StepHandler};

/// The keyword a step was registered under.
///
/// The keyword is cosmetic: all four route to the same registration path and
/// any binding may match a line whatever keyword introduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// A `Given` step.
    Given,
    /// A `When` step.
    When,
    /// A `Then` step.
    Then,
    /// An `And` step.
    And,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
        };
        f.write_str(keyword)
    }
}

/// A compiled pattern bound to its handler.
#[derive(Debug, Clone)]
pub struct StepBinding {
    kind: StepKind,
    source: String,
    pattern: Regex,
    handler: StepHandler,
}

impl StepBinding {
    /// Returns the keyword the binding was registered under.
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        self.kind
    }

    /// Returns the pattern exactly as it was registered.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Returns the number of capture groups, excluding the whole match.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.pattern.captures_len().saturating_sub(1)
    }

    /// Returns the bound handler.
    #[must_use]
    pub const fn handler(&self) -> &StepHandler {
        &self.handler
    }

    /// Matches `line`, returning every group capture in order.
    ///
    /// Groups that did not take part in the match yield an empty string.
    #[must_use]
    pub fn captures(&self, line: &str) -> Option<Vec<String>> {
        let caps = self.pattern.captures(line)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect(),
        )
    }
}

/// Ordered, append-only collection of step bindings.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    bindings: Vec<StepBinding>,
    anchored: bool,
}

impl StepRegistry {
    /// Creates an empty registry whose patterns match anywhere in a line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry.
    ///
    /// When `anchored` is set, each pattern must match the entire line.
    #[must_use]
    pub const fn with_anchoring(anchored: bool) -> Self {
        Self {
            bindings: Vec::new(),
            anchored,
        }
    }

    /// Registers a typed handler for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPattern`] if `pattern` does not compile.
    pub fn register<F, Args>(
        &mut self,
        kind: StepKind,
        pattern: &str,
        handler: F,
    ) -> Result<(), StepError>
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        self.register_handler(kind, pattern, StepHandler::typed(handler))
    }

    /// Registers an already constructed handler for `pattern`.
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
        let compiled = self.compile(pattern)?;
        tracing::debug!(
            %kind,
            pattern,
            signature = %handler.signature(),
            "registered step"
        );
        self.bindings.push(StepBinding {
            kind,
            source: pattern.to_owned(),
            pattern: compiled,
            handler,
        });
        Ok(())
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
        self.register(StepKind::Given, pattern, handler)
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
        self.register(StepKind::When, pattern, handler)
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
        self.register(StepKind::Then, pattern, handler)
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
        self.register(StepKind::And, pattern, handler)
    }

    /// Returns every binding in registration order.
    #[must_use]
    pub fn bindings(&self) -> &[StepBinding] {
        &self.bindings
    }

    /// Returns the bindings whose pattern matches `line`, in registration order.
    pub fn resolve<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a StepBinding> + 'a {
        self.bindings
            .iter()
            .filter(move |binding| binding.pattern.is_match(line))
    }

    /// Returns the number of registered bindings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn compile(&self, pattern: &str) -> Result<Regex, StepError> {
        let result = if self.anchored {
            Regex::new(&format!("^(?:{pattern})$"))
        } else {
            Regex::new(pattern)
        };
        result.map_err(|err| StepError::invalid_pattern(pattern, err))
    }
}
