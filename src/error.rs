//! Semantic error types for step registration, dispatch, and configuration.
//!
//! Conditions a caller might inspect are modelled as `thiserror` enums, one per
//! concern. Registration problems surface synchronously from setup code, while
//! dispatch problems abort the step currently being executed. Test harnesses
//! that want a human-readable report convert these into `eyre::Report` at their
//! own boundary.

use std::sync::Arc;

use thiserror::Error;

use crate::handler::ParamKind;

/// Errors raised while registering or dispatching step handlers.
#[derive(Debug, Error)]
pub enum StepError {
    /// A step pattern did not compile as a regular expression.
    #[error("invalid step pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as supplied at registration.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: Box<regex::Error>,
    },

    /// A handler declared a parameter type outside the supported shapes.
    #[error("parameter type '{type_name}' is not supported by step handlers")]
    UnsupportedParameter {
        /// The declared type name.
        type_name: String,
    },

    /// A table or string parameter could not accept the supplied argument.
    #[error("parameter {position} expects {expected} but the step supplied {found}")]
    ArgumentMismatch {
        /// Zero-based parameter position.
        position: usize,
        /// The shape the handler declared.
        expected: ParamKind,
        /// A description of what the step supplied instead.
        found: &'static str,
    },

    /// A capture-consuming parameter had no capture left to consume.
    #[error("parameter {position} expects a captured {kind} but the pattern has no capture left")]
    MissingCapture {
        /// Zero-based parameter position.
        position: usize,
        /// The shape the handler declared.
        kind: ParamKind,
    },

    /// A captured substring failed numeric parsing under strict coercion.
    #[error("parameter {position} expects {kind} but captured '{value}'")]
    InvalidNumber {
        /// Zero-based parameter position.
        position: usize,
        /// The numeric shape the handler declared.
        kind: ParamKind,
        /// The captured text that failed to parse.
        value: String,
    },

    /// An erased handler received a value whose shape disagrees with its
    /// signature.
    #[error("handler parameter {position} received a value that is not {expected}")]
    SignatureMismatch {
        /// Zero-based parameter position.
        position: usize,
        /// The shape the handler declared.
        expected: ParamKind,
    },
}

impl StepError {
    /// Builds an [`StepError::InvalidPattern`] from a compilation failure.
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_owned(),
            source: Box::new(source),
        }
    }
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Top-level error type for the stepwise crate.
#[derive(Debug, Error)]
pub enum StepwiseError {
    /// An error occurred while registering or dispatching a step.
    #[error(transparent)]
    Step(#[from] StepError),

    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A specialised `Result` type for stepwise operations.
pub type Result<T> = std::result::Result<T, StepwiseError>;
