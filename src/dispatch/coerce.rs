//! Coercion of captures and step arguments into handler values.
//!
//! Each parameter shape maps to one coercion rule. Reporter and table slots
//! never read captures; numeric slots always read the next capture; string
//! slots read the next capture while one remains and fall back to the doc
//! string afterwards.

use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use crate::argument::StepArgument;
use crate::config::NumericPolicy;
use crate::error::StepError;
use crate::handler::{ParamKind, Signature, Value};
use crate::reporter::Reporter;

/// Coerces one value per parameter in `signature`.
///
/// # Errors
///
/// Returns the first coercion failure; no values are produced in that case.
pub(crate) fn coerce_all(
    signature: &Signature,
    captures: &[String],
    argument: Option<&StepArgument>,
    reporter: &Reporter,
    policy: NumericPolicy,
) -> Result<Vec<Value>, StepError> {
    let mut slots = SlotSource {
        captures,
        cursor: 0,
        argument,
        reporter,
        policy,
    };
    signature
        .params()
        .iter()
        .enumerate()
        .map(|(position, kind)| slots.coerce(position, *kind))
        .collect()
}

struct SlotSource<'a> {
    captures: &'a [String],
    cursor: usize,
    argument: Option<&'a StepArgument>,
    reporter: &'a Reporter,
    policy: NumericPolicy,
}

impl<'a> SlotSource<'a> {
    fn coerce(&mut self, position: usize, kind: ParamKind) -> Result<Value, StepError> {
        match kind {
            ParamKind::Reporter => Ok(Value::Reporter(self.reporter.clone())),
            ParamKind::Table => self.table(position),
            ParamKind::Str => self.string(position),
            ParamKind::Int32 => {
                let text = self.required_capture(position, kind)?;
                self.integer::<i32>(text, position, kind, i32::MIN, i32::MAX)
                    .map(Value::Int32)
            }
            ParamKind::Int64 => {
                let text = self.required_capture(position, kind)?;
                self.integer::<i64>(text, position, kind, i64::MIN, i64::MAX)
                    .map(Value::Int64)
            }
            ParamKind::Float64 => {
                let text = self.required_capture(position, kind)?;
                self.float(text, position).map(Value::Float64)
            }
        }
    }

    fn next_capture(&mut self) -> Option<&'a str> {
        let text = self.captures.get(self.cursor)?;
        self.cursor += 1;
        Some(text.as_str())
    }

    fn required_capture(&mut self, position: usize, kind: ParamKind) -> Result<&'a str, StepError> {
        self.next_capture()
            .ok_or(StepError::MissingCapture { position, kind })
    }

    fn table(&self, position: usize) -> Result<Value, StepError> {
        match self.argument {
            Some(StepArgument::Table(table)) => Ok(Value::Table(table.clone())),
            Some(other) => Err(StepError::ArgumentMismatch {
                position,
                expected: ParamKind::Table,
                found: other.describe(),
            }),
            None => Err(StepError::ArgumentMismatch {
                position,
                expected: ParamKind::Table,
                found: "no argument",
            }),
        }
    }

    fn string(&mut self, position: usize) -> Result<Value, StepError> {
        if let Some(text) = self.next_capture() {
            return Ok(Value::Str(text.to_owned()));
        }
        match self.argument {
            Some(StepArgument::DocString(text)) => Ok(Value::Str(text.clone())),
            Some(other) => Err(StepError::ArgumentMismatch {
                position,
                expected: ParamKind::Str,
                found: other.describe(),
            }),
            None => Ok(Value::Str(String::new())),
        }
    }

    fn integer<T>(
        &self,
        text: &str,
        position: usize,
        kind: ParamKind,
        min: T,
        max: T,
    ) -> Result<T, StepError>
    where
        T: FromStr<Err = ParseIntError> + Default,
    {
        match text.parse::<T>() {
            Ok(number) => Ok(number),
            Err(err) => {
                let fallback = match err.kind() {
                    IntErrorKind::PosOverflow => max,
                    IntErrorKind::NegOverflow => min,
                    _ => T::default(),
                };
                self.apply_policy(text, position, kind).map(|()| fallback)
            }
        }
    }

    fn float(&self, text: &str, position: usize) -> Result<f64, StepError> {
        match text.parse::<f64>() {
            Ok(number) => Ok(number),
            Err(_) => self
                .apply_policy(text, position, ParamKind::Float64)
                .map(|()| 0.0),
        }
    }

    /// Applies the numeric policy to a capture that failed to parse.
    fn apply_policy(&self, text: &str, position: usize, kind: ParamKind) -> Result<(), StepError> {
        match self.policy {
            NumericPolicy::Lenient => {
                tracing::warn!(
                    position,
                    %kind,
                    value = text,
                    "captured value is not a valid number; substituting a default"
                );
                Ok(())
            }
            NumericPolicy::Strict => Err(StepError::InvalidNumber {
                position,
                kind,
                value: text.to_owned(),
            }),
        }
    }
}
