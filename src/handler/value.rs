//! Parameter shapes and the values coerced into them.

use std::fmt;

use crate::argument::Table;
use crate::error::StepError;
use crate::reporter::Reporter;

/// The closed set of parameter shapes a step handler may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// The reporting handle of the running test.
    Reporter,
    /// The table attached to the step.
    Table,
    /// A 32-bit signed integer parsed from a capture.
    Int32,
    /// A 64-bit signed integer parsed from a capture.
    Int64,
    /// A 64-bit float parsed from a capture.
    Float64,
    /// A captured substring, or the doc string once captures run out.
    Str,
}

impl ParamKind {
    /// Resolves a declared type name to its shape.
    ///
    /// Accepts the Rust spelling of each supported type (`i32`, `String`,
    /// `Vec<Vec<String>>`, ...) as well as the shape names used in
    /// diagnostics (`reporter`, `table`, `string`).
    ///
    /// # Errors
    ///
    /// Returns [`StepError::UnsupportedParameter`] for any other name.
    pub fn from_type_name(type_name: &str) -> Result<Self, StepError> {
        let compact: String = type_name.chars().filter(|c| !c.is_whitespace()).collect();
        let shape = match compact.as_str() {
            "reporter" | "Reporter" | "&Reporter" | "stepwise::Reporter" => Self::Reporter,
            "table" | "Table" | "stepwise::Table" | "Vec<Vec<String>>" => Self::Table,
            "i32" => Self::Int32,
            "i64" => Self::Int64,
            "f64" => Self::Float64,
            "string" | "String" | "&str" => Self::Str,
            _ => {
                return Err(StepError::UnsupportedParameter {
                    type_name: type_name.to_owned(),
                });
            }
        };
        Ok(shape)
    }

    /// Returns the diagnostic name of the shape.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reporter => "reporter",
            Self::Table => "table",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Float64 => "f64",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A coerced argument ready to be handed to a handler.
#[derive(Debug, Clone)]
pub enum Value {
    /// The bound reporting handle.
    Reporter(Reporter),
    /// The attached table.
    Table(Table),
    /// A parsed 32-bit integer.
    Int32(i32),
    /// A parsed 64-bit integer.
    Int64(i64),
    /// A parsed float.
    Float64(f64),
    /// A captured substring or doc string.
    Str(String),
}

impl Value {
    /// Returns the shape this value satisfies.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        match self {
            Self::Reporter(_) => ParamKind::Reporter,
            Self::Table(_) => ParamKind::Table,
            Self::Int32(_) => ParamKind::Int32,
            Self::Int64(_) => ParamKind::Int64,
            Self::Float64(_) => ParamKind::Float64,
            Self::Str(_) => ParamKind::Str,
        }
    }
}

/// A Rust type that can appear as a step handler parameter.
///
/// Implemented for exactly the supported shapes, so a handler with any other
/// parameter type fails to register at compile time.
pub trait StepParam: Sized {
    /// The shape the dispatcher must coerce into.
    const KIND: ParamKind;

    /// Extracts the parameter from a value of matching shape.
    fn from_value(value: Value) -> Option<Self>;
}

impl StepParam for Reporter {
    const KIND: ParamKind = ParamKind::Reporter;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Reporter(reporter) => Some(reporter),
            _ => None,
        }
    }
}

impl StepParam for Table {
    const KIND: ParamKind = ParamKind::Table;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl StepParam for Vec<Vec<String>> {
    const KIND: ParamKind = ParamKind::Table;

    fn from_value(value: Value) -> Option<Self> {
        Table::from_value(value).map(Table::into_rows)
    }
}

impl StepParam for i32 {
    const KIND: ParamKind = ParamKind::Int32;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int32(number) => Some(number),
            _ => None,
        }
    }
}

impl StepParam for i64 {
    const KIND: ParamKind = ParamKind::Int64;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int64(number) => Some(number),
            _ => None,
        }
    }
}

impl StepParam for f64 {
    const KIND: ParamKind = ParamKind::Float64;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float64(number) => Some(number),
            _ => None,
        }
    }
}

impl StepParam for String {
    const KIND: ParamKind = ParamKind::Str;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }
}
