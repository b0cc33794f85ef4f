//! Step handlers and their parameter signatures.
//!
//! Handlers are ordinary Rust closures or functions whose parameters are drawn
//! from the closed set of [`StepParam`] types. The [`StepFn`] trait records the
//! parameter shapes at registration time and erases the closure into a
//! [`StepHandler`], so the dispatcher never inspects types while a suite runs.
//!
//! Hosts that describe handler parameters by name (for example a scripting
//! bridge) use [`StepHandler::dynamic`], which validates the names up front and
//! rejects unsupported types before the handler can be registered.

mod value;

use std::fmt;
use std::sync::Arc;

pub use value::{ParamKind, StepParam, Value};

use crate::error::StepError;

/// The outcome a handler reports back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The handler completed without reporting a failure.
    Passed,
    /// The handler returned an error, carried here as its message.
    Failed(String),
}

/// Return types accepted from step handlers.
pub trait StepOutput {
    /// Converts the handler's return value into an outcome.
    fn into_outcome(self) -> StepOutcome;
}

impl StepOutput for () {
    fn into_outcome(self) -> StepOutcome {
        StepOutcome::Passed
    }
}

impl StepOutput for StepOutcome {
    fn into_outcome(self) -> StepOutcome {
        self
    }
}

impl<E: fmt::Display> StepOutput for Result<(), E> {
    fn into_outcome(self) -> StepOutcome {
        match self {
            Ok(()) => StepOutcome::Passed,
            Err(err) => StepOutcome::Failed(err.to_string()),
        }
    }
}

/// The ordered parameter shapes a handler declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ParamKind>,
}

impl Signature {
    /// Creates a signature from parameter shapes.
    #[must_use]
    pub const fn new(params: Vec<ParamKind>) -> Self {
        Self { params }
    }

    /// Builds a signature from declared type names.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::UnsupportedParameter`] naming the first type that
    /// has no supported shape.
    pub fn from_type_names<I, S>(type_names: I) -> Result<Self, StepError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = type_names
            .into_iter()
            .map(|name| ParamKind::from_type_name(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(params))
    }

    /// Returns the parameter shapes in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }

    /// Returns the declared parameter count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when the handler takes no parameters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns `true` when the first parameter is the reporting handle.
    ///
    /// Only a leading reporter occupies an extra slot when arity is checked.
    #[must_use]
    pub fn takes_reporter_first(&self) -> bool {
        matches!(self.params.first(), Some(ParamKind::Reporter))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, kind) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        f.write_str(")")
    }
}

/// A callable usable as a typed step handler.
///
/// Implemented for every `Fn` of up to eight [`StepParam`] arguments whose
/// return type implements [`StepOutput`]. `Args` is the tuple of parameter
/// types and only serves to keep the implementations apart.
pub trait StepFn<Args>: Send + Sync + 'static {
    /// Returns the parameter shapes in declaration order.
    fn params() -> Vec<ParamKind>;

    /// Calls the handler with values already coerced to its shapes.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::SignatureMismatch`] if a value does not match the
    /// declared shape at its position.
    fn call(&self, args: Vec<Value>) -> Result<StepOutcome, StepError>;
}

/// Hands out coerced values one parameter at a time.
struct ValueCursor {
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl ValueCursor {
    fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    fn take<T: StepParam>(&mut self) -> Result<T, StepError> {
        let position = self.position;
        self.position += 1;
        self.values
            .next()
            .and_then(T::from_value)
            .ok_or(StepError::SignatureMismatch {
                position,
                expected: T::KIND,
            })
    }
}

impl<Func, Out> StepFn<()> for Func
where
    Func: Fn() -> Out + Send + Sync + 'static,
    Out: StepOutput,
{
    fn params() -> Vec<ParamKind> {
        Vec::new()
    }

    fn call(&self, _args: Vec<Value>) -> Result<StepOutcome, StepError> {
        Ok((self)().into_outcome())
    }
}

macro_rules! impl_step_fn {
    ($($value:ident: $param:ident),+) => {
        impl<Func, Out, $($param),+> StepFn<($($param,)+)> for Func
        where
            Func: Fn($($param),+) -> Out + Send + Sync + 'static,
            Out: StepOutput,
            $($param: StepParam,)+
        {
            fn params() -> Vec<ParamKind> {
                vec![$($param::KIND),+]
            }

            fn call(&self, args: Vec<Value>) -> Result<StepOutcome, StepError> {
                let mut cursor = ValueCursor::new(args);
                $(let $value = cursor.take::<$param>()?;)+
                Ok((self)($($value),+).into_outcome())
            }
        }
    };
}

impl_step_fn!(a: A);
impl_step_fn!(a: A, b: B);
impl_step_fn!(a: A, b: B, c: C);
impl_step_fn!(a: A, b: B, c: C, d: D);
impl_step_fn!(a: A, b: B, c: C, d: D, e: E);
impl_step_fn!(a: A, b: B, c: C, d: D, e: E, f: F);
impl_step_fn!(a: A, b: B, c: C, d: D, e: E, f: F, g: G);
impl_step_fn!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H);

type ErasedCall = dyn Fn(Vec<Value>) -> Result<StepOutcome, StepError> + Send + Sync;

/// A handler with its signature fixed at construction.
#[derive(Clone)]
pub struct StepHandler {
    signature: Signature,
    call: Arc<ErasedCall>,
}

impl StepHandler {
    /// Wraps a typed closure or function.
    #[must_use]
    pub fn typed<F, Args>(handler: F) -> Self
    where
        F: StepFn<Args>,
        Args: 'static,
    {
        Self {
            signature: Signature::new(F::params()),
            call: Arc::new(move |args: Vec<Value>| handler.call(args)),
        }
    }

    /// Wraps an untyped handler whose parameters are described by type name.
    ///
    /// The handler receives the coerced values in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::UnsupportedParameter`] if any name falls outside
    /// the supported shapes.
    pub fn dynamic<I, S, F, Out>(type_names: I, handler: F) -> Result<Self, StepError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Vec<Value>) -> Out + Send + Sync + 'static,
        Out: StepOutput,
    {
        Ok(Self {
            signature: Signature::from_type_names(type_names)?,
            call: Arc::new(move |args: Vec<Value>| Ok(handler(args).into_outcome())),
        })
    }

    /// Returns the declared signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invokes the handler after checking each value against the signature.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::SignatureMismatch`] when the values do not line up
    /// with the declared shapes.
    pub fn invoke(&self, args: Vec<Value>) -> Result<StepOutcome, StepError> {
        let params = self.signature.params();
        for (position, expected) in params.iter().copied().enumerate() {
            if args.get(position).map(Value::kind) != Some(expected) {
                return Err(StepError::SignatureMismatch { position, expected });
            }
        }
        (self.call)(args)
    }
}

impl fmt::Debug for StepHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHandler")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
