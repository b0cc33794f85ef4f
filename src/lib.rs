//! Regex-driven step dispatch for behaviour-driven test suites.
//!
//! `stepwise` maps natural-language step lines such as
//! `I have 5 cukes in my belly` onto ordinary Rust closures. Handlers are
//! registered against regular expressions; when a step line is dispatched,
//! every binding whose pattern matches is invoked with the captured groups
//! coerced to the handler's parameter types.
//!
//! ```
//! use stepwise::{ExecutionContext, Reporter};
//!
//! let mut context = ExecutionContext::new();
//! context
//!     .given(r"^I have (\d+) cukes in my belly$", |reporter: Reporter, count: i32| {
//!         if count > 10 {
//!             reporter.fail("too many cukes");
//!         }
//!     })
//!     .expect("pattern compiles");
//!
//! let (reporter, sink) = Reporter::recording("belly");
//! let summary = context
//!     .execute_for_test(reporter, "I have 12 cukes in my belly", None)
//!     .expect("step dispatches");
//!
//! assert_eq!(summary.invoked, 1);
//! assert_eq!(sink.failures(), vec![String::from("too many cukes")]);
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Pattern compilation and the ordered list of step bindings
//! - [`dispatch`]: Matching a line, coercing arguments, invoking handlers
//! - [`handler`]: Typed and dynamic handlers with their parameter signatures
//! - [`argument`]: Tables and doc strings attached to a step
//! - [`reporter`]: The pass/fail handle given to handlers
//! - [`config`]: Dispatcher configuration with layered precedence
//! - [`error`]: Semantic error types

pub mod argument;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod registry;
pub mod reporter;

pub use argument::{StepArgument, Table};
pub use dispatch::{DispatchSummary, ExecutionContext};
pub use error::{StepError, StepwiseError};
pub use handler::{StepHandler, StepOutcome};
pub use registry::{StepKind, StepRegistry};
pub use reporter::{RecordingSink, ReportSink, Reporter};
