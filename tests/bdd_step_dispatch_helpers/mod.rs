//! Behavioural step helpers for step dispatch scenarios.

mod assertions;
mod state;
mod steps;

pub use state::{DispatchState, dispatch_state};
