//! Configuration for the step dispatcher.
//!
//! The dispatcher itself needs very little configuration: how numeric captures
//! that fail to parse are treated, and whether patterns must span the whole
//! step line. Values are merged by the `ortho_config` crate from defaults, a
//! TOML file and `STEPWISE_*` environment variables.
//!
//! # Example Configuration
//!
//! ```toml
//! numeric_coercion = "strict"
//! anchor_patterns = true
//! ```

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{CONFIG_PATH_ENV_VAR, env_var_names, load_config};
pub use types::{DispatchConfig, NumericPolicy};
