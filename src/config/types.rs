//! Configuration data types for step dispatch.

use clap::ValueEnum;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// How captured substrings that fail numeric parsing are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Substitute zero for unparsable text and clamp out-of-range integers.
    #[default]
    Lenient,
    /// Abort the step with [`crate::error::StepError::InvalidNumber`].
    Strict,
}

/// Dispatcher configuration.
///
/// Loaded with layered precedence: defaults, configuration file, then
/// environment variables. Configuration files are discovered in this order:
/// 1. Path specified via `STEPWISE_CONFIG_PATH`
/// 2. `.stepwise.toml` in the current working directory
/// 3. `.stepwise.toml` in the home directory
/// 4. `~/.config/stepwise/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "STEPWISE",
    discovery(
        app_name = "stepwise",
        env_var = "STEPWISE_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".stepwise.toml",
    )
)]
pub struct DispatchConfig {
    /// Numeric coercion policy for `i32`, `i64` and `f64` parameters.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub numeric_coercion: NumericPolicy,

    /// Require patterns to match the whole step line.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub anchor_patterns: bool,
}
