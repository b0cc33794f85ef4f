//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: serialised [`DispatchConfig::default`], a
//! configuration file, and `STEPWISE_*` environment variables. Layers are
//! pushed into an `ortho_config::MergeComposer` by hand so that environment
//! values are validated up front: an unparseable typed value (for example
//! `STEPWISE_ANCHOR_PATTERNS=maybe`) is an error rather than a silent fallback
//! to the default.
//!
//! Environment access goes through `mockable::Env` so tests can supply
//! variables without touching the process environment.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{DispatchConfig, NumericPolicy};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// A [`NumericPolicy`] name (`lenient`/`strict`).
    Policy,
    /// Boolean value (`true`/`false`).
    Bool,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    env_var: &'static str,
    field: &'static str,
    var_type: EnvVarType,
}

const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "STEPWISE_NUMERIC_COERCION",
        field: "numeric_coercion",
        var_type: EnvVarType::Policy,
    },
    EnvVarSpec {
        env_var: "STEPWISE_ANCHOR_PATTERNS",
        field: "anchor_patterns",
        var_type: EnvVarType::Bool,
    },
];

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV_VAR: &str = "STEPWISE_CONFIG_PATH";

/// Returns the environment variable names recognised by the loader.
///
/// [`CONFIG_PATH_ENV_VAR`] is handled by file discovery and is not included.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Read a TOML configuration file through `cap_std`.
fn read_config_file(path: &Utf8Path) -> Result<Value> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value = toml::from_str::<Value>(&content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse {path}: {e}"),
    })?;
    Ok(value)
}

/// Locate the configuration file, preferring an explicit path that exists.
fn discover_config_path(explicit: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
    explicit
        .filter(|path| path.exists())
        .map(Utf8Path::to_path_buf)
        .or_else(|| {
            let discovery = ConfigDiscovery::builder("stepwise")
                .env_var(CONFIG_PATH_ENV_VAR)
                .config_file_name("config.toml")
                .dotfile_name(".stepwise.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        })
}

/// Load dispatcher configuration with full layer precedence.
///
/// `explicit_path` is used when it names an existing file; otherwise the file
/// is discovered as described on [`DispatchConfig`]. Environment variables are
/// read through `env`; pass `mockable::DefaultEnv::new()` in production.
///
/// # Errors
///
/// Returns [`ConfigError`] if the configuration file cannot be read or parsed,
/// if a typed environment variable holds an invalid value, or if the layers
/// fail to merge.
pub fn load_config<E: mockable::Env>(
    explicit_path: Option<&Utf8Path>,
    env: &E,
) -> Result<DispatchConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(DispatchConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(path) = discover_config_path(explicit_path) {
        tracing::debug!(%path, "loading step dispatch configuration");
        let file_values = read_config_file(&path)?;
        composer.push_file(file_values, Some(path));
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let config =
        DispatchConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    Ok(config)
}

/// Collect `STEPWISE_*` variables into a JSON object, validating typed values.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when a typed variable cannot be parsed.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::Policy => {
                let policy = parse_policy(&raw_value).ok_or_else(|| ConfigError::InvalidValue {
                    field: spec.env_var.to_owned(),
                    reason: format!("expected 'lenient' or 'strict', got '{raw_value}'"),
                })?;
                serde_json::to_value(policy).map_err(|e| ConfigError::ParseError {
                    message: format!("failed to serialise {}: {e}", spec.env_var),
                })?
            }
        };

        root.insert(spec.field.to_owned(), json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

fn parse_policy(raw_value: &str) -> Option<NumericPolicy> {
    match raw_value.trim().to_ascii_lowercase().as_str() {
        "lenient" => Some(NumericPolicy::Lenient),
        "strict" => Some(NumericPolicy::Strict),
        _ => None,
    }
}
