//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use mockable::MockEnv;
use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::{DispatchConfig, NumericPolicy};

/// Fixture providing a `DispatchConfig` parsed from a full TOML example.
#[fixture]
pub fn dispatch_config_from_full_toml() -> DispatchConfig {
    let toml = r#"
        numeric_coercion = "strict"
        anchor_patterns = true
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing a `MockEnv` that returns `None` for every variable.
#[fixture]
pub fn empty_env() -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(|_| None);
    env
}

/// Helper: Builds a `MockEnv` answering from a fixed list of variables.
pub fn env_with(vars: &[(&'static str, &'static str)]) -> MockEnv {
    let owned: Vec<(&'static str, &'static str)> = vars.to_vec();
    let mut env = MockEnv::new();
    env.expect_string().returning(move |key| {
        owned
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| String::from(*value))
    });
    env
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, ortho_config::serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(DispatchConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `DispatchConfig`.
pub fn merge_config(
    composer: MergeComposer,
) -> Result<DispatchConfig, Arc<ortho_config::OrthoError>> {
    DispatchConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &DispatchConfig) {
    assert_eq!(
        config.numeric_coercion,
        NumericPolicy::Lenient,
        "numeric_coercion should be lenient"
    );
    assert!(!config.anchor_patterns, "anchor_patterns should be false");
}
