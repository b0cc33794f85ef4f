//! Unit tests for dispatcher configuration.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Basic type and serialisation tests
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests
//! - [`env_tests`] - Environment variable collection through `MockEnv`

mod helpers;
