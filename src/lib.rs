//! Launcher - multi-step application launcher wizard
//!
//! Tracks the wizard's steps and their completion, restores choices from a
//! deep-link selection, keeps pipeline choices consistent with the runtime,
//! and validates project names against the target space with debouncing.

pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod types;
pub mod validation;
pub mod wizard;

pub use error::LauncherError;
