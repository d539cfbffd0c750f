//! Field validation for the project summary step.

pub mod dependency;
mod errors;
mod project_name;

pub use errors::{ErrorPayload, ValidationErrorKind, ValidationErrors};
pub use project_name::{DebouncedValidator, ProjectNameValidator, ValidationOutcome};

/// Lowercase start, 4 to 64 characters of lowercase alphanumerics and hyphens
pub const PROJECT_NAME_PATTERN: &str = r"^[a-z][a-z0-9-]{3,63}$";
