//! Error types for wizard navigation, step actions and validation.

use thiserror::Error;

/// Errors surfaced by the launcher wizard
#[derive(Debug, Error)]
pub enum LauncherError {
    /// No step with this id has been registered
    #[error("step '{0}' is not registered")]
    UnknownStep(String),

    /// Navigation past the last registered step
    #[error("step '{0}' is the last step, there is nothing to advance to")]
    NoNextStep(String),

    /// A selection referenced an id missing from the loaded options
    #[error("no {kind} with id '{id}'")]
    UnknownOption { kind: &'static str, id: String },

    /// Submit attempted while required steps are still open
    #[error("wizard has incomplete required steps")]
    WizardIncomplete,

    /// Setup call succeeded but returned no status link
    #[error("setup returned no status link")]
    MissingStatusLink,

    /// The debounced validator task has stopped
    #[error("project name validator is no longer running")]
    ValidatorClosed,

    /// A backend collaborator failed
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

impl LauncherError {
    pub(crate) fn unknown_option(kind: &'static str, id: impl Into<String>) -> Self {
        LauncherError::UnknownOption {
            kind,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LauncherError::UnknownStep("Pipeline".into()).to_string(),
            "step 'Pipeline' is not registered"
        );
        assert_eq!(
            LauncherError::unknown_option("runtime", "nodejs").to_string(),
            "no runtime with id 'nodejs'"
        );
    }

    #[test]
    fn test_service_error_is_transparent() {
        let err: LauncherError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
