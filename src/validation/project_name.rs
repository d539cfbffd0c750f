//! Project name validation against the pattern and the names already in the space.
//!
//! [`ProjectNameValidator::validate`] runs the two checks once. [`ProjectNameValidator::spawn`]
//! wraps them in a task that debounces keystrokes: a value is only checked after the input has
//! been quiet for the configured window and identical consecutive values are checked once.
//! A lookup still in flight when a different value arrives is dropped so its result is never
//! reported against a stale value. A failed lookup does not count as a check.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{ValidationErrorKind, ValidationErrors};
use crate::config::ValidatorConfig;
use crate::error::LauncherError;
use crate::services::DependencyCheckService;

/// Checks a candidate project name
#[derive(Clone)]
pub struct ProjectNameValidator {
    checks: Arc<dyn DependencyCheckService>,
    pattern: Regex,
    debounce: Duration,
}

/// Result reported for one stabilized input value
#[derive(Debug)]
pub struct ValidationOutcome {
    pub value: String,
    pub result: Result<ValidationErrors, LauncherError>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(&self.result, Ok(errors) if errors.is_valid())
    }
}

impl ProjectNameValidator {
    pub fn new(
        checks: Arc<dyn DependencyCheckService>,
        config: &ValidatorConfig,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            checks,
            pattern: Regex::new(&config.project_name_pattern)?,
            debounce: config.debounce(),
        })
    }

    /// Pattern check, then (only when it passes) the uniqueness lookup
    pub async fn validate(&self, value: &str) -> anyhow::Result<ValidationErrors> {
        if !self.pattern.is_match(value) {
            return Ok(ValidationErrors::single(ValidationErrorKind::Pattern, value));
        }

        let names: Vec<String> = self
            .checks
            .get_applications_in_a_space()
            .await?
            .into_iter()
            .map(|app| app.attributes.name.unwrap_or_default().to_lowercase())
            .collect();

        // Stored names are lowercased, the candidate is compared as submitted
        if names.iter().any(|name| name == value) {
            Ok(ValidationErrors::single(ValidationErrorKind::Duplicate, value))
        } else {
            Ok(ValidationErrors::valid())
        }
    }

    /// Start the debouncing task; dropping the returned handle stops it
    pub fn spawn(self) -> DebouncedValidator {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(input_rx, output_tx));

        DebouncedValidator {
            input: input_tx,
            results: output_rx,
            task,
        }
    }

    async fn run(
        self,
        mut input: mpsc::UnboundedReceiver<String>,
        output: mpsc::UnboundedSender<ValidationOutcome>,
    ) {
        let mut last_checked: Option<String> = None;
        let Some(mut pending) = input.recv().await else {
            return;
        };

        loop {
            // Wait for the input to go quiet
            loop {
                let next = tokio::select! {
                    next = input.recv() => Some(next),
                    () = tokio::time::sleep(self.debounce) => None,
                };
                match next {
                    Some(Some(value)) => pending = value,
                    Some(None) => return,
                    None => break,
                }
            }

            if last_checked.as_deref() == Some(pending.as_str()) {
                debug!(value = %pending, "Project name unchanged, skipping check");
                match input.recv().await {
                    Some(value) => pending = value,
                    None => return,
                }
                continue;
            }

            let candidate = pending.clone();
            let step = {
                let check = self.validate(&candidate);
                tokio::pin!(check);
                loop {
                    tokio::select! {
                        result = &mut check => break CheckStep::Finished(result),
                        next = input.recv() => match next {
                            Some(value) if value == candidate => {
                                debug!(value = %value, "Same project name resubmitted during check");
                            }
                            next => break CheckStep::Superseded(next),
                        },
                    }
                }
            };

            match step {
                CheckStep::Finished(result) => {
                    debug!(value = %candidate, ok = result.is_ok(), "Project name checked");
                    // A failed lookup gives no verdict, so the same value may be retried
                    last_checked = result.is_ok().then(|| candidate.clone());
                    let outcome = ValidationOutcome {
                        value: candidate,
                        result: result.map_err(LauncherError::Service),
                    };
                    if output.send(outcome).is_err() {
                        return;
                    }
                    match input.recv().await {
                        Some(value) => pending = value,
                        None => return,
                    }
                }
                CheckStep::Superseded(Some(value)) => {
                    debug!(stale = %candidate, value = %value, "Dropping stale project name check");
                    pending = value;
                }
                CheckStep::Superseded(None) => return,
            }
        }
    }
}

enum CheckStep {
    Finished(anyhow::Result<ValidationErrors>),
    Superseded(Option<String>),
}

/// Handle to a running debounced validator
pub struct DebouncedValidator {
    input: mpsc::UnboundedSender<String>,
    results: mpsc::UnboundedReceiver<ValidationOutcome>,
    task: JoinHandle<()>,
}

impl DebouncedValidator {
    /// Feed the latest field value
    pub fn submit(&self, value: impl Into<String>) -> Result<(), LauncherError> {
        self.input.send(value.into()).map_err(|_| {
            warn!("Project name submitted after validator stopped");
            LauncherError::ValidatorClosed
        })
    }

    /// Next stabilized result, or `None` once the validator has stopped
    pub async fn next_result(&mut self) -> Option<ValidationOutcome> {
        self.results.recv().await
    }
}

impl Drop for DebouncedValidator {
    fn drop(&mut self) {
        self.task.abort();
    }
}
