//! Multi-step application launcher wizard.
//!
//! A [`WizardContext`] holds the step registry and the shared [`Summary`](crate::types::Summary).
//! Steps implement [`LauncherStep`]; the [`Launcher`] host owns them, routes user actions and
//! dispatches cross-step events after every action.

mod context;
mod events;
mod launcher;
mod step;
pub mod steps;

pub use context::{FieldValidity, WizardContext, WizardStep};
pub use events::{EventBus, Subscriptions, WizardEvent};
pub use launcher::{Launcher, StepComponent};
pub use step::LauncherStep;
pub use steps::{MissionRuntimeStep, ProjectSummaryStep, ReleaseStrategyStep};
