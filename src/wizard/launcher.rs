//! Wizard host: owns the context and the live steps, routes user actions and
//! dispatches events after each one so cross-step rules settle before the next action.

use tracing::{debug, info, warn};

use super::context::{FieldValidity, WizardContext};
use super::step::LauncherStep;
use super::steps::{MissionRuntimeStep, ProjectSummaryStep, ReleaseStrategyStep};
use crate::error::LauncherError;
use crate::types::{Selection, Summary};

/// Upper bound on event ping-pong between steps within one dispatch
const MAX_DISPATCH_ROUNDS: usize = 8;

/// The step variants a launcher can host
pub enum StepComponent {
    MissionRuntime(MissionRuntimeStep),
    ReleaseStrategy(ReleaseStrategyStep),
    ProjectSummary(ProjectSummaryStep),
}

impl StepComponent {
    fn as_step(&self) -> &dyn LauncherStep {
        match self {
            StepComponent::MissionRuntime(s) => s,
            StepComponent::ReleaseStrategy(s) => s,
            StepComponent::ProjectSummary(s) => s,
        }
    }

    fn as_step_mut(&mut self) -> &mut dyn LauncherStep {
        match self {
            StepComponent::MissionRuntime(s) => s,
            StepComponent::ReleaseStrategy(s) => s,
            StepComponent::ProjectSummary(s) => s,
        }
    }

    pub fn id(&self) -> &str {
        self.as_step().id()
    }
}

impl From<MissionRuntimeStep> for StepComponent {
    fn from(step: MissionRuntimeStep) -> Self {
        StepComponent::MissionRuntime(step)
    }
}

impl From<ReleaseStrategyStep> for StepComponent {
    fn from(step: ReleaseStrategyStep) -> Self {
        StepComponent::ReleaseStrategy(step)
    }
}

impl From<ProjectSummaryStep> for StepComponent {
    fn from(step: ProjectSummaryStep) -> Self {
        StepComponent::ProjectSummary(step)
    }
}

pub struct Launcher {
    ctx: WizardContext,
    components: Vec<StepComponent>,
}

impl Launcher {
    pub fn new(selection: Option<Selection>) -> Self {
        Self {
            ctx: WizardContext::new(selection),
            components: Vec::new(),
        }
    }

    pub fn context(&self) -> &WizardContext {
        &self.ctx
    }

    pub fn summary(&self) -> &Summary {
        &self.ctx.summary
    }

    /// Direct access for free-form fields such as the project name
    pub fn summary_mut(&mut self) -> &mut Summary {
        &mut self.ctx.summary
    }

    pub fn is_wizard_complete(&self) -> bool {
        self.ctx.is_wizard_complete()
    }

    pub fn active_step(&self) -> Option<&str> {
        self.ctx.active_step()
    }

    pub fn status_link(&self) -> Option<&str> {
        self.ctx.status_link.as_deref()
    }

    /// Initialize a step and start hosting it; a second step with a known id is ignored
    pub async fn add_step(&mut self, step: impl Into<StepComponent>) -> Result<(), LauncherError> {
        let mut component = step.into();
        if self.components.iter().any(|c| c.id() == component.id()) {
            debug!(step = %component.id(), "Step already hosted");
            return Ok(());
        }

        component.as_step_mut().init(&mut self.ctx).await?;
        info!(step = %component.id(), "Step initialized");
        self.components.push(component);
        self.dispatch();
        Ok(())
    }

    pub fn mission_runtime(&self) -> Option<&MissionRuntimeStep> {
        self.components.iter().find_map(|c| match c {
            StepComponent::MissionRuntime(s) => Some(s),
            _ => None,
        })
    }

    pub fn release_strategy(&self) -> Option<&ReleaseStrategyStep> {
        self.components.iter().find_map(|c| match c {
            StepComponent::ReleaseStrategy(s) => Some(s),
            _ => None,
        })
    }

    pub fn project_summary(&self) -> Option<&ProjectSummaryStep> {
        self.components.iter().find_map(|c| match c {
            StepComponent::ProjectSummary(s) => Some(s),
            _ => None,
        })
    }

    pub fn select_mission(&mut self, mission_id: &str) -> Result<(), LauncherError> {
        let step = mission_runtime_mut(&mut self.components)?;
        step.select_mission(mission_id, &mut self.ctx)?;
        self.dispatch();
        Ok(())
    }

    pub fn select_runtime(&mut self, runtime_id: &str) -> Result<(), LauncherError> {
        let step = mission_runtime_mut(&mut self.components)?;
        step.select_runtime(runtime_id, &mut self.ctx)?;
        self.dispatch();
        Ok(())
    }

    pub fn select_runtime_version(&mut self, version_id: &str) -> Result<(), LauncherError> {
        let step = mission_runtime_mut(&mut self.components)?;
        step.select_runtime_version(version_id, &mut self.ctx)?;
        self.dispatch();
        Ok(())
    }

    pub fn is_runtime_disabled(&self, runtime_id: &str) -> bool {
        self.mission_runtime()
            .and_then(|step| {
                step.runtimes()
                    .iter()
                    .find(|r| r.id == runtime_id)
                    .map(|r| step.is_runtime_disabled(r, &self.ctx))
            })
            .unwrap_or(false)
    }

    pub fn select_pipeline(&mut self, pipeline_id: Option<&str>) -> Result<(), LauncherError> {
        let step = release_strategy_mut(&mut self.components)?;
        step.select_pipeline(pipeline_id, &mut self.ctx)?;
        self.dispatch();
        Ok(())
    }

    pub fn validate_project_fields(&mut self) -> Result<FieldValidity, LauncherError> {
        let step = project_summary_mut(&mut self.components)?;
        Ok(step.validate_all(&mut self.ctx))
    }

    /// Advance from the given step through that step's own navigation
    pub fn nav_to_next_step(&mut self, step_id: &str) -> Result<(), LauncherError> {
        let component = self
            .components
            .iter_mut()
            .find(|c| c.id() == step_id)
            .ok_or_else(|| LauncherError::UnknownStep(step_id.to_string()))?;

        match component {
            StepComponent::MissionRuntime(s) => s.nav_to_next_step(&mut self.ctx)?,
            StepComponent::ReleaseStrategy(s) => s.nav_to_next_step(&mut self.ctx)?,
            StepComponent::ProjectSummary(s) => s.nav_to_next_step(&mut self.ctx)?,
        }
        self.dispatch();
        Ok(())
    }

    pub fn nav_to_step(&mut self, step_id: &str) -> Result<(), LauncherError> {
        self.ctx.navigate_to_step(step_id)
    }

    /// Submit through the summary step; returns the status link
    pub async fn setup(&mut self) -> Result<String, LauncherError> {
        let step = project_summary_mut(&mut self.components)?;
        let result = step.setup(&mut self.ctx).await;
        self.dispatch();
        result
    }

    /// Stop hosting a step and release its subscriptions; its registry entry stays
    pub fn teardown_step(&mut self, step_id: &str) -> bool {
        let Some(index) = self.components.iter().position(|c| c.id() == step_id) else {
            return false;
        };
        let mut component = self.components.remove(index);
        component.as_step_mut().teardown();
        info!(step = %step_id, "Step torn down");
        true
    }

    pub fn teardown(&mut self) {
        for component in &mut self.components {
            component.as_step_mut().teardown();
        }
        self.components.clear();
    }

    /// Deliver pending events to every hosted step, then refresh completion flags
    fn dispatch(&mut self) {
        for round in 0..MAX_DISPATCH_ROUNDS {
            let mut handled = 0;
            for component in &mut self.components {
                handled += component.as_step_mut().process_events(&mut self.ctx);
            }
            if handled == 0 {
                break;
            }
            if round + 1 == MAX_DISPATCH_ROUNDS {
                warn!("Wizard events still pending after dispatch limit");
            }
        }

        for component in &self.components {
            component.as_step().update_completion(&mut self.ctx);
        }
    }
}

impl Drop for Launcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn mission_runtime_mut(
    components: &mut [StepComponent],
) -> Result<&mut MissionRuntimeStep, LauncherError> {
    components
        .iter_mut()
        .find_map(|c| match c {
            StepComponent::MissionRuntime(s) => Some(s),
            _ => None,
        })
        .ok_or_else(|| LauncherError::UnknownStep(MissionRuntimeStep::DEFAULT_ID.to_string()))
}

fn release_strategy_mut(
    components: &mut [StepComponent],
) -> Result<&mut ReleaseStrategyStep, LauncherError> {
    components
        .iter_mut()
        .find_map(|c| match c {
            StepComponent::ReleaseStrategy(s) => Some(s),
            _ => None,
        })
        .ok_or_else(|| LauncherError::UnknownStep(ReleaseStrategyStep::DEFAULT_ID.to_string()))
}

fn project_summary_mut(
    components: &mut [StepComponent],
) -> Result<&mut ProjectSummaryStep, LauncherError> {
    components
        .iter_mut()
        .find_map(|c| match c {
            StepComponent::ProjectSummary(s) => Some(s),
            _ => None,
        })
        .ok_or_else(|| LauncherError::UnknownStep(ProjectSummaryStep::DEFAULT_ID.to_string()))
}
