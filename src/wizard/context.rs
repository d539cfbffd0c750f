//! Wizard session state: the ordered step registry, the active step pointer,
//! the shared summary and the one-shot selection.

use tokio::sync::broadcast;
use tracing::{debug, info};

use super::events::{EventBus, WizardEvent};
use crate::error::LauncherError;
use crate::types::{Selection, Summary};

/// Registry entry for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub id: String,
    pub optional: bool,
    pub hidden: bool,
    pub completed: bool,
}

impl WizardStep {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            optional: false,
            hidden: false,
            completed: false,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Whether this step lets the wizard advance past it
    fn satisfied(&self) -> bool {
        self.optional || self.completed
    }
}

/// Verdicts of the dependency-check validators; `None` until checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldValidity {
    pub project_name: Option<bool>,
    pub project_version: Option<bool>,
    pub artifact_id: Option<bool>,
    pub group_id: Option<bool>,
}

impl FieldValidity {
    pub fn all_valid(&self) -> bool {
        [
            self.project_name,
            self.project_version,
            self.artifact_id,
            self.group_id,
        ]
        .iter()
        .all(|v| v.unwrap_or(true))
    }
}

/// State shared by every step of one wizard session
pub struct WizardContext {
    steps: Vec<WizardStep>,
    active: Option<usize>,
    selection: Option<Selection>,
    events: EventBus,
    /// Accumulated user choices; any step may read or write any field
    pub summary: Summary,
    /// Link to the creation job, set once setup succeeds
    pub status_link: Option<String>,
    pub field_validity: FieldValidity,
}

impl WizardContext {
    pub fn new(selection: Option<Selection>) -> Self {
        Self {
            steps: Vec::new(),
            active: None,
            selection,
            events: EventBus::new(),
            summary: Summary::default(),
            status_link: None,
            field_validity: FieldValidity::default(),
        }
    }

    /// Append a step unless one with the same id is already registered.
    ///
    /// Returns false for the duplicate case, which is otherwise a no-op.
    /// The first registered step becomes the active one.
    pub fn register_step(&mut self, step: WizardStep) -> bool {
        if self.index_of(&step.id).is_some() {
            debug!(step = %step.id, "Step already registered");
            return false;
        }

        debug!(step = %step.id, position = self.steps.len(), "Registered step");
        self.steps.push(step);
        if self.active.is_none() {
            self.active = Some(0);
        }
        true
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn step(&self, id: &str) -> Option<&WizardStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    fn step_mut(&mut self, id: &str) -> Result<&mut WizardStep, LauncherError> {
        self.steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LauncherError::UnknownStep(id.to_string()))
    }

    pub fn set_step_completed(&mut self, id: &str, completed: bool) -> Result<(), LauncherError> {
        let step = self.step_mut(id)?;
        if step.completed != completed {
            debug!(step = %id, completed, "Step completion changed");
            step.completed = completed;
        }
        Ok(())
    }

    pub fn set_step_hidden(&mut self, id: &str, hidden: bool) -> Result<(), LauncherError> {
        self.step_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// True when every visible step before the last one is optional or completed.
    ///
    /// The last step is the submit step and judges its own completeness.
    pub fn is_wizard_complete(&self) -> bool {
        let Some((_, prior)) = self.steps.split_last() else {
            return true;
        };
        prior
            .iter()
            .filter(|s| !s.hidden)
            .all(WizardStep::satisfied)
    }

    pub fn active_step(&self) -> Option<&str> {
        self.active.map(|i| self.steps[i].id.as_str())
    }

    /// Move the active pointer to the step registered right after `current`
    pub fn navigate_to_next(&mut self, current: &str) -> Result<&str, LauncherError> {
        let index = self
            .index_of(current)
            .ok_or_else(|| LauncherError::UnknownStep(current.to_string()))?;
        let next = index + 1;
        if next >= self.steps.len() {
            return Err(LauncherError::NoNextStep(current.to_string()));
        }

        self.active = Some(next);
        info!(from = %current, to = %self.steps[next].id, "Advanced to next step");
        Ok(&self.steps[next].id)
    }

    /// Jump straight to a step, e.g. to edit an earlier choice from the summary
    pub fn navigate_to_step(&mut self, id: &str) -> Result<(), LauncherError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| LauncherError::UnknownStep(id.to_string()))?;
        self.active = Some(index);
        info!(step = %id, "Jumped to step");
        Ok(())
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.events.subscribe()
    }

    pub fn broadcast(&self, event: WizardEvent) {
        self.events.publish(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(steps: Vec<WizardStep>) -> WizardContext {
        let mut ctx = WizardContext::default();
        for step in steps {
            ctx.register_step(step);
        }
        ctx
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut ctx = WizardContext::default();
        assert!(ctx.register_step(WizardStep::new("MissionRuntime")));
        assert!(!ctx.register_step(WizardStep::new("MissionRuntime").optional(true)));

        assert_eq!(ctx.steps().len(), 1);
        assert!(!ctx.steps()[0].optional);
    }

    #[test]
    fn test_registration_order_preserved() {
        let ctx = context_with(vec![
            WizardStep::new("a"),
            WizardStep::new("b"),
            WizardStep::new("c"),
        ]);
        let ids: Vec<&str> = ctx.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(ctx.active_step(), Some("a"));
    }

    #[test]
    fn test_empty_and_single_step_wizard_complete() {
        assert!(WizardContext::default().is_wizard_complete());
        assert!(context_with(vec![WizardStep::new("summary")]).is_wizard_complete());
    }

    #[test]
    fn test_incomplete_required_step_blocks_completion() {
        let mut ctx = context_with(vec![
            WizardStep::new("mission"),
            WizardStep::new("pipeline"),
            WizardStep::new("summary"),
        ]);
        ctx.set_step_completed("mission", true).unwrap();
        assert!(!ctx.is_wizard_complete());

        ctx.set_step_completed("pipeline", true).unwrap();
        assert!(ctx.is_wizard_complete());
    }

    #[test]
    fn test_optional_and_hidden_steps_do_not_block() {
        let ctx = context_with(vec![
            WizardStep::new("optional").optional(true),
            WizardStep::new("hidden").hidden(true),
            WizardStep::new("summary"),
        ]);
        assert!(ctx.is_wizard_complete());
    }

    #[test]
    fn test_last_step_excluded_from_completion() {
        let mut ctx = context_with(vec![WizardStep::new("mission"), WizardStep::new("summary")]);
        ctx.set_step_completed("mission", true).unwrap();
        assert!(!ctx.step("summary").unwrap().completed);
        assert!(ctx.is_wizard_complete());
    }

    #[test]
    fn test_hiding_an_incomplete_step_unblocks() {
        let mut ctx = context_with(vec![WizardStep::new("pipeline"), WizardStep::new("summary")]);
        assert!(!ctx.is_wizard_complete());
        ctx.set_step_hidden("pipeline", true).unwrap();
        assert!(ctx.is_wizard_complete());
    }

    #[test]
    fn test_navigate_to_next() {
        let mut ctx = context_with(vec![WizardStep::new("a"), WizardStep::new("b")]);

        assert_eq!(ctx.navigate_to_next("a").unwrap(), "b");
        assert_eq!(ctx.active_step(), Some("b"));

        assert!(matches!(
            ctx.navigate_to_next("b"),
            Err(LauncherError::NoNextStep(id)) if id == "b"
        ));
        assert!(matches!(
            ctx.navigate_to_next("missing"),
            Err(LauncherError::UnknownStep(_))
        ));
        assert_eq!(ctx.active_step(), Some("b"));
    }

    #[test]
    fn test_navigate_to_step() {
        let mut ctx = context_with(vec![WizardStep::new("a"), WizardStep::new("b")]);
        ctx.navigate_to_step("b").unwrap();
        ctx.navigate_to_step("a").unwrap();
        assert_eq!(ctx.active_step(), Some("a"));
        assert!(ctx.navigate_to_step("c").is_err());
    }

    #[test]
    fn test_field_validity_unchecked_counts_as_valid() {
        let mut validity = FieldValidity::default();
        assert!(validity.all_valid());
        validity.group_id = Some(false);
        assert!(!validity.all_valid());
    }
}
