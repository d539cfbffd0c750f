//! Capability set every wizard step provides.

use async_trait::async_trait;
use tracing::debug;

use super::context::{WizardContext, WizardStep};
use super::events::{Subscriptions, WizardEvent};
use crate::error::LauncherError;

#[async_trait]
pub trait LauncherStep: Send {
    fn id(&self) -> &str;

    fn optional(&self) -> bool {
        false
    }

    fn hidden(&self) -> bool {
        false
    }

    /// Registry record for this step
    fn descriptor(&self) -> WizardStep {
        WizardStep::new(self.id())
            .optional(self.optional())
            .hidden(self.hidden())
    }

    /// Register with the context, load options and restore from the selection.
    /// Implementations register before anything else reads the registry.
    async fn init(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError>;

    /// Step-local completion condition
    fn completed(&self, ctx: &WizardContext) -> bool;

    fn on_event(&mut self, _event: &WizardEvent, _ctx: &mut WizardContext) {}

    fn subscriptions(&mut self) -> &mut Subscriptions;

    /// Push the current completion condition into the registry
    fn update_completion(&self, ctx: &mut WizardContext) {
        let completed = self.completed(ctx);
        if let Err(e) = ctx.set_step_completed(self.id(), completed) {
            debug!(step = %self.id(), error = %e, "Completion not recorded");
        }
    }

    /// Handle every event received since the last call; returns how many were handled
    fn process_events(&mut self, ctx: &mut WizardContext) -> usize {
        let events = self.subscriptions().drain();
        for event in &events {
            self.on_event(event, ctx);
        }
        events.len()
    }

    /// Release every subscription; the registry entry stays
    fn teardown(&mut self) {
        self.subscriptions().clear();
    }
}
