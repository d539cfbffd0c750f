//! Final step: project metadata, review, and the setup call that creates the application

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::error::LauncherError;
use crate::services::{DependencyCheckService, ProjectSummaryService};
use crate::wizard::context::{FieldValidity, WizardContext};
use crate::wizard::events::Subscriptions;
use crate::wizard::step::LauncherStep;

pub struct ProjectSummaryStep {
    id: String,
    checks: Arc<dyn DependencyCheckService>,
    service: Arc<dyn ProjectSummaryService>,
    space_id: String,
    space_name: String,
    completed: bool,
    subscriptions: Subscriptions,
}

impl ProjectSummaryStep {
    pub const DEFAULT_ID: &'static str = "ProjectSummary";

    pub fn new(
        checks: Arc<dyn DependencyCheckService>,
        service: Arc<dyn ProjectSummaryService>,
    ) -> Self {
        Self::with_id(Self::DEFAULT_ID, checks, service)
    }

    pub fn with_id(
        id: impl Into<String>,
        checks: Arc<dyn DependencyCheckService>,
        service: Arc<dyn ProjectSummaryService>,
    ) -> Self {
        Self {
            id: id.into(),
            checks,
            service,
            space_id: String::new(),
            space_name: String::new(),
            completed: false,
            subscriptions: Subscriptions::new(),
        }
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn space_name(&self) -> &str {
        &self.space_name
    }

    pub fn validate_project_name(&self, ctx: &mut WizardContext) -> bool {
        let value = ctx.summary.dependency_check.project_name.clone();
        let valid = self
            .checks
            .validate_project_name(value.as_deref().unwrap_or_default());
        ctx.field_validity.project_name = Some(valid);
        valid
    }

    pub fn validate_project_version(&self, ctx: &mut WizardContext) -> bool {
        let value = ctx.summary.dependency_check.project_version.clone();
        let valid = self
            .checks
            .validate_project_version(value.as_deref().unwrap_or_default());
        ctx.field_validity.project_version = Some(valid);
        valid
    }

    pub fn validate_artifact_id(&self, ctx: &mut WizardContext) -> bool {
        let value = ctx.summary.dependency_check.maven_artifact.clone();
        let valid = self
            .checks
            .validate_artifact_id(value.as_deref().unwrap_or_default());
        ctx.field_validity.artifact_id = Some(valid);
        valid
    }

    pub fn validate_group_id(&self, ctx: &mut WizardContext) -> bool {
        let value = ctx.summary.dependency_check.group_id.clone();
        let valid = self
            .checks
            .validate_group_id(value.as_deref().unwrap_or_default());
        ctx.field_validity.group_id = Some(valid);
        valid
    }

    /// Run every field validator and return the verdicts
    pub fn validate_all(&self, ctx: &mut WizardContext) -> FieldValidity {
        self.validate_project_name(ctx);
        self.validate_project_version(ctx);
        self.validate_artifact_id(ctx);
        self.validate_group_id(ctx);
        ctx.field_validity
    }

    /// Mark this step with the wizard-wide completion and advance.
    ///
    /// This is the last step, so having nowhere to advance to is not an error.
    pub fn nav_to_next_step(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        self.init_completed(ctx);
        match ctx.navigate_to_next(&self.id) {
            Ok(_) => Ok(()),
            Err(LauncherError::NoNextStep(_)) => {
                debug!(step = %self.id, "Wizard finished");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Jump back to an earlier step to edit it
    pub fn nav_to_step(&self, id: &str, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        ctx.navigate_to_step(id)
    }

    /// Submit the summary to the backend and record the status link
    #[instrument(skip(self, ctx), fields(step = %self.id))]
    pub async fn setup(&mut self, ctx: &mut WizardContext) -> Result<String, LauncherError> {
        if !ctx.is_wizard_complete() {
            warn!("Setup requested with incomplete steps");
            return Err(LauncherError::WizardIncomplete);
        }

        let response = self
            .service
            .setup(&ctx.summary, &self.space_id, &self.space_name, false)
            .await
            .map_err(|e| {
                warn!(error = %e, "Setup request failed");
                LauncherError::Service(e)
            })?;

        let Some(link) = response.uuid_link else {
            warn!("Setup response carried no status link");
            return Err(LauncherError::MissingStatusLink);
        };

        info!(status_link = %link, "Application setup started");
        ctx.status_link = Some(link.clone());
        self.nav_to_next_step(ctx)?;
        Ok(link)
    }

    fn init_completed(&mut self, ctx: &mut WizardContext) {
        self.completed = ctx.is_wizard_complete();
        self.update_completion(ctx);
    }

    fn restore_summary(&mut self, ctx: &mut WizardContext) {
        let Some(selection) = ctx.selection().cloned() else {
            return;
        };

        let check = &mut ctx.summary.dependency_check;
        check.group_id = selection.group_id;
        check.project_name = selection.project_name;
        check.project_version = selection.project_version;
        check.space_path = selection.space_path;
        if selection.artifact_id.is_some() {
            check.maven_artifact = selection.artifact_id;
        }
        self.init_completed(ctx);
    }

    async fn load_space(&mut self, ctx: &mut WizardContext) {
        match self.service.get_current_context().await {
            Ok(context) => {
                ctx.summary.dependency_check.space_path = Some(context.path);
                self.space_name = format!("/{}", context.name);
                self.space_id = context.space.map(|s| s.id).unwrap_or_default();
                debug!(space = %self.space_name, "Loaded space context");
            }
            Err(e) => warn!(error = %e, "Failed to load space context"),
        }
    }
}

#[async_trait]
impl LauncherStep for ProjectSummaryStep {
    fn id(&self) -> &str {
        &self.id
    }

    async fn init(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        ctx.register_step(self.descriptor());
        self.restore_summary(ctx);
        self.load_space(ctx).await;
        Ok(())
    }

    fn completed(&self, _ctx: &WizardContext) -> bool {
        self.completed
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }
}
