//! Release strategy (pipeline) selection.
//!
//! Only pipelines built for the current runtime's platform are offered. When the
//! runtime changes, a selected pipeline for another platform is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::LauncherError;
use crate::services::PipelineService;
use crate::types::{Pipeline, Runtime};
use crate::wizard::context::WizardContext;
use crate::wizard::events::{Subscriptions, WizardEvent};
use crate::wizard::step::LauncherStep;

pub struct ReleaseStrategyStep {
    id: String,
    service: Arc<dyn PipelineService>,
    all_pipelines: Vec<Pipeline>,
    pipelines: Vec<Pipeline>,
    subscriptions: Subscriptions,
}

impl ReleaseStrategyStep {
    pub const DEFAULT_ID: &'static str = "ReleaseStrategy";

    pub fn new(service: Arc<dyn PipelineService>) -> Self {
        Self::with_id(Self::DEFAULT_ID, service)
    }

    pub fn with_id(id: impl Into<String>, service: Arc<dyn PipelineService>) -> Self {
        Self {
            id: id.into(),
            service,
            all_pipelines: Vec::new(),
            pipelines: Vec::new(),
            subscriptions: Subscriptions::new(),
        }
    }

    /// Pipelines currently offered
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn select_pipeline(
        &mut self,
        pipeline_id: Option<&str>,
        ctx: &mut WizardContext,
    ) -> Result<(), LauncherError> {
        let pipeline = match pipeline_id {
            Some(id) => Some(
                self.pipelines
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or_else(|| LauncherError::unknown_option("pipeline", id))?,
            ),
            None => None,
        };

        info!(pipeline = ?pipeline.as_ref().map(|p| &p.id), "Pipeline selection updated");
        self.update_pipeline_selection(pipeline, ctx);
        Ok(())
    }

    pub fn toggle_expanded(&mut self, pipeline_id: &str) {
        if let Some(pipeline) = self.pipelines.iter_mut().find(|p| p.id == pipeline_id) {
            pipeline.toggle_expanded();
        }
    }

    pub fn nav_to_next_step(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        self.update_completion(ctx);
        ctx.navigate_to_next(&self.id)?;

        let pipeline = ctx.summary.pipeline.as_ref().map(|p| p.name.as_str());
        ctx.broadcast(WizardEvent::telemetry(
            "completePipelineStep_Create",
            [("pipeline", pipeline)],
        ));
        Ok(())
    }

    fn update_pipeline_selection(&self, pipeline: Option<Pipeline>, ctx: &mut WizardContext) {
        ctx.summary.pipeline = pipeline;
        self.update_completion(ctx);
    }

    /// Offer only pipelines for the runtime's platform and drop a mismatched selection
    fn apply_runtime(&mut self, runtime: &Runtime, ctx: &mut WizardContext) {
        self.pipelines = self
            .all_pipelines
            .iter()
            .filter(|p| p.platform == runtime.pipeline_platform)
            .cloned()
            .collect();

        let selected_platform = ctx.summary.pipeline.as_ref().map(|p| p.platform.as_str());
        if selected_platform != Some(runtime.pipeline_platform.as_str()) {
            if selected_platform.is_some() {
                debug!(
                    runtime = %runtime.id,
                    platform = %runtime.pipeline_platform,
                    "Clearing pipeline selected for another platform"
                );
            }
            self.update_pipeline_selection(None, ctx);
        }
    }

    fn restore_summary(&self, ctx: &mut WizardContext) {
        let Some(pipeline_id) = ctx.selection().and_then(|s| s.pipeline_id.clone()) else {
            return;
        };

        match self.all_pipelines.iter().find(|p| p.id == pipeline_id) {
            Some(pipeline) => ctx.summary.pipeline = Some(pipeline.clone()),
            None => warn!(pipeline = %pipeline_id, "Selected pipeline not offered"),
        }
    }
}

#[async_trait]
impl LauncherStep for ReleaseStrategyStep {
    fn id(&self) -> &str {
        &self.id
    }

    async fn init(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        ctx.register_step(self.descriptor());
        self.subscriptions.push(ctx.subscribe());

        self.all_pipelines = self.service.get_pipelines().await?;
        self.pipelines = self.all_pipelines.clone();
        self.restore_summary(ctx);

        // A runtime chosen before this step subscribed still constrains the pipelines
        if let Some(runtime) = ctx.summary.runtime.clone() {
            self.apply_runtime(&runtime, ctx);
        }
        self.update_completion(ctx);
        Ok(())
    }

    fn completed(&self, ctx: &WizardContext) -> bool {
        ctx.summary.pipeline.is_some()
    }

    fn on_event(&mut self, event: &WizardEvent, ctx: &mut WizardContext) {
        if let WizardEvent::RuntimeChanged { runtime } = event {
            self.apply_runtime(runtime, ctx);
        }
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Selection;

    struct Pipelines;

    #[async_trait]
    impl PipelineService for Pipelines {
        async fn get_pipelines(&self) -> anyhow::Result<Vec<Pipeline>> {
            Ok(vec![
                pipeline("maven-release", "p1"),
                pipeline("maven-stage", "p1"),
                pipeline("node-release", "p2"),
            ])
        }
    }

    fn pipeline(id: &str, platform: &str) -> Pipeline {
        Pipeline {
            id: id.into(),
            name: id.to_uppercase(),
            platform: platform.into(),
            ..Default::default()
        }
    }

    fn runtime(id: &str, platform: &str) -> Runtime {
        Runtime {
            id: id.into(),
            name: id.into(),
            pipeline_platform: platform.into(),
            ..Default::default()
        }
    }

    async fn init_step(selection: Option<Selection>) -> (ReleaseStrategyStep, WizardContext) {
        let mut ctx = WizardContext::new(selection);
        let mut step = ReleaseStrategyStep::new(Arc::new(Pipelines));
        step.init(&mut ctx).await.unwrap();
        (step, ctx)
    }

    fn change_runtime(step: &mut ReleaseStrategyStep, ctx: &mut WizardContext, rt: Runtime) {
        ctx.summary.runtime = Some(rt.clone());
        ctx.broadcast(WizardEvent::RuntimeChanged { runtime: rt });
        step.process_events(ctx);
    }

    #[tokio::test]
    async fn test_init_subscribes_and_offers_all() {
        let (step, ctx) = init_step(None).await;
        assert_eq!(step.pipelines().len(), 3);
        assert_eq!(ctx.subscriber_count(), 1);
        assert!(!ctx.step("ReleaseStrategy").unwrap().completed);
    }

    #[tokio::test]
    async fn test_runtime_change_filters_pipelines() {
        let (mut step, mut ctx) = init_step(None).await;
        change_runtime(&mut step, &mut ctx, runtime("nodejs", "p2"));

        let ids: Vec<&str> = step.pipelines().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["node-release"]);
    }

    #[tokio::test]
    async fn test_platform_mismatch_clears_selection() {
        let (mut step, mut ctx) = init_step(None).await;
        change_runtime(&mut step, &mut ctx, runtime("r1", "p1"));
        step.select_pipeline(Some("maven-release"), &mut ctx).unwrap();
        assert!(ctx.step("ReleaseStrategy").unwrap().completed);

        change_runtime(&mut step, &mut ctx, runtime("r2", "p2"));

        assert!(ctx.summary.pipeline.is_none());
        assert!(!ctx.step("ReleaseStrategy").unwrap().completed);
    }

    #[tokio::test]
    async fn test_platform_match_keeps_selection() {
        let (mut step, mut ctx) = init_step(None).await;
        change_runtime(&mut step, &mut ctx, runtime("r1", "p1"));
        step.select_pipeline(Some("maven-release"), &mut ctx).unwrap();

        change_runtime(&mut step, &mut ctx, runtime("r3", "p1"));

        assert_eq!(ctx.summary.pipeline.as_ref().unwrap().id, "maven-release");
    }

    #[tokio::test]
    async fn test_cannot_select_pipeline_for_other_platform() {
        let (mut step, mut ctx) = init_step(None).await;
        change_runtime(&mut step, &mut ctx, runtime("r1", "p1"));

        let err = step.select_pipeline(Some("node-release"), &mut ctx).unwrap_err();
        assert!(matches!(err, LauncherError::UnknownOption { kind: "pipeline", .. }));
        assert!(ctx.summary.pipeline.is_none());
    }

    #[tokio::test]
    async fn test_restore_pipeline_from_selection() {
        let selection = Selection {
            pipeline_id: Some("maven-stage".into()),
            ..Default::default()
        };
        let (_step, ctx) = init_step(Some(selection)).await;
        assert_eq!(ctx.summary.pipeline.as_ref().unwrap().id, "maven-stage");
        assert!(ctx.step("ReleaseStrategy").unwrap().completed);
    }

    #[tokio::test]
    async fn test_restore_unknown_pipeline_leaves_unset() {
        let selection = Selection {
            pipeline_id: Some("x".into()),
            ..Default::default()
        };
        let (_step, ctx) = init_step(Some(selection)).await;
        assert!(ctx.summary.pipeline.is_none());
    }

    #[tokio::test]
    async fn test_existing_runtime_applied_at_init() {
        let mut ctx = WizardContext::new(Some(Selection {
            pipeline_id: Some("maven-stage".into()),
            ..Default::default()
        }));
        ctx.summary.runtime = Some(runtime("nodejs", "p2"));

        let mut step = ReleaseStrategyStep::new(Arc::new(Pipelines));
        step.init(&mut ctx).await.unwrap();

        assert_eq!(step.pipelines().len(), 1);
        assert!(ctx.summary.pipeline.is_none());
    }

    #[tokio::test]
    async fn test_teardown_stops_runtime_handling() {
        let (mut step, mut ctx) = init_step(None).await;
        change_runtime(&mut step, &mut ctx, runtime("r1", "p1"));
        step.select_pipeline(Some("maven-release"), &mut ctx).unwrap();

        step.teardown();
        assert_eq!(ctx.subscriber_count(), 0);

        change_runtime(&mut step, &mut ctx, runtime("r2", "p2"));
        assert_eq!(ctx.summary.pipeline.as_ref().unwrap().id, "maven-release");
    }

    #[tokio::test]
    async fn test_nav_emits_completion_telemetry() {
        let (mut step, mut ctx) = init_step(None).await;
        ctx.register_step(crate::wizard::WizardStep::new("ProjectSummary"));
        change_runtime(&mut step, &mut ctx, runtime("r1", "p1"));
        step.select_pipeline(Some("maven-release"), &mut ctx).unwrap();

        let mut observer = Subscriptions::new();
        observer.push(ctx.subscribe());
        step.nav_to_next_step(&mut ctx).unwrap();

        assert_eq!(ctx.active_step(), Some("ProjectSummary"));
        let events = observer.drain();
        assert_eq!(
            events,
            vec![WizardEvent::telemetry(
                "completePipelineStep_Create",
                [("pipeline", Some("MAVEN-RELEASE"))]
            )]
        );
    }

    #[tokio::test]
    async fn test_toggle_expanded() {
        let (mut step, _ctx) = init_step(None).await;
        step.toggle_expanded("maven-stage");
        assert_eq!(step.pipelines()[1].expanded, Some(true));
    }
}
