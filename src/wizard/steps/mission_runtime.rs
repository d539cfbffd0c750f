//! Mission and runtime selection

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::LauncherError;
use crate::services::MissionRuntimeService;
use crate::types::{Mission, Runtime};
use crate::wizard::context::WizardContext;
use crate::wizard::events::{Subscriptions, WizardEvent};
use crate::wizard::step::LauncherStep;

pub struct MissionRuntimeStep {
    id: String,
    service: Arc<dyn MissionRuntimeService>,
    missions: Vec<Mission>,
    runtimes: Vec<Runtime>,
    subscriptions: Subscriptions,
}

impl MissionRuntimeStep {
    pub const DEFAULT_ID: &'static str = "MissionRuntime";

    pub fn new(service: Arc<dyn MissionRuntimeService>) -> Self {
        Self::with_id(Self::DEFAULT_ID, service)
    }

    pub fn with_id(id: impl Into<String>, service: Arc<dyn MissionRuntimeService>) -> Self {
        Self {
            id: id.into(),
            service,
            missions: Vec::new(),
            runtimes: Vec::new(),
            subscriptions: Subscriptions::new(),
        }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn runtimes(&self) -> &[Runtime] {
        &self.runtimes
    }

    pub fn select_mission(
        &mut self,
        mission_id: &str,
        ctx: &mut WizardContext,
    ) -> Result<(), LauncherError> {
        let mission = self
            .missions
            .iter()
            .find(|m| m.id == mission_id)
            .cloned()
            .ok_or_else(|| LauncherError::unknown_option("mission", mission_id))?;

        info!(mission = %mission.id, "Mission selected");
        ctx.summary.mission = Some(mission);
        self.update_completion(ctx);
        Ok(())
    }

    /// Select a runtime and tell the other steps about it
    pub fn select_runtime(
        &mut self,
        runtime_id: &str,
        ctx: &mut WizardContext,
    ) -> Result<(), LauncherError> {
        let runtime = self
            .runtimes
            .iter()
            .find(|r| r.id == runtime_id)
            .cloned()
            .ok_or_else(|| LauncherError::unknown_option("runtime", runtime_id))?;

        info!(runtime = %runtime.id, platform = %runtime.pipeline_platform, "Runtime selected");
        self.apply_runtime(runtime, ctx);
        self.update_completion(ctx);
        Ok(())
    }

    /// Pick one of the versions the selected runtime offers for the selected mission
    pub fn select_runtime_version(
        &mut self,
        version_id: &str,
        ctx: &mut WizardContext,
    ) -> Result<(), LauncherError> {
        let version = Self::find_version(ctx, version_id)
            .ok_or_else(|| LauncherError::unknown_option("runtime version", version_id))?;
        ctx.summary.runtime_version = Some(version);
        Ok(())
    }

    /// A runtime is disabled when the selected mission cannot run on it
    pub fn is_runtime_disabled(&self, runtime: &Runtime, ctx: &WizardContext) -> bool {
        ctx.summary
            .mission
            .as_ref()
            .is_some_and(|mission| !mission.supports_runtime(&runtime.id))
    }

    pub fn nav_to_next_step(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        self.update_completion(ctx);
        ctx.navigate_to_next(&self.id)?;

        let mission = ctx.summary.mission.as_ref().map(|m| m.name.as_str());
        let runtime = ctx.summary.runtime.as_ref().map(|r| r.name.as_str());
        ctx.broadcast(WizardEvent::telemetry(
            "completeMissionRuntimeStep_Create",
            [("mission", mission), ("runtime", runtime)],
        ));
        Ok(())
    }

    fn apply_runtime(&self, runtime: Runtime, ctx: &mut WizardContext) {
        ctx.summary.runtime_version = None;
        ctx.summary.runtime = Some(runtime.clone());
        ctx.broadcast(WizardEvent::RuntimeChanged { runtime });
    }

    fn find_version(
        ctx: &WizardContext,
        version_id: &str,
    ) -> Option<crate::types::RuntimeVersion> {
        let mission = ctx.summary.mission.as_ref()?;
        let runtime = ctx.summary.runtime.as_ref()?;
        runtime
            .versions_for(&mission.id)
            .iter()
            .find(|v| v.id == version_id)
            .cloned()
    }

    fn restore_summary(&self, ctx: &mut WizardContext) {
        let Some(selection) = ctx.selection().cloned() else {
            return;
        };

        if let Some(mission_id) = selection.mission_id.as_deref() {
            match self.missions.iter().find(|m| m.id == mission_id) {
                Some(mission) => ctx.summary.mission = Some(mission.clone()),
                None => warn!(mission = %mission_id, "Selected mission not offered"),
            }
        }

        if let Some(runtime_id) = selection.runtime_id.as_deref() {
            match self.runtimes.iter().find(|r| r.id == runtime_id) {
                Some(runtime) => self.apply_runtime(runtime.clone(), ctx),
                None => warn!(runtime = %runtime_id, "Selected runtime not offered"),
            }
        }

        if let Some(version_id) = selection.runtime_version.as_deref() {
            if let Some(version) = Self::find_version(ctx, version_id) {
                ctx.summary.runtime_version = Some(version);
            }
        }
    }
}

#[async_trait]
impl LauncherStep for MissionRuntimeStep {
    fn id(&self) -> &str {
        &self.id
    }

    async fn init(&mut self, ctx: &mut WizardContext) -> Result<(), LauncherError> {
        ctx.register_step(self.descriptor());
        self.missions = self.service.get_missions().await?;
        self.runtimes = self.service.get_runtimes().await?;
        self.restore_summary(ctx);
        self.update_completion(ctx);
        Ok(())
    }

    fn completed(&self, ctx: &WizardContext) -> bool {
        ctx.summary.mission.is_some() && ctx.summary.runtime.is_some()
    }

    fn subscriptions(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuntimeMission, RuntimeVersion, Selection};

    struct Catalog;

    #[async_trait]
    impl MissionRuntimeService for Catalog {
        async fn get_missions(&self) -> anyhow::Result<Vec<Mission>> {
            Ok(vec![Mission {
                id: "crud".into(),
                name: "CRUD".into(),
                suggested: true,
                description: "sample desp".into(),
                runtimes: vec!["vert.x".into(), "nodejs".into()],
                ..Default::default()
            }])
        }

        async fn get_runtimes(&self) -> anyhow::Result<Vec<Runtime>> {
            Ok(vec![
                Runtime {
                    id: "vert.x".into(),
                    name: "Eclipse Vert.x".into(),
                    pipeline_platform: "maven".into(),
                    missions: vec![RuntimeMission {
                        id: "crud".into(),
                        versions: vec![RuntimeVersion {
                            id: "community".into(),
                            name: "3.5.0.Final (Community)".into(),
                        }],
                    }],
                    ..Default::default()
                },
                Runtime {
                    id: "spring-boot".into(),
                    name: "Spring Boot".into(),
                    pipeline_platform: "maven".into(),
                    ..Default::default()
                },
            ])
        }
    }

    async fn init_step(selection: Option<Selection>) -> (MissionRuntimeStep, WizardContext) {
        let mut ctx = WizardContext::new(selection);
        let mut step = MissionRuntimeStep::new(Arc::new(Catalog));
        step.init(&mut ctx).await.unwrap();
        (step, ctx)
    }

    #[tokio::test]
    async fn test_init_registers_and_loads() {
        let (step, ctx) = init_step(None).await;
        assert_eq!(ctx.steps().len(), 1);
        assert_eq!(ctx.steps()[0].id, "MissionRuntime");
        assert_eq!(step.missions().len(), 1);
        assert_eq!(step.runtimes().len(), 2);
        assert!(ctx.summary.mission.is_none());
    }

    #[tokio::test]
    async fn test_select_mission_updates_summary() {
        let (mut step, mut ctx) = init_step(None).await;
        step.select_mission("crud", &mut ctx).unwrap();
        assert_eq!(ctx.summary.mission.as_ref().unwrap().name, "CRUD");
        assert!(!ctx.step("MissionRuntime").unwrap().completed);

        step.select_runtime("vert.x", &mut ctx).unwrap();
        assert!(ctx.step("MissionRuntime").unwrap().completed);
    }

    #[tokio::test]
    async fn test_unknown_mission_rejected() {
        let (mut step, mut ctx) = init_step(None).await;
        let err = step.select_mission("rest-http", &mut ctx).unwrap_err();
        assert!(matches!(err, LauncherError::UnknownOption { kind: "mission", .. }));
        assert!(ctx.summary.mission.is_none());
    }

    #[tokio::test]
    async fn test_runtime_disabled_for_unsupported_mission() {
        let (mut step, mut ctx) = init_step(None).await;
        let spring = step.runtimes()[1].clone();
        assert!(!step.is_runtime_disabled(&spring, &ctx));

        step.select_mission("crud", &mut ctx).unwrap();
        assert!(step.is_runtime_disabled(&spring, &ctx));
        assert!(!step.is_runtime_disabled(&step.runtimes()[0].clone(), &ctx));
    }

    #[tokio::test]
    async fn test_select_runtime_broadcasts_change() {
        let (mut step, mut ctx) = init_step(None).await;
        let mut subs = Subscriptions::new();
        subs.push(ctx.subscribe());

        step.select_runtime("vert.x", &mut ctx).unwrap();

        let events = subs.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            WizardEvent::RuntimeChanged { runtime } if runtime.id == "vert.x"
        ));
    }

    #[tokio::test]
    async fn test_restore_from_selection() {
        let selection = Selection {
            mission_id: Some("crud".into()),
            runtime_id: Some("vert.x".into()),
            runtime_version: Some("community".into()),
            ..Default::default()
        };
        let (_step, ctx) = init_step(Some(selection)).await;

        assert_eq!(ctx.summary.mission.as_ref().unwrap().id, "crud");
        assert_eq!(ctx.summary.runtime.as_ref().unwrap().id, "vert.x");
        assert_eq!(ctx.summary.runtime_version.as_ref().unwrap().id, "community");
        assert!(ctx.step("MissionRuntime").unwrap().completed);
    }

    #[tokio::test]
    async fn test_restore_with_unknown_ids_leaves_summary() {
        let selection = Selection {
            mission_id: Some("missing".into()),
            runtime_id: Some("missing".into()),
            ..Default::default()
        };
        let (_step, ctx) = init_step(Some(selection)).await;
        assert!(ctx.summary.mission.is_none());
        assert!(ctx.summary.runtime.is_none());
    }

    #[tokio::test]
    async fn test_runtime_version_needs_mission_and_runtime() {
        let (mut step, mut ctx) = init_step(None).await;
        assert!(step.select_runtime_version("community", &mut ctx).is_err());

        step.select_mission("crud", &mut ctx).unwrap();
        step.select_runtime("vert.x", &mut ctx).unwrap();
        step.select_runtime_version("community", &mut ctx).unwrap();
        assert_eq!(
            ctx.summary.runtime_version.as_ref().unwrap().name,
            "3.5.0.Final (Community)"
        );
    }
}
