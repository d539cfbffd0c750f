//! Backend collaborators consumed by the wizard.
//!
//! Each trait mirrors one backend concern so steps can be exercised against
//! the HTTP client, a static catalog, or a test double interchangeably.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::types::{Application, Mission, Pipeline, Runtime, SetupResponse, SpaceContext, Summary};

mod http;
mod static_catalog;

pub use http::HttpLauncherClient;
pub use static_catalog::{CatalogData, StaticCatalog};

/// Lists missions and runtimes
#[async_trait]
pub trait MissionRuntimeService: Send + Sync {
    async fn get_missions(&self) -> Result<Vec<Mission>>;

    async fn get_runtimes(&self) -> Result<Vec<Runtime>>;
}

/// Lists release strategies
#[async_trait]
pub trait PipelineService: Send + Sync {
    async fn get_pipelines(&self) -> Result<Vec<Pipeline>>;
}

/// Project metadata checks and the listing used for name uniqueness
#[async_trait]
pub trait DependencyCheckService: Send + Sync {
    fn validate_project_name(&self, value: &str) -> bool;

    fn validate_project_version(&self, value: &str) -> bool;

    fn validate_artifact_id(&self, value: &str) -> bool;

    fn validate_group_id(&self, value: &str) -> bool;

    /// Applications that already exist in the target space
    async fn get_applications_in_a_space(&self) -> Result<Vec<Application>>;
}

/// Space lookup and the call that kicks off application creation
#[async_trait]
pub trait ProjectSummaryService: Send + Sync {
    async fn get_current_context(&self) -> Result<SpaceContext>;

    async fn setup(
        &self,
        summary: &Summary,
        space_id: &str,
        space_name: &str,
        is_import: bool,
    ) -> Result<SetupResponse>;
}

/// One handle per collaborator, usually all backed by the same client
#[derive(Clone)]
pub struct Services {
    pub missions: Arc<dyn MissionRuntimeService>,
    pub pipelines: Arc<dyn PipelineService>,
    pub checks: Arc<dyn DependencyCheckService>,
    pub summary: Arc<dyn ProjectSummaryService>,
}

impl Services {
    /// Use a single backend for every collaborator
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: MissionRuntimeService
            + PipelineService
            + DependencyCheckService
            + ProjectSummaryService
            + 'static,
    {
        Self {
            missions: backend.clone(),
            pipelines: backend.clone(),
            checks: backend.clone(),
            summary: backend,
        }
    }

    /// Static catalog when a file is given, otherwise the configured HTTP backend
    pub fn from_config(config: &Config, catalog: Option<&Path>) -> Result<Self> {
        match catalog {
            Some(path) => Ok(Self::shared(Arc::new(StaticCatalog::from_file(path)?))),
            None => Ok(Self::shared(Arc::new(HttpLauncherClient::from_config(config)?))),
        }
    }
}
