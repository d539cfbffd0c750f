//! In-memory backend loaded from a JSON catalog file.
//!
//! Used by the CLI for offline runs and by tests as a deterministic backend.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{DependencyCheckService, MissionRuntimeService, PipelineService, ProjectSummaryService};
use crate::types::{Application, Mission, Pipeline, Runtime, SetupResponse, SpaceContext, Summary};
use crate::validation::dependency;

/// File layout of a static catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub runtimes: Vec<Runtime>,
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub context: SpaceContext,
    /// Link handed back by `setup`; no link simulates a backend that never confirms
    #[serde(default)]
    pub status_link: Option<String>,
}

pub struct StaticCatalog {
    data: CatalogData,
    submitted: Mutex<Vec<Summary>>,
}

impl StaticCatalog {
    pub fn new(data: CatalogData) -> Self {
        Self {
            data,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let data: CatalogData = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
        Ok(Self::new(data))
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    /// Summaries received by `setup`, oldest first
    pub fn submitted(&self) -> Vec<Summary> {
        self.submitted
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MissionRuntimeService for StaticCatalog {
    async fn get_missions(&self) -> Result<Vec<Mission>> {
        Ok(self.data.missions.clone())
    }

    async fn get_runtimes(&self) -> Result<Vec<Runtime>> {
        Ok(self.data.runtimes.clone())
    }
}

#[async_trait]
impl PipelineService for StaticCatalog {
    async fn get_pipelines(&self) -> Result<Vec<Pipeline>> {
        Ok(self.data.pipelines.clone())
    }
}

#[async_trait]
impl DependencyCheckService for StaticCatalog {
    fn validate_project_name(&self, value: &str) -> bool {
        dependency::is_valid_project_name(value)
    }

    fn validate_project_version(&self, value: &str) -> bool {
        dependency::is_valid_project_version(value)
    }

    fn validate_artifact_id(&self, value: &str) -> bool {
        dependency::is_valid_artifact_id(value)
    }

    fn validate_group_id(&self, value: &str) -> bool {
        dependency::is_valid_group_id(value)
    }

    async fn get_applications_in_a_space(&self) -> Result<Vec<Application>> {
        Ok(self.data.applications.clone())
    }
}

#[async_trait]
impl ProjectSummaryService for StaticCatalog {
    async fn get_current_context(&self) -> Result<SpaceContext> {
        Ok(self.data.context.clone())
    }

    async fn setup(
        &self,
        summary: &Summary,
        space_id: &str,
        space_name: &str,
        _is_import: bool,
    ) -> Result<SetupResponse> {
        info!(space_id, space_name, "Static catalog accepted setup request");
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(summary.clone());
        }
        Ok(SetupResponse {
            uuid_link: self.data.status_link.clone(),
        })
    }
}
