//! Accumulated wizard state and the deep-link selection used to pre-fill it.

use serde::{Deserialize, Serialize};

use super::catalog::{Mission, Pipeline, Runtime, RuntimeVersion};

/// Project metadata checked before the application is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCheck {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_version: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub maven_artifact: Option<String>,
    #[serde(default)]
    pub space_path: Option<String>,
}

/// Everything the user picked so far; shared by all steps of one wizard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub mission: Option<Mission>,
    #[serde(default)]
    pub runtime: Option<Runtime>,
    #[serde(default)]
    pub runtime_version: Option<RuntimeVersion>,
    #[serde(default)]
    pub pipeline: Option<Pipeline>,
    #[serde(default)]
    pub dependency_check: DependencyCheck,
}

/// Externally supplied snapshot (e.g. from a deep link), consumed once at step init
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub mission_id: Option<String>,
    #[serde(default)]
    pub runtime_id: Option<String>,
    #[serde(default)]
    pub runtime_version: Option<String>,
    #[serde(default)]
    pub pipeline_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_version: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub space_path: Option<String>,
}
