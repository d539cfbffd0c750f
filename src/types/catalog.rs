//! Catalog records offered by the backend: missions, runtimes and pipelines.

use serde::{Deserialize, Serialize};

/// A mission (sample application flavour) that can be launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Featured missions are tagged in the listing
    #[serde(default)]
    pub suggested: bool,
    /// Optional "show more" link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Ids of the runtimes this mission can run on
    #[serde(default)]
    pub runtimes: Vec<String>,
}

impl Mission {
    /// Whether the mission can be combined with the given runtime
    pub fn supports_runtime(&self, runtime_id: &str) -> bool {
        self.runtimes.iter().any(|r| r == runtime_id)
    }
}

/// A released version of a runtime for a given mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuntimeVersion {
    pub id: String,
    pub name: String,
}

/// Mission entry listed on a runtime, with the versions available for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuntimeMission {
    pub id: String,
    #[serde(default)]
    pub versions: Vec<RuntimeVersion>,
}

/// A runtime (language stack) a mission can be generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Runtime {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Platform pipelines must target to be usable with this runtime
    #[serde(default)]
    pub pipeline_platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_version: Option<String>,
    #[serde(default)]
    pub missions: Vec<RuntimeMission>,
}

impl Runtime {
    /// Versions published for a mission on this runtime
    pub fn versions_for(&self, mission_id: &str) -> &[RuntimeVersion] {
        self.missions
            .iter()
            .find(|m| m.id == mission_id)
            .map(|m| m.versions.as_slice())
            .unwrap_or_default()
    }
}

/// A release strategy (CI/CD pipeline)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub stages: Vec<PipelineStage>,
    /// UI state: whether the stage list is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl Pipeline {
    /// Flip the expanded flag; an unset flag counts as collapsed
    pub fn toggle_expanded(&mut self) {
        self.expanded = Some(!self.expanded.unwrap_or(false));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PipelineStage {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_deserializes_camel_case() {
        let runtime: Runtime = serde_json::from_str(
            r#"{
                "id": "vert.x",
                "name": "Eclipse Vert.x",
                "pipelinePlatform": "maven",
                "projectVersion": "v1.0.0",
                "missions": [
                    {"id": "crud", "versions": [{"id": "community", "name": "3.5.0.Final (Community)"}]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(runtime.pipeline_platform, "maven");
        assert_eq!(runtime.project_version.as_deref(), Some("v1.0.0"));
        assert_eq!(runtime.versions_for("crud").len(), 1);
        assert!(runtime.versions_for("rest-http").is_empty());
    }

    #[test]
    fn test_mission_supports_runtime() {
        let mission = Mission {
            id: "crud".into(),
            name: "CRUD".into(),
            runtimes: vec!["vert.x".into(), "nodejs".into()],
            ..Default::default()
        };
        assert!(mission.supports_runtime("nodejs"));
        assert!(!mission.supports_runtime("spring-boot"));
    }

    #[test]
    fn test_toggle_expanded() {
        let mut pipeline = Pipeline::default();
        assert_eq!(pipeline.expanded, None);
        pipeline.toggle_expanded();
        assert_eq!(pipeline.expanded, Some(true));
        pipeline.toggle_expanded();
        assert_eq!(pipeline.expanded, Some(false));
    }
}
