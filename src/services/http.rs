//! HTTP client for the launcher backend

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{DependencyCheckService, MissionRuntimeService, PipelineService, ProjectSummaryService};
use crate::config::Config;
use crate::types::{Application, Mission, Pipeline, Runtime, SetupResponse, SpaceContext, Summary};
use crate::validation::dependency;

/// Body of a setup request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetupRequest<'a> {
    summary: &'a Summary,
    space_id: &'a str,
    space_name: &'a str,
    is_import: bool,
}

/// Backend client implementing every collaborator trait over REST
pub struct HttpLauncherClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpLauncherClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("launcher/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.backend.url.trim_end_matches('/').to_string(),
            token: config.backend.token.clone().filter(|t| !t.is_empty()),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        self.authorize(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?
            .error_for_status()
            .with_context(|| format!("Backend returned error status for {}", url))?
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[async_trait]
impl MissionRuntimeService for HttpLauncherClient {
    async fn get_missions(&self) -> Result<Vec<Mission>> {
        self.get_json("booster-catalog/missions").await
    }

    async fn get_runtimes(&self) -> Result<Vec<Runtime>> {
        self.get_json("booster-catalog/runtimes").await
    }
}

#[async_trait]
impl PipelineService for HttpLauncherClient {
    async fn get_pipelines(&self) -> Result<Vec<Pipeline>> {
        self.get_json("services/jenkins/pipelines").await
    }
}

#[async_trait]
impl DependencyCheckService for HttpLauncherClient {
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
        self.get_json("space/applications").await
    }
}

#[async_trait]
impl ProjectSummaryService for HttpLauncherClient {
    async fn get_current_context(&self) -> Result<SpaceContext> {
        self.get_json("space/context").await
    }

    #[instrument(skip(self, summary))]
    async fn setup(
        &self,
        summary: &Summary,
        space_id: &str,
        space_name: &str,
        is_import: bool,
    ) -> Result<SetupResponse> {
        let url = self.url("launcher/setup");
        let body = SetupRequest {
            summary,
            space_id,
            space_name,
            is_import,
        };

        self.authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .context("Failed to send setup request")?
            .error_for_status()
            .context("Backend rejected setup request")?
            .json()
            .await
            .context("Failed to parse setup response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let mut config = Config::default();
        config.backend.url = "https://launcher.example.com/api/".to_string();
        let client = HttpLauncherClient::from_config(&config).unwrap();
        assert_eq!(
            client.url("/booster-catalog/missions"),
            "https://launcher.example.com/api/booster-catalog/missions"
        );
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let mut config = Config::default();
        config.backend.token = Some(String::new());
        let client = HttpLauncherClient::from_config(&config).unwrap();
        assert!(client.token.is_none());
    }

    #[test]
    fn test_setup_request_body() {
        let summary = Summary::default();
        let body = SetupRequest {
            summary: &summary,
            space_id: "space-1",
            space_name: "/demo",
            is_import: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["spaceId"], "space-1");
        assert_eq!(json["spaceName"], "/demo");
        assert_eq!(json["isImport"], false);
    }
}
