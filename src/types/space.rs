//! Records exchanged with the space / project-summary backend.

use serde::{Deserialize, Serialize};

/// Attributes of an application already living in the user's space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApplicationAttributes {
    #[serde(default)]
    pub name: Option<String>,
}

/// An application entry returned by the space listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Application {
    #[serde(default)]
    pub attributes: ApplicationAttributes,
}

impl Application {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            attributes: ApplicationAttributes {
                name: Some(name.into()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpaceRef {
    #[serde(default)]
    pub id: String,
}

/// Where the new application will be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpaceContext {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub space: Option<SpaceRef>,
}

/// Reply to a setup request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SetupResponse {
    /// Link used to follow the status of the creation job
    #[serde(default)]
    pub uuid_link: Option<String>,
}
