//! Domain records shared by the wizard, the services and the CLI.

mod catalog;
mod space;
mod summary;

pub use catalog::{Mission, Pipeline, PipelineStage, Runtime, RuntimeMission, RuntimeVersion};
pub use space::{Application, ApplicationAttributes, SetupResponse, SpaceContext, SpaceRef};
pub use summary::{DependencyCheck, Selection, Summary};
