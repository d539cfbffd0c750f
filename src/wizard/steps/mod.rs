mod mission_runtime;
mod project_summary;
mod release_strategy;

pub use mission_runtime::MissionRuntimeStep;
pub use project_summary::ProjectSummaryStep;
pub use release_strategy::ReleaseStrategyStep;
