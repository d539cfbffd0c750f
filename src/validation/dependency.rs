//! Static checks for the project metadata fields of the summary step.

use once_cell::sync::Lazy;
use regex::Regex;

static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_\-.]{3,63}$").unwrap());

static PROJECT_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-.]{1,63}$").unwrap());

static ARTIFACT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9\-.]{3,63}$").unwrap());

// Dot-separated Java identifiers
static GROUP_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*(\.[a-zA-Z_$][a-zA-Z0-9_$]*)*$").unwrap()
});

pub fn is_valid_project_name(value: &str) -> bool {
    PROJECT_NAME.is_match(value)
}

pub fn is_valid_project_version(value: &str) -> bool {
    PROJECT_VERSION.is_match(value)
}

pub fn is_valid_artifact_id(value: &str) -> bool {
    ARTIFACT_ID.is_match(value)
}

pub fn is_valid_group_id(value: &str) -> bool {
    GROUP_ID.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name() {
        assert!(is_valid_project_name("my-app"));
        assert!(is_valid_project_name("My_App.v2"));
        assert!(!is_valid_project_name("abc"));
        assert!(!is_valid_project_name("1app"));
    }

    #[test]
    fn test_project_version() {
        assert!(is_valid_project_version("1.0.0-SNAPSHOT"));
        assert!(!is_valid_project_version(""));
        assert!(!is_valid_project_version("1.0 beta"));
    }

    #[test]
    fn test_artifact_id() {
        assert!(is_valid_artifact_id("booster-crud"));
        assert!(!is_valid_artifact_id("Booster"));
    }

    #[test]
    fn test_group_id() {
        assert!(is_valid_group_id("io.openshift.booster"));
        assert!(is_valid_group_id("com"));
        assert!(!is_valid_group_id("io..booster"));
        assert!(!is_valid_group_id("9io.booster"));
        assert!(!is_valid_group_id("io.booster."));
    }
}
