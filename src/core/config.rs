use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level shape of the project configuration file.
///
/// The file nests everything under a `project:` key; the composer only
/// ever sees the inner [`ProjectConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_steps: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_strategy: Option<BranchStrategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BranchStrategy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_branches: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_pattern: Option<String>,
}

/// Borrowed view of a [`ProjectConfig`] whose required fields are all
/// present and well-formed.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedProject<'a> {
    pub language: &'a str,
    pub build_steps: &'a [String],
    pub deployment_method: &'a str,
    pub allowed_branches: &'a [String],
    pub tag_pattern: &'a str,
}

/// Load the project configuration from a YAML file.
pub fn load(path: &Path) -> Result<ProjectConfig> {
    let raw = local_files::local().read(path)?;
    parse(&raw, path)
}

/// Parse raw YAML into a [`ProjectConfig`]. `path` is only used for
/// error reporting.
pub fn parse(raw: &str, path: &Path) -> Result<ProjectConfig> {
    let file: ConfigFile = serde_yml::from_str(raw)
        .map_err(|e| Error::config_invalid_yaml(path.display().to_string(), e.to_string()))?;

    file.project
        .ok_or_else(|| Error::config_missing_key("project", Some(path.display().to_string())))
}

impl ProjectConfig {
    /// Check that every required field is present and well-formed.
    ///
    /// Returns a borrowed view with concrete field types so callers
    /// never touch the `Option`s after validation. `allowed_branches`
    /// may be empty; build step names may repeat but must be non-empty.
    pub fn validate(&self) -> Result<ValidatedProject<'_>> {
        let language = require_identifier(self.language.as_deref(), "project.language")?;

        let build_steps = self
            .build_steps
            .as_deref()
            .ok_or_else(|| Error::config_missing_key("project.build_steps", None))?;
        for (index, step) in build_steps.iter().enumerate() {
            if step.trim().is_empty() {
                return Err(Error::config_invalid_value(
                    format!("project.build_steps[{index}]"),
                    Some(step.clone()),
                    "build step names must be non-empty",
                ));
            }
        }

        let deployment_method = require_identifier(
            self.deployment_method.as_deref(),
            "project.deployment_method",
        )?;

        let strategy = self
            .branch_strategy
            .as_ref()
            .ok_or_else(|| Error::config_missing_key("project.branch_strategy", None))?;

        let allowed_branches = strategy.allowed_branches.as_deref().ok_or_else(|| {
            Error::config_missing_key("project.branch_strategy.allowed_branches", None)
        })?;

        let tag_pattern = strategy.tag_pattern.as_deref().ok_or_else(|| {
            Error::config_missing_key("project.branch_strategy.tag_pattern", None)
        })?;

        Ok(ValidatedProject {
            language,
            build_steps,
            deployment_method,
            allowed_branches,
            tag_pattern,
        })
    }
}

fn require_identifier<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    let value = value.ok_or_else(|| Error::config_missing_key(key, None))?;
    if value.trim().is_empty() {
        return Err(Error::config_invalid_value(
            key,
            Some(value.to_string()),
            "must be a non-empty identifier",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"
project:
  language: go
  build_steps:
    - lint
    - test
  deployment_method: kubernetes
  branch_strategy:
    allowed_branches:
      - main
      - release
    tag_pattern: "v*.*.*"
"#;

    fn sample_path() -> PathBuf {
        PathBuf::from("project-config.yml")
    }

    #[test]
    fn parses_full_config() {
        let config = parse(SAMPLE, &sample_path()).unwrap();
        let project = config.validate().unwrap();

        assert_eq!(project.language, "go");
        assert_eq!(project.build_steps, ["lint", "test"]);
        assert_eq!(project.deployment_method, "kubernetes");
        assert_eq!(project.allowed_branches, ["main", "release"]);
        assert_eq!(project.tag_pattern, "v*.*.*");
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = parse("project: [unterminated", &sample_path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidYaml);
    }

    #[test]
    fn rejects_missing_project_key() {
        let err = parse("other: {}", &sample_path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingKey);
        assert_eq!(err.details["key"], "project");
    }

    #[test]
    fn validate_reports_missing_deployment_method() {
        let raw = r#"
project:
  language: go
  build_steps: [lint]
  branch_strategy:
    allowed_branches: [main]
    tag_pattern: "v*"
"#;
        let config = parse(raw, &sample_path()).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingKey);
        assert_eq!(err.details["key"], "project.deployment_method");
    }

    #[test]
    fn validate_reports_missing_tag_pattern() {
        let raw = r#"
project:
  language: go
  build_steps: []
  deployment_method: ssh
  branch_strategy:
    allowed_branches: [main]
"#;
        let config = parse(raw, &sample_path()).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissingKey);
        assert_eq!(err.details["key"], "project.branch_strategy.tag_pattern");
    }

    #[test]
    fn validate_rejects_empty_build_step_names() {
        let config = ProjectConfig {
            language: Some("go".to_string()),
            build_steps: Some(vec!["lint".to_string(), "  ".to_string()]),
            deployment_method: Some("ssh".to_string()),
            branch_strategy: Some(BranchStrategy {
                allowed_branches: Some(vec!["main".to_string()]),
                tag_pattern: Some("v*".to_string()),
            }),
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
        assert_eq!(err.details["key"], "project.build_steps[1]");
    }

    #[test]
    fn validate_allows_empty_branch_list() {
        let raw = r#"
project:
  language: rust
  build_steps: []
  deployment_method: ssh
  branch_strategy:
    allowed_branches: []
    tag_pattern: "v*"
"#;
        let config = parse(raw, &sample_path()).unwrap();
        let project = config.validate().unwrap();
        assert!(project.allowed_branches.is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project-config.yml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.language.as_deref(), Some("go"));
    }
}
