use std::path::PathBuf;

/// Blueprint directory holding the project configuration
pub fn blueprint() -> PathBuf {
    PathBuf::from("blueprint")
}

/// Project configuration file path
pub fn project_config() -> PathBuf {
    blueprint().join("project-config.yml")
}

/// Template root directory
pub fn templates() -> PathBuf {
    PathBuf::from("templates")
}

/// Output directory for generated pipeline files
pub fn output() -> PathBuf {
    PathBuf::from("output")
}

/// Generated pipeline definition path
pub fn pipeline_output() -> PathBuf {
    output().join(".gitlab-ci.yml")
}
