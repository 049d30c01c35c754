use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use pipewright::log_status;
use pipewright::{config, paths};

use super::CmdResult;

#[derive(Args, Default)]
pub struct ValidateArgs {
    /// Project configuration file (defaults to blueprint/project-config.yml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub command: String,
    pub config_path: String,
    pub language: String,
    pub build_steps: Vec<String>,
    pub deployment_method: String,
    pub allowed_branches: Vec<String>,
    pub tag_pattern: String,
    pub fragments: usize,
}

pub fn run(args: ValidateArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ValidateOutput> {
    let config_path = args.config.unwrap_or_else(paths::project_config);

    let project_config = config::load(&config_path)?;
    let project = project_config.validate()?;

    log_status!(
        "validate",
        "Configuration at {} is complete",
        config_path.display()
    );

    Ok((
        ValidateOutput {
            command: "validate".to_string(),
            config_path: config_path.display().to_string(),
            language: project.language.to_string(),
            build_steps: project.build_steps.to_vec(),
            deployment_method: project.deployment_method.to_string(),
            allowed_branches: project.allowed_branches.to_vec(),
            tag_pattern: project.tag_pattern.to_string(),
            fragments: project.build_steps.len() + 3,
        },
        0,
    ))
}
