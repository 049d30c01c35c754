use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use pipewright::local_files::{local, FileSystem};
use pipewright::log_status;
use pipewright::resolver::DirTemplateSet;
use pipewright::{composer, config, paths};

use super::CmdResult;

#[derive(Args, Default)]
pub struct GenerateArgs {
    /// Project configuration file (defaults to blueprint/project-config.yml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Template root directory (defaults to templates/)
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Destination for the generated pipeline (defaults to output/.gitlab-ci.yml)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Compose the pipeline without writing the output file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct GenerateOutput {
    pub command: String,
    pub config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    pub fragments: usize,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub fn run(args: GenerateArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<GenerateOutput> {
    let config_path = args.config.unwrap_or_else(paths::project_config);
    let template_root = args.templates.unwrap_or_else(paths::templates);
    let output_path = args.output.unwrap_or_else(paths::pipeline_output);

    let project_config = config::load(&config_path)?;
    let project = project_config.validate()?;

    let mut warnings = Vec::new();
    if project.allowed_branches.is_empty() {
        warnings.push(
            "project.branch_strategy.allowed_branches is empty; \
             the generated branch filter will match no branches"
                .to_string(),
        );
    }
    let fragments = project.build_steps.len() + 3;

    let resolver = DirTemplateSet::new(template_root);
    let document = composer::compose(&project_config, &resolver)?;

    if args.dry_run {
        log_status!("generate", "Composed {} fragments (dry run)", fragments);
        return Ok((
            GenerateOutput {
                command: "generate".to_string(),
                config_path: config_path.display().to_string(),
                output_path: None,
                fragments,
                dry_run: true,
                document: Some(document),
                warnings,
            },
            0,
        ));
    }

    let fs = local();
    if let Some(parent) = output_path.parent() {
        fs.ensure_dir(parent)?;
    }
    fs.write(&output_path, &document)?;

    log_status!(
        "generate",
        "Generated {} from {} fragments",
        output_path.display(),
        fragments
    );

    Ok((
        GenerateOutput {
            command: "generate".to_string(),
            config_path: config_path.display().to_string(),
            output_path: Some(output_path.display().to_string()),
            fragments,
            dry_run: false,
            document: None,
            warnings,
        },
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
project:
  language: go
  build_steps: [lint, test]
  deployment_method: kubernetes
  branch_strategy:
    allowed_branches: [main, release]
    tag_pattern: "v*.*.*"
"#;

    fn write_template(root: &std::path::Path, category: &str, name: &str, source: &str) {
        let dir = root.join(category);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.tmpl")), source).unwrap();
    }

    fn seed_workspace() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("project-config.yml"), CONFIG).unwrap();

        let templates = dir.path().join("templates");
        write_template(&templates, "common", "lint", "lint");
        write_template(&templates, "common", "test", "test");
        write_template(&templates, "languages", "go", "go");
        write_template(&templates, "deployments", "kubernetes", "kubernetes");
        write_template(
            &templates,
            "common",
            "tag-validation",
            "only: /{{branchRegex}}/ tags: {{tagPattern}}",
        );
        dir
    }

    #[test]
    fn generates_pipeline_file_end_to_end() {
        let dir = seed_workspace();
        let output_path = dir.path().join("output").join(".gitlab-ci.yml");

        let args = GenerateArgs {
            config: Some(dir.path().join("project-config.yml")),
            templates: Some(dir.path().join("templates")),
            output: Some(output_path.clone()),
            dry_run: false,
        };

        let (output, exit_code) = run(args, &crate::commands::GlobalArgs {}).unwrap();
        assert_eq!(exit_code, 0);
        assert_eq!(output.fragments, 5);
        assert!(output.document.is_none());

        let written = fs::read_to_string(output_path).unwrap();
        assert_eq!(
            written,
            "lint\ntest\ngo\nkubernetes\nonly: /main|release/ tags: v*.*.*"
        );
    }

    #[test]
    fn dry_run_returns_document_without_writing() {
        let dir = seed_workspace();
        let output_path = dir.path().join("output").join(".gitlab-ci.yml");

        let args = GenerateArgs {
            config: Some(dir.path().join("project-config.yml")),
            templates: Some(dir.path().join("templates")),
            output: Some(output_path.clone()),
            dry_run: true,
        };

        let (output, _) = run(args, &crate::commands::GlobalArgs {}).unwrap();
        assert!(output.document.is_some());
        assert!(!output_path.exists());
    }
}
