use crate::config::{ProjectConfig, ValidatedProject};
use crate::error::Result;
use crate::resolver::{TemplateRef, TemplateResolver};
use crate::utils::template::TemplateVars;

/// Name of the fragment that gates pipeline execution by branch/tag
pub const TAG_VALIDATION_TEMPLATE: &str = "tag-validation";

/// Variables handed to a template at render time.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    vars: Vec<(String, String)>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }

    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Context shared by build-step, language, and deployment fragments.
    pub fn for_project(project: &ValidatedProject<'_>) -> Self {
        Self::new()
            .with(TemplateVars::LANGUAGE, project.language)
            .with(TemplateVars::DEPLOYMENT_METHOD, project.deployment_method)
            .with(TemplateVars::BUILD_STEPS, project.build_steps.join(" "))
            .with(
                TemplateVars::ALLOWED_BRANCHES,
                project.allowed_branches.join(","),
            )
            .with(TemplateVars::TAG_PATTERN, project.tag_pattern)
    }

    /// Context for the branch/tag validation fragment.
    pub fn for_branch_validation(branch_regex: &str, tag_pattern: &str) -> Self {
        Self::new()
            .with(TemplateVars::BRANCH_REGEX, branch_regex)
            .with(TemplateVars::TAG_PATTERN, tag_pattern)
    }
}

/// Compose the pipeline document for `config`.
///
/// Renders, in order: one fragment per configured build step (in
/// configuration order, duplicates included), the language fragment,
/// the deployment fragment, and the branch/tag validation fragment,
/// then joins the blocks with a single newline. Validation runs before
/// the first resolver call, and the first missing template or failed
/// render aborts the run; no partial document is ever returned.
pub fn compose(config: &ProjectConfig, resolver: &dyn TemplateResolver) -> Result<String> {
    let project = config.validate()?;
    let mut blocks = Vec::with_capacity(project.build_steps.len() + 3);

    let project_context = RenderContext::for_project(&project);
    for step in project.build_steps {
        let template = resolver.resolve(&TemplateRef::common(step.as_str()))?;
        blocks.push(template.render(&project_context)?);
    }

    let language = resolver.resolve(&TemplateRef::languages(project.language))?;
    blocks.push(language.render(&project_context)?);

    let deployment = resolver.resolve(&TemplateRef::deployments(project.deployment_method))?;
    blocks.push(deployment.render(&project_context)?);

    // Branch names are joined verbatim; escaping regex metacharacters
    // is the configuration author's responsibility.
    let branch_regex = project.allowed_branches.join("|");
    let validation_context =
        RenderContext::for_branch_validation(&branch_regex, project.tag_pattern);
    let validation = resolver.resolve(&TemplateRef::common(TAG_VALIDATION_TEMPLATE))?;
    blocks.push(validation.render(&validation_context)?);

    Ok(blocks.join("\n"))
}
