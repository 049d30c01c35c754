use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use pipewright::paths;
use pipewright::resolver::{DirTemplateSet, TemplateCategory, TemplateEntry};

use super::CmdResult;

#[derive(Args, Default)]
pub struct TemplatesArgs {
    /// Template root directory (defaults to templates/)
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Only list fragments in this category (common, languages, deployments)
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesOutput {
    pub command: String,
    pub template_root: String,
    pub templates: Vec<TemplateEntry>,
}

pub fn run(
    args: TemplatesArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<TemplatesOutput> {
    let template_root = args.templates.unwrap_or_else(paths::templates);

    let category = args
        .category
        .as_deref()
        .map(|raw| {
            TemplateCategory::parse(raw).ok_or_else(|| {
                pipewright::Error::validation_invalid_argument(
                    "category",
                    format!(
                        "Unknown template category '{raw}' \
                         (expected common, languages, or deployments)"
                    ),
                )
            })
        })
        .transpose()?;

    let set = DirTemplateSet::new(template_root);
    let mut templates = set.list()?;
    if let Some(category) = category {
        templates.retain(|entry| entry.category == category);
    }

    Ok((
        TemplatesOutput {
            command: "templates".to_string(),
            template_root: set.root().display().to_string(),
            templates,
        },
        0,
    ))
}
