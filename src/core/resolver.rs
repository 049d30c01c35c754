use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::composer::RenderContext;
use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use crate::utils::template;

/// File extension for template fragments on disk
pub const TEMPLATE_EXTENSION: &str = "tmpl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Common,
    Languages,
    Deployments,
}

impl TemplateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Common => "common",
            TemplateCategory::Languages => "languages",
            TemplateCategory::Deployments => "deployments",
        }
    }

    pub fn all() -> &'static [TemplateCategory] {
        &[
            TemplateCategory::Common,
            TemplateCategory::Languages,
            TemplateCategory::Deployments,
        ]
    }

    pub fn parse(value: &str) -> Option<TemplateCategory> {
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for one template fragment: a category plus a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateRef {
    pub category: TemplateCategory,
    pub name: String,
}

impl TemplateRef {
    pub fn new(category: TemplateCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    pub fn common(name: impl Into<String>) -> Self {
        Self::new(TemplateCategory::Common, name)
    }

    pub fn languages(name: impl Into<String>) -> Self {
        Self::new(TemplateCategory::Languages, name)
    }

    pub fn deployments(name: impl Into<String>) -> Self {
        Self::new(TemplateCategory::Deployments, name)
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// A resolved template fragment, ready to render.
#[derive(Debug, Clone)]
pub struct Template {
    reference: TemplateRef,
    source: String,
}

impl Template {
    pub fn new(reference: TemplateRef, source: impl Into<String>) -> Self {
        Self {
            reference,
            source: source.into(),
        }
    }

    pub fn reference(&self) -> &TemplateRef {
        &self.reference
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute `{{key}}` placeholders from the context.
    ///
    /// A placeholder left without a value is a render failure; the
    /// error lists the missing variable names.
    pub fn render(&self, context: &RenderContext) -> Result<String> {
        let rendered = template::render_pairs(&self.source, context.vars());
        let missing = template::placeholders(&rendered);
        if missing.is_empty() {
            Ok(rendered)
        } else {
            Err(Error::template_render_failed(
                self.reference.to_string(),
                missing,
            ))
        }
    }
}

/// Maps a [`TemplateRef`] to a renderable template.
///
/// The composer only ever talks to this trait, so template storage is
/// swappable: a directory tree in production, an in-memory map in tests.
pub trait TemplateResolver {
    fn resolve(&self, reference: &TemplateRef) -> Result<Template>;
}

/// Listing entry produced by [`DirTemplateSet::list`].
#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    pub category: TemplateCategory,
    pub name: String,
}

/// Templates stored on disk as `<root>/<category>/<name>.tmpl`.
pub struct DirTemplateSet {
    root: PathBuf,
}

impl DirTemplateSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn template_path(&self, reference: &TemplateRef) -> PathBuf {
        self.root
            .join(reference.category.as_str())
            .join(format!("{}.{}", reference.name, TEMPLATE_EXTENSION))
    }

    /// All fragments under the root, ordered by category then name.
    pub fn list(&self) -> Result<Vec<TemplateEntry>> {
        let fs = local_files::local();
        let mut entries = Vec::new();

        for category in TemplateCategory::all().iter().copied() {
            let dir = self.root.join(category.as_str());
            let mut names: Vec<String> = fs
                .list(&dir)?
                .into_iter()
                .filter(|entry| !entry.is_dir && entry.is_template())
                .filter_map(|entry| {
                    entry
                        .path
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                })
                .collect();
            names.sort();
            entries.extend(
                names
                    .into_iter()
                    .map(|name| TemplateEntry { category, name }),
            );
        }

        Ok(entries)
    }
}

impl TemplateResolver for DirTemplateSet {
    fn resolve(&self, reference: &TemplateRef) -> Result<Template> {
        let path = self.template_path(reference);
        if !path.is_file() {
            return Err(Error::template_not_found(
                reference.category.as_str(),
                reference.name.clone(),
                Some(path.display().to_string()),
            ));
        }

        let source = local_files::local().read(&path)?;
        Ok(Template::new(reference.clone(), source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    fn write_template(root: &Path, category: &str, name: &str, source: &str) {
        let dir = root.join(category);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.{TEMPLATE_EXTENSION}")), source).unwrap();
    }

    #[test]
    fn resolves_template_from_directory_tree() {
        let dir = tempdir().unwrap();
        write_template(dir.path(), "languages", "go", "setup go {{language}}");

        let set = DirTemplateSet::new(dir.path());
        let template = set.resolve(&TemplateRef::languages("go")).unwrap();

        assert_eq!(template.source(), "setup go {{language}}");
        assert_eq!(template.reference().to_string(), "languages/go");
    }

    #[test]
    fn missing_template_reports_category_and_name() {
        let dir = tempdir().unwrap();
        let set = DirTemplateSet::new(dir.path());

        let err = set.resolve(&TemplateRef::languages("cobol")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TemplateNotFound);
        assert_eq!(err.details["category"], "languages");
        assert_eq!(err.details["name"], "cobol");
    }

    #[test]
    fn render_substitutes_context_values() {
        let template = Template::new(
            TemplateRef::common("tag-validation"),
            "only: /{{branchRegex}}/ tags: {{tagPattern}}",
        );
        let context = RenderContext::for_branch_validation("main|release", "v*.*.*");

        let rendered = template.render(&context).unwrap();
        assert_eq!(rendered, "only: /main|release/ tags: v*.*.*");
    }

    #[test]
    fn render_fails_on_unresolved_placeholder() {
        let template = Template::new(TemplateRef::common("build"), "image: {{imageTag}}");
        let err = template.render(&RenderContext::new()).unwrap_err();

        assert_eq!(err.code, ErrorCode::TemplateRenderFailed);
        assert_eq!(err.details["template"], "common/build");
        assert_eq!(err.details["missingVariables"][0], "imageTag");
    }

    #[test]
    fn list_orders_by_category_then_name() {
        let dir = tempdir().unwrap();
        write_template(dir.path(), "common", "test", "");
        write_template(dir.path(), "common", "lint", "");
        write_template(dir.path(), "deployments", "ssh", "");
        std::fs::write(dir.path().join("common").join("notes.txt"), "").unwrap();

        let set = DirTemplateSet::new(dir.path());
        let entries = set.list().unwrap();

        let listed: Vec<String> = entries
            .iter()
            .map(|entry| format!("{}/{}", entry.category, entry.name))
            .collect();
        assert_eq!(listed, ["common/lint", "common/test", "deployments/ssh"]);
    }

    #[test]
    fn category_parses_from_directory_names() {
        assert_eq!(
            TemplateCategory::parse("common"),
            Some(TemplateCategory::Common)
        );
        assert_eq!(TemplateCategory::parse("unknown"), None);
    }
}
