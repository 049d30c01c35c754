//! String template rendering utilities.

use regex::Regex;

/// Well-known context keys exposed to template fragments.
pub struct TemplateVars;

impl TemplateVars {
    pub const LANGUAGE: &'static str = "language";
    pub const DEPLOYMENT_METHOD: &'static str = "deploymentMethod";
    pub const BUILD_STEPS: &'static str = "buildSteps";
    pub const ALLOWED_BRANCHES: &'static str = "allowedBranches";
    pub const BRANCH_REGEX: &'static str = "branchRegex";
    pub const TAG_PATTERN: &'static str = "tagPattern";
}

pub fn render_pairs(template: &str, variables: &[(String, String)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

/// Placeholder names present in `template`, in order of first
/// appearance, without duplicates.
pub fn placeholders(template: &str) -> Vec<String> {
    let pattern = Regex::new(r"\{\{([A-Za-z][A-Za-z0-9_.]*)\}\}").unwrap();

    let mut names: Vec<String> = Vec::new();
    for captures in pattern.captures_iter(template) {
        let name = &captures[1];
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pairs_replaces_every_occurrence() {
        let vars = vec![
            ("language".to_string(), "go".to_string()),
            ("tagPattern".to_string(), "v*".to_string()),
        ];
        let rendered = render_pairs("{{language}}-{{language}}:{{tagPattern}}", &vars);
        assert_eq!(rendered, "go-go:v*");
    }

    #[test]
    fn placeholders_are_deduplicated_in_order() {
        let found = placeholders("{{b}} {{a}} {{b}} {{project.name}}");
        assert_eq!(found, ["b", "a", "project.name"]);
    }

    #[test]
    fn placeholders_ignore_single_braces() {
        assert!(placeholders("only: /{branch}/ {notAPlaceholder").is_empty());
    }
}
