//! Workflow template catalog.
//!
//! Templates are read-only job blueprints covering common CI recipes.
//! Instantiating one deep-copies its step list into a fresh `Job`, so
//! mutating an instance never affects the catalog or other instances.
//!
//! Builtin templates carry their own leading checkout step; unlike the
//! manual-entry path, instantiation injects nothing extra.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::workflow::{Job, Step};

/// A read-only job blueprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Catalog lookup key (e.g. "node-ci")
    pub key: String,

    /// Human-readable name shown in listings
    pub display_name: String,

    /// Runner image for instantiated jobs
    pub runs_on: String,

    /// Blueprint steps, copied into each instance
    pub steps: Vec<Step>,
}

impl Template {
    /// Create a job from this template.
    ///
    /// The job id defaults to the template key (callers may rename it
    /// before emission) and the steps are a deep copy of the blueprint.
    pub fn instantiate(&self) -> Job {
        Job::new(self.key.clone(), self.runs_on.clone()).with_steps(self.steps.clone())
    }
}

/// Catalog of available templates.
pub struct TemplateCatalog {
    templates: HashMap<String, Template>,
}

impl TemplateCatalog {
    /// Create a catalog with the builtin templates.
    pub fn new() -> Self {
        let mut catalog = Self {
            templates: HashMap::new(),
        };
        catalog.register_builtin_templates();
        catalog
    }

    /// Create a catalog with builtins plus custom templates loaded from
    /// `*.yml`/`*.yaml` files in a directory. Custom templates shadow
    /// builtins with the same key; unreadable files are skipped.
    pub fn with_custom_dir(custom_dir: impl AsRef<Path>) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_custom_templates(custom_dir.as_ref())?;
        Ok(catalog)
    }

    fn register_builtin_templates(&mut self) {
        self.register(Template {
            key: "node-ci".to_string(),
            display_name: "Node.js CI".to_string(),
            runs_on: "ubuntu-latest".to_string(),
            steps: vec![
                Step::uses("Checkout", "actions/checkout@v3"),
                Step::uses("Setup Node", "actions/setup-node@v3"),
                Step::run("Install dependencies", "npm ci"),
                Step::run("Run tests", "npm test"),
            ],
        });

        self.register(Template {
            key: "rust-ci".to_string(),
            display_name: "Rust CI".to_string(),
            runs_on: "ubuntu-latest".to_string(),
            steps: vec![
                Step::uses("Checkout", "actions/checkout@v3"),
                Step::uses("Install toolchain", "dtolnay/rust-toolchain@stable"),
                Step::run("Build", "cargo build --verbose"),
                Step::run("Run tests", "cargo test --verbose"),
            ],
        });

        self.register(Template {
            key: "python-ci".to_string(),
            display_name: "Python CI".to_string(),
            runs_on: "ubuntu-latest".to_string(),
            steps: vec![
                Step::uses("Checkout", "actions/checkout@v3"),
                Step::uses("Setup Python", "actions/setup-python@v4"),
                Step::run("Install dependencies", "pip install -r requirements.txt"),
                Step::run("Run tests", "pytest"),
            ],
        });

        self.register(Template {
            key: "npm-publish".to_string(),
            display_name: "Publish to npm".to_string(),
            runs_on: "ubuntu-latest".to_string(),
            steps: vec![
                Step::uses("Checkout", "actions/checkout@v3"),
                Step::uses("Setup Node", "actions/setup-node@v3"),
                Step::run("Install dependencies", "npm ci"),
                Step::run("Publish", "npm publish"),
            ],
        });

        self.register(Template {
            key: "pages-deploy".to_string(),
            display_name: "Deploy static site".to_string(),
            runs_on: "ubuntu-latest".to_string(),
            steps: vec![
                Step::uses("Checkout", "actions/checkout@v3"),
                Step::run("Build site", "npm run build"),
                Step::uses("Deploy to Pages", "peaceiris/actions-gh-pages@v3"),
            ],
        });

        self.register(Template {
            key: "http-check".to_string(),
            display_name: "HTTP health check".to_string(),
            runs_on: "ubuntu-latest".to_string(),
            steps: vec![
                Step::uses("Checkout", "actions/checkout@v3"),
                Step::run("Call endpoint", "curl -fsS https://example.com/health"),
            ],
        });
    }

    fn register(&mut self, template: Template) {
        self.templates.insert(template.key.clone(), template);
    }

    fn load_custom_templates(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        for entry in std::fs::read_dir(dir)
            .map_err(|e| Error::Template(format!("Failed to read templates dir: {}", e)))?
        {
            let entry =
                entry.map_err(|e| Error::Template(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();

            let is_yaml = path
                .extension()
                .map(|e| e == "yaml" || e == "yml")
                .unwrap_or(false);
            if is_yaml {
                match load_template_file(&path) {
                    Ok(template) => self.register(template),
                    Err(e) => tracing::warn!("Skipping template file {:?}: {}", path, e),
                }
            }
        }

        Ok(())
    }

    /// Look up a template by key. A miss is a normal outcome: producers
    /// ignore the requested action and create no job.
    pub fn get(&self, key: &str) -> Option<&Template> {
        self.templates.get(key)
    }

    /// List all templates, sorted by key.
    pub fn list(&self) -> Vec<&Template> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.key.cmp(&b.key));
        templates
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a template from a YAML file.
fn load_template_file(path: &Path) -> Result<Template> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Template(format!("Failed to read template file: {}", e)))?;

    serde_yaml::from_str(&content)
        .map_err(|e| Error::Template(format!("Failed to parse template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{StepAction, Workflow};

    #[test]
    fn test_catalog_has_builtin_templates() {
        let catalog = TemplateCatalog::new();

        assert!(catalog.get("node-ci").is_some());
        assert!(catalog.get("rust-ci").is_some());
        assert!(catalog.get("python-ci").is_some());
        assert!(catalog.get("npm-publish").is_some());
        assert!(catalog.get("pages-deploy").is_some());
        assert!(catalog.get("http-check").is_some());
    }

    #[test]
    fn test_list_is_sorted_by_key() {
        let catalog = TemplateCatalog::new();
        let keys: Vec<_> = catalog.list().iter().map(|t| t.key.as_str()).collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_builtins_start_with_checkout() {
        let catalog = TemplateCatalog::new();

        for template in catalog.list() {
            assert!(
                matches!(
                    &template.steps[0].action,
                    StepAction::Uses { uses } if uses.starts_with("actions/checkout@")
                ),
                "template {} does not start with checkout",
                template.key
            );
        }
    }

    #[test]
    fn test_instance_id_defaults_to_key() {
        let catalog = TemplateCatalog::new();
        let job = catalog.get("node-ci").unwrap().instantiate();

        assert_eq!(job.id, "node-ci");
        assert_eq!(job.runs_on, "ubuntu-latest");
    }

    #[test]
    fn test_instantiation_copies_are_isolated() {
        let catalog = TemplateCatalog::new();
        let template = catalog.get("node-ci").unwrap();
        let step_count = template.steps.len();

        let mut first = template.instantiate();
        let second = template.instantiate();

        first.steps.clear();
        first.steps.push(Step::run("Mutated", "true"));

        assert_eq!(second.steps.len(), step_count);
        assert_eq!(catalog.get("node-ci").unwrap().steps.len(), step_count);
    }

    #[test]
    fn test_unknown_key_leaves_workflow_unchanged() {
        let catalog = TemplateCatalog::new();
        let mut workflow = Workflow::new();

        // The producer contract: a lookup miss means no job is created
        if let Some(template) = catalog.get("does-not-exist") {
            workflow.add_job(template.instantiate());
        }

        assert_eq!(workflow.jobs.len(), 0);
    }

    #[test]
    fn test_custom_dir_templates_load_and_shadow() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = r#"key: go-ci
display_name: Go CI
runs_on: ubuntu-latest
steps:
  - name: Checkout
    uses: actions/checkout@v3
  - name: Run tests
    run: go test ./...
"#;
        std::fs::write(dir.path().join("go-ci.yml"), yaml).unwrap();

        let catalog = TemplateCatalog::with_custom_dir(dir.path()).unwrap();
        let template = catalog.get("go-ci").unwrap();
        assert_eq!(template.display_name, "Go CI");
        assert_eq!(template.steps.len(), 2);

        // Builtins are still present
        assert!(catalog.get("node-ci").is_some());
    }

    #[test]
    fn test_missing_custom_dir_is_fine() {
        let catalog = TemplateCatalog::with_custom_dir("/nonexistent/actforge-templates");
        assert!(catalog.is_ok());
    }
}
