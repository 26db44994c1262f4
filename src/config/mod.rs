//! Configuration management.
//!
//! actforge configuration can come from:
//! - Environment variables (ACTFORGE_*)
//! - Config file (~/.config/actforge/config.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// actforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Template catalog configuration
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File the generated workflow is written to
    #[serde(default = "default_output_file")]
    pub file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
        }
    }
}

fn default_output_file() -> PathBuf {
    PathBuf::from("workflow.yml")
}

/// Template catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory with custom template YAML files, loaded on top of the
    /// builtins
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations. A missing or
    /// unparseable config file falls back to defaults silently.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = Self::config_dir().join("config.toml");
        if let Ok(partial) = Self::load_partial_from_path(&path) {
            config.apply_partial(partial);
        }

        config.apply_env_overrides();
        config
    }

    /// Get the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("actforge"))
            .unwrap_or_else(|| PathBuf::from(".actforge"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(file) = std::env::var("ACTFORGE_OUTPUT") {
            self.output.file = PathBuf::from(file);
        }
        if let Ok(dir) = std::env::var("ACTFORGE_TEMPLATES_DIR") {
            self.templates.dir = Some(PathBuf::from(dir));
        }
    }

    fn load_partial_from_path(path: &Path) -> std::result::Result<PartialConfig, ()> {
        let content = std::fs::read_to_string(path).map_err(|_| ())?;
        toml::from_str(&content).map_err(|_| ())
    }

    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(output) = partial.output {
            self.output = output;
        }
        if let Some(templates) = partial.templates {
            self.templates = templates;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    output: Option<OutputConfig>,
    templates: Option<TemplatesConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.file, PathBuf::from("workflow.yml"));
        assert!(config.templates.dir.is_none());
    }

    #[test]
    fn test_partial_file_overrides_only_named_sections() {
        let mut config = Config::default();
        let partial: PartialConfig =
            toml::from_str("[output]\nfile = \"ci.yml\"\n").unwrap();
        config.apply_partial(partial);

        assert_eq!(config.output.file, PathBuf::from("ci.yml"));
        assert!(config.templates.dir.is_none());
    }
}
