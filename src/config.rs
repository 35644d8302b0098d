use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::JenLensError;

/// Configuration file structure for JenLens.
///
/// Allows users to save common settings and reuse them across runs.
/// Configuration files are loaded from the current directory, a specified
/// path, or the platform config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Jenkins connection and selection settings
    #[serde(default)]
    pub jenkins: JenkinsConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JenkinsConfig {
    /// Jenkins base URL (e.g. 'https://ci.example.com/')
    pub base_url: Option<String>,

    /// Top-level suite job whose child jobs are reported on
    #[serde(default = "default_suite")]
    pub suite: String,

    /// Project job nested under the suite
    #[serde(default = "default_project")]
    pub project: String,

    /// Recent successful builds to collect per job
    #[serde(default = "default_success_count")]
    pub success_count: usize,

    /// Toggle keep-forever on every collected build
    #[serde(default)]
    pub mark_forever: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Report rendering format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    Csv,
    Html,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            suite: default_suite(),
            project: default_project(),
            success_count: default_success_count(),
            mark_forever: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty: false,
        }
    }
}

fn default_suite() -> String {
    "Performance Tests".to_string()
}

fn default_project() -> String {
    "Genresmanagement".to_string()
}

fn default_success_count() -> usize {
    3
}

/// Fully-resolved settings after merging CLI arguments over the config file.
///
/// Construction validates the base URL, so every consumer downstream can
/// assume a well-formed project reference.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: Url,
    pub suite: String,
    pub project: String,
    pub success_count: usize,
    pub mark_forever: bool,
}

impl JenkinsConfig {
    /// Validate the Jenkins section into resolved settings.
    ///
    /// The base URL is required; a missing or unparseable value is a fatal
    /// configuration error raised before any network activity.
    pub fn resolve(&self) -> std::result::Result<ResolvedConfig, JenLensError> {
        let raw = self.base_url.as_deref().unwrap_or("").trim();
        if raw.is_empty() {
            return Err(JenLensError::Config(
                "base URL is required (pass --url or set jenkins.base-url)".to_string(),
            ));
        }

        let base_url = Url::parse(raw)
            .map_err(|e| JenLensError::Config(format!("Invalid base URL '{raw}': {e}")))?;

        Ok(ResolvedConfig {
            base_url,
            suite: self.suite.clone(),
            project: self.project.clone(),
            success_count: self.success_count,
            mark_forever: self.mark_forever,
        })
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./jenlens.toml
    /// 3. ./jenlens.json
    /// 4. ./jenlens.yaml
    /// 5. ./jenlens.yml
    /// 6. <config dir>/jenlens/config.toml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        // Try common configuration file names
        let candidates = ["jenlens.toml", "jenlens.json", "jenlens.yaml", "jenlens.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jenlens").join("config.toml"))
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.jenkins.base_url, None);
        assert_eq!(config.jenkins.suite, "Performance Tests");
        assert_eq!(config.jenkins.project, "Genresmanagement");
        assert_eq!(config.jenkins.success_count, 3);
        assert!(!config.jenkins.mark_forever);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_resolve_requires_base_url() {
        let config = JenkinsConfig::default();
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, JenLensError::Config(_)));
        assert!(err.to_string().contains("base URL"));
    }

    #[test]
    fn test_resolve_rejects_invalid_base_url() {
        let config = JenkinsConfig {
            base_url: Some("not a url".to_string()),
            ..JenkinsConfig::default()
        };
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, JenLensError::Config(_)));
    }

    #[test]
    fn test_resolve_carries_settings_through() {
        let config = JenkinsConfig {
            base_url: Some("https://ci.example.com/".to_string()),
            suite: "Functional Tests".to_string(),
            project: "Checkout".to_string(),
            success_count: 5,
            mark_forever: true,
        };

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.base_url.as_str(), "https://ci.example.com/");
        assert_eq!(resolved.suite, "Functional Tests");
        assert_eq!(resolved.project, "Checkout");
        assert_eq!(resolved.success_count, 5);
        assert!(resolved.mark_forever);
    }

    #[test]
    fn test_load_toml_config() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[jenkins]
base-url = "https://ci.example.com/"
suite = "Functional Tests"
success-count = 5

[output]
format = "json"
pretty = true
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(
            config.jenkins.base_url.as_deref(),
            Some("https://ci.example.com/")
        );
        assert_eq!(config.jenkins.suite, "Functional Tests");
        // Unset keys fall back to defaults
        assert_eq!(config.jenkins.project, "Genresmanagement");
        assert_eq!(config.jenkins.success_count, 5);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
jenkins:
  base-url: "https://ci.example.com/"
  mark-forever: true
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.jenkins.mark_forever);
        assert_eq!(config.jenkins.success_count, 3);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/jenlens.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
