//! Configuration file (course.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use coursework_gen::gemini::{API_BASE_URL, API_KEY_ENV, DEFAULT_MODEL};
use coursework_gen::RetryPolicy;
use coursework_md::{Language, StubStyle};
use coursework_static::DEFAULT_HIGHLIGHT_COMMAND;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub course: CourseConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub stubs: StubsConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize)]
pub struct CourseConfig {
    /// Root of the Markdown sources
    #[serde(default = "default_markdown_dir")]
    pub markdown_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_output")]
    pub output: PathBuf,
    /// Directory searched for a custom base.html
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_index_title")]
    pub index_title: String,
    #[serde(default)]
    pub minify: bool,
    /// Inline the highlighter stylesheet
    #[serde(default = "default_true")]
    pub highlight: bool,
    #[serde(default = "default_highlight_command")]
    pub highlight_command: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StubsConfig {
    #[serde(default = "default_stubs_output")]
    pub output: PathBuf,
    #[serde(default = "default_stub_suffix")]
    pub suffix: String,
    #[serde(default = "default_true")]
    pub nested: bool,
    #[serde(default)]
    pub style: StubStyleName,
    /// Sample code language, also decides the stub extension
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StubStyleName {
    Exercise,
    #[default]
    Challenge,
}

#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_challenge_suffix")]
    pub challenge_suffix: String,
    #[serde(default = "default_solution_suffix")]
    pub solution_suffix: String,
}

#[derive(Debug, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            markdown_dir: default_markdown_dir(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output: default_site_output(),
            template_dir: default_template_dir(),
            index_title: default_index_title(),
            minify: false,
            highlight: true,
            highlight_command: default_highlight_command(),
        }
    }
}

impl Default for StubsConfig {
    fn default() -> Self {
        Self {
            output: default_stubs_output(),
            suffix: default_stub_suffix(),
            nested: true,
            style: StubStyleName::default(),
            language: default_language(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            challenge_suffix: default_challenge_suffix(),
            solution_suffix: default_solution_suffix(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay(),
            max_delay_secs: default_max_delay(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_markdown_dir() -> PathBuf {
    PathBuf::from("src/markdown")
}
fn default_site_output() -> PathBuf {
    PathBuf::from("course")
}
fn default_template_dir() -> PathBuf {
    PathBuf::from("src/templates")
}
fn default_index_title() -> String {
    "Index of Documents".to_string()
}
fn default_true() -> bool {
    true
}
fn default_highlight_command() -> Vec<String> {
    DEFAULT_HIGHLIGHT_COMMAND
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_stubs_output() -> PathBuf {
    PathBuf::from("challenges")
}
fn default_stub_suffix() -> String {
    " Challenge.md".to_string()
}
fn default_language() -> String {
    "python".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_key_env() -> String {
    API_KEY_ENV.to_string()
}
fn default_base_url() -> String {
    API_BASE_URL.to_string()
}
fn default_challenge_suffix() -> String {
    "Challenge.md".to_string()
}
fn default_solution_suffix() -> String {
    " Solution.md".to_string()
}
fn default_initial_delay() -> u64 {
    5
}
fn default_max_delay() -> u64 {
    60
}
fn default_max_attempts() -> u32 {
    10
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

impl StubsConfig {
    /// Resolve the stub layout.
    pub fn stub_style(&self) -> Result<StubStyle> {
        let language: Language = self
            .language
            .parse()
            .with_context(|| format!("Invalid [stubs] language '{}'", self.language))?;

        let style = match self.style {
            StubStyleName::Exercise => StubStyle::exercise(),
            StubStyleName::Challenge => StubStyle::challenge(),
        };

        Ok(style.with_language(language))
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_secs(self.initial_delay_secs),
            max_delay: Duration::from_secs(self.max_delay_secs),
            max_attempts: self.max_attempts,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_means_defaults() {
        let temp = tempdir().unwrap();

        let config = ConfigFile::load(&temp.path().join("course.toml")).unwrap();

        assert_eq!(config.course.markdown_dir, PathBuf::from("src/markdown"));
        assert_eq!(config.site.index_title, "Index of Documents");
        assert!(config.site.highlight);
        assert_eq!(config.site.highlight_command[0], "pygmentize");
        assert!(config.stubs.nested);
        assert_eq!(config.generator.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.retry.max_attempts, 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("course.toml");
        fs::write(
            &path,
            "[stubs]\nnested = false\nstyle = \"exercise\"\n\n[retry]\nmax_attempts = 3\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert!(!config.stubs.nested);
        assert_eq!(config.stubs.style, StubStyleName::Exercise);
        assert_eq!(config.stubs.suffix, " Challenge.md");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay_secs, 5);
        assert_eq!(config.site.output, PathBuf::from("course"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("course.toml");
        fs::write(&path, "[site\nminify = true").unwrap();

        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn resolves_stub_style() {
        let stubs = StubsConfig {
            style: StubStyleName::Exercise,
            language: "js".to_string(),
            ..Default::default()
        };

        let style = stubs.stub_style().unwrap();

        assert_eq!(style, StubStyle::exercise().with_language(Language::JavaScript));
    }

    #[test]
    fn rejects_unknown_language() {
        let stubs = StubsConfig {
            language: "cobol".to_string(),
            ..Default::default()
        };

        assert!(stubs.stub_style().is_err());
    }

    #[test]
    fn builds_retry_policy() {
        let policy = RetryConfig {
            initial_delay_secs: 2,
            max_delay_secs: 30,
            max_attempts: 4,
        }
        .policy();

        assert_eq!(policy.initial_delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.jitter, Duration::from_secs(1));
    }
}
