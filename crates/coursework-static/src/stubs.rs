//! Stub file builder.
//!
//! Converts challenge Markdown files into source files learners can run,
//! either flat next to each other or grouped by the directory they came from.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use coursework_md::{
    base_name, find_files, parse_challenges_with, render_stub, DiscoverError, StubRenderError,
    StubStyle,
};

/// Configuration for generating stub files.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Source Markdown directory
    pub markdown_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// File name suffix selecting challenge files
    pub suffix: String,

    /// Walk subdirectories and group output by parent directory name
    pub nested: bool,

    /// Stub layout and language
    pub style: StubStyle,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("src/markdown"),
            output_dir: PathBuf::from("challenges"),
            suffix: " Challenge.md".to_string(),
            nested: true,
            style: StubStyle::challenge(),
        }
    }
}

/// Result of a stub run.
#[derive(Debug)]
pub struct StubResult {
    /// Stub files written
    pub written: Vec<PathBuf>,

    /// Sources that could not be converted
    pub failed: Vec<PathBuf>,

    /// Total time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur while generating stubs.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to render {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: StubRenderError,
    },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Builds stub source files from challenge Markdown.
pub struct StubBuilder {
    config: StubConfig,
}

impl StubBuilder {
    /// Create a new stub builder.
    pub fn new(config: StubConfig) -> Self {
        Self { config }
    }

    /// Convert every matching challenge file.
    pub async fn build(&self) -> Result<StubResult, StubError> {
        let start = Instant::now();

        let files = find_files(
            &self.config.markdown_dir,
            &self.config.suffix,
            self.config.nested,
        )?;

        fs::create_dir_all(&self.config.output_dir).map_err(|e| StubError::Write {
            path: self.config.output_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut written = Vec::new();
        let mut failed = Vec::new();

        for source in files {
            let Some(target) = self.output_path(&source) else {
                continue;
            };

            match self.convert(&source, &target) {
                Ok(()) => {
                    tracing::info!("Converted {} to {}", source.display(), target.display());
                    written.push(target);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    failed.push(source);
                }
            }
        }

        Ok(StubResult {
            written,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Where the stub for `source` goes.
    fn output_path(&self, source: &Path) -> Option<PathBuf> {
        let base = base_name(source, &self.config.suffix)?;
        let file_name = format!("{}.{}", base, self.config.style.language.extension());

        if !self.config.nested {
            return Some(self.config.output_dir.join(file_name));
        }

        let group = source.parent()?.file_name()?;
        Some(self.config.output_dir.join(group).join(file_name))
    }

    fn convert(&self, source: &Path, target: &Path) -> Result<(), StubError> {
        let markdown = fs::read_to_string(source).map_err(|e| StubError::Read {
            path: source.display().to_string(),
            message: e.to_string(),
        })?;

        let doc = parse_challenges_with(&markdown, self.config.style.language);

        for section in doc.sections.iter().filter(|s| s.code_unterminated) {
            tracing::warn!(
                "Unclosed code fence in '{}' ({}), using the rest of the section as code",
                section.title,
                source.display()
            );
        }

        let stub = render_stub(&doc, &self.config.style).map_err(|source_err| {
            StubError::Render {
                path: source.display().to_string(),
                source: source_err,
            }
        })?;

        let write_err = |e: std::io::Error| StubError::Write {
            path: target.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(target, stub).map_err(write_err)
    }
}
