//! Reference solution files.
//!
//! For every challenge file a sibling `<stem> Solution.md` is written, holding
//! one collapsible `??? solution` block per second-level section. Existing
//! solution files are never touched.

use std::fs;
use std::path::{Path, PathBuf};

use coursework_md::{find_files, split_sections, DiscoverError};
use tracing::{info, warn};

use crate::prompts::solution_prompt;
use crate::retry::{generate_with_retry, RetryPolicy};
use crate::traits::TextGenerator;

/// Indentation applied to solution bodies inside a `???` block.
pub const SOLUTION_INDENT: &str = "    ";

/// Where challenge and solution files live.
#[derive(Debug, Clone)]
pub struct SolutionConfig {
    /// Root of the Markdown tree
    pub markdown_dir: PathBuf,

    /// File name suffix selecting challenge files
    pub challenge_suffix: String,

    /// Appended to the challenge file stem to name the solution file
    pub solution_suffix: String,
}

impl Default for SolutionConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("src/markdown"),
            challenge_suffix: "Challenge.md".to_string(),
            solution_suffix: " Solution.md".to_string(),
        }
    }
}

/// What happened to one challenge file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionOutcome {
    /// Solution file written
    Written {
        path: PathBuf,
        sections: usize,
        failed_sections: usize,
    },

    /// Solution file already existed
    Skipped(PathBuf),

    /// Challenge file has no second-level sections, nothing written
    Empty(PathBuf),
}

/// Summary of a solution generation run.
#[derive(Debug, Default)]
pub struct SolutionReport {
    /// Solution files written
    pub written: Vec<PathBuf>,

    /// Solution files that already existed
    pub skipped: Vec<PathBuf>,

    /// Challenge files that could not be processed
    pub failed: Vec<PathBuf>,

    /// Challenge files without second-level sections
    pub empty: Vec<PathBuf>,

    /// Sections whose generation failed inside written files
    pub failed_sections: usize,
}

/// Errors that can occur while generating solutions.
#[derive(Debug, thiserror::Error)]
pub enum SolutionError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Writes solution files using a text generator.
pub struct SolutionWriter<'a> {
    generator: &'a dyn TextGenerator,
    policy: RetryPolicy,
    config: SolutionConfig,
}

impl<'a> SolutionWriter<'a> {
    /// Create a new solution writer with the default retry policy.
    pub fn new(generator: &'a dyn TextGenerator, config: SolutionConfig) -> Self {
        Self {
            generator,
            policy: RetryPolicy::default(),
            config,
        }
    }

    /// Use a custom retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the solution file belonging to `challenge`.
    pub fn solution_path(&self, challenge: &Path) -> PathBuf {
        let stem = challenge
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("challenge");
        let name = format!("{stem}{}", self.config.solution_suffix);

        match challenge.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Generate solutions for every challenge file that lacks one.
    ///
    /// A failing file is logged and recorded; the run moves on.
    pub async fn run(&self) -> Result<SolutionReport, SolutionError> {
        let files = find_files(
            &self.config.markdown_dir,
            &self.config.challenge_suffix,
            true,
        )?;

        let mut report = SolutionReport::default();

        for file in files {
            match self.write_solutions(&file).await {
                Ok(SolutionOutcome::Written {
                    path,
                    failed_sections,
                    ..
                }) => {
                    report.written.push(path);
                    report.failed_sections += failed_sections;
                }
                Ok(SolutionOutcome::Skipped(path)) => report.skipped.push(path),
                Ok(SolutionOutcome::Empty(path)) => report.empty.push(path),
                Err(e) => {
                    warn!("{}", e);
                    report.failed.push(file);
                }
            }
        }

        Ok(report)
    }

    /// Generate the solution file for a single challenge file.
    pub async fn write_solutions(&self, challenge: &Path) -> Result<SolutionOutcome, SolutionError> {
        let target = self.solution_path(challenge);
        let name = display_name(challenge);

        if target.exists() {
            info!("Skipping {}, solution already exists.", name);
            return Ok(SolutionOutcome::Skipped(target));
        }

        info!("Processing {}...", name);

        let source = fs::read_to_string(challenge).map_err(|e| SolutionError::Read {
            path: challenge.display().to_string(),
            message: e.to_string(),
        })?;

        let sections = split_sections(&source);
        if sections.is_empty() {
            warn!("No sections found in {}", name);
            return Ok(SolutionOutcome::Empty(challenge.to_path_buf()));
        }

        let mut blocks = Vec::with_capacity(sections.len());
        let mut failed_sections = 0;

        for section in &sections {
            info!("Generating solution for '{}'...", section.heading);

            let prompt = solution_prompt(&section.content);
            let solution = match generate_with_retry(self.generator, &prompt, &self.policy).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Solution for '{}' failed: {}", section.heading, e);
                    failed_sections += 1;
                    format!("Failed to generate solution: {e}")
                }
            };

            blocks.push(wrap_solution(&section.heading, &solution));
        }

        fs::write(&target, blocks.join("\n\n")).map_err(|e| SolutionError::Write {
            path: target.display().to_string(),
            message: e.to_string(),
        })?;

        info!("Saved solutions to {}", display_name(&target));

        Ok(SolutionOutcome::Written {
            path: target,
            sections: sections.len(),
            failed_sections,
        })
    }
}

/// Wrap generated Markdown in a collapsible block titled `heading`.
///
/// Non-blank lines are indented by [`SOLUTION_INDENT`]; blank lines are
/// emptied so the block nests correctly.
pub fn wrap_solution(heading: &str, markdown: &str) -> String {
    let body = markdown
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{SOLUTION_INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("??? solution \"{heading}\"\n{body}")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
