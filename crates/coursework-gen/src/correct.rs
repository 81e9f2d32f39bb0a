//! Sample code correction.
//!
//! Sends whole challenge files to the generator and replaces them with the
//! returned Markdown, which carries fixed or newly added sample code.

use std::fs;
use std::path::{Path, PathBuf};

use coursework_md::{find_files, DiscoverError};
use tracing::{info, warn};

use crate::prompts::correction_prompt;
use crate::retry::{generate_with_retry, RetryPolicy};
use crate::traits::{GenerateError, TextGenerator};

/// Which files get corrected.
#[derive(Debug, Clone)]
pub struct CorrectConfig {
    /// Root of the Markdown tree
    pub markdown_dir: PathBuf,

    /// File name suffix selecting challenge files
    pub challenge_suffix: String,
}

impl Default for CorrectConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("src/markdown"),
            challenge_suffix: "Challenge.md".to_string(),
        }
    }
}

/// Summary of a correction run.
#[derive(Debug, Default)]
pub struct CorrectionReport {
    /// Files rewritten with corrected content
    pub updated: Vec<PathBuf>,

    /// Files left untouched because correction failed
    pub failed: Vec<PathBuf>,
}

/// Errors that can occur while correcting sample code.
#[derive(Debug, thiserror::Error)]
pub enum CorrectError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to correct {path}: {source}")]
    Generate {
        path: String,
        #[source]
        source: GenerateError,
    },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Rewrites challenge files with corrected sample code.
pub struct SampleCorrector<'a> {
    generator: &'a dyn TextGenerator,
    policy: RetryPolicy,
    config: CorrectConfig,
}

impl<'a> SampleCorrector<'a> {
    /// Create a new corrector with the default retry policy.
    pub fn new(generator: &'a dyn TextGenerator, config: CorrectConfig) -> Self {
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

    /// Correct every challenge file, continuing past failures.
    pub async fn run(&self) -> Result<CorrectionReport, CorrectError> {
        let files = find_files(
            &self.config.markdown_dir,
            &self.config.challenge_suffix,
            true,
        )?;

        let mut report = CorrectionReport::default();

        for file in files {
            match self.correct_file(&file).await {
                Ok(()) => report.updated.push(file),
                Err(e) => {
                    warn!("{}", e);
                    report.failed.push(file);
                }
            }
        }

        Ok(report)
    }

    /// Correct a single challenge file in place.
    ///
    /// The file is only written once the generator succeeded.
    pub async fn correct_file(&self, path: &Path) -> Result<(), CorrectError> {
        info!("Processing {}...", path.display());

        let original = fs::read_to_string(path).map_err(|e| CorrectError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let prompt = correction_prompt(&original);
        let corrected = generate_with_retry(self.generator, &prompt, &self.policy)
            .await
            .map_err(|source| CorrectError::Generate {
                path: path.display().to_string(),
                source,
            })?;

        fs::write(path, corrected).map_err(|e| CorrectError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!("Updated {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FnGenerator, ScriptedGenerator};
    use std::time::Duration;
    use tempfile::tempdir;

    fn config(dir: &Path) -> CorrectConfig {
        CorrectConfig {
            markdown_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn rewrites_challenge_files() {
        let temp = tempdir().unwrap();
        let week = temp.path().join("Week 1");
        fs::create_dir_all(&week).unwrap();
        let file = week.join("Week 1 Challenge.md");
        fs::write(&file, "## Challenge 1: Sum\nAdd.\n").unwrap();
        fs::write(week.join("Week 1 Notes.md"), "notes").unwrap();

        let generator = FnGenerator::new(|_: &str| {
            Ok("## Challenge 1: Sum\nAdd.\n\n```python\ndef add(a, b):\n    pass\n```\n".to_string())
        });
        let corrector = SampleCorrector::new(&generator, config(temp.path()));

        let report = corrector.run().await.unwrap();

        assert_eq!(report.updated, vec![file.clone()]);
        assert!(report.failed.is_empty());
        assert_eq!(generator.prompts().len(), 1);
        assert!(generator.prompts()[0].ends_with("Challenge:\n## Challenge 1: Sum\nAdd.\n"));
        assert!(fs::read_to_string(&file).unwrap().contains("def add(a, b):"));
        assert_eq!(fs::read_to_string(week.join("Week 1 Notes.md")).unwrap(), "notes");
    }

    #[tokio::test]
    async fn failed_correction_leaves_file_untouched() {
        let temp = tempdir().unwrap();
        let broken = temp.path().join("A Challenge.md");
        let fine = temp.path().join("B Challenge.md");
        fs::write(&broken, "original A").unwrap();
        fs::write(&fine, "original B").unwrap();

        let generator = ScriptedGenerator::new(vec![
            Ok(String::new()),
            Ok("corrected B".to_string()),
        ]);
        let corrector = SampleCorrector::new(&generator, config(temp.path())).with_policy(
            RetryPolicy {
                initial_delay: Duration::ZERO,
                max_delay: Duration::ZERO,
                max_attempts: 3,
                jitter: Duration::ZERO,
            },
        );

        let report = corrector.run().await.unwrap();

        assert_eq!(report.failed, vec![broken.clone()]);
        assert_eq!(report.updated, vec![fine.clone()]);
        assert_eq!(fs::read_to_string(&broken).unwrap(), "original A");
        assert_eq!(fs::read_to_string(&fine).unwrap(), "corrected B");
    }

    #[tokio::test]
    async fn reports_generator_errors() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("Only Challenge.md");
        fs::write(&file, "text").unwrap();

        let generator =
            ScriptedGenerator::new(vec![Err(GenerateError::api("403 PERMISSION_DENIED", "key"))]);
        let corrector = SampleCorrector::new(&generator, config(temp.path()));

        let err = corrector.correct_file(&file).await.unwrap_err();

        assert!(matches!(
            err,
            CorrectError::Generate {
                source: GenerateError::Api { .. },
                ..
            }
        ));
        assert_eq!(generator.calls(), 1);
    }
}
