//! Sample code correction command.

use anyhow::Result;
use coursework_gen::{CorrectConfig, SampleCorrector};

use crate::commands::solutions::client;
use crate::config::ConfigFile;

/// Run the correct command.
pub async fn run(config: &ConfigFile) -> Result<()> {
    tracing::info!("Correcting sample code...");

    let client = client(config)?;
    let correct_config = CorrectConfig {
        markdown_dir: config.course.markdown_dir.clone(),
        challenge_suffix: config.generator.challenge_suffix.clone(),
    };

    let report = SampleCorrector::new(&client, correct_config)
        .with_policy(config.retry.policy())
        .run()
        .await?;

    tracing::info!("Updated {} challenge files", report.updated.len());

    if !report.failed.is_empty() {
        tracing::warn!("{} files were left unchanged", report.failed.len());
    }

    Ok(())
}
