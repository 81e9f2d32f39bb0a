//! Solution generation command.

use anyhow::{Context, Result};
use coursework_gen::{GeminiClient, SolutionConfig, SolutionWriter};

use crate::config::ConfigFile;

/// Create the API client described by the `[generator]` table.
pub fn client(config: &ConfigFile) -> Result<GeminiClient> {
    let generator = &config.generator;

    let client = GeminiClient::from_env(&generator.api_key_env)
        .context("Set the API key in the environment or a .env file")?
        .with_model(&generator.model)
        .with_base_url(&generator.base_url);

    tracing::debug!("Using model {}", client.model());
    Ok(client)
}

/// Run the solutions command.
pub async fn run(config: &ConfigFile) -> Result<()> {
    tracing::info!("Generating solutions...");

    let client = client(config)?;
    let solution_config = SolutionConfig {
        markdown_dir: config.course.markdown_dir.clone(),
        challenge_suffix: config.generator.challenge_suffix.clone(),
        solution_suffix: config.generator.solution_suffix.clone(),
    };

    let report = SolutionWriter::new(&client, solution_config)
        .with_policy(config.retry.policy())
        .run()
        .await?;

    tracing::info!(
        "Wrote {} solution files, skipped {} existing",
        report.written.len(),
        report.skipped.len()
    );

    if !report.empty.is_empty() {
        tracing::info!("{} challenge files had no sections", report.empty.len());
    }

    if report.failed_sections > 0 {
        tracing::warn!(
            "{} sections could not be solved, see 'Failed to generate solution' entries",
            report.failed_sections
        );
    }

    if !report.failed.is_empty() {
        tracing::warn!("{} challenge files could not be processed", report.failed.len());
    }

    Ok(())
}
