//! Stub generation command.

use std::path::PathBuf;

use anyhow::Result;
use coursework_static::{StubBuilder, StubConfig};

use crate::config::ConfigFile;

/// Run the stubs command.
pub async fn run(config: &ConfigFile, output: Option<PathBuf>, flat: bool) -> Result<()> {
    tracing::info!("Generating challenge stubs...");

    let stubs = &config.stubs;
    let stub_config = StubConfig {
        markdown_dir: config.course.markdown_dir.clone(),
        output_dir: output.unwrap_or_else(|| stubs.output.clone()),
        suffix: stubs.suffix.clone(),
        nested: stubs.nested && !flat,
        style: stubs.stub_style()?,
    };
    let output_dir = stub_config.output_dir.clone();

    let result = StubBuilder::new(stub_config).build().await?;

    tracing::info!(
        "Wrote {} stub files in {}ms",
        result.written.len(),
        result.duration_ms
    );

    if !result.failed.is_empty() {
        tracing::warn!("{} files could not be converted", result.failed.len());
    }

    tracing::info!("Output: {}", output_dir.display());

    Ok(())
}
