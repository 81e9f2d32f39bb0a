//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use coursework_static::{BuildConfig, StaticBuilder};

use crate::config::ConfigFile;

/// Run the build command.
pub async fn run(config: &ConfigFile, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building course site...");

    let site = &config.site;
    let build_config = BuildConfig {
        markdown_dir: config.course.markdown_dir.clone(),
        output_dir: output.unwrap_or_else(|| site.output.clone()),
        template_dir: Some(site.template_dir.clone()),
        highlight_command: site.highlight.then(|| site.highlight_command.clone()),
        minify: minify.unwrap_or(site.minify),
        index_title: site.index_title.clone(),
    };

    let result = StaticBuilder::new(build_config).build().await?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);

    if !result.failed.is_empty() {
        tracing::warn!("{} files could not be converted", result.failed.len());
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
