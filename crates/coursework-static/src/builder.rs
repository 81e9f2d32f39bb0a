//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use coursework_md::find_files;

use crate::assets::{AssetError, AssetPipeline, DEFAULT_HIGHLIGHT_COMMAND};
use crate::render::render_markdown;
use crate::templates::{IndexEntry, PageContext, TemplateEngine};

/// Configuration for building the course site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source Markdown directory
    pub markdown_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Directory that may hold a custom `base.html`
    pub template_dir: Option<PathBuf>,

    /// Command printing the syntax highlighting stylesheet, `None` to skip it
    pub highlight_command: Option<Vec<String>>,

    /// Minify the inline stylesheet
    pub minify: bool,

    /// Title of the generated index page
    pub index_title: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("src/markdown"),
            output_dir: PathBuf::from("course"),
            template_dir: Some(PathBuf::from("src/templates")),
            highlight_command: Some(
                DEFAULT_HIGHLIGHT_COMMAND
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            minify: false,
            index_title: "Index of Documents".to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated, not counting the index
    pub pages: usize,

    /// Sources that could not be converted
    pub failed: Vec<PathBuf>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read markdown directory: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Failed to generate highlight stylesheet: {0}")]
    Highlight(#[from] AssetError),
}

/// A page to be built.
#[derive(Debug)]
struct PageInfo {
    /// Source file path
    source_path: PathBuf,

    /// Relative path from the Markdown dir
    relative_path: PathBuf,

    /// Output path
    output_path: PathBuf,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        let templates = match config.template_dir {
            Some(ref dir) => TemplateEngine::from_dir(dir),
            None => TemplateEngine::new(),
        };

        Self { config, templates }
    }

    /// Build the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Stylesheet first: a broken highlighter stops the build before any output
        let css = self.stylesheet()?;
        let head = format!("<style>{}</style>", css);

        let pages = self.discover_pages()?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let mut built = Vec::new();
        let mut failed = Vec::new();

        for page in &pages {
            tracing::info!("Converting {}...", page.relative_path.display());

            match self.build_page(page, &head) {
                Ok(()) => built.push(page),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", page.source_path.display(), e);
                    failed.push(page.source_path.clone());
                }
            }
        }

        tracing::info!("Generating index file...");
        self.generate_index(&built, &head)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: built.len(),
            failed,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Highlighter output followed by the course stylesheet.
    fn stylesheet(&self) -> Result<String, BuildError> {
        let mut css = String::new();

        if let Some(ref command) = self.config.highlight_command {
            css.push_str(&AssetPipeline::highlight_css(command)?);
            css.push('\n');
        }
        css.push_str(AssetPipeline::course_css());

        if !self.config.minify {
            return Ok(css);
        }

        match AssetPipeline::minify_css(&css) {
            Ok(minified) => Ok(minified),
            Err(e) => {
                tracing::warn!("Keeping unminified CSS: {}", e);
                Ok(css)
            }
        }
    }

    /// Discover all Markdown pages in the source directory.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let files = find_files(&self.config.markdown_dir, ".md", true)
            .map_err(|e| BuildError::ReadError(e.to_string()))?;

        let pages = files
            .into_iter()
            .map(|path| {
                let relative_path = path
                    .strip_prefix(&self.config.markdown_dir)
                    .unwrap_or(&path)
                    .to_path_buf();
                let output_path = self
                    .config
                    .output_dir
                    .join(&relative_path)
                    .with_extension("html");

                PageInfo {
                    source_path: path,
                    relative_path,
                    output_path,
                }
            })
            .collect();

        Ok(pages)
    }

    /// Render one Markdown file to its HTML page.
    fn build_page(&self, page: &PageInfo, head: &str) -> Result<(), BuildError> {
        let source = fs::read_to_string(&page.source_path).map_err(|e| {
            BuildError::ReadError(format!("{}: {}", page.source_path.display(), e))
        })?;

        let title = page
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let html = self
            .templates
            .render_page(&PageContext {
                title,
                body: render_markdown(&source),
                head: head.to_string(),
            })
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&page.output_path, &html)
    }

    /// Write `index.html` linking every built page.
    fn generate_index(&self, pages: &[&PageInfo], head: &str) -> Result<(), BuildError> {
        let entries: Vec<IndexEntry> = pages
            .iter()
            .map(|page| {
                let href = relative_href(&page.relative_path.with_extension("html"));
                let name = page
                    .output_path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| href.clone());

                IndexEntry { name, href }
            })
            .collect();

        let body = self
            .templates
            .render_index_body(&entries)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let html = self
            .templates
            .render_page(&PageContext {
                title: self.config.index_title.clone(),
                body,
                head: head.to_string(),
            })
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        write_file(&self.config.output_dir.join("index.html"), &html)
    }
}

/// Join path components with `/` for use in a link.
/// Percent-encoded, `/`-separated link to `path`.
fn relative_href(path: &Path) -> String {
    path.components()
        .map(|c| urlencoding::encode(&c.as_os_str().to_string_lossy()).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", parent.display(), e)))?;
    }

    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
