//! Output builders for course material.
//!
//! Renders challenge Markdown into runnable stub files and into a static HTML
//! site with an index page and inline syntax highlighting styles.

pub mod assets;
pub mod builder;
pub mod render;
pub mod stubs;
pub mod templates;

pub use assets::{AssetError, AssetPipeline, DEFAULT_HIGHLIGHT_COMMAND};
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use render::render_markdown;
pub use stubs::{StubBuilder, StubConfig, StubError, StubResult};
pub use templates::{TemplateEngine, DEFAULT_PAGE_TEMPLATE};
