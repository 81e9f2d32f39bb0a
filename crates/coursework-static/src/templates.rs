//! Template engine for rendering course pages.

use std::path::Path;

use minijinja::{context, path_loader, Environment};

/// Name of the page template, both built in and in a template directory.
pub const PAGE_TEMPLATE: &str = "base.html";

const INDEX_BODY_TEMPLATE: &str = "_index_body.html";

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Rendered content HTML
    pub body: String,
    /// Extra markup for `<head>`, usually the inline stylesheet
    pub head: String,
}

/// A link on the index page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexEntry {
    /// Link text
    pub name: String,
    /// Link target relative to the output root
    pub href: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in page template.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned(PAGE_TEMPLATE.to_string(), DEFAULT_PAGE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        Self::with_index_body(env)
    }

    /// Load `base.html` from `dir`, falling back to the built-in template
    /// when the directory has none.
    pub fn from_dir(dir: &Path) -> Self {
        if !dir.join(PAGE_TEMPLATE).is_file() {
            tracing::debug!(
                "No {} in {}, using the built-in template",
                PAGE_TEMPLATE,
                dir.display()
            );
            return Self::new();
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(dir.to_path_buf()));

        Self::with_index_body(env)
    }

    fn with_index_body(mut env: Environment<'static>) -> Self {
        env.add_template_owned(
            INDEX_BODY_TEMPLATE.to_string(),
            INDEX_BODY.to_string(),
        )
        .expect("Failed to add index template");

        Self { env }
    }

    /// Render a full page.
    pub fn render_page(&self, context: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(PAGE_TEMPLATE)?;

        tmpl.render(context! {
            title => &context.title,
            body => &context.body,
            head => &context.head,
        })
    }

    /// Render the body of the index page.
    pub fn render_index_body(&self, entries: &[IndexEntry]) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(INDEX_BODY_TEMPLATE)?;

        tmpl.render(context! { entries => entries })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in page template. `init` writes it out for customization.
pub const DEFAULT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  {{ head | safe }}
</head>
<body>
  <main class="content">
    {{ body | safe }}
  </main>
</body>
</html>
"##;

const INDEX_BODY: &str = r##"<h1>Index</h1>
<ul>
{% for entry in entries %}  <li><a href="{{ entry.href }}">{{ entry.name }}</a></li>
{% endfor %}</ul>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn page(title: &str, body: &str) -> PageContext {
        PageContext {
            title: title.to_string(),
            body: body.to_string(),
            head: "<style>.highlight{}</style>".to_string(),
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_page(&page("Week 1 Challenge", "<p>Hello world</p>"))
            .unwrap();

        assert!(html.contains("<title>Week 1 Challenge</title>"));
        assert!(html.contains("<style>.highlight{}</style>"));
        assert!(html.contains("<p>Hello world</p>"));
    }

    #[test]
    fn escapes_title() {
        let engine = TemplateEngine::new();

        let html = engine.render_page(&page("A & B", "")).unwrap();

        assert!(html.contains("<title>A &amp; B</title>"));
    }

    #[test]
    fn renders_index_links() {
        let engine = TemplateEngine::new();
        let entries = vec![
            IndexEntry {
                name: "Intro.html".to_string(),
                href: "Intro.html".to_string(),
            },
            IndexEntry {
                name: "<b>.html".to_string(),
                href: "<b>.html".to_string(),
            },
        ];

        let body = engine.render_index_body(&entries).unwrap();

        assert!(body.starts_with("<h1>Index</h1>\n<ul>\n"));
        assert!(body.contains("<li><a href=\"Intro.html\">Intro.html</a></li>"));
        assert!(body.contains("&lt;b&gt;.html"));
        assert!(body.ends_with("</ul>"));
    }

    #[test]
    fn loads_page_template_from_dir() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("base.html"),
            "<html><h6>{{ title }}</h6>{{ body | safe }}</html>",
        )
        .unwrap();

        let engine = TemplateEngine::from_dir(temp.path());
        let html = engine.render_page(&page("Custom", "<p>x</p>")).unwrap();

        assert_eq!(html, "<html><h6>Custom</h6><p>x</p></html>");
    }

    #[test]
    fn falls_back_without_template_file() {
        let temp = tempdir().unwrap();

        let engine = TemplateEngine::from_dir(temp.path());
        let html = engine.render_page(&page("Fallback", "")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
