//! Asset pipeline for the inline page stylesheet.

use std::process::Command;

/// The default syntax highlighting stylesheet generator.
pub const DEFAULT_HIGHLIGHT_COMMAND: [&str; 7] =
    ["pygmentize", "-S", "default", "-f", "html", "-a", ".highlight"];

/// Errors from running the highlight stylesheet command.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Highlight command is empty")]
    EmptyCommand,

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{program} produced non UTF-8 output")]
    Utf8 { program: String },
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The built-in course stylesheet.
    pub fn course_css() -> &'static str {
        COURSE_CSS
    }

    /// Run an external command and capture the stylesheet it prints.
    pub fn highlight_css(command: &[String]) -> Result<String, AssetError> {
        let (program, args) = command.split_first().ok_or(AssetError::EmptyCommand)?;

        tracing::debug!("Running {}", command.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| AssetError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AssetError::Failed {
                program: program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| AssetError::Utf8 {
            program: program.clone(),
        })
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const COURSE_CSS: &str = r#"/* Course pages */
:root {
  --content-max-width: 860px;
  --border: #d0d7de;
  --muted: #f6f8fa;
  --accent: #0969da;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  line-height: 1.6;
  color: #1f2328;
  margin: 0;
}

.content {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem 1.5rem;
}

.content h1 {
  font-size: 2.25rem;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.5rem;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content a {
  color: var(--accent);
}

.content table {
  border-collapse: collapse;
  margin-bottom: 1rem;
}

.content th,
.content td {
  border: 1px solid var(--border);
  padding: 0.375rem 0.75rem;
}

.content code {
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.875em;
  background: var(--muted);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.highlight {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  margin-bottom: 1rem;
}

.highlight pre {
  margin: 0;
  padding: 1rem;
  overflow-x: auto;
}

.highlight pre code {
  background: none;
  padding: 0;
}

/* Collapsible solution blocks */
details {
  border: 1px solid var(--border);
  border-left: 4px solid var(--accent);
  border-radius: 0.375rem;
  padding: 0.5rem 1rem;
  margin-bottom: 1rem;
}

details > summary {
  cursor: pointer;
  font-weight: 600;
}

details[open] > summary {
  margin-bottom: 0.75rem;
}

details.solution {
  border-left-color: #1a7f37;
}
"#;
