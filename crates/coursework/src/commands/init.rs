//! Initialize a course project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use coursework_static::DEFAULT_PAGE_TEMPLATE;

/// Run the init command in the current directory.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing course...");

    scaffold(Path::new("."), config_path, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'coursework stubs' or 'coursework build' next.");

    Ok(())
}

/// Write the starter files under `root`. Existing files are kept unless `yes`.
fn scaffold(root: &Path, config_path: &Path, yes: bool) -> Result<()> {
    let week_dir = root.join("src/markdown/Week 1");
    fs::create_dir_all(&week_dir).context("Failed to create markdown directory")?;

    let templates_dir = root.join("src/templates");
    fs::create_dir_all(&templates_dir).context("Failed to create templates directory")?;

    let files = [
        (root.join(config_path), DEFAULT_CONFIG),
        (week_dir.join("Week 1 Challenge.md"), DEFAULT_CHALLENGE),
        (templates_dir.join("base.html"), DEFAULT_PAGE_TEMPLATE),
    ];

    for (path, contents) in files {
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Coursework Configuration

[course]
# Root of the Markdown sources
markdown_dir = "src/markdown"

[site]
# Output directory for the HTML site
output = "course"
# Directory holding base.html
template_dir = "src/templates"
index_title = "Index of Documents"
minify = false
# Inline syntax highlighting styles from the command below
highlight = true
highlight_command = ["pygmentize", "-S", "default", "-f", "html", "-a", ".highlight"]

[stubs]
output = "challenges"
suffix = " Challenge.md"
# Group stubs by source directory
nested = true
# "challenge" or "exercise"
style = "challenge"
language = "python"

[generator]
model = "gemini-2.5-flash"
# The API key is read from this environment variable (.env is honored)
api_key_env = "GEMINI_API_KEY"
challenge_suffix = "Challenge.md"
solution_suffix = " Solution.md"

[retry]
initial_delay_secs = 5
max_delay_secs = 60
max_attempts = 10
"#;

const DEFAULT_CHALLENGE: &str = r#"# Week 1

Warm-up challenges. Run `coursework stubs` to turn them into a Python file.

## Challenge 1: Sum Two Numbers

Write a function `add` that returns the sum of its two arguments.

```python
def add(a, b):
    pass
```

## Challenge 2: Count Vowels

Write a function that counts the vowels in a string.

```python
def count_vowels(text):
    pass
```
"#;
