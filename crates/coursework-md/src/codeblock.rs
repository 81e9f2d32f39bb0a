//! Code fence languages and fence helpers.

use std::fmt;
use std::str::FromStr;

/// Programming language named by a code fence info string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Python,
    Bash,
    JavaScript,
    TypeScript,
    Rust,
    Sql,
    Json,
    Yaml,
    Toml,
    Html,
    Css,
    #[default]
    Unknown,
}

impl Language {
    /// Parse language from code fence info string.
    ///
    /// Only the first word counts, so `python title="sum.py"` is Python.
    /// Attribute-list tags such as `{.python}` are accepted too.
    pub fn from_info(info: &str) -> Self {
        let tag = info.split_whitespace().next().unwrap_or("");
        let tag = tag.trim_start_matches(['{', '.']).trim_end_matches('}');
        Self::from_tag(tag).unwrap_or(Self::Unknown)
    }

    fn from_tag(tag: &str) -> Option<Self> {
        let lang = match tag.to_lowercase().as_str() {
            "python" | "py" | "python3" => Self::Python,
            "bash" | "sh" | "shell" => Self::Bash,
            "js" | "javascript" => Self::JavaScript,
            "ts" | "typescript" => Self::TypeScript,
            "rust" | "rs" => Self::Rust,
            "sql" => Self::Sql,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "toml" => Self::Toml,
            "html" => Self::Html,
            "css" => Self::Css,
            _ => return None,
        };
        Some(lang)
    }

    /// File extension for stub files written in this language.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Bash => "sh",
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
            Self::Rust => "rs",
            Self::Sql => "sql",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Html => "html",
            Self::Css => "css",
            Self::Unknown => "txt",
        }
    }

    /// Line comment marker, if the language has one.
    pub fn line_comment(&self) -> Option<&'static str> {
        match self {
            Self::Python | Self::Bash | Self::Yaml | Self::Toml => Some("#"),
            Self::JavaScript | Self::TypeScript | Self::Rust => Some("//"),
            Self::Sql => Some("--"),
            Self::Json | Self::Html | Self::Css | Self::Unknown => None,
        }
    }

    /// A statement that prints `title` when the stub is run.
    pub fn announce(&self, title: &str) -> Option<String> {
        let quoted = quote(title);
        match self {
            Self::Python => Some(format!("print({quoted})")),
            Self::Bash => Some(format!("echo {quoted}")),
            Self::JavaScript | Self::TypeScript => Some(format!("console.log({quoted});")),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Python => "python",
            Self::Bash => "bash",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Rust => "rust",
            Self::Sql => "sql",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Html => "html",
            Self::Css => "css",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Returned when a configured language name is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("Unknown code language: {0}")]
pub struct UnknownLanguage(pub String);

/// Double-quote a string literal, escaping backslashes and quotes.
fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Check whether the raw source of a fenced block ends with its closing fence.
///
/// `raw` is the slice covered by the block, opening fence included. Blockquote
/// markers in front of the fences are ignored.
pub fn is_closed_fence(raw: &str) -> bool {
    let strip = |line: &str| line.trim().trim_start_matches(['>', ' ']).to_string();

    let mut lines = raw.trim_end().lines();
    let Some(opening) = lines.next().map(strip) else {
        return false;
    };

    let Some(marker) = opening.chars().next().filter(|c| *c == '`' || *c == '~') else {
        return false;
    };
    let width = opening.chars().take_while(|c| *c == marker).count();

    match lines.last().map(strip) {
        Some(closing) => closing.len() >= width && closing.chars().all(|c| c == marker),
        None => false,
    }
}

/// How a line relates to the fenced blocks around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceLine {
    /// Ordinary text outside any fence
    Outside,
    /// Opening fence
    Open,
    /// Content of an open fence
    Inside,
    /// Closing fence
    Close,
    /// Opening fence with an info string while another fence is still open.
    /// The earlier fence was never closed.
    Reopen,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    width: usize,
}

/// Follows fenced code blocks line by line.
///
/// Works like CommonMark, except that a fence line carrying an info string
/// (` ```python `) inside an open fence of the same marker and at least the
/// same width starts a new block instead of being content. Such a line
/// cannot close a block, so it means the author forgot the closing fence.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fence is open after the lines seen so far.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Classify the next line and update the state.
    pub fn push(&mut self, line: &str) -> FenceLine {
        let parsed = parse_fence(line);

        let Some(open) = self.open else {
            return match parsed {
                Some((fence, _)) => {
                    self.open = Some(fence);
                    FenceLine::Open
                }
                None => FenceLine::Outside,
            };
        };

        match parsed {
            Some((fence, info)) if fence.marker == open.marker && fence.width >= open.width => {
                if info.is_empty() {
                    self.open = None;
                    FenceLine::Close
                } else {
                    self.open = Some(fence);
                    FenceLine::Reopen
                }
            }
            _ => FenceLine::Inside,
        }
    }
}

/// Byte ranges of fenced blocks that have a closing fence.
///
/// Blocks left open, either until the end of `source` or until a
/// [`FenceLine::Reopen`], are not reported.
pub fn closed_fence_ranges(source: &str) -> Vec<std::ops::Range<usize>> {
    let mut tracker = FenceTracker::new();
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        match tracker.push(line) {
            FenceLine::Open | FenceLine::Reopen => start = offset,
            FenceLine::Close => ranges.push(start..offset + line.len()),
            FenceLine::Outside | FenceLine::Inside => {}
        }
        offset += line.len();
    }

    ranges
}

/// Parse a fence line into its marker, width and info string.
fn parse_fence(line: &str) -> Option<(Fence, &str)> {
    let text = line.trim().trim_start_matches(['>', ' ']);

    let marker = text.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let width = text.chars().take_while(|c| *c == marker).count();
    if width < 3 {
        return None;
    }

    let info = text[width..].trim();
    if marker == '`' && info.contains('`') {
        return None;
    }

    Some((Fence { marker, width }, info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_fences_by_marker_and_width() {
        let mut tracker = FenceTracker::new();

        let lines = [
            "````markdown",
            "```python",
            "x = 1",
            "```",
            "~~~",
            "````",
            "after",
        ];
        let kinds: Vec<_> = lines.iter().map(|l| tracker.push(l)).collect();

        assert_eq!(
            kinds,
            vec![
                FenceLine::Open,
                FenceLine::Inside,
                FenceLine::Inside,
                FenceLine::Inside,
                FenceLine::Inside,
                FenceLine::Close,
                FenceLine::Outside,
            ]
        );
        assert!(!tracker.is_open());
    }

    #[test]
    fn info_string_fence_reopens_unclosed_block() {
        let mut tracker = FenceTracker::new();

        assert_eq!(tracker.push("```python"), FenceLine::Open);
        assert_eq!(tracker.push("## Challenge 2: Next"), FenceLine::Inside);
        assert_eq!(tracker.push("```python"), FenceLine::Reopen);
        assert_eq!(tracker.push("```"), FenceLine::Close);
    }

    #[test]
    fn reports_only_closed_ranges() {
        let source = "```python\nopen\n```python\nx\n```\ntext\n~~~\nrest\n";

        let ranges = closed_fence_ranges(source);

        assert_eq!(ranges.len(), 1);
        assert_eq!(&source[ranges[0].clone()], "```python\nx\n```\n");
    }

    #[test]
    fn inline_code_is_not_a_fence() {
        let mut tracker = FenceTracker::new();

        assert_eq!(tracker.push("``` `x` ```"), FenceLine::Outside);
        assert_eq!(tracker.push("``not a fence"), FenceLine::Outside);
    }

    #[test]
    fn parses_language() {
        assert_eq!(Language::from_info("python"), Language::Python);
        assert_eq!(Language::from_info("py title=\"sum.py\""), Language::Python);
        assert_eq!(Language::from_info("{.python}"), Language::Python);
        assert_eq!(Language::from_info("Bash"), Language::Bash);
        assert_eq!(Language::from_info("ts"), Language::TypeScript);
        assert_eq!(Language::from_info(""), Language::Unknown);
        assert_eq!(Language::from_info("cobol"), Language::Unknown);
    }

    #[test]
    fn parses_configured_names() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!(" JS ".parse::<Language>().unwrap(), Language::JavaScript);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn announces_titles() {
        assert_eq!(
            Language::Python.announce("Challenge 1: Sum"),
            Some("print(\"Challenge 1: Sum\")".to_string())
        );
        assert_eq!(
            Language::Python.announce("Say \"hi\""),
            Some("print(\"Say \\\"hi\\\"\")".to_string())
        );
        assert_eq!(Language::Rust.announce("x"), None);
    }

    #[test]
    fn detects_closed_fences() {
        assert!(is_closed_fence("```python\nx = 1\n```\n"));
        assert!(is_closed_fence("~~~\nx\n~~~~"));
        assert!(is_closed_fence("> ```\n> x\n> ```"));
        assert!(!is_closed_fence("```python\nx = 1\n"));
        assert!(!is_closed_fence("````python\nx = 1\n```"));
        assert!(!is_closed_fence("```"));
    }
}
