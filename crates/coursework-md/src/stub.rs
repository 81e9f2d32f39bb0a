//! Stub file rendering.
//!
//! Turns a [`ChallengeDocument`] into a source file where every challenge
//! becomes a commented block followed by its sample code.

use crate::codeblock::Language;
use crate::parser::ChallengeDocument;

/// Marker line closing every challenge block.
pub const END_MARKER: &str = "--- End of Challenge ---";

/// Layout options for stub files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubStyle {
    /// Language the stub is written in
    pub language: Language,

    /// Comment line inviting the learner to write code
    pub placeholder: String,

    /// Emit a statement printing the challenge title
    pub announce_title: bool,
}

impl StubStyle {
    /// Flat exercise files: title, description, placeholder, code.
    pub fn exercise() -> Self {
        Self {
            language: Language::Python,
            placeholder: "Add your solution below ...".to_string(),
            announce_title: false,
        }
    }

    /// Runnable challenge files that print each title before its code.
    pub fn challenge() -> Self {
        Self {
            language: Language::Python,
            placeholder: "Write your solution below ...".to_string(),
            announce_title: true,
        }
    }

    /// Use a different stub language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

impl Default for StubStyle {
    fn default() -> Self {
        Self::challenge()
    }
}

/// Errors that can occur when rendering a stub.
#[derive(Debug, thiserror::Error)]
pub enum StubRenderError {
    #[error("Language {0} has no line comment syntax")]
    NoLineComment(Language),
}

/// Render a challenge document as a stub source file.
pub fn render_stub(doc: &ChallengeDocument, style: &StubStyle) -> Result<String, StubRenderError> {
    let marker = style
        .language
        .line_comment()
        .ok_or(StubRenderError::NoLineComment(style.language))?;

    let mut out = String::new();
    let comment = |out: &mut String, text: &str| {
        out.push_str(format!("{marker} {}", text.trim()).trim_end());
        out.push('\n');
    };

    for line in doc.header.lines() {
        comment(&mut out, line);
    }
    out.push('\n');

    for section in &doc.sections {
        comment(&mut out, &section.title);
        if style.announce_title {
            out.push('\n');
        }

        for line in section.description.lines().chain(section.remainder.lines()) {
            comment(&mut out, line);
        }
        out.push('\n');

        if style.announce_title {
            if let Some(statement) = style.language.announce(&section.title) {
                out.push_str(&statement);
                out.push_str("\n\n");
            }
        }

        comment(&mut out, &style.placeholder);
        if let Some(code) = section.code.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(code);
            out.push('\n');
        }

        out.push('\n');
        comment(&mut out, END_MARKER);
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_challenges;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"# Week 1

Basics.

## Challenge 1: Sum
Write a function that sums two numbers.

```python
def solve(a, b): pass
```

## Challenge 2: Explain
Describe a loop.
"#;

    #[test]
    fn renders_exercise_layout() {
        let doc = parse_challenges(SOURCE);

        let stub = render_stub(&doc, &StubStyle::exercise()).unwrap();

        let expected = "\
# # Week 1
#
# Basics.

# Challenge 1: Sum
# Write a function that sums two numbers.

# Add your solution below ...
def solve(a, b): pass

# --- End of Challenge ---

# Challenge 2: Explain
# Describe a loop.

# Add your solution below ...

# --- End of Challenge ---

";
        assert_eq!(stub, expected);
    }

    #[test]
    fn renders_challenge_layout() {
        let doc = parse_challenges(SOURCE);

        let stub = render_stub(&doc, &StubStyle::challenge()).unwrap();

        let expected = "\
# # Week 1
#
# Basics.

# Challenge 1: Sum

# Write a function that sums two numbers.

print(\"Challenge 1: Sum\")

# Write your solution below ...
def solve(a, b): pass

# --- End of Challenge ---

# Challenge 2: Explain

# Describe a loop.

print(\"Challenge 2: Explain\")

# Write your solution below ...

# --- End of Challenge ---

";
        assert_eq!(stub, expected);
    }

    #[test]
    fn uses_language_comment_marker() {
        let doc = parse_challenges("## Challenge 1: Log\nLog it.\n");
        let style = StubStyle::challenge().with_language(Language::JavaScript);

        let stub = render_stub(&doc, &style).unwrap();

        assert!(stub.contains("// Challenge 1: Log\n"));
        assert!(stub.contains("console.log(\"Challenge 1: Log\");\n"));
        assert!(stub.contains("// --- End of Challenge ---\n"));
    }

    #[test]
    fn rejects_languages_without_line_comments() {
        let doc = parse_challenges("## Challenge 1: Data\nShape it.\n");
        let style = StubStyle::exercise().with_language(Language::Json);

        let result = render_stub(&doc, &style);

        assert!(matches!(
            result,
            Err(StubRenderError::NoLineComment(Language::Json))
        ));
    }
}
