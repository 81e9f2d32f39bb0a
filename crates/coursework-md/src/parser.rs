//! Challenge document parser.
//!
//! Splits a Markdown file on `## Challenge N: ...` headings and pulls the
//! first sample code fence out of each section body.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;

use crate::codeblock::{closed_fence_ranges, is_closed_fence, Language};

static CHALLENGE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^## (Challenge \d+: .+)$").expect("Invalid challenge heading regex")
});

static SECTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").expect("Invalid section heading regex"));

/// A parsed challenge file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeDocument {
    /// Text before the first challenge heading
    pub header: String,

    /// Challenges in document order
    pub sections: Vec<ChallengeSection>,
}

/// One `## Challenge N: ...` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeSection {
    /// Heading text, numbering included
    pub title: String,

    /// Prose before the sample code fence
    pub description: String,

    /// Contents of the first sample code fence
    pub code: Option<String>,

    /// Prose after the sample code fence
    pub remainder: String,

    /// Whole section body, trimmed
    pub body: String,

    /// The sample fence never closes; `code` runs to the end of the section
    pub code_unterminated: bool,
}

impl ChallengeSection {
    /// Check if the section carries non-empty sample code.
    pub fn has_code(&self) -> bool {
        self.code.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// A generic second-level section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text
    pub heading: String,
    /// Body text, trimmed
    pub content: String,
}

/// Parse a challenge document using Python as the sample language.
pub fn parse_challenges(source: &str) -> ChallengeDocument {
    parse_challenges_with(source, Language::Python)
}

/// Parse a challenge document, treating `language` fences as sample code.
pub fn parse_challenges_with(source: &str, language: Language) -> ChallengeDocument {
    let (header, raw_sections) = split_on(source, &CHALLENGE_HEADING_RE);

    let sections = raw_sections
        .into_iter()
        .map(|(title, body)| build_section(title, body, language))
        .collect();

    ChallengeDocument {
        header: header.to_string(),
        sections,
    }
}

/// Split a document on every `## ` heading.
///
/// Text before the first heading is dropped.
pub fn split_sections(source: &str) -> Vec<Section> {
    let (_, raw_sections) = split_on(source, &SECTION_HEADING_RE);

    raw_sections
        .into_iter()
        .map(|(heading, content)| Section {
            heading: heading.to_string(),
            content: content.to_string(),
        })
        .collect()
}

/// Split `source` on lines matching `pattern`, whose first capture group is
/// the title. Matches inside closed fenced blocks are skipped. A fence that
/// is never closed hides nothing, so later headings still split.
fn split_on<'a>(source: &'a str, pattern: &Regex) -> (&'a str, Vec<(&'a str, &'a str)>) {
    let fenced = closed_fence_ranges(source);

    let headings: Vec<(Range<usize>, &str)> = pattern
        .captures_iter(source)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str())))
        .filter(|(line, _)| !fenced.iter().any(|f| f.contains(&line.start)))
        .collect();

    let header_end = headings.first().map_or(source.len(), |(line, _)| line.start);

    let sections = headings
        .iter()
        .enumerate()
        .map(|(i, (line, title))| {
            let end = headings
                .get(i + 1)
                .map_or(source.len(), |(next, _)| next.start);
            (title.trim(), source[line.end..end].trim())
        })
        .collect();

    (source[..header_end].trim(), sections)
}

/// The first sample fence found in a section body.
struct SampleBlock {
    range: Range<usize>,
    code: String,
    closed: bool,
}

fn find_sample(body: &str, language: Language) -> Option<SampleBlock> {
    let mut found: Option<SampleBlock> = None;

    for (event, range) in Parser::new(body).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                if found.is_none() && Language::from_info(&info) == language =>
            {
                found = Some(SampleBlock {
                    closed: is_closed_fence(&body[range.clone()]),
                    range,
                    code: String::new(),
                });
            }

            Event::Text(text) => {
                if let Some(block) = found.as_mut() {
                    block.code.push_str(&text);
                }
            }

            Event::End(TagEnd::CodeBlock) if found.is_some() => break,

            _ => {}
        }
    }

    found
}

fn build_section(title: &str, body: &str, language: Language) -> ChallengeSection {
    let Some(sample) = find_sample(body, language) else {
        return ChallengeSection {
            title: title.to_string(),
            description: body.to_string(),
            body: body.to_string(),
            ..Default::default()
        };
    };

    ChallengeSection {
        title: title.to_string(),
        description: body[..sample.range.start].trim().to_string(),
        code: Some(normalize_code(&sample.code)),
        remainder: body[sample.range.end..].trim().to_string(),
        body: body.to_string(),
        code_unterminated: !sample.closed,
    }
}

/// Drop leading blank lines and trailing whitespace, keeping indentation.
fn normalize_code(code: &str) -> String {
    let mut rest = code.trim_end();
    while let Some((line, tail)) = rest.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        rest = tail;
    }
    rest.to_string()
}
