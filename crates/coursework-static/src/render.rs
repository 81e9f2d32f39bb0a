//! Markdown to HTML rendering.
//!
//! Plain CommonMark goes through pulldown-cmark. On top of that, fenced code
//! is wrapped in `<div class="highlight">` and `??? kind "title"` blocks
//! become `<details>` elements.

use std::sync::LazyLock;

use coursework_md::{FenceLine, FenceTracker};
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\?\?\?(\+)?[ \t]+([A-Za-z0-9_-]+)(?:[ \t]+"(.*)")?[ \t]*$"#)
        .expect("Invalid details regex")
});

/// A run of plain Markdown or a collapsible block.
#[derive(Debug, PartialEq)]
enum Segment {
    Markdown(String),
    Details {
        kind: String,
        title: String,
        open: bool,
        children: Vec<Segment>,
    },
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render a Markdown document to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let segments = split_segments(source);

    let mut events = Vec::new();
    push_events(&mut events, &segments);

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    html_output
}

/// Cut `source` into Markdown runs and `???` blocks.
///
/// A block body is every following line indented by four spaces or a tab,
/// plus blank lines in between. Markers inside fenced code are left alone.
fn split_segments(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut markdown = String::new();
    let mut fences = FenceTracker::new();
    let mut lines = source.lines().peekable();

    while let Some(line) = lines.next() {
        let outside = fences.push(line) == FenceLine::Outside;

        let caps = match DETAILS_RE.captures(line) {
            Some(caps) if outside => caps,
            _ => {
                markdown.push_str(line);
                markdown.push('\n');
                continue;
            }
        };

        let mut body = String::new();
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() {
                body.push('\n');
            } else if let Some(rest) = next.strip_prefix("    ").or_else(|| next.strip_prefix('\t')) {
                body.push_str(rest);
                body.push('\n');
            } else {
                break;
            }
            lines.next();
        }

        if !markdown.is_empty() {
            segments.push(Segment::Markdown(std::mem::take(&mut markdown)));
        }

        let kind = caps[2].to_string();
        let title = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| capitalize(&kind));

        segments.push(Segment::Details {
            kind,
            title,
            open: caps.get(1).is_some(),
            children: split_segments(&body),
        });
    }

    if !markdown.is_empty() {
        segments.push(Segment::Markdown(markdown));
    }

    segments
}

fn push_events<'a>(events: &mut Vec<Event<'a>>, segments: &'a [Segment]) {
    for segment in segments {
        match segment {
            Segment::Markdown(text) => {
                for event in Parser::new_ext(text, options()) {
                    match event {
                        Event::Start(Tag::CodeBlock(_)) => {
                            events.push(Event::Html("<div class=\"highlight\">".into()));
                            events.push(event);
                        }
                        Event::End(TagEnd::CodeBlock) => {
                            events.push(event);
                            events.push(Event::Html("</div>\n".into()));
                        }
                        other => events.push(other),
                    }
                }
            }

            Segment::Details {
                kind,
                title,
                open,
                children,
            } => {
                let open_attr = if *open { " open" } else { "" };
                events.push(Event::Html(
                    format!("<details class=\"{kind}\"{open_attr}>\n<summary>").into(),
                ));
                events.push(Event::Text(title.as_str().into()));
                events.push(Event::Html("</summary>\n".into()));
                push_events(events, children);
                events.push(Event::Html("</details>\n".into()));
            }
        }
    }
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
