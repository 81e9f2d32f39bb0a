//! Challenge Markdown parsing.
//!
//! This crate splits course Markdown files into challenge sections, isolates
//! the sample code of each challenge, and renders stub source files from the
//! result. Everything here is pure text processing apart from [`discover`].

pub mod codeblock;
pub mod discover;
pub mod parser;
pub mod stub;

pub use codeblock::{
    closed_fence_ranges, is_closed_fence, FenceLine, FenceTracker, Language, UnknownLanguage,
};
pub use discover::{base_name, find_files, DiscoverError};
pub use parser::{
    parse_challenges, parse_challenges_with, split_sections, ChallengeDocument, ChallengeSection,
    Section,
};
pub use stub::{render_stub, StubRenderError, StubStyle, END_MARKER};
