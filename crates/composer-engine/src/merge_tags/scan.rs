//! Token scanning.
//!
//! A merge tag is `{{`, optional whitespace, a dotted path of ASCII word
//! segments, optional whitespace and `}}`. Anything else, including
//! `{{ a..b }}`, `{{}}` or `{{ a b }}`, is ordinary text.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}")
            .expect("Invalid merge tag regex")
    })
}

/// One token occurrence in scanned content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Literal token text, whitespace included
    pub literal: String,
    /// Dotted path without braces or whitespace
    pub path: String,
    /// Byte span of `literal` in the scanned content
    pub span: Range<usize>,
}

/// Every token in `content`, in order of appearance.
pub fn find_merge_tags(content: &str) -> Vec<TagMatch> {
    token_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let path = caps.get(1)?;
            Some(TagMatch {
                literal: whole.as_str().to_string(),
                path: path.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Path of `tag` when the whole string is exactly one token.
pub fn token_path(tag: &str) -> Option<&str> {
    let caps = token_regex().captures(tag)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != tag.len() {
        return None;
    }
    caps.get(1).map(|m| m.as_str())
}
