//! Merge-tag resolution.
//!
//! [`resolve`] replaces every `{{ dotted.path }}` token with the matching
//! value from a JSON data context. Tokens without a usable value stay in the
//! output verbatim and are reported in [`ResolvedContent::unresolved_tags`],
//! so a preview shows exactly what the recipient would miss.
//!
//! Resolution is pure and idempotent: running it again on its own output
//! changes nothing. Substituted values never form new tokens, either on
//! their own (a value of `"{{x}}"`) or together with surrounding braces in
//! the content (`{{{{a}}}}` with `a = "b"`). Such accidental tokens have
//! their opening brace defused with an invisible separator, or with a
//! character reference when escaping for HTML.

use serde_json::Value;
use std::ops::Range;

use super::scan::token_regex;

/// Output of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContent {
    pub text: String,
    /// Literal tokens left in `text`, first appearance order, no duplicates
    pub unresolved_tags: Vec<String>,
}

impl ResolvedContent {
    pub fn is_complete(&self) -> bool {
        self.unresolved_tags.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// HTML-escape substituted values, for content that will be sent as HTML
    pub escape_html: bool,
}

/// Resolve with default options: values are substituted verbatim.
pub fn resolve(content: &str, context: &Value) -> ResolvedContent {
    resolve_with(content, context, ResolveOptions::default())
}

pub fn resolve_with(content: &str, context: &Value, options: ResolveOptions) -> ResolvedContent {
    let mut text = String::with_capacity(content.len());
    let mut kept: Vec<Range<usize>> = Vec::new();
    let mut unresolved_tags: Vec<String> = Vec::new();
    let mut last = 0;

    for caps in token_regex().captures_iter(content) {
        let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        text.push_str(&content[last..whole.start()]);
        match lookup(context, path.as_str()).and_then(stringify) {
            Some(value) if options.escape_html => {
                text.push_str(&html_escape::encode_double_quoted_attribute(&value));
            }
            Some(value) => text.push_str(&value),
            None => {
                let start = text.len();
                text.push_str(whole.as_str());
                kept.push(start..text.len());
                if !unresolved_tags.iter().any(|t| t == whole.as_str()) {
                    unresolved_tags.push(whole.as_str().to_string());
                }
            }
        }
        last = whole.end();
    }
    text.push_str(&content[last..]);

    defuse_new_tokens(&mut text, &mut kept, options);

    ResolvedContent {
        text,
        unresolved_tags,
    }
}

/// Look up a dotted path in `context`.
///
/// Objects are walked key by key and numeric segments index arrays. When
/// the walk fails, a top-level key spelled exactly like the whole path is
/// tried, so flat contexts such as `{"resident.name": "Ann"}` work too.
pub fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = context;
    let mut walked = true;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => {
                walked = false;
                break;
            }
        }
    }
    if walked {
        return Some(current);
    }
    context.as_object().and_then(|map| map.get(path))
}

/// Scalars become text; null, objects and arrays count as missing.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Break every token in `text` that is not one of the `kept` literals.
fn defuse_new_tokens(text: &mut String, kept: &mut [Range<usize>], options: ResolveOptions) {
    let replacement = if options.escape_html {
        "&#123;"
    } else {
        "{\u{200B}"
    };
    let grow = replacement.len() - 1;

    loop {
        let stray = token_regex()
            .find_iter(text)
            .find(|m| !kept.iter().any(|k| *k == m.range()))
            .map(|m| m.start());
        let Some(start) = stray else {
            break;
        };
        log::debug!("defusing token formed by substitution at byte {start}");
        text.replace_range(start..start + 1, replacement);
        for range in kept.iter_mut() {
            if range.start > start {
                range.start += grow;
                range.end += grow;
            }
        }
    }
}
