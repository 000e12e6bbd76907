//! Script stripping for preview output.
//!
//! The preview viewer is already sandboxed; this pass removes active content
//! up front so the generated document is inert even outside the sandbox.

use crate::dom::{Element, Fragment, Node};

/// Elements removed together with their content.
const BLOCKED_ELEMENTS: &[&str] = &[
    "applet", "base", "embed", "frame", "frameset", "iframe", "link", "meta", "object", "script",
];

/// Attributes holding URLs that get checked for script schemes.
const URL_ATTRIBUTES: &[&str] = &[
    "action",
    "background",
    "formaction",
    "href",
    "poster",
    "src",
    "xlink:href",
];

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:text/html"];

/// Remove scripts, embedded browsing contexts, event handler attributes and
/// script URLs. Returns how many elements and attributes were removed.
pub fn sanitize(fragment: &mut Fragment) -> usize {
    sanitize_children(&mut fragment.children)
}

/// Parse, sanitize and re-serialize.
pub fn sanitize_html(html: &str) -> String {
    let mut fragment = Fragment::parse(html);
    sanitize(&mut fragment);
    fragment.to_html()
}

fn sanitize_children(children: &mut Vec<Node>) -> usize {
    let before = children.len();
    children.retain(|node| {
        !matches!(node, Node::Element(el) if BLOCKED_ELEMENTS.contains(&el.tag.as_str()))
    });
    let mut removed = before - children.len();

    for node in children.iter_mut() {
        if let Node::Element(el) = node {
            removed += sanitize_attributes(el);
            if !el.is_raw_text() {
                removed += sanitize_children(&mut el.children);
            }
        }
    }
    removed
}

fn sanitize_attributes(el: &mut Element) -> usize {
    let before = el.attrs.len();
    el.attrs.retain(|attr| {
        if attr.name.starts_with("on") || attr.name == "srcdoc" {
            return false;
        }
        if URL_ATTRIBUTES.contains(&attr.name.as_str())
            && let Some(value) = &attr.value
        {
            return !is_script_url(value);
        }
        true
    });
    before - el.attrs.len()
}

fn is_script_url(value: &str) -> bool {
    // Browsers ignore whitespace and control characters inside the scheme
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|scheme| compact.starts_with(scheme))
}
