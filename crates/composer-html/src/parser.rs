//! # Parser - Building the Tree
//!
//! Turns the token stream from [`lexer`](crate::lexer) into a [`Fragment`].
//! The builder is tolerant in the way browsers are: it never fails, it
//! closes what the markup forgot to close, and it drops end tags that match
//! nothing. It is not a full HTML5 tree builder; it implements the subset of
//! rules that keep editor content stable:
//!
//! - void elements (`<br>`, `<img>`, ...) never take children
//! - a block start tag closes an open `<p>`
//! - `<li>` closes an open `<li>` in the same list
//! - `<script>` and `<style>` content is raw text, up to the matching end tag
//! - end tags close everything opened after their element
//!
//! Text and attribute values are entity-decoded on the way in.
//!
//! ## Stability
//!
//! For any input `x`, `parse(serialize(parse(x))) == parse(x)`. The editor
//! relies on this: content that went through the visual surface once comes
//! back unchanged from every later round trip.

use logos::Logos;

use crate::dom::{Attribute, Element, Fragment, Node, is_block, is_void};
use crate::lexer::TokenKind;

/// Elements an implied `</p>` or `</li>` never crosses.
const SCOPE_BOUNDARIES: &[&str] = &[
    "button", "caption", "object", "table", "td", "template", "th",
];

/// Parse an HTML fragment. Never fails.
pub fn parse(input: &str) -> Fragment {
    let mut builder = TreeBuilder::default();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        match result.unwrap_or(TokenKind::Text) {
            TokenKind::Text | TokenKind::Lt => builder.text(text),
            TokenKind::Comment => builder.comment(comment_body(text)),
            TokenKind::ProcessingInstruction => {
                builder.comment(&text[1..text.len() - 1]);
            }
            TokenKind::Declaration => {
                builder.push_node(Node::Doctype(text[2..text.len() - 1].to_string()));
            }
            TokenKind::EndTag => builder.end_tag(&tag_name(&text[2..])),
            TokenKind::StartTag => {
                let tag = parse_start_tag(text);
                if tag.element.is_raw_text() && !tag.self_closing {
                    let rest = lexer.remainder();
                    let (body, consumed) = split_raw_text(rest, &tag.element.tag);
                    let mut element = tag.element;
                    if !body.is_empty() {
                        element.children.push(Node::Text(body.to_string()));
                    }
                    builder.push_node(Node::Element(element));
                    lexer.bump(consumed);
                } else {
                    builder.start_tag(tag);
                }
            }
        }
    }

    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
    /// Character data not yet attached, so adjacent text tokens form one node
    pending_text: String,
}

impl TreeBuilder {
    fn text(&mut self, raw: &str) {
        self.pending_text
            .push_str(&html_escape::decode_html_entities(raw));
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        self.attach(Node::Text(text));
    }

    fn attach(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn push_node(&mut self, node: Node) {
        self.flush_text();
        self.attach(node);
    }

    fn comment(&mut self, body: &str) {
        self.push_node(Node::Comment(body.to_string()));
    }

    fn close_top(&mut self) {
        if let Some(el) = self.open.pop() {
            self.attach(Node::Element(el));
        }
    }

    /// Close open elements down to and including stack index `index`.
    fn close_through(&mut self, index: usize) {
        self.flush_text();
        while self.open.len() > index {
            self.close_top();
        }
    }

    /// Stack index of the innermost open `tag`, searching no further than
    /// the first element named in `stop_at`.
    fn find_open(&self, tag: &str, stop_at: &[&str]) -> Option<usize> {
        for (i, el) in self.open.iter().enumerate().rev() {
            if el.tag == tag {
                return Some(i);
            }
            if stop_at.contains(&el.tag.as_str()) {
                return None;
            }
        }
        None
    }

    fn start_tag(&mut self, tag: StartTag) {
        self.flush_text();
        let name = tag.element.tag.as_str();

        if is_block(name)
            && let Some(index) = self.find_open("p", SCOPE_BOUNDARIES)
        {
            self.close_through(index);
        }
        if name == "li" {
            let mut stops = SCOPE_BOUNDARIES.to_vec();
            stops.extend(["ul", "ol"]);
            if let Some(index) = self.find_open("li", &stops) {
                self.close_through(index);
            }
        }

        if tag.element.is_void() || tag.self_closing {
            self.attach(Node::Element(tag.element));
        } else {
            self.open.push(tag.element);
        }
    }

    fn end_tag(&mut self, name: &str) {
        if is_void(name) {
            return;
        }
        if let Some(index) = self.find_open(name, &[]) {
            self.close_through(index);
        }
    }

    fn finish(mut self) -> Fragment {
        self.close_through(0);
        Fragment::new(self.root)
    }
}

struct StartTag {
    element: Element,
    self_closing: bool,
}

fn comment_body(text: &str) -> &str {
    let body = &text[4..];
    body.strip_suffix("-->").unwrap_or(body)
}

/// Lowercase tag name at the start of `s`.
fn tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Parse `<tag a="1" b c='2' d=3/>` into an element and its self-closing flag.
fn parse_start_tag(text: &str) -> StartTag {
    let inner = &text[1..text.len() - 1];
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (inner, false),
    };
    let name = tag_name(inner);
    let mut element = Element::new(name.as_str());
    element.attrs = parse_attributes(&inner[name.len()..]);
    StartTag {
        element,
        self_closing,
    }
}

fn parse_attributes(s: &str) -> Vec<Attribute> {
    let mut attrs: Vec<Attribute> = Vec::new();
    let mut chars = s.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace() || *c == '/').is_some() {}
        let Some(&(start, _)) = chars.peek() else {
            break;
        };

        let mut end = start;
        while let Some((i, c)) = chars.next_if(|(_, c)| !c.is_whitespace() && *c != '=') {
            end = i + c.len_utf8();
        }
        let name = s[start..end].to_ascii_lowercase();

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let value = if chars.next_if(|(_, c)| *c == '=').is_some() {
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            Some(read_attribute_value(s, &mut chars))
        } else {
            None
        };

        // First occurrence wins, as in browsers
        if !name.is_empty() && !attrs.iter().any(|a| a.name == name) {
            attrs.push(Attribute {
                name,
                value: value.map(|v| html_escape::decode_html_entities(&v).into_owned()),
            });
        }
    }

    attrs
}

fn read_attribute_value(
    s: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> String {
    match chars.peek().copied() {
        Some((i, quote @ ('"' | '\''))) => {
            chars.next();
            let start = i + 1;
            let mut end = s.len();
            for (j, c) in chars.by_ref() {
                if c == quote {
                    end = j;
                    break;
                }
            }
            s[start..end.max(start)].to_string()
        }
        Some((i, _)) => {
            let mut end = i;
            while let Some((j, c)) = chars.next_if(|(_, c)| !c.is_whitespace()) {
                end = j + c.len_utf8();
            }
            s[i..end].to_string()
        }
        None => String::new(),
    }
}

/// Split raw text content from the rest of the input.
///
/// Returns the body and how many bytes (body plus end tag) to consume.
fn split_raw_text<'a>(rest: &'a str, tag: &str) -> (&'a str, usize) {
    let needle = format!("</{tag}");
    match rest.to_ascii_lowercase().find(&needle) {
        Some(i) => {
            let consumed = rest[i..].find('>').map_or(rest.len(), |j| i + j + 1);
            (&rest[..i], consumed)
        }
        None => (rest, rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn el(tag: &str, children: Vec<Node>) -> Node {
        Node::Element(Element::new(tag).with_children(children))
    }

    #[test]
    fn parses_nested_elements() {
        let f = parse("<p>Hi <b>there</b></p>");
        assert_eq!(
            f.children,
            vec![el(
                "p",
                vec![Node::text("Hi "), el("b", vec![Node::text("there")])]
            )]
        );
    }

    #[test]
    fn tag_names_are_lowercased() {
        let f = parse("<P CLASS=\"x\">a</P>");
        let p = f.children[0].as_element().unwrap();
        assert_eq!(p.tag, "p");
        assert_eq!(p.attr("class"), Some("x"));
    }

    #[rstest]
    #[case("<a href=\"x\">", "href", Some("x"))]
    #[case("<a href='x y'>", "href", Some("x y"))]
    #[case("<a href=x>", "href", Some("x"))]
    #[case("<input disabled>", "disabled", Some(""))]
    #[case("<a title=\"&amp;&quot;\">", "title", Some("&\""))]
    #[case("<a href=\"first\" href=\"second\">", "href", Some("first"))]
    fn attribute_forms(#[case] html: &str, #[case] name: &str, #[case] expected: Option<&str>) {
        let f = parse(html);
        let element = f.children[0].as_element().unwrap();
        assert_eq!(element.attr(name), expected);
    }

    #[test]
    fn boolean_attribute_has_no_value() {
        let f = parse("<input disabled>");
        let input = f.children[0].as_element().unwrap();
        assert_eq!(input.attrs[0].value, None);
    }

    #[test]
    fn void_elements_take_no_children() {
        let f = parse("a<br>b<img src=\"x.png\">c");
        assert_eq!(f.children.len(), 5);
        assert!(f.children[1].as_element().unwrap().children.is_empty());
    }

    #[test]
    fn self_closing_syntax() {
        let f = parse("<span/>after");
        assert_eq!(f.children, vec![el("span", vec![]), Node::text("after")]);
    }

    #[test]
    fn entities_are_decoded() {
        let f = parse("Fish &amp; Chips &lt;3");
        assert_eq!(f.children, vec![Node::text("Fish & Chips <3")]);
    }

    #[test]
    fn stray_lt_is_text() {
        let f = parse("1 < 2");
        assert_eq!(f.children, vec![Node::text("1 < 2")]);
    }

    #[test]
    fn block_closes_open_paragraph() {
        let f = parse("<p>one<div>two</div>");
        assert_eq!(
            f.children,
            vec![
                el("p", vec![Node::text("one")]),
                el("div", vec![Node::text("two")]),
            ]
        );
    }

    #[test]
    fn paragraph_closes_paragraph() {
        let f = parse("<p>one<p>two");
        assert_eq!(f.children.len(), 2);
    }

    #[test]
    fn list_items_close_siblings_not_parents() {
        let f = parse("<ul><li>a<ul><li>b<li>c</ul><li>d</ul>");
        let ul = f.children[0].as_element().unwrap();
        assert_eq!(ul.children.len(), 2);
        let nested = ul.children[0].as_element().unwrap().children[1]
            .as_element()
            .unwrap();
        assert_eq!(nested.tag, "ul");
        assert_eq!(nested.children.len(), 2);
    }

    #[test]
    fn unmatched_end_tags_are_dropped() {
        let f = parse("a</b>c</p>");
        assert_eq!(f.children, vec![Node::text("ac")]);
    }

    #[test]
    fn end_tag_closes_inner_elements() {
        let f = parse("<div><b>x</div>y");
        assert_eq!(
            f.children,
            vec![
                el("div", vec![el("b", vec![Node::text("x")])]),
                Node::text("y"),
            ]
        );
    }

    #[test]
    fn raw_text_is_not_parsed() {
        let f = parse("<style>p > b { color: red }</style><script>if (a<b) {}</SCRIPT>x");
        let style = f.children[0].as_element().unwrap();
        assert_eq!(style.children, vec![Node::text("p > b { color: red }")]);
        let script = f.children[1].as_element().unwrap();
        assert_eq!(script.children, vec![Node::text("if (a<b) {}")]);
        assert_eq!(f.children[2], Node::text("x"));
    }

    #[test]
    fn comments_and_declarations() {
        let f = parse("<!DOCTYPE html><!-- hi --><?xml v?>");
        assert_eq!(
            f.children,
            vec![
                Node::Doctype("DOCTYPE html".to_string()),
                Node::Comment(" hi ".to_string()),
                Node::Comment("?xml v?".to_string()),
            ]
        );
    }

    #[test]
    fn unclosed_elements_close_at_end() {
        let f = parse("<p><b>open");
        assert_eq!(
            f.children,
            vec![el("p", vec![el("b", vec![Node::text("open")])])]
        );
    }

    #[test]
    fn merge_tags_survive_as_text() {
        let f = parse("<p>Dear {{resident.first_name}},</p>");
        assert_eq!(f.text_content(), "Dear {{resident.first_name}},");
    }
}
