//! Deterministic HTML serialization.
//!
//! Attributes are always double quoted, tag names lowercase, void elements
//! written without an end tag and every other element with one. Text is
//! escaped for `&`, `<` and `>`; raw-text elements are written verbatim.

use crate::dom::{Attribute, Element, Node};

pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

/// Serialize a single element including its tags.
pub fn serialize_element(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(el) => write_element(el, out),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Node::Doctype(body) => {
                out.push_str("<!");
                out.push_str(body);
                out.push('>');
            }
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for attr in &el.attrs {
        write_attribute(attr, out);
    }
    out.push('>');

    if el.is_void() {
        return;
    }

    if el.is_raw_text() {
        for child in &el.children {
            if let Node::Text(text) = child {
                out.push_str(text);
            }
        }
    } else {
        write_nodes(&el.children, out);
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn write_attribute(attr: &Attribute, out: &mut String) {
    out.push(' ');
    out.push_str(&attr.name);
    if let Some(value) = &attr.value {
        out.push_str("=\"");
        // `>` inside a value would end the tag for our lexer
        out.push_str(&html_escape::encode_double_quoted_attribute(value).replace('>', "&gt;"));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Fragment;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn writes_elements_and_attributes() {
        let el = Element::new("a")
            .with_attr("href", "https://example.com/?a=1&b=2")
            .with_children(vec![Node::text("link")]);
        assert_eq!(
            serialize_element(&el),
            "<a href=\"https://example.com/?a=1&amp;b=2\">link</a>"
        );
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let el = Element::new("br");
        assert_eq!(serialize_element(&el), "<br>");
    }

    #[test]
    fn attribute_quotes_are_escaped() {
        let el = Element::new("span").with_attr("title", "say \"hi\" > bye");
        let html = serialize_element(&el);
        assert!(html.ends_with("\"></span>"));
        assert_eq!(html.matches('>').count(), 2);
        let reparsed = Fragment::parse(&html);
        assert_eq!(
            reparsed.children[0].as_element().unwrap().attr("title"),
            Some("say \"hi\" > bye")
        );
    }

    #[test]
    fn raw_text_is_verbatim() {
        let f = Fragment::parse("<style>a > b { x: y }</style>");
        assert_eq!(f.to_html(), "<style>a > b { x: y }</style>");
    }

    #[test]
    fn normalizes_markup() {
        let f = Fragment::parse("<P Class=x>Tom &amp; Jerry<BR/>1 < 2");
        assert_eq!(f.to_html(), "<p class=\"x\">Tom &amp; Jerry<br>1 &lt; 2</p>");
    }

    #[rstest]
    #[case("<p>Hello <b>{{resident.name}}</b></p>")]
    #[case("<P Class=x>Tom &amp; Jerry<BR/>1 < 2")]
    #[case("<ul><li>a<li>b</ul><p>x<div>y</div>")]
    #[case("<!-- c --><span title='a>b'>t</span>")]
    #[case("<a href=\"{{links.portal}}\" target=_blank>Portal</a>")]
    #[case("<style>p{}</style><script>x<y</script>")]
    #[case("<table><tr><td>1<p>2</td></tr></table>")]
    #[case("text only")]
    #[case("<p>unterminated <b")]
    #[case("<img src=x><input disabled>")]
    fn serialization_is_stable(#[case] input: &str) {
        let once = Fragment::parse(input).to_html();
        let twice = Fragment::parse(&once).to_html();
        assert_eq!(once, twice);
    }
}
