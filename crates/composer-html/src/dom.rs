//! # DOM - Mutable Document Tree
//!
//! A small owned tree describing an HTML fragment: the content of an
//! editable region rather than a full document. The root is a
//! [`Fragment`], a list of top-level [`Node`]s.
//!
//! ## Addressing
//!
//! Nodes are addressed by [`NodePath`], the list of child indexes from the
//! root (`[]` is the root itself, `[1, 0]` is the first child of the second
//! top-level node). A [`DomPoint`] follows the DOM range convention:
//!
//! - when the path names a **text node**, `offset` is a byte offset into its text
//! - when the path names the **root or an element**, `offset` is a child index
//!
//! ## Linear text offsets
//!
//! Editing commands work on *linear* offsets: the byte position inside the
//! concatenation of every text node in document order (raw-text elements such
//! as `<style>` excluded). Wrapping text in `<b>` or a list never changes linear
//! offsets, which is what lets a selection survive structural edits. Use
//! [`Fragment::point_to_offset`] and [`Fragment::offset_to_point`] to move
//! between the two coordinate systems.

use std::ops::Range;

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text, never parsed or escaped.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Inline formatting elements that disappear when emptied and merge when adjacent.
pub const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "em", "font", "i", "s", "small", "span", "strong", "sub", "sup", "u",
];

/// Elements that start a new block.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes written without `=`
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = Some(value),
            None => self.attrs.push(Attribute {
                name,
                value: Some(value),
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }

    pub fn is_void(&self) -> bool {
        is_void(&self.tag)
    }

    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.tag.as_str())
    }

    pub fn is_block(&self) -> bool {
        is_block(&self.tag)
    }

    pub fn is_formatting(&self) -> bool {
        FORMATTING_ELEMENTS.contains(&self.tag.as_str())
    }
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Decoded character data
    Text(String),
    Comment(String),
    /// Body of a `<!...>` declaration, without the `<!` and `>`
    Doctype(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Whether this node is whitespace-only text.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    /// Concatenated text of this node and its descendants, raw text excluded.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }
}

/// A position in a [`Fragment`], see the module docs for the offset convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomPoint {
    pub path: NodePath,
    pub offset: usize,
}

impl DomPoint {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// A text node located by [`Fragment::text_nodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNodeRef {
    pub path: NodePath,
    /// Linear offset of the node's first byte
    pub start: usize,
    pub len: usize,
}

impl TextNodeRef {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Root of an editable HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn parse(html: &str) -> Self {
        crate::parser::parse(html)
    }

    pub fn to_html(&self) -> String {
        crate::serialize::serialize(&self.children)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    // ============ Navigation ============

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get(first)?;
        for &i in rest {
            node = node.as_element()?.children.get(i)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(first)?;
        for &i in rest {
            node = node.as_element_mut()?.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Child list of the root (`[]`) or of the element at `path`.
    pub fn children_at(&self, path: &[usize]) -> Option<&Vec<Node>> {
        if path.is_empty() {
            return Some(&self.children);
        }
        self.node(path)?.as_element().map(|el| &el.children)
    }

    pub fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        if path.is_empty() {
            return Some(&mut self.children);
        }
        self.node_mut(path)?.as_element_mut().map(|el| &mut el.children)
    }

    /// Elements from the root down to (excluding) the node at `path`.
    pub fn ancestors(&self, path: &[usize]) -> Vec<&Element> {
        (1..path.len())
            .filter_map(|depth| self.node(&path[..depth]).and_then(Node::as_element))
            .collect()
    }

    /// Path of the nearest ancestor of `path` whose tag is in `tags`.
    pub fn nearest_ancestor(&self, path: &[usize], tags: &[&str]) -> Option<NodePath> {
        (1..path.len()).rev().find_map(|depth| {
            let el = self.node(&path[..depth])?.as_element()?;
            tags.contains(&el.tag.as_str())
                .then(|| path[..depth].to_vec())
        })
    }

    fn inside_raw_text(&self, path: &[usize]) -> bool {
        self.ancestors(path).iter().any(|el| el.is_raw_text())
    }

    // ============ Linear text offsets ============

    /// Every text node in document order, raw text excluded.
    pub fn text_nodes(&self) -> Vec<TextNodeRef> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        let mut cursor = 0;
        walk_text(&self.children, &mut path, &mut cursor, &mut out);
        out
    }

    pub fn text_len(&self) -> usize {
        self.text_nodes().last().map_or(0, |t| t.start + t.len)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Convert a point into a linear text offset.
    ///
    /// Returns `None` when the point does not address an existing position
    /// (stale path, offset out of range, comment node, raw text, inside a
    /// void element).
    pub fn point_to_offset(&self, point: &DomPoint) -> Option<usize> {
        let nodes = self.text_nodes();
        match self.node(&point.path) {
            Some(Node::Text(text)) => {
                if point.offset > text.len() || !text.is_char_boundary(point.offset) {
                    return None;
                }
                let found = nodes.iter().find(|t| t.path == point.path)?;
                Some(found.start + point.offset)
            }
            Some(Node::Element(el)) => {
                if point.offset > el.children.len() || el.is_raw_text() || el.is_void() {
                    return None;
                }
                if self.inside_raw_text(&point.path) {
                    return None;
                }
                Some(offset_before_child(&nodes, &point.path, point.offset))
            }
            Some(_) => None,
            None if point.path.is_empty() => {
                if point.offset > self.children.len() {
                    return None;
                }
                Some(offset_before_child(&nodes, &point.path, point.offset))
            }
            None => None,
        }
    }

    /// Convert a linear text offset into a point.
    ///
    /// Offsets on the boundary between two text nodes resolve to the end of
    /// the earlier one, so typing after bold text continues the bold run.
    /// Offsets past the end clamp to the end of the last text node; a
    /// fragment without text yields the end of the root.
    pub fn offset_to_point(&self, offset: usize) -> DomPoint {
        let nodes = self.text_nodes();
        if let Some(t) = nodes.iter().find(|t| t.start <= offset && offset <= t.start + t.len) {
            return DomPoint::new(t.path.clone(), offset - t.start);
        }
        match nodes.last() {
            Some(last) => DomPoint::new(last.path.clone(), last.len),
            None => DomPoint::new(Vec::new(), self.children.len()),
        }
    }

    /// Point just past the last text of the fragment.
    pub fn end_point(&self) -> DomPoint {
        self.offset_to_point(usize::MAX)
    }

    // ============ Mutation ============

    /// Make sure a text node boundary exists at linear `offset`.
    pub fn split_text_at(&mut self, offset: usize) {
        let Some(t) = self
            .text_nodes()
            .into_iter()
            .find(|t| t.start < offset && offset < t.start + t.len)
        else {
            return;
        };
        let local = floor_char_boundary_of(self, &t.path, offset - t.start);
        let Some((parent, index)) = t.path.split_last().map(|(i, p)| (p.to_vec(), *i)) else {
            return;
        };
        let Some(children) = self.children_at_mut(&parent) else {
            return;
        };
        if let Some(Node::Text(text)) = children.get_mut(index) {
            if local == 0 || local == text.len() {
                return;
            }
            let tail = text.split_off(local);
            children.insert(index + 1, Node::Text(tail));
        }
    }

    /// Insert plain text at `point`, returning the point right after it.
    ///
    /// The text is stored as character data and never parsed as markup.
    /// Inserting next to an existing text node extends that node, so no
    /// adjacent text siblings are created.
    pub fn insert_text(&mut self, point: &DomPoint, text: &str) -> Option<DomPoint> {
        if self.inside_raw_text(&point.path) {
            return None;
        }
        let in_text = match self.node(&point.path) {
            Some(Node::Text(_)) => true,
            Some(Node::Element(el)) if el.is_void() || el.is_raw_text() => return None,
            Some(Node::Comment(_)) | Some(Node::Doctype(_)) => return None,
            _ => false,
        };

        if in_text {
            let Some(Node::Text(existing)) = self.node_mut(&point.path) else {
                return None;
            };
            if point.offset > existing.len() || !existing.is_char_boundary(point.offset) {
                return None;
            }
            existing.insert_str(point.offset, text);
            return Some(DomPoint::new(point.path.clone(), point.offset + text.len()));
        }

        let children = self.children_at_mut(&point.path)?;
        let index = point.offset;
        if index > children.len() {
            return None;
        }
        let mut child_path = point.path.clone();
        if index > 0
            && let Some(Node::Text(prev)) = children.get_mut(index - 1)
        {
            prev.push_str(text);
            child_path.push(index - 1);
            return Some(DomPoint::new(child_path, prev.len()));
        }
        if let Some(Node::Text(next)) = children.get_mut(index) {
            next.insert_str(0, text);
            child_path.push(index);
            return Some(DomPoint::new(child_path, text.len()));
        }
        children.insert(index, Node::text(text));
        child_path.push(index);
        Some(DomPoint::new(child_path, text.len()))
    }

    /// Insert a node at `point`, splitting a text node when needed.
    ///
    /// Returns the point just after the inserted node, expressed as a child
    /// index of its parent.
    pub fn insert_node(&mut self, point: &DomPoint, node: Node) -> Option<DomPoint> {
        if self.inside_raw_text(&point.path) {
            return None;
        }
        let is_text = matches!(self.node(&point.path), Some(Node::Text(_)));
        if is_text {
            let (&index, parent) = point.path.split_last()?;
            let children = self.children_at_mut(parent)?;
            let Some(Node::Text(text)) = children.get_mut(index) else {
                return None;
            };
            if point.offset > text.len() || !text.is_char_boundary(point.offset) {
                return None;
            }
            let tail = text.split_off(point.offset);
            let head_empty = text.is_empty();
            let mut at = index + 1;
            if head_empty {
                children.remove(index);
                at = index;
            }
            children.insert(at, node);
            if !tail.is_empty() {
                children.insert(at + 1, Node::Text(tail));
            }
            return Some(DomPoint::new(parent.to_vec(), at + 1));
        }
        let children = self.children_at_mut(&point.path)?;
        if point.offset > children.len() {
            return None;
        }
        children.insert(point.offset, node);
        Some(DomPoint::new(point.path.clone(), point.offset + 1))
    }

    /// Remove the text covered by a linear range.
    ///
    /// Text nodes left empty are removed, as are formatting elements that no
    /// longer contain anything.
    pub fn delete_text(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        // Reverse document order keeps earlier paths valid while editing
        for t in self.text_nodes().into_iter().rev() {
            let start = range.start.max(t.start);
            let end = range.end.min(t.start + t.len);
            if start >= end {
                continue;
            }
            if let Some(Node::Text(text)) = self.node_mut(&t.path) {
                let local_start = floor_char_boundary(text, start - t.start);
                let local_end = floor_char_boundary(text, end - t.start);
                text.replace_range(local_start..local_end, "");
            }
        }
        self.normalize();
    }

    /// Replace the node at `path` with its children.
    pub fn unwrap_node(&mut self, path: &[usize]) {
        let Some((&index, parent)) = path.split_last() else {
            return;
        };
        let Some(children) = self.children_at_mut(parent) else {
            return;
        };
        if index >= children.len() {
            return;
        }
        if let Node::Element(el) = children.remove(index) {
            for (i, child) in el.children.into_iter().enumerate() {
                children.insert(index + i, child);
            }
        }
    }

    /// Canonical form: no empty or adjacent text nodes, no empty formatting
    /// elements, and adjacent identical formatting elements merged.
    pub fn normalize(&mut self) {
        normalize_children(&mut self.children);
    }
}

fn walk_text(
    nodes: &[Node],
    path: &mut NodePath,
    cursor: &mut usize,
    out: &mut Vec<TextNodeRef>,
) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        match node {
            Node::Text(text) => {
                out.push(TextNodeRef {
                    path: path.clone(),
                    start: *cursor,
                    len: text.len(),
                });
                *cursor += text.len();
            }
            Node::Element(el) if !el.is_raw_text() => walk_text(&el.children, path, cursor, out),
            _ => {}
        }
        path.pop();
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if !el.is_raw_text() => collect_text(&el.children, out),
            _ => {}
        }
    }
}

/// Linear offset of the position just before child `index` of `parent`.
fn offset_before_child(nodes: &[TextNodeRef], parent: &[usize], index: usize) -> usize {
    let mut position = parent.to_vec();
    position.push(index);
    nodes
        .iter()
        .filter(|t| t.path < position)
        .map(|t| t.len)
        .sum()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn floor_char_boundary_of(fragment: &Fragment, path: &[usize], index: usize) -> usize {
    match fragment.node(path) {
        Some(Node::Text(text)) => floor_char_boundary(text, index),
        _ => index,
    }
}

fn normalize_children(children: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    for mut node in children.drain(..) {
        if let Node::Element(el) = &mut node
            && !el.is_raw_text()
        {
            normalize_children(&mut el.children);
        }
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Element(el) if el.is_formatting() && el.children.is_empty() => {}
            Node::Text(text) => match out.last_mut() {
                Some(Node::Text(prev)) => prev.push_str(&text),
                _ => out.push(Node::Text(text)),
            },
            Node::Element(el) => match out.last_mut() {
                Some(Node::Element(prev))
                    if prev.is_formatting() && prev.tag == el.tag && prev.attrs == el.attrs =>
                {
                    prev.children.extend(el.children);
                    normalize_children(&mut prev.children);
                }
                _ => out.push(Node::Element(el)),
            },
            other => out.push(other),
        }
    }
    *children = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frag(html: &str) -> Fragment {
        Fragment::parse(html)
    }

    // ============ Navigation ============

    #[test]
    fn node_lookup_by_path() {
        let f = frag("<p>a<b>bold</b></p>tail");
        assert_eq!(f.node(&[0, 1, 0]), Some(&Node::text("bold")));
        assert_eq!(f.node(&[1]), Some(&Node::text("tail")));
        assert_eq!(f.node(&[0, 5]), None);
        assert_eq!(f.node(&[]), None);
        assert_eq!(f.children_at(&[]).map(Vec::len), Some(2));
    }

    #[test]
    fn nearest_ancestor_finds_formatting() {
        let f = frag("<p><i><b>x</b></i></p>");
        assert_eq!(f.nearest_ancestor(&[0, 0, 0, 0], &["b"]), Some(vec![0, 0, 0]));
        assert_eq!(f.nearest_ancestor(&[0, 0, 0, 0], &["i"]), Some(vec![0, 0]));
        assert_eq!(f.nearest_ancestor(&[0, 0, 0, 0], &["u"]), None);
    }

    // ============ Linear offsets ============

    #[test]
    fn text_nodes_skip_raw_text() {
        let f = frag("ab<style>p{}</style><b>cd</b>");
        let nodes = f.text_nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].path, vec![2, 0]);
        assert_eq!(nodes[1].range(), 2..4);
        assert_eq!(f.text_content(), "abcd");
    }

    #[test]
    fn point_offset_round_trip() {
        let f = frag("<p>ab<b>cd</b>ef</p>");
        for offset in 0..=f.text_len() {
            let point = f.offset_to_point(offset);
            assert_eq!(f.point_to_offset(&point), Some(offset), "offset {offset}");
        }
    }

    #[test]
    fn element_points_map_to_preceding_text() {
        let f = frag("<p>ab<br>cd</p>");
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![0], 2)), Some(2));
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![], 1)), Some(4));
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![], 0)), Some(0));
    }

    #[test]
    fn stale_points_are_rejected() {
        let f = frag("ab");
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![0], 3)), None);
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![4], 0)), None);
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![], 2)), None);
    }

    #[test]
    fn void_elements_have_no_inside() {
        let f = frag("<p>a<img src=\"x\">b</p>");
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![0, 1], 0)), None);
        assert_eq!(f.point_to_offset(&DomPoint::new(vec![0], 2)), Some(1));
    }

    #[test]
    fn boundary_offsets_prefer_earlier_node() {
        let f = frag("<b>ab</b>cd");
        assert_eq!(f.offset_to_point(2), DomPoint::new(vec![0, 0], 2));
    }

    #[test]
    fn empty_fragment_end_point() {
        let f = frag("<img src=\"x.png\">");
        assert_eq!(f.end_point(), DomPoint::new(vec![], 1));
    }

    // ============ Mutation ============

    #[test]
    fn insert_text_inside_text_node() {
        let mut f = frag("AB");
        let after = f.insert_text(&DomPoint::new(vec![0], 1), "X").unwrap();
        assert_eq!(f.to_html(), "AXB");
        assert_eq!(after, DomPoint::new(vec![0], 2));
    }

    #[test]
    fn insert_text_is_never_markup() {
        let mut f = frag("");
        f.insert_text(&DomPoint::new(vec![], 0), "<b>{{x.y}}</b>").unwrap();
        assert_eq!(f.children, vec![Node::text("<b>{{x.y}}</b>")]);
        assert_eq!(f.to_html(), "&lt;b&gt;{{x.y}}&lt;/b&gt;");
    }

    #[test]
    fn insert_text_at_element_point_extends_neighbour() {
        let mut f = frag("ab<br>");
        let after = f.insert_text(&DomPoint::new(vec![], 1), "c").unwrap();
        assert_eq!(f.to_html(), "abc<br>");
        assert_eq!(after, DomPoint::new(vec![0], 3));
    }

    #[test]
    fn insert_node_splits_text() {
        let mut f = frag("ab");
        let img = Node::Element(Element::new("img").with_attr("src", "x.png"));
        let after = f.insert_node(&DomPoint::new(vec![0], 1), img).unwrap();
        assert_eq!(f.to_html(), "a<img src=\"x.png\">b");
        assert_eq!(after, DomPoint::new(vec![], 2));
    }

    #[test]
    fn delete_text_across_elements() {
        let mut f = frag("a<b>bc</b>d");
        f.delete_text(1..2);
        assert_eq!(f.to_html(), "a<b>c</b>d");
        f.delete_text(1..2);
        assert_eq!(f.to_html(), "ad");
        assert_eq!(f.children, vec![Node::text("ad")]);
    }

    #[test]
    fn split_text_creates_boundary() {
        let mut f = frag("abcd");
        f.split_text_at(2);
        assert_eq!(f.children, vec![Node::text("ab"), Node::text("cd")]);
        f.split_text_at(2);
        assert_eq!(f.children.len(), 2);
    }

    #[test]
    fn normalize_merges_and_prunes() {
        let mut f = Fragment::new(vec![
            Node::text("a"),
            Node::text(""),
            Node::text("b"),
            Node::Element(Element::new("b").with_children(vec![Node::text("x")])),
            Node::Element(Element::new("b").with_children(vec![Node::text("y")])),
            Node::Element(Element::new("i")),
        ]);
        f.normalize();
        assert_eq!(f.to_html(), "ab<b>xy</b>");
    }

    #[test]
    fn unwrap_node_lifts_children() {
        let mut f = frag("<p>a<b>b<i>c</i></b></p>");
        f.unwrap_node(&[0, 1]);
        assert_eq!(f.to_html(), "<p>ab<i>c</i></p>");
    }
}
