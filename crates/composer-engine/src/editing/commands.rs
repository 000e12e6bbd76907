//! Formatting commands for the visual surface.
//!
//! Commands take the selection as a linear text range (see the
//! `composer_html::dom` docs). Wrapping, unwrapping and list conversion never
//! change which characters sit at which linear offset, so the selection is
//! mapped back onto the reshaped tree afterwards and survives the command.

use composer_html::{DomPoint, Element, Fragment, Node, NodePath, TextNodeRef};
use std::ops::Range;

use super::selection::DomRange;

const BOLD_TAGS: &[&str] = &["b", "strong"];
const ITALIC_TAGS: &[&str] = &["i", "em"];
const UNDERLINE_TAGS: &[&str] = &["u"];
const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Block elements a block command looks inside of instead of acting on them.
const CONTAINERS: &[&str] = &[
    "article",
    "aside",
    "blockquote",
    "div",
    "footer",
    "header",
    "main",
    "nav",
    "section",
    "td",
    "th",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    UnorderedList,
    OrderedList,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    /// Link the selection to a URL, or insert the URL as a link at the caret
    CreateLink(String),
    /// Insert an image with the given `src` in place of the selection
    InsertImage(String),
}

impl FormatCommand {
    /// Command name as used by editable-region toolbars.
    pub fn name(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::UnorderedList => "insertUnorderedList",
            FormatCommand::OrderedList => "insertOrderedList",
            FormatCommand::JustifyLeft => "justifyLeft",
            FormatCommand::JustifyCenter => "justifyCenter",
            FormatCommand::JustifyRight => "justifyRight",
            FormatCommand::CreateLink(_) => "createLink",
            FormatCommand::InsertImage(_) => "insertImage",
        }
    }

    /// Build a command from a toolbar name and optional value.
    pub fn from_name(name: &str, value: Option<&str>) -> Option<Self> {
        let command = match name {
            "bold" => FormatCommand::Bold,
            "italic" => FormatCommand::Italic,
            "underline" => FormatCommand::Underline,
            "insertUnorderedList" => FormatCommand::UnorderedList,
            "insertOrderedList" => FormatCommand::OrderedList,
            "justifyLeft" => FormatCommand::JustifyLeft,
            "justifyCenter" => FormatCommand::JustifyCenter,
            "justifyRight" => FormatCommand::JustifyRight,
            "createLink" => FormatCommand::CreateLink(value?.to_string()),
            "insertImage" => FormatCommand::InsertImage(value?.to_string()),
            _ => return None,
        };
        Some(command)
    }
}

/// Run `command` over `selection`, returning the selection to keep
/// afterwards, or `None` when the command had nothing to act on.
///
/// `caret` is the selection start as a point, used by commands that insert
/// a node at a collapsed selection.
pub(crate) fn execute(
    fragment: &mut Fragment,
    command: &FormatCommand,
    selection: Range<usize>,
    caret: &DomPoint,
) -> Option<DomRange> {
    let changed = match command {
        FormatCommand::Bold => toggle_inline(fragment, "b", BOLD_TAGS, &selection),
        FormatCommand::Italic => toggle_inline(fragment, "i", ITALIC_TAGS, &selection),
        FormatCommand::Underline => toggle_inline(fragment, "u", UNDERLINE_TAGS, &selection),
        FormatCommand::UnorderedList => return toggle_list(fragment, "ul", &selection),
        FormatCommand::OrderedList => return toggle_list(fragment, "ol", &selection),
        FormatCommand::JustifyLeft => justify(fragment, "left", &selection),
        FormatCommand::JustifyCenter => justify(fragment, "center", &selection),
        FormatCommand::JustifyRight => justify(fragment, "right", &selection),
        FormatCommand::CreateLink(url) => return create_link(fragment, url, &selection, caret),
        FormatCommand::InsertImage(src) => return insert_image(fragment, src, &selection, caret),
    };
    changed.then(|| linear_to_range(fragment, &selection))
}

fn linear_to_range(fragment: &Fragment, selection: &Range<usize>) -> DomRange {
    DomRange::new(
        fragment.offset_to_point(selection.start),
        fragment.offset_to_point(selection.end),
    )
}

/// Like `offset_to_point`, but an offset on a node boundary resolves to the
/// start of the later node. Used for the start of a non-empty selection.
fn point_at_start(fragment: &Fragment, offset: usize) -> DomPoint {
    fragment
        .text_nodes()
        .into_iter()
        .find(|t| t.start <= offset && offset < t.start + t.len)
        .map(|t| DomPoint::new(t.path, offset - t.start))
        .unwrap_or_else(|| fragment.offset_to_point(offset))
}

// ============ Inline formatting ============

/// Text nodes lying completely inside `range`, skipping the whitespace
/// between blocks.
fn text_nodes_in(fragment: &Fragment, range: &Range<usize>) -> Vec<TextNodeRef> {
    fragment
        .text_nodes()
        .into_iter()
        .filter(|t| t.len > 0 && t.start >= range.start && t.start + t.len <= range.end)
        .filter(|t| match fragment.node(&t.path) {
            Some(Node::Text(text)) => !(text.trim().is_empty() && text.contains('\n')),
            _ => false,
        })
        .collect()
}

fn toggle_inline(fragment: &mut Fragment, tag: &str, aliases: &[&str], range: &Range<usize>) -> bool {
    if range.is_empty() {
        return false;
    }
    fragment.split_text_at(range.start);
    fragment.split_text_at(range.end);
    let targets = text_nodes_in(fragment, range);
    if targets.is_empty() {
        return false;
    }

    let all_formatted = targets
        .iter()
        .all(|t| fragment.nearest_ancestor(&t.path, aliases).is_some());
    if all_formatted {
        remove_inline(fragment, aliases, range);
    } else {
        let unformatted: Vec<TextNodeRef> = targets
            .into_iter()
            .filter(|t| fragment.nearest_ancestor(&t.path, aliases).is_none())
            .collect();
        wrap_text_nodes(fragment, &unformatted, &Element::new(tag));
    }
    fragment.normalize();
    true
}

/// Strip `aliases` formatting from the text in `range`. Formatting elements
/// that also cover text outside the range are unwrapped and then re-applied
/// to that outside text only.
fn remove_inline(fragment: &mut Fragment, aliases: &[&str], range: &Range<usize>) {
    loop {
        let mut formatted: Vec<(NodePath, Element, Range<usize>)> = Vec::new();
        for t in text_nodes_in(fragment, range) {
            let Some(path) = fragment.nearest_ancestor(&t.path, aliases) else {
                continue;
            };
            if formatted.iter().any(|(p, _, _)| *p == path) {
                continue;
            }
            let Some(Node::Element(el)) = fragment.node(&path) else {
                continue;
            };
            let shell = Element {
                tag: el.tag.clone(),
                attrs: el.attrs.clone(),
                children: Vec::new(),
            };
            let span = text_span(fragment, &path);
            formatted.push((path, shell, span));
        }
        if formatted.is_empty() {
            return;
        }

        // Later and deeper paths first, so earlier paths stay valid
        formatted.sort_by(|a, b| b.0.cmp(&a.0));
        for (path, _, _) in &formatted {
            fragment.unwrap_node(path);
        }
        for (_, shell, span) in &formatted {
            for outside in [span.start..range.start, range.end..span.end] {
                if outside.start < outside.end {
                    let nodes = text_nodes_in(fragment, &outside);
                    wrap_text_nodes(fragment, &nodes, shell);
                }
            }
        }
    }
}

/// Linear range covered by the text below `path`.
fn text_span(fragment: &Fragment, path: &[usize]) -> Range<usize> {
    let nodes: Vec<TextNodeRef> = fragment
        .text_nodes()
        .into_iter()
        .filter(|t| t.path.starts_with(path))
        .collect();
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => first.start..last.start + last.len,
        _ => 0..0,
    }
}

/// Wrap each text node in a copy of `template`. Node counts per parent are
/// unchanged, so the paths in `targets` stay valid throughout.
fn wrap_text_nodes(fragment: &mut Fragment, targets: &[TextNodeRef], template: &Element) {
    for t in targets {
        let Some((&index, parent)) = t.path.split_last() else {
            continue;
        };
        let Some(children) = fragment.children_at_mut(parent) else {
            continue;
        };
        if let Some(slot) = children.get_mut(index) {
            let text = std::mem::replace(slot, Node::text(""));
            let mut wrapper = template.clone();
            wrapper.children = vec![text];
            *slot = Node::Element(wrapper);
        }
    }
}

// ============ Links and images ============

fn create_link(
    fragment: &mut Fragment,
    url: &str,
    selection: &Range<usize>,
    caret: &DomPoint,
) -> Option<DomRange> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if selection.is_empty() {
        let link = Element::new("a")
            .with_attr("href", url)
            .with_children(vec![Node::text(url)]);
        let after = fragment.insert_node(caret, Node::Element(link))?;
        return Some(DomRange::caret(after));
    }

    fragment.split_text_at(selection.start);
    fragment.split_text_at(selection.end);
    let targets = text_nodes_in(fragment, selection);
    if targets.is_empty() {
        return None;
    }
    let template = Element::new("a").with_attr("href", url);
    let mut unlinked = Vec::new();
    for t in targets {
        match fragment.nearest_ancestor(&t.path, &["a"]) {
            Some(link_path) => {
                if let Some(Node::Element(link)) = fragment.node_mut(&link_path) {
                    link.set_attr("href", url);
                }
            }
            None => unlinked.push(t),
        }
    }
    wrap_text_nodes(fragment, &unlinked, &template);
    fragment.normalize();
    Some(linear_to_range(fragment, selection))
}

fn insert_image(
    fragment: &mut Fragment,
    src: &str,
    selection: &Range<usize>,
    caret: &DomPoint,
) -> Option<DomRange> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    let at = if selection.is_empty() {
        caret.clone()
    } else {
        fragment.delete_text(selection.clone());
        fragment.offset_to_point(selection.start)
    };
    let image = Node::Element(Element::new("img").with_attr("src", src));
    let after = fragment.insert_node(&at, image)?;
    Some(DomRange::caret(after))
}

// ============ Block commands ============

/// The run of sibling blocks touched by `range`: `(parent, first, last)`.
/// Descends through container elements the range lies entirely inside.
fn block_span(fragment: &Fragment, range: &Range<usize>) -> Option<(NodePath, usize, usize)> {
    let start = if range.is_empty() {
        fragment.offset_to_point(range.start)
    } else {
        point_at_start(fragment, range.start)
    };
    let end = fragment.offset_to_point(range.end);

    let mut parent: NodePath = Vec::new();
    loop {
        let children = fragment.children_at(&parent)?;
        if children.is_empty() {
            return None;
        }
        let first = index_under(&start, &parent, children.len());
        let last = index_under(&end, &parent, children.len()).max(first);

        let mut child_path = parent.clone();
        child_path.push(first);
        let descend = first == last
            && start.path.starts_with(&child_path)
            && end.path.starts_with(&child_path)
            && children[first].as_element().is_some_and(|el| {
                CONTAINERS.contains(&el.tag.as_str())
                    && el.children.iter().any(|c| c.as_element().is_some_and(Element::is_block))
            });
        if descend {
            parent = child_path;
            continue;
        }
        return Some((parent, first, last));
    }
}

/// Index of the child of `parent` that contains `point`.
fn index_under(point: &DomPoint, parent: &[usize], len: usize) -> usize {
    let index = if point.path.len() > parent.len() && point.path.starts_with(parent) {
        point.path[parent.len()]
    } else {
        point.offset
    };
    index.min(len.saturating_sub(1))
}

/// Path of the list element at or above `point`.
fn enclosing_list(fragment: &Fragment, point: &DomPoint) -> Option<NodePath> {
    (1..=point.path.len()).rev().find_map(|depth| {
        let el = fragment.node(&point.path[..depth])?.as_element()?;
        LIST_TAGS
            .contains(&el.tag.as_str())
            .then(|| point.path[..depth].to_vec())
    })
}

fn toggle_list(fragment: &mut Fragment, list_tag: &str, range: &Range<usize>) -> Option<DomRange> {
    if fragment.is_empty() {
        let list = Element::new(list_tag).with_children(vec![Node::Element(Element::new("li"))]);
        fragment.children.push(Node::Element(list));
        return Some(DomRange::caret(DomPoint::new(vec![0, 0], 0)));
    }

    let start = fragment.offset_to_point(range.start);
    if let Some(list_path) = enclosing_list(fragment, &start) {
        let Some(Node::Element(list)) = fragment.node_mut(&list_path) else {
            return None;
        };
        if list.tag == list_tag {
            unlist(fragment, &list_path);
        } else {
            list.tag = list_tag.to_string();
        }
    } else {
        let (parent, first, last) = block_span(fragment, range)?;
        let children = fragment.children_at_mut(&parent)?;
        let nodes: Vec<Node> = children.drain(first..=last).collect();
        let list = Element::new(list_tag).with_children(list_items(nodes));
        children.insert(first, Node::Element(list));
    }
    fragment.normalize();
    Some(linear_to_range(fragment, range))
}

/// Turn a run of sibling nodes into `<li>` items. Paragraphs become items,
/// `<br>` separates items within inline content, and existing list items,
/// loose or inside a list, are adopted as they are.
fn list_items(nodes: Vec<Node>) -> Vec<Node> {
    fn flush(items: &mut Vec<Node>, inline: &mut Vec<Node>) {
        while inline.last().is_some_and(Node::is_blank_text) {
            inline.pop();
        }
        if !inline.is_empty() {
            let li = Element::new("li").with_children(std::mem::take(inline));
            items.push(Node::Element(li));
        }
    }

    let mut items = Vec::new();
    let mut inline = Vec::new();
    for node in nodes {
        match node {
            Node::Element(el) if el.tag == "br" => flush(&mut items, &mut inline),
            Node::Element(el) if LIST_TAGS.contains(&el.tag.as_str()) => {
                flush(&mut items, &mut inline);
                items.extend(el.children.into_iter().filter(|c| !c.is_blank_text()));
            }
            Node::Element(el) if el.tag == "p" || el.tag == "div" => {
                flush(&mut items, &mut inline);
                items.push(Node::Element(Element {
                    tag: "li".to_string(),
                    attrs: el.attrs,
                    children: el.children,
                }));
            }
            Node::Element(el) if el.tag == "li" => {
                flush(&mut items, &mut inline);
                items.push(Node::Element(el));
            }
            Node::Element(el) if el.is_block() => {
                flush(&mut items, &mut inline);
                let li = Element::new("li").with_children(vec![Node::Element(el)]);
                items.push(Node::Element(li));
            }
            node if node.is_blank_text() && inline.is_empty() => {}
            node => inline.push(node),
        }
    }
    flush(&mut items, &mut inline);
    if items.is_empty() {
        items.push(Node::Element(Element::new("li")));
    }
    items
}

/// Replace the list at `path` with its items as paragraphs.
fn unlist(fragment: &mut Fragment, path: &[usize]) {
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let Some(children) = fragment.children_at_mut(parent) else {
        return;
    };
    if index >= children.len() {
        return;
    }
    let Node::Element(list) = children.remove(index) else {
        return;
    };

    let mut replacement = Vec::new();
    for child in list.children {
        match child {
            Node::Element(li) if li.tag == "li" => {
                if contains_block(&li.children) {
                    replacement.extend(li.children);
                } else {
                    replacement.push(Node::Element(Element {
                        tag: "p".to_string(),
                        attrs: li.attrs,
                        children: li.children,
                    }));
                }
            }
            node if node.is_blank_text() => {}
            node => replacement.push(node),
        }
    }
    for (i, node) in replacement.into_iter().enumerate() {
        children.insert(index + i, node);
    }
}

/// Whether any node in `nodes`, at any depth, is a block element. A `<p>`
/// cannot hold such content without the parser splitting it.
fn contains_block(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| {
        node.as_element()
            .is_some_and(|el| el.is_block() || contains_block(&el.children))
    })
}

fn justify(fragment: &mut Fragment, align: &str, range: &Range<usize>) -> bool {
    let Some((parent, first, last)) = block_span(fragment, range) else {
        return false;
    };
    let Some(children) = fragment.children_at_mut(&parent) else {
        return false;
    };

    let nodes: Vec<Node> = children.drain(first..=last).collect();
    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Vec<Node> = Vec::new();
    for node in nodes {
        match node {
            Node::Element(mut el) if el.is_block() => {
                flush_aligned_run(&mut out, &mut run, align);
                set_text_align(&mut el, align);
                out.push(Node::Element(el));
            }
            node => run.push(node),
        }
    }
    flush_aligned_run(&mut out, &mut run, align);

    for (i, node) in out.into_iter().enumerate() {
        children.insert(first + i, node);
    }
    true
}

/// Wrap a run of inline nodes in an aligned `<div>`; blank runs stay as is.
fn flush_aligned_run(out: &mut Vec<Node>, run: &mut Vec<Node>, align: &str) {
    if run.iter().all(Node::is_blank_text) {
        out.append(run);
        return;
    }
    let mut div = Element::new("div").with_children(std::mem::take(run));
    set_text_align(&mut div, align);
    out.push(Node::Element(div));
}

fn set_text_align(el: &mut Element, align: &str) {
    let mut declarations: Vec<String> = el
        .attr("style")
        .unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty() && !d.to_ascii_lowercase().starts_with("text-align"))
        .map(String::from)
        .collect();
    declarations.push(format!("text-align: {align}"));
    el.set_attr("style", format!("{};", declarations.join("; ")));
}
