use composer_html::{DomPoint, Fragment};
use std::ops::Range;

use super::commands::{self, FormatCommand};
use super::selection::{CursorAnchor, DomRange, SelectionAdapter};
use super::{ContentHandle, EditingSurface, EditorMode, SurfaceState};

/// The WYSIWYG surface: an editable DOM plus the user's selection in it.
///
/// Content is normalized on the way in, so the HTML handed back can differ
/// in markup from what was loaded while rendering the same. Text typed or
/// inserted here is always character data, never parsed as markup.
#[derive(Debug, Clone)]
pub struct VisualSurface {
    fragment: Fragment,
    selection: Option<DomRange>,
    state: SurfaceState,
}

impl Default for VisualSurface {
    fn default() -> Self {
        Self::new("")
    }
}

impl VisualSurface {
    pub fn new(content: &str) -> Self {
        let fragment = Fragment::parse(content);
        let html = fragment.to_html();
        Self {
            fragment,
            selection: None,
            state: SurfaceState::new(html),
        }
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn selection(&self) -> Option<&DomRange> {
        self.selection.as_ref()
    }

    /// Place the selection, focusing the surface. Returns `false` when either
    /// point does not address the current content.
    pub fn select(&mut self, range: DomRange) -> bool {
        if self.linear(&range).is_none() {
            return false;
        }
        self.state.focused = true;
        self.selection = Some(range);
        true
    }

    /// Select by linear text offsets.
    pub fn select_text(&mut self, range: Range<usize>) -> bool {
        let start = self.fragment.offset_to_point(range.start);
        let end = self.fragment.offset_to_point(range.end);
        self.select(DomRange::new(start, end))
    }

    /// The selection as an ordered linear text range.
    pub fn selected_text_range(&self) -> Option<Range<usize>> {
        self.selection.as_ref().and_then(|range| self.linear(range))
    }

    /// Run a formatting command on the selection. Ignored when read-only,
    /// unfocused or without a selection; returns the new content when it
    /// changed.
    pub fn execute(&mut self, command: &FormatCommand) -> Option<String> {
        if self.state.read_only {
            log::debug!("ignoring {} on read-only visual surface", command.name());
            return None;
        }
        if !self.state.focused {
            return None;
        }
        let range = self.selection.clone()?;
        let Some(linear) = self.linear(&range) else {
            self.selection = None;
            return None;
        };
        let caret = self.earlier_point(&range);
        let selection = commands::execute(&mut self.fragment, command, linear, &caret)?;
        self.selection = Some(selection);
        self.take_change()
    }

    fn linear(&self, range: &DomRange) -> Option<Range<usize>> {
        let a = self.fragment.point_to_offset(&range.start)?;
        let b = self.fragment.point_to_offset(&range.end)?;
        Some(a.min(b)..a.max(b))
    }

    fn earlier_point(&self, range: &DomRange) -> DomPoint {
        let a = self.fragment.point_to_offset(&range.start);
        let b = self.fragment.point_to_offset(&range.end);
        if b < a {
            range.end.clone()
        } else {
            range.start.clone()
        }
    }

    fn insert_at_range(&mut self, range: &DomRange, text: &str) -> Option<DomPoint> {
        let linear = self.linear(range)?;
        let at = if linear.is_empty() {
            self.earlier_point(range)
        } else {
            self.fragment.delete_text(linear.clone());
            self.fragment.offset_to_point(linear.start)
        };
        self.fragment.insert_text(&at, text)
    }

    fn append(&mut self, text: &str) -> Option<DomPoint> {
        let end = DomPoint::new(Vec::new(), self.fragment.children.len());
        self.fragment.insert_text(&end, text)
    }
}

impl SelectionAdapter for VisualSurface {
    fn capture(&self) -> CursorAnchor {
        match (&self.selection, self.state.focused) {
            (Some(range), true) => CursorAnchor::Visual(range.clone()),
            _ => CursorAnchor::Detached,
        }
    }

    fn restore(&mut self, anchor: &CursorAnchor) -> bool {
        match anchor {
            CursorAnchor::Visual(range) => self.select(range.clone()),
            _ => false,
        }
    }

    fn insert(&mut self, anchor: &CursorAnchor, text: &str) -> CursorAnchor {
        if self.state.read_only {
            log::debug!("ignoring insertion into read-only visual surface");
            return anchor.clone();
        }
        if text.is_empty() {
            return anchor.clone();
        }

        let after = match anchor {
            CursorAnchor::Visual(range) => self.insert_at_range(range, text).or_else(|| {
                log::debug!("visual anchor no longer fits the content, appending");
                self.append(text)
            }),
            CursorAnchor::Source(_) => {
                log::debug!("source anchor given to visual surface, appending");
                self.append(text)
            }
            CursorAnchor::Detached => self.append(text),
        };

        match after {
            Some(point) => {
                let caret = DomRange::caret(point);
                if self.state.focused {
                    self.selection = Some(caret.clone());
                }
                CursorAnchor::Visual(caret)
            }
            None => CursorAnchor::Detached,
        }
    }
}

impl EditingSurface for VisualSurface {
    fn mode(&self) -> EditorMode {
        EditorMode::Visual
    }

    fn content(&self) -> String {
        self.fragment.to_html()
    }

    fn set_content(&mut self, content: &str) -> bool {
        let fragment = Fragment::parse(content);
        if fragment == self.fragment {
            return false;
        }
        self.fragment = fragment;
        self.selection = None;
        self.state.last_value = self.fragment.to_html();
        true
    }

    fn is_read_only(&self) -> bool {
        self.state.read_only
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.state.read_only = read_only;
    }

    fn has_focus(&self) -> bool {
        self.state.focused
    }

    fn focus(&mut self) {
        self.state.focused = true;
        self.selection = Some(DomRange::caret(self.fragment.end_point()));
    }

    fn blur(&mut self) {
        self.state.focused = false;
        self.selection = None;
    }

    fn type_text(&mut self, text: &str) -> Option<String> {
        if self.state.read_only {
            return None;
        }
        let anchor = self.capture();
        if anchor.is_detached() {
            return None;
        }
        self.insert(&anchor, text);
        self.take_change()
    }

    fn delete_backward(&mut self) -> Option<String> {
        if self.state.read_only || !self.state.focused {
            return None;
        }
        let linear = self.selected_text_range()?;
        let doomed = if linear.is_empty() {
            let text = self.fragment.text_content();
            let before = text.get(..linear.start)?;
            let previous = before.chars().next_back()?;
            linear.start - previous.len_utf8()..linear.start
        } else {
            linear
        };
        self.fragment.delete_text(doomed.clone());
        self.selection = Some(DomRange::caret(self.fragment.offset_to_point(doomed.start)));
        self.take_change()
    }

    fn take_change(&mut self) -> Option<String> {
        let current = self.content();
        self.state.change(current)
    }
}

impl ContentHandle for VisualSurface {
    fn insert_at_cursor(&mut self, text: &str) {
        let anchor = self.capture();
        self.insert(&anchor, text);
    }

    fn get_content(&self) -> String {
        self.content()
    }
}
