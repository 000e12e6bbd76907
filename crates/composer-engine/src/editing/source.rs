use xi_rope::Rope;
use xi_rope::delta::Builder;

use super::selection::{CursorAnchor, SelectionAdapter, TextRange};
use super::{ContentHandle, EditingSurface, EditorMode, SurfaceState};

/// The raw-markup surface: a plain text buffer holding the HTML verbatim.
///
/// Anchors are character offsets. Edits compile to an xi-rope delta and are
/// applied to the buffer; nothing is parsed or normalized here.
#[derive(Debug, Clone)]
pub struct SourceSurface {
    buffer: Rope,
    selection: Option<TextRange>,
    state: SurfaceState,
}

impl Default for SourceSurface {
    fn default() -> Self {
        Self::new("")
    }
}

impl SourceSurface {
    pub fn new(content: &str) -> Self {
        Self {
            buffer: Rope::from(content),
            selection: None,
            state: SurfaceState::new(content.to_string()),
        }
    }

    pub fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    /// Length of the buffer in characters.
    pub fn char_len(&self) -> usize {
        self.buffer.to_string().chars().count()
    }

    /// Place the selection, focusing the surface. Offsets past the end are
    /// clamped.
    pub fn select(&mut self, range: TextRange) {
        let len = self.char_len();
        self.state.focused = true;
        self.selection = Some(TextRange::new(range.start.min(len), range.end.min(len)));
    }

    /// Byte offset of character index `index`, clamped to the end.
    fn byte_offset(&self, text: &str, index: usize) -> usize {
        text.char_indices()
            .nth(index)
            .map_or(text.len(), |(byte, _)| byte)
    }

    /// Replace the characters in `range` with `text`, returning the caret
    /// right after the replacement.
    fn splice(&mut self, range: TextRange, text: &str) -> TextRange {
        let current = self.buffer.to_string();
        let range = range.ordered();
        let start = self.byte_offset(&current, range.start);
        let end = self.byte_offset(&current, range.end);

        let mut builder = Builder::new(self.buffer.len());
        builder.replace(start..end, Rope::from(text));
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);

        let start_chars = current[..start].chars().count();
        TextRange::caret(start_chars + text.chars().count())
    }
}

impl SelectionAdapter for SourceSurface {
    fn capture(&self) -> CursorAnchor {
        match (self.selection, self.state.focused) {
            (Some(range), true) => CursorAnchor::Source(range),
            _ => CursorAnchor::Detached,
        }
    }

    fn restore(&mut self, anchor: &CursorAnchor) -> bool {
        match anchor {
            CursorAnchor::Source(range) if range.start.max(range.end) <= self.char_len() => {
                self.select(*range);
                true
            }
            _ => false,
        }
    }

    fn insert(&mut self, anchor: &CursorAnchor, text: &str) -> CursorAnchor {
        if self.state.read_only {
            log::debug!("ignoring insertion into read-only source surface");
            return anchor.clone();
        }
        if text.is_empty() {
            return anchor.clone();
        }

        let len = self.char_len();
        let target = match anchor {
            CursorAnchor::Source(range) if range.start.max(range.end) <= len => *range,
            CursorAnchor::Source(_) => {
                log::debug!("source anchor past the end of the buffer, appending");
                TextRange::caret(len)
            }
            CursorAnchor::Visual(_) => {
                log::debug!("visual anchor given to source surface, appending");
                TextRange::caret(len)
            }
            CursorAnchor::Detached => TextRange::caret(len),
        };

        let caret = self.splice(target, text);
        if self.state.focused {
            self.selection = Some(caret);
        }
        CursorAnchor::Source(caret)
    }
}

impl EditingSurface for SourceSurface {
    fn mode(&self) -> EditorMode {
        EditorMode::Source
    }

    fn content(&self) -> String {
        self.buffer.to_string()
    }

    fn set_content(&mut self, content: &str) -> bool {
        if self.content() == content {
            return false;
        }
        self.buffer = Rope::from(content);
        self.selection = None;
        self.state.last_value = content.to_string();
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
        self.selection = Some(TextRange::caret(self.char_len()));
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
        let range = self.selection?.ordered();
        let doomed = if range.is_collapsed() {
            if range.start == 0 {
                return None;
            }
            TextRange::new(range.start - 1, range.start)
        } else {
            range
        };
        let caret = self.splice(doomed, "");
        self.selection = Some(caret);
        self.take_change()
    }

    fn take_change(&mut self) -> Option<String> {
        let current = self.content();
        self.state.change(current)
    }
}

impl ContentHandle for SourceSurface {
    fn insert_at_cursor(&mut self, text: &str) {
        let anchor = self.capture();
        self.insert(&anchor, text);
    }

    fn get_content(&self) -> String {
        self.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn focused(content: &str, range: TextRange) -> SourceSurface {
        let mut surface = SourceSurface::new(content);
        surface.select(range);
        surface
    }

    #[test]
    fn inserts_at_caret_and_advances() {
        let mut surface = focused("AB", TextRange::caret(1));
        surface.insert_at_cursor("X");
        assert_eq!(surface.content(), "AXB");
        surface.insert_at_cursor("Y");
        assert_eq!(surface.content(), "AXYB");
        assert_eq!(surface.selection(), Some(TextRange::caret(3)));
    }

    #[test]
    fn insert_replaces_backwards_selection() {
        let mut surface = focused("<p>Dear NAME,</p>", TextRange::new(12, 8));
        let anchor = surface.capture();
        let after = surface.insert(&anchor, "{{resident.first_name}}");
        assert_eq!(surface.content(), "<p>Dear {{resident.first_name}},</p>");
        assert_eq!(after, CursorAnchor::Source(TextRange::caret(31)));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let mut surface = focused("héllo wörld", TextRange::caret(6));
        surface.insert_at_cursor("{{x.y}} ");
        assert_eq!(surface.content(), "héllo {{x.y}} wörld");
        assert_eq!(surface.selection(), Some(TextRange::caret(14)));
    }

    #[rstest]
    #[case(CursorAnchor::Detached)]
    #[case(CursorAnchor::Source(TextRange::caret(99)))]
    fn unusable_anchor_appends(#[case] anchor: CursorAnchor) {
        let mut surface = SourceSurface::new("AB");
        surface.insert(&anchor, "Z");
        assert_eq!(surface.content(), "ABZ");
    }

    #[test]
    fn never_focused_surface_appends() {
        let mut surface = SourceSurface::new("AB");
        surface.insert_at_cursor("Z");
        assert_eq!(surface.content(), "ABZ");
        assert_eq!(surface.selection(), None);
    }

    #[test]
    fn markup_is_kept_verbatim() {
        let mut surface = SourceSurface::new("<P>unclosed");
        surface.focus();
        assert_eq!(surface.type_text(" <b>"), Some("<P>unclosed <b>".to_string()));
    }

    #[test]
    fn backspace_deletes_one_character() {
        let mut surface = focused("añb", TextRange::caret(2));
        assert_eq!(surface.delete_backward(), Some("ab".to_string()));
        assert_eq!(surface.selection(), Some(TextRange::caret(1)));
        surface.select(TextRange::caret(0));
        assert_eq!(surface.delete_backward(), None);
    }

    #[test]
    fn read_only_ignores_local_edits() {
        let mut surface = focused("AB", TextRange::caret(1));
        surface.set_read_only(true);
        surface.insert_at_cursor("X");
        assert_eq!(surface.type_text("Y"), None);
        assert_eq!(surface.delete_backward(), None);
        assert_eq!(surface.content(), "AB");
    }

    #[test]
    fn reset_drops_selection_and_dedupes() {
        let mut surface = focused("AB", TextRange::caret(1));
        assert!(!surface.set_content("AB"));
        assert_eq!(surface.selection(), Some(TextRange::caret(1)));
        assert!(surface.set_content("CD"));
        assert!(surface.capture().is_detached());
        assert_eq!(surface.take_change(), None);
    }

    #[test]
    fn restore_rejects_out_of_range_anchor() {
        let mut surface = SourceSurface::new("AB");
        assert!(!surface.restore(&CursorAnchor::Source(TextRange::caret(5))));
        assert!(surface.restore(&CursorAnchor::Source(TextRange::caret(2))));
        assert!(surface.has_focus());
    }
}
