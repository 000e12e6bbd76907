//! Cursor anchors and the selection adapter contract.
//!
//! Each surface remembers the user's selection in its own coordinates:
//! node paths for the visual surface, character offsets for the source
//! surface. An anchor is captured right before an insertion and consumed by
//! it. Focus changes and external content resets invalidate it, and an
//! insertion without an anchor appends at the end of the content.

use composer_html::DomPoint;

/// Selection in the source surface, as character (not byte) offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The same range with `start <= end`.
    pub fn ordered(&self) -> Self {
        Self {
            start: self.start.min(self.end),
            end: self.start.max(self.end),
        }
    }
}

/// Selection in the visual surface. `start` may come after `end` for a
/// backwards selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomRange {
    pub start: DomPoint,
    pub end: DomPoint,
}

impl DomRange {
    pub fn new(start: DomPoint, end: DomPoint) -> Self {
        Self { start, end }
    }

    pub fn caret(point: DomPoint) -> Self {
        Self {
            start: point.clone(),
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Where the next insertion goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CursorAnchor {
    /// No live selection: insertions append at the end of the content
    #[default]
    Detached,
    Visual(DomRange),
    Source(TextRange),
}

impl CursorAnchor {
    pub fn is_detached(&self) -> bool {
        matches!(self, CursorAnchor::Detached)
    }
}

/// Capture, restore and insert-at-anchor, implemented by each surface.
pub trait SelectionAdapter {
    /// The live selection, or [`CursorAnchor::Detached`] when the surface has
    /// no focus or no selection.
    fn capture(&self) -> CursorAnchor;

    /// Make `anchor` the live selection again. Returns `false` when the
    /// anchor does not belong to this surface or no longer fits its content.
    fn restore(&mut self, anchor: &CursorAnchor) -> bool;

    /// Replace the anchored selection with `text` and return the collapsed
    /// anchor right after it. A detached or stale anchor appends `text` at
    /// the end. Read-only surfaces leave content untouched and return the
    /// anchor unchanged.
    fn insert(&mut self, anchor: &CursorAnchor, text: &str) -> CursorAnchor;
}
