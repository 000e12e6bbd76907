//! # Editing Core
//!
//! One logical HTML document edited through two surfaces:
//!
//! - a **visual** surface, a mutable DOM with formatting commands, standing in
//!   for a WYSIWYG editable region
//! - a **source** surface, an [`xi_rope::Rope`] holding the raw markup
//!
//! The [`Editor`] coordinator owns the document, decides which surface is
//! active, copies content across on mode switches and exposes the
//! [`ContentHandle`] capability (`insert_at_cursor` / `get_content`) that
//! insertion call sites such as the tag picker depend on.
//!
//! ## Module Structure
//!
//! - **`selection`**: `CursorAnchor` and the `SelectionAdapter` contract
//! - **`visual`**: `VisualSurface` over a `composer_html::Fragment`
//! - **`source`**: `SourceSurface` over a rope, character-offset anchors
//! - **`commands`**: formatting commands run by the visual surface
//! - **`coordinator`**: `Editor`, the mode state machine and change notifications
//!
//! ## Usage Pattern
//!
//! ```rust
//! use composer_engine::editing::{Editor, EditorMode, TextRange};
//!
//! let mut editor = Editor::new("<p>Dear ,</p>");
//! editor.switch_mode(EditorMode::Source);
//! editor.select_source(TextRange::caret(8));
//! editor.insert_at_cursor("{{resident.first_name}}");
//! editor.switch_mode(EditorMode::Visual);
//!
//! assert_eq!(editor.get_content(), "<p>Dear {{resident.first_name}},</p>");
//! ```

pub mod commands;
pub mod coordinator;
pub mod selection;
pub mod source;
pub mod visual;

pub use commands::FormatCommand;
pub use coordinator::{Document, Editor};
pub use selection::{CursorAnchor, DomRange, SelectionAdapter, TextRange};
pub use source::SourceSurface;
pub use visual::VisualSurface;

use serde::{Deserialize, Serialize};

/// Which surface is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Visual,
    Source,
}

impl std::fmt::Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorMode::Visual => write!(f, "visual"),
            EditorMode::Source => write!(f, "source"),
        }
    }
}

/// The capability insertion call sites depend on, implemented by each
/// surface and by the [`Editor`], which routes to the active one.
pub trait ContentHandle {
    fn insert_at_cursor(&mut self, text: &str);
    fn get_content(&self) -> String;
}

/// An editable surface as seen by the coordinator.
pub trait EditingSurface: SelectionAdapter {
    fn mode(&self) -> EditorMode;

    /// Current buffer serialized to the document representation.
    fn content(&self) -> String;

    /// Reset the buffer from outside. A value equal to the current content
    /// is ignored; otherwise the live selection is dropped. Returns whether
    /// the buffer changed. Allowed on read-only surfaces.
    fn set_content(&mut self, content: &str) -> bool;

    fn is_read_only(&self) -> bool;
    fn set_read_only(&mut self, read_only: bool);

    fn has_focus(&self) -> bool;
    /// Gain focus with a fresh caret at the end; any earlier anchor is stale.
    fn focus(&mut self);
    /// Lose focus and the live selection.
    fn blur(&mut self);

    /// Replace the selection with typed text, like a key press would.
    /// Returns the new content when it changed.
    fn type_text(&mut self, text: &str) -> Option<String>;

    /// Backspace: delete the selection, or the character before the caret.
    fn delete_backward(&mut self) -> Option<String>;

    /// The content if it differs from the last value this surface handed
    /// out or was given, recording it as handed out.
    fn take_change(&mut self) -> Option<String>;
}

/// Focus, read-only flag and change tracking shared by both surfaces.
#[derive(Debug, Clone, Default)]
pub(crate) struct SurfaceState {
    pub focused: bool,
    pub read_only: bool,
    pub last_value: String,
}

impl SurfaceState {
    pub(crate) fn new(initial: String) -> Self {
        Self {
            focused: false,
            read_only: false,
            last_value: initial,
        }
    }

    /// `Some(current)` when `current` differs from the last known value.
    pub(crate) fn change(&mut self, current: String) -> Option<String> {
        if current == self.last_value {
            return None;
        }
        self.last_value = current.clone();
        Some(current)
    }
}
