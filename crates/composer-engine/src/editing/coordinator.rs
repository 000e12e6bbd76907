//! The mode coordinator.
//!
//! [`Editor`] owns the logical [`Document`] and the two surfaces. Exactly one
//! surface is active and it is the only writer of the document content. A
//! mode switch commits the leaving surface's buffer into the document and
//! then loads the entering surface from that freshly committed value, inside
//! one call, so no keystroke is lost and no stale buffer is shown.
//!
//! Hosts observe the editor through two notifications: content changes,
//! de-duplicated against the last value reported, and mode changes.

use std::fmt;
use std::ops::Range;

use super::commands::FormatCommand;
use super::selection::{CursorAnchor, DomRange, TextRange};
use super::source::SourceSurface;
use super::visual::VisualSurface;
use super::{ContentHandle, EditingSurface, EditorMode};

/// The single logical document shared by both surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    content: String,
    mode: EditorMode,
}

impl Document {
    /// Last committed content (HTML).
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }
}

type ChangeListener = Box<dyn FnMut(&str)>;
type ModeListener = Box<dyn FnMut(EditorMode)>;

pub struct Editor {
    document: Document,
    visual: Option<VisualSurface>,
    source: Option<SourceSurface>,
    read_only: bool,
    last_emitted: String,
    change_listeners: Vec<ChangeListener>,
    mode_listeners: Vec<ModeListener>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("visual_mounted", &self.visual.is_some())
            .field("source_mounted", &self.source.is_some())
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("")
    }
}

impl Editor {
    /// An editor in visual mode with both surfaces mounted.
    pub fn new(content: &str) -> Self {
        Self::with_mode(content, EditorMode::Visual)
    }

    pub fn with_mode(content: &str, mode: EditorMode) -> Self {
        let mut editor = Self {
            document: Document {
                content: content.to_string(),
                mode,
            },
            visual: Some(VisualSurface::new(content)),
            source: Some(SourceSurface::new(content)),
            read_only: false,
            last_emitted: String::new(),
            change_listeners: Vec::new(),
            mode_listeners: Vec::new(),
        };
        editor.document.content = editor.get_content();
        editor.last_emitted = editor.document.content.clone();
        editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> EditorMode {
        self.document.mode
    }

    /// Called with the new content after every committed edit that changed it.
    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.change_listeners.push(Box::new(listener));
    }

    /// Called with the entering mode after every mode switch.
    pub fn on_mode_change(&mut self, listener: impl FnMut(EditorMode) + 'static) {
        self.mode_listeners.push(Box::new(listener));
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if let Some(visual) = self.visual.as_mut() {
            visual.set_read_only(read_only);
        }
        if let Some(source) = self.source.as_mut() {
            source.set_read_only(read_only);
        }
    }

    pub fn visual(&self) -> Option<&VisualSurface> {
        self.visual.as_ref()
    }

    pub fn source(&self) -> Option<&SourceSurface> {
        self.source.as_ref()
    }

    fn active(&self) -> Option<&dyn EditingSurface> {
        match self.document.mode {
            EditorMode::Visual => self.visual.as_ref().map(|s| s as &dyn EditingSurface),
            EditorMode::Source => self.source.as_ref().map(|s| s as &dyn EditingSurface),
        }
    }

    fn active_mut(&mut self) -> Option<&mut dyn EditingSurface> {
        match self.document.mode {
            EditorMode::Visual => self.visual.as_mut().map(|s| s as &mut dyn EditingSurface),
            EditorMode::Source => self.source.as_mut().map(|s| s as &mut dyn EditingSurface),
        }
    }

    // ============ Content ============

    /// Current content, pulled from the active surface when one is mounted.
    pub fn get_content(&self) -> String {
        self.active()
            .map_or_else(|| self.document.content.clone(), |s| s.content())
    }

    /// Replace the content from outside, e.g. when the host applies a
    /// template. The active surface drops its selection. No change
    /// notification is sent; returns whether the content changed.
    pub fn set_content(&mut self, content: &str) -> bool {
        if content == self.get_content() {
            return false;
        }
        let previous = std::mem::take(&mut self.document.content);
        let loaded = self.active_mut().map(|surface| {
            surface.set_content(content);
            surface.content()
        });
        self.document.content = loaded.unwrap_or_else(|| content.to_string());
        self.last_emitted = self.document.content.clone();
        self.document.content != previous
    }

    /// Copy the active surface's buffer into the document and notify
    /// listeners if it differs from the last reported content.
    pub fn commit(&mut self) -> bool {
        if let Some(content) = self.active().map(|s| s.content()) {
            self.document.content = content;
        }
        self.emit_if_changed()
    }

    fn emit_if_changed(&mut self) -> bool {
        if self.document.content == self.last_emitted {
            return false;
        }
        self.last_emitted = self.document.content.clone();
        let content = self.document.content.clone();
        for listener in &mut self.change_listeners {
            listener(&content);
        }
        true
    }

    // ============ Modes ============

    /// Switch the active surface. Returns `false` when `next` is already active.
    pub fn switch_mode(&mut self, next: EditorMode) -> bool {
        if next == self.document.mode {
            return false;
        }
        self.commit();
        if let Some(leaving) = self.active_mut() {
            leaving.blur();
        }

        self.document.mode = next;
        let committed = self.document.content.clone();
        let loaded = self.active_mut().map(|entering| {
            entering.set_content(&committed);
            entering.content()
        });
        if let Some(loaded) = loaded
            && loaded != self.document.content
        {
            // The visual surface normalizes markup; adopt that form silently
            self.document.content = loaded;
            self.last_emitted = self.document.content.clone();
        }

        log::debug!("editor switched to {next} mode");
        for listener in &mut self.mode_listeners {
            listener(next);
        }
        true
    }

    /// Attach a surface, loading it from the current content.
    pub fn mount(&mut self, mode: EditorMode) {
        let content = self.get_content();
        match mode {
            EditorMode::Visual if self.visual.is_none() => {
                let mut surface = VisualSurface::new(&content);
                surface.set_read_only(self.read_only);
                self.visual = Some(surface);
            }
            EditorMode::Source if self.source.is_none() => {
                let mut surface = SourceSurface::new(&content);
                surface.set_read_only(self.read_only);
                self.source = Some(surface);
            }
            _ => {}
        }
    }

    /// Detach a surface. Pending edits of the active surface are committed
    /// first; afterwards insertions append directly to the content.
    pub fn unmount(&mut self, mode: EditorMode) {
        if mode == self.document.mode {
            self.commit();
        }
        match mode {
            EditorMode::Visual => self.visual = None,
            EditorMode::Source => self.source = None,
        }
    }

    // ============ Insertion ============

    /// Insert `text` at the active surface's cursor, or at the end when it
    /// has no live anchor or no surface is mounted. Ignored when read-only.
    pub fn insert_at_cursor(&mut self, text: &str) {
        if self.read_only {
            log::debug!("ignoring insertion into read-only editor");
            return;
        }
        let inserted = self
            .active_mut()
            .map(|surface| {
                let anchor = surface.capture();
                if anchor.is_detached() {
                    log::debug!("no live cursor, appending insertion at the end");
                }
                surface.insert(&anchor, text);
            })
            .is_some();
        if !inserted {
            log::debug!(
                "{} surface not mounted, appending insertion to content",
                self.document.mode
            );
            self.document.content.push_str(text);
        }
        self.commit();
    }

    /// The active surface's live selection, for restoring after a dialog.
    pub fn capture_anchor(&self) -> CursorAnchor {
        self.active().map_or(CursorAnchor::Detached, |s| s.capture())
    }

    pub fn restore_anchor(&mut self, anchor: &CursorAnchor) -> bool {
        self.active_mut().is_some_and(|s| s.restore(anchor))
    }

    // ============ User input ============

    /// Run a formatting command. Only the visual surface has commands; in
    /// source mode or when read-only this does nothing.
    pub fn format(&mut self, command: &FormatCommand) -> bool {
        if self.read_only || self.document.mode != EditorMode::Visual {
            return false;
        }
        let Some(visual) = self.visual.as_mut() else {
            return false;
        };
        let changed = visual.execute(command).is_some();
        if changed {
            self.commit();
        }
        changed
    }

    pub fn type_text(&mut self, text: &str) -> bool {
        let changed = self
            .active_mut()
            .and_then(|s| s.type_text(text))
            .is_some();
        if changed {
            self.commit();
        }
        changed
    }

    pub fn delete_backward(&mut self) -> bool {
        let changed = self
            .active_mut()
            .and_then(|s| s.delete_backward())
            .is_some();
        if changed {
            self.commit();
        }
        changed
    }

    pub fn focus(&mut self) {
        if let Some(surface) = self.active_mut() {
            surface.focus();
        }
    }

    pub fn blur(&mut self) {
        if let Some(surface) = self.active_mut() {
            surface.blur();
        }
    }

    /// Select in the visual surface; `false` unless it is active and the
    /// range fits its content.
    pub fn select_visual(&mut self, range: DomRange) -> bool {
        if self.document.mode != EditorMode::Visual {
            return false;
        }
        self.visual.as_mut().is_some_and(|v| v.select(range))
    }

    /// Select in the visual surface by linear text offsets.
    pub fn select_visual_text(&mut self, range: Range<usize>) -> bool {
        if self.document.mode != EditorMode::Visual {
            return false;
        }
        self.visual.as_mut().is_some_and(|v| v.select_text(range))
    }

    pub fn select_source(&mut self, range: TextRange) -> bool {
        if self.document.mode != EditorMode::Source {
            return false;
        }
        match self.source.as_mut() {
            Some(source) => {
                source.select(range);
                true
            }
            None => false,
        }
    }
}

impl ContentHandle for Editor {
    fn insert_at_cursor(&mut self, text: &str) {
        Editor::insert_at_cursor(self, text);
    }

    fn get_content(&self) -> String {
        Editor::get_content(self)
    }
}
