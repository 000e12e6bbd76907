//! # composer-engine
//!
//! Core of a message and template composer: a dual-mode (visual/source)
//! HTML editor, a catalog of merge tags authors can insert, a resolver that
//! fills those tags from recipient data, and a preview renderer.
//!
//! ```text
//! user edit → active surface → Editor (document, on_change) → host
//!                                   │
//!              send / preview ←─ resolve(content, context) ←─┘
//! ```
//!
//! Nothing here performs I/O except the optional catalog file source; data
//! contexts and merge-tag lists are supplied by the host.

pub mod editing;
pub mod lifecycle;
pub mod merge_tags;
pub mod preview;

// Re-export key types for easier usage
pub use editing::{
    ContentHandle, CursorAnchor, Document, DomRange, EditingSurface, Editor, EditorMode,
    FormatCommand, SelectionAdapter, SourceSurface, TextRange, VisualSurface,
};
pub use lifecycle::{LoadGuard, LoadTicket};
pub use merge_tags::{
    CatalogError, MergeTag, MergeTagCatalog, MergeTagGroup, MergeTagSource, ResolveOptions,
    ResolvedContent, TagPicker, resolve, resolve_with,
};
pub use preview::{PresentableOutput, PreviewFormat, PreviewPipeline, PreviewSession, render};
