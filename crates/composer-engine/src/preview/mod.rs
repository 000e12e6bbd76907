//! Preview rendering.
//!
//! - **`pipeline`**: `render(content, format)` producing sanitized, styled
//!   HTML or literal text for an isolated viewer
//! - **`session`**: preview dialog state with async data-context loading

pub mod pipeline;
pub mod session;

pub use pipeline::{
    EMPTY_PREVIEW_PLACEHOLDER, PREVIEW_CSP, PREVIEW_STYLESHEET, PresentableOutput, PreviewFormat,
    PreviewPipeline, render,
};
pub use session::{PreviewSession, PreviewState};
