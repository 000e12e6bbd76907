//! Preview dialog state.
//!
//! Opening a preview snapshots the document content and may wait for the
//! data context (recipient data fetched asynchronously). Rendering itself is
//! synchronous. A context that arrives after the dialog closed or was
//! reopened is dropped.

use serde_json::Value;
use std::future::Future;

use crate::lifecycle::{LoadGuard, LoadTicket};

use super::pipeline::{PresentableOutput, PreviewFormat, PreviewPipeline};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Closed,
    Loading,
    Ready {
        output: PresentableOutput,
        unresolved_tags: Vec<String>,
    },
}

#[derive(Debug)]
pub struct PreviewSession {
    pipeline: PreviewPipeline,
    format: PreviewFormat,
    guard: LoadGuard,
    state: PreviewState,
    content: String,
    context: Value,
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(PreviewPipeline::default(), PreviewFormat::default())
    }
}

impl PreviewSession {
    pub fn new(pipeline: PreviewPipeline, format: PreviewFormat) -> Self {
        Self {
            pipeline,
            format,
            guard: LoadGuard::new(),
            state: PreviewState::Closed,
            content: String::new(),
            context: Value::Null,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn format(&self) -> PreviewFormat {
        self.format
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PreviewState::Loading)
    }

    pub fn output(&self) -> Option<&PresentableOutput> {
        match &self.state {
            PreviewState::Ready { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Open for `content` and wait for a data context, delivered through
    /// [`complete`](Self::complete) with the returned ticket.
    pub fn open(&mut self, content: &str) -> LoadTicket {
        self.content = content.to_string();
        self.state = PreviewState::Loading;
        self.guard.begin()
    }

    /// Open and render immediately against `context`.
    pub fn open_with_context(&mut self, content: &str, context: Value) {
        let ticket = self.open(content);
        self.complete(ticket, Ok(context));
    }

    /// Open, await the context future and render.
    pub async fn show<F>(&mut self, content: &str, context: F)
    where
        F: Future<Output = anyhow::Result<Value>>,
    {
        let ticket = self.open(content);
        let context = context.await;
        self.complete(ticket, context);
    }

    /// Deliver the data context for `ticket`. A failed fetch renders with no
    /// data, leaving every tag unresolved. Returns `false` for a stale ticket.
    pub fn complete(&mut self, ticket: LoadTicket, context: anyhow::Result<Value>) -> bool {
        if !self.guard.finish(ticket) {
            return false;
        }
        self.context = context.unwrap_or_else(|e| {
            log::warn!("preview data context unavailable: {e:#}");
            Value::Null
        });
        self.rerender();
        true
    }

    /// Change the format, re-rendering a preview that is already showing.
    pub fn set_format(&mut self, format: PreviewFormat) {
        self.format = format;
        if matches!(self.state, PreviewState::Ready { .. }) {
            self.rerender();
        }
    }

    pub fn close(&mut self) {
        self.guard.cancel();
        self.state = PreviewState::Closed;
        self.content.clear();
        self.context = Value::Null;
    }

    fn rerender(&mut self) {
        let (output, resolved) =
            self.pipeline
                .render_resolved(&self.content, &self.context, self.format);
        self.state = PreviewState::Ready {
            output,
            unresolved_tags: resolved.unresolved_tags,
        };
    }
}
