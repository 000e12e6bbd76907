use composer_html::{Fragment, Node, sanitize};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge_tags::{ResolveOptions, ResolvedContent, resolve_with};

pub const EMPTY_PREVIEW_PLACEHOLDER: &str = "No content to preview";

/// Base typography, responsive images, bordered tables and underlined links.
pub const PREVIEW_STYLESHEET: &str = "\
body{margin:0;padding:16px;font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Roboto,Helvetica,Arial,sans-serif;font-size:14px;line-height:1.5;color:#1f2933;background:#fff;word-wrap:break-word}\
h1,h2,h3,h4,h5,h6{margin:0 0 .5em;line-height:1.25}\
p{margin:0 0 1em}\
img{max-width:100%;height:auto}\
table{border-collapse:collapse;max-width:100%}\
th,td{border:1px solid #d0d7de;padding:4px 8px}\
a{color:#0b5cad;text-decoration:underline}\
pre{white-space:pre-wrap;font-family:inherit;margin:0}\
.placeholder{color:#7b8794;font-style:italic}";

/// No scripts, no network except images, inline styles only.
pub const PREVIEW_CSP: &str =
    "default-src 'none'; img-src * data: cid:; style-src 'unsafe-inline'; font-src * data:";

/// How content is presented in the preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Html,
    Plain,
}

impl std::fmt::Display for PreviewFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewFormat::Html => write!(f, "html"),
            PreviewFormat::Plain => write!(f, "plain"),
        }
    }
}

/// Rendered preview, ready to be placed in an isolated viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentableOutput {
    /// Nothing to show; `text` is the placeholder message
    Placeholder { format: PreviewFormat, text: String },
    /// A complete, sanitized HTML document
    Html { document: String },
    /// Literal text, to be shown without interpreting markup
    Plain { text: String },
}

impl PresentableOutput {
    pub fn format(&self) -> PreviewFormat {
        match self {
            PresentableOutput::Placeholder { format, .. } => *format,
            PresentableOutput::Html { .. } => PreviewFormat::Html,
            PresentableOutput::Plain { .. } => PreviewFormat::Plain,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PresentableOutput::Placeholder { .. })
    }

    /// The rendered payload: HTML document, literal text or placeholder message.
    pub fn content(&self) -> &str {
        match self {
            PresentableOutput::Placeholder { text, .. } => text,
            PresentableOutput::Html { document } => document,
            PresentableOutput::Plain { text } => text,
        }
    }

    /// A standalone HTML document showing this output.
    pub fn to_document(&self) -> String {
        match self {
            PresentableOutput::Html { document } => document.clone(),
            PresentableOutput::Plain { text } => {
                wrap_document(&format!("<pre>{}</pre>", html_escape::encode_text(text)))
            }
            PresentableOutput::Placeholder { text, .. } => wrap_document(&format!(
                "<p class=\"placeholder\">{}</p>",
                html_escape::encode_text(text)
            )),
        }
    }

    /// An `<iframe>` with an empty `sandbox` attribute: no scripts, no
    /// forms, and a unique origin without access to host storage or cookies.
    pub fn to_iframe(&self) -> String {
        format!(
            "<iframe sandbox=\"\" referrerpolicy=\"no-referrer\" title=\"Message preview\" srcdoc=\"{}\"></iframe>",
            html_escape::encode_double_quoted_attribute(&self.to_document())
        )
    }
}

fn wrap_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
<meta http-equiv=\"Content-Security-Policy\" content=\"{PREVIEW_CSP}\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<style>{PREVIEW_STYLESHEET}</style></head><body>{body}</body></html>"
    )
}

/// Whether a sanitized fragment would show anything.
fn has_visible_content(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(el) if el.is_raw_text() => false,
        Node::Element(el) => {
            matches!(el.tag.as_str(), "img" | "hr" | "input") || has_visible_content(&el.children)
        }
        Node::Comment(_) | Node::Doctype(_) => false,
    })
}

/// Renders content strings for the preview viewer.
#[derive(Debug, Clone)]
pub struct PreviewPipeline {
    placeholder: String,
}

impl Default for PreviewPipeline {
    fn default() -> Self {
        Self {
            placeholder: EMPTY_PREVIEW_PLACEHOLDER.to_string(),
        }
    }
}

impl PreviewPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different placeholder message. A blank message keeps the default.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        if !placeholder.trim().is_empty() {
            self.placeholder = placeholder;
        }
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn render(&self, content: &str, format: PreviewFormat) -> PresentableOutput {
        if content.trim().is_empty() {
            return self.placeholder_for(format);
        }
        match format {
            PreviewFormat::Html => {
                let mut fragment = Fragment::parse(content);
                let removed = sanitize(&mut fragment);
                if removed > 0 {
                    log::debug!("preview sanitizer removed {removed} elements or attributes");
                }
                if !has_visible_content(&fragment.children) {
                    return self.placeholder_for(format);
                }
                PresentableOutput::Html {
                    document: wrap_document(&fragment.to_html()),
                }
            }
            PreviewFormat::Plain => PresentableOutput::Plain {
                text: content.to_string(),
            },
        }
    }

    /// Resolve merge tags against `context`, then render. Values are escaped
    /// for HTML previews so data never injects markup.
    pub fn render_resolved(
        &self,
        content: &str,
        context: &Value,
        format: PreviewFormat,
    ) -> (PresentableOutput, ResolvedContent) {
        let options = ResolveOptions {
            escape_html: format == PreviewFormat::Html,
        };
        let resolved = resolve_with(content, context, options);
        (self.render(&resolved.text, format), resolved)
    }

    fn placeholder_for(&self, format: PreviewFormat) -> PresentableOutput {
        PresentableOutput::Placeholder {
            format,
            text: self.placeholder.clone(),
        }
    }
}

/// Render with the default pipeline.
pub fn render(content: &str, format: PreviewFormat) -> PresentableOutput {
    PreviewPipeline::default().render(content, format)
}
