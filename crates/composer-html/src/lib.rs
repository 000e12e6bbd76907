//! # composer-html
//!
//! The HTML layer behind the template composer's visual surface and preview.
//! Message bodies are stored as HTML strings; this crate turns such a string
//! into an editable tree and back.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → TreeBuilder → Fragment → Serializer → HTML
//!               (Logos)          (tolerant)     (mutable)   (deterministic)
//! ```
//!
//! - **[`lexer`]** tokenizes with [Logos]; every byte of input lands in a token.
//! - **[`parser`]** builds a [`Fragment`] the way a forgiving browser would:
//!   it never fails and closes what the author forgot to close.
//! - **[`dom`]** is the mutable tree plus the two addressing schemes editing
//!   needs: node paths ([`DomPoint`]) and linear text offsets.
//! - **[`serialize`]** writes canonical markup. Parsing canonical markup gives
//!   back the same tree, so normalization happens once and never drifts.
//! - **[`sanitize`]** strips active content for previews.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Quick Start
//!
//! ```
//! use composer_html::{DomPoint, Fragment};
//!
//! let mut fragment = Fragment::parse("<p>Dear ,</p>");
//! let point = DomPoint::new(vec![0, 0], 5);
//! fragment.insert_text(&point, "{{resident.first_name}}");
//!
//! assert_eq!(fragment.to_html(), "<p>Dear {{resident.first_name}},</p>");
//! ```

pub mod dom;
pub mod lexer;
pub mod parser;
pub mod sanitize;
pub mod serialize;

pub use dom::{Attribute, DomPoint, Element, Fragment, Node, NodePath, TextNodeRef};
pub use parser::parse;
pub use sanitize::{sanitize, sanitize_html};
pub use serialize::serialize;

/// Parse and re-serialize, giving the canonical form of `html`.
pub fn normalize_html(html: &str) -> String {
    parse(html).to_html()
}
