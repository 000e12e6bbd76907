//! # Lexer - Tokenizing HTML Source
//!
//! This module breaks HTML markup into a flat token stream using the [Logos]
//! lexer generator. Like every lexer in this project it is **lossless**: each
//! byte of the input lands in exactly one token, so concatenating the token
//! slices gives back the original string.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ```
//! use composer_html::lexer::lex;
//!
//! let input = "<p>Hello <b>{{resident.name}}</b></p>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! The lexer is deliberately shallow. It recognises tag-shaped runs
//! (`<b>`, `</b>`, `<!-- -->`, `<!DOCTYPE>`) and text between them; it does
//! not know about nesting, void elements or raw-text elements. The
//! [`parser`](crate::parser) module owns all of that.
//!
//! A `<` followed by something that cannot start a tag becomes
//! [`TokenKind::Lt`], which is how `a < b` survives. A tag-shaped run that
//! never closes, such as a trailing `<b`, is rejected by Logos as a whole
//! and comes out as a single [`TokenKind::Text`]. The parser treats both as
//! character data.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- ... -->`, or everything to end of input when unterminated
    #[token("<!--", lex_comment)]
    Comment,

    /// `<!DOCTYPE html>` and other `<!x ...>` declarations
    #[regex(r"<![a-zA-Z][^>]*>")]
    Declaration,

    /// `<?xml ... ?>`, parsed as a bogus comment
    #[regex(r"<\?[^>]*>")]
    ProcessingInstruction,

    /// `</tag>`
    #[regex(r"</[a-zA-Z][^>]*>")]
    EndTag,

    /// `<tag attr="x">` or `<tag/>`
    #[regex(r"<[a-zA-Z][^>]*>")]
    StartTag,

    /// A `<` that does not start a tag
    #[token("<")]
    Lt,

    /// Character data up to the next `<`
    #[regex(r"[^<]+")]
    Text,
}

fn lex_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("-->") {
        Some(end) => lex.bump(end + 3),
        None => {
            let rest = lex.remainder().len();
            lex.bump(rest);
        }
    }
    true
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input).into_iter().map(|(t, _)| t).collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        // Anything Logos rejects is character data
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
