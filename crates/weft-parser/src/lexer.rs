//! Lexer for the Weft expression language
//!
//! A logos-generated raw token enum does the scanning; the raw stream is
//! converted into [`Token`]s with spans, with a trailing `Eof` token so the
//! parser never runs off the end.

use logos::Logos;

use crate::token::{Span, Token, TokenKind};
use crate::{ParseError, ParseResult};

/// Logos-based token enum for lexing
///
/// Used internally by logos for scanning; converted to [`TokenKind`] after
/// lexing.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    // Whitespace (skip)
    #[regex(r"[ \t\r\n]+", logos::skip)]
    Whitespace,

    #[regex(r"[0-9]+")]
    Int,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

/// Tokenize source text
///
/// # Errors
///
/// Returns `UnexpectedChar` for characters outside the grammar and
/// `IntegerOverflow` for literals that do not fit in `i64`.
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let raw = result.map_err(|_| ParseError::UnexpectedChar {
            found: lexer.slice().to_string(),
            span,
        })?;
        let kind = match raw {
            // Skipped by the callback; never yielded.
            RawToken::Whitespace => continue,
            RawToken::Int => {
                let value =
                    lexer
                        .slice()
                        .parse::<i64>()
                        .map_err(|_| ParseError::IntegerOverflow {
                            literal: lexer.slice().to_string(),
                            span,
                        })?;
                TokenKind::Int(value)
            }
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
        };
        tokens.push(Token::new(kind, span));
    }

    tokens.push(Token::new(
        TokenKind::Eof,
        Span::new(source.len(), source.len()),
    ));
    Ok(tokens)
}
