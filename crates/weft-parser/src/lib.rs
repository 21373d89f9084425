//! Lexer and parser for the Weft expression language
//!
//! The surface grammar is a four-operator integer calculator:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := INT | '(' expr ')'
//! ```
//!
//! Lexing is logos-generated; parsing is recursive descent producing a
//! closed AST enum that downstream code matches exhaustively.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinOp, Expr};
pub use lexer::tokenize;
pub use parser::{parse, Parser};
pub use token::{Span, Token, TokenKind};

/// Lexing and parsing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Character that starts no token
    #[error("unexpected character '{found}' at {span}")]
    UnexpectedChar {
        /// The offending source text
        found: String,
        /// Source location
        span: Span,
    },

    /// Integer literal that does not fit in 64 bits
    #[error("integer literal '{literal}' out of range at {span}")]
    IntegerOverflow {
        /// The literal text
        literal: String,
        /// Source location
        span: Span,
    },

    /// Token that does not fit the grammar at this position
    #[error("unexpected token '{found}' at {span}, expected {expected}")]
    UnexpectedToken {
        /// What the grammar allowed here
        expected: String,
        /// The token actually seen
        found: TokenKind,
        /// Source location
        span: Span,
    },

    /// Input ended mid-expression
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Result alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;
