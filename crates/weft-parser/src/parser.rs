//! Recursive-descent parser
//!
//! One level per precedence tier: `expr` handles `+`/`-`, `term` handles
//! `*`/`/`, `factor` handles literals and grouping.

use crate::ast::{BinOp, Expr};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use crate::{ParseError, ParseResult};

/// Expression parser over a token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Lex source text and set up a parser over it
    ///
    /// # Errors
    ///
    /// Propagates lexer errors.
    pub fn new(source: &str) -> ParseResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Parse a complete expression
    ///
    /// # Errors
    ///
    /// Fails if the input is empty, malformed, or has trailing tokens.
    pub fn parse(mut self) -> ParseResult<Expr> {
        let expr = self.expr()?;
        match self.current().kind {
            TokenKind::Eof => Ok(expr),
            found => Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found,
                span: self.current().span,
            }),
        }
    }

    // The token stream always ends with Eof, so current() is total.
    fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        let token = self.current();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind,
                span: token.span,
            })
        }
    }

    /// `expr := term (('+' | '-') term)*`
    fn expr(&mut self) -> ParseResult<Expr> {
        let mut node = self.term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            let span = node.span().join(rhs.span());
            node = Expr::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(node)
    }

    /// `term := factor (('*' | '/') factor)*`
    fn term(&mut self) -> ParseResult<Expr> {
        let mut node = self.factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.factor()?;
            let span = node.span().join(rhs.span());
            node = Expr::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(node)
    }

    /// `factor := INT | '(' expr ')'`
    fn factor(&mut self) -> ParseResult<Expr> {
        let token = self.current();
        match token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expr::Number(value, token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof),
            found => Err(ParseError::UnexpectedToken {
                expected: "integer or '('".to_string(),
                found,
                span: token.span,
            }),
        }
    }
}

/// Parse source text into an expression tree
///
/// # Errors
///
/// Fails on lexing errors, malformed expressions, or trailing tokens.
pub fn parse(source: &str) -> ParseResult<Expr> {
    Parser::new(source)?.parse()
}
