//! Abstract syntax tree
//!
//! A closed tagged-variant tree over the expression grammar; the evaluator
//! matches it exhaustively, so adding a node kind is a compile-visible
//! change everywhere it matters.

use std::fmt;

use crate::token::Span;

/// Binary operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
        }
    }
}

/// Expression node
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Integer literal
    Number(i64, Span),
    /// Binary operation
    Binary {
        /// Operator
        op: BinOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
        /// Source location of the whole operation
        span: Span,
    },
}

impl Expr {
    /// Source location of this node
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, span) => *span,
            Expr::Binary { span, .. } => *span,
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesized rendering, useful in parser tests.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value, _) => write!(f, "{}", value),
            Expr::Binary { op, lhs, rhs, .. } => write!(f, "({} {} {})", lhs, op, rhs),
        }
    }
}
