//! Expression tree produced by the parser.
//!
//! Nodes own their children outright. Literal nodes keep the token they were
//! built from so numbers print exactly as written; string literals copy their
//! text out of the buffer.

use std::fmt;

use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'src> {
  /// Placeholder left where an expression was expected but none was found.
  None,
  Nil {
    token: Token<'src>,
  },
  Bool {
    token: Token<'src>,
    value: bool,
  },
  Number {
    token: Token<'src>,
    value: f64,
  },
  String {
    token: Token<'src>,
    value: String,
  },
  Unary {
    op: Token<'src>,
    operand: Box<Expr<'src>>,
  },
  Binary {
    op: Token<'src>,
    left: Box<Expr<'src>>,
    right: Box<Expr<'src>>,
  },
  Grouping {
    inner: Box<Expr<'src>>,
  },
}

impl<'src> Expr<'src> {
  pub fn nil(token: Token<'src>) -> Self {
    Self::Nil { token }
  }

  pub fn bool(token: Token<'src>, value: bool) -> Self {
    Self::Bool { token, value }
  }

  pub fn number(token: Token<'src>, value: f64) -> Self {
    Self::Number { token, value }
  }

  pub fn string(token: Token<'src>) -> Self {
    Self::String {
      token,
      value: token.lexeme.to_string(),
    }
  }

  pub fn unary(op: Token<'src>, operand: Expr<'src>) -> Self {
    Self::Unary {
      op,
      operand: Box::new(operand),
    }
  }

  pub fn binary(op: Token<'src>, left: Expr<'src>, right: Expr<'src>) -> Self {
    Self::Binary {
      op,
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn grouping(inner: Expr<'src>) -> Self {
    Self::Grouping {
      inner: Box::new(inner),
    }
  }

  pub fn is_none(&self) -> bool {
    matches!(self, Self::None)
  }
}

/// Parenthesized prefix form: `1 + 2 * 3` prints as `(+ 1 (* 2 3))`.
impl fmt::Display for Expr<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::None => Ok(()),
      Self::Nil { .. } => f.write_str("nil"),
      Self::Bool { value, .. } => write!(f, "{value}"),
      Self::Number { token, .. } => f.write_str(token.lexeme),
      Self::String { value, .. } => f.write_str(value),
      Self::Unary { op, operand } => write!(f, "({} {operand})", op.lexeme),
      Self::Binary { op, left, right } => write!(f, "({} {left} {right})", op.lexeme),
      Self::Grouping { inner } => write!(f, "(group {inner})"),
    }
  }
}
