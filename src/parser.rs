//! Recursive-descent parser producing an expression tree.
//!
//! One method per precedence level, lowest first:
//!
//! ```text
//! expression     := equality
//! equality       := comparison ( ("==" | "!=") comparison )*
//! comparison     := addition ( (">" | ">=" | "<" | "<=") addition )*
//! addition       := multiplication ( ("+" | "-") multiplication )*
//! multiplication := unary ( ("*" | "/") unary )*
//! unary          := ("!" | "-" | "+") unary | primary
//! primary        := NUMBER | STRING | "true" | "false" | "nil"
//!                 | "(" expression ")"
//! ```
//!
//! Errors do not abort the parse. A missing `)` is reported and the grouping
//! is kept; a missing operand is reported and replaced with [`Expr::None`].

use crate::ast::Expr;
use crate::diagnostic::Diagnostics;
use crate::error::{
  EmptyTokenStreamSnafu, ExpectedClosingParenSnafu, ExpectedExpressionSnafu,
  InvalidNumberSnafu, NoExpressionSnafu, ParseFailed, SyntaxError,
};
use crate::source::Span;
use crate::token::{Token, TokenKind};

/// Result of [`parse`]. `result` is `Err` only when no expression could be
/// built at all; recovered errors inside the tree show up in `diagnostics`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<'src> {
  pub result: Result<Expr<'src>, ParseFailed>,
  pub diagnostics: Diagnostics,
}

/// Parse one expression from a token slice terminated by `Eof`.
///
/// Tokens after the expression are left alone.
pub fn parse<'src>(tokens: &[Token<'src>]) -> ParseOutcome<'src> {
  if !tokens.last().is_some_and(Token::is_eof) {
    return ParseOutcome {
      result: EmptyTokenStreamSnafu.fail(),
      diagnostics: Diagnostics::new(),
    };
  }

  let mut parser = Parser::new(tokens);
  let offset = parser.peek().map_or(0, |token| token.offset);
  let expr = parser.expression();
  let diagnostics = parser.finish();

  let result = if expr.is_none() {
    NoExpressionSnafu { offset }.fail()
  } else {
    Ok(expr)
  };
  ParseOutcome {
    result,
    diagnostics,
  }
}

/// Keywords that begin a statement; [`Parser::synchronize`] stops before them.
const STATEMENT_START: [TokenKind; 8] = [
  TokenKind::Class,
  TokenKind::Fn,
  TokenKind::Var,
  TokenKind::For,
  TokenKind::If,
  TokenKind::While,
  TokenKind::Print,
  TokenKind::Return,
];

/// Cursor over a token slice. Comment tokens are stepped over and never
/// become current.
pub struct Parser<'t, 'src> {
  tokens: &'t [Token<'src>],
  pos: usize,
  previous: Option<Token<'src>>,
  diagnostics: Diagnostics,
}

impl<'t, 'src> Parser<'t, 'src> {
  pub fn new(tokens: &'t [Token<'src>]) -> Self {
    let mut parser = Self {
      tokens,
      pos: 0,
      previous: None,
      diagnostics: Diagnostics::new(),
    };
    parser.skip_comments();
    parser
  }

  /// Hand back the diagnostics reported so far.
  pub fn finish(self) -> Diagnostics {
    self.diagnostics
  }

  pub fn peek(&self) -> Option<&Token<'src>> {
    self.tokens.get(self.pos)
  }

  pub fn previous(&self) -> Option<&Token<'src>> {
    self.previous.as_ref()
  }

  pub fn is_at_end(&self) -> bool {
    self.peek().is_none_or(Token::is_eof)
  }

  pub fn expression(&mut self) -> Expr<'src> {
    self.parse_equality()
  }

  /// Skip ahead to a likely statement boundary after an error: just past a
  /// `;`, or just before a statement keyword, or end of input.
  pub fn synchronize(&mut self) {
    self.advance();

    while !self.is_at_end() {
      if self
        .previous
        .is_some_and(|token| token.kind == TokenKind::Semicolon)
      {
        return;
      }
      if self
        .peek()
        .is_some_and(|token| STATEMENT_START.contains(&token.kind))
      {
        return;
      }
      self.advance();
    }
  }

  fn parse_equality(&mut self) -> Expr<'src> {
    self.left_assoc(
      &[TokenKind::EqualEqual, TokenKind::BangEqual],
      Self::parse_comparison,
    )
  }

  fn parse_comparison(&mut self) -> Expr<'src> {
    self.left_assoc(
      &[
        TokenKind::Greater,
        TokenKind::GreaterEqual,
        TokenKind::Less,
        TokenKind::LessEqual,
      ],
      Self::parse_addition,
    )
  }

  fn parse_addition(&mut self) -> Expr<'src> {
    self.left_assoc(
      &[TokenKind::Minus, TokenKind::Plus],
      Self::parse_multiplication,
    )
  }

  fn parse_multiplication(&mut self) -> Expr<'src> {
    self.left_assoc(&[TokenKind::Slash, TokenKind::Star], Self::parse_unary)
  }

  /// `operand ( op operand )*`, folded left.
  fn left_assoc(
    &mut self,
    ops: &[TokenKind],
    operand: fn(&mut Self) -> Expr<'src>,
  ) -> Expr<'src> {
    let mut node = operand(self);
    while let Some(op) = self.eat_any(ops) {
      let rhs = operand(self);
      node = Expr::binary(op, node, rhs);
    }
    node
  }

  fn parse_unary(&mut self) -> Expr<'src> {
    if let Some(op) = self.eat_any(&[TokenKind::Bang, TokenKind::Minus, TokenKind::Plus]) {
      let operand = self.parse_unary();
      return Expr::unary(op, operand);
    }

    self.parse_primary()
  }

  fn parse_primary(&mut self) -> Expr<'src> {
    let Some(&token) = self.peek() else {
      self.error_at_current(ExpectedExpressionSnafu.build());
      return Expr::None;
    };

    match token.kind {
      TokenKind::Nil => {
        self.advance();
        Expr::nil(token)
      }
      TokenKind::False => {
        self.advance();
        Expr::bool(token, false)
      }
      TokenKind::True => {
        self.advance();
        Expr::bool(token, true)
      }
      TokenKind::Number => {
        self.advance();
        self.number(token)
      }
      TokenKind::String => {
        self.advance();
        Expr::string(token)
      }
      TokenKind::LeftParen => {
        self.advance();
        let inner = self.expression();
        self.consume(TokenKind::RightParen, ExpectedClosingParenSnafu.build());
        Expr::grouping(inner)
      }
      _ => {
        self.error_at_current(ExpectedExpressionSnafu.build());
        Expr::None
      }
    }
  }

  fn number(&mut self, token: Token<'src>) -> Expr<'src> {
    match token.lexeme.parse::<f64>() {
      Ok(value) => Expr::number(token, value),
      Err(_) => {
        let error = InvalidNumberSnafu {
          lexeme: token.lexeme,
        }
        .build();
        self.diagnostics.error(error, token.span());
        Expr::None
      }
    }
  }

  fn check(&self, kind: TokenKind) -> bool {
    !self.is_at_end() && self.peek().is_some_and(|token| token.kind == kind)
  }

  /// Consume the current token if its kind is one of `kinds`.
  fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<Token<'src>> {
    if kinds.iter().any(|&kind| self.check(kind)) {
      return self.advance();
    }
    None
  }

  fn consume(&mut self, kind: TokenKind, error: SyntaxError) -> Option<Token<'src>> {
    if self.check(kind) {
      return self.advance();
    }
    self.error_at_current(error);
    None
  }

  /// Step past the current token. `Eof` is never stepped past.
  fn advance(&mut self) -> Option<Token<'src>> {
    let token = *self.peek()?;
    if !token.is_eof() {
      self.pos += 1;
      self.skip_comments();
    }
    self.previous = Some(token);
    Some(token)
  }

  fn skip_comments(&mut self) {
    while self
      .peek()
      .is_some_and(|token| token.kind == TokenKind::Comment)
    {
      self.pos += 1;
    }
  }

  fn error_at_current(&mut self, error: SyntaxError) {
    let span = match (self.peek(), self.previous) {
      // At end of input, point just past the last real token.
      (Some(current), Some(previous)) if current.is_eof() => {
        let end = previous.span().end;
        Span::new(end, end)
      }
      (Some(current), _) => current.span(),
      (None, _) => self
        .tokens
        .last()
        .map_or_else(Span::default, Token::span),
    };
    self.diagnostics.error(error, span);
  }
}
