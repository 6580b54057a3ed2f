//! Lexical analysis: turns a source buffer into a flat vector of tokens.
//!
//! The whole buffer is scanned in one eager pass before parsing starts.
//! Two-character operators are matched greedily, and lexical errors are
//! recorded as diagnostics without stopping the scan, so a single pass
//! reports every bad character and unterminated string in the input.

use crate::diagnostic::Diagnostics;
use crate::error::{UnexpectedCharacterSnafu, UnterminatedStringSnafu};
use crate::source::{SourceBuffer, Span};
use crate::token::{Token, TokenKind, keyword};

/// Output of [`scan_all`]: tokens ending in exactly one `Eof`, plus any
/// lexical errors.
#[derive(Debug, Clone)]
pub struct Scanned<'src> {
  pub tokens: Vec<Token<'src>>,
  pub diagnostics: Diagnostics,
}

/// Lex the whole buffer.
pub fn scan_all(buffer: &SourceBuffer) -> Scanned<'_> {
  let mut lexer = Lexer::new(buffer);
  while !lexer.at_end() {
    lexer.scan_token();
  }
  lexer.finish()
}

struct Lexer<'src> {
  text: &'src str,
  bytes: &'src [u8],
  cursor: usize,
  token_start: usize,
  tokens: Vec<Token<'src>>,
  diagnostics: Diagnostics,
}

impl<'src> Lexer<'src> {
  fn new(buffer: &'src SourceBuffer) -> Self {
    let text = buffer.text();
    Self {
      text,
      bytes: text.as_bytes(),
      cursor: 0,
      token_start: 0,
      tokens: Vec::new(),
      diagnostics: Diagnostics::new(),
    }
  }

  fn finish(mut self) -> Scanned<'src> {
    let end = self.text.len();
    self.tokens.push(Token::new(TokenKind::Eof, &self.text[end..], end));
    Scanned {
      tokens: self.tokens,
      diagnostics: self.diagnostics,
    }
  }

  fn at_end(&self) -> bool {
    self.cursor >= self.bytes.len()
  }

  fn peek(&self) -> Option<u8> {
    self.bytes.get(self.cursor).copied()
  }

  fn peek_next(&self) -> Option<u8> {
    self.bytes.get(self.cursor + 1).copied()
  }

  fn advance(&mut self) -> Option<u8> {
    let c = self.peek()?;
    self.cursor += 1;
    Some(c)
  }

  /// Consume the next byte only if it is `expected`.
  fn eat(&mut self, expected: u8) -> bool {
    if self.peek() == Some(expected) {
      self.cursor += 1;
      return true;
    }
    false
  }

  fn push(&mut self, kind: TokenKind) {
    self.push_span(kind, self.token_start, self.cursor);
  }

  fn push_span(&mut self, kind: TokenKind, start: usize, end: usize) {
    self
      .tokens
      .push(Token::new(kind, &self.text[start..end], start));
  }

  fn scan_token(&mut self) {
    self.token_start = self.cursor;
    let Some(c) = self.advance() else {
      return;
    };

    match c {
      b' ' | b'\t' | b'\r' | b'\n' => {}
      b'(' => self.push(TokenKind::LeftParen),
      b')' => self.push(TokenKind::RightParen),
      b'{' => self.push(TokenKind::LeftBrace),
      b'}' => self.push(TokenKind::RightBrace),
      b',' => self.push(TokenKind::Comma),
      b'.' => self.push(TokenKind::Dot),
      b'-' => self.push(TokenKind::Minus),
      b'+' => self.push(TokenKind::Plus),
      b';' => self.push(TokenKind::Semicolon),
      b'*' => self.push(TokenKind::Star),
      b'!' => self.push_either(b'=', TokenKind::BangEqual, TokenKind::Bang),
      b'=' => self.push_either(b'=', TokenKind::EqualEqual, TokenKind::Equal),
      b'<' => self.push_either(b'=', TokenKind::LessEqual, TokenKind::Less),
      b'>' => self.push_either(b'=', TokenKind::GreaterEqual, TokenKind::Greater),
      b'/' => {
        if self.eat(b'/') {
          self.scan_comment();
        } else {
          self.push(TokenKind::Slash);
        }
      }
      b'"' => self.scan_string(),
      c if c.is_ascii_digit() => self.scan_number(),
      c if is_word_start(c) => self.scan_word(),
      _ => self.unexpected_character(),
    }
  }

  fn push_either(&mut self, second: u8, long: TokenKind, short: TokenKind) {
    let kind = if self.eat(second) { long } else { short };
    self.push(kind);
  }

  /// Everything up to (not including) the end of the line.
  fn scan_comment(&mut self) {
    while self.peek().is_some_and(|c| c != b'\n') {
      self.cursor += 1;
    }
    self.push(TokenKind::Comment);
  }

  fn scan_string(&mut self) {
    while self.peek().is_some_and(|c| c != b'"') {
      self.cursor += 1;
    }

    if self.at_end() {
      // Highlight from the opening quote; rendering clips to its line.
      let span = Span::new(self.token_start, self.cursor);
      self
        .diagnostics
        .error(UnterminatedStringSnafu.build(), span);
      return;
    }

    self.cursor += 1;
    self.push_span(TokenKind::String, self.token_start + 1, self.cursor - 1);
  }

  fn scan_number(&mut self) {
    self.skip_digits();
    if self.peek() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
      self.cursor += 1;
      self.skip_digits();
    }
    self.push(TokenKind::Number);
  }

  fn skip_digits(&mut self) {
    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
      self.cursor += 1;
    }
  }

  fn scan_word(&mut self) {
    while self.peek().is_some_and(is_word_continue) {
      self.cursor += 1;
    }
    let word = &self.text[self.token_start..self.cursor];
    self.push(keyword(word).unwrap_or(TokenKind::Identifier));
  }

  fn unexpected_character(&mut self) {
    // The cursor may have stopped inside a multi-byte character; cover all of it.
    let found = self.text[self.token_start..]
      .chars()
      .next()
      .unwrap_or(char::REPLACEMENT_CHARACTER);
    self.cursor = self.token_start + found.len_utf8();
    let span = Span::new(self.token_start, self.cursor);
    self
      .diagnostics
      .error(UnexpectedCharacterSnafu { found }.build(), span);
  }
}

fn is_word_start(c: u8) -> bool {
  c.is_ascii_alphabetic() || c == b'_'
}

fn is_word_continue(c: u8) -> bool {
  c.is_ascii_alphanumeric() || c == b'_'
}
