//! Token taxonomy and the reserved-word table.

use std::fmt;

use crate::escape::escape;
use crate::source::Span;

/// Kinds of tokens recognised by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  // Single-character punctuation.
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,
  Comma,
  Dot,
  Minus,
  Plus,
  Semicolon,
  Slash,
  Star,

  // One or two characters.
  Bang,
  BangEqual,
  Equal,
  EqualEqual,
  Greater,
  GreaterEqual,
  Less,
  LessEqual,

  // Literals.
  Identifier,
  String,
  Number,

  // Keywords.
  And,
  Class,
  Else,
  False,
  For,
  Fn,
  If,
  Nil,
  Or,
  Print,
  Return,
  Super,
  This,
  True,
  Var,
  While,

  Comment,
  Error,
  Eof,
}

impl TokenKind {
  pub fn name(self) -> &'static str {
    match self {
      Self::LeftParen => "LEFT_PAREN",
      Self::RightParen => "RIGHT_PAREN",
      Self::LeftBrace => "LEFT_BRACE",
      Self::RightBrace => "RIGHT_BRACE",
      Self::Comma => "COMMA",
      Self::Dot => "DOT",
      Self::Minus => "MINUS",
      Self::Plus => "PLUS",
      Self::Semicolon => "SEMICOLON",
      Self::Slash => "SLASH",
      Self::Star => "STAR",
      Self::Bang => "BANG",
      Self::BangEqual => "BANG_EQUAL",
      Self::Equal => "EQUAL",
      Self::EqualEqual => "EQUAL_EQUAL",
      Self::Greater => "GREATER",
      Self::GreaterEqual => "GREATER_EQUAL",
      Self::Less => "LESS",
      Self::LessEqual => "LESS_EQUAL",
      Self::Identifier => "IDENTIFIER",
      Self::String => "STRING",
      Self::Number => "NUMBER",
      Self::And => "AND",
      Self::Class => "CLASS",
      Self::Else => "ELSE",
      Self::False => "FALSE",
      Self::For => "FOR",
      Self::Fn => "FN",
      Self::If => "IF",
      Self::Nil => "NIL",
      Self::Or => "OR",
      Self::Print => "PRINT",
      Self::Return => "RETURN",
      Self::Super => "SUPER",
      Self::This => "THIS",
      Self::True => "TRUE",
      Self::Var => "VAR",
      Self::While => "WHILE",
      Self::Comment => "COMMENT",
      Self::Error => "ERROR",
      Self::Eof => "EOF",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

pub const KEYWORD_MIN_LEN: usize = 2;
pub const KEYWORD_MAX_LEN: usize = 6;

const KEYWORDS: [(&str, TokenKind); 16] = [
  ("and", TokenKind::And),
  ("class", TokenKind::Class),
  ("else", TokenKind::Else),
  ("false", TokenKind::False),
  ("for", TokenKind::For),
  ("fn", TokenKind::Fn),
  ("if", TokenKind::If),
  ("nil", TokenKind::Nil),
  ("or", TokenKind::Or),
  ("print", TokenKind::Print),
  ("return", TokenKind::Return),
  ("super", TokenKind::Super),
  ("this", TokenKind::This),
  ("true", TokenKind::True),
  ("var", TokenKind::Var),
  ("while", TokenKind::While),
];

/// Keyword kind for an identifier-shaped word, if it is reserved.
pub fn keyword(word: &str) -> Option<TokenKind> {
  if !(KEYWORD_MIN_LEN..=KEYWORD_MAX_LEN).contains(&word.len()) {
    return None;
  }
  KEYWORDS
    .iter()
    .find(|&&(spelling, _)| spelling == word)
    .map(|&(_, kind)| kind)
}

/// A lexeme and its classification. Borrows from the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
  pub kind: TokenKind,
  pub lexeme: &'src str,
  /// Byte offset of `lexeme` in the buffer.
  pub offset: usize,
}

impl<'src> Token<'src> {
  pub fn new(kind: TokenKind, lexeme: &'src str, offset: usize) -> Self {
    Self {
      kind,
      lexeme,
      offset,
    }
  }

  pub fn span(&self) -> Span {
    Span::new(self.offset, self.offset + self.lexeme.len())
  }

  pub fn is_eof(&self) -> bool {
    self.kind == TokenKind::Eof
  }
}

impl fmt::Display for Token<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] \"{}\"", self.kind, escape(self.lexeme))
  }
}
