//! Crate root: wires together the front-end pipeline.
//!
//! - `source` owns the text and its line index.
//! - `lexer` scans a buffer into a flat token vector (`token` holds the kinds).
//! - `parser` builds an `ast::Expr` from the tokens, recovering from errors.
//! - `diagnostic` collects problems and renders them against the source.
//! - `error` centralises the error enums shared by the other modules.
//! - `driver` runs files and the interactive prompt for the binary.

pub mod ast;
pub mod diagnostic;
pub mod driver;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;

pub use ast::Expr;
pub use diagnostic::{Diagnostic, Diagnostics, Level};
pub use error::{ExitStatus, LoxyError, LoxyResult, ParseFailed, SyntaxError};
pub use source::SourceBuffer;
pub use token::{Token, TokenKind};

/// Everything produced from one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation<'src> {
  pub tokens: Vec<Token<'src>>,
  pub result: Result<Expr<'src>, ParseFailed>,
  /// Lexer diagnostics first, then parser diagnostics.
  pub diagnostics: Diagnostics,
}

impl Compilation<'_> {
  /// Whether the input should be treated as failed.
  pub fn had_error(&self) -> bool {
    self.diagnostics.had_error() || self.result.is_err()
  }
}

/// Scan the whole buffer, then parse one expression from the tokens.
///
/// When the lexer failed and left nothing but `Eof` behind, the parser is
/// not run: the lexer's diagnostics already describe the problem.
pub fn compile(buffer: &SourceBuffer) -> Compilation<'_> {
  let lexer::Scanned {
    tokens,
    mut diagnostics,
  } = lexer::scan_all(buffer);

  let nothing_left = tokens
    .iter()
    .all(|token| matches!(token.kind, TokenKind::Comment | TokenKind::Eof));
  if diagnostics.had_error() && nothing_left {
    return Compilation {
      tokens,
      result: Err(ParseFailed::EmptyTokenStream),
      diagnostics,
    };
  }

  let outcome = parser::parse(&tokens);
  diagnostics.extend(outcome.diagnostics);

  Compilation {
    result: outcome.result,
    tokens,
    diagnostics,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compile_prints_prefix_form() {
    let buffer = SourceBuffer::load("1 + 2 * 3", "test");
    let compilation = compile(&buffer);
    assert!(!compilation.had_error());
    assert_eq!(compilation.result.unwrap().to_string(), "(+ 1 (* 2 3))");
  }

  #[test]
  fn lexer_diagnostics_come_before_parser_diagnostics() {
    let buffer = SourceBuffer::load("(1 @ 2", "test");
    let compilation = compile(&buffer);
    assert_eq!(
      compilation.diagnostics.kinds().cloned().collect::<Vec<_>>(),
      vec![
        SyntaxError::UnexpectedCharacter { found: '@' },
        SyntaxError::ExpectedClosingParen,
      ]
    );
    assert!(compilation.had_error());
  }

  #[test]
  fn lexer_failure_with_no_tokens_skips_the_parser() {
    let buffer = SourceBuffer::load("\"abc", "test");
    let compilation = compile(&buffer);
    assert_eq!(
      compilation.diagnostics.kinds().cloned().collect::<Vec<_>>(),
      vec![SyntaxError::UnterminatedString]
    );
    assert_eq!(compilation.result, Err(ParseFailed::EmptyTokenStream));
    assert!(compilation.had_error());
  }

  #[test]
  fn empty_input_without_lexer_errors_is_still_parsed() {
    let buffer = SourceBuffer::load("// nothing", "test");
    let compilation = compile(&buffer);
    assert_eq!(
      compilation.diagnostics.kinds().cloned().collect::<Vec<_>>(),
      vec![SyntaxError::ExpectedExpression]
    );
    assert!(matches!(
      compilation.result,
      Err(ParseFailed::NoExpression { .. })
    ));
  }

  #[test]
  fn separate_compilations_do_not_share_error_state() {
    let bad = SourceBuffer::load("@", "bad");
    let good = SourceBuffer::load("1", "good");
    assert!(compile(&bad).had_error());
    assert!(!compile(&good).had_error());
  }
}
