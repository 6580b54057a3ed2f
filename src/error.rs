//! Error types shared across the front end.
//!
//! Syntax problems are not propagated as `Err`: the lexer and parser record
//! them as [`crate::diagnostic::Diagnostic`]s and keep going. The enums here
//! carry the kind and the display text for those diagnostics, plus the
//! handful of genuinely fatal conditions (bad offsets, unreadable input).

use std::io;
use std::path::PathBuf;

use snafu::Snafu;

pub type LoxyResult<T> = Result<T, LoxyError>;

/// Exit codes of the `loxy` binary, one per failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
  Usage = 64,
  Compile = 65,
  Runtime = 70,
  File = 74,
}

impl ExitStatus {
  pub fn code(self) -> i32 {
    self as i32
  }
}

/// Recoverable lexical and syntactic errors.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SyntaxError {
  #[snafu(display("Unterminated string."))]
  UnterminatedString,

  #[snafu(display("Unexpected character {found:?}."))]
  UnexpectedCharacter { found: char },

  #[snafu(display("Expect expression."))]
  ExpectedExpression,

  #[snafu(display("Expect ')' after expression."))]
  ExpectedClosingParen,

  #[snafu(display("Invalid number literal '{lexeme}'."))]
  InvalidNumber { lexeme: String },
}

/// Lookups into a [`crate::source::SourceBuffer`] that fall outside it.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SourceError {
  #[snafu(display("offset {offset} is outside the buffer (length {len})"))]
  OffsetOutOfRange { offset: usize, len: usize },

  #[snafu(display("line index {line} is outside the buffer ({count} lines)"))]
  LineOutOfRange { line: usize, count: usize },
}

/// Why `parse` produced no expression at all.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseFailed {
  #[snafu(display("token stream is empty or not terminated by end of input"))]
  EmptyTokenStream,

  #[snafu(display("no expression could be parsed at offset {offset}"))]
  NoExpression { offset: usize },
}

/// Failures while rendering a diagnostic.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
  #[snafu(display("highlighted range does not lie within the reported line"))]
  HighlightOutsideLine,

  #[snafu(display("cannot locate diagnostic: {source}"))]
  Locate { source: SourceError },

  #[snafu(display("cannot write diagnostic: {source}"))]
  Write { source: io::Error },
}

/// Driver-level failures of the `loxy` binary.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoxyError {
  #[snafu(display("Could not find file \"{}\".", path.display()))]
  FileNotFound { path: PathBuf, source: io::Error },

  #[snafu(display("Could not read file \"{}\": {source}", path.display()))]
  ReadFile { path: PathBuf, source: io::Error },

  #[snafu(display("Could not read input: {source}"))]
  ReadInput { source: io::Error },

  #[snafu(display("Could not write output: {source}"))]
  WriteOutput { source: io::Error },

  #[snafu(display("{source}"))]
  Report { source: ReportError },
}

impl LoxyError {
  pub fn exit_status(&self) -> ExitStatus {
    match self {
      Self::FileNotFound { .. } | Self::ReadFile { .. } => ExitStatus::File,
      Self::ReadInput { .. } | Self::WriteOutput { .. } | Self::Report { .. } => {
        ExitStatus::Runtime
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn syntax_error_messages() {
    assert_eq!(SyntaxError::UnterminatedString.to_string(), "Unterminated string.");
    assert_eq!(
      SyntaxError::UnexpectedCharacter { found: '@' }.to_string(),
      "Unexpected character '@'."
    );
    assert_eq!(
      SyntaxError::ExpectedClosingParen.to_string(),
      "Expect ')' after expression."
    );
  }

  #[test]
  fn exit_codes_are_distinct() {
    let codes = [
      ExitStatus::Usage.code(),
      ExitStatus::Compile.code(),
      ExitStatus::Runtime.code(),
      ExitStatus::File.code(),
    ];
    assert_eq!(codes, [64, 65, 70, 74]);
  }

  #[test]
  fn file_errors_map_to_file_status() {
    let err = LoxyError::FileNotFound {
      path: PathBuf::from("missing.lox"),
      source: io::Error::from(io::ErrorKind::NotFound),
    };
    assert_eq!(err.exit_status(), ExitStatus::File);
    assert_eq!(err.to_string(), "Could not find file \"missing.lox\".");
  }
}
