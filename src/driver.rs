//! File and interactive front ends used by the `loxy` binary.
//!
//! Output goes through caller-supplied writers so the same code serves the
//! terminal and tests: results to `out`, diagnostics to `err`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use codespan_reporting::term::termcolor::WriteColor;
use snafu::ResultExt;

use crate::diagnostic::Diagnostics;
use crate::error::{
  FileNotFoundSnafu, LoxyResult, ReadFileSnafu, ReadInputSnafu, ReportSnafu, WriteOutputSnafu,
};
use crate::source::{self, SourceBuffer};
use crate::token::Token;

pub const PROMPT: &str = "loxy> ";

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
  /// List every token, and highlight each one on `err`, before the tree.
  pub dump_tokens: bool,
}

/// Load a whole file into a buffer named after its path.
///
/// Invalid UTF-8 is decoded lossily and left for the lexer to report.
pub fn read_source(path: &Path) -> LoxyResult<SourceBuffer> {
  match fs::read(path) {
    Ok(bytes) => Ok(SourceBuffer::load(
      source::decode_lossy(bytes),
      path.display().to_string(),
    )),
    Err(source) if source.kind() == io::ErrorKind::NotFound => {
      Err(source).context(FileNotFoundSnafu { path })
    }
    Err(source) => Err(source).context(ReadFileSnafu { path }),
  }
}

/// Parse a file. Returns whether any error was reported.
pub fn run_file<W: Write, E: WriteColor>(
  path: &Path,
  options: Options,
  out: &mut W,
  err: &mut E,
) -> LoxyResult<bool> {
  let buffer = read_source(path)?;
  run_buffer(&buffer, options, out, err)
}

/// Read-parse-print loop: one line per buffer until end of input.
///
/// Empty lines are skipped. Errors on one line are reported and forgotten.
pub fn run_prompt<R: BufRead, W: Write, E: WriteColor>(
  input: &mut R,
  options: Options,
  out: &mut W,
  err: &mut E,
) -> LoxyResult<()> {
  let mut buffer = SourceBuffer::empty("repl");

  loop {
    write!(out, "{PROMPT}").context(WriteOutputSnafu)?;
    out.flush().context(WriteOutputSnafu)?;

    if buffer.read_line(input).context(ReadInputSnafu)? == 0 {
      writeln!(out).context(WriteOutputSnafu)?;
      return Ok(());
    }
    if matches!(buffer.text(), "\n" | "\r\n") {
      continue;
    }
    run_buffer(&buffer, options, out, err)?;
  }
}

/// Compile one buffer, report its diagnostics and print the tree.
pub fn run_buffer<W: Write, E: WriteColor>(
  buffer: &SourceBuffer,
  options: Options,
  out: &mut W,
  err: &mut E,
) -> LoxyResult<bool> {
  let compilation = crate::compile(buffer);

  if options.dump_tokens {
    dump_tokens(buffer, &compilation.tokens, out, err)?;
  }

  compilation
    .diagnostics
    .emit_all(err, buffer)
    .context(ReportSnafu)?;

  if let Ok(expr) = &compilation.result {
    writeln!(out, "{expr}").context(WriteOutputSnafu)?;
  }
  Ok(compilation.had_error())
}

/// Flush `out`, reporting a failure as a write error.
pub fn flush<W: Write>(out: &mut W) -> LoxyResult<()> {
  out.flush().context(WriteOutputSnafu)
}

fn dump_tokens<W: Write, E: WriteColor>(
  buffer: &SourceBuffer,
  tokens: &[Token<'_>],
  out: &mut W,
  err: &mut E,
) -> LoxyResult<()> {
  let mut notes = Diagnostics::new();
  for token in tokens {
    writeln!(out, "{token}").context(WriteOutputSnafu)?;
    notes.info(token.kind.name(), token.span());
  }
  notes.emit_all(err, buffer).context(ReportSnafu)
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use codespan_reporting::term::termcolor::NoColor;

  use super::*;
  use crate::error::{ExitStatus, LoxyError};

  fn prompt(input: impl AsRef<[u8]>, options: Options) -> (String, String) {
    let mut out = Vec::new();
    let mut err = NoColor::new(Vec::new());
    run_prompt(&mut Cursor::new(input), options, &mut out, &mut err).unwrap();
    (
      String::from_utf8(out).unwrap(),
      String::from_utf8(err.into_inner()).unwrap(),
    )
  }

  #[test]
  fn prompt_prints_one_tree_per_line() {
    let (out, err) = prompt("1 + 2 * 3\n1 - 2 - 3\n", Options::default());
    assert_eq!(out, "loxy> (+ 1 (* 2 3))\nloxy> (- (- 1 2) 3)\nloxy> \n");
    assert!(err.is_empty());
  }

  #[test]
  fn prompt_skips_empty_lines() {
    let (out, err) = prompt("\n\r\n1\n", Options::default());
    assert_eq!(out, "loxy> loxy> loxy> 1\nloxy> \n");
    assert!(err.is_empty());
  }

  #[test]
  fn whitespace_only_line_is_parsed() {
    let (out, err) = prompt("   \n", Options::default());
    assert_eq!(out, "loxy> loxy> \n");
    assert!(err.contains("error: Expect expression."));
  }

  #[test]
  fn invalid_utf8_line_is_reported_and_the_session_continues() {
    let (out, err) = prompt(b"\xff\n1 + 2\n", Options::default());
    assert_eq!(out, "loxy> loxy> (+ 1 2)\nloxy> \n");
    assert_eq!(err.matches("error: Unexpected character").count(), 1);
    assert_eq!(err.matches("error:").count(), 1);
  }

  #[test]
  fn prompt_errors_do_not_leak_into_the_next_line() {
    let (out, err) = prompt("(1\n2\n", Options::default());
    assert_eq!(out, "loxy> (group 1)\nloxy> 2\nloxy> \n");
    assert_eq!(err.matches("error:").count(), 1);
    assert!(err.contains(" --> repl:1:3\n"));
  }

  #[test]
  fn first_token_error_prints_no_tree() {
    let (out, err) = prompt(")\n", Options::default());
    assert_eq!(out, "loxy> loxy> \n");
    assert!(err.contains("error: Expect expression."));
  }

  #[test]
  fn token_dump_lists_and_highlights_tokens() {
    let (out, err) = prompt("1 >= 2\n", Options { dump_tokens: true });
    assert!(out.contains("[NUMBER] \"1\"\n[GREATER_EQUAL] \">=\"\n[NUMBER] \"2\"\n[EOF] \"\"\n"));
    assert!(out.contains("(>= 1 2)\n"));
    assert!(err.contains("info: GREATER_EQUAL\n"));
    assert!(err.contains("  |   ^^ GREATER_EQUAL\n"));
  }

  #[test]
  fn file_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.lox");
    std::fs::write(&path, "1 @ 2\n").unwrap();

    let mut out = Vec::new();
    let mut err = NoColor::new(Vec::new());
    let had_error = run_file(&path, Options::default(), &mut out, &mut err).unwrap();
    assert!(had_error);
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    let err = String::from_utf8(err.into_inner()).unwrap();
    assert!(err.contains(&format!(" --> {}:1:3\n", path.display())));
  }

  #[test]
  fn invalid_utf8_in_a_file_is_a_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bytes.lox");
    std::fs::write(&path, b"1 \xfe 2\n").unwrap();

    let mut out = Vec::new();
    let mut err = NoColor::new(Vec::new());
    let had_error = run_file(&path, Options::default(), &mut out, &mut err).unwrap();
    assert!(had_error);
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    let err = String::from_utf8(err.into_inner()).unwrap();
    assert!(err.contains("error: Unexpected character"));
    assert!(err.contains(&format!(" --> {}:1:3\n", path.display())));
  }

  struct BrokenPipe;

  impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
      Err(io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> io::Result<()> {
      Err(io::ErrorKind::BrokenPipe.into())
    }
  }

  #[test]
  fn failed_flush_is_a_runtime_error() {
    let err = flush(&mut BrokenPipe).unwrap_err();
    assert!(matches!(err, LoxyError::WriteOutput { .. }));
    assert_eq!(err.exit_status(), ExitStatus::Runtime);
  }

  #[test]
  fn missing_file_is_a_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_source(&dir.path().join("nope.lox")).unwrap_err();
    assert!(matches!(err, LoxyError::FileNotFound { .. }));
    assert_eq!(err.exit_status(), ExitStatus::File);
  }
}
