//! Diagnostic collection and rendering.
//!
//! The lexer and parser never stop at the first problem: they push a
//! [`Diagnostic`] into their [`Diagnostics`] list and carry on. A driver
//! later renders the list against the buffer the diagnostics came from,
//! in a layout modelled on rustc's:
//!
//! ```text
//! error: Unexpected character '@'.
//!  --> script.lox:1:3
//!   |
//! 1 | 1 @ 2
//!   |   ^ Unexpected character '@'.
//! ```

use std::fmt;
use std::io::{self, Write};

use codespan_reporting::term::termcolor::{Color, ColorSpec, WriteColor};
use snafu::{OptionExt, ResultExt};

use crate::error::{
  HighlightOutsideLineSnafu, LocateSnafu, ReportError, SyntaxError, WriteSnafu,
};
use crate::source::{SourceBuffer, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Error,
  Info,
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Level::Error => write!(f, "error"),
      Level::Info => write!(f, "info"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub level: Level,
  /// Set for errors; informational entries carry only a message.
  pub kind: Option<SyntaxError>,
  pub message: String,
  pub span: Span,
}

/// Ordered diagnostics of one scan or parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
  items: Vec<Diagnostic>,
}

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn error(&mut self, kind: SyntaxError, span: Span) {
    self.items.push(Diagnostic {
      level: Level::Error,
      message: kind.to_string(),
      kind: Some(kind),
      span,
    });
  }

  pub fn info(&mut self, message: impl Into<String>, span: Span) {
    self.items.push(Diagnostic {
      level: Level::Info,
      kind: None,
      message: message.into(),
      span,
    });
  }

  /// Whether any error (not merely info) was recorded.
  pub fn had_error(&self) -> bool {
    self.items.iter().any(|d| d.level == Level::Error)
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
    self.items.iter()
  }

  /// Error kinds in the order they were reported.
  pub fn kinds(&self) -> impl Iterator<Item = &SyntaxError> {
    self.items.iter().filter_map(|d| d.kind.as_ref())
  }

  pub fn extend(&mut self, other: Diagnostics) {
    self.items.extend(other.items);
  }

  /// Render every diagnostic against `buffer`.
  pub fn emit_all<W: WriteColor + ?Sized>(
    &self,
    out: &mut W,
    buffer: &SourceBuffer,
  ) -> Result<(), ReportError> {
    self.iter().try_for_each(|d| emit(&mut *out, buffer, d))
  }
}

/// Render `diagnostic`, resolving its line from `buffer`.
///
/// Spans running past the end of their first line are clipped to it.
pub fn emit<W: WriteColor + ?Sized>(
  out: &mut W,
  buffer: &SourceBuffer,
  diagnostic: &Diagnostic,
) -> Result<(), ReportError> {
  let line = buffer.line_at(diagnostic.span.start).context(LocateSnafu)?;
  let text = buffer.line_text(line).context(LocateSnafu)?;
  let line_start = buffer.line_starts()[line];

  let start = (diagnostic.span.start - line_start).min(text.len());
  let end = diagnostic
    .span
    .end
    .saturating_sub(line_start)
    .clamp(start, text.len());
  let highlight = text.get(start..end).context(HighlightOutsideLineSnafu)?;

  report(
    out,
    diagnostic.level,
    buffer.name(),
    line + 1,
    text,
    highlight,
    &diagnostic.message,
  )
}

/// Render one message anchored to `highlight`, which must be a subslice of
/// `line`. The column is the byte offset of `highlight` within `line`.
pub fn report<W: WriteColor + ?Sized>(
  out: &mut W,
  level: Level,
  source_name: &str,
  line_number: usize,
  line: &str,
  highlight: &str,
  message: &str,
) -> Result<(), ReportError> {
  let offset = offset_within(line, highlight).context(HighlightOutsideLineSnafu)?;
  let before = line.get(..offset).context(HighlightOutsideLineSnafu)?;
  let after = line
    .get(offset + highlight.len()..)
    .context(HighlightOutsideLineSnafu)?;

  let snippet = Snippet {
    level,
    source_name,
    line_number,
    column: offset + 1,
    before,
    highlight,
    after,
    message,
  };
  snippet.render(out).context(WriteSnafu)
}

fn offset_within(line: &str, part: &str) -> Option<usize> {
  let start = (part.as_ptr() as usize).checked_sub(line.as_ptr() as usize)?;
  (start + part.len() <= line.len()).then_some(start)
}

struct Snippet<'a> {
  level: Level,
  source_name: &'a str,
  line_number: usize,
  column: usize,
  before: &'a str,
  highlight: &'a str,
  after: &'a str,
  message: &'a str,
}

impl Snippet<'_> {
  fn render<W: WriteColor + ?Sized>(&self, out: &mut W) -> io::Result<()> {
    let accent = accent(self.level);
    let gutter = color(Color::Blue);
    let pad = " ".repeat(self.line_number.to_string().len());

    out.set_color(&accent)?;
    write!(out, "{}", self.level)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, ": {}", self.message)?;

    out.set_color(&gutter)?;
    write!(out, "{pad}--> ")?;
    out.reset()?;
    write!(out, "{}", self.source_name)?;
    out.set_color(&gutter)?;
    write!(out, ":{}", self.line_number)?;
    out.set_color(&color(Color::Cyan))?;
    writeln!(out, ":{}", self.column)?;

    out.set_color(&gutter)?;
    writeln!(out, "{pad} |")?;
    write!(out, "{} | ", self.line_number)?;
    out.reset()?;
    write!(out, "{}", self.before)?;
    out.set_color(&accent)?;
    write!(out, "{}", self.highlight)?;
    out.reset()?;
    writeln!(out, "{}", self.after)?;

    out.set_color(&gutter)?;
    write!(out, "{pad} | ")?;
    out.set_color(&accent)?;
    let indent = " ".repeat(self.before.chars().count());
    let carets = "^".repeat(self.highlight.chars().count().max(1));
    writeln!(out, "{indent}{carets} {}", self.message)?;
    out.reset()?;
    writeln!(out)
  }
}

fn color(fg: Color) -> ColorSpec {
  let mut spec = ColorSpec::new();
  spec.set_fg(Some(fg));
  spec
}

fn accent(level: Level) -> ColorSpec {
  let mut spec = color(match level {
    Level::Error => Color::Red,
    Level::Info => Color::Green,
  });
  spec.set_bold(true);
  spec
}
