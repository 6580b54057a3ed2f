//! Line-indexed source text.
//!
//! A [`SourceBuffer`] owns the text being compiled together with the byte
//! offset of every line start. Tokens borrow their lexemes from the buffer,
//! so it must outlive them; `reset` and `read_line` take `&mut self`, which
//! means the borrow checker refuses to reuse a buffer while anything lexed
//! from it is still around.

use std::io::{self, BufRead};
use std::mem;

use snafu::ensure;

use crate::error::{LineOutOfRangeSnafu, OffsetOutOfRangeSnafu, SourceError};

/// Half-open byte range `start..end` into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}

#[derive(Debug, Clone)]
pub struct SourceBuffer {
  name: String,
  text: String,
  /// Offsets of line starts. Always starts with 0 and is strictly increasing.
  line_starts: Vec<usize>,
}

impl SourceBuffer {
  pub fn load(text: impl Into<String>, name: impl Into<String>) -> Self {
    let mut buffer = Self {
      name: name.into(),
      text: text.into(),
      line_starts: vec![0],
    };
    buffer.index_lines();
    buffer
  }

  /// An empty buffer, ready for [`SourceBuffer::read_line`].
  pub fn empty(name: impl Into<String>) -> Self {
    Self::load(String::new(), name)
  }

  /// Clear the text down to a single empty line. Allocations are kept.
  pub fn reset(&mut self) {
    self.text.clear();
    self.line_starts.clear();
    self.line_starts.push(0);
  }

  /// Reset, then read one line from `reader` into the buffer.
  ///
  /// Returns the number of bytes read; `0` means end of input. Invalid
  /// UTF-8 is replaced with U+FFFD so the lexer can report it.
  pub fn read_line<R: BufRead>(&mut self, reader: &mut R) -> io::Result<usize> {
    self.reset();
    let mut bytes = mem::take(&mut self.text).into_bytes();
    let read = reader.read_until(b'\n', &mut bytes)?;
    self.text = decode_lossy(bytes);
    self.index_lines();
    Ok(read)
  }

  fn index_lines(&mut self) {
    self.line_starts.truncate(1);
    self.line_starts.extend(
      self
        .text
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'\n')
        .map(|(i, _)| i + 1),
    );
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn len(&self) -> usize {
    self.text.len()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  pub fn line_starts(&self) -> &[usize] {
    &self.line_starts
  }

  /// 0-based index of the line containing `offset`.
  ///
  /// `offset == len()` is accepted: it is where the end-of-input token sits.
  pub fn line_at(&self, offset: usize) -> Result<usize, SourceError> {
    ensure!(
      offset <= self.text.len(),
      OffsetOutOfRangeSnafu {
        offset,
        len: self.text.len(),
      }
    );
    Ok(match self.line_starts.binary_search(&offset) {
      Ok(line) => line,
      // line_starts[0] == 0, so an insertion point is never 0.
      Err(next) => next - 1,
    })
  }

  /// Text of line `line`, without its `\n` (or `\r\n`).
  pub fn line_text(&self, line: usize) -> Result<&str, SourceError> {
    let Some(&start) = self.line_starts.get(line) else {
      return LineOutOfRangeSnafu {
        line,
        count: self.line_starts.len(),
      }
      .fail();
    };
    let end = match self.line_starts.get(line + 1) {
      Some(&next) => next - 1,
      None => self.text.len(),
    };
    let text = &self.text[start..end];
    Ok(text.strip_suffix('\r').unwrap_or(text))
  }
}

/// Decode `bytes`, reusing the allocation when they are valid UTF-8.
pub fn decode_lossy(bytes: Vec<u8>) -> String {
  String::from_utf8(bytes)
    .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
