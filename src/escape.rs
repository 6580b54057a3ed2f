//! Escaping of control characters for debug output.

use std::borrow::Cow;

fn escape_char(c: char) -> Option<&'static str> {
  Some(match c {
    '\u{07}' => "\\a",
    '\u{08}' => "\\b",
    '\t' => "\\t",
    '\n' => "\\n",
    '\u{0B}' => "\\v",
    '\u{0C}' => "\\f",
    '\r' => "\\r",
    '\\' => "\\\\",
    '"' => "\\\"",
    _ => return None,
  })
}

/// Render control characters, backslashes and double quotes as escapes.
/// Borrows `text` when there is nothing to escape.
pub fn escape(text: &str) -> Cow<'_, str> {
  let Some(first) = text.find(|c: char| escape_char(c).is_some()) else {
    return Cow::Borrowed(text);
  };

  let mut out = String::with_capacity(text.len() + 4);
  out.push_str(&text[..first]);
  for c in text[first..].chars() {
    match escape_char(c) {
      Some(escaped) => out.push_str(escaped),
      None => out.push(c),
    }
  }
  Cow::Owned(out)
}
