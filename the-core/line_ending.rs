//! Unicode line terminators that can hide inside a single line.
//!
//! Layout engines break lines at these, so a rendered line must never contain
//! them verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnicodeSeparator {
  /// U+0085 NEXT LINE
  Nel,
  /// U+2028 LINE SEPARATOR
  LS,
  /// U+2029 PARAGRAPH SEPARATOR
  PS,
}

impl UnicodeSeparator {
  pub const fn from_char(ch: char) -> Option<Self> {
    Some(match ch {
      '\u{0085}' => Self::Nel,
      '\u{2028}' => Self::LS,
      '\u{2029}' => Self::PS,
      _ => return None,
    })
  }
}

#[inline]
pub fn char_is_unicode_separator(ch: char) -> bool {
  UnicodeSeparator::from_char(ch).is_some()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unicode_separators() {
    assert_eq!(UnicodeSeparator::from_char('\u{2029}'), Some(UnicodeSeparator::PS));
    assert!(char_is_unicode_separator('\u{0085}'));
    assert!(char_is_unicode_separator('\u{2028}'));
    assert!(!char_is_unicode_separator('\n'));
    assert!(!char_is_unicode_separator('\r'));
    assert!(!char_is_unicode_separator('\u{000C}'));
  }
}
