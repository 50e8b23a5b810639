//! Display width helpers for characters and grapheme clusters.

use unicode_width::UnicodeWidthChar;

/// Number of columns from `visual_x` to the next tab stop.
///
/// A `tab_width` of zero is treated as one so callers never divide by zero.
#[inline]
pub fn tab_width_at(visual_x: usize, tab_width: usize) -> usize {
  let tab_width = tab_width.max(1);
  tab_width - (visual_x % tab_width)
}

/// Display width of a single code point.
///
/// Control characters and zero-width marks report a width of 1 so they remain
/// addressable on screen.
#[must_use]
#[inline]
pub fn char_width(ch: char) -> usize {
  if ch.is_ascii() {
    return 1;
  }
  UnicodeWidthChar::width(ch).unwrap_or(1).max(1)
}

/// East Asian wide and fullwidth characters occupy two cells.
#[must_use]
#[inline]
pub fn is_full_width(ch: char) -> bool {
  char_width(ch) == 2
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tab_width_at() {
    assert_eq!(tab_width_at(0, 4), 4);
    assert_eq!(tab_width_at(1, 4), 3);
    assert_eq!(tab_width_at(3, 4), 1);
    assert_eq!(tab_width_at(4, 4), 4);
    assert_eq!(tab_width_at(7, 0), 1);
  }

  #[test]
  fn test_char_width() {
    assert_eq!(char_width('a'), 1);
    assert_eq!(char_width('\u{0007}'), 1);
    assert_eq!(char_width('\u{0301}'), 1);
    assert_eq!(char_width('漢'), 2);
    assert_eq!(char_width('ａ'), 2); // fullwidth latin
    assert!(is_full_width('漢'));
    assert!(!is_full_width('é'));
  }
}
