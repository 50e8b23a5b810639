//! Character classification used when laying out a line.

/// Unicode directional formatting characters.
///
/// These change how surrounding text is laid out without being visible
/// themselves, so they are treated like control characters when control
/// characters are rendered.
#[inline]
pub fn is_bidi_control(ch: char) -> bool {
  matches!(ch,
    '\u{202A}'..='\u{202E}' | // LRE, RLE, PDF, LRO, RLO
    '\u{2066}'..='\u{2069}' | // LRI, RLI, FSI, PDI
    '\u{200E}'..='\u{200F}' | // LRM, RLM
    '\u{061C}'                // ALM
  )
}

/// C0 controls except tab, DEL, and the bidi formatting characters.
#[inline]
pub fn is_control_character(ch: char) -> bool {
  match ch {
    '\t' => false,
    c if (c as u32) < 0x20 => true,
    '\u{007F}' => true,
    c => is_bidi_control(c),
  }
}

/// Printable ASCII plus tab, LF and CR. C0 controls and DEL do not qualify.
#[inline]
pub fn char_is_basic_ascii(ch: char) -> bool {
  matches!(ch, '\t' | '\n' | '\r' | ' '..='~')
}

pub fn is_basic_ascii(text: &str) -> bool {
  text.chars().all(char_is_basic_ascii)
}

/// Returns `true` if the character belongs to a right-to-left script or is
/// one of the RTL-forcing marks.
pub fn char_is_rtl(ch: char) -> bool {
  matches!(ch,
    '\u{0590}'..='\u{05FF}' |   // Hebrew
    '\u{0600}'..='\u{06FF}' |   // Arabic
    '\u{0700}'..='\u{074F}' |   // Syriac
    '\u{0780}'..='\u{07BF}' |   // Thaana
    '\u{07C0}'..='\u{07FF}' |   // NKo
    '\u{0800}'..='\u{083F}' |   // Samaritan
    '\u{0840}'..='\u{085F}' |   // Mandaic
    '\u{08A0}'..='\u{08FF}' |   // Arabic Extended-A
    '\u{FB1D}'..='\u{FB4F}' |   // Hebrew Presentation Forms
    '\u{FB50}'..='\u{FDFF}' |   // Arabic Presentation Forms-A
    '\u{FE70}'..='\u{FEFC}' |   // Arabic Presentation Forms-B
    '\u{10800}'..='\u{1083F}' | // Cypriot
    '\u{10840}'..='\u{1085F}' | // Imperial Aramaic
    '\u{10900}'..='\u{1091F}' | // Phoenician
    '\u{10920}'..='\u{1093F}' | // Lydian
    '\u{10A00}'..='\u{10A5F}' | // Kharoshthi
    '\u{10B00}'..='\u{10B3F}' | // Avestan
    '\u{1E800}'..='\u{1E8DF}' | // Mende Kikakui
    '\u{1E900}'..='\u{1E95F}' | // Adlam
    '\u{1EE00}'..='\u{1EEFF}' | // Arabic Mathematical Symbols
    '\u{200F}' |                // RLM
    '\u{202B}' |                // RLE
    '\u{202E}' |                // RLO
    '\u{2067}'                  // RLI
  )
}

/// Cheap check used to decide whether bidi-sensitive handling is needed.
pub fn contains_rtl(text: &str) -> bool {
  text.chars().any(char_is_rtl)
}

pub fn chars_contain_rtl(chars: &[char]) -> bool {
  chars.iter().copied().any(char_is_rtl)
}

/// Index of the first char that is neither a space nor a tab.
pub fn first_non_whitespace_index(chars: &[char]) -> Option<usize> {
  chars.iter().position(|&ch| ch != ' ' && ch != '\t')
}

/// Index of the last char that is neither a space nor a tab.
pub fn last_non_whitespace_index(chars: &[char]) -> Option<usize> {
  chars.iter().rposition(|&ch| ch != ' ' && ch != '\t')
}
