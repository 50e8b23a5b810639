//! Renders a single line into `<span>` markup and the [`CharacterMapping`]
//! that ties rendered positions back to columns.

use std::fmt::Write as _;

use bitflags::bitflags;
use the_core::{
  chars::is_control_character,
  grapheme::{
    is_full_width,
    tab_width_at,
  },
  line_ending::char_is_unicode_separator,
};

use crate::render::{
  character_mapping::CharacterMapping,
  input::{
    RenderLineInput,
    RenderWhitespace,
    TextDirection,
  },
  line_decoration::InlineDecorationKind,
  line_part::{
    CLASS_OVERFLOW,
    CLASS_WHITESPACE,
    CLASS_WHITESPACE_WITH_WIDTH,
  },
  resolve::{
    ResolvedRenderLineInput,
    resolve,
  },
};

const NBSP: char = '\u{00a0}';
const RIGHTWARDS_ARROW: char = '\u{2192}';
const HALFWIDTH_RIGHTWARDS_ARROW: char = '\u{ffeb}';
const ZERO_WIDTH_NON_JOINER: char = '\u{200c}';
const REPLACEMENT_CHARACTER: char = '\u{fffd}';
const BYTE_ORDER_MARK: char = '\u{feff}';
const SYMBOL_FOR_NULL: u32 = 0x2400;
const SYMBOL_FOR_DELETE: char = '\u{2421}';

bitflags! {
  /// Elements injected into the line that are not backed by its text.
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct ForeignElements: u8 {
    const BEFORE = 0b01;
    const AFTER  = 0b10;
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLineOutput {
  pub character_mapping:         CharacterMapping,
  pub contains_foreign_elements: ForeignElements,
  pub is_overflowing:            bool,
}

/// [`RenderLineOutput`] together with the markup it was rendered into.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLineOutput2 {
  pub character_mapping:         CharacterMapping,
  pub html:                      String,
  pub contains_foreign_elements: ForeignElements,
  pub is_overflowing:            bool,
}

/// Renders `input` as a `<span>` tree appended to `sink`.
pub fn render_view_line(input: &RenderLineInput, sink: &mut String) -> RenderLineOutput {
  if input.line_content.is_empty() {
    return render_empty_line(input, sink);
  }
  render_line(&resolve(input), sink)
}

pub fn render_view_line_to_string(input: &RenderLineInput) -> RenderLineOutput2 {
  let mut html = String::with_capacity(input.line_content.len() * 2 + 64);
  let output = render_view_line(input, &mut html);
  RenderLineOutput2 {
    character_mapping: output.character_mapping,
    html,
    contains_foreign_elements: output.contains_foreign_elements,
    is_overflowing: output.is_overflowing,
  }
}

fn render_empty_line(input: &RenderLineInput, sink: &mut String) -> RenderLineOutput {
  if input.line_decorations().is_empty() {
    sink.push_str(if input.render_new_line_when_empty {
      "<span><span>\n</span></span>"
    } else {
      "<span><span></span></span>"
    });
    return RenderLineOutput {
      character_mapping:         CharacterMapping::new(0),
      contains_foreign_elements: ForeignElements::empty(),
      is_overflowing:            false,
    };
  }

  // Only the anchors of an empty line have anything to show.
  let mut contains_foreign_elements = ForeignElements::empty();
  let mut before_count = 0;
  sink.push_str("<span>");
  for decoration in input.line_decorations() {
    match decoration.kind {
      InlineDecorationKind::Before => {
        contains_foreign_elements |= ForeignElements::BEFORE;
        before_count += 1;
      },
      InlineDecorationKind::After => contains_foreign_elements |= ForeignElements::AFTER,
      _ => continue,
    }
    sink.push_str("<span class=\"");
    sink.push_str(&decoration.class_name);
    sink.push_str("\"></span>");
  }
  sink.push_str("</span>");

  let mut character_mapping = CharacterMapping::new(1);
  character_mapping.set_column_info(1, before_count, 0, 0);
  RenderLineOutput {
    character_mapping,
    contains_foreign_elements,
    is_overflowing: false,
  }
}

fn render_line(input: &ResolvedRenderLineInput, sink: &mut String) -> RenderLineOutput {
  let len = input.len;
  let parts = &input.parts;
  let chars = &input.line_chars;
  let tab_size = input.tab_size;
  let faux_indent_length = input.faux_indent_length;

  let mut character_mapping = CharacterMapping::new(len + 1);
  let mut last_column_defined = false;

  let mut char_index = 0;
  let mut visible_column = input.start_visible_column;
  let mut char_offset_in_part = 0;
  let mut char_horizontal_offset = 0;
  // Zero-width pseudo-after parts hand their column to the part before them.
  let mut part_displacement = 0;

  sink.push_str(match input.text_direction {
    Some(TextDirection::Rtl) => "<span dir=\"rtl\">",
    Some(TextDirection::Ltr) => "<span dir=\"ltr\">",
    None => "<span>",
  });

  for (part_index, part) in parts.iter().enumerate() {
    let part_end = part.end_index.min(len);
    let renders_whitespace =
      input.render_whitespace != RenderWhitespace::None && part.is_whitespace();
    let renders_whitespace_with_width = renders_whitespace
      && !input.use_monospace_optimizations
      && (part.class.is(CLASS_WHITESPACE) || input.contains_foreign_elements.is_empty());
    let is_empty_and_pseudo_after = char_index == part_end && part.is_pseudo_after();
    char_offset_in_part = 0;

    sink.push_str("<span ");
    if part.contains_rtl {
      sink.push_str("style=\"unicode-bidi:isolate\" ");
    }
    sink.push_str("class=\"");
    if renders_whitespace_with_width {
      sink.push_str(CLASS_WHITESPACE_WITH_WIDTH);
    } else {
      part.class.write_to(sink);
    }
    sink.push('"');

    if renders_whitespace {
      if renders_whitespace_with_width {
        let mut part_width = 0;
        let mut column = visible_column;
        for (idx, &ch) in chars.iter().enumerate().take(part_end).skip(char_index) {
          let width = if ch == '\t' {
            tab_width_at(column, tab_size)
          } else {
            1
          };
          part_width += width;
          if idx >= faux_indent_length {
            column += width;
          }
        }
        let _ = write!(
          sink,
          " style=\"width:{}px\"",
          input.space_width * part_width as f64
        );
      }
      sink.push('>');

      while char_index < part_end {
        character_mapping.set_column_info(
          char_index + 1,
          part_index.saturating_sub(part_displacement),
          char_offset_in_part,
          char_horizontal_offset,
        );
        part_displacement = 0;

        let (produced, width) = if chars[char_index] == '\t' {
          let width = tab_width_at(visible_column, tab_size);
          if input.can_use_halfwidth_rightwards_arrow && width == 1 {
            sink.push(HALFWIDTH_RIGHTWARDS_ARROW);
          } else {
            sink.push(RIGHTWARDS_ARROW);
          }
          for _ in 1..width {
            sink.push(NBSP);
          }
          (width, width)
        } else {
          sink.push(input.render_space_char);
          sink.push(ZERO_WIDTH_NON_JOINER);
          (2, 1)
        };

        char_offset_in_part += produced;
        char_horizontal_offset += width;
        if char_index >= faux_indent_length {
          visible_column += width;
        }
        char_index += 1;
      }
    } else {
      sink.push('>');

      while char_index < part_end {
        character_mapping.set_column_info(
          char_index + 1,
          part_index.saturating_sub(part_displacement),
          char_offset_in_part,
          char_horizontal_offset,
        );
        part_displacement = 0;

        let (produced, width) = render_char(input, chars[char_index], visible_column, sink);

        char_offset_in_part += produced;
        char_horizontal_offset += width;
        if char_index >= faux_indent_length {
          visible_column += width;
        }
        char_index += 1;
      }
    }

    if is_empty_and_pseudo_after {
      part_displacement += 1;
    } else {
      part_displacement = 0;
    }

    if char_index >= len && !last_column_defined && part.is_pseudo_after() {
      last_column_defined = true;
      character_mapping.set_column_info(
        char_index + 1,
        part_index,
        char_offset_in_part,
        char_horizontal_offset,
      );
    }

    sink.push_str("</span>");
  }

  if !last_column_defined {
    // The position after the last character.
    character_mapping.set_column_info(
      len + 1,
      parts.len().saturating_sub(1),
      char_offset_in_part,
      char_horizontal_offset,
    );
  }

  if input.is_overflowing {
    sink.push_str("<span class=\"");
    sink.push_str(CLASS_OVERFLOW);
    sink.push_str("\">Show more (");
    sink.push_str(&render_overflowing_char_count(input.overflowing_char_count));
    sink.push_str(")</span>");
  }

  sink.push_str("</span>");

  RenderLineOutput {
    character_mapping,
    contains_foreign_elements: input.contains_foreign_elements,
    is_overflowing: input.is_overflowing,
  }
}

/// Writes one character of a regular part. Returns the number of rendered
/// characters it produced and its visual width.
fn render_char(
  input: &ResolvedRenderLineInput,
  ch: char,
  visible_column: usize,
  sink: &mut String,
) -> (usize, usize) {
  match ch {
    '\t' => {
      let width = tab_width_at(visible_column, input.tab_size);
      for _ in 0..width {
        sink.push(NBSP);
      }
      (width, width)
    },
    ' ' => {
      sink.push(NBSP);
      (1, 1)
    },
    '<' => {
      sink.push_str("&lt;");
      (1, 1)
    },
    '>' => {
      sink.push_str("&gt;");
      (1, 1)
    },
    '&' => {
      sink.push_str("&amp;");
      (1, 1)
    },
    '\0' => {
      if input.render_control_characters {
        sink.push('\u{2400}');
      } else {
        sink.push_str("&#00;");
      }
      (1, 1)
    },
    BYTE_ORDER_MARK => {
      sink.push(REPLACEMENT_CHARACTER);
      (1, 1)
    },
    ch if char_is_unicode_separator(ch) => {
      sink.push(REPLACEMENT_CHARACTER);
      (1, 1)
    },
    ch => {
      let width = if is_full_width(ch) { 2 } else { 1 };
      if input.render_control_characters && (ch as u32) < 0x20 {
        sink.push(char::from_u32(SYMBOL_FOR_NULL + ch as u32).unwrap_or(REPLACEMENT_CHARACTER));
      } else if input.render_control_characters && ch == '\u{7f}' {
        sink.push(SYMBOL_FOR_DELETE);
      } else if input.render_control_characters && is_control_character(ch) {
        sink.push_str("[U+");
        sink.push_str(&to_four_char_hex(ch));
        sink.push(']');
        return (8, 8);
      } else {
        sink.push(ch);
      }
      (1, width)
    },
  }
}

/// Human readable size of the text cut off an overflowing line.
pub fn render_overflowing_char_count(count: usize) -> String {
  const KB: usize = 1024;
  if count < KB {
    format!("{count} chars")
  } else if count < KB * KB {
    format!("{:.1} KB", count as f64 / KB as f64)
  } else {
    format!("{:.1} MB", count as f64 / KB as f64 / KB as f64)
  }
}

/// Upper-case hex code point padded to at least four digits.
pub fn to_four_char_hex(ch: char) -> String {
  format!("{:04X}", ch as u32)
}
