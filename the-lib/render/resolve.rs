//! Normalizes the token runs of a [`RenderLineInput`] into the final list of
//! parts the renderer walks once.
//!
//! The stages run in order:
//! 1. cut the line at `stop_rendering_line_after`,
//! 2. re-express tokens against the cut length and the faux indent,
//! 3. split control characters into their own parts,
//! 4. materialize whitespace runs,
//! 5. merge inline decorations,
//! 6. split runs that are too long to query efficiently.

use the_core::{
  chars::{
    chars_contain_rtl,
    first_non_whitespace_index,
    is_control_character,
    last_non_whitespace_index,
  },
  grapheme::is_full_width,
};

use crate::render::{
  input::{
    RenderLineInput,
    RenderWhitespace,
    TextDirection,
    ViewLineTokens,
  },
  line_decoration::{
    InlineDecorationKind,
    LineDecoration,
    normalize,
  },
  line_part::{
    CLASS_CONTROL,
    LinePart,
    LinePartMetadata,
    PartClass,
  },
  view_line::ForeignElements,
};

/// Longest run, in chars, left intact by the final splitting stage.
pub const LONG_TOKEN_THRESHOLD: usize = 50;

/// Snapshot of everything the renderer needs, with the token runs fully
/// normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRenderLineInput {
  pub use_monospace_optimizations:        bool,
  pub can_use_halfwidth_rightwards_arrow: bool,
  /// The whole line; only the first `len` chars are rendered.
  pub line_chars:                         Vec<char>,
  pub len:                                usize,
  pub is_overflowing:                     bool,
  pub overflowing_char_count:             usize,
  pub parts:                              Vec<LinePart>,
  pub contains_foreign_elements:          ForeignElements,
  pub faux_indent_length:                 usize,
  pub tab_size:                           usize,
  pub start_visible_column:               usize,
  pub space_width:                        f64,
  pub render_space_char:                  char,
  pub render_whitespace:                  RenderWhitespace,
  pub render_control_characters:          bool,
  pub text_direction:                     Option<TextDirection>,
}

pub fn resolve(input: &RenderLineInput) -> ResolvedRenderLineInput {
  let line_chars: Vec<char> = input.line_content.chars().collect();

  let (len, is_overflowing, overflowing_char_count) = match input.stop_rendering_line_after {
    Some(stop) if stop < line_chars.len() => (stop, true, line_chars.len() - stop),
    _ => (line_chars.len(), false, 0),
  };
  if is_overflowing {
    tracing::trace!(len, overflowing_char_count, "cutting overflowing line");
  }

  let faux_indent_length = input.faux_indent_length.min(len);

  let mut parts = transform_and_remove_overflowing(
    &line_chars,
    input.contains_rtl,
    &input.line_tokens,
    faux_indent_length,
    len,
  );

  if input.render_control_characters && !input.is_basic_ascii {
    parts = extract_control_characters(&line_chars, parts);
  }

  if should_render_whitespace(input) {
    parts = apply_render_whitespace(input, &line_chars, len, faux_indent_length, parts);
  }

  let mut contains_foreign_elements = ForeignElements::empty();
  let decorations = input.line_decorations();
  if !decorations.is_empty() {
    for decoration in decorations {
      contains_foreign_elements |= match decoration.kind {
        // Letter spacing changes invalidate measurements just like an
        // injected element would.
        InlineDecorationKind::RegularAffectingLetterSpacing | InlineDecorationKind::Before => {
          ForeignElements::BEFORE
        },
        InlineDecorationKind::After => ForeignElements::AFTER,
        InlineDecorationKind::Regular => ForeignElements::empty(),
      };
    }
    parts = apply_inline_decorations(parts, decorations);
  }

  if !input.contains_rtl {
    parts = split_large_tokens(
      &line_chars,
      parts,
      !input.is_basic_ascii || input.font_ligatures,
    );
  }

  ResolvedRenderLineInput {
    use_monospace_optimizations: input.use_monospace_optimizations,
    can_use_halfwidth_rightwards_arrow: input.can_use_halfwidth_rightwards_arrow,
    line_chars,
    len,
    is_overflowing,
    overflowing_char_count,
    parts,
    contains_foreign_elements,
    faux_indent_length,
    tab_size: input.tab_size.max(1),
    start_visible_column: input.start_visible_column,
    space_width: input.space_width,
    render_space_char: input.render_space_char,
    render_whitespace: input.render_whitespace,
    render_control_characters: input.render_control_characters,
    text_direction: input.text_direction,
  }
}

/// Clips tokens to `len`, drops tokens inside the faux indent and gives the
/// faux indent its own unclassified part.
fn transform_and_remove_overflowing(
  line_chars: &[char],
  line_contains_rtl: bool,
  tokens: &ViewLineTokens,
  faux_indent_length: usize,
  len: usize,
) -> Vec<LinePart> {
  let mut result = Vec::with_capacity(tokens.count() + 1);

  if faux_indent_length > 0 {
    result.push(LinePart::new(
      faux_indent_length,
      PartClass::new(),
      LinePartMetadata::empty(),
      false,
    ));
  }

  let mut start_offset = faux_indent_length;
  for token in tokens.iter() {
    if start_offset >= len {
      break;
    }
    if token.end_offset <= start_offset {
      continue;
    }
    let end_offset = token.end_offset.min(len);
    let contains_rtl =
      line_contains_rtl && chars_contain_rtl(&line_chars[start_offset..end_offset]);
    result.push(LinePart::new(
      end_offset,
      PartClass::single(&token.class_name),
      LinePartMetadata::empty(),
      contains_rtl,
    ));
    start_offset = end_offset;
  }

  if start_offset < len {
    let contains_rtl = line_contains_rtl && chars_contain_rtl(&line_chars[start_offset..len]);
    result.push(LinePart::new(
      len,
      PartClass::new(),
      LinePartMetadata::empty(),
      contains_rtl,
    ));
  }

  result
}

/// Gives every control character its own `mtkcontrol` part.
fn extract_control_characters(line_chars: &[char], tokens: Vec<LinePart>) -> Vec<LinePart> {
  let mut result = Vec::with_capacity(tokens.len());
  let mut last_end = 0;
  let mut char_offset = 0;

  for token in tokens {
    let token_end = token.end_index;
    while char_offset < token_end {
      if is_control_character(line_chars[char_offset]) {
        if char_offset > last_end {
          result.push(LinePart::new(
            char_offset,
            token.class.clone(),
            token.metadata,
            token.contains_rtl,
          ));
        }
        result.push(LinePart::new(
          char_offset + 1,
          PartClass::single(CLASS_CONTROL),
          LinePartMetadata::empty(),
          false,
        ));
        last_end = char_offset + 1;
      }
      char_offset += 1;
    }

    if char_offset > last_end {
      result.push(LinePart::new(
        token_end,
        token.class,
        token.metadata,
        token.contains_rtl,
      ));
      last_end = token_end;
    }
  }

  result
}

fn should_render_whitespace(input: &RenderLineInput) -> bool {
  match input.render_whitespace {
    RenderWhitespace::All | RenderWhitespace::Boundary => true,
    RenderWhitespace::Selection => input.has_selections(),
    RenderWhitespace::Trailing => !input.continues_with_wrapped_line,
    RenderWhitespace::None => false,
  }
}

/// Cursor over the token list used while whitespace is materialized.
struct TokenCursor<'a> {
  tokens: &'a [LinePart],
  index:  usize,
}

impl<'a> TokenCursor<'a> {
  fn current(&self) -> &'a LinePart {
    &self.tokens[self.index]
  }

  /// Steps past every token ending at `offset`. Stays on the last token.
  fn advance_past(&mut self, offset: usize) {
    while self.current().end_index == offset {
      if self.index + 1 < self.tokens.len() {
        self.index += 1;
      } else {
        break;
      }
    }
  }
}

fn push_whitespace_parts(
  result: &mut Vec<LinePart>,
  up_to: usize,
  faux_indent_length: usize,
  one_per_char: bool,
) {
  if one_per_char {
    let last_end = result
      .last()
      .map_or(faux_indent_length, |part| part.end_index);
    for end in (last_end + 1)..=up_to {
      result.push(LinePart::whitespace(end));
    }
  } else {
    result.push(LinePart::whitespace(up_to));
  }
}

/// Splits runs so that whitespace that should be drawn sits in `mtkw` parts.
fn apply_render_whitespace(
  input: &RenderLineInput,
  line_chars: &[char],
  len: usize,
  faux_indent_length: usize,
  tokens: Vec<LinePart>,
) -> Vec<LinePart> {
  if tokens.is_empty() {
    return tokens;
  }

  let only_boundary = input.render_whitespace == RenderWhitespace::Boundary;
  let only_trailing = input.render_whitespace == RenderWhitespace::Trailing;
  let one_part_per_char = input.render_space_width != input.space_width;
  let tab_size = input.tab_size.max(1);
  let selections = input.selections_on_line();

  let mut result = Vec::with_capacity(tokens.len() * 2);
  let mut cursor = TokenCursor {
    tokens: &tokens,
    index:  0,
  };

  let (line_is_empty_or_whitespace, first_non_ws, last_non_ws) =
    match first_non_whitespace_index(line_chars) {
      Some(first) => {
        (
          false,
          first,
          last_non_whitespace_index(line_chars).unwrap_or(first),
        )
      },
      None => (true, len, len),
    };

  let mut was_in_whitespace = false;
  let mut selection_index = 0;
  let mut tmp_indent = input.start_visible_column % tab_size;

  for char_index in faux_indent_length..len {
    let ch = line_chars[char_index];

    if let Some(selections) = selections
      && selections
        .get(selection_index)
        .is_some_and(|selection| char_index >= selection.end_offset)
    {
      selection_index += 1;
    }

    let mut is_in_whitespace = if char_index < first_non_ws || char_index > last_non_ws {
      true
    } else if ch == '\t' {
      true
    } else if ch == ' ' {
      if only_boundary {
        let next = (char_index + 1 < len).then(|| line_chars[char_index + 1]);
        was_in_whitespace || matches!(next, Some(' ' | '\t'))
      } else {
        true
      }
    } else {
      false
    };

    if is_in_whitespace && let Some(selections) = selections {
      is_in_whitespace = selections
        .get(selection_index)
        .is_some_and(|selection| selection.contains(char_index));
    }

    if is_in_whitespace && only_trailing {
      is_in_whitespace = line_is_empty_or_whitespace || char_index > last_non_ws;
    }

    // Interior whitespace of RTL text keeps its shaping untouched.
    if is_in_whitespace
      && cursor.current().contains_rtl
      && char_index >= first_non_ws
      && char_index <= last_non_ws
    {
      is_in_whitespace = false;
    }

    let token = cursor.current();
    if was_in_whitespace {
      if !is_in_whitespace || (!input.use_monospace_optimizations && tmp_indent >= tab_size) {
        push_whitespace_parts(&mut result, char_index, faux_indent_length, one_part_per_char);
        tmp_indent %= tab_size;
      }
    } else if char_index == token.end_index || (is_in_whitespace && char_index > faux_indent_length)
    {
      result.push(LinePart::new(
        char_index,
        token.class.clone(),
        LinePartMetadata::empty(),
        token.contains_rtl,
      ));
      tmp_indent %= tab_size;
    }

    if ch == '\t' {
      tmp_indent = tab_size;
    } else if is_full_width(ch) {
      tmp_indent += 2;
    } else {
      tmp_indent += 1;
    }

    was_in_whitespace = is_in_whitespace;
    cursor.advance_past(char_index);
  }

  let mut generate_whitespace = false;
  if was_in_whitespace {
    generate_whitespace = true;
    if input.continues_with_wrapped_line && only_boundary {
      let last = len.checked_sub(1).map(|idx| line_chars[idx]);
      let prev = len.checked_sub(2).map(|idx| line_chars[idx]);
      let is_single_trailing_space = last == Some(' ') && !matches!(prev, Some(' ' | '\t'));
      generate_whitespace = !is_single_trailing_space;
    }
  }

  if generate_whitespace {
    push_whitespace_parts(&mut result, len, faux_indent_length, one_part_per_char);
  } else {
    let token = cursor.current();
    result.push(LinePart::new(
      len,
      token.class.clone(),
      LinePartMetadata::empty(),
      token.contains_rtl,
    ));
  }

  result
}

/// Splits runs at decoration boundaries and appends the decoration classes.
fn apply_inline_decorations(tokens: Vec<LinePart>, decorations: &[LineDecoration]) -> Vec<LinePart> {
  let segments = normalize(decorations);
  tracing::trace!(
    decorations = decorations.len(),
    segments = segments.len(),
    "merging inline decorations"
  );

  let mut result = Vec::with_capacity(tokens.len() + segments.len() * 2);
  let mut segment_index = 0;
  let mut last_end = 0;

  for token in &tokens {
    let token_end = token.end_index;
    while let Some(segment) = segments
      .get(segment_index)
      .filter(|segment| segment.start_offset < token_end)
    {
      if segment.start_offset > last_end {
        last_end = segment.start_offset;
        result.push(LinePart::new(
          last_end,
          token.class.clone(),
          token.metadata,
          token.contains_rtl,
        ));
      }

      let class = token.class.joined_with(&segment.class);
      let metadata = token.metadata | segment.metadata;
      if segment.end_offset <= token_end {
        last_end = segment.end_offset.max(last_end);
        result.push(LinePart::new(last_end, class, metadata, token.contains_rtl));
        segment_index += 1;
      } else {
        last_end = token_end;
        result.push(LinePart::new(last_end, class, metadata, token.contains_rtl));
        break;
      }
    }

    if token_end > last_end {
      last_end = token_end;
      result.push(LinePart::new(
        last_end,
        token.class.clone(),
        token.metadata,
        token.contains_rtl,
      ));
    }
  }

  // Anchors sitting exactly at the end of the line.
  if let Some(line_end) = tokens.last().map(|token| token.end_index) {
    while let Some(segment) = segments
      .get(segment_index)
      .filter(|segment| segment.start_offset == line_end)
    {
      result.push(LinePart::new(
        last_end,
        segment.class.clone(),
        segment.metadata,
        false,
      ));
      segment_index += 1;
    }
  }

  result
}

/// Caps run length at [`LONG_TOKEN_THRESHOLD`].
///
/// With `only_at_spaces` a run is only cut right after a space, so ligatures
/// and combining sequences stay whole.
fn split_large_tokens(
  line_chars: &[char],
  tokens: Vec<LinePart>,
  only_at_spaces: bool,
) -> Vec<LinePart> {
  let mut result = Vec::with_capacity(tokens.len());
  let mut last_token_end = 0;

  for token in tokens {
    let token_end = token.end_index;
    let diff = token_end.saturating_sub(last_token_end);

    if only_at_spaces && diff > LONG_TOKEN_THRESHOLD {
      let mut last_space = None;
      let mut piece_start = last_token_end;
      for (offset, &ch) in line_chars
        .iter()
        .enumerate()
        .take(token_end)
        .skip(last_token_end)
      {
        if ch == ' ' {
          last_space = Some(offset);
        }
        if let Some(space) = last_space
          && offset - piece_start >= LONG_TOKEN_THRESHOLD
        {
          result.push(LinePart::new(
            space + 1,
            token.class.clone(),
            token.metadata,
            token.contains_rtl,
          ));
          piece_start = space + 1;
          last_space = None;
        }
      }
      if piece_start != token_end {
        result.push(token);
      }
    } else if !only_at_spaces && diff > LONG_TOKEN_THRESHOLD {
      let pieces = diff.div_ceil(LONG_TOKEN_THRESHOLD);
      tracing::trace!(len = diff, pieces, "splitting long run");
      for piece in 1..pieces {
        result.push(LinePart::new(
          last_token_end + piece * LONG_TOKEN_THRESHOLD,
          token.class.clone(),
          token.metadata,
          token.contains_rtl,
        ));
      }
      result.push(token);
    } else {
      result.push(token);
    }

    last_token_end = token_end;
  }

  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::render::{
    config::{
      FontMetrics,
      LineRenderConfig,
    },
    input::LineRange,
  };

  fn config(render_whitespace: RenderWhitespace) -> LineRenderConfig {
    LineRenderConfig {
      render_whitespace,
      ..LineRenderConfig::default()
    }
  }

  fn input(text: &str, tokens: &[(usize, &str)], mode: RenderWhitespace) -> RenderLineInput {
    RenderLineInput::new(
      text,
      tokens.iter().copied().collect(),
      &config(mode),
      FontMetrics::default(),
    )
  }

  /// `(end, class)` pairs of the resolved parts.
  fn shape(resolved: &ResolvedRenderLineInput) -> Vec<(usize, String)> {
    resolved
      .parts
      .iter()
      .map(|part| (part.end_index, part.class.to_string()))
      .collect()
  }

  fn owned(parts: &[(usize, &str)]) -> Vec<(usize, String)> {
    parts
      .iter()
      .map(|&(end, class)| (end, class.to_string()))
      .collect()
  }

  #[test]
  fn cuts_overflowing_line() {
    let mut config = config(RenderWhitespace::None);
    config.stop_rendering_line_after = Some(10);
    let text = "abcdefghijklmnopqrst";
    let input = RenderLineInput::new(
      text,
      [(5, "mtk1"), (20, "mtk2")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    let resolved = resolve(&input);
    assert_eq!(resolved.len, 10);
    assert!(resolved.is_overflowing);
    assert_eq!(resolved.overflowing_char_count, 10);
    assert_eq!(shape(&resolved), owned(&[(5, "mtk1"), (10, "mtk2")]));
  }

  #[test]
  fn faux_indent_gets_its_own_part() {
    let input = input("    foo", &[(2, "mtk1"), (7, "mtk2")], RenderWhitespace::None)
      .with_faux_indent(4);
    let resolved = resolve(&input);
    assert_eq!(shape(&resolved), owned(&[(4, ""), (7, "mtk2")]));
  }

  #[test]
  fn pads_short_token_list() {
    let input = input("abcdef", &[(3, "mtk1")], RenderWhitespace::None);
    assert_eq!(shape(&resolve(&input)), owned(&[(3, "mtk1"), (6, "")]));
  }

  #[test]
  fn extracts_control_characters() {
    let mut config = config(RenderWhitespace::None);
    config.render_control_characters = true;
    let input = RenderLineInput::new(
      "a\u{1}b\u{202e}é",
      [(5, "mtk1")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    let resolved = resolve(&input);
    assert_eq!(
      shape(&resolved),
      owned(&[
        (1, "mtk1"),
        (2, "mtkcontrol"),
        (3, "mtk1"),
        (4, "mtkcontrol"),
        (5, "mtk1"),
      ])
    );
  }

  #[test]
  fn extracts_control_characters_from_ascii_lines() {
    let mut config = config(RenderWhitespace::None);
    config.render_control_characters = true;
    let input = RenderLineInput::new(
      "a\u{1}b",
      [(3, "mtk1")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    assert!(!input.is_basic_ascii);
    assert_eq!(
      shape(&resolve(&input)),
      owned(&[(1, "mtk1"), (2, "mtkcontrol"), (3, "mtk1")])
    );

    // Printable ASCII never needs the extraction pass.
    let plain = RenderLineInput::new(
      "a b",
      [(3, "mtk1")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    assert!(plain.is_basic_ascii);
    assert_eq!(shape(&resolve(&plain)), owned(&[(3, "mtk1")]));
  }

  #[test]
  fn whitespace_all() {
    let input = input("  a b\t", &[(6, "mtk1")], RenderWhitespace::All);
    assert_eq!(
      shape(&resolve(&input)),
      owned(&[
        (2, "mtkw"),
        (3, "mtk1"),
        (4, "mtkw"),
        (5, "mtk1"),
        (6, "mtkw"),
      ])
    );
  }

  #[test]
  fn whitespace_boundary_skips_single_inner_space() {
    let input = input("a b  c ", &[(7, "mtk1")], RenderWhitespace::Boundary);
    assert_eq!(
      shape(&resolve(&input)),
      owned(&[(3, "mtk1"), (5, "mtkw"), (6, "mtk1"), (7, "mtkw")])
    );
  }

  #[test]
  fn whitespace_boundary_suppresses_lone_space_before_wrap() {
    let input =
      input("a b ", &[(4, "mtk1")], RenderWhitespace::Boundary).continues_with_wrapped_line(true);
    assert_eq!(shape(&resolve(&input)), owned(&[(3, "mtk1"), (4, "mtk1")]));
  }

  #[test]
  fn whitespace_trailing_only() {
    let input = input("  a b  ", &[(7, "mtk1")], RenderWhitespace::Trailing);
    assert_eq!(shape(&resolve(&input)), owned(&[(5, "mtk1"), (7, "mtkw")]));

    let wrapped = input.continues_with_wrapped_line(true);
    assert_eq!(shape(&resolve(&wrapped)), owned(&[(7, "mtk1")]));
  }

  #[test]
  fn whitespace_selection() {
    let plain = input("a  b  c", &[(7, "mtk1")], RenderWhitespace::Selection);
    assert_eq!(shape(&resolve(&plain)), owned(&[(7, "mtk1")]));

    let selected = plain.with_selections(vec![LineRange::new(4, 7)]);
    assert_eq!(
      shape(&resolve(&selected)),
      owned(&[(4, "mtk1"), (6, "mtkw"), (7, "mtk1")])
    );
  }

  #[test]
  fn whitespace_splits_at_tab_stops_without_monospace() {
    let mut config = config(RenderWhitespace::All);
    config.use_monospace_optimizations = false;
    let input = RenderLineInput::new(
      "        x",
      [(9, "mtk1")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    assert_eq!(
      shape(&resolve(&input)),
      owned(&[(4, "mtkw"), (8, "mtkw"), (9, "mtk1")])
    );

    let mut config = config;
    config.use_monospace_optimizations = true;
    let input = RenderLineInput::new(
      "        x",
      [(9, "mtk1")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    assert_eq!(shape(&resolve(&input)), owned(&[(8, "mtkw"), (9, "mtk1")]));
  }

  #[test]
  fn whitespace_one_part_per_char_when_widths_differ() {
    let input = RenderLineInput::new(
      "a   ",
      [(4, "mtk1")].into_iter().collect(),
      &config(RenderWhitespace::All),
      FontMetrics::new(10.0, 8.0, 6.0),
    );
    assert_eq!(
      shape(&resolve(&input)),
      owned(&[(1, "mtk1"), (2, "mtkw"), (3, "mtkw"), (4, "mtkw")])
    );
  }

  #[test]
  fn rtl_interior_whitespace_is_not_materialized() {
    let input = input(" שלום עולם ", &[(11, "mtk1")], RenderWhitespace::All);
    let resolved = resolve(&input);
    assert_eq!(shape(&resolved), owned(&[(1, "mtkw"), (10, "mtk1"), (11, "mtkw")]));
    assert!(resolved.parts[1].contains_rtl);
  }

  #[test]
  fn decorations_split_tokens() {
    let input = input("abcdef", &[(3, "mtk1"), (6, "mtk2")], RenderWhitespace::None)
      .with_decorations(vec![LineDecoration::new(
        1,
        5,
        "hl",
        InlineDecorationKind::Regular,
      )]);
    let resolved = resolve(&input);
    assert_eq!(
      shape(&resolved),
      owned(&[(1, "mtk1"), (3, "mtk1 hl"), (5, "mtk2 hl"), (6, "mtk2")])
    );
    assert!(resolved.contains_foreign_elements.is_empty());
  }

  #[test]
  fn overlapping_decorations_merge_once() {
    let input = input("abcd", &[(4, "mtk1")], RenderWhitespace::None).with_decorations(vec![
      LineDecoration::new(1, 3, "b", InlineDecorationKind::Regular),
      LineDecoration::new(1, 3, "a", InlineDecorationKind::Regular),
    ]);
    let resolved = resolve(&input);
    assert_eq!(
      shape(&resolved),
      owned(&[(1, "mtk1"), (3, "mtk1 a b"), (4, "mtk1")])
    );
  }

  #[test]
  fn anchors_at_line_end() {
    let input = input("ab", &[(2, "mtk1")], RenderWhitespace::None).with_decorations(vec![
      LineDecoration::anchor(2, "ghost", InlineDecorationKind::After),
    ]);
    let resolved = resolve(&input);
    assert_eq!(shape(&resolved), owned(&[(2, "mtk1"), (2, "ghost")]));
    assert!(resolved.parts[1].is_pseudo_after());
    assert_eq!(resolved.contains_foreign_elements, ForeignElements::AFTER);
  }

  #[test]
  fn anchor_inside_line_is_zero_width() {
    let input = input("abcd", &[(4, "mtk1")], RenderWhitespace::None).with_decorations(vec![
      LineDecoration::anchor(2, "hint", InlineDecorationKind::Before),
    ]);
    let resolved = resolve(&input);
    assert_eq!(
      shape(&resolved),
      owned(&[(2, "mtk1"), (2, "mtk1 hint"), (4, "mtk1")])
    );
    assert!(resolved.parts[1].is_pseudo_before());
    assert_eq!(resolved.contains_foreign_elements, ForeignElements::BEFORE);
  }

  #[test]
  fn splits_long_runs_exactly() {
    let text = "x".repeat(194);
    let input = input(&text, &[(194, "mtk1")], RenderWhitespace::None);
    let ends: Vec<usize> = resolve(&input).parts.iter().map(|p| p.end_index).collect();
    assert_eq!(ends, vec![50, 100, 150, 194]);
  }

  #[test]
  fn splits_long_runs_at_spaces_with_ligatures() {
    let mut config = config(RenderWhitespace::None);
    config.font_ligatures = true;
    let word = "abcdefghi ";
    let text = word.repeat(12);
    let input = RenderLineInput::new(
      text.as_str(),
      [(120, "mtk1")].into_iter().collect(),
      &config,
      FontMetrics::default(),
    );
    let ends: Vec<usize> = resolve(&input).parts.iter().map(|p| p.end_index).collect();
    assert_eq!(ends, vec![50, 100, 120]);
  }

  #[test]
  fn rtl_lines_are_never_split() {
    let text = "ש".repeat(120);
    let input = input(&text, &[(120, "mtk1")], RenderWhitespace::None);
    assert_eq!(resolve(&input).parts.len(), 1);
  }
}
