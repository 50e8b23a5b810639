//! The immutable description of one line to render.

use std::{
  fmt,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use the_core::chars::{
  contains_rtl,
  is_basic_ascii,
};
use thiserror::Error;

use crate::{
  Tendril,
  render::{
    config::{
      FontMetrics,
      LineRenderConfig,
    },
    line_decoration::LineDecoration,
  },
};

/// U+00B7 MIDDLE DOT.
pub const MIDDLE_DOT: char = '\u{00b7}';
/// U+2E31 WORD SEPARATOR MIDDLE DOT.
pub const WORD_SEPARATOR_MIDDLE_DOT: char = '\u{2e31}';

/// Which whitespace characters get a visible glyph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderWhitespace {
  None,
  /// Everything except single spaces between words.
  Boundary,
  /// Whitespace inside a selection only.
  #[default]
  Selection,
  Trailing,
  All,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown whitespace render mode `{0}`")]
pub struct ParseRenderWhitespaceError(pub String);

impl FromStr for RenderWhitespace {
  type Err = ParseRenderWhitespaceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "none" => Ok(Self::None),
      "boundary" => Ok(Self::Boundary),
      "selection" => Ok(Self::Selection),
      "trailing" => Ok(Self::Trailing),
      "all" => Ok(Self::All),
      other => Err(ParseRenderWhitespaceError(other.to_string())),
    }
  }
}

impl fmt::Display for RenderWhitespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::None => "none",
      Self::Boundary => "boundary",
      Self::Selection => "selection",
      Self::Trailing => "trailing",
      Self::All => "all",
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextDirection {
  Ltr,
  Rtl,
}

/// Half-open `[start_offset, end_offset)` range of a selection on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineRange {
  pub start_offset: usize,
  pub end_offset:   usize,
}

impl LineRange {
  pub const fn new(start_offset: usize, end_offset: usize) -> Self {
    Self {
      start_offset,
      end_offset,
    }
  }

  pub fn contains(&self, offset: usize) -> bool {
    self.start_offset <= offset && offset < self.end_offset
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewLineToken {
  /// Exclusive end offset, in chars.
  pub end_offset: usize,
  pub class_name: Tendril,
}

/// Classified runs produced by the tokenizer for one line, ordered by
/// `end_offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewLineTokens {
  tokens: Vec<ViewLineToken>,
}

impl ViewLineTokens {
  pub fn new(tokens: Vec<ViewLineToken>) -> Self {
    debug_assert!(
      tokens
        .windows(2)
        .all(|pair| pair[0].end_offset <= pair[1].end_offset)
    );
    Self { tokens }
  }

  /// A single run spanning `len` chars.
  pub fn uniform(len: usize, class_name: &str) -> Self {
    Self::new(vec![ViewLineToken {
      end_offset: len,
      class_name: Tendril::from(class_name),
    }])
  }

  pub fn count(&self) -> usize {
    self.tokens.len()
  }

  pub fn end_offset(&self, idx: usize) -> usize {
    self.tokens[idx].end_offset
  }

  pub fn class_name(&self, idx: usize) -> &str {
    &self.tokens[idx].class_name
  }

  pub fn iter(&self) -> impl Iterator<Item = &ViewLineToken> {
    self.tokens.iter()
  }
}

impl<'a> FromIterator<(usize, &'a str)> for ViewLineTokens {
  fn from_iter<I: IntoIterator<Item = (usize, &'a str)>>(iter: I) -> Self {
    Self::new(
      iter
        .into_iter()
        .map(|(end_offset, class_name)| {
          ViewLineToken {
            end_offset,
            class_name: Tendril::from(class_name),
          }
        })
        .collect(),
    )
  }
}

/// Everything needed to render one line.
///
/// Two inputs comparing equal render to identical markup, so callers can skip
/// re-rendering unchanged lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLineInput {
  pub use_monospace_optimizations:        bool,
  pub can_use_halfwidth_rightwards_arrow: bool,
  pub line_content:                       String,
  pub continues_with_wrapped_line:        bool,
  pub is_basic_ascii:                     bool,
  pub contains_rtl:                       bool,
  pub faux_indent_length:                 usize,
  pub line_tokens:                        ViewLineTokens,
  /// Sorted by [`LineDecoration::compare`]; set through `with_decorations`.
  line_decorations:                       Vec<LineDecoration>,
  pub tab_size:                           usize,
  pub start_visible_column:               usize,
  pub space_width:                        f64,
  pub render_space_width:                 f64,
  pub render_space_char:                  char,
  pub stop_rendering_line_after:          Option<usize>,
  pub render_whitespace:                  RenderWhitespace,
  pub render_control_characters:          bool,
  pub font_ligatures:                     bool,
  /// Sorted by start offset. `None` when nothing on the line is selected.
  selections_on_line:                     Option<Vec<LineRange>>,
  pub text_direction:                     Option<TextDirection>,
  pub render_new_line_when_empty:         bool,
}

impl RenderLineInput {
  pub fn new(
    line_content: impl Into<String>,
    line_tokens: ViewLineTokens,
    config: &LineRenderConfig,
    metrics: FontMetrics,
  ) -> Self {
    let line_content = line_content.into();
    let is_basic_ascii = is_basic_ascii(&line_content);
    let contains_rtl = !is_basic_ascii && contains_rtl(&line_content);

    let (render_space_char, render_space_width) = pick_render_space(metrics);

    Self {
      use_monospace_optimizations: config.use_monospace_optimizations,
      can_use_halfwidth_rightwards_arrow: config.can_use_halfwidth_rightwards_arrow,
      line_content,
      continues_with_wrapped_line: false,
      is_basic_ascii,
      contains_rtl,
      faux_indent_length: 0,
      line_tokens,
      line_decorations: Vec::new(),
      tab_size: usize::from(config.tab_size.max(1)),
      start_visible_column: 0,
      space_width: metrics.space_width,
      render_space_width,
      render_space_char,
      stop_rendering_line_after: config.stop_rendering_line_after,
      render_whitespace: config.render_whitespace,
      render_control_characters: config.render_control_characters,
      font_ligatures: config.font_ligatures,
      selections_on_line: None,
      text_direction: None,
      render_new_line_when_empty: config.render_new_line_when_empty,
    }
  }

  pub fn with_decorations(mut self, mut decorations: Vec<LineDecoration>) -> Self {
    decorations.sort_by(LineDecoration::compare);
    self.line_decorations = decorations;
    self
  }

  /// An empty list is treated as "no selection".
  pub fn with_selections(mut self, mut selections: Vec<LineRange>) -> Self {
    if selections.is_empty() {
      self.selections_on_line = None;
    } else {
      selections.sort();
      self.selections_on_line = Some(selections);
    }
    self
  }

  pub fn with_faux_indent(mut self, faux_indent_length: usize) -> Self {
    self.faux_indent_length = faux_indent_length;
    self
  }

  pub fn continues_with_wrapped_line(mut self, continues: bool) -> Self {
    self.continues_with_wrapped_line = continues;
    self
  }

  pub fn with_start_visible_column(mut self, column: usize) -> Self {
    self.start_visible_column = column;
    self
  }

  pub fn with_text_direction(mut self, direction: TextDirection) -> Self {
    self.text_direction = Some(direction);
    self
  }

  /// Overrides the ASCII and RTL hints derived from the line content.
  pub fn with_hints(mut self, is_basic_ascii: bool, contains_rtl: bool) -> Self {
    self.is_basic_ascii = is_basic_ascii;
    self.contains_rtl = contains_rtl;
    self
  }

  pub fn line_decorations(&self) -> &[LineDecoration] {
    &self.line_decorations
  }

  pub fn selections_on_line(&self) -> Option<&[LineRange]> {
    self.selections_on_line.as_deref()
  }

  pub fn has_selections(&self) -> bool {
    self
      .selections_on_line
      .as_ref()
      .is_some_and(|selections| !selections.is_empty())
  }
}

/// Picks whichever middle dot is visually closer in width to a space.
fn pick_render_space(metrics: FontMetrics) -> (char, f64) {
  let wsmiddot_diff = (metrics.wsmiddot_width - metrics.space_width).abs();
  let middot_diff = (metrics.middot_width - metrics.space_width).abs();
  if wsmiddot_diff < middot_diff {
    (WORD_SEPARATOR_MIDDLE_DOT, metrics.wsmiddot_width)
  } else {
    (MIDDLE_DOT, metrics.middot_width)
  }
}
