use the_lib::render::{
  FontMetrics,
  InlineDecorationKind,
  LineDecoration,
  LineRange,
  LineRenderConfig,
  RenderLineInput,
  RenderWhitespace,
  TextDirection,
  ViewLineTokens,
};

const MAX_TEXT_BYTES: usize = 1024;
const MAX_TOKENS: usize = 32;
const MAX_DECORATIONS: usize = 16;
const MAX_SELECTIONS: usize = 4;

const TOKEN_CLASSES: &[&str] = &["mtk1", "mtk2", "mtk3 mtki", ""];
const DECORATION_CLASSES: &[&str] = &["hl", "ghost", "err squiggly"];

pub struct FuzzLine {
  pub input:           RenderLineInput,
  pub has_decorations: bool,
}

pub fn line_from_bytes(data: &[u8]) -> FuzzLine {
  let mut cursor = ByteCursor::new(data);
  let flags = cursor.next_u16();
  let render_whitespace = match cursor.next_u8() % 5 {
    0 => RenderWhitespace::None,
    1 => RenderWhitespace::Boundary,
    2 => RenderWhitespace::Selection,
    3 => RenderWhitespace::Trailing,
    _ => RenderWhitespace::All,
  };
  let config = LineRenderConfig {
    tab_size: u16::from(cursor.next_u8() % 16) + 1,
    render_whitespace,
    render_control_characters: flags & 0x001 != 0,
    font_ligatures: flags & 0x002 != 0,
    stop_rendering_line_after: (flags & 0x004 != 0).then(|| cursor.next_usize(MAX_TEXT_BYTES)),
    use_monospace_optimizations: flags & 0x008 != 0,
    can_use_halfwidth_rightwards_arrow: flags & 0x010 != 0,
    render_new_line_when_empty: flags & 0x020 != 0,
  };
  let metrics = FontMetrics::new(
    f64::from(cursor.next_u8() % 16 + 1),
    f64::from(cursor.next_u8() % 16 + 1),
    f64::from(cursor.next_u8() % 16 + 1),
  );

  let text_len = cursor.next_usize(MAX_TEXT_BYTES);
  let text = String::from_utf8_lossy(cursor.next_bytes(text_len)).into_owned();
  let char_len = text.chars().count();

  let mut ends: Vec<usize> = (0..cursor.next_usize(MAX_TOKENS))
    .map(|_| cursor.next_usize(char_len))
    .filter(|&end| end > 0)
    .collect();
  ends.sort_unstable();
  ends.dedup();
  if ends.last() != Some(&char_len) {
    ends.push(char_len);
  }
  let tokens: ViewLineTokens = ends
    .into_iter()
    .map(|end| (end, TOKEN_CLASSES[cursor.next_u8() as usize % TOKEN_CLASSES.len()]))
    .collect();

  let decorations: Vec<LineDecoration> = (0..cursor.next_usize(MAX_DECORATIONS))
    .map(|_| {
      let start = cursor.next_usize(char_len);
      let kind = match cursor.next_u8() % 4 {
        0 => InlineDecorationKind::Regular,
        1 => InlineDecorationKind::Before,
        2 => InlineDecorationKind::After,
        _ => InlineDecorationKind::RegularAffectingLetterSpacing,
      };
      let end = if kind.is_anchor() {
        start
      } else {
        start + cursor.next_usize(char_len - start)
      };
      let class = DECORATION_CLASSES[cursor.next_u8() as usize % DECORATION_CLASSES.len()];
      LineDecoration::new(start, end, class, kind)
    })
    .collect();

  let selections: Vec<LineRange> = (0..cursor.next_usize(MAX_SELECTIONS))
    .map(|_| {
      let start = cursor.next_usize(char_len);
      LineRange::new(start, start + cursor.next_usize(char_len - start))
    })
    .collect();

  let has_decorations = !decorations.is_empty();
  let mut input = RenderLineInput::new(text, tokens, &config, metrics)
    .with_decorations(decorations)
    .with_selections(selections)
    .with_faux_indent(cursor.next_usize(4))
    .continues_with_wrapped_line(flags & 0x040 != 0)
    .with_start_visible_column(cursor.next_usize(64));
  if flags & 0x080 != 0 {
    input = input.with_text_direction(if flags & 0x100 != 0 {
      TextDirection::Rtl
    } else {
      TextDirection::Ltr
    });
  }

  FuzzLine {
    input,
    has_decorations,
  }
}

struct ByteCursor<'a> {
  data: &'a [u8],
  pos:  usize,
}

impl<'a> ByteCursor<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  fn next_u8(&mut self) -> u8 {
    let value = self.data.get(self.pos).copied().unwrap_or(0);
    self.pos = self.pos.saturating_add(1);
    value
  }

  fn next_u16(&mut self) -> u16 {
    let lo = self.next_u8() as u16;
    let hi = self.next_u8() as u16;
    lo | (hi << 8)
  }

  fn next_usize(&mut self, max: usize) -> usize {
    if max == 0 {
      return 0;
    }
    (self.next_u16() as usize) % (max + 1)
  }

  fn next_bytes(&mut self, len: usize) -> &'a [u8] {
    let start = self.pos.min(self.data.len());
    let end = start.saturating_add(len).min(self.data.len());
    self.pos = end;
    &self.data[start..end]
  }
}
