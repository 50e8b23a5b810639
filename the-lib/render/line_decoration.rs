//! Inline decorations attached to a single line and their normalization into
//! non-overlapping segments.

use std::cmp::Ordering;

use crate::{
  Tendril,
  render::line_part::{
    LinePartMetadata,
    PartClass,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineDecorationKind {
  Regular,
  /// Zero-width anchor rendered before the text at its offset.
  Before,
  /// Zero-width anchor rendered after the text at its offset.
  After,
  /// Like `Regular`, but the decoration changes letter spacing so measured
  /// positions can no longer be trusted.
  RegularAffectingLetterSpacing,
}

impl InlineDecorationKind {
  fn sort_rank(self) -> u8 {
    match self {
      Self::Before => 0,
      Self::After => 1,
      Self::Regular => 2,
      Self::RegularAffectingLetterSpacing => 3,
    }
  }

  pub fn is_anchor(self) -> bool {
    matches!(self, Self::Before | Self::After)
  }
}

/// A decoration over `[start_offset, end_offset)` of one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineDecoration {
  pub start_offset: usize,
  pub end_offset:   usize,
  pub class_name:   Tendril,
  pub kind:         InlineDecorationKind,
}

impl LineDecoration {
  pub fn new(
    start_offset: usize,
    end_offset: usize,
    class_name: impl Into<Tendril>,
    kind: InlineDecorationKind,
  ) -> Self {
    debug_assert!(start_offset <= end_offset, "decoration ends before it starts");
    Self {
      start_offset,
      end_offset: end_offset.max(start_offset),
      class_name: class_name.into(),
      kind,
    }
  }

  /// Zero-width decoration anchored at `offset`.
  pub fn anchor(offset: usize, class_name: impl Into<Tendril>, kind: InlineDecorationKind) -> Self {
    Self::new(offset, offset, class_name, kind)
  }

  pub fn metadata(&self) -> LinePartMetadata {
    match self.kind {
      InlineDecorationKind::Before => LinePartMetadata::PSEUDO_BEFORE,
      InlineDecorationKind::After => LinePartMetadata::PSEUDO_AFTER,
      _ => LinePartMetadata::empty(),
    }
  }

  /// Total order used before normalization: start, end, kind, class name.
  pub fn compare(a: &Self, b: &Self) -> Ordering {
    a.start_offset
      .cmp(&b.start_offset)
      .then(a.end_offset.cmp(&b.end_offset))
      .then(a.kind.sort_rank().cmp(&b.kind.sort_rank()))
      .then_with(|| a.class_name.as_str().cmp(b.class_name.as_str()))
  }

  /// Re-bases decorations of a full line onto the wrapped segment
  /// `[start_offset, end_offset)`.
  pub fn extract_wrapped(decorations: &[Self], start_offset: usize, end_offset: usize) -> Vec<Self> {
    let segment_len = end_offset.saturating_sub(start_offset);
    decorations
      .iter()
      .filter(|dec| dec.end_offset > start_offset && dec.start_offset < end_offset)
      .map(|dec| {
        Self {
          start_offset: dec.start_offset.saturating_sub(start_offset),
          end_offset:   (dec.end_offset - start_offset).min(segment_len),
          class_name:   dec.class_name.clone(),
          kind:         dec.kind,
        }
      })
      .collect()
  }

  /// Projects document-level decorations onto `line`.
  ///
  /// Decorations that start on an earlier line begin at `min_offset`; those
  /// that continue onto a later line end at `max_offset`. Empty regular
  /// decorations are dropped since they would render nothing.
  pub fn filter(
    decorations: &[InlineDecoration],
    line: usize,
    min_offset: usize,
    max_offset: usize,
  ) -> Vec<Self> {
    decorations
      .iter()
      .filter(|dec| dec.start.line <= line && dec.end.line >= line)
      .filter(|dec| !(dec.is_empty() && !dec.kind.is_anchor()))
      .map(|dec| {
        let start = if dec.start.line == line {
          dec.start.offset
        } else {
          min_offset
        };
        let end = if dec.end.line == line {
          dec.end.offset
        } else {
          max_offset
        };
        Self::new(start, end.max(start), dec.class_name.clone(), dec.kind)
      })
      .collect()
  }
}

impl PartialOrd for LineDecoration {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for LineDecoration {
  fn cmp(&self, other: &Self) -> Ordering {
    Self::compare(self, other)
  }
}

/// A `(line, offset)` position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationPosition {
  pub line:   usize,
  pub offset: usize,
}

impl DecorationPosition {
  pub const fn new(line: usize, offset: usize) -> Self {
    Self { line, offset }
  }
}

/// A decoration that may span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDecoration {
  pub start:      DecorationPosition,
  pub end:        DecorationPosition,
  pub class_name: Tendril,
  pub kind:       InlineDecorationKind,
}

impl InlineDecoration {
  pub fn new(
    start: DecorationPosition,
    end: DecorationPosition,
    class_name: impl Into<Tendril>,
    kind: InlineDecorationKind,
  ) -> Self {
    Self {
      start,
      end,
      class_name: class_name.into(),
      kind,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}

/// A non-overlapping span produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSegment {
  pub start_offset: usize,
  /// Exclusive. Equal to `start_offset` for anchors.
  pub end_offset:   usize,
  pub class:        PartClass,
  pub metadata:     LinePartMetadata,
}

#[derive(Debug)]
struct StackEntry<'a> {
  stop:     usize,
  class:    &'a str,
  metadata: LinePartMetadata,
}

/// Open decorations ordered by ascending stop offset.
#[derive(Debug, Default)]
struct StopStack<'a> {
  entries: Vec<StackEntry<'a>>,
}

impl<'a> StopStack<'a> {
  fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn segment(&self, start_offset: usize, end_offset: usize) -> DecorationSegment {
    let mut class = PartClass::new();
    let mut metadata = LinePartMetadata::empty();
    for entry in &self.entries {
      class.push(entry.class);
      metadata |= entry.metadata;
    }
    DecorationSegment {
      start_offset,
      end_offset,
      class,
      metadata,
    }
  }

  /// Emits segments for every entry that stops at or before `max_stop`, then
  /// a segment covering the rest of `[next_start, max_stop)` if anything is
  /// still open. Returns the new start offset.
  fn consume_until(
    &mut self,
    max_stop: usize,
    mut next_start: usize,
    result: &mut Vec<DecorationSegment>,
  ) -> usize {
    while self.entries.first().is_some_and(|entry| entry.stop <= max_stop) {
      // Entries with the same stop close together.
      let mut last = 0;
      while last + 1 < self.entries.len() && self.entries[last].stop == self.entries[last + 1].stop {
        last += 1;
      }
      let stop = self.entries[last].stop;
      result.push(self.segment(next_start, stop));
      next_start = stop;
      self.entries.drain(..=last);
    }

    if !self.is_empty() && next_start < max_stop {
      result.push(self.segment(next_start, max_stop));
      next_start = max_stop;
    }
    next_start
  }

  fn insert(&mut self, stop: usize, class: &'a str, metadata: LinePartMetadata) {
    let entry = StackEntry {
      stop,
      class,
      metadata,
    };
    match self.entries.iter().position(|existing| existing.stop >= stop) {
      Some(idx) if self.entries[self.entries.len() - 1].stop > stop => {
        self.entries.insert(idx, entry)
      },
      _ => self.entries.push(entry),
    }
  }
}

/// Splits overlapping decorations into non-overlapping segments.
///
/// `decorations` must be sorted with [`LineDecoration::compare`]. Each segment
/// carries the class names of every decoration covering it, in the order the
/// decorations close, and the union of their metadata.
pub fn normalize(decorations: &[LineDecoration]) -> Vec<DecorationSegment> {
  debug_assert!(
    decorations
      .windows(2)
      .all(|pair| LineDecoration::compare(&pair[0], &pair[1]) != Ordering::Greater),
    "decorations must be sorted before normalization"
  );

  let mut result = Vec::with_capacity(decorations.len());
  let mut stack = StopStack::default();
  let mut next_start = 0;
  for decoration in decorations {
    next_start = stack.consume_until(decoration.start_offset, next_start, &mut result);
    if stack.is_empty() {
      next_start = decoration.start_offset;
    }
    stack.insert(
      decoration.end_offset,
      decoration.class_name.as_str(),
      decoration.metadata(),
    );
  }
  stack.consume_until(usize::MAX, next_start, &mut result);
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn segment(start: usize, end: usize, class: &str, metadata: LinePartMetadata) -> DecorationSegment {
    let mut part_class = PartClass::new();
    for name in class.split(' ') {
      part_class.push(name);
    }
    DecorationSegment {
      start_offset: start,
      end_offset: end,
      class: part_class,
      metadata,
    }
  }

  fn sorted(mut decorations: Vec<LineDecoration>) -> Vec<LineDecoration> {
    decorations.sort();
    decorations
  }

  #[test]
  fn compare_orders_by_start_end_kind_and_class() {
    let decorations = sorted(vec![
      LineDecoration::new(2, 5, "b", InlineDecorationKind::Regular),
      LineDecoration::new(2, 5, "a", InlineDecorationKind::Regular),
      LineDecoration::anchor(2, "after", InlineDecorationKind::After),
      LineDecoration::anchor(2, "before", InlineDecorationKind::Before),
      LineDecoration::new(1, 9, "first", InlineDecorationKind::Regular),
      LineDecoration::new(2, 5, "spacing", InlineDecorationKind::RegularAffectingLetterSpacing),
    ]);
    let names: Vec<&str> = decorations.iter().map(|d| d.class_name.as_str()).collect();
    assert_eq!(names, vec!["first", "before", "after", "a", "b", "spacing"]);
  }

  #[test]
  fn normalize_disjoint() {
    let decorations = sorted(vec![
      LineDecoration::new(0, 2, "c1", InlineDecorationKind::Regular),
      LineDecoration::new(4, 6, "c2", InlineDecorationKind::Regular),
    ]);
    assert_eq!(normalize(&decorations), vec![
      segment(0, 2, "c1", LinePartMetadata::empty()),
      segment(4, 6, "c2", LinePartMetadata::empty()),
    ]);
  }

  #[test]
  fn normalize_overlapping() {
    let decorations = sorted(vec![
      LineDecoration::new(0, 4, "c1", InlineDecorationKind::Regular),
      LineDecoration::new(2, 6, "c2", InlineDecorationKind::Regular),
    ]);
    assert_eq!(normalize(&decorations), vec![
      segment(0, 2, "c1", LinePartMetadata::empty()),
      segment(2, 4, "c1 c2", LinePartMetadata::empty()),
      segment(4, 6, "c2", LinePartMetadata::empty()),
    ]);
  }

  #[test]
  fn normalize_identical_ranges_merge_once() {
    let decorations = sorted(vec![
      LineDecoration::new(1, 3, "c2", InlineDecorationKind::Regular),
      LineDecoration::new(1, 3, "c1", InlineDecorationKind::Regular),
    ]);
    assert_eq!(normalize(&decorations), vec![segment(
      1,
      3,
      "c1 c2",
      LinePartMetadata::empty()
    )]);
  }

  #[test]
  fn normalize_nested_closes_inner_first() {
    let decorations = sorted(vec![
      LineDecoration::new(0, 10, "outer", InlineDecorationKind::Regular),
      LineDecoration::new(3, 5, "inner", InlineDecorationKind::Regular),
    ]);
    assert_eq!(normalize(&decorations), vec![
      segment(0, 3, "outer", LinePartMetadata::empty()),
      segment(3, 5, "inner outer", LinePartMetadata::empty()),
      segment(5, 10, "outer", LinePartMetadata::empty()),
    ]);
  }

  #[test]
  fn normalize_anchor_inside_range() {
    let decorations = sorted(vec![
      LineDecoration::new(2, 6, "range", InlineDecorationKind::Regular),
      LineDecoration::anchor(4, "hint", InlineDecorationKind::Before),
    ]);
    assert_eq!(normalize(&decorations), vec![
      segment(2, 4, "range", LinePartMetadata::empty()),
      segment(4, 4, "hint range", LinePartMetadata::PSEUDO_BEFORE),
      segment(4, 6, "range", LinePartMetadata::empty()),
    ]);
  }

  #[test]
  fn normalize_lone_anchors() {
    let decorations = sorted(vec![
      LineDecoration::anchor(0, "b", InlineDecorationKind::Before),
      LineDecoration::anchor(5, "a", InlineDecorationKind::After),
    ]);
    assert_eq!(normalize(&decorations), vec![
      segment(0, 0, "b", LinePartMetadata::PSEUDO_BEFORE),
      segment(5, 5, "a", LinePartMetadata::PSEUDO_AFTER),
    ]);
  }

  #[test]
  fn extract_wrapped_rebases_and_clamps() {
    let decorations = vec![
      LineDecoration::new(0, 3, "head", InlineDecorationKind::Regular),
      LineDecoration::new(8, 14, "across", InlineDecorationKind::Regular),
      LineDecoration::new(11, 12, "inside", InlineDecorationKind::Regular),
      LineDecoration::new(20, 22, "tail", InlineDecorationKind::Regular),
    ];
    let wrapped = LineDecoration::extract_wrapped(&decorations, 10, 20);
    assert_eq!(wrapped, vec![
      LineDecoration::new(0, 4, "across", InlineDecorationKind::Regular),
      LineDecoration::new(1, 2, "inside", InlineDecorationKind::Regular),
    ]);
  }

  #[test]
  fn filter_projects_multi_line_decorations() {
    let decorations = vec![
      InlineDecoration::new(
        DecorationPosition::new(0, 4),
        DecorationPosition::new(2, 3),
        "span",
        InlineDecorationKind::Regular,
      ),
      InlineDecoration::new(
        DecorationPosition::new(1, 2),
        DecorationPosition::new(1, 2),
        "empty",
        InlineDecorationKind::Regular,
      ),
      InlineDecoration::new(
        DecorationPosition::new(1, 2),
        DecorationPosition::new(1, 2),
        "ghost",
        InlineDecorationKind::After,
      ),
      InlineDecoration::new(
        DecorationPosition::new(3, 0),
        DecorationPosition::new(3, 1),
        "later",
        InlineDecorationKind::Regular,
      ),
    ];

    let line1 = LineDecoration::filter(&decorations, 1, 0, 12);
    assert_eq!(line1, vec![
      LineDecoration::new(0, 12, "span", InlineDecorationKind::Regular),
      LineDecoration::anchor(2, "ghost", InlineDecorationKind::After),
    ]);

    let line2 = LineDecoration::filter(&decorations, 2, 0, 7);
    assert_eq!(line2, vec![LineDecoration::new(
      0,
      3,
      "span",
      InlineDecorationKind::Regular
    )]);
  }
}
