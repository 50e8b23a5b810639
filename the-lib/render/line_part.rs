//! Classified runs of a rendered line.

use std::fmt;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::Tendril;

/// Class of a materialized whitespace run.
pub const CLASS_WHITESPACE: &str = "mtkw";
/// Class of a whitespace run that carries an explicit pixel width.
pub const CLASS_WHITESPACE_WITH_WIDTH: &str = "mtkz";
/// Class of an extracted control character.
pub const CLASS_CONTROL: &str = "mtkcontrol";
/// Class of the trailing "show more" indicator.
pub const CLASS_OVERFLOW: &str = "mtkoverflow";

bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct LinePartMetadata: u8 {
    const IS_WHITESPACE = 0b001;
    const PSEUDO_BEFORE = 0b010;
    const PSEUDO_AFTER  = 0b100;
  }
}

/// Ordered list of class-name tokens attached to a part.
///
/// Decoration classes are appended to the token class while the line is
/// resolved; the tokens are only joined with spaces when markup is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PartClass(SmallVec<[Tendril; 2]>);

impl PartClass {
  pub fn new() -> Self {
    Self(SmallVec::new())
  }

  /// A class list holding `name`, or an empty list when `name` is empty.
  pub fn single(name: &str) -> Self {
    let mut class = Self::new();
    class.push(name);
    class
  }

  pub fn push(&mut self, name: &str) {
    if !name.is_empty() {
      self.0.push(Tendril::from(name));
    }
  }

  pub fn extend_from(&mut self, other: &PartClass) {
    self.0.extend(other.0.iter().cloned());
  }

  /// `self` followed by every token of `other`.
  pub fn joined_with(&self, other: &PartClass) -> Self {
    let mut class = self.clone();
    class.extend_from(other);
    class
  }

  /// Whether the list consists of exactly the single token `name`.
  pub fn is(&self, name: &str) -> bool {
    self.0.len() == 1 && self.0[0].as_str() == name
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(|name| name.as_str())
  }

  /// Appends the space-joined class names to `out`.
  pub fn write_to(&self, out: &mut String) {
    for (idx, name) in self.0.iter().enumerate() {
      if idx > 0 {
        out.push(' ');
      }
      out.push_str(name);
    }
  }
}

impl fmt::Display for PartClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, name) in self.0.iter().enumerate() {
      if idx > 0 {
        f.write_str(" ")?;
      }
      f.write_str(name)?;
    }
    Ok(())
  }
}

impl From<&str> for PartClass {
  fn from(name: &str) -> Self {
    Self::single(name)
  }
}

/// A run over `[previous.end_index, end_index)` of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePart {
  /// Exclusive end offset, in chars.
  pub end_index:    usize,
  pub class:        PartClass,
  pub metadata:     LinePartMetadata,
  pub contains_rtl: bool,
}

impl LinePart {
  pub fn new(
    end_index: usize,
    class: PartClass,
    metadata: LinePartMetadata,
    contains_rtl: bool,
  ) -> Self {
    Self {
      end_index,
      class,
      metadata,
      contains_rtl,
    }
  }

  pub(crate) fn whitespace(end_index: usize) -> Self {
    Self::new(
      end_index,
      PartClass::single(CLASS_WHITESPACE),
      LinePartMetadata::IS_WHITESPACE,
      false,
    )
  }

  pub fn is_whitespace(&self) -> bool {
    self.metadata.contains(LinePartMetadata::IS_WHITESPACE)
  }

  pub fn is_pseudo_before(&self) -> bool {
    self.metadata.contains(LinePartMetadata::PSEUDO_BEFORE)
  }

  pub fn is_pseudo_after(&self) -> bool {
    self.metadata.contains(LinePartMetadata::PSEUDO_AFTER)
  }
}
