//! Bidirectional index between logical columns of a line and positions inside
//! its rendered parts.

use std::cmp::Ordering;

/// A position inside the rendered markup: the part and the rendered character
/// offset inside that part.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomPosition {
  pub part_index: u16,
  pub char_index: u16,
}

impl DomPosition {
  pub const fn new(part_index: u16, char_index: u16) -> Self {
    Self {
      part_index,
      char_index,
    }
  }

  fn saturating(part_index: usize, char_index: usize) -> Self {
    Self::new(
      u16::try_from(part_index).unwrap_or(u16::MAX),
      u16::try_from(char_index).unwrap_or(u16::MAX),
    )
  }

  /// Ordering key: the part index dominates, the char index breaks ties.
  pub const fn packed(self) -> u32 {
    ((self.part_index as u32) << 16) | self.char_index as u32
  }
}

impl PartialOrd for DomPosition {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for DomPosition {
  fn cmp(&self, other: &Self) -> Ordering {
    self.packed().cmp(&other.packed())
  }
}

/// Written once while a line renders, then queried by callers.
///
/// Holds one slot per column `1..=len`, where `len` is the rendered line
/// length plus one (the position after the last character).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMapping {
  positions:          Vec<DomPosition>,
  horizontal_offsets: Vec<u32>,
}

impl CharacterMapping {
  pub fn new(length: usize) -> Self {
    Self {
      positions:          vec![DomPosition::default(); length],
      horizontal_offsets: vec![0; length],
    }
  }

  pub fn len(&self) -> usize {
    self.positions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  /// Records where `column` landed. Columns outside the mapping are ignored.
  pub fn set_column_info(
    &mut self,
    column: usize,
    part_index: usize,
    char_index: usize,
    horizontal_offset: usize,
  ) {
    let Some(slot) = column.checked_sub(1).filter(|&idx| idx < self.len()) else {
      return;
    };
    self.positions[slot] = DomPosition::saturating(part_index, char_index);
    self.horizontal_offsets[slot] = u32::try_from(horizontal_offset).unwrap_or(u32::MAX);
  }

  fn slot(&self, column: usize) -> usize {
    column.saturating_sub(1).min(self.len().saturating_sub(1))
  }

  pub fn get_dom_position(&self, column: usize) -> DomPosition {
    if self.is_empty() {
      return DomPosition::default();
    }
    self.positions[self.slot(column)]
  }

  pub fn get_horizontal_offset(&self, column: usize) -> usize {
    if self.is_empty() {
      return 0;
    }
    self.horizontal_offsets[self.slot(column)] as usize
  }

  /// Maps a rendered position back to a 1-based column.
  ///
  /// Positions that fall between two recorded slots (inside an expanded tab or
  /// a control-character escape) resolve to the closer slot. `part_length` is
  /// the rendered length of `position`'s part and bounds the distance when the
  /// upper slot already lies in the next part.
  pub fn get_column(&self, position: DomPosition, part_length: usize) -> usize {
    self.char_offset(position, part_length) + 1
  }

  fn char_offset(&self, position: DomPosition, part_length: usize) -> usize {
    if self.is_empty() {
      return 0;
    }

    let search_key = position.packed();
    let mut min = 0;
    let mut max = self.len() - 1;
    while min + 1 < max {
      let mid = (min + max) / 2;
      match self.positions[mid].packed().cmp(&search_key) {
        Ordering::Equal => return mid,
        Ordering::Greater => max = mid,
        Ordering::Less => min = mid,
      }
    }

    if min == max {
      return min;
    }

    let min_position = self.positions[min];
    let max_position = self.positions[max];
    if min_position.packed() == search_key {
      return min;
    }
    if max_position.packed() == search_key {
      return max;
    }

    // Distances are signed: a query inside a zero-width part owns no slot and
    // can sit below the lower slot's char index.
    let char_index = position.char_index as isize;
    let min_char = min_position.char_index as isize;
    let max_char = if min_position.part_index != max_position.part_index {
      isize::try_from(part_length).unwrap_or(isize::MAX)
    } else {
      max_position.char_index as isize
    };

    if char_index - min_char <= max_char - char_index {
      min
    } else {
      max
    }
  }

  /// Every slot as `(part_index, char_index, horizontal_offset)`.
  pub fn inflate(&self) -> Vec<(u16, u16, u32)> {
    self
      .positions
      .iter()
      .zip(&self.horizontal_offsets)
      .map(|(position, &offset)| (position.part_index, position.char_index, offset))
      .collect()
  }
}
