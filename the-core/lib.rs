//! Character-level primitives shared by the line renderer.

pub mod chars;
pub mod grapheme;
pub mod line_ending;
