//! Single-line view rendering.
//!
//! A [`RenderLineInput`] describes one line: its text, token runs, inline
//! decorations, selections and the rendering policies in effect.
//! [`render_view_line`] turns it into `<span>` markup plus a
//! [`CharacterMapping`] that converts between columns and rendered positions
//! in both directions.

pub mod character_mapping;
pub mod config;
pub mod input;
pub mod line_decoration;
pub mod line_part;
pub mod resolve;
pub mod view_line;

pub use character_mapping::{
  CharacterMapping,
  DomPosition,
};
pub use config::{
  ConfigError,
  FontMetrics,
  LineRenderConfig,
};
pub use input::{
  LineRange,
  RenderLineInput,
  RenderWhitespace,
  TextDirection,
  ViewLineTokens,
};
pub use line_decoration::{
  InlineDecoration,
  InlineDecorationKind,
  LineDecoration,
};
pub use line_part::{
  LinePart,
  LinePartMetadata,
  PartClass,
};
pub use resolve::{
  ResolvedRenderLineInput,
  resolve,
};
pub use view_line::{
  ForeignElements,
  RenderLineOutput,
  RenderLineOutput2,
  render_view_line,
  render_view_line_to_string,
};
