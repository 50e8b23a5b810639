use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::render::input::RenderWhitespace;

/// Rendering policies shared by every line of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LineRenderConfig {
  pub tab_size:                           u16,
  pub render_whitespace:                  RenderWhitespace,
  pub render_control_characters:          bool,
  pub font_ligatures:                     bool,
  /// Characters after this offset are replaced by a "show more" indicator.
  /// `None` renders the whole line.
  pub stop_rendering_line_after:          Option<usize>,
  pub use_monospace_optimizations:        bool,
  pub can_use_halfwidth_rightwards_arrow: bool,
  pub render_new_line_when_empty:         bool,
}

impl Default for LineRenderConfig {
  fn default() -> Self {
    Self {
      tab_size:                           4,
      render_whitespace:                  RenderWhitespace::Selection,
      render_control_characters:          false,
      font_ligatures:                     false,
      stop_rendering_line_after:          Some(10_000),
      use_monospace_optimizations:        true,
      can_use_halfwidth_rightwards_arrow: true,
      render_new_line_when_empty:         false,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid line render config: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("tab-size must be at least 1, got {0}")]
  InvalidTabSize(u16),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl LineRenderConfig {
  /// Parses and validates a `[line-render]`-style TOML table.
  pub fn from_toml(source: &str) -> Result<Self> {
    let config: Self = toml::from_str(source)?;
    config.validate()?;
    tracing::debug!(?config, "loaded line render config");
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.tab_size == 0 {
      return Err(ConfigError::InvalidTabSize(self.tab_size));
    }
    Ok(())
  }
}

/// Measured glyph widths, in pixels, of the font used to paint lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FontMetrics {
  pub space_width:    f64,
  /// Width of U+00B7 MIDDLE DOT.
  pub middot_width:   f64,
  /// Width of U+2E31 WORD SEPARATOR MIDDLE DOT.
  pub wsmiddot_width: f64,
}

impl FontMetrics {
  pub const fn new(space_width: f64, middot_width: f64, wsmiddot_width: f64) -> Self {
    Self {
      space_width,
      middot_width,
      wsmiddot_width,
    }
  }

  /// Metrics of a font where every glyph has the same width.
  pub const fn uniform(width: f64) -> Self {
    Self::new(width, width, width)
  }
}

impl Default for FontMetrics {
  fn default() -> Self {
    Self::uniform(1.0)
  }
}
