use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod render;

pub type Tendril = SmartString<LazyCompact>;
