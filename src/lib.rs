//! Style resolution and text layout for rendering text as images.
//!
//! A [`Style`] is resolved from raw, CSS-like [`Settings`] (including the
//! `background` and `padding` shorthands) and an optional parent style.
//! Text is then laid out against the resolved style with [`lay_out`], which
//! wraps words greedily and hyphenates words that cannot fit on a line.
//!
//! Font measurement and font lookup are abstracted behind the
//! [`FontMetrics`] and [`FontRegistry`] traits. Rasterization is left to the
//! caller; [`Frame`] computes the canvas geometry a renderer needs.

pub mod batch;
pub mod color;
pub mod config;
mod css;
pub mod font;
mod frame;
pub mod style;
pub mod text;

pub use config::Config;
pub use font::{
    BoundingBox, CachedMetrics, FontDatabase, FontDirectory, FontMetrics, FontRegistry,
    FontdueMetrics, MalformedFont, MetricsError,
};
pub use frame::{Frame, PlacedLine};
pub use style::{
    background::{Background, Fill, Repeat},
    settings::{Settings, Toggle},
    ImageType, Padding, Style, TextAlign, TextTransform, VerticalAlign,
};
pub use text::{
    layout::{lay_out, LayoutError, Line},
    Text,
};
