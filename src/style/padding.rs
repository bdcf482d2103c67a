use serde::Serialize;

use crate::config::{
    DEFAULT_PADDING_BOTTOM, DEFAULT_PADDING_LEFT, DEFAULT_PADDING_RIGHT, DEFAULT_PADDING_TOP,
};

use super::Settings;

/// Space between the canvas edges and the text, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Padding {
    #[serde(rename = "padding-top")]
    pub top: f32,
    #[serde(rename = "padding-right")]
    pub right: f32,
    #[serde(rename = "padding-bottom")]
    pub bottom: f32,
    #[serde(rename = "padding-left")]
    pub left: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: DEFAULT_PADDING_TOP,
            right: DEFAULT_PADDING_RIGHT,
            bottom: DEFAULT_PADDING_BOTTOM,
            left: DEFAULT_PADDING_LEFT,
        }
    }
}

impl Padding {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Resolves each side from the explicit side, then the `padding`
    /// shorthand, then the parent, then the default.
    pub(crate) fn resolve(settings: &Settings, parent: Option<&Padding>) -> Padding {
        let shorthand = settings.padding.as_deref().and_then(parse_shorthand);
        let defaults = parent.copied().unwrap_or_default();
        let side = |explicit: Option<f32>, index: usize, default: f32| {
            explicit
                .or_else(|| shorthand.map(|sides| sides[index]))
                .unwrap_or(default)
        };
        Padding {
            top: side(settings.padding_top, 0, defaults.top),
            right: side(settings.padding_right, 1, defaults.right),
            bottom: side(settings.padding_bottom, 2, defaults.bottom),
            left: side(settings.padding_left, 3, defaults.left),
        }
    }
}

/// Expands a CSS `padding` value into `[top, right, bottom, left]`.
///
/// Everything but digits and whitespace is discarded first, so units are
/// accepted and ignored. Returns `None` unless one to four values remain.
fn parse_shorthand(padding: &str) -> Option<[f32; 4]> {
    let digits: String = padding
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace())
        .collect();
    let values = digits
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<Vec<f32>, _>>()
        .ok()?;

    match *values.as_slice() {
        [all] => Some([all, all, all, all]),
        [vertical, horizontal] => Some([vertical, horizontal, vertical, horizontal]),
        [top, horizontal, bottom] => Some([top, horizontal, bottom, horizontal]),
        [top, right, bottom, left] => Some([top, right, bottom, left]),
        _ => {
            log::debug!("Ignoring padding shorthand '{}'", padding);
            None
        }
    }
}
