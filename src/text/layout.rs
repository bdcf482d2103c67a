use std::path::Path;

use serde::Serialize;

use crate::{font::MetricsError, FontMetrics, Style, Text, TextTransform};

/// One laid out line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    text: String,
    width: f32,
}

impl Line {
    pub fn new(text: impl Into<String>, width: f32) -> Self {
        Self {
            text: text.into(),
            width,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Width in pixels, including letter spacing.
    pub fn width(&self) -> f32 {
        self.width
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("style has no font family")]
    NoFontFamily,
    #[error("no font file is registered for family '{0}'")]
    MissingFont(String),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Lays out text into lines that fit the style's available width.
///
/// Words are packed greedily. A word too wide for a line of its own is
/// hyphenated; its fragments are the only lines that may exceed the
/// available width.
pub fn lay_out(
    text: &Text,
    style: &Style,
    metrics: &dyn FontMetrics,
) -> Result<Vec<Line>, LayoutError> {
    let family = style.font_family.as_deref().ok_or(LayoutError::NoFontFamily)?;
    let font = style
        .font_path(family)
        .ok_or_else(|| LayoutError::MissingFont(family.to_owned()))?;

    let mut layouter = Layouter::new(style, font, metrics);
    for paragraph in text.paragraphs() {
        layouter.lay_out_paragraph(paragraph)?;
    }
    Ok(layouter.lines)
}

/// Does line wrapping on the words of a paragraph.
struct Layouter<'a> {
    metrics: &'a dyn FontMetrics,
    font: &'a Path,
    font_size: f32,
    letter_spacing: f32,
    available_width: f32,
    text_transform: TextTransform,

    lines: Vec<Line>,
}

impl<'a> Layouter<'a> {
    fn new(style: &Style, font: &'a Path, metrics: &'a dyn FontMetrics) -> Self {
        Self {
            metrics,
            font,
            font_size: style.font_size,
            letter_spacing: style.letter_spacing,
            available_width: style.available_width(),
            text_transform: style.text_transform,

            lines: Vec::new(),
        }
    }

    fn measure(&self, text: &str) -> Result<f32, MetricsError> {
        let bounds = self.metrics.measure(self.font, self.font_size, text)?;
        let gaps = text.chars().count().saturating_sub(1);
        Ok(bounds.width() + self.letter_spacing * gaps as f32)
    }

    fn fits(&self, width: f32) -> bool {
        width < self.available_width
    }

    fn push_line(&mut self, text: String, width: f32) {
        log::trace!("Line '{}' ({}px)", text, width);
        self.lines.push(Line { text, width });
    }

    fn lay_out_paragraph(&mut self, paragraph: &str) -> Result<(), LayoutError> {
        let mut line = String::new();
        let mut line_width = 0.;

        for word in crate::text::words(paragraph, self.text_transform) {
            let candidate = if line.is_empty() {
                word.clone()
            } else {
                format!("{} {}", line, word)
            };
            let width = self.measure(&candidate)?;
            if self.fits(width) {
                line = candidate;
                line_width = width;
                continue;
            }

            if !line.is_empty() {
                self.push_line(std::mem::take(&mut line), line_width);
                let width = self.measure(&word)?;
                if self.fits(width) {
                    line = word;
                    line_width = width;
                    continue;
                }
            }

            self.hyphenate(&word)?;
        }

        if !line.is_empty() {
            self.push_line(line, line_width);
        }
        Ok(())
    }

    /// Breaks a word that can't fit on a line into hyphenated fragments.
    fn hyphenate(&mut self, word: &str) -> Result<(), LayoutError> {
        let chars: Vec<char> = word.chars().collect();
        let mut fragments: Vec<String> = Vec::new();
        let mut fragment = String::new();

        for (i, &c) in chars.iter().enumerate() {
            let last = i + 1 == chars.len();
            let candidate = format!("{}{}-", fragment, c);
            if self.fits(self.measure(&candidate)?) {
                fragment.push(c);
                if last {
                    fragments.push(std::mem::take(&mut fragment));
                }
                continue;
            }

            if last && fragments.is_empty() && !fragment.is_empty() {
                // Always break a hyphenated word at least once.
                fragment.push('-');
                fragments.push(std::mem::take(&mut fragment));
                fragments.push(c.to_string());
                continue;
            }

            fragment.push(c);
            if !last && c != '-' {
                fragment.push('-');
            }
            fragments.push(std::mem::take(&mut fragment));
        }

        let mut previous_hyphenated = false;
        for fragment in fragments {
            let text = if previous_hyphenated {
                fragment.strip_prefix('-').unwrap_or(&fragment)
            } else {
                fragment.as_str()
            };
            previous_hyphenated = fragment.ends_with('-');
            if text.is_empty() {
                continue;
            }
            let width = self.measure(text)?;
            self.push_line(text.to_owned(), width);
        }
        Ok(())
    }
}
