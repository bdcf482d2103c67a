//! Canvas geometry for a laid out block of text.
//!
//! A [`Frame`] is everything a renderer needs to know about where things go:
//! the canvas size, the baseline origin of every line and where background
//! image tiles are drawn. Drawing itself is left to the renderer.

use glam::Vec2;

use crate::{
    lay_out, Background, Fill, FontMetrics, LayoutError, Line, Repeat, Style, Text, TextAlign,
    VerticalAlign,
};

/// A line and the left end of its baseline on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub line: Line,
    pub origin: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Canvas size in pixels.
    pub size: Vec2,
    pub lines: Vec<PlacedLine>,
    background: Background,
}

impl Frame {
    /// Positions `lines` on a canvas sized and aligned by `style`.
    pub fn new(lines: Vec<Line>, style: &Style) -> Self {
        let padding = style.padding;
        let line_advance = style.font_size * style.line_height;
        let count = lines.len() as f32;

        let width = style.width.unwrap_or_else(|| {
            let widest = lines.iter().map(Line::width).fold(0., f32::max);
            widest + padding.horizontal()
        });
        let height = style
            .height
            .unwrap_or_else(|| line_advance * count + padding.vertical());

        let spacing = (style.line_height - 1.) / 2. + 1.;
        let block_height = count * line_advance * spacing;
        let mut y = match style.vertical_align {
            VerticalAlign::Top => padding.top,
            VerticalAlign::Middle => {
                ((height - block_height + padding.top - padding.bottom) / 2.).round()
            }
            VerticalAlign::Bottom => height - block_height - padding.bottom,
        };

        let lines = lines
            .into_iter()
            .map(|line| {
                y += line_advance;
                let x = match style.text_align {
                    TextAlign::Left => padding.left,
                    TextAlign::Center => (width / 2. - line.width() / 2.).round(),
                    TextAlign::Right => width - line.width() - padding.right,
                };
                PlacedLine {
                    line,
                    origin: Vec2::new(x, y),
                }
            })
            .collect();

        Self {
            size: Vec2::new(width, height),
            lines,
            background: style.background.clone(),
        }
    }

    /// Lays out `text` and positions the resulting lines.
    pub fn lay_out(
        text: &Text,
        style: &Style,
        metrics: &dyn FontMetrics,
    ) -> Result<Self, LayoutError> {
        let lines = lay_out(text, style, metrics)?;
        let frame = Self::new(lines, style);
        log::debug!(
            "Laid out {} lines on a {}x{} canvas",
            frame.lines.len(),
            frame.size.x,
            frame.size.y
        );
        Ok(frame)
    }

    pub fn fill(&self) -> Fill {
        self.background.fill()
    }

    /// Where the top-left corner of a background image of `image_size` goes.
    ///
    /// A percentage aligns the point that far across the image with the
    /// point that far across the canvas. Other positions are pixel offsets.
    pub fn background_origin(&self, image_size: Vec2) -> Vec2 {
        Vec2::new(
            axis_offset(self.background.position_x.as_deref(), self.size.x, image_size.x),
            axis_offset(self.background.position_y.as_deref(), self.size.y, image_size.y),
        )
    }

    /// Every position a background image of `image_size` is drawn at to
    /// honor the background's repeat mode.
    pub fn background_tiles(&self, image_size: Vec2) -> Vec<Vec2> {
        let origin = self.background_origin(image_size);
        let (repeat_x, repeat_y) = match self.background.repeat {
            Some(Repeat::Repeat) => (true, true),
            Some(Repeat::RepeatX) => (true, false),
            Some(Repeat::RepeatY) => (false, true),
            Some(Repeat::NoRepeat) | None => (false, false),
        };

        let xs = if repeat_x {
            tile_starts(origin.x, image_size.x, self.size.x)
        } else {
            vec![origin.x]
        };
        let ys = if repeat_y {
            tile_starts(origin.y, image_size.y, self.size.y)
        } else {
            vec![origin.y]
        };

        ys.iter()
            .flat_map(|&y| xs.iter().map(move |&x| Vec2::new(x, y)))
            .collect()
    }
}

fn axis_offset(position: Option<&str>, canvas: f32, image: f32) -> f32 {
    let position = match position {
        Some(position) => position.trim(),
        None => return 0.,
    };
    match position.strip_suffix('%') {
        Some(percent) => {
            let fraction = leading_number(percent) / 100.;
            (fraction * canvas).round() - (fraction * image).round()
        }
        None => leading_number(position).trunc(),
    }
}

/// Reads the number at the start of `s`, e.g. `12` in `12px`. Returns 0 if
/// there is none.
fn leading_number(s: &str) -> f32 {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().unwrap_or(0.)
}

/// Tiles smaller than a pixel are drawn once.
const MIN_TILE_SIZE: f32 = 1.;
const MAX_TILES_PER_AXIS: usize = 4096;

/// Tile positions along one axis covering `0..canvas`, aligned to `origin`.
fn tile_starts(origin: f32, tile: f32, canvas: f32) -> Vec<f32> {
    if tile.is_nan() || tile < MIN_TILE_SIZE {
        return vec![origin];
    }
    let first = origin - (origin / tile).ceil() * tile;
    (0..MAX_TILES_PER_AXIS)
        .map(|i| first + i as f32 * tile)
        .take_while(|&start| start < canvas)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{FontDirectory, Settings};

    fn style(settings: serde_json::Value) -> Style {
        let settings: Settings = serde_json::from_value(settings).unwrap();
        Style::resolve(&settings, None, &FontDirectory::default())
    }

    fn lines() -> Vec<Line> {
        vec![Line::new("Hello", 50.), Line::new("brave new", 90.)]
    }

    fn origins(frame: &Frame) -> Vec<Vec2> {
        frame.lines.iter().map(|line| line.origin).collect()
    }

    #[test]
    fn size_from_lines() {
        let frame = Frame::new(lines(), &style(json!({})));
        assert_eq!(frame.size, Vec2::new(100., 60.));

        let frame = Frame::new(lines(), &style(json!({ "line-height": 2, "padding": "5" })));
        assert_eq!(frame.size, Vec2::new(100., 90.));
    }

    #[test]
    fn explicit_size() {
        let frame = Frame::new(lines(), &style(json!({ "width": 300, "height": 200 })));
        assert_eq!(frame.size, Vec2::new(300., 200.));
    }

    #[test]
    fn empty_frame() {
        let frame = Frame::new(Vec::new(), &style(json!({})));
        assert_eq!(frame.size, Vec2::new(10., 20.));
        assert!(frame.lines.is_empty());
    }

    #[test]
    fn vertical_alignment() {
        let frame = Frame::new(lines(), &style(json!({})));
        assert_eq!(origins(&frame), vec![Vec2::new(0., 30.), Vec2::new(0., 50.)]);

        let frame = Frame::new(
            lines(),
            &style(json!({ "height": 100, "vertical-align": "middle" })),
        );
        assert_eq!(origins(&frame), vec![Vec2::new(0., 50.), Vec2::new(0., 70.)]);

        let frame = Frame::new(
            lines(),
            &style(json!({ "height": 100, "vertical-align": "bottom" })),
        );
        assert_eq!(origins(&frame), vec![Vec2::new(0., 70.), Vec2::new(0., 90.)]);
    }

    #[test]
    fn line_height_spacing() {
        let frame = Frame::new(
            lines(),
            &style(json!({ "height": 200, "line-height": 1.5, "vertical-align": "bottom" })),
        );
        // block = 2 * 20 * 1.5 * 1.25
        assert_eq!(origins(&frame)[0].y, 200. - 75. - 10. + 30.);
        assert_eq!(origins(&frame)[1].y, 200. - 75. - 10. + 60.);
    }

    #[test]
    fn horizontal_alignment() {
        let frame = Frame::new(lines(), &style(json!({ "text-align": "center" })));
        let xs: Vec<f32> = origins(&frame).iter().map(|origin| origin.x).collect();
        assert_eq!(xs, vec![25., 5.]);

        let frame = Frame::new(lines(), &style(json!({ "text-align": "right" })));
        let xs: Vec<f32> = origins(&frame).iter().map(|origin| origin.x).collect();
        assert_eq!(xs, vec![40., 0.]);

        let frame = Frame::new(lines(), &style(json!({ "padding-left": 7 })));
        assert!(origins(&frame).iter().all(|origin| origin.x == 7.));
    }

    #[test]
    fn background_origin() {
        let image = Vec2::new(30., 20.);
        let frame = |background: &str| {
            Frame::new(
                lines(),
                &style(json!({ "width": 100, "height": 60, "background": background })),
            )
        };

        assert_eq!(frame("url(a.png) center").background_origin(image), Vec2::new(35., 20.));
        assert_eq!(frame("url(a.png) 10px -5px").background_origin(image), Vec2::new(10., -5.));
        assert_eq!(frame("url(a.png) right bottom").background_origin(image), Vec2::new(70., 40.));
        assert_eq!(frame("url(a.png)").background_origin(image), Vec2::ZERO);
        assert_eq!(frame("red").background_origin(image), Vec2::ZERO);
    }

    #[test]
    fn background_tiles() {
        let image = Vec2::new(30., 20.);
        let frame = |background: &str| {
            Frame::new(
                lines(),
                &style(json!({ "width": 100, "height": 60, "background": background })),
            )
        };

        let tiles = frame("url(a.png) no-repeat 35px 0").background_tiles(image);
        assert_eq!(tiles, vec![Vec2::new(35., 0.)]);

        let tiles = frame("url(a.png) repeat-x 35px 0").background_tiles(image);
        let xs: Vec<f32> = tiles.iter().map(|tile| tile.x).collect();
        assert_eq!(xs, vec![-25., 5., 35., 65., 95.]);
        assert!(tiles.iter().all(|tile| tile.y == 0.));

        let tiles = frame("url(a.png) repeat-y 35px 0").background_tiles(image);
        let ys: Vec<f32> = tiles.iter().map(|tile| tile.y).collect();
        assert_eq!(ys, vec![0., 20., 40.]);

        let tiles = frame("url(a.png) 35px 0").background_tiles(image);
        assert_eq!(tiles.len(), 15);
        assert!(tiles.contains(&Vec2::new(-25., 40.)));
    }

    #[test]
    fn fill() {
        let frame = Frame::new(lines(), &style(json!({ "background-color": "white" })));
        assert!(matches!(frame.fill(), Fill::Solid(color) if color.alpha == 255));
        let frame = Frame::new(lines(), &style(json!({})));
        assert_eq!(frame.fill(), Fill::Transparent);
    }

    #[test]
    fn degenerate_tiles() {
        assert_eq!(tile_starts(5., f32::MIN_POSITIVE / 4., 100.), vec![5.]);
        assert_eq!(tile_starts(5., 0.5, 100.), vec![5.]);
        assert_eq!(tile_starts(5., f32::NAN, 100.), vec![5.]);
        assert_eq!(tile_starts(0., 1., f32::INFINITY).len(), MAX_TILES_PER_AXIS);
        assert_eq!(tile_starts(0., 10., 30.), vec![0., 10., 20.]);
    }

    #[test]
    fn leading_numbers() {
        assert_eq!(leading_number("12px"), 12.);
        assert_eq!(leading_number("-4.5em"), -4.5);
        assert_eq!(leading_number("px"), 0.);
        assert_eq!(leading_number(""), 0.);
    }
}
