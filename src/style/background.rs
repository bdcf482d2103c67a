//! The `background` shorthand and the resolved background of a style.

use logos::Logos;
use palette::Srgba;
use serde::{Deserialize, Serialize};

use crate::{
    color::{self, color_to_hex},
    config::DEFAULT_BACKGROUND_OPACITY,
    css,
};

use super::{or_false, settings::Toggle, Settings};

/// How a background image is tiled over the canvas.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

/// The fully resolved background properties of a style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    /// Canonical hex, `transparent` or a spelling the color resolver passed
    /// through unchanged.
    #[serde(rename = "background-color")]
    pub color: String,
    #[serde(rename = "background-image", serialize_with = "or_false")]
    pub image: Option<String>,
    #[serde(rename = "background-repeat", serialize_with = "or_false")]
    pub repeat: Option<Repeat>,
    #[serde(rename = "background-position", serialize_with = "or_false")]
    pub position: Option<String>,
    /// A percentage like `50%`, or a length like `10px`.
    #[serde(rename = "background-position-x", serialize_with = "or_false")]
    pub position_x: Option<String>,
    #[serde(rename = "background-position-y", serialize_with = "or_false")]
    pub position_y: Option<String>,
    /// 0 to 100.
    #[serde(rename = "background-opacity")]
    pub opacity: f32,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: "transparent".to_owned(),
            image: None,
            repeat: None,
            position: None,
            position_x: None,
            position_y: None,
            opacity: DEFAULT_BACKGROUND_OPACITY,
        }
    }
}

/// What a renderer fills the canvas with before drawing images and text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fill {
    Transparent,
    Solid(Srgba<u8>),
}

impl Background {
    pub fn fill(&self) -> Fill {
        let color = self.color.trim();
        if color.is_empty() || color == "transparent" || color == "none" {
            return Fill::Transparent;
        }
        match color::hex_to_rgb(color) {
            Some(rgb) => {
                let alpha = (255. * self.opacity.max(0.).min(100.) / 100.).round() as u8;
                Fill::Solid(Srgba::new(rgb.red, rgb.green, rgb.blue, alpha))
            }
            None => Fill::Transparent,
        }
    }

    /// Expands the `background` shorthand and merges it with the explicit
    /// background properties and the parent's background.
    pub(crate) fn resolve(settings: &Settings, parent: Option<&Background>) -> Background {
        let mut shorthand = settings
            .background
            .as_ref()
            .and_then(Toggle::on)
            .cloned()
            .unwrap_or_default();

        // Image
        let url = css::find_function(&shorthand, "url")
            .map(|(args, range)| (css::unquote(args).to_owned(), range));
        if let Some((_, range)) = &url {
            shorthand.replace_range(range.clone(), " ");
        }
        let image = match &settings.background_image {
            None => url.map(|(image, _)| image),
            Some(Toggle::On(image)) => Some(match css::find_function(image, "url") {
                Some((args, _)) => css::unquote(args).to_owned(),
                None => image.clone(),
            }),
            Some(Toggle::Off) => None,
        }
        .filter(|image| truthy(image));
        let has_image = image.is_some() || parent.map_or(false, |p| p.image.is_some());

        // Color given as an rgb() function
        let explicit_color = settings
            .background_color
            .as_ref()
            .and_then(Toggle::on)
            .filter(|color| truthy(color));
        let mut color = explicit_color.map(|color| color_to_hex(color));
        if let Some((args, range)) = css::find_function(&shorthand, "rgb") {
            if color.is_none() {
                color = color::rgb_function_to_hex(args);
            }
            shorthand.replace_range(range, " ");
        }

        let mut tokens: Vec<Token> = shorthand.split_whitespace().map(Token::new).collect();

        let mut repeat = settings.background_repeat.clone().and_then(Toggle::into_option);
        let mut position_x = explicit_text(&settings.background_position_x);
        let mut position_y = explicit_text(&settings.background_position_y);
        let position = explicit_text(&settings.background_position);

        // Repeat and position only apply to images.
        if has_image {
            if let Some((Keyword::Repeat(found), _)) = take_all(&mut tokens, Keyword::is_repeat) {
                repeat = repeat.or(Some(found));
            }
            if image.is_some() && repeat.is_none() {
                repeat = Some(parent.and_then(|p| p.repeat).unwrap_or(Repeat::Repeat));
            }

            if let Some(position) = &position {
                let (x, y) = split_position(position);
                position_x = position_x.or(x);
                position_y = position_y.or(y);
            }

            if let Some((_, x)) = take_all(&mut tokens, |k| k == Keyword::Horizontal) {
                position_x = position_x.or_else(|| Some(x.to_owned()));
            }
            if let Some((_, y)) = take_all(&mut tokens, |k| k == Keyword::Vertical) {
                position_y = position_y.or_else(|| Some(y.to_owned()));
            }

            if image.is_some() && (position_x.is_none() || position_y.is_none()) {
                let offsets: Vec<String> = tokens
                    .iter_mut()
                    .filter(|token| {
                        !token.consumed && token.keyword.map_or(false, Keyword::is_offset)
                    })
                    .map(|token| {
                        token.consumed = true;
                        token.text.to_owned()
                    })
                    .collect();
                match offsets.as_slice() {
                    [] => {}
                    [both] => {
                        position_x = position_x.or_else(|| Some(both.clone()));
                        position_y = position_y.or_else(|| Some(both.clone()));
                    }
                    [x, y, ..] => {
                        position_x = position_x.or_else(|| Some(x.clone()));
                        position_y = position_y.or_else(|| Some(y.clone()));
                    }
                }

                match (position_x.is_some(), position_y.is_some()) {
                    (false, true) => position_x = Some("50%".to_owned()),
                    (true, false) => position_y = Some("50%".to_owned()),
                    _ => {}
                }

                let zero = || Some("0".to_owned());
                position_x = position_x
                    .or_else(|| parent.and_then(|p| p.position_x.clone()))
                    .or_else(zero);
                position_y = position_y
                    .or_else(|| parent.and_then(|p| p.position_y.clone()))
                    .or_else(zero);
            }
        }

        // What remains can only be a color.
        if color.is_none() {
            let mut candidates: Vec<&str> = tokens
                .iter()
                .filter(|token| !token.consumed)
                .map(|token| token.text.trim())
                .filter(|text| !text.is_empty())
                .collect();
            candidates.sort_unstable();
            candidates.dedup();
            if candidates.len() > 1 {
                log::debug!("Dropping background tokens {:?}", &candidates[1..]);
            }
            color = candidates.first().map(|candidate| color_to_hex(candidate));
        }
        let color = color
            .or_else(|| parent.map(|p| p.color.clone()))
            .unwrap_or_else(|| "transparent".to_owned());

        let inherited = parent.cloned().unwrap_or_default();
        Background {
            color,
            image: image.or(inherited.image),
            repeat: repeat.or(inherited.repeat),
            position: position.or(inherited.position),
            position_x: position_x
                .map(|x| position_to_percent(&x).to_owned())
                .or(inherited.position_x),
            position_y: position_y
                .map(|y| position_to_percent(&y).to_owned())
                .or(inherited.position_y),
            opacity: settings.background_opacity.unwrap_or(inherited.opacity),
        }
    }
}

/// Converts a position keyword to the equivalent percentage.
pub fn position_to_percent(position: &str) -> &str {
    match position {
        "left" | "top" => "0%",
        "right" | "bottom" => "100%",
        "center" => "50%",
        other => other,
    }
}

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
enum Keyword {
    #[token("repeat", |_| Repeat::Repeat)]
    #[token("repeat-x", |_| Repeat::RepeatX)]
    #[token("repeat-y", |_| Repeat::RepeatY)]
    #[token("no-repeat", |_| Repeat::NoRepeat)]
    Repeat(Repeat),

    #[token("left")]
    #[token("right")]
    Horizontal,

    #[token("top")]
    #[token("bottom")]
    Vertical,

    #[token("center")]
    Center,

    #[regex(r"-?[0-9]+(\.[0-9]+)?(px|%)?")]
    Offset,

    #[error]
    Error,
}

impl Keyword {
    /// Classifies a whole word; words that only start with a keyword are
    /// unclassified.
    fn classify(word: &str) -> Option<Keyword> {
        let mut lexer = Keyword::lexer(word);
        match lexer.next() {
            Some(Keyword::Error) | None => None,
            Some(keyword) if lexer.span() == (0..word.len()) => Some(keyword),
            Some(_) => None,
        }
    }

    fn is_repeat(self) -> bool {
        matches!(self, Keyword::Repeat(_))
    }

    fn is_offset(self) -> bool {
        matches!(self, Keyword::Offset | Keyword::Center)
    }
}

struct Token<'a> {
    text: &'a str,
    keyword: Option<Keyword>,
    consumed: bool,
}

impl<'a> Token<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            keyword: Keyword::classify(text),
            consumed: false,
        }
    }
}

/// Consumes every unconsumed token matching `predicate`, returning the
/// first one.
fn take_all<'a>(
    tokens: &mut [Token<'a>],
    predicate: impl Fn(Keyword) -> bool,
) -> Option<(Keyword, &'a str)> {
    let mut first = None;
    for token in tokens.iter_mut().filter(|token| !token.consumed) {
        if let Some(keyword) = token.keyword.filter(|&k| predicate(k)) {
            token.consumed = true;
            first = first.or(Some((keyword, token.text)));
        }
    }
    first
}

/// Splits a `background-position` value into its x and y parts.
///
/// `left`/`right` always land on the x axis and `top`/`bottom` on the y
/// axis; other pairs are read as x then y.
fn split_position(position: &str) -> (Option<String>, Option<String>) {
    let words: Vec<&str> = position.split_whitespace().collect();
    match *words.as_slice() {
        [both] => (Some(both.to_owned()), Some(both.to_owned())),
        [a, b] => {
            let swapped = Keyword::classify(a) == Some(Keyword::Vertical)
                || Keyword::classify(b) == Some(Keyword::Horizontal);
            let (x, y) = if swapped { (b, a) } else { (a, b) };
            (Some(x.to_owned()), Some(y.to_owned()))
        }
        _ => (None, None),
    }
}

fn explicit_text(value: &Option<Toggle<String>>) -> Option<String> {
    value.as_ref().and_then(Toggle::on).filter(|s| truthy(s)).cloned()
}

/// Whether a string value counts as set; `""` and `"0"` don't.
fn truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolve(background: serde_json::Value, parent: Option<&Background>) -> Background {
        let settings: Settings = serde_json::from_value(background).unwrap();
        Background::resolve(&settings, parent)
    }

    #[test]
    fn classify_keywords() {
        assert_eq!(Keyword::classify("repeat-x"), Some(Keyword::Repeat(Repeat::RepeatX)));
        assert_eq!(Keyword::classify("no-repeat"), Some(Keyword::Repeat(Repeat::NoRepeat)));
        assert_eq!(Keyword::classify("left"), Some(Keyword::Horizontal));
        assert_eq!(Keyword::classify("bottom"), Some(Keyword::Vertical));
        assert_eq!(Keyword::classify("center"), Some(Keyword::Center));
        assert_eq!(Keyword::classify("-10px"), Some(Keyword::Offset));
        assert_eq!(Keyword::classify("12.5%"), Some(Keyword::Offset));
        assert_eq!(Keyword::classify("7"), Some(Keyword::Offset));
        assert_eq!(Keyword::classify("leftover"), None);
        assert_eq!(Keyword::classify("10pxx"), None);
        assert_eq!(Keyword::classify("#09f"), None);
    }

    #[test]
    fn image_with_repeat_and_offsets() {
        let background = resolve(
            json!({ "background": "url(\"/img/a.jpg\") no-repeat 10px 10px" }),
            None,
        );
        assert_eq!(background.image.as_deref(), Some("/img/a.jpg"));
        assert_eq!(background.repeat, Some(Repeat::NoRepeat));
        assert_eq!(background.position_x.as_deref(), Some("10px"));
        assert_eq!(background.position_y.as_deref(), Some("10px"));
        assert_eq!(background.color, "transparent");
        assert_eq!(background.opacity, 100.);
    }

    #[test]
    fn color_only() {
        let background = resolve(json!({ "background": "#09f" }), None);
        assert_eq!(background.color, "#09f");
        assert_eq!(background.image, None);
        assert_eq!(background.repeat, None);
        assert_eq!(background.position_x, None);
        assert_eq!(background.position_y, None);
    }

    #[test]
    fn named_color_with_image() {
        let background = resolve(json!({ "background": "navy url('tile.png') repeat-y" }), None);
        assert_eq!(background.color, "000080");
        assert_eq!(background.image.as_deref(), Some("tile.png"));
        assert_eq!(background.repeat, Some(Repeat::RepeatY));
        assert_eq!(background.position_x.as_deref(), Some("0"));
        assert_eq!(background.position_y.as_deref(), Some("0"));
    }

    #[test]
    fn rgb_function() {
        let background = resolve(json!({ "background": "rgb(0, 153, 255) url(a.png)" }), None);
        assert_eq!(background.color, "0099FF");
        assert_eq!(background.image.as_deref(), Some("a.png"));
        assert_eq!(background.repeat, Some(Repeat::Repeat));

        let background = resolve(json!({ "background-color": "rgb(255,0,0)" }), None);
        assert_eq!(background.color, "FF0000");
    }

    #[test]
    fn keyword_positions() {
        let background = resolve(json!({ "background": "url(a.png) right bottom" }), None);
        assert_eq!(background.position_x.as_deref(), Some("100%"));
        assert_eq!(background.position_y.as_deref(), Some("100%"));

        let background = resolve(json!({ "background": "url(a.png) center" }), None);
        assert_eq!(background.position_x.as_deref(), Some("50%"));
        assert_eq!(background.position_y.as_deref(), Some("50%"));
    }

    #[test]
    fn single_axis_centers_the_other() {
        let background = resolve(json!({ "background": "url(a.png) top" }), None);
        assert_eq!(background.position_x.as_deref(), Some("50%"));
        assert_eq!(background.position_y.as_deref(), Some("0%"));

        let background = resolve(json!({ "background": "url(a.png) left" }), None);
        assert_eq!(background.position_x.as_deref(), Some("0%"));
        assert_eq!(background.position_y.as_deref(), Some("50%"));
    }

    #[test]
    fn explicit_position_axis_order() {
        let background = resolve(
            json!({ "background-image": "a.png", "background-position": "bottom left" }),
            None,
        );
        assert_eq!(background.position_x.as_deref(), Some("0%"));
        assert_eq!(background.position_y.as_deref(), Some("100%"));
        assert_eq!(background.position.as_deref(), Some("bottom left"));

        let background = resolve(
            json!({ "background-image": "a.png", "background-position": "5px 20px" }),
            None,
        );
        assert_eq!(background.position_x.as_deref(), Some("5px"));
        assert_eq!(background.position_y.as_deref(), Some("20px"));
    }

    #[test]
    fn explicit_image_unwraps_url() {
        let background = resolve(json!({ "background-image": "url(\"b.png\")" }), None);
        assert_eq!(background.image.as_deref(), Some("b.png"));
        assert_eq!(background.repeat, Some(Repeat::Repeat));
    }

    #[test]
    fn explicit_color_wins_over_shorthand() {
        let background = resolve(
            json!({ "background": "red", "background-color": "Blue" }),
            None,
        );
        assert_eq!(background.color, "0000FF");
    }

    #[test]
    fn candidates_are_sorted() {
        let background = resolve(json!({ "background": "white black white" }), None);
        assert_eq!(background.color, "000000");
    }

    #[test]
    fn inherits_from_parent() {
        let parent = resolve(
            json!({
                "background": "url(p.png) no-repeat 5px 6px #abc",
                "background-opacity": 50,
            }),
            None,
        );
        assert_eq!(parent.color, "#abc");

        let child = resolve(json!({}), Some(&parent));
        assert_eq!(child, parent);

        let child = resolve(json!({ "background": "url(c.png)" }), Some(&parent));
        assert_eq!(child.image.as_deref(), Some("c.png"));
        assert_eq!(child.repeat, Some(Repeat::NoRepeat));
        assert_eq!(child.position_x.as_deref(), Some("5px"));
        assert_eq!(child.position_y.as_deref(), Some("6px"));
        assert_eq!(child.color, "#abc");
        assert_eq!(child.opacity, 50.);
    }

    #[test]
    fn turned_off_properties_inherit() {
        let parent = resolve(json!({ "background": "url(p.png) repeat-x" }), None);
        let child = resolve(
            json!({ "background-image": false, "background-repeat": false }),
            Some(&parent),
        );
        assert_eq!(child.image.as_deref(), Some("p.png"));
        assert_eq!(child.repeat, Some(Repeat::RepeatX));
    }

    #[test]
    fn malformed_shorthand() {
        let background = resolve(json!({ "background": "url(unterminated rgb(1,2" }), None);
        assert_eq!(background.image, None);
        assert_eq!(background.color, "rgb(1,2");

        let background = resolve(json!({ "background": "   " }), None);
        assert_eq!(background, Background::default());
    }

    #[test]
    fn fill() {
        let mut background = Background::default();
        assert_eq!(background.fill(), Fill::Transparent);

        background.color = "FF0000".to_owned();
        assert_eq!(background.fill(), Fill::Solid(Srgba::new(255, 0, 0, 255)));

        background.opacity = 50.;
        assert_eq!(background.fill(), Fill::Solid(Srgba::new(255, 0, 0, 128)));

        background.color = "none".to_owned();
        assert_eq!(background.fill(), Fill::Transparent);
    }

    #[test]
    fn percentages() {
        assert_eq!(position_to_percent("left"), "0%");
        assert_eq!(position_to_percent("bottom"), "100%");
        assert_eq!(position_to_percent("center"), "50%");
        assert_eq!(position_to_percent("12px"), "12px");
    }
}
