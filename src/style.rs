//! Resolution of raw [`Settings`] into a complete [`Style`].
//!
//! Every property is resolved by the same priority: the explicit value, then
//! a value derived from a shorthand (`background`, `padding`, `width`), then
//! the parent style's resolved value, then the documented default.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    color::color_to_hex,
    config::{
        DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_LETTER_SPACING,
        DEFAULT_LINE_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY,
    },
    font::{FontDirectory, FontRegistry},
};

pub mod background;
mod padding;
pub mod settings;

pub use padding::Padding;

use background::Background;
use settings::{Settings, Toggle};

/// Output image format.
///
/// Serializes with the spelling it was parsed from, so `jpg` and `jpeg` stay
/// distinct. Unknown types are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageType {
    Png,
    Jpg,
    Jpeg,
    Gif,
    Other(String),
}

impl ImageType {
    /// The file extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Jpg | ImageType::Jpeg => ".jpg",
            ImageType::Gif => ".gif",
            ImageType::Png | ImageType::Other(_) => ".png",
        }
    }
}

impl Default for ImageType {
    fn default() -> Self {
        ImageType::Png
    }
}

impl From<String> for ImageType {
    fn from(image_type: String) -> Self {
        match image_type.trim().to_lowercase().as_str() {
            "png" => ImageType::Png,
            "jpg" => ImageType::Jpg,
            "jpeg" => ImageType::Jpeg,
            "gif" => ImageType::Gif,
            _ => ImageType::Other(image_type),
        }
    }
}

impl From<ImageType> for String {
    fn from(image_type: ImageType) -> Self {
        match image_type {
            ImageType::Png => "png".to_owned(),
            ImageType::Jpg => "jpg".to_owned(),
            ImageType::Jpeg => "jpeg".to_owned(),
            ImageType::Gif => "gif".to_owned(),
            ImageType::Other(other) => other,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl From<String> for TextAlign {
    fn from(align: String) -> Self {
        match align.trim().to_lowercase().as_str() {
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl From<String> for VerticalAlign {
    fn from(align: String) -> Self {
        match align.trim().to_lowercase().as_str() {
            "middle" => VerticalAlign::Middle,
            "bottom" => VerticalAlign::Bottom,
            _ => VerticalAlign::Top,
        }
    }
}

/// Case transformation applied to every word before layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    /// Upper-cases the first letter of each word.
    Capitalize,
}

impl From<String> for TextTransform {
    fn from(transform: String) -> Self {
        match transform.trim().to_lowercase().as_str() {
            "uppercase" => TextTransform::Uppercase,
            "lowercase" => TextTransform::Lowercase,
            "capitalize" => TextTransform::Capitalize,
            _ => TextTransform::None,
        }
    }
}

impl Serialize for TextTransform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TextTransform::None => serializer.serialize_bool(false),
            TextTransform::Uppercase => serializer.serialize_str("uppercase"),
            TextTransform::Lowercase => serializer.serialize_str("lowercase"),
            TextTransform::Capitalize => serializer.serialize_str("capitalize"),
        }
    }
}

/// Serializes unset properties as `false`.
pub(crate) fn or_false<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

/// A fully resolved style.
///
/// Every property has a value; properties that are unset are `None`. The
/// style serializes to the canonical settings map, in which unset properties
/// appear as `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Style {
    #[serde(rename = "type")]
    pub image_type: ImageType,
    /// File extension including the leading dot.
    pub extension: String,
    /// Encoder quality from 0 to 100, or zlib compression level from 0 to 9
    /// for png images.
    pub quality: u8,

    pub color: String,
    #[serde(serialize_with = "or_false")]
    pub font_family: Option<String>,
    /// Size in points.
    pub font_size: f32,
    #[serde(serialize_with = "or_false")]
    pub font_path: Option<PathBuf>,
    pub max_width: f32,
    /// Multiple of the font size.
    pub line_height: f32,
    #[serde(flatten)]
    pub padding: Padding,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    /// Extra space between characters, in pixels.
    pub letter_spacing: f32,
    pub text_transform: TextTransform,
    #[serde(serialize_with = "or_false")]
    pub width: Option<f32>,
    #[serde(serialize_with = "or_false")]
    pub height: Option<f32>,

    #[serde(flatten)]
    pub background: Background,

    #[serde(skip)]
    fonts: AHashMap<String, PathBuf>,
}

impl Style {
    /// Resolves `settings` against an optional parent style.
    ///
    /// Resolution never fails: malformed shorthands and colors degrade to
    /// inherited or default values.
    pub fn resolve(
        settings: &Settings,
        parent: Option<&Style>,
        registry: &dyn FontRegistry,
    ) -> Style {
        let image_type = settings
            .image_type
            .clone()
            .or_else(|| parent.map(|p| p.image_type.clone()))
            .unwrap_or_default();
        let extension = settings
            .extension
            .clone()
            .or_else(|| parent.map(|p| p.extension.clone()))
            .unwrap_or_else(|| image_type.extension().to_owned());
        let quality = match (settings.quality, parent) {
            (Some(quality), _) => encoder_quality(&image_type, quality),
            (None, Some(parent)) => parent.quality,
            (None, None) => encoder_quality(&image_type, DEFAULT_QUALITY),
        };

        let background = Background::resolve(settings, parent.map(|p| &p.background));
        let padding = Padding::resolve(settings, parent.map(|p| &p.padding));

        let width = toggled(settings.width, parent.and_then(|p| p.width)).filter(|&w| w != 0.);
        let height = toggled(settings.height, parent.and_then(|p| p.height));
        let explicit_width = settings.width.as_ref().and_then(Toggle::on).copied();
        let max_width = explicit_width
            .filter(|&w| w != 0.)
            .or(settings.max_width)
            .or_else(|| parent.map(|p| p.max_width))
            .unwrap_or(DEFAULT_MAX_WIDTH);

        let color = match settings.color.as_ref().and_then(Toggle::on) {
            Some(color) => color_to_hex(color),
            None => parent
                .map(|p| p.color.clone())
                .unwrap_or_else(|| color_to_hex(DEFAULT_COLOR)),
        };

        let font_family = match &settings.font_family {
            Some(family) => family.on().filter(|f| !f.is_empty()).cloned(),
            None => Some(
                parent
                    .and_then(|p| p.font_family.clone())
                    .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned()),
            ),
        };
        let font_path = toggled(
            settings.font_path.clone(),
            parent.and_then(|p| p.font_path.clone()),
        );

        let mut style = Style {
            image_type,
            extension,
            quality,
            color,
            font_family,
            font_size: settings
                .font_size
                .or_else(|| parent.map(|p| p.font_size))
                .unwrap_or(DEFAULT_FONT_SIZE),
            font_path,
            max_width,
            line_height: settings
                .line_height
                .or_else(|| parent.map(|p| p.line_height))
                .unwrap_or(DEFAULT_LINE_HEIGHT),
            padding,
            text_align: settings
                .text_align
                .or_else(|| parent.map(|p| p.text_align))
                .unwrap_or(TextAlign::Left),
            vertical_align: settings
                .vertical_align
                .or_else(|| parent.map(|p| p.vertical_align))
                .unwrap_or(VerticalAlign::Top),
            letter_spacing: settings
                .letter_spacing
                .or_else(|| parent.map(|p| p.letter_spacing))
                .unwrap_or(DEFAULT_LETTER_SPACING),
            text_transform: toggled(
                settings.text_transform.clone(),
                parent.map(|p| p.text_transform),
            )
            .unwrap_or(TextTransform::None),
            width,
            height,
            background,
            fonts: AHashMap::new(),
        };

        if let Some(family) = style.font_family.clone() {
            let path = style.font_path.clone().or_else(|| registry.resolve(&family));
            match path {
                Some(path) => style.add_font(family, path),
                None => log::debug!("No font file found for family '{}'", family),
            }
        }

        log::debug!("Resolved style {:?}", style);
        style
    }

    /// The path of a font registered on this style.
    pub fn font_path(&self, family: &str) -> Option<&Path> {
        self.fonts.get(family).map(PathBuf::as_path)
    }

    pub fn add_font(&mut self, family: impl Into<String>, path: impl Into<PathBuf>) {
        self.fonts.insert(family.into(), path.into());
    }

    /// Iterates over the registered `(family, path)` pairs.
    pub fn fonts(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.fonts
            .iter()
            .map(|(family, path)| (family.as_str(), path.as_path()))
    }

    /// Width available to text on a line.
    pub fn available_width(&self) -> f32 {
        self.max_width - self.padding.horizontal()
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::resolve(&Settings::default(), None, &FontDirectory::default())
    }
}

/// Maps a 0-100 quality to the value the encoder expects. Png encoders take
/// an inverted 0-9 compression level instead.
fn encoder_quality(image_type: &ImageType, quality: f32) -> u8 {
    let quality = quality.max(0.).min(100.);
    match image_type {
        ImageType::Png => (9. - (9. * quality / 100.).round()) as u8,
        _ => quality.round() as u8,
    }
}

/// An explicit toggle wins, even when off; otherwise the inherited value.
fn toggled<T>(explicit: Option<Toggle<T>>, inherited: Option<T>) -> Option<T> {
    match explicit {
        Some(toggle) => toggle.into_option(),
        None => inherited,
    }
}
