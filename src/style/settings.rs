//! Raw, unresolved style properties as supplied by callers.

use std::path::PathBuf;

use serde::{de::Error as _, Deserialize, Deserializer};

use super::{background::Repeat, ImageType, TextAlign, TextTransform, VerticalAlign};

/// A property that may be explicitly turned off with `false` (or `null`).
///
/// Absence of the property is represented by the surrounding `Option`, so
/// `None`, `Some(Toggle::Off)` and `Some(Toggle::On(_))` are all distinct.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Toggle<T> {
    Off,
    On(T),
}

impl<T> Toggle<T> {
    pub fn on(&self) -> Option<&T> {
        match self {
            Toggle::Off => None,
            Toggle::On(value) => Some(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Toggle::Off => None,
            Toggle::On(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Toggle<U> {
        match self {
            Toggle::Off => Toggle::Off,
            Toggle::On(value) => Toggle::On(f(value)),
        }
    }
}

impl<T> From<T> for Toggle<T> {
    fn from(value: T) -> Self {
        Toggle::On(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToggleRepr<T> {
    Flag(bool),
    Value(Option<T>),
}

impl<'de, T> Deserialize<'de> for Toggle<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match ToggleRepr::<T>::deserialize(deserializer)? {
            ToggleRepr::Flag(false) | ToggleRepr::Value(None) => Ok(Toggle::Off),
            ToggleRepr::Flag(true) => Err(D::Error::custom(
                "`true` is not a property value; use `false` to turn a property off",
            )),
            ToggleRepr::Value(Some(value)) => Ok(Toggle::On(value)),
        }
    }
}

/// Style properties before shorthand expansion, inheritance and defaults.
///
/// Deserializes from a JSON object with kebab-case keys. Unknown keys are
/// ignored, and so are values of the wrong shape. Numeric properties accept
/// numbers as well as numeric strings with an optional `px` suffix.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    #[serde(rename = "type", deserialize_with = "de::lenient")]
    pub image_type: Option<ImageType>,
    #[serde(deserialize_with = "de::text")]
    pub extension: Option<String>,
    #[serde(deserialize_with = "de::number")]
    pub quality: Option<f32>,

    #[serde(deserialize_with = "de::toggle_text")]
    pub color: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::lenient")]
    pub font_family: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::number")]
    pub font_size: Option<f32>,
    #[serde(deserialize_with = "de::lenient")]
    pub font_path: Option<Toggle<PathBuf>>,
    #[serde(deserialize_with = "de::number")]
    pub max_width: Option<f32>,
    #[serde(deserialize_with = "de::number")]
    pub line_height: Option<f32>,

    /// CSS-style `padding` shorthand with one to four values.
    #[serde(deserialize_with = "de::text")]
    pub padding: Option<String>,
    #[serde(deserialize_with = "de::number")]
    pub padding_top: Option<f32>,
    #[serde(deserialize_with = "de::number")]
    pub padding_right: Option<f32>,
    #[serde(deserialize_with = "de::number")]
    pub padding_bottom: Option<f32>,
    #[serde(deserialize_with = "de::number")]
    pub padding_left: Option<f32>,

    #[serde(deserialize_with = "de::lenient")]
    pub text_align: Option<TextAlign>,
    #[serde(deserialize_with = "de::lenient")]
    pub vertical_align: Option<VerticalAlign>,
    #[serde(deserialize_with = "de::number")]
    pub letter_spacing: Option<f32>,
    #[serde(deserialize_with = "de::lenient")]
    pub text_transform: Option<Toggle<TextTransform>>,
    #[serde(deserialize_with = "de::toggle_number")]
    pub width: Option<Toggle<f32>>,
    #[serde(deserialize_with = "de::toggle_number")]
    pub height: Option<Toggle<f32>>,

    /// CSS-style `background` shorthand.
    #[serde(deserialize_with = "de::toggle_text")]
    pub background: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::toggle_text")]
    pub background_color: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::toggle_text")]
    pub background_image: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::lenient")]
    pub background_repeat: Option<Toggle<Repeat>>,
    #[serde(deserialize_with = "de::toggle_text")]
    pub background_position: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::toggle_text")]
    pub background_position_x: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::toggle_text")]
    pub background_position_y: Option<Toggle<String>>,
    #[serde(deserialize_with = "de::number")]
    pub background_opacity: Option<f32>,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Lenient deserializers for the loosely typed JSON styles come in.
///
/// A value of the wrong shape is logged and treated as absent, so one bad
/// property never rejects a whole style.
mod de {
    use serde::de::DeserializeOwned;

    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Number(f64),
        Text(String),
    }

    impl Scalar {
        /// Reads a JSON number or a numeric string like `"12px"`.
        fn into_number(self) -> Option<f32> {
            match self {
                Scalar::Number(n) => Some(n as f32),
                Scalar::Text(s) => {
                    let trimmed = s.trim();
                    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
                    match trimmed.trim().parse() {
                        Ok(n) => Some(n),
                        Err(_) => {
                            log::debug!("Ignoring invalid number '{}'", s);
                            None
                        }
                    }
                }
            }
        }

        fn into_text(self) -> String {
            match self {
                Scalar::Number(n) => n.to_string(),
                Scalar::Text(s) => s,
            }
        }
    }

    /// Deserializes a present value, including `null`, as `Some`.
    pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match T::deserialize(&value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                log::debug!("Ignoring malformed property value {}: {}", value, e);
                Ok(None)
            }
        }
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::<_, Scalar>(deserializer)?.and_then(Scalar::into_number))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::<_, Scalar>(deserializer)?.map(Scalar::into_text))
    }

    pub fn toggle_number<'de, D>(deserializer: D) -> Result<Option<Toggle<f32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let toggle = lenient::<_, Toggle<Scalar>>(deserializer)?;
        Ok(toggle.and_then(|toggle| match toggle {
            Toggle::Off => Some(Toggle::Off),
            Toggle::On(scalar) => scalar.into_number().map(Toggle::On),
        }))
    }

    pub fn toggle_text<'de, D>(deserializer: D) -> Result<Option<Toggle<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let toggle = lenient::<_, Toggle<Scalar>>(deserializer)?;
        Ok(toggle.map(|toggle| toggle.map(Scalar::into_text)))
    }
}
