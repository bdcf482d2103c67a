//! Library configuration and the default style values.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "000";
pub const DEFAULT_FONT_FAMILY: &str = "ChunkFive";
pub const DEFAULT_FONT_SIZE: f32 = 20.;
pub const DEFAULT_MAX_WIDTH: f32 = 900.;
/// Set accordingly based on font family.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.;
pub const DEFAULT_PADDING_TOP: f32 = 10.;
pub const DEFAULT_PADDING_RIGHT: f32 = 10.;
pub const DEFAULT_PADDING_BOTTOM: f32 = 10.;
pub const DEFAULT_PADDING_LEFT: f32 = 0.;
/// 0 to 100. Only applies to png images.
pub const DEFAULT_BACKGROUND_OPACITY: f32 = 100.;
/// Works like `em`, not `px`.
pub const DEFAULT_LETTER_SPACING: f32 = 0.;
/// 0 to 100. Only applies to jpg and png images.
pub const DEFAULT_QUALITY: f32 = 100.;

/// Library settings that aren't part of a style.
///
/// All fields have defaults, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory searched for `<family>.<font_extension>` files.
    pub fonts_dir: PathBuf,
    pub font_extension: String,
    /// Number of measurements kept by [`CachedMetrics`](crate::CachedMetrics).
    pub metrics_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("assets/fonts"),
            font_extension: "otf".to_owned(),
            metrics_cache_capacity: 1024,
        }
    }
}

impl Config {
    /// Sets the directory fonts are looked up in.
    ///
    /// The default is `assets/fonts`.
    pub fn fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Sets the file extension of fonts in the font directory.
    ///
    /// The default is `otf`.
    pub fn font_extension(mut self, extension: impl Into<String>) -> Self {
        self.font_extension = extension.into();
        self
    }

    /// Sets the capacity of the font metrics cache.
    ///
    /// The default is 1024 measurements.
    pub fn metrics_cache_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0);
        self.metrics_cache_capacity = capacity;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("malformed config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_json() {
        let config = Config::from_json(r#"{ "fonts-dir": "/usr/share/fonts/banner" }"#).unwrap();
        assert_eq!(config.fonts_dir, PathBuf::from("/usr/share/fonts/banner"));
        assert_eq!(config.font_extension, "otf");
        assert_eq!(config.metrics_cache_capacity, 1024);
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .fonts_dir("fonts")
            .font_extension("ttf")
            .metrics_cache_capacity(8);
        assert_eq!(config.fonts_dir, PathBuf::from("fonts"));
        assert_eq!(config.font_extension, "ttf");
        assert_eq!(config.metrics_cache_capacity, 8);
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "font-extension": "ttf" }}"#).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.font_extension, "ttf");
        assert_eq!(config.fonts_dir, Config::default().fonts_dir);
    }

    #[test]
    fn from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = Config::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(error.to_string().contains("failed to read config file"));
    }
}
