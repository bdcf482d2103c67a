//! Font lookup and measurement.
//!
//! Styles name fonts by family. A [`FontRegistry`] maps a family to a font
//! file, and a [`FontMetrics`] implementation measures text set in that file.

use std::path::{Path, PathBuf};

use crate::Config;

mod metrics;

pub use metrics::{BoundingBox, CachedMetrics, FontMetrics, FontdueMetrics, MetricsError};

#[derive(Debug, thiserror::Error)]
#[error("failed to parse {} as TTF/OTF font data", .0.display())]
pub struct MalformedFont(pub PathBuf);

/// Resolves a font family name to the file containing it.
pub trait FontRegistry {
    fn resolve(&self, family: &str) -> Option<PathBuf>;
}

impl<'a, R> FontRegistry for &'a R
where
    R: FontRegistry + ?Sized,
{
    fn resolve(&self, family: &str) -> Option<PathBuf> {
        (**self).resolve(family)
    }
}

/// Fonts stored as `<dir>/<family>.<extension>`.
///
/// Paths are computed without touching the file system; a missing file
/// surfaces when the font is loaded for measuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDirectory {
    dir: PathBuf,
    extension: String,
}

impl FontDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "otf".to_owned(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.fonts_dir).extension(&config.font_extension)
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for FontDirectory {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl FontRegistry for FontDirectory {
    fn resolve(&self, family: &str) -> Option<PathBuf> {
        Some(self.dir.join(format!("{}.{}", family, self.extension)))
    }
}

/// Fonts discovered through a `fontdb` database, e.g. the system fonts.
///
/// Only faces loaded from files can be resolved.
pub struct FontDatabase {
    db: fontdb::Database,
}

impl FontDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self {
            db: fontdb::Database::new(),
        }
    }

    /// Creates a database containing the fonts installed on the system.
    pub fn system() -> Self {
        let mut fonts = Self::new();
        fonts.db.load_system_fonts();
        log::info!("Loaded {} system font faces", fonts.db.faces().len());
        fonts
    }

    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.db.load_fonts_dir(dir);
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry for FontDatabase {
    fn resolve(&self, family: &str) -> Option<PathBuf> {
        let families = [fontdb::Family::Name(family)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self.db.query(&query)?;
        let (source, _face_index) = self.db.face_source(id)?;
        match &*source {
            fontdb::Source::File(path) => Some(path.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_convention() {
        let fonts = FontDirectory::new("/srv/fonts");
        assert_eq!(
            fonts.resolve("ChunkFive"),
            Some(PathBuf::from("/srv/fonts/ChunkFive.otf"))
        );
    }

    #[test]
    fn directory_from_config() {
        let config = Config::default().fonts_dir("fonts").font_extension("ttf");
        let fonts = FontDirectory::from_config(&config);
        assert_eq!(fonts.dir(), Path::new("fonts"));
        assert_eq!(
            fonts.resolve("Lobster"),
            Some(PathBuf::from("fonts/Lobster.ttf"))
        );
    }

    #[test]
    fn empty_database_resolves_nothing() {
        let fonts = FontDatabase::new();
        assert_eq!(fonts.resolve("ChunkFive"), None);
    }
}
