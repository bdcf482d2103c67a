use std::path::{Path, PathBuf};

use ahash::AHashMap;
use lru::LruCache;
use parking_lot::Mutex;

use crate::{Config, Style};

use super::MalformedFont;

/// Extents of a piece of text, in pixels, relative to the pen origin on the
/// baseline. `y` grows downward.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("font {} has not been loaded", .0.display())]
    NotLoaded(PathBuf),
    #[error("failed to read font {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Malformed(#[from] MalformedFont),
}

/// Measures text set in a font file at a size given in points.
pub trait FontMetrics {
    fn measure(&self, font: &Path, size: f32, text: &str) -> Result<BoundingBox, MetricsError>;
}

impl<'a, M> FontMetrics for &'a M
where
    M: FontMetrics + ?Sized,
{
    fn measure(&self, font: &Path, size: f32, text: &str) -> Result<BoundingBox, MetricsError> {
        (**self).measure(font, size, text)
    }
}

/// Converts a font size in points to pixels at 96 DPI.
pub(crate) fn points_to_pixels(points: f32) -> f32 {
    points * 16. / 12.
}

/// Measures text with fonts parsed by `fontdue`.
///
/// Fonts must be loaded before text set in them can be measured.
#[derive(Default)]
pub struct FontdueMetrics {
    fonts: AHashMap<PathBuf, fontdue::Font>,
}

impl FontdueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a font from its raw TTF/OTF data, keyed by `path`.
    pub fn add_font(
        &mut self,
        path: impl Into<PathBuf>,
        data: Vec<u8>,
    ) -> Result<(), MalformedFont> {
        let path = path.into();
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|_| MalformedFont(path.clone()))?;
        log::info!("Loaded font '{}'", path.display());
        self.fonts.insert(path, font);
        Ok(())
    }

    /// Reads and adds the font at `path`, unless it is already loaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), MetricsError> {
        let path = path.as_ref();
        if self.is_loaded(path) {
            return Ok(());
        }
        let data = std::fs::read(path).map_err(|source| MetricsError::Io {
            path: path.to_owned(),
            source,
        })?;
        self.add_font(path, data)?;
        Ok(())
    }

    /// Loads every font registered on a style.
    pub fn load_style_fonts(&mut self, style: &Style) -> Result<(), MetricsError> {
        for (_, path) in style.fonts() {
            self.load(path)?;
        }
        Ok(())
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.fonts.contains_key(path)
    }
}

impl FontMetrics for FontdueMetrics {
    fn measure(&self, font: &Path, size: f32, text: &str) -> Result<BoundingBox, MetricsError> {
        let face = self
            .fonts
            .get(font)
            .ok_or_else(|| MetricsError::NotLoaded(font.to_owned()))?;
        let px = points_to_pixels(size);

        let mut pen = 0.;
        let mut bounds: Option<BoundingBox> = None;
        for c in text.chars() {
            let metrics = face.metrics(c, px);
            if metrics.width > 0 && metrics.height > 0 {
                let left = pen + metrics.xmin as f32;
                let bottom = -(metrics.ymin as f32);
                let glyph = BoundingBox {
                    min_x: left,
                    min_y: bottom - metrics.height as f32,
                    max_x: left + metrics.width as f32,
                    max_y: bottom,
                };
                bounds = Some(match bounds {
                    Some(bounds) => bounds.union(&glyph),
                    None => glyph,
                });
            }
            pen += metrics.advance_width;
        }

        // Blank text has no ink; fall back to its advance.
        Ok(bounds.unwrap_or(BoundingBox {
            min_x: 0.,
            min_y: 0.,
            max_x: pen,
            max_y: 0.,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    font: PathBuf,
    size: u32,
    text: String,
}

/// Caches the measurements of another [`FontMetrics`] implementation.
///
/// Layout measures the same candidate strings repeatedly, so repeated
/// requests are answered from an LRU cache.
pub struct CachedMetrics<M> {
    inner: M,
    cache: Mutex<LruCache<MeasureKey, BoundingBox>>,
}

impl<M> CachedMetrics<M>
where
    M: FontMetrics,
{
    pub fn new(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn from_config(inner: M, config: &Config) -> Self {
        Self::new(inner, config.metrics_cache_capacity)
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M> FontMetrics for CachedMetrics<M>
where
    M: FontMetrics,
{
    fn measure(&self, font: &Path, size: f32, text: &str) -> Result<BoundingBox, MetricsError> {
        let key = MeasureKey {
            font: font.to_owned(),
            size: size.to_bits(),
            text: text.to_owned(),
        };
        let cached = self.cache.lock().get(&key).copied();
        if let Some(bounds) = cached {
            return Ok(bounds);
        }

        let bounds = self.inner.measure(font, size, text)?;
        self.cache.lock().put(key, bounds);
        Ok(bounds)
    }
}
