use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode as assets_decode,
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
};

const BUNDLED_BACKGROUND: &[u8] = include_bytes!("../../assets/background.png");
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const BACKGROUND_STEMS: &[&str] = &["background.png", "background.jpg", "background.jpeg"];

/// Shared, read-only font resource.
///
/// Cloning is cheap: the underlying font bytes are reference counted.
#[derive(Clone)]
pub struct FontHandle {
    blob: parley::fontique::Blob<u8>,
    glyph_font: vello_cpu::peniko::FontData,
    family: Arc<str>,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("font_bytes_len", &self.blob.data().len())
            .finish()
    }
}

impl FontHandle {
    /// Parse font bytes, failing unless at least one named face registers.
    pub fn from_bytes(bytes: Vec<u8>) -> PosterResult<Self> {
        if bytes.is_empty() {
            return Err(PosterError::asset_load("font data is empty"));
        }

        let blob = parley::fontique::Blob::from(bytes.clone());
        let mut collection = isolated_collection();
        let families = collection.register_fonts(blob.clone(), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PosterError::asset_load("font data contains no usable faces"))?;
        let family = collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::asset_load("registered font family has no name"))?;

        Ok(Self {
            family: Arc::from(family),
            glyph_font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
            blob,
        })
    }

    /// Primary family name read from the font tables.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font bytes, for registering with a layout engine.
    pub(crate) fn blob(&self) -> parley::fontique::Blob<u8> {
        self.blob.clone()
    }

    /// Font data in the form the glyph rasterizer consumes.
    pub(crate) fn glyph_font(&self) -> &vello_cpu::peniko::FontData {
        &self.glyph_font
    }
}

/// Font collection that never consults system fonts.
///
/// Only the bundled face is ever used for shaping, so glyph ids always index that face.
pub(crate) fn isolated_collection() -> parley::fontique::Collection {
    parley::fontique::Collection::new(parley::fontique::CollectionOptions {
        shared: false,
        system_fonts: false,
    })
}

/// Immutable background + font loaded once at startup.
///
/// Share across requests with `Arc<AssetStore>`; nothing in here is ever mutated after load.
#[derive(Clone, Debug)]
pub struct AssetStore {
    background: Arc<Canvas>,
    font: FontHandle,
}

impl AssetStore {
    /// Load the background and font compiled into the binary.
    pub fn bundled() -> PosterResult<Self> {
        Self::from_bytes(BUNDLED_BACKGROUND, BUNDLED_FONT.to_vec())
    }

    /// Load from caller-supplied encoded background and font bytes.
    pub fn from_bytes(background: &[u8], font: Vec<u8>) -> PosterResult<Self> {
        let background = assets_decode::decode_canvas(background)
            .map_err(|e| PosterError::asset_load(format!("background: {e}")))?;
        if background.width == 0 || background.height == 0 {
            return Err(PosterError::asset_load("background has zero area"));
        }
        let font = FontHandle::from_bytes(font)?;

        tracing::debug!(
            width = background.width,
            height = background.height,
            family = font.family(),
            "assets loaded"
        );

        Ok(Self {
            background: Arc::new(background),
            font,
        })
    }

    /// Load `background.{png,jpg,jpeg}` and the first `.ttf`/`.otf` file (by name) from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> PosterResult<Self> {
        let dir = dir.as_ref();

        let bg_path = BACKGROUND_STEMS
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| {
                PosterError::asset_load(format!("no background image in '{}'", dir.display()))
            })?;
        let font_path = find_font_file(dir)?;

        let bg_bytes = read_bytes(&bg_path)?;
        let font_bytes = read_bytes(&font_path)?;
        Self::from_bytes(&bg_bytes, font_bytes)
    }

    /// Shared background raster (premultiplied RGBA8).
    pub fn background(&self) -> &Canvas {
        &self.background
    }

    /// Shared background as a reference-counted handle.
    pub fn background_arc(&self) -> Arc<Canvas> {
        Arc::clone(&self.background)
    }

    /// Shared font.
    pub fn font(&self) -> &FontHandle {
        &self.font
    }
}

fn find_font_file(dir: &Path) -> PosterResult<PathBuf> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("read asset dir '{}'", dir.display()))
        .map_err(|e| PosterError::asset_load(format!("{e:#}")))?;

    let mut fonts: Vec<PathBuf> = rd
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf"))
                .unwrap_or(false)
        })
        .collect();
    fonts.sort();

    fonts
        .into_iter()
        .next()
        .ok_or_else(|| PosterError::asset_load(format!("no font file in '{}'", dir.display())))
}

fn read_bytes(path: &Path) -> PosterResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(|e| PosterError::asset_load(format!("{e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
