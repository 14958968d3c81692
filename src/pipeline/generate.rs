use std::{io::Read, sync::Arc, time::Instant};

use anyhow::Context;

use crate::{
    assets::store::AssetStore,
    encode::png::{encode_png, encode_png_base64},
    fetch::avatar::{AvatarSource, FetchConfig, HttpAvatarFetcher},
    foundation::core::Canvas,
    foundation::error::PosterResult,
    render::composite::composite_avatar,
    render::text::{TextLayoutEngine, TextStyle, draw_centered_text},
};

/// Runtime knobs for a [`Generator`]. Layout geometry is fixed and not configurable.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Avatar download settings.
    pub fetch: FetchConfig,
    /// Name rendering settings.
    pub text: TextStyle,
}

impl GeneratorConfig {
    /// Parse JSON configuration; missing fields take their defaults.
    pub fn from_reader<R: Read>(reader: R) -> PosterResult<Self> {
        let cfg: Self = serde_json::from_reader(reader).context("parse generator config JSON")?;
        Ok(cfg)
    }
}

/// Poster generation pipeline: fetch → resize → composite → text → encode.
///
/// Holds only shared, immutable state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Generator {
    assets: Arc<AssetStore>,
    avatars: Arc<dyn AvatarSource>,
    text_style: TextStyle,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("assets", &self.assets)
            .field("text_style", &self.text_style)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Generator that downloads avatars over HTTP.
    pub fn new(assets: Arc<AssetStore>, config: &GeneratorConfig) -> PosterResult<Self> {
        let fetcher = HttpAvatarFetcher::new(config.fetch.clone())?;
        Ok(Self::with_avatar_source(
            assets,
            Arc::new(fetcher),
            config.text,
        ))
    }

    /// Generator over the bundled assets; fails if they cannot be loaded.
    pub fn bundled(config: &GeneratorConfig) -> PosterResult<Self> {
        Self::new(Arc::new(AssetStore::bundled()?), config)
    }

    /// Generator with a caller-supplied avatar source.
    pub fn with_avatar_source(
        assets: Arc<AssetStore>,
        avatars: Arc<dyn AvatarSource>,
        text_style: TextStyle,
    ) -> Self {
        Self {
            assets,
            avatars,
            text_style,
        }
    }

    /// Shared assets.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Produce the poster for `name` as base64-encoded PNG.
    #[tracing::instrument(skip(self))]
    pub fn generate(&self, name: &str, avatar_url: &str) -> PosterResult<String> {
        let started = Instant::now();
        let canvas = self.fetch_and_render(name, avatar_url)?;
        let encoded = encode_png_base64(&canvas)?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            encoded_len = encoded.len(),
            "poster generated"
        );
        Ok(encoded)
    }

    /// Produce the poster for `name` as raw PNG bytes.
    #[tracing::instrument(skip(self))]
    pub fn generate_png(&self, name: &str, avatar_url: &str) -> PosterResult<Vec<u8>> {
        let canvas = self.fetch_and_render(name, avatar_url)?;
        encode_png(&canvas)
    }

    /// Composite an already-decoded avatar and draw the name; no network access.
    pub fn render(&self, name: &str, avatar: &image::DynamicImage) -> PosterResult<Canvas> {
        let (mut canvas, geometry) = composite_avatar(self.assets.background(), avatar)?;

        let mut engine = TextLayoutEngine::new(self.assets.font())?;
        draw_centered_text(
            &mut canvas,
            &mut engine,
            name,
            &self.text_style,
            geometry.text_baseline_y(),
        )?;
        Ok(canvas)
    }

    fn fetch_and_render(&self, name: &str, avatar_url: &str) -> PosterResult<Canvas> {
        let avatar = self.avatars.fetch_avatar(avatar_url)?;
        self.render(name, &avatar)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/generate.rs"]
mod tests;
