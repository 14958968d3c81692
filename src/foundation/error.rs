/// Convenience result type used across the poster engine.
pub type PosterResult<T> = Result<T, PosterError>;

/// Error taxonomy for poster generation.
///
/// Every per-request variant aborts the pipeline for that request. [`PosterError::AssetLoad`]
/// is only produced during startup and prevents a [`crate::Generator`] from being built.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Bundled background or font is missing or cannot be decoded/parsed.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Avatar could not be retrieved (network failure, timeout, non-success status).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Bytes are not a recognized or intact raster image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Compositing or glyph rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Final PNG serialization failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`PosterError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`PosterError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PosterError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PosterError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Short machine-friendly tag for the failing stage.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AssetLoad(_) => "asset_load",
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::Render(_) => "render",
            Self::Encode(_) => "encode",
            Self::Other(_) => "other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
