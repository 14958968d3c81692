use std::io::Cursor;

use base64::Engine as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{PosterError, PosterResult};

/// Serialize `canvas` as a straight-alpha RGBA8 PNG.
pub fn encode_png(canvas: &Canvas) -> PosterResult<Vec<u8>> {
    let img = canvas
        .to_rgba_image()
        .map_err(|e| PosterError::encode(e.to_string()))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PosterError::encode(format!("png: {e}")))?;
    Ok(buf)
}

/// Standard-alphabet, padded base64 with no line breaks.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// [`encode_png`] followed by [`to_base64`].
pub fn encode_png_base64(canvas: &Canvas) -> PosterResult<String> {
    let png = encode_png(canvas)?;
    tracing::debug!(png_bytes = png.len(), "canvas encoded");
    Ok(to_base64(&png))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
