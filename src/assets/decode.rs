use crate::foundation::core::Canvas;
use crate::foundation::error::{PosterError, PosterResult};

/// Decode encoded image bytes, sniffing the container format from the content.
///
/// Any format enabled in the `image` crate is accepted (PNG, JPEG, GIF, WebP, BMP, ...).
pub fn decode_image(bytes: &[u8]) -> PosterResult<image::DynamicImage> {
    if bytes.is_empty() {
        return Err(PosterError::decode("image payload is empty"));
    }
    let format = image::guess_format(bytes)
        .map_err(|e| PosterError::decode(format!("unrecognized image format: {e}")))?;
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PosterError::decode(format!("decode {format:?} image: {e}")))
}

/// Decode encoded image bytes and convert to a premultiplied RGBA8 [`Canvas`].
pub fn decode_canvas(bytes: &[u8]) -> PosterResult<Canvas> {
    let dyn_img = decode_image(bytes)?;
    Ok(Canvas::from_rgba_image(dyn_img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
