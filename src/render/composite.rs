use image::imageops::FilterType;

use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::geometry::PosterGeometry;

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: Rgba8Premul, src: Rgba8Premul) -> Rgba8Premul {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Blend `src` over `dst`, both tightly packed premultiplied RGBA8 of equal length.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> PosterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PosterError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend `src` over `dst` with its top-left corner at `(x, y)`; out-of-bounds pixels are clipped.
pub fn blit_over(dst: &mut Canvas, src: &Canvas, x: i32, y: i32) {
    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);
    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(src.width)).min(dst_w);
    let y1 = (i64::from(y) + i64::from(src.height)).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_stride = src.width as usize * 4;
    let dst_stride = dst.width as usize * 4;
    let span = (x1 - x0) as usize * 4;
    for dy in y0..y1 {
        let sy = (dy - i64::from(y)) as usize;
        let sx = (x0 - i64::from(x)) as usize;
        let s_off = sy * src_stride + sx * 4;
        let d_off = dy as usize * dst_stride + x0 as usize * 4;
        let src_row = &src.rgba8_premul[s_off..s_off + span];
        let dst_row = &mut dst.rgba8_premul[d_off..d_off + span];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

/// Stretch `avatar` to a `side x side` square with a Lanczos3 filter.
///
/// Resampling runs on premultiplied pixels so transparent regions do not bleed color.
pub fn resize_avatar(avatar: &image::DynamicImage, side: u32) -> PosterResult<Canvas> {
    if avatar.width() == 0 || avatar.height() == 0 {
        return Err(PosterError::render("avatar has zero area"));
    }
    let premul = Canvas::from_rgba_image(avatar.to_rgba8());
    let buf = image::RgbaImage::from_raw(premul.width, premul.height, premul.rgba8_premul)
        .ok_or_else(|| PosterError::render("invalid avatar buffer size"))?;
    let resized = image::imageops::resize(&buf, side, side, FilterType::Lanczos3);
    Canvas::from_premul(side, side, resized.into_raw())
}

/// Copy the background and blend the resized avatar into its fixed slot.
#[tracing::instrument(skip_all, fields(w = background.width, h = background.height))]
pub fn composite_avatar(
    background: &Canvas,
    avatar: &image::DynamicImage,
) -> PosterResult<(Canvas, PosterGeometry)> {
    let geometry = PosterGeometry::for_canvas(background.width, background.height);
    let resized = resize_avatar(avatar, geometry.avatar_side)?;

    let mut canvas = background.clone();
    blit_over(&mut canvas, &resized, geometry.avatar_x, geometry.avatar_y);
    tracing::debug!(
        x = geometry.avatar_x,
        y = geometry.avatar_y,
        src_w = avatar.width(),
        src_h = avatar.height(),
        "avatar composited"
    );
    Ok((canvas, geometry))
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
