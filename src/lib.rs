//! Poster is a small CPU rendering engine that produces a personalized poster: a fetched avatar
//! and a name composited onto one fixed background template.
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: download the avatar over HTTP(S) and decode it (format sniffed from content)
//! 2. **Resize**: stretch the avatar to a 150×150 square with a Lanczos3 filter
//! 3. **Composite**: copy the background and blend the avatar centered in the upper third
//! 4. **Text**: draw the name, centered, 30px below the avatar (36pt at 72 DPI, white)
//! 5. **Encode**: PNG, then standard base64
//!
//! The stages run strictly in order; the first failure aborts the request.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Load once, share read-only**: background and font live in an [`AssetStore`] that is
//!   injected into the [`Generator`]; nothing shared is ever mutated.
//! - **Deterministic**: identical avatar bytes and name produce byte-identical output.
//! - **Premultiplied RGBA8** internally; PNG output is straight alpha.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! let assets = Arc::new(poster::AssetStore::bundled()?);
//! let generator = poster::Generator::new(assets, &poster::GeneratorConfig::default())?;
//! let base64_png = generator.generate("Ada", "https://example.com/ada.jpg")?;
//! # Ok::<(), poster::PosterError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod fetch;
mod foundation;
mod pipeline;
mod render;

pub use assets::decode::{decode_canvas, decode_image};
pub use assets::store::{AssetStore, FontHandle};
pub use encode::png::{encode_png, encode_png_base64, to_base64};
pub use fetch::avatar::{AvatarSource, FetchConfig, HttpAvatarFetcher, decode_avatar};
pub use foundation::core::{
    Canvas, Rgba8Premul, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
pub use foundation::error::{PosterError, PosterResult};
pub use pipeline::generate::{Generator, GeneratorConfig};
pub use render::composite::{blit_over, composite_avatar, over, over_in_place, resize_avatar};
pub use render::geometry::{AVATAR_SIDE_PX, PosterGeometry, TEXT_MARGIN_PX, centered_origin_x};
pub use render::text::{
    TextBrushRgba8, TextLayoutEngine, TextMeasure, TextPlacement, TextStyle, centered_text_x,
    draw_centered_text,
};
