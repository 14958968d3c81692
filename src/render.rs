//! Compositing: fixed layout geometry, avatar blending and name rasterization.

pub(crate) mod composite;
pub(crate) mod geometry;
pub(crate) mod text;
