//! Startup-time resources: the shared background/font store and raster decoding.

pub(crate) mod decode;
pub(crate) mod store;
