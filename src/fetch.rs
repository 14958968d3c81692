//! Per-request avatar retrieval.

pub(crate) mod avatar;
