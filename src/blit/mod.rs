//! 2D image composition driven by precomputed opaque runs.

pub(crate) mod draw;
pub(crate) mod image;
