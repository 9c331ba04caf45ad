//! softgl is a CPU software rendering pipeline with frame-differencing presentation.
//!
//! Geometry and image draws are recorded into a per-frame queue of draw calls. At the end of a
//! frame the queue is compared with the previous one, the screen regions touched by calls that
//! changed are merged into dirty rectangles, and only the calls intersecting those rectangles
//! are rasterized again.
//!
//! - Create a [`Context`] from [`ContextOpts`]
//! - Submit geometry with [`Context::begin`] / [`Context::vertex`] / [`Context::end`], images
//!   with [`Context::blit`], clears with [`Context::clear`]
//! - Call [`Context::present_frame`] and read the result with [`Context::frame_rgba`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod blit;
mod context;
mod foundation;
mod present;
mod raster;
mod record;
/// JSON scene scripts driving a [`Context`].
pub mod scene;

pub use crate::blit::draw::{BlitTarget, BlitTransform};
pub use crate::blit::image::{BlitImage, ImageHandle, ImageStore, Line, MAX_IMAGE_EDGE};
pub use crate::context::Context;
pub use crate::context::matrix::{MATRIX_STACK_DEPTH, MatrixMode};
pub use crate::context::opts::ContextOpts;
pub use crate::context::state::{
    BlendFactor, Capability, CompareFunc, CullFace, FrontFace, RenderState, ShadingModel,
    ShadowMode, TextureBinding, Topology, Viewport,
};
pub use crate::foundation::core::{Canvas, MAX_CANVAS_EDGE, Pixel, Rect};
pub use crate::foundation::error::{SoftGlError, SoftGlResult};
pub use crate::foundation::math::{Mat4, Vec4};
pub use crate::present::PresentStats;
pub use crate::raster::framebuffer::{DEPTH_MAX, FrameBuffer, FrameRGBA, ShadowMaskHandle};
pub use crate::raster::texture::{
    MAX_TEXTURE_EDGE, Texture, TextureFilter, TextureHandle, TextureStore, TextureWrap,
};
pub use crate::raster::vertex::Vertex;
pub use crate::record::arena::{ArenaSlice, FrameArena};
pub use crate::record::draw_call::{BlitCall, ClearCall, DrawCall, RasterCall};
