use crate::blit::draw::{BlitTarget, BlitTransform, draw_blit};
use crate::blit::image::{BlitImage, ImageHandle, ImageStore};
use crate::context::state::{RenderState, Topology};
use crate::foundation::core::{Pixel, Rect};
use crate::raster::draw_primitives;
use crate::raster::framebuffer::FrameBuffer;
use crate::raster::texture::TextureStore;
use crate::raster::vertex::Vertex;
use crate::record::arena::{ArenaSlice, FrameArena};
use crate::record::fingerprint::fingerprint_vertices;

/// A committed vertex run.
#[derive(Clone, Debug)]
pub struct RasterCall {
    state: RenderState,
    topology: Topology,
    vertices: ArenaSlice,
    fingerprint: u64,
    dirty: Rect,
}

/// An image draw.
#[derive(Clone, Debug)]
pub struct BlitCall {
    state: RenderState,
    image: ImageHandle,
    version: u64,
    transform: BlitTransform,
    target: BlitTarget,
    dirty: Rect,
}

/// A buffer clear.
#[derive(Clone, Debug)]
pub struct ClearCall {
    state: RenderState,
    color: Option<Pixel>,
    depth: Option<u32>,
    dirty: Rect,
}

/// One recorded operation of a frame.
#[derive(Clone, Debug)]
pub enum DrawCall {
    /// Triangles, lines or points.
    Rasterization(RasterCall),
    /// An image composited onto the color or depth buffer.
    Blit(BlitCall),
    /// A color and/or depth clear.
    Clear(ClearCall),
}

/// Resources a replay reads from.
pub(crate) struct ReplayEnv<'a> {
    pub(crate) arena: &'a FrameArena,
    pub(crate) textures: &'a TextureStore,
    pub(crate) images: &'a ImageStore,
}

/// Screen pixels a vertex run can touch.
///
/// The box of the projected vertices is padded by at least one pixel to absorb pixel snapping;
/// runs entirely outside one frustum plane touch nothing, and runs with a vertex at or behind
/// the eye plane may cover anything inside the scissor.
pub(crate) fn raster_dirty_rect(
    vertices: &[Vertex],
    state: &RenderState,
    padding: u32,
    bounds: Rect,
) -> Rect {
    let clip = state.scissor.intersect(bounds);
    if vertices.is_empty() || clip.is_empty() {
        return Rect::EMPTY;
    }
    if vertices.iter().fold(0xFFu8, |acc, v| acc & v.clip_code) != 0 {
        return Rect::EMPTY;
    }
    if vertices.iter().any(|v| v.clip.w <= 0.0) {
        return clip;
    }
    let (mut x0, mut y0) = (f32::INFINITY, f32::INFINITY);
    let (mut x1, mut y1) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for v in vertices {
        let [x, y, _] = v.screen;
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }
    let margin = padding.max(1) as f64;
    let bbox = kurbo::Rect::new(
        f64::from(x0.floor()) - margin,
        f64::from(y0.floor()) - margin,
        f64::from(x1.ceil()) + 1.0 + margin,
        f64::from(y1.ceil()) + 1.0 + margin,
    );
    Rect::enclosing(bbox).intersect(clip)
}

impl DrawCall {
    /// Record a vertex run: copy it into the arena and compute its dirty rectangle.
    pub(crate) fn rasterization(
        state: RenderState,
        topology: Topology,
        vertices: &[Vertex],
        arena: &mut FrameArena,
        padding: u32,
        bounds: Rect,
    ) -> Self {
        let dirty = raster_dirty_rect(vertices, &state, padding, bounds);
        Self::Rasterization(RasterCall {
            state,
            topology,
            vertices: arena.alloc(vertices),
            fingerprint: fingerprint_vertices(topology, vertices),
            dirty,
        })
    }

    pub(crate) fn blit(
        state: RenderState,
        handle: ImageHandle,
        image: &BlitImage,
        transform: BlitTransform,
        target: BlitTarget,
        bounds: Rect,
    ) -> Self {
        let dirty =
            crate::blit::draw::dirty_rect(image, &transform, state.scissor.intersect(bounds));
        Self::Blit(BlitCall {
            state,
            image: handle,
            version: image.version(),
            transform,
            target,
            dirty,
        })
    }

    pub(crate) fn clear(
        state: RenderState,
        color: Option<Pixel>,
        depth: Option<u32>,
        bounds: Rect,
    ) -> Self {
        let dirty = if color.is_none() && depth.is_none() {
            Rect::EMPTY
        } else {
            state.scissor.intersect(bounds)
        };
        Self::Clear(ClearCall {
            state,
            color,
            depth,
            dirty,
        })
    }

    /// Superset of the pixels this call can write, fixed at record time.
    pub fn dirty(&self) -> Rect {
        match self {
            Self::Rasterization(c) => c.dirty,
            Self::Blit(c) => c.dirty,
            Self::Clear(c) => c.dirty,
        }
    }

    /// Render state captured at record time.
    pub fn state(&self) -> &RenderState {
        match self {
            Self::Rasterization(c) => &c.state,
            Self::Blit(c) => &c.state,
            Self::Clear(c) => &c.state,
        }
    }

    /// Short variant name for logs and stats.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rasterization(_) => "rasterization",
            Self::Blit(_) => "blit",
            Self::Clear(_) => "clear",
        }
    }

    /// Return `true` when replaying `self` and `other` produces identical pixels.
    ///
    /// Vertex runs are compared through `arena`; a run whose arena half was reset never
    /// matches.
    pub(crate) fn same_output(&self, other: &Self, arena: &FrameArena) -> bool {
        match (self, other) {
            (Self::Rasterization(a), Self::Rasterization(b)) => {
                if a.state != b.state
                    || a.topology != b.topology
                    || a.vertices.len() != b.vertices.len()
                    || a.fingerprint != b.fingerprint
                {
                    return false;
                }
                match (arena.get(a.vertices), arena.get(b.vertices)) {
                    (Some(va), Some(vb)) => va == vb,
                    _ => false,
                }
            }
            (Self::Blit(a), Self::Blit(b)) => {
                a.state == b.state
                    && a.image == b.image
                    && a.version == b.version
                    && a.transform == b.transform
                    && a.target == b.target
            }
            (Self::Clear(a), Self::Clear(b)) => {
                a.state == b.state && a.color == b.color && a.depth == b.depth
            }
            _ => false,
        }
    }

    /// Return `true` while the image or texture this call reads still holds the contents it
    /// was recorded against. Replay reads the live stores, so a stale call must be redrawn.
    pub(crate) fn resources_current(&self, textures: &TextureStore, images: &ImageStore) -> bool {
        let texture_current = self.state().texture.is_none_or(|binding| {
            textures
                .get(binding.handle)
                .is_some_and(|tex| tex.version() == binding.version)
        });
        match self {
            Self::Blit(c) => {
                texture_current
                    && images
                        .get(c.image)
                        .is_some_and(|image| image.version() == c.version)
            }
            _ => texture_current,
        }
    }

    /// Re-execute the call, writing only inside `rect`.
    pub(crate) fn replay(&self, fb: &mut FrameBuffer, env: &ReplayEnv<'_>, rect: Rect) {
        fb.set_scissor(rect.intersect(self.dirty()));
        if fb.scissor().is_empty() {
            return;
        }
        match self {
            Self::Rasterization(c) => {
                let Some(vertices) = env.arena.get(c.vertices) else {
                    tracing::warn!("rasterization call references a reset arena half");
                    return;
                };
                draw_primitives(fb, &c.state, c.topology, vertices, env.textures);
            }
            Self::Blit(c) => {
                let Some(image) = env.images.get(c.image) else {
                    tracing::warn!(image = c.image.0, "blit references a deleted image");
                    return;
                };
                draw_blit(fb, &c.state, image, &c.transform, c.target);
            }
            Self::Clear(c) => fb.clear_rect(c.dirty, c.color, c.depth),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/draw_call.rs"]
mod tests;
