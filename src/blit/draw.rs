use kurbo::Affine;

use crate::blit::image::BlitImage;
use crate::context::state::RenderState;
use crate::foundation::core::{Pixel, Rect};
use crate::foundation::math::{FIXED_SHIFT, to_fixed};
use crate::raster::blend::tint;
use crate::raster::framebuffer::{FragmentOps, FrameBuffer};

/// Placement of an image on screen.
///
/// The destination rectangle starts at `position` and has `size` pixels (the source size when
/// `None`). A non-zero `rotation_deg` rotates it clockwise on screen around
/// `position + origin`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlitTransform {
    /// Source sub-rectangle; the whole image when `None`.
    pub source: Option<Rect>,
    /// Destination top-left corner.
    pub position: [i32; 2],
    /// Destination size; the source size when `None`.
    pub size: Option<[u32; 2]>,
    /// Rotation in degrees, clockwise on screen.
    pub rotation_deg: f32,
    /// Rotation pivot relative to `position`.
    pub origin: [f32; 2],
    /// Mirror horizontally.
    pub flip_h: bool,
    /// Mirror vertically.
    pub flip_v: bool,
    /// Per-channel multiplier applied to every source pixel, alpha included.
    pub tint: [f32; 4],
}

impl Default for BlitTransform {
    fn default() -> Self {
        Self {
            source: None,
            position: [0, 0],
            size: None,
            rotation_deg: 0.0,
            origin: [0.0, 0.0],
            flip_h: false,
            flip_v: false,
            tint: [1.0; 4],
        }
    }
}

impl BlitTransform {
    /// Unscaled, unrotated blit of the whole image at `(x, y)`.
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: [x, y],
            ..Self::default()
        }
    }

    /// Restrict the blit to a source sub-rectangle.
    pub fn with_source(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    /// Scale to a destination size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some([width, height]);
        self
    }

    /// Rotate around `origin` (relative to the destination top-left corner).
    pub fn with_rotation(mut self, degrees: f32, origin: [f32; 2]) -> Self {
        self.rotation_deg = degrees;
        self.origin = origin;
        self
    }

    /// Mirror the image.
    pub fn with_flip(mut self, horizontal: bool, vertical: bool) -> Self {
        self.flip_h = horizontal;
        self.flip_v = vertical;
        self
    }

    /// Multiply every source pixel by `tint`.
    pub fn with_tint(mut self, tint: [f32; 4]) -> Self {
        self.tint = tint;
        self
    }

    fn is_rotated(&self) -> bool {
        self.rotation_deg.rem_euclid(360.0) != 0.0
    }

    fn has_tint(&self) -> bool {
        self.tint != [1.0; 4]
    }

    /// Source rectangle clipped to the image and the destination size. `None` for zero-area
    /// blits.
    fn resolve(&self, image: &BlitImage) -> Option<(Rect, u32, u32)> {
        let bounds = Rect::from_xywh(0, 0, image.width(), image.height());
        let src = self.source.unwrap_or(bounds).intersect(bounds);
        let [w, h] = self.size.unwrap_or([src.width(), src.height()]);
        (!src.is_empty() && w > 0 && h > 0).then_some((src, w, h))
    }

    /// Local destination pixel space to screen space.
    fn forward(&self) -> Affine {
        let pos = kurbo::Vec2::new(f64::from(self.position[0]), f64::from(self.position[1]));
        let pivot = pos + kurbo::Vec2::new(f64::from(self.origin[0]), f64::from(self.origin[1]));
        Affine::translate(pivot)
            * Affine::rotate(f64::from(self.rotation_deg).to_radians())
            * Affine::translate(-pivot)
            * Affine::translate(pos)
    }
}

/// Which buffer a blit writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlitTarget {
    /// The color buffer.
    #[default]
    Color,
    /// The depth buffer; each visible pixel's 24-bit RGB value becomes its depth.
    Depth,
}

/// Draw path chosen for a blit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlitStrategy {
    LineCopy,
    PixelCopy,
    Scaled,
    Rotated,
}

pub(crate) fn select_strategy(
    state: &RenderState,
    image: &BlitImage,
    transform: &BlitTransform,
    target: BlitTarget,
    src: Rect,
    size: (u32, u32),
) -> BlitStrategy {
    if transform.is_rotated() {
        return BlitStrategy::Rotated;
    }
    if size != (src.width(), src.height()) {
        return BlitStrategy::Scaled;
    }
    let blend_is_copy =
        !state.blend_enabled || (image.is_binary_transparent() && state.is_alpha_over());
    if target == BlitTarget::Color
        && !transform.flip_h
        && !transform.flip_v
        && !transform.has_tint()
        && blend_is_copy
    {
        BlitStrategy::LineCopy
    } else {
        BlitStrategy::PixelCopy
    }
}

/// Unclipped screen footprint of a blit.
fn footprint(image: &BlitImage, transform: &BlitTransform) -> Rect {
    let Some((_, w, h)) = transform.resolve(image) else {
        return Rect::EMPTY;
    };
    if !transform.is_rotated() {
        let [x, y] = transform.position;
        return Rect::from_xywh(x, y, w, h);
    }
    let local = kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
    Rect::enclosing(transform.forward().transform_rect_bbox(local)).pad(1)
}

/// Screen pixels a blit can touch, clipped to `clip`.
pub(crate) fn dirty_rect(image: &BlitImage, transform: &BlitTransform, clip: Rect) -> Rect {
    footprint(image, transform).intersect(clip)
}

struct Emitter<'a> {
    image: &'a BlitImage,
    ops: FragmentOps,
    tint: Option<[f32; 4]>,
    target: BlitTarget,
}

impl Emitter<'_> {
    #[inline]
    fn emit(&self, fb: &mut FrameBuffer, x: i32, y: i32, sx: u32, sy: u32) {
        let mut px: Pixel = self.image.pixel(sx, sy);
        if px[3] == 0 {
            return;
        }
        if let Some(t) = self.tint {
            px = tint(px, t);
            if px[3] == 0 {
                return;
            }
        }
        let idx = fb.index(x, y);
        match self.target {
            BlitTarget::Color => fb.put_color(idx, px, &self.ops),
            BlitTarget::Depth => fb.write_depth(idx, u32::from_be_bytes([0, px[0], px[1], px[2]])),
        }
    }
}

/// Draw `image` into `fb` within its active scissor.
pub(crate) fn draw_blit(
    fb: &mut FrameBuffer,
    state: &RenderState,
    image: &BlitImage,
    transform: &BlitTransform,
    target: BlitTarget,
) {
    let Some((src, w, h)) = transform.resolve(image) else {
        return;
    };
    let scissor = fb.scissor();
    let strategy = select_strategy(state, image, transform, target, src, (w, h));
    let emitter = Emitter {
        image,
        ops: FragmentOps::for_blit(state),
        tint: transform.has_tint().then_some(transform.tint),
        target,
    };
    let [x0, y0] = transform.position;
    let dst = Rect::from_xywh(x0, y0, w, h).intersect(scissor);

    match strategy {
        BlitStrategy::LineCopy => line_copy(fb, image, src, transform.position, scissor),
        BlitStrategy::PixelCopy => {
            for y in dst.top..dst.bottom {
                for x in dst.left..dst.right {
                    let (lx, ly) = flip(transform, (x - x0) as u32, (y - y0) as u32, w, h);
                    emitter.emit(fb, x, y, src.left as u32 + lx, src.top as u32 + ly);
                }
            }
        }
        BlitStrategy::Scaled => {
            let (sw, sh) = (u64::from(src.width()), u64::from(src.height()));
            for y in dst.top..dst.bottom {
                for x in dst.left..dst.right {
                    let (lx, ly) = flip(transform, (x - x0) as u32, (y - y0) as u32, w, h);
                    let sx = (u64::from(lx) * sw / u64::from(w)) as u32;
                    let sy = (u64::from(ly) * sh / u64::from(h)) as u32;
                    emitter.emit(fb, x, y, src.left as u32 + sx, src.top as u32 + sy);
                }
            }
        }
        BlitStrategy::Rotated => rotated(fb, &emitter, transform, src, (w, h), scissor),
    }
}

#[inline]
fn flip(t: &BlitTransform, lx: u32, ly: u32, w: u32, h: u32) -> (u32, u32) {
    (
        if t.flip_h { w - 1 - lx } else { lx },
        if t.flip_v { h - 1 - ly } else { ly },
    )
}

fn line_copy(fb: &mut FrameBuffer, image: &BlitImage, src: Rect, pos: [i32; 2], scissor: Rect) {
    let dx = pos[0] - src.left;
    let dy = pos[1] - src.top;
    for line in image.lines() {
        let (ly, lx0) = (line.y as i32, line.x as i32);
        if ly < src.top || ly >= src.bottom {
            continue;
        }
        let y = ly + dy;
        if y < scissor.top || y >= scissor.bottom {
            continue;
        }
        let start = lx0.max(src.left).max(scissor.left - dx);
        let end = (lx0 + line.length as i32).min(src.right).min(scissor.right - dx);
        if start >= end {
            continue;
        }
        let from = line.offset + (start - lx0) as usize;
        let run = &image.pixels()[from..from + (end - start) as usize];
        fb.copy_span(start + dx, y, run);
    }
}

/// Inverse-map each screen pixel center through the transform, stepping the source
/// coordinates in 16.16 fixed point along each row.
fn rotated(
    fb: &mut FrameBuffer,
    emitter: &Emitter<'_>,
    t: &BlitTransform,
    src: Rect,
    (w, h): (u32, u32),
    scissor: Rect,
) {
    let full = footprint(emitter.image, t);
    let area = full.intersect(scissor);
    if area.is_empty() {
        return;
    }
    let [a, b, c, d, e, f] = t.forward().inverse().as_coeffs();
    let (du, dv) = (to_fixed(a), to_fixed(b));
    let (wf, hf) = (i64::from(w), i64::from(h));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
    // Rows are stepped from the unclipped footprint edge so the sampled texels do not depend
    // on the scissor.
    let cx0 = f64::from(full.left) + 0.5;
    let skip = i64::from(area.left - full.left);

    for y in area.top..area.bottom {
        let cy = f64::from(y) + 0.5;
        let mut u = to_fixed(a * cx0 + c * cy + e) + du * skip;
        let mut v = to_fixed(b * cx0 + d * cy + f) + dv * skip;
        for x in area.left..area.right {
            let (lx, ly) = (u >> FIXED_SHIFT, v >> FIXED_SHIFT);
            u += du;
            v += dv;
            if lx < 0 || ly < 0 || lx >= wf || ly >= hf {
                continue;
            }
            let (lx, ly) = flip(t, lx as u32, ly as u32, w, h);
            let sx = (i64::from(lx) * sw / wf) as u32;
            let sy = (i64::from(ly) * sh / hf) as u32;
            emitter.emit(fb, x, y, src.left as u32 + sx, src.top as u32 + sy);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blit/draw.rs"]
mod tests;
