//! Scanline triangle filler.
//!
//! Vertices are sorted by screen Y and the triangle is walked as two trapezoids. Edge X positions
//! advance with an integer DDA whose error term alternates between a `dxdy_min` and a `dxdy_max`
//! step, so every edge lands exactly on its end vertex. Attributes are stepped along the left
//! edge with matching min/max deltas and evaluated across the span from the span start, which
//! keeps per-pixel values independent of the active scissor.

use std::ops::{Add, AddAssign, Mul, Sub};

use crate::foundation::core::{Pixel, Rect};
use crate::raster::blend::modulate;
use crate::raster::framebuffer::{DEPTH_MAX, FragmentOps, FrameBuffer};
use crate::raster::texture::Texture;

pub(crate) const ATTR_Z: usize = 0;
pub(crate) const ATTR_R: usize = 1;
pub(crate) const ATTR_S: usize = 5;
pub(crate) const ATTR_T: usize = 6;
pub(crate) const ATTR_Q: usize = 7;
const ATTR_COUNT: usize = 8;

/// Interpolated quantities: depth (in depth-buffer units), RGBA (0..255), S, T and Q.
///
/// With perspective correction S and T are pre-multiplied by Q = 1/w.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Attrs(pub(crate) [f32; ATTR_COUNT]);

impl Add for Attrs {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] + o.0[i]))
    }
}

impl AddAssign for Attrs {
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl Sub for Attrs {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] - o.0[i]))
    }
}

impl Mul<f32> for Attrs {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self(self.0.map(|v| v * s))
    }
}

/// A vertex snapped to the pixel grid, ready for edge walking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RasterVertex {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) attrs: Attrs,
}

/// Everything a fill needs besides geometry.
pub(crate) struct FillSetup<'a> {
    pub(crate) ops: FragmentOps,
    pub(crate) flat: Option<Pixel>,
    pub(crate) texture: Option<&'a Texture>,
    pub(crate) perspective: bool,
}

impl FillSetup<'_> {
    #[inline]
    pub(crate) fn shade(&self, a: &Attrs) -> (u32, Pixel) {
        let z = a.0[ATTR_Z].clamp(0.0, DEPTH_MAX as f32) as u32;
        let mut color = match self.flat {
            Some(c) => c,
            None => std::array::from_fn(|i| a.0[ATTR_R + i].clamp(0.0, 255.0).round() as u8),
        };
        if let Some(tex) = self.texture {
            let (s, t) = if self.perspective && a.0[ATTR_Q] != 0.0 {
                (a.0[ATTR_S] / a.0[ATTR_Q], a.0[ATTR_T] / a.0[ATTR_Q])
            } else {
                (a.0[ATTR_S], a.0[ATTR_T])
            };
            color = modulate(tex.sample(s, t), color);
        }
        (z, color)
    }
}

/// Integer DDA for one edge: `x_k = x_top + floor(k * dx / dy)`.
#[derive(Clone, Copy, Debug)]
struct EdgeStep {
    x: i32,
    error: i32,
    derror: i32,
    dy: i32,
    dxdy_min: i32,
}

impl EdgeStep {
    fn new(top: &RasterVertex, bottom: &RasterVertex) -> Self {
        let dy = bottom.y - top.y;
        let dx = bottom.x - top.x;
        let (dxdy_min, derror) = if dy > 0 {
            (dx.div_euclid(dy), dx.rem_euclid(dy))
        } else {
            (0, 0)
        };
        Self {
            x: top.x,
            error: 0,
            derror,
            dy,
            dxdy_min,
        }
    }

    /// Advance one scanline; returns `true` when the `dxdy_max` step was taken.
    #[inline]
    fn step(&mut self) -> bool {
        self.error += self.derror;
        if self.dy > 0 && self.error >= self.dy {
            self.error -= self.dy;
            self.x += self.dxdy_min + 1;
            true
        } else {
            self.x += self.dxdy_min;
            false
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct LeftEdge {
    step: EdgeStep,
    attrs: Attrs,
    dattr_min: Attrs,
    dattr_max: Attrs,
}

impl LeftEdge {
    fn new(top: &RasterVertex, bottom: &RasterVertex, ddx: Attrs, ddy: Attrs) -> Self {
        let step = EdgeStep::new(top, bottom);
        let dattr_min = ddy + ddx * step.dxdy_min as f32;
        Self {
            step,
            attrs: top.attrs,
            dattr_min,
            dattr_max: dattr_min + ddx,
        }
    }

    #[inline]
    fn advance(&mut self) {
        if self.step.step() {
            self.attrs += self.dattr_max;
        } else {
            self.attrs += self.dattr_min;
        }
    }
}

/// Fill a triangle into `fb` within its active scissor. Zero-area triangles draw nothing.
pub(crate) fn fill_triangle(fb: &mut FrameBuffer, setup: &FillSetup<'_>, tri: [RasterVertex; 3]) {
    let mut v = tri;
    v.sort_by_key(|p| (p.y, p.x));
    let [p0, p1, p2] = v;

    let idx1 = i64::from(p1.x - p0.x);
    let idy1 = i64::from(p1.y - p0.y);
    let idx2 = i64::from(p2.x - p0.x);
    let idy2 = i64::from(p2.y - p0.y);
    let det = idx1 * idy2 - idx2 * idy1;
    if det == 0 {
        return;
    }

    let inv = 1.0 / det as f32;
    let (fdx1, fdy1, fdx2, fdy2) = (idx1 as f32, idy1 as f32, idx2 as f32, idy2 as f32);
    let d1 = p1.attrs - p0.attrs;
    let d2 = p2.attrs - p0.attrs;
    let ddx = (d1 * fdy2 - d2 * fdy1) * inv;
    let ddy = (d2 * fdx1 - d1 * fdx2) * inv;

    let scissor = fb.scissor();
    if scissor.is_empty() {
        return;
    }

    // det > 0: the middle vertex lies right of the long edge p0 -> p2.
    let long_is_left = det > 0;
    let (mut left, mut right) = if long_is_left {
        (LeftEdge::new(&p0, &p2, ddx, ddy), EdgeStep::new(&p0, &p1))
    } else {
        (LeftEdge::new(&p0, &p1, ddx, ddy), EdgeStep::new(&p0, &p2))
    };
    scan(fb, setup, ddx, scissor, &mut left, &mut right, p0.y, p1.y - p0.y);

    if long_is_left {
        right = EdgeStep::new(&p1, &p2);
    } else {
        left = LeftEdge::new(&p1, &p2, ddx, ddy);
    }
    scan(fb, setup, ddx, scissor, &mut left, &mut right, p1.y, p2.y - p1.y + 1);
}

#[allow(clippy::too_many_arguments)]
fn scan(
    fb: &mut FrameBuffer,
    setup: &FillSetup<'_>,
    ddx: Attrs,
    scissor: Rect,
    left: &mut LeftEdge,
    right: &mut EdgeStep,
    y_start: i32,
    rows: i32,
) {
    for y in y_start..y_start + rows.max(0) {
        if y >= scissor.bottom {
            return;
        }
        if y >= scissor.top {
            let x_start = left.step.x;
            let lo = x_start.max(scissor.left);
            let hi = right.x.min(scissor.right - 1);
            if lo <= hi {
                let row = fb.index(0, y);
                for x in lo..=hi {
                    let a = left.attrs + ddx * (x - x_start) as f32;
                    let (z, color) = setup.shade(&a);
                    fb.write_fragment(&setup.ops, row + x as usize, z, color);
                }
            }
        }
        left.advance();
        right.step();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/triangle.rs"]
mod tests;
