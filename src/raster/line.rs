use crate::raster::framebuffer::FrameBuffer;
use crate::raster::triangle::{FillSetup, RasterVertex};

/// Draw a one-pixel-wide segment with Bresenham stepping, endpoints inclusive.
pub(crate) fn draw_line(
    fb: &mut FrameBuffer,
    setup: &FillSetup<'_>,
    a: RasterVertex,
    b: RasterVertex,
) {
    let scissor = fb.scissor();
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    let sx = if b.x >= a.x { 1 } else { -1 };
    let sy = if b.y >= a.y { 1 } else { -1 };
    let n = dx.max(dy);
    let inv_n = if n > 0 { 1.0 / n as f32 } else { 0.0 };
    let dattrs = (b.attrs - a.attrs) * inv_n;

    let (mut x, mut y) = (a.x, a.y);
    let mut err = dx - dy;
    for i in 0..=n {
        if scissor.contains(x, y) {
            let (z, color) = setup.shade(&(a.attrs + dattrs * i as f32));
            let idx = fb.index(x, y);
            fb.write_fragment(&setup.ops, idx, z, color);
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw a single pixel.
pub(crate) fn draw_point(fb: &mut FrameBuffer, setup: &FillSetup<'_>, p: RasterVertex) {
    if !fb.scissor().contains(p.x, p.y) {
        return;
    }
    let (z, color) = setup.shade(&p.attrs);
    let idx = fb.index(p.x, p.y);
    fb.write_fragment(&setup.ops, idx, z, color);
}
