//! Triangle, line and point rasterization into a [`FrameBuffer`].

pub(crate) mod blend;
pub(crate) mod clip;
pub(crate) mod framebuffer;
pub(crate) mod line;
pub(crate) mod texture;
pub(crate) mod triangle;
pub(crate) mod vertex;

use crate::context::state::{CullFace, FrontFace, RenderState, ShadingModel, Topology};
use crate::foundation::core::color_to_pixel;
use crate::raster::framebuffer::{DEPTH_MAX, FragmentOps, FrameBuffer};
use crate::raster::texture::{Texture, TextureStore};
use crate::raster::triangle::{
    ATTR_Q, ATTR_R, ATTR_S, ATTR_T, ATTR_Z, Attrs, FillSetup, RasterVertex,
};
use crate::raster::vertex::Vertex;

/// One primitive of a decomposed topology: vertex indices plus the provoking vertex used for
/// flat shading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Primitive {
    Point(usize),
    Line([usize; 2], usize),
    Triangle([usize; 3], usize),
}

/// Split `count` vertices of `topology` into independent primitives.
///
/// Strip triangles alternate their first two indices so every triangle keeps the winding of the
/// first one. Incomplete trailing groups are ignored.
pub(crate) fn decompose(topology: Topology, count: usize) -> Vec<Primitive> {
    use Primitive::{Line, Point, Triangle};

    let mut out = Vec::new();
    match topology {
        Topology::Points => out.extend((0..count).map(Point)),
        Topology::Lines => out.extend((0..count / 2).map(|i| Line([2 * i, 2 * i + 1], 2 * i + 1))),
        Topology::LineStrip | Topology::LineLoop => {
            if count >= 2 {
                out.extend((0..count - 1).map(|i| Line([i, i + 1], i + 1)));
                if topology == Topology::LineLoop && count > 2 {
                    out.push(Line([count - 1, 0], 0));
                }
            }
        }
        Topology::Triangles => {
            out.extend((0..count / 3).map(|i| Triangle([3 * i, 3 * i + 1, 3 * i + 2], 3 * i + 2)));
        }
        Topology::TriangleStrip => {
            out.extend((0..count.saturating_sub(2)).map(|i| {
                let tri = if i % 2 == 0 {
                    [i, i + 1, i + 2]
                } else {
                    [i + 1, i, i + 2]
                };
                Triangle(tri, i + 2)
            }));
        }
        Topology::TriangleFan => {
            out.extend((0..count.saturating_sub(2)).map(|i| Triangle([0, i + 1, i + 2], i + 2)));
        }
        Topology::Polygon => {
            out.extend((0..count.saturating_sub(2)).map(|i| Triangle([0, i + 1, i + 2], 0)));
        }
        Topology::Quads => {
            for q in 0..count / 4 {
                let b = 4 * q;
                out.push(Triangle([b, b + 1, b + 2], b + 3));
                out.push(Triangle([b, b + 2, b + 3], b + 3));
            }
        }
        Topology::QuadStrip => {
            for q in 0..count.saturating_sub(2) / 2 {
                let b = 2 * q;
                out.push(Triangle([b, b + 1, b + 3], b + 3));
                out.push(Triangle([b, b + 3, b + 2], b + 3));
            }
        }
    }
    out
}

/// Per-draw inputs shared by every primitive of a call.
struct Raster<'a> {
    state: &'a RenderState,
    ops: FragmentOps,
    texture: Option<&'a Texture>,
}

impl Raster<'_> {
    fn setup(&self, provoking: &Vertex) -> FillSetup<'_> {
        FillSetup {
            ops: self.ops,
            flat: (self.state.shading == ShadingModel::Flat)
                .then(|| color_to_pixel(provoking.color)),
            texture: self.texture,
            perspective: self.state.perspective_correct,
        }
    }

    /// Snap a projected vertex to the pixel grid and build its interpolants.
    fn snap(&self, v: &Vertex) -> RasterVertex {
        let [sx, sy, sz] = v.screen;
        let mut a = [0.0f32; 8];
        a[ATTR_Z] = sz * DEPTH_MAX as f32;
        for i in 0..4 {
            a[ATTR_R + i] = v.color[i].clamp(0.0, 1.0) * 255.0;
        }
        let (s, t) = (v.texcoord[0], v.texcoord[1]);
        if self.state.perspective_correct && v.clip.w > 0.0 {
            let q = 1.0 / v.clip.w;
            a[ATTR_S] = s * q;
            a[ATTR_T] = t * q;
            a[ATTR_Q] = q;
        } else {
            a[ATTR_S] = s;
            a[ATTR_T] = t;
            a[ATTR_Q] = 1.0;
        }
        RasterVertex {
            x: (sx + 0.5).floor() as i32,
            y: (sy + 0.5).floor() as i32,
            attrs: Attrs(a),
        }
    }

    fn is_culled(&self, tri: &[RasterVertex; 3]) -> bool {
        let Some(face) = self.state.cull_face else {
            return false;
        };
        let [p0, p1, p2] = tri;
        let area = i64::from(p1.x - p0.x) * i64::from(p2.y - p0.y)
            - i64::from(p2.x - p0.x) * i64::from(p1.y - p0.y);
        // Screen Y points down, so a counter-clockwise NDC triangle has negative screen area.
        let front = match self.state.front_face {
            FrontFace::Ccw => area < 0,
            FrontFace::Cw => area > 0,
        };
        match face {
            CullFace::Front => front,
            CullFace::Back => !front,
            CullFace::FrontAndBack => true,
        }
    }

    fn triangle(&self, fb: &mut FrameBuffer, tri: [&Vertex; 3], provoking: &Vertex) {
        let codes = tri.map(|v| v.clip_code);
        if codes[0] & codes[1] & codes[2] != 0 {
            return;
        }
        let setup = self.setup(provoking);
        if codes[0] | codes[1] | codes[2] == 0 {
            let snapped = tri.map(|v| self.snap(v));
            if !self.is_culled(&snapped) {
                triangle::fill_triangle(fb, &setup, snapped);
            }
            return;
        }

        let poly = clip::clip_polygon(&tri.map(|v| *v));
        if poly.len() < 3 {
            return;
        }
        let snapped: smallvec::SmallVec<[RasterVertex; 9]> = poly
            .iter()
            .map(|v| self.snap(&v.projected(&self.state.viewport)))
            .collect();
        for i in 1..snapped.len() - 1 {
            let sub = [snapped[0], snapped[i], snapped[i + 1]];
            if !self.is_culled(&sub) {
                triangle::fill_triangle(fb, &setup, sub);
            }
        }
    }

    fn line(&self, fb: &mut FrameBuffer, a: &Vertex, b: &Vertex, provoking: &Vertex) {
        let Some((a, b)) = clip::clip_line(a, b) else {
            return;
        };
        let vp = &self.state.viewport;
        let (a, b) = (self.snap(&a.projected(vp)), self.snap(&b.projected(vp)));
        line::draw_line(fb, &self.setup(provoking), a, b);
    }

    fn point(&self, fb: &mut FrameBuffer, v: &Vertex) {
        if !v.is_inside() {
            return;
        }
        line::draw_point(fb, &self.setup(v), self.snap(v));
    }
}

/// Rasterize a committed vertex run with `state`.
///
/// Vertices must already carry their screen projection. The framebuffer scissor bounds every
/// write; the caller sets it. A bound texture without contents is ignored.
pub(crate) fn draw_primitives(
    fb: &mut FrameBuffer,
    state: &RenderState,
    topology: Topology,
    vertices: &[Vertex],
    textures: &TextureStore,
) {
    let raster = Raster {
        state,
        ops: FragmentOps::from_state(state, fb),
        texture: state
            .texture
            .and_then(|binding| textures.get(binding.handle))
            .filter(|tex| tex.is_uploaded()),
    };
    for prim in decompose(topology, vertices.len()) {
        match prim {
            Primitive::Point(i) => raster.point(fb, &vertices[i]),
            Primitive::Line([a, b], p) => raster.line(fb, &vertices[a], &vertices[b], &vertices[p]),
            Primitive::Triangle([a, b, c], p) => {
                raster.triangle(fb, [&vertices[a], &vertices[b], &vertices[c]], &vertices[p]);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mod.rs"]
mod tests;
