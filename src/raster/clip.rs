//! Frustum clipping in homogeneous clip space.

use smallvec::SmallVec;

use crate::raster::vertex::{CLIP_PLANES, Vertex, plane_distance};

/// A triangle clipped against six planes gains at most one vertex per plane.
pub(crate) type ClippedPolygon = SmallVec<[Vertex; 9]>;

/// Clip a convex polygon against every frustum plane the vertices straddle.
///
/// Returns an empty polygon when nothing survives. Interpolated vertices get fresh clip codes.
pub(crate) fn clip_polygon(input: &[Vertex]) -> ClippedPolygon {
    let mut poly: ClippedPolygon = input.iter().copied().collect();
    let code_or = input.iter().fold(0u8, |acc, v| acc | v.clip_code);

    for &plane in CLIP_PLANES.iter().filter(|&&p| code_or & p != 0) {
        if poly.len() < 3 {
            break;
        }
        let mut next = ClippedPolygon::new();
        for i in 0..poly.len() {
            let a = poly[i];
            let b = poly[(i + 1) % poly.len()];
            let da = plane_distance(a.clip, plane);
            let db = plane_distance(b.clip, plane);
            if da >= 0.0 {
                next.push(a);
            }
            if (da >= 0.0) != (db >= 0.0) {
                next.push(a.lerp(&b, da / (da - db)));
            }
        }
        poly = next;
    }

    if poly.len() < 3 {
        poly.clear();
    }
    poly
}

/// Clip a segment against the frustum (parametric Liang-Barsky style over the six planes).
pub(crate) fn clip_line(a: &Vertex, b: &Vertex) -> Option<(Vertex, Vertex)> {
    if a.clip_code & b.clip_code != 0 {
        return None;
    }
    if a.clip_code | b.clip_code == 0 {
        return Some((*a, *b));
    }
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for &plane in &CLIP_PLANES {
        let da = plane_distance(a.clip, plane);
        let db = plane_distance(b.clip, plane);
        match (da >= 0.0, db >= 0.0) {
            (true, true) => {}
            (false, false) => return None,
            (false, true) => t0 = t0.max(da / (da - db)),
            (true, false) => t1 = t1.min(da / (da - db)),
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a.lerp(b, t0), a.lerp(b, t1)))
}
