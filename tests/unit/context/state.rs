use super::*;
use crate::raster::texture::TextureHandle;

#[test]
fn topology_vertex_counts() {
    assert!(Topology::Triangles.accepts_vertex_count(6));
    assert!(!Topology::Triangles.accepts_vertex_count(4));
    assert!(Topology::Lines.accepts_vertex_count(0));
    assert!(!Topology::Lines.accepts_vertex_count(3));
    assert!(!Topology::TriangleFan.accepts_vertex_count(2));
    assert!(Topology::QuadStrip.accepts_vertex_count(6));
    assert!(!Topology::QuadStrip.accepts_vertex_count(5));
    assert!(!Topology::QuadStrip.accepts_vertex_count(2));
    assert!(Topology::Points.accepts_vertex_count(7));
    assert!(!Topology::LineLoop.accepts_vertex_count(1));
}

#[test]
fn compare_funcs_follow_their_names() {
    assert!(CompareFunc::Less.test(1, 2));
    assert!(!CompareFunc::Less.test(2, 2));
    assert!(CompareFunc::LessEqual.test(2, 2));
    assert!(CompareFunc::GreaterEqual.test(3, 2));
    assert!(CompareFunc::NotEqual.test(3, 2));
    assert!(!CompareFunc::Never.test(0, 0));
    assert!(CompareFunc::Always.test(9, 0));
}

#[test]
fn state_equality_includes_texture_version() {
    let base = RenderState::new(Rect::new(0, 0, 8, 8));
    let mut a = base;
    let mut b = base;
    a.texture = Some(TextureBinding {
        handle: TextureHandle(0),
        version: 1,
    });
    b.texture = Some(TextureBinding {
        handle: TextureHandle(0),
        version: 2,
    });
    assert_ne!(a, b);
    b.texture = a.texture;
    assert_eq!(a, b);
}

#[test]
fn viewport_projects_ndc_corners_to_pixel_edges() {
    let vp = Viewport {
        x: 0,
        y: 0,
        width: 100,
        height: 50,
    };
    assert_eq!(vp.project(-1.0, 1.0, -1.0), [0.0, 0.0, 0.0]);
    assert_eq!(vp.project(1.0, -1.0, 1.0), [100.0, 50.0, 1.0]);
}

#[test]
fn viewport_is_clamped_to_fixed_point_range() {
    let vp = Viewport {
        x: -100_000,
        y: 5,
        width: 1 << 20,
        height: 10,
    }
    .clamped();
    assert_eq!(vp.x, -Viewport::LIMIT);
    assert_eq!(vp.width, Viewport::LIMIT as u32);
    assert_eq!(vp.height, 10);
}
