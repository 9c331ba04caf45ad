use super::*;
use crate::foundation::math::Vec4;

const BOUNDS: Rect = Rect::new(0, 0, 64, 64);

fn projected(x: f32, y: f32, w: f32, state: &RenderState) -> Vertex {
    Vertex::new(Vec4::new(x, y, 0.0, w), [1.0; 4], [0.0; 2], [0.0; 3]).projected(&state.viewport)
}

fn triangle(state: &RenderState) -> Vec<Vertex> {
    vec![
        projected(-0.5, -0.5, 1.0, state),
        projected(0.5, -0.5, 1.0, state),
        projected(0.0, 0.5, 1.0, state),
    ]
}

#[test]
fn raster_dirty_rect_is_the_padded_vertex_box() {
    let state = RenderState::new(BOUNDS);
    let verts = triangle(&state);
    // Screen positions: (16, 48), (48, 48), (32, 16).
    assert_eq!(
        raster_dirty_rect(&verts, &state, 2, BOUNDS),
        Rect::new(14, 14, 51, 51)
    );
    assert_eq!(
        raster_dirty_rect(&verts, &state, 0, BOUNDS),
        Rect::new(15, 15, 50, 50)
    );
}

#[test]
fn raster_dirty_rect_is_clipped_to_the_scissor() {
    let mut state = RenderState::new(BOUNDS);
    state.scissor = Rect::new(0, 0, 20, 20);
    let verts = triangle(&state);
    assert_eq!(
        raster_dirty_rect(&verts, &state, 2, BOUNDS),
        Rect::new(14, 14, 20, 20)
    );
}

#[test]
fn runs_outside_one_plane_touch_nothing() {
    let state = RenderState::new(BOUNDS);
    let verts = vec![
        projected(2.0, 0.0, 1.0, &state),
        projected(3.0, 1.0, 1.0, &state),
        projected(2.5, -1.0, 1.0, &state),
    ];
    assert!(raster_dirty_rect(&verts, &state, 2, BOUNDS).is_empty());
}

#[test]
fn runs_behind_the_eye_cover_the_scissor() {
    let mut state = RenderState::new(BOUNDS);
    state.scissor = Rect::new(4, 4, 40, 40);
    let verts = vec![
        projected(0.0, 0.0, 1.0, &state),
        projected(0.5, 0.0, -1.0, &state),
        projected(0.0, 0.5, 1.0, &state),
    ];
    assert_eq!(raster_dirty_rect(&verts, &state, 2, BOUNDS), state.scissor);
}

#[test]
fn equal_runs_compare_equal_across_frames() {
    let state = RenderState::new(BOUNDS);
    let verts = triangle(&state);
    let mut arena = FrameArena::new(16);
    let prev = DrawCall::rasterization(state, Topology::Triangles, &verts, &mut arena, 2, BOUNDS);
    arena.advance();
    let cur = DrawCall::rasterization(state, Topology::Triangles, &verts, &mut arena, 2, BOUNDS);
    assert!(prev.same_output(&cur, &arena));

    let mut moved = verts.clone();
    moved[0] = projected(-0.4, -0.5, 1.0, &state);
    let other = DrawCall::rasterization(state, Topology::Triangles, &moved, &mut arena, 2, BOUNDS);
    assert!(!prev.same_output(&other, &arena));

    let mut red = state;
    red.color = [1.0, 0.0, 0.0, 1.0];
    let recolored = DrawCall::rasterization(red, Topology::Triangles, &verts, &mut arena, 2, BOUNDS);
    assert!(!prev.same_output(&recolored, &arena));
}

#[test]
fn stale_runs_never_match() {
    let state = RenderState::new(BOUNDS);
    let verts = triangle(&state);
    let mut arena = FrameArena::new(16);
    let old = DrawCall::rasterization(state, Topology::Triangles, &verts, &mut arena, 2, BOUNDS);
    arena.advance();
    arena.advance();
    let cur = DrawCall::rasterization(state, Topology::Triangles, &verts, &mut arena, 2, BOUNDS);
    assert!(!old.same_output(&cur, &arena));
}

#[test]
fn variants_never_match_each_other() {
    let state = RenderState::new(BOUNDS);
    let arena = FrameArena::new(1);
    let clear = DrawCall::clear(state, Some([0, 0, 0, 255]), None, BOUNDS);
    assert!(clear.same_output(&clear.clone(), &arena));
    let other = DrawCall::clear(state, Some([0, 0, 0, 255]), Some(0), BOUNDS);
    assert!(!clear.same_output(&other, &arena));
    assert_eq!(clear.dirty(), BOUNDS);
    assert_eq!(clear.kind(), "clear");
}

#[test]
fn replay_stays_inside_the_requested_rect() {
    let state = RenderState::new(BOUNDS);
    let verts = triangle(&state);
    let mut arena = FrameArena::new(16);
    let call = DrawCall::rasterization(state, Topology::Triangles, &verts, &mut arena, 2, BOUNDS);
    let textures = TextureStore::new();
    let images = ImageStore::new();
    let env = ReplayEnv {
        arena: &arena,
        textures: &textures,
        images: &images,
    };
    let mut fb = FrameBuffer::new(crate::foundation::core::Canvas::new(64, 64).unwrap(), [0, 0, 0, 255]);
    call.replay(&mut fb, &env, Rect::new(0, 0, 32, 64));
    assert_eq!(fb.pixel(30, 40), [255, 255, 255, 255]);
    assert_eq!(fb.pixel(34, 40), [0, 0, 0, 255]);
}
