use super::*;
use crate::foundation::math::Vec4;

fn v(x: f32) -> Vertex {
    Vertex::new(Vec4::new(x, 0.0, 0.0, 1.0), [1.0; 4], [0.0; 2], [0.0; 3])
}

#[test]
fn slices_resolve_to_their_vertices() {
    let mut arena = FrameArena::new(8);
    let a = arena.alloc(&[v(0.0), v(1.0)]);
    let b = arena.alloc(&[v(2.0)]);
    assert_eq!(a.len(), 2);
    assert_eq!(arena.get(a).unwrap(), &[v(0.0), v(1.0)]);
    assert_eq!(arena.get(b).unwrap(), &[v(2.0)]);
    assert_eq!(arena.active_len(), 3);
}

#[test]
fn previous_frame_survives_one_advance() {
    let mut arena = FrameArena::new(8);
    let frame0 = arena.alloc(&[v(0.0)]);
    arena.advance();
    let frame1 = arena.alloc(&[v(1.0)]);
    assert_eq!(arena.get(frame0).unwrap(), &[v(0.0)]);
    assert_eq!(arena.get(frame1).unwrap(), &[v(1.0)]);

    arena.advance();
    assert!(arena.get(frame0).is_none());
    assert!(arena.get(frame1).is_some());
}

#[test]
fn reused_half_does_not_resurrect_old_slices() {
    let mut arena = FrameArena::new(8);
    let old = arena.alloc(&[v(0.0)]);
    arena.advance();
    arena.advance();
    arena.alloc(&[v(5.0)]);
    assert!(arena.get(old).is_none());
}

#[test]
fn growing_past_capacity_keeps_data() {
    let mut arena = FrameArena::new(2);
    let a = arena.alloc(&[v(0.0), v(1.0), v(2.0)]);
    let b = arena.alloc(&[v(3.0)]);
    assert_eq!(arena.get(a).unwrap().len(), 3);
    assert_eq!(arena.get(b).unwrap(), &[v(3.0)]);
}
