use super::*;
use crate::context::state::RenderState;

fn fb(w: u32, h: u32) -> FrameBuffer {
    FrameBuffer::new(Canvas::new(w, h).unwrap(), [0, 0, 0, 255])
}

#[test]
fn new_buffer_is_background_and_far() {
    let f = fb(4, 2);
    assert!(f.pixels().iter().all(|p| *p == [0, 0, 0, 255]));
    assert!(f.depths().iter().all(|d| *d == DEPTH_MAX));
    assert_eq!(f.scissor(), Rect::new(0, 0, 4, 2));
}

#[test]
fn scissor_is_clipped_to_bounds() {
    let mut f = fb(4, 4);
    f.set_scissor(Rect::new(-5, 2, 10, 3));
    assert_eq!(f.scissor(), Rect::new(0, 2, 4, 3));
}

#[test]
fn depth_test_rejects_farther_fragments() {
    let mut f = fb(2, 1);
    let mut state = RenderState::new(f.canvas().bounds());
    state.depth_test_enabled = true;
    let ops = FragmentOps::from_state(&state, &f);

    assert!(f.write_fragment(&ops, 0, 100, [255, 0, 0, 255]));
    assert!(!f.write_fragment(&ops, 0, 200, [0, 255, 0, 255]));
    assert_eq!(f.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(f.depth(0, 0), 100);
    assert_eq!(f.pixel_writes(), 1);
}

#[test]
fn depth_is_untouched_without_depth_test() {
    let mut f = fb(1, 1);
    let state = RenderState::new(f.canvas().bounds());
    let ops = FragmentOps::from_state(&state, &f);
    f.write_fragment(&ops, 0, 5, [1, 2, 3, 255]);
    assert_eq!(f.depth(0, 0), DEPTH_MAX);
}

#[test]
fn alpha_test_discards_before_write() {
    let mut f = fb(1, 1);
    let mut state = RenderState::new(f.canvas().bounds());
    state.alpha_test_enabled = true;
    state.alpha_func = CompareFunc::Greater;
    state.alpha_ref = 128;
    let ops = FragmentOps::from_state(&state, &f);
    assert!(!f.write_fragment(&ops, 0, 0, [255, 255, 255, 100]));
    assert!(f.write_fragment(&ops, 0, 0, [255, 255, 255, 200]));
}

#[test]
fn shadow_mask_write_then_apply() {
    let mut f = fb(2, 1);
    let mask = f.create_shadow_mask();
    let mut state = RenderState::new(f.canvas().bounds());
    state.shadow_mask = Some(mask);

    state.shadow_mode = ShadowMode::WriteMask;
    let write = FragmentOps::from_state(&state, &f);
    f.write_fragment(&write, 1, 0, [9, 9, 9, 255]);
    assert_eq!(f.shadow_mask(mask).unwrap(), &[0, 0xFF]);
    assert_eq!(f.pixel(1, 0), [0, 0, 0, 255]);

    state.shadow_mode = ShadowMode::ApplyMask;
    let apply = FragmentOps::from_state(&state, &f);
    assert!(!f.write_fragment(&apply, 0, 0, [50, 50, 50, 255]));
    assert!(f.write_fragment(&apply, 1, 0, [50, 50, 50, 255]));
    assert_eq!(f.pixel(1, 0), [50, 50, 50, 255]);
}

#[test]
fn reset_rect_restores_every_plane() {
    let mut f = fb(3, 3);
    let mask = f.create_shadow_mask();
    f.clear_rect(f.canvas().bounds(), Some([7, 7, 7, 7]), Some(3));
    let area = f.reset_rect(Rect::new(1, 1, 5, 5), [0, 0, 0, 255]);
    assert_eq!(area, 4);
    assert_eq!(f.pixel(0, 0), [7, 7, 7, 7]);
    assert_eq!(f.pixel(2, 2), [0, 0, 0, 255]);
    assert_eq!(f.depth(1, 2), DEPTH_MAX);
    assert!(f.shadow_mask(mask).unwrap().iter().all(|m| *m == 0));
}

#[test]
fn clear_respects_scissor() {
    let mut f = fb(4, 1);
    f.set_scissor(Rect::new(1, 0, 3, 1));
    f.clear_rect(f.canvas().bounds(), Some([1, 1, 1, 1]), None);
    assert_eq!(f.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(f.pixel(1, 0), [1, 1, 1, 1]);
    assert_eq!(f.pixel(3, 0), [0, 0, 0, 255]);
    assert_eq!(f.pixel_writes(), 2);
}

#[test]
fn to_frame_packs_rgba_rows() {
    let mut f = fb(2, 1);
    f.copy_span(0, 0, &[[1, 2, 3, 4], [5, 6, 7, 8]]);
    let frame = f.to_frame();
    assert_eq!(frame.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!((frame.width, frame.height), (2, 1));
}
