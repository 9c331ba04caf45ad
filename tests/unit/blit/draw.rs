use super::*;
use crate::blit::image::ImageStore;
use crate::context::state::BlendFactor;
use crate::foundation::core::Canvas;

const T: Pixel = [0, 0, 0, 0];
const R: Pixel = [255, 0, 0, 255];
const G: Pixel = [0, 255, 0, 255];
const B: Pixel = [0, 0, 255, 255];
const W: Pixel = [255, 255, 255, 255];
const BG: Pixel = [0, 0, 0, 255];

fn fb() -> FrameBuffer {
    FrameBuffer::new(Canvas::new(32, 32).unwrap(), BG)
}

fn quad_image(store: &mut ImageStore) -> &BlitImage {
    let h = store.upload(2, 2, &[R, G, B, W], None).unwrap();
    store.get(h).unwrap()
}

#[test]
fn two_by_two_blit_dirties_exactly_its_destination() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let f = fb();
    let dirty = dirty_rect(img, &BlitTransform::at(10, 10), f.canvas().bounds());
    assert_eq!(dirty, Rect::new(10, 10, 12, 12));
}

#[test]
fn unscaled_opaque_blit_takes_the_line_path() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let mut state = RenderState::new(f.canvas().bounds());
    let t = BlitTransform::at(10, 10);
    let src = Rect::new(0, 0, 2, 2);
    assert_eq!(
        select_strategy(&state, img, &t, BlitTarget::Color, src, (2, 2)),
        BlitStrategy::LineCopy
    );
    state.blend_enabled = true;
    state.blend_src = BlendFactor::SrcAlpha;
    state.blend_dst = BlendFactor::OneMinusSrcAlpha;
    assert_eq!(
        select_strategy(&state, img, &t, BlitTarget::Color, src, (2, 2)),
        BlitStrategy::LineCopy
    );
    assert_eq!(
        select_strategy(&state, img, &t.with_flip(true, false), BlitTarget::Color, src, (2, 2)),
        BlitStrategy::PixelCopy
    );
    assert_eq!(
        select_strategy(&state, img, &t, BlitTarget::Depth, src, (2, 2)),
        BlitStrategy::PixelCopy
    );

    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    assert_eq!(f.pixel(10, 10), R);
    assert_eq!(f.pixel(11, 10), G);
    assert_eq!(f.pixel(10, 11), B);
    assert_eq!(f.pixel(11, 11), W);
    assert_eq!(f.pixel_writes(), 4);
}

#[test]
fn line_path_skips_transparent_runs_and_honors_scissor() {
    let mut store = ImageStore::new();
    let h = store.upload(4, 1, &[R, T, G, G], None).unwrap();
    let img = store.get(h).unwrap();
    let mut f = fb();
    f.set_scissor(Rect::new(0, 0, 3, 32));
    let state = RenderState::new(f.canvas().bounds());
    draw_blit(&mut f, &state, img, &BlitTransform::at(0, 0), BlitTarget::Color);
    assert_eq!(f.pixel(0, 0), R);
    assert_eq!(f.pixel(1, 0), BG);
    assert_eq!(f.pixel(2, 0), G);
    assert_eq!(f.pixel(3, 0), BG);
    assert_eq!(f.pixel_writes(), 2);
}

#[test]
fn flips_mirror_the_source() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    draw_blit(&mut f, &state, img, &BlitTransform::at(0, 0).with_flip(true, true), BlitTarget::Color);
    assert_eq!(f.pixel(0, 0), W);
    assert_eq!(f.pixel(1, 0), B);
    assert_eq!(f.pixel(0, 1), G);
    assert_eq!(f.pixel(1, 1), R);
}

#[test]
fn tint_scales_every_channel() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    let t = BlitTransform::at(0, 0).with_tint([0.5, 1.0, 1.0, 1.0]);
    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    assert_eq!(f.pixel(0, 0), [128, 0, 0, 255]);
    assert_eq!(f.pixel(1, 1), [128, 255, 255, 255]);
}

#[test]
fn scaled_blit_repeats_nearest_texels() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    let t = BlitTransform::at(4, 4).with_size(4, 4);
    assert_eq!(dirty_rect(img, &t, f.canvas().bounds()), Rect::new(4, 4, 8, 8));
    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    assert_eq!(f.pixel(4, 4), R);
    assert_eq!(f.pixel(5, 5), R);
    assert_eq!(f.pixel(6, 4), G);
    assert_eq!(f.pixel(7, 7), W);
    assert_eq!(f.pixel_writes(), 16);
}

#[test]
fn source_rect_selects_a_sub_image() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    let t = BlitTransform::at(3, 3).with_source(Rect::new(1, 0, 2, 2));
    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    assert_eq!(f.pixel(3, 3), G);
    assert_eq!(f.pixel(3, 4), W);
    assert_eq!(f.pixel_writes(), 2);
}

#[test]
fn quarter_turn_rotates_clockwise_about_the_origin() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    let t = BlitTransform::at(4, 4).with_rotation(90.0, [1.0, 1.0]);
    assert!(dirty_rect(img, &t, f.canvas().bounds()).contains_rect(Rect::new(4, 4, 6, 6)));
    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    assert_eq!(f.pixel(5, 4), R);
    assert_eq!(f.pixel(5, 5), G);
    assert_eq!(f.pixel(4, 5), W);
    assert_eq!(f.pixel(4, 4), B);
    assert_eq!(f.pixel_writes(), 4);
}

#[test]
fn depth_target_writes_rgb_as_depth() {
    let mut store = ImageStore::new();
    let h = store.upload(2, 1, &[[0x12, 0x34, 0x56, 255], T], None).unwrap();
    let img = store.get(h).unwrap();
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    draw_blit(&mut f, &state, img, &BlitTransform::at(0, 0), BlitTarget::Depth);
    assert_eq!(f.depth(0, 0), 0x0012_3456);
    assert_eq!(f.depth(1, 0), crate::raster::framebuffer::DEPTH_MAX);
    assert_eq!(f.pixel(0, 0), BG);
}

#[test]
fn zero_area_blits_do_nothing() {
    let mut store = ImageStore::new();
    let img = quad_image(&mut store);
    let mut f = fb();
    let state = RenderState::new(f.canvas().bounds());
    let t = BlitTransform::at(0, 0).with_size(0, 4);
    assert!(dirty_rect(img, &t, f.canvas().bounds()).is_empty());
    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    let t = BlitTransform::at(0, 0).with_source(Rect::new(5, 5, 9, 9));
    draw_blit(&mut f, &state, img, &t, BlitTarget::Color);
    assert_eq!(f.pixel_writes(), 0);
}
