use super::*;
use crate::context::state::RenderState;
use crate::foundation::core::Canvas;

fn fb(w: u32, h: u32) -> FrameBuffer {
    FrameBuffer::new(Canvas::new(w, h).unwrap(), [0, 0, 0, 255])
}

fn rv(x: i32, y: i32, rgb: [f32; 3]) -> RasterVertex {
    let mut a = [0.0; 8];
    a[ATTR_R] = rgb[0];
    a[ATTR_R + 1] = rgb[1];
    a[ATTR_R + 2] = rgb[2];
    a[ATTR_R + 3] = 255.0;
    a[ATTR_Q] = 1.0;
    RasterVertex {
        x,
        y,
        attrs: Attrs(a),
    }
}

fn setup(f: &FrameBuffer) -> FillSetup<'static> {
    let state = RenderState::new(f.canvas().bounds());
    FillSetup {
        ops: FragmentOps::from_state(&state, f),
        flat: None,
        texture: None,
        perspective: false,
    }
}

fn lit(f: &FrameBuffer) -> Vec<(u32, u32)> {
    let c = f.canvas();
    (0..c.height)
        .flat_map(|y| (0..c.width).map(move |x| (x, y)))
        .filter(|&(x, y)| f.pixel(x, y) != [0, 0, 0, 255])
        .collect()
}

#[test]
fn right_angle_triangle_covers_inclusive_spans() {
    let mut f = fb(8, 8);
    let s = setup(&f);
    let white = [255.0; 3];
    fill_triangle(&mut f, &s, [rv(0, 0, white), rv(4, 0, white), rv(0, 4, white)]);
    assert_eq!(f.pixel_writes(), 15);
    assert_eq!(f.pixel(4, 0), [255, 255, 255, 255]);
    assert_eq!(f.pixel(0, 4), [255, 255, 255, 255]);
    assert_eq!(f.pixel(4, 1), [0, 0, 0, 255]);
}

#[test]
fn vertex_order_does_not_change_coverage() {
    let white = [255.0; 3];
    let tri = [rv(1, 1, white), rv(6, 2, white), rv(3, 7, white)];
    let mut reference = fb(8, 8);
    let s = setup(&reference);
    fill_triangle(&mut reference, &s, tri);

    for perm in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
        let mut f = fb(8, 8);
        fill_triangle(&mut f, &s, perm.map(|i| tri[i]));
        assert_eq!(lit(&f), lit(&reference), "permutation {perm:?}");
    }
}

#[test]
fn collinear_vertices_draw_nothing() {
    let mut f = fb(8, 8);
    let s = setup(&f);
    let c = [255.0; 3];
    fill_triangle(&mut f, &s, [rv(0, 0, c), rv(3, 3, c), rv(6, 6, c)]);
    fill_triangle(&mut f, &s, [rv(2, 2, c), rv(2, 2, c), rv(2, 2, c)]);
    assert_eq!(f.pixel_writes(), 0);
}

#[test]
fn smooth_colors_hit_vertex_values() {
    let mut f = fb(16, 16);
    let s = setup(&f);
    fill_triangle(
        &mut f,
        &s,
        [
            rv(0, 0, [255.0, 0.0, 0.0]),
            rv(12, 0, [0.0, 255.0, 0.0]),
            rv(0, 12, [0.0, 0.0, 255.0]),
        ],
    );
    assert_eq!(f.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(f.pixel(12, 0), [0, 255, 0, 255]);
    assert_eq!(f.pixel(0, 12), [0, 0, 255, 255]);
    let mid = f.pixel(4, 4);
    assert!(mid[0] > 0 && mid[1] > 0 && mid[2] > 0);
}

#[test]
fn scissored_halves_match_an_unscissored_draw() {
    let tri = [
        rv(0, 1, [255.0, 0.0, 0.0]),
        rv(13, 3, [0.0, 255.0, 0.0]),
        rv(5, 14, [0.0, 0.0, 255.0]),
    ];
    let mut whole = fb(16, 16);
    let s = setup(&whole);
    fill_triangle(&mut whole, &s, tri);

    let mut split = fb(16, 16);
    split.set_scissor(Rect::new(0, 0, 7, 16));
    fill_triangle(&mut split, &s, tri);
    split.set_scissor(Rect::new(7, 0, 16, 9));
    fill_triangle(&mut split, &s, tri);
    split.set_scissor(Rect::new(7, 9, 16, 16));
    fill_triangle(&mut split, &s, tri);

    assert_eq!(split.pixels(), whole.pixels());
}

#[test]
fn flat_color_overrides_interpolation() {
    let mut f = fb(8, 8);
    let mut s = setup(&f);
    s.flat = Some([9, 8, 7, 255]);
    fill_triangle(
        &mut f,
        &s,
        [rv(0, 0, [255.0; 3]), rv(5, 0, [0.0; 3]), rv(0, 5, [100.0; 3])],
    );
    assert_eq!(f.pixel(1, 1), [9, 8, 7, 255]);
    assert_eq!(f.pixel(5, 0), [9, 8, 7, 255]);
}
