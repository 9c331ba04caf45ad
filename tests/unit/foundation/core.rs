use super::*;

#[test]
fn canvas_rejects_zero_and_oversize() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, MAX_CANVAS_EDGE + 1).is_err());
    let c = Canvas::new(64, 32).unwrap();
    assert_eq!(c.pixel_count(), 64 * 32);
    assert_eq!(c.bounds(), Rect::new(0, 0, 64, 32));
}

#[test]
fn rect_edges_are_half_open() {
    let a = Rect::new(0, 0, 4, 4);
    let b = Rect::new(4, 0, 8, 4);
    assert!(!a.intersects(b));
    assert!(a.intersects(Rect::new(3, 3, 5, 5)));
    assert!(a.contains(3, 3));
    assert!(!a.contains(4, 3));
}

#[test]
fn rect_intersect_normalizes_empty() {
    let a = Rect::new(0, 0, 4, 4);
    let b = Rect::new(10, 10, 12, 12);
    assert_eq!(a.intersect(b), Rect::EMPTY);
    assert_eq!(a.intersect(Rect::new(2, 1, 9, 3)), Rect::new(2, 1, 4, 3));
}

#[test]
fn rect_union_ignores_empty_inputs() {
    let a = Rect::new(1, 2, 3, 4);
    assert_eq!(a.union(Rect::EMPTY), a);
    assert_eq!(Rect::new(5, 5, 5, 9).union(a), a);
    assert_eq!(a.union(Rect::new(10, 0, 11, 1)), Rect::new(1, 0, 11, 4));
}

#[test]
fn rect_containment_and_area() {
    let outer = Rect::new(0, 0, 10, 10);
    assert!(outer.contains_rect(Rect::new(2, 2, 10, 10)));
    assert!(!outer.contains_rect(Rect::new(2, 2, 11, 10)));
    assert!(outer.contains_rect(Rect::EMPTY));
    assert_eq!(outer.area(), 100);
    assert_eq!(Rect::new(3, 3, 1, 9).area(), 0);
}

#[test]
fn rect_enclosing_rounds_outward() {
    let r = Rect::enclosing(kurbo::Rect::new(1.2, 2.7, 3.1, 4.0));
    assert_eq!(r, Rect::new(1, 2, 4, 4));
}

#[test]
fn rect_pad_grows_each_edge() {
    assert_eq!(Rect::new(2, 2, 4, 4).pad(2), Rect::new(0, 0, 6, 6));
    assert_eq!(Rect::EMPTY.pad(3), Rect::EMPTY);
}

#[test]
fn color_conversion_clamps_and_rounds() {
    assert_eq!(color_to_pixel([1.0, 0.0, 0.5, 2.0]), [255, 0, 128, 255]);
    assert_eq!(unorm_to_u8(-1.0), 0);
}
