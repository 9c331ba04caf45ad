use super::*;

const BOUNDS: Rect = Rect::new(0, 0, 100, 100);

fn covered(rects: &[Rect], x: i32, y: i32) -> bool {
    rects.iter().any(|r| r.contains(x, y))
}

#[test]
fn disjoint_rects_are_kept() {
    let out = merge_rects([Rect::new(0, 0, 10, 10), Rect::new(20, 20, 30, 30)], BOUNDS);
    assert_eq!(out, vec![Rect::new(0, 0, 10, 10), Rect::new(20, 20, 30, 30)]);
}

#[test]
fn overlapping_rects_merge_into_their_union() {
    let out = merge_rects([Rect::new(0, 0, 10, 10), Rect::new(5, 5, 15, 15)], BOUNDS);
    assert_eq!(out, vec![Rect::new(0, 0, 15, 15)]);
}

#[test]
fn contained_rects_disappear() {
    let out = merge_rects([Rect::new(2, 2, 4, 4), Rect::new(0, 0, 10, 10)], BOUNDS);
    assert_eq!(out, vec![Rect::new(0, 0, 10, 10)]);
}

#[test]
fn chained_unions_reach_a_fixed_point() {
    // The third rect bridges the first two only after it has merged with one of them.
    let out = merge_rects(
        [
            Rect::new(0, 0, 10, 10),
            Rect::new(30, 0, 40, 10),
            Rect::new(8, 8, 20, 20),
            Rect::new(18, 0, 32, 9),
        ],
        BOUNDS,
    );
    assert_eq!(out, vec![Rect::new(0, 0, 40, 20)]);
}

#[test]
fn rects_are_clipped_and_empties_dropped() {
    let out = merge_rects(
        [Rect::new(-10, -10, 5, 5), Rect::EMPTY, Rect::new(200, 200, 300, 300)],
        BOUNDS,
    );
    assert_eq!(out, vec![Rect::new(0, 0, 5, 5)]);
}

#[test]
fn merge_is_idempotent_and_covering() {
    let input = [
        Rect::new(3, 7, 21, 19),
        Rect::new(50, 50, 60, 61),
        Rect::new(15, 15, 40, 30),
        Rect::new(59, 0, 70, 51),
        Rect::new(80, 80, 81, 81),
        Rect::new(90, 10, 95, 15),
    ];
    let once = merge_rects(input, BOUNDS);
    assert_eq!(merge_rects(once.clone(), BOUNDS), once);
    for (i, a) in once.iter().enumerate() {
        for b in &once[i + 1..] {
            assert!(!a.intersects(*b), "{a:?} intersects {b:?}");
        }
    }
    for r in input {
        for y in r.top..r.bottom {
            for x in r.left..r.right {
                assert!(covered(&once, x, y));
            }
        }
    }
}
