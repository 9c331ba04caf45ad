use crate::foundation::core::Rect;

/// Clip `rects` to `bounds` and merge intersecting ones into their union until no two
/// rectangles intersect. Contained rectangles disappear along the way.
///
/// The result covers every input pixel inside `bounds`, and merging it again returns it
/// unchanged.
pub(crate) fn merge_rects(rects: impl IntoIterator<Item = Rect>, bounds: Rect) -> Vec<Rect> {
    let mut out: Vec<Rect> = Vec::new();
    for rect in rects {
        let mut rect = rect.intersect(bounds);
        if rect.is_empty() {
            continue;
        }
        // Absorb every existing rectangle the growing union touches; repeat since each union
        // can reach rectangles the previous one missed.
        loop {
            let before = out.len();
            out.retain(|r| {
                if r.intersects(rect) {
                    rect = rect.union(*r);
                    false
                } else {
                    true
                }
            });
            if out.len() == before {
                break;
            }
        }
        out.push(rect);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/present/rects.rs"]
mod tests;
