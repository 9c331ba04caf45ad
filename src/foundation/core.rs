use crate::foundation::error::{SoftGlError, SoftGlResult};

/// RGBA8 pixel with straight (non-premultiplied) alpha.
pub type Pixel = [u8; 4];

/// Largest supported framebuffer edge, in pixels.
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Framebuffer dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with both edges in `1..=MAX_CANVAS_EDGE`.
    pub fn new(width: u32, height: u32) -> SoftGlResult<Self> {
        if width == 0 || height == 0 {
            return Err(SoftGlError::validation("canvas width and height must be > 0"));
        }
        if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
            return Err(SoftGlError::validation(format!(
                "canvas {width}x{height} exceeds the {MAX_CANVAS_EDGE} pixel edge limit"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// The full canvas extent as a rectangle anchored at the origin.
    pub fn bounds(self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// Axis-aligned integer rectangle covering `[left, right) x [top, bottom)`.
///
/// Any rectangle with `right <= left` or `bottom <= top` is empty; operations that can produce an
/// empty result normalize it to [`Rect::EMPTY`] so empty rectangles compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Inclusive left edge.
    pub left: i32,
    /// Inclusive top edge.
    pub top: i32,
    /// Exclusive right edge.
    pub right: i32,
    /// Exclusive bottom edge.
    pub bottom: i32,
}

impl Rect {
    /// The canonical empty rectangle.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_xywh(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(
            x,
            y,
            x.saturating_add(width.min(i32::MAX as u32) as i32),
            y.saturating_add(height.min(i32::MAX as u32) as i32),
        )
    }

    /// Smallest integer rectangle containing a floating-point one.
    pub fn enclosing(r: kurbo::Rect) -> Self {
        fn clamp_i32(v: f64) -> i32 {
            v.clamp(f64::from(i32::MIN / 2), f64::from(i32::MAX / 2)) as i32
        }
        let r = r.abs();
        Self::new(
            clamp_i32(r.x0.floor()),
            clamp_i32(r.y0.floor()),
            clamp_i32(r.x1.ceil()),
            clamp_i32(r.y1.ceil()),
        )
        .normalized()
    }

    fn normalized(self) -> Self {
        if self.is_empty() { Self::EMPTY } else { self }
    }

    /// Width in pixels, zero for empty rectangles.
    pub fn width(self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (i64::from(self.right) - i64::from(self.left)) as u32
        }
    }

    /// Height in pixels, zero for empty rectangles.
    pub fn height(self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (i64::from(self.bottom) - i64::from(self.top)) as u32
        }
    }

    /// Return `true` when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Number of covered pixels.
    pub fn area(self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Return `true` when both rectangles share at least one pixel.
    pub fn intersects(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Pixels covered by both rectangles.
    pub fn intersect(self, other: Self) -> Self {
        Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
        .normalized()
    }

    /// Smallest rectangle covering both rectangles. Empty inputs are ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other.normalized();
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Return `true` when every pixel of `other` is inside `self`.
    ///
    /// An empty `other` is contained by anything.
    pub fn contains_rect(self, other: Self) -> bool {
        other.is_empty()
            || (self.left <= other.left
                && self.top <= other.top
                && other.right <= self.right
                && other.bottom <= self.bottom)
    }

    /// Return `true` when pixel `(x, y)` is inside the rectangle.
    pub fn contains(self, x: i32, y: i32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// Grow every edge outward by `margin` pixels. Empty rectangles stay empty.
    pub fn pad(self, margin: i32) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }
        Self::new(
            self.left.saturating_sub(margin),
            self.top.saturating_sub(margin),
            self.right.saturating_add(margin),
            self.bottom.saturating_add(margin),
        )
        .normalized()
    }
}

/// Convert a normalized float color channel into an 8-bit value.
pub fn unorm_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert a normalized float RGBA color into a pixel.
pub fn color_to_pixel(c: [f32; 4]) -> Pixel {
    [
        unorm_to_u8(c[0]),
        unorm_to_u8(c[1]),
        unorm_to_u8(c[2]),
        unorm_to_u8(c[3]),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
