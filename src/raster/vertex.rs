use crate::context::state::Viewport;
use crate::foundation::math::Vec4;

pub(crate) const CLIP_LEFT: u8 = 1 << 0;
pub(crate) const CLIP_RIGHT: u8 = 1 << 1;
pub(crate) const CLIP_BOTTOM: u8 = 1 << 2;
pub(crate) const CLIP_TOP: u8 = 1 << 3;
pub(crate) const CLIP_NEAR: u8 = 1 << 4;
pub(crate) const CLIP_FAR: u8 = 1 << 5;

pub(crate) const CLIP_PLANES: [u8; 6] = [
    CLIP_LEFT,
    CLIP_RIGHT,
    CLIP_BOTTOM,
    CLIP_TOP,
    CLIP_NEAR,
    CLIP_FAR,
];

/// Signed distance of `p` to a frustum plane; negative means outside.
#[inline]
pub(crate) fn plane_distance(p: Vec4, plane: u8) -> f32 {
    match plane {
        CLIP_LEFT => p.x + p.w,
        CLIP_RIGHT => p.w - p.x,
        CLIP_BOTTOM => p.y + p.w,
        CLIP_TOP => p.w - p.y,
        CLIP_NEAR => p.z + p.w,
        _ => p.w - p.z,
    }
}

/// Bit set of the frustum planes `p` lies outside of.
pub(crate) fn clip_code(p: Vec4) -> u8 {
    CLIP_PLANES
        .iter()
        .filter(|&&plane| plane_distance(p, plane) < 0.0)
        .fold(0, |acc, &plane| acc | plane)
}

/// A submitted vertex after the object-to-clip transform.
///
/// Equality covers every attribute plus the cached projection, so two recorded vertex runs
/// compare equal exactly when they rasterize identically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Clip-space position.
    pub clip: Vec4,
    /// Normalized RGBA color.
    pub color: [f32; 4],
    /// Texture coordinate.
    pub texcoord: [f32; 2],
    /// Normal, carried through for callers; no lighting is performed.
    pub normal: [f32; 3],
    pub(crate) screen: [f32; 3],
    pub(crate) clip_code: u8,
}

impl Vertex {
    /// Create an unprojected vertex.
    pub fn new(clip: Vec4, color: [f32; 4], texcoord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            clip,
            color,
            texcoord,
            normal,
            screen: [0.0; 3],
            clip_code: clip_code(clip),
        }
    }

    /// Screen-space position `[x, y, depth]` computed by [`Vertex::projected`].
    pub fn screen(&self) -> [f32; 3] {
        self.screen
    }

    /// Return `true` when the vertex is inside the canonical view volume.
    pub fn is_inside(&self) -> bool {
        self.clip_code == 0
    }

    /// Compute the clip code and the screen projection through `viewport`.
    ///
    /// Vertices on or behind the eye plane (`w <= 0`) keep a zero projection; they only reach
    /// the rasterizer through clipping.
    pub(crate) fn projected(mut self, viewport: &Viewport) -> Self {
        self.clip_code = clip_code(self.clip);
        self.screen = if self.clip.w > 0.0 {
            let inv_w = 1.0 / self.clip.w;
            viewport.project(self.clip.x * inv_w, self.clip.y * inv_w, self.clip.z * inv_w)
        } else {
            [0.0; 3]
        };
        self
    }

    pub(crate) fn lerp(&self, other: &Self, t: f32) -> Self {
        fn mix<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
            std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
        }
        Self::new(
            self.clip.lerp(other.clip, t),
            mix(self.color, other.color, t),
            mix(self.texcoord, other.texcoord, t),
            mix(self.normal, other.normal, t),
        )
    }

    /// Raw bit patterns of every field, for fingerprinting.
    pub(crate) fn bits(&self) -> impl Iterator<Item = u32> + '_ {
        let c = self.clip;
        [c.x, c.y, c.z, c.w]
            .into_iter()
            .chain(self.color)
            .chain(self.texcoord)
            .chain(self.normal)
            .chain(self.screen)
            .map(f32::to_bits)
            .chain(std::iter::once(u32::from(self.clip_code)))
    }
}
