use crate::foundation::core::Rect;
use crate::raster::framebuffer::ShadowMaskHandle;
use crate::raster::texture::TextureHandle;

/// Primitive topology accepted by [`crate::Context::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Independent single-pixel points.
    Points,
    /// Independent line segments, two vertices each.
    Lines,
    /// Connected segments through every vertex.
    LineStrip,
    /// Line strip closed back to the first vertex.
    LineLoop,
    /// Independent triangles, three vertices each.
    Triangles,
    /// Triangle strip with alternating winding.
    TriangleStrip,
    /// Triangle fan around the first vertex.
    TriangleFan,
    /// Independent quads, four vertices each.
    Quads,
    /// Quad strip, two vertices per additional quad.
    QuadStrip,
    /// Single convex polygon.
    Polygon,
}

impl Topology {
    /// Return `true` when `count` vertices form a complete primitive group for this topology.
    pub fn accepts_vertex_count(self, count: usize) -> bool {
        match self {
            Self::Points => true,
            Self::Lines => count.is_multiple_of(2),
            Self::LineStrip | Self::LineLoop => count != 1,
            Self::Triangles => count.is_multiple_of(3),
            Self::TriangleStrip | Self::TriangleFan | Self::Polygon => count == 0 || count >= 3,
            Self::Quads => count.is_multiple_of(4),
            Self::QuadStrip => count == 0 || (count >= 4 && count.is_multiple_of(2)),
        }
    }
}

/// Comparison used by depth and alpha tests: the test passes when `incoming <func> stored`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareFunc {
    /// Never passes.
    Never,
    /// Passes when incoming < reference.
    Less,
    /// Passes when incoming == reference.
    Equal,
    /// Passes when incoming <= reference.
    LessEqual,
    /// Passes when incoming > reference.
    Greater,
    /// Passes when incoming != reference.
    NotEqual,
    /// Passes when incoming >= reference.
    GreaterEqual,
    /// Always passes.
    Always,
}

impl CompareFunc {
    /// Evaluate the comparison.
    #[inline]
    pub fn test<T: PartialOrd>(self, incoming: T, reference: T) -> bool {
        match self {
            Self::Never => false,
            Self::Less => incoming < reference,
            Self::Equal => incoming == reference,
            Self::LessEqual => incoming <= reference,
            Self::Greater => incoming > reference,
            Self::NotEqual => incoming != reference,
            Self::GreaterEqual => incoming >= reference,
            Self::Always => true,
        }
    }
}

/// Source/destination blend factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    /// `0`
    Zero,
    /// `1`
    One,
    /// Source color.
    SrcColor,
    /// `1 - source color`.
    OneMinusSrcColor,
    /// Destination color.
    DstColor,
    /// `1 - destination color`.
    OneMinusDstColor,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
    /// Destination alpha.
    DstAlpha,
    /// `1 - destination alpha`.
    OneMinusDstAlpha,
}

/// Which faces face culling removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullFace {
    /// Cull front-facing triangles.
    Front,
    /// Cull back-facing triangles.
    Back,
    /// Cull every triangle (lines and points still draw).
    FrontAndBack,
}

/// Winding that counts as front-facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontFace {
    /// Counter-clockwise in normalized device coordinates (y up).
    Ccw,
    /// Clockwise in normalized device coordinates (y up).
    Cw,
}

/// Shading model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingModel {
    /// One color per primitive, taken from its provoking vertex.
    Flat,
    /// Colors interpolated across the primitive.
    Smooth,
}

/// How rasterized fragments interact with the bound shadow mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowMode {
    /// Shadow masks are ignored.
    Off,
    /// Fragments mark the mask and write no color or depth.
    WriteMask,
    /// Fragments only draw where the mask is set.
    ApplyMask,
}

/// Toggleable capability for [`crate::Context::enable`] / [`crate::Context::disable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Blending with the configured factors.
    Blend,
    /// Alpha test with the configured function and reference.
    AlphaTest,
    /// Depth test with the configured function.
    DepthTest,
    /// Face culling with the configured face.
    CullFace,
    /// Texturing from the bound texture.
    #[serde(rename = "texture_2d")]
    Texture2D,
    /// Scissor test with the configured rectangle.
    ScissorTest,
}

/// Mapping from normalized device coordinates to framebuffer pixels.
///
/// The origin is the top-left corner of the framebuffer; NDC `y = +1` maps to `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Largest accepted viewport offset or edge, keeping projected coordinates inside the
    /// 16.16 fixed-point range of the edge walker.
    pub const LIMIT: i32 = 8192;

    pub(crate) fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(-Self::LIMIT, Self::LIMIT),
            y: self.y.clamp(-Self::LIMIT, Self::LIMIT),
            width: self.width.min(Self::LIMIT as u32),
            height: self.height.min(Self::LIMIT as u32),
        }
    }

    /// Project an NDC position to screen space. Depth is returned in `[0, 1]`.
    #[inline]
    pub fn project(&self, ndc_x: f32, ndc_y: f32, ndc_z: f32) -> [f32; 3] {
        [
            self.x as f32 + (ndc_x + 1.0) * 0.5 * self.width as f32,
            self.y as f32 + (1.0 - ndc_y) * 0.5 * self.height as f32,
            ((ndc_z + 1.0) * 0.5).clamp(0.0, 1.0),
        ]
    }
}

/// Texture binding captured in a [`RenderState`]; the version pins the uploaded contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureBinding {
    /// Bound texture.
    pub handle: TextureHandle,
    /// Content version at record time.
    pub version: u64,
}

/// Flat snapshot of every non-vertex input that affects a draw call's output.
///
/// Two snapshots compare equal iff every field does, including the bound texture's content
/// version; frame differencing relies on this.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderState {
    /// Blending on/off.
    pub blend_enabled: bool,
    /// Source blend factor.
    pub blend_src: BlendFactor,
    /// Destination blend factor.
    pub blend_dst: BlendFactor,
    /// Alpha test on/off.
    pub alpha_test_enabled: bool,
    /// Alpha test comparison.
    pub alpha_func: CompareFunc,
    /// Alpha test reference value.
    pub alpha_ref: u8,
    /// Depth test on/off.
    pub depth_test_enabled: bool,
    /// Depth writes on/off (only effective with the depth test enabled).
    pub depth_write: bool,
    /// Depth test comparison.
    pub depth_func: CompareFunc,
    /// Culled faces, `None` when culling is disabled.
    pub cull_face: Option<CullFace>,
    /// Front-facing winding.
    pub front_face: FrontFace,
    /// Shading model.
    pub shading: ShadingModel,
    /// Effective texture, `None` when texturing is off or the bound texture has no contents.
    pub texture: Option<TextureBinding>,
    /// Perspective-correct texture coordinate interpolation.
    pub perspective_correct: bool,
    /// Shadow mask interaction.
    pub shadow_mode: ShadowMode,
    /// Shadow mask plane used by `shadow_mode`.
    pub shadow_mask: Option<ShadowMaskHandle>,
    /// Viewport transform.
    pub viewport: Viewport,
    /// Effective scissor, already clipped to the framebuffer.
    pub scissor: Rect,
    /// Current color; vertices capture it as they are emitted.
    pub color: [f32; 4],
}

impl RenderState {
    /// Default state for a framebuffer of the given extent.
    pub fn new(bounds: Rect) -> Self {
        Self {
            blend_enabled: false,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            alpha_test_enabled: false,
            alpha_func: CompareFunc::Always,
            alpha_ref: 0,
            depth_test_enabled: false,
            depth_write: true,
            depth_func: CompareFunc::Less,
            cull_face: None,
            front_face: FrontFace::Ccw,
            shading: ShadingModel::Smooth,
            texture: None,
            perspective_correct: true,
            shadow_mode: ShadowMode::Off,
            shadow_mask: None,
            viewport: Viewport {
                x: bounds.left,
                y: bounds.top,
                width: bounds.width(),
                height: bounds.height(),
            },
            scissor: bounds,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Return `true` when blending uses classic straight-alpha "over" factors.
    pub fn is_alpha_over(&self) -> bool {
        self.blend_src == BlendFactor::SrcAlpha && self.blend_dst == BlendFactor::OneMinusSrcAlpha
    }
}

#[cfg(test)]
#[path = "../../tests/unit/context/state.rs"]
mod tests;
