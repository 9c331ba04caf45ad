use crate::blit::draw::{BlitTarget, BlitTransform};
use crate::context::matrix::MatrixMode;
use crate::context::opts::ContextOpts;
use crate::context::state::{
    BlendFactor, Capability, CompareFunc, CullFace, FrontFace, ShadingModel, ShadowMode, Topology,
};
use crate::foundation::core::Pixel;
use crate::raster::texture::{TextureFilter, TextureWrap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum PixelSourceDef {
    /// PNG file, relative to the script directory.
    File { path: String },
    Solid {
        width: u32,
        height: u32,
        color: Pixel,
    },
    Pixels {
        width: u32,
        height: u32,
        data: Vec<Pixel>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ImageDef {
    pub(crate) source: PixelSourceDef,
    #[serde(default)]
    pub(crate) color_key: Option<[u8; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TextureDef {
    pub(crate) source: PixelSourceDef,
    #[serde(default)]
    pub(crate) filter: TextureFilter,
    #[serde(default)]
    pub(crate) wrap: TextureWrap,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct VertexDef {
    pub(crate) position: [f32; 3],
    #[serde(default)]
    pub(crate) color: Option<[f32; 4]>,
    #[serde(default)]
    pub(crate) texcoord: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum CommandDef {
    Clear {
        #[serde(default)]
        color: Option<[f32; 4]>,
        #[serde(default)]
        depth: Option<f32>,
    },
    Enable {
        cap: Capability,
    },
    Disable {
        cap: Capability,
    },
    BlendFunc {
        src: BlendFactor,
        dst: BlendFactor,
    },
    AlphaFunc {
        func: CompareFunc,
        reference: f32,
    },
    DepthFunc {
        func: CompareFunc,
    },
    DepthMask {
        write: bool,
    },
    CullFace {
        face: CullFace,
    },
    FrontFace {
        face: FrontFace,
    },
    ShadeModel {
        model: ShadingModel,
    },
    PerspectiveCorrect {
        enabled: bool,
    },
    Viewport {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    Scissor {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    ShadowMode {
        mode: ShadowMode,
        #[serde(default)]
        mask: Option<String>,
    },
    Color {
        rgba: [f32; 4],
    },
    MatrixMode {
        mode: MatrixMode,
    },
    PushMatrix,
    PopMatrix,
    LoadIdentity,
    LoadMatrix {
        m: [f32; 16],
    },
    Translate {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
    Rotate {
        angle_deg: f32,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default = "one")]
        z: f32,
    },
    Scale {
        x: f32,
        y: f32,
        #[serde(default = "one")]
        z: f32,
    },
    Ortho {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    BindTexture {
        #[serde(default)]
        texture: Option<String>,
    },
    Draw {
        topology: Topology,
        vertices: Vec<VertexDef>,
    },
    Blit {
        image: String,
        #[serde(default)]
        transform: BlitTransform,
        #[serde(default)]
        target: BlitTarget,
    },
    UpdateImage {
        image: String,
        source: PixelSourceDef,
        #[serde(default)]
        color_key: Option<[u8; 3]>,
    },
}

fn one() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FrameDef {
    /// Present the same command list this many times.
    #[serde(default = "one_frame")]
    pub(crate) repeat: u32,
    #[serde(default)]
    pub(crate) commands: Vec<CommandDef>,
}

fn one_frame() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SceneDef {
    #[serde(default)]
    pub(crate) opts: ContextOpts,
    #[serde(default)]
    pub(crate) images: BTreeMap<String, ImageDef>,
    #[serde(default)]
    pub(crate) textures: BTreeMap<String, TextureDef>,
    #[serde(default)]
    pub(crate) shadow_masks: Vec<String>,
    #[serde(default)]
    pub(crate) frames: Vec<FrameDef>,
}
