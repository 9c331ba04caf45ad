use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::blit::image::MAX_IMAGE_EDGE;
use crate::context::opts::ContextOpts;
use crate::foundation::error::{SoftGlError, SoftGlResult};
use crate::raster::texture::MAX_TEXTURE_EDGE;
use crate::scene::model::{CommandDef, PixelSourceDef, SceneDef};

/// A parsed scene script: options, named resources and a list of frames.
///
/// File sources resolve relative to the script's directory.
#[derive(Debug, Clone)]
pub struct SceneScript {
    def: SceneDef,
    base_dir: PathBuf,
}

impl SceneScript {
    /// Parse a script from a JSON reader; file sources resolve against `base_dir`.
    pub fn from_reader<R: std::io::Read>(r: R, base_dir: impl Into<PathBuf>) -> SoftGlResult<Self> {
        let def: SceneDef = serde_json::from_reader(r)
            .map_err(|e| SoftGlError::serde(format!("parse scene JSON: {e}")))?;
        let script = Self {
            def,
            base_dir: base_dir.into(),
        };
        script.validate()?;
        Ok(script)
    }

    /// Parse a script from a JSON string with the current directory as base.
    pub fn from_json_str(s: &str) -> SoftGlResult<Self> {
        Self::from_reader(s.as_bytes(), ".")
    }

    /// Parse a script from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SoftGlResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SoftGlError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_reader(BufReader::new(f), base)
    }

    /// Check options and every resource reference.
    pub fn validate(&self) -> SoftGlResult<()> {
        self.def.opts.validate()?;
        for (name, image) in &self.def.images {
            validate_source(&image.source, MAX_IMAGE_EDGE)
                .map_err(|e| prefix(e, "image", name))?;
        }
        for (name, texture) in &self.def.textures {
            validate_source(&texture.source, MAX_TEXTURE_EDGE)
                .map_err(|e| prefix(e, "texture", name))?;
        }
        for (index, frame) in self.def.frames.iter().enumerate() {
            for cmd in &frame.commands {
                self.validate_command(cmd)
                    .map_err(|e| SoftGlError::validation(format!("frame {index}: {e}")))?;
            }
        }
        Ok(())
    }

    fn validate_command(&self, cmd: &CommandDef) -> Result<(), String> {
        match cmd {
            CommandDef::Draw { topology, vertices } => {
                if !topology.accepts_vertex_count(vertices.len()) {
                    return Err(format!(
                        "{} vertices do not form whole {topology:?} primitives",
                        vertices.len()
                    ));
                }
            }
            CommandDef::Blit { image, .. } => {
                if !self.def.images.contains_key(image) {
                    return Err(format!("unknown image '{image}'"));
                }
            }
            CommandDef::UpdateImage { image, source, .. } => {
                if !self.def.images.contains_key(image) {
                    return Err(format!("unknown image '{image}'"));
                }
                validate_source(source, MAX_IMAGE_EDGE)
                    .map_err(|e| format!("update of image '{image}': {e}"))?;
            }
            CommandDef::BindTexture {
                texture: Some(texture),
            } => {
                if !self.def.textures.contains_key(texture) {
                    return Err(format!("unknown texture '{texture}'"));
                }
            }
            CommandDef::ShadowMode {
                mask: Some(mask), ..
            } => {
                if !self.def.shadow_masks.contains(mask) {
                    return Err(format!("unknown shadow mask '{mask}'"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Context options declared by the script.
    pub fn opts(&self) -> &ContextOpts {
        &self.def.opts
    }

    /// Override the script's dirty-rectangle setting.
    pub fn set_dirty_rects(&mut self, enabled: bool) {
        self.def.opts.dirty_rects = enabled;
    }

    /// Number of presented frames, counting repeats.
    pub fn frame_count(&self) -> u64 {
        self.def.frames.iter().map(|f| u64::from(f.repeat)).sum()
    }

    pub(crate) fn def(&self) -> &SceneDef {
        &self.def
    }

    pub(crate) fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

fn prefix(e: SoftGlError, kind: &str, name: &str) -> SoftGlError {
    SoftGlError::validation(format!("{kind} '{name}': {e}"))
}

/// Declared sizes are checked before any pixel buffer is allocated.
fn validate_source(source: &PixelSourceDef, max_edge: u32) -> SoftGlResult<()> {
    match source {
        PixelSourceDef::File { path } if path.is_empty() => {
            Err(SoftGlError::validation("file source needs a path"))
        }
        PixelSourceDef::Solid { width, height, .. } if *width == 0 || *height == 0 => {
            Err(SoftGlError::validation("solid source needs a non-zero size"))
        }
        PixelSourceDef::Solid { width, height, .. }
        | PixelSourceDef::Pixels { width, height, .. }
            if *width > max_edge || *height > max_edge =>
        {
            Err(SoftGlError::validation(format!(
                "source {width}x{height} exceeds the {max_edge} pixel edge limit"
            )))
        }
        PixelSourceDef::Pixels {
            width,
            height,
            data,
        } if (*width as usize) * (*height as usize) != data.len() => {
            Err(SoftGlError::validation(format!(
                "pixel source declares {width}x{height} but holds {} pixels",
                data.len()
            )))
        }
        _ => Ok(()),
    }
}
