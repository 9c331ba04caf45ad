use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;

use crate::blit::image::ImageHandle;
use crate::context::Context;
use crate::context::matrix::{MATRIX_STACK_DEPTH, MatrixMode};
use crate::foundation::core::Pixel;
use crate::foundation::error::{SoftGlError, SoftGlResult};
use crate::foundation::math::Mat4;
use crate::present::PresentStats;
use crate::raster::framebuffer::ShadowMaskHandle;
use crate::raster::texture::TextureHandle;
use crate::scene::model::{CommandDef, FrameDef, PixelSourceDef};
use crate::scene::script::SceneScript;

/// Plays a [`SceneScript`] on its own [`Context`], one presented frame at a time.
#[derive(Debug)]
pub struct SceneRunner {
    script: SceneScript,
    ctx: Context,
    images: HashMap<String, ImageHandle>,
    textures: HashMap<String, TextureHandle>,
    masks: HashMap<String, ShadowMaskHandle>,
    matrix_mode: MatrixMode,
    depths: [usize; 2],
}

fn load_pixels(source: &PixelSourceDef, base: &Path) -> SoftGlResult<(u32, u32, Vec<Pixel>)> {
    match source {
        PixelSourceDef::File { path } => {
            let full = base.join(path);
            let img = image::open(&full)
                .with_context(|| format!("decode image '{}'", full.display()))?
                .to_rgba8();
            let pixels = img.pixels().map(|p| p.0).collect();
            Ok((img.width(), img.height(), pixels))
        }
        PixelSourceDef::Solid {
            width,
            height,
            color,
        } => Ok((
            *width,
            *height,
            vec![*color; (*width as usize) * (*height as usize)],
        )),
        PixelSourceDef::Pixels {
            width,
            height,
            data,
        } => Ok((*width, *height, data.clone())),
    }
}

impl SceneRunner {
    /// Create the context and upload every resource the script declares.
    pub fn new(script: SceneScript) -> SoftGlResult<Self> {
        let mut ctx = Context::new(script.opts().clone())?;
        let def = script.def();

        let mut images = HashMap::new();
        for (name, image) in &def.images {
            let (w, h, pixels) = load_pixels(&image.source, script.base_dir())?;
            let handle = ctx.upload_image(w, h, &pixels, image.color_key)?;
            images.insert(name.clone(), handle);
        }

        let mut textures = HashMap::new();
        for (name, texture) in &def.textures {
            let (w, h, texels) = load_pixels(&texture.source, script.base_dir())?;
            let handle = ctx.gen_texture();
            ctx.upload_texture(handle, w, h, &texels)?;
            ctx.texture_params(handle, texture.filter, texture.wrap)?;
            textures.insert(name.clone(), handle);
        }

        let masks = def
            .shadow_masks
            .iter()
            .map(|name| (name.clone(), ctx.create_shadow_mask()))
            .collect();

        Ok(Self {
            script,
            ctx,
            images,
            textures,
            masks,
            matrix_mode: MatrixMode::ModelView,
            depths: [1, 1],
        })
    }

    /// The context the script draws into.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Play every frame, calling `on_frame` after each present.
    pub fn run(
        &mut self,
        mut on_frame: impl FnMut(&PresentStats, &Context) -> SoftGlResult<()>,
    ) -> SoftGlResult<Vec<PresentStats>> {
        let frames = self.script.def().frames.clone();
        let mut all = Vec::with_capacity(frames.len());
        for frame in &frames {
            for _ in 0..frame.repeat {
                let stats = self.run_frame(frame)?;
                on_frame(&stats, &self.ctx)?;
                all.push(stats);
            }
        }
        Ok(all)
    }

    fn run_frame(&mut self, frame: &FrameDef) -> SoftGlResult<PresentStats> {
        for cmd in &frame.commands {
            self.apply(cmd)?;
        }
        Ok(self.ctx.present_frame())
    }

    fn depth_slot(&self) -> usize {
        match self.matrix_mode {
            MatrixMode::ModelView => 0,
            MatrixMode::Projection => 1,
        }
    }

    fn apply(&mut self, cmd: &CommandDef) -> SoftGlResult<()> {
        let ctx = &mut self.ctx;
        match cmd {
            CommandDef::Clear { color, depth } => ctx.clear(*color, *depth),
            CommandDef::Enable { cap } => ctx.enable(*cap),
            CommandDef::Disable { cap } => ctx.disable(*cap),
            CommandDef::BlendFunc { src, dst } => ctx.blend_func(*src, *dst),
            CommandDef::AlphaFunc { func, reference } => ctx.alpha_func(*func, *reference),
            CommandDef::DepthFunc { func } => ctx.depth_func(*func),
            CommandDef::DepthMask { write } => ctx.depth_mask(*write),
            CommandDef::CullFace { face } => ctx.cull_face(*face),
            CommandDef::FrontFace { face } => ctx.front_face(*face),
            CommandDef::ShadeModel { model } => ctx.shade_model(*model),
            CommandDef::PerspectiveCorrect { enabled } => ctx.set_perspective_correct(*enabled),
            CommandDef::Viewport {
                x,
                y,
                width,
                height,
            } => ctx.viewport(*x, *y, *width, *height),
            CommandDef::Scissor {
                x,
                y,
                width,
                height,
            } => ctx.scissor(*x, *y, *width, *height),
            CommandDef::ShadowMode { mode, mask } => {
                let mask = mask.as_ref().and_then(|name| self.masks.get(name).copied());
                ctx.shadow_mode(*mode, mask);
            }
            CommandDef::Color { rgba } => ctx.color(rgba[0], rgba[1], rgba[2], rgba[3]),
            CommandDef::MatrixMode { mode } => {
                ctx.matrix_mode(*mode);
                self.matrix_mode = *mode;
            }
            CommandDef::PushMatrix => {
                let slot = self.depth_slot();
                if self.depths[slot] >= MATRIX_STACK_DEPTH {
                    return Err(SoftGlError::validation("push_matrix overflows the matrix stack"));
                }
                self.depths[slot] += 1;
                self.ctx.push_matrix();
            }
            CommandDef::PopMatrix => {
                let slot = self.depth_slot();
                if self.depths[slot] <= 1 {
                    return Err(SoftGlError::validation("pop_matrix without a matching push"));
                }
                self.depths[slot] -= 1;
                self.ctx.pop_matrix();
            }
            CommandDef::LoadIdentity => ctx.load_identity(),
            CommandDef::LoadMatrix { m } => ctx.load_matrix(Mat4::from_cols_array(*m)),
            CommandDef::Translate { x, y, z } => ctx.translate(*x, *y, *z),
            CommandDef::Rotate { angle_deg, x, y, z } => ctx.rotate(*angle_deg, *x, *y, *z),
            CommandDef::Scale { x, y, z } => ctx.scale(*x, *y, *z),
            CommandDef::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => ctx.ortho(*left, *right, *bottom, *top, *near, *far),
            CommandDef::Frustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => ctx.frustum(*left, *right, *bottom, *top, *near, *far),
            CommandDef::BindTexture { texture } => {
                let handle = texture.as_ref().and_then(|name| self.textures.get(name).copied());
                ctx.bind_texture(handle);
            }
            CommandDef::Draw { topology, vertices } => {
                ctx.begin(*topology);
                for v in vertices {
                    if let Some([r, g, b, a]) = v.color {
                        ctx.color(r, g, b, a);
                    }
                    if let Some([s, t]) = v.texcoord {
                        ctx.texcoord(s, t);
                    }
                    let [x, y, z] = v.position;
                    ctx.vertex(x, y, z);
                }
                ctx.end();
            }
            CommandDef::Blit {
                image,
                transform,
                target,
            } => {
                let handle = self.image_handle(image)?;
                self.ctx.blit(handle, *transform, *target);
            }
            CommandDef::UpdateImage {
                image,
                source,
                color_key,
            } => {
                let handle = self.image_handle(image)?;
                let (w, h, pixels) = load_pixels(source, self.script.base_dir())?;
                self.ctx.update_image(handle, w, h, &pixels, *color_key)?;
            }
        }
        Ok(())
    }

    fn image_handle(&self, name: &str) -> SoftGlResult<ImageHandle> {
        self.images
            .get(name)
            .copied()
            .ok_or_else(|| SoftGlError::validation(format!("unknown image '{name}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/runner.rs"]
mod tests;
