//! The explicit rendering context: state, resources, submission and presentation.

pub(crate) mod matrix;
pub(crate) mod opts;
pub(crate) mod state;
mod submit;

use crate::blit::draw::{BlitTarget, BlitTransform};
use crate::blit::image::{BlitImage, ImageHandle, ImageStore};
use crate::context::matrix::{MatrixMode, MatrixStack};
use crate::context::opts::ContextOpts;
use crate::context::state::{
    BlendFactor, Capability, CompareFunc, CullFace, FrontFace, RenderState, ShadingModel,
    ShadowMode, TextureBinding, Viewport,
};
use crate::foundation::core::{Canvas, Pixel, Rect, color_to_pixel};
use crate::foundation::error::SoftGlResult;
use crate::foundation::math::Mat4;
use crate::present::{PresentStats, Presenter};
use crate::raster::framebuffer::{DEPTH_MAX, FrameBuffer, FrameRGBA, ShadowMaskHandle};
use crate::raster::texture::{TextureFilter, TextureHandle, TextureStore, TextureWrap};
use crate::raster::vertex::Vertex;
use crate::record::Recorder;
use crate::record::draw_call::DrawCall;

/// Primitive group under construction between `begin` and `end`.
#[derive(Debug)]
struct PendingPrimitive {
    topology: state::Topology,
    vertices: Vec<Vertex>,
}

/// Software rendering context: owns the framebuffer, resources, draw-call queues and every
/// piece of mutable rendering state.
///
/// Rendering is deferred: submissions are recorded and only rasterized by
/// [`Context::present_frame`], which redraws the regions that changed since the previous frame.
#[derive(Debug)]
pub struct Context {
    opts: ContextOpts,
    canvas: Canvas,
    fb: FrameBuffer,
    recorder: Recorder,
    presenter: Presenter,
    textures: TextureStore,
    images: ImageStore,

    state: RenderState,
    scissor_enabled: bool,
    scissor_rect: Rect,
    texture_enabled: bool,
    bound_texture: Option<TextureHandle>,
    cull_enabled: bool,
    cull_mode: CullFace,

    matrix_mode: MatrixMode,
    modelview: MatrixStack,
    projection: MatrixStack,
    texcoord: [f32; 2],
    normal: [f32; 3],
    pending: Option<PendingPrimitive>,
}

impl Context {
    /// Create a context with a framebuffer cleared to the configured background.
    #[tracing::instrument(skip_all, fields(width = opts.width, height = opts.height))]
    pub fn new(opts: ContextOpts) -> SoftGlResult<Self> {
        let canvas = opts.validate()?;
        let bounds = canvas.bounds();
        tracing::debug!(
            dirty_rects = opts.dirty_rects,
            padding = opts.dirty_padding,
            arena_capacity = opts.arena_capacity,
            "context created"
        );
        Ok(Self {
            canvas,
            fb: FrameBuffer::new(canvas, opts.background),
            recorder: Recorder::new(opts.arena_capacity, opts.dirty_padding, bounds),
            presenter: Presenter::new(opts.dirty_rects, opts.background),
            textures: TextureStore::new(),
            images: ImageStore::new(),
            state: RenderState::new(bounds),
            scissor_enabled: false,
            scissor_rect: bounds,
            texture_enabled: false,
            bound_texture: None,
            cull_enabled: false,
            cull_mode: CullFace::Back,
            matrix_mode: MatrixMode::ModelView,
            modelview: MatrixStack::default(),
            projection: MatrixStack::default(),
            texcoord: [0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            pending: None,
            opts,
        })
    }

    /// Options the context was created with.
    pub fn opts(&self) -> &ContextOpts {
        &self.opts
    }

    /// Framebuffer extent.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    // ---- state ----

    /// Turn a capability on.
    pub fn enable(&mut self, cap: Capability) {
        self.set_capability(cap, true);
    }

    /// Turn a capability off.
    pub fn disable(&mut self, cap: Capability) {
        self.set_capability(cap, false);
    }

    fn set_capability(&mut self, cap: Capability, on: bool) {
        match cap {
            Capability::Blend => self.state.blend_enabled = on,
            Capability::AlphaTest => self.state.alpha_test_enabled = on,
            Capability::DepthTest => self.state.depth_test_enabled = on,
            Capability::CullFace => self.cull_enabled = on,
            Capability::Texture2D => self.texture_enabled = on,
            Capability::ScissorTest => self.scissor_enabled = on,
        }
    }

    /// Return `true` when a capability is on.
    pub fn is_enabled(&self, cap: Capability) -> bool {
        match cap {
            Capability::Blend => self.state.blend_enabled,
            Capability::AlphaTest => self.state.alpha_test_enabled,
            Capability::DepthTest => self.state.depth_test_enabled,
            Capability::CullFace => self.cull_enabled,
            Capability::Texture2D => self.texture_enabled,
            Capability::ScissorTest => self.scissor_enabled,
        }
    }

    /// Set the blend factors used while [`Capability::Blend`] is on.
    pub fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state.blend_src = src;
        self.state.blend_dst = dst;
    }

    /// Set the alpha test; `reference` is a normalized alpha.
    pub fn alpha_func(&mut self, func: CompareFunc, reference: f32) {
        self.state.alpha_func = func;
        self.state.alpha_ref = crate::foundation::core::unorm_to_u8(reference);
    }

    /// Set the depth comparison.
    pub fn depth_func(&mut self, func: CompareFunc) {
        self.state.depth_func = func;
    }

    /// Enable or disable depth writes.
    pub fn depth_mask(&mut self, write: bool) {
        self.state.depth_write = write;
    }

    /// Select the faces removed while [`Capability::CullFace`] is on.
    pub fn cull_face(&mut self, face: CullFace) {
        self.cull_mode = face;
    }

    /// Select the front-facing winding.
    pub fn front_face(&mut self, face: FrontFace) {
        self.state.front_face = face;
    }

    /// Select flat or smooth shading.
    pub fn shade_model(&mut self, model: ShadingModel) {
        self.state.shading = model;
    }

    /// Toggle perspective-correct texture interpolation.
    pub fn set_perspective_correct(&mut self, enabled: bool) {
        self.state.perspective_correct = enabled;
    }

    /// Set the viewport. Offsets and sizes are clamped to [`Viewport::LIMIT`].
    pub fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.state.viewport = Viewport {
            x,
            y,
            width,
            height,
        }
        .clamped();
    }

    /// Set the scissor rectangle used while [`Capability::ScissorTest`] is on.
    pub fn scissor(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.scissor_rect = Rect::from_xywh(x, y, width, height);
    }

    /// Route rasterized fragments through a shadow mask.
    pub fn shadow_mode(&mut self, mode: ShadowMode, mask: Option<ShadowMaskHandle>) {
        self.state.shadow_mode = mode;
        self.state.shadow_mask = mask;
    }

    /// Snapshot of the state a draw call recorded now would capture.
    pub fn render_state(&self) -> RenderState {
        let bounds = self.canvas.bounds();
        let mut state = self.state;
        state.scissor = if self.scissor_enabled {
            self.scissor_rect.intersect(bounds)
        } else {
            bounds
        };
        state.cull_face = self.cull_enabled.then_some(self.cull_mode);
        state.texture = if self.texture_enabled {
            self.bound_texture.and_then(|handle| {
                self.textures
                    .get(handle)
                    .filter(|tex| tex.is_uploaded())
                    .map(|tex| TextureBinding {
                        handle,
                        version: tex.version(),
                    })
            })
        } else {
            None
        };
        state
    }

    // ---- matrices ----

    /// Select the stack matrix operations apply to.
    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.matrix_mode = mode;
    }

    fn stack_mut(&mut self) -> &mut MatrixStack {
        match self.matrix_mode {
            MatrixMode::ModelView => &mut self.modelview,
            MatrixMode::Projection => &mut self.projection,
        }
    }

    /// Duplicate the current matrix. Panics when the stack is full.
    pub fn push_matrix(&mut self) {
        self.stack_mut().push();
    }

    /// Restore the previously pushed matrix. Panics when nothing was pushed.
    pub fn pop_matrix(&mut self) {
        self.stack_mut().pop();
    }

    /// Replace the current matrix with the identity.
    pub fn load_identity(&mut self) {
        self.stack_mut().load(Mat4::IDENTITY);
    }

    /// Replace the current matrix.
    pub fn load_matrix(&mut self, m: Mat4) {
        self.stack_mut().load(m);
    }

    /// Post-multiply the current matrix.
    pub fn mult_matrix(&mut self, m: Mat4) {
        self.stack_mut().mult(m);
    }

    /// Post-multiply by a translation.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.mult_matrix(Mat4::translation(x, y, z));
    }

    /// Post-multiply by a rotation of `angle_deg` degrees about `(x, y, z)`.
    pub fn rotate(&mut self, angle_deg: f32, x: f32, y: f32, z: f32) {
        self.mult_matrix(Mat4::rotation(angle_deg, x, y, z));
    }

    /// Post-multiply by a scale.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mult_matrix(Mat4::scaling(x, y, z));
    }

    /// Post-multiply by an orthographic projection.
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.mult_matrix(Mat4::ortho(left, right, bottom, top, near, far));
    }

    /// Post-multiply by a perspective projection.
    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.mult_matrix(Mat4::frustum(left, right, bottom, top, near, far));
    }

    /// Current matrix of the given stack.
    pub fn matrix(&self, mode: MatrixMode) -> Mat4 {
        match mode {
            MatrixMode::ModelView => *self.modelview.top(),
            MatrixMode::Projection => *self.projection.top(),
        }
    }

    // ---- textures ----

    /// Allocate a texture name.
    pub fn gen_texture(&mut self) -> TextureHandle {
        self.textures.generate()
    }

    /// Upload RGBA8 texels for a texture name.
    pub fn upload_texture(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        texels: &[Pixel],
    ) -> SoftGlResult<()> {
        self.textures.upload(handle, width, height, texels)
    }

    /// Set filtering and wrapping for a texture.
    pub fn texture_params(
        &mut self,
        handle: TextureHandle,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> SoftGlResult<()> {
        self.textures.set_params(handle, filter, wrap)
    }

    /// Bind a texture for subsequent draws, or unbind with `None`.
    pub fn bind_texture(&mut self, handle: Option<TextureHandle>) {
        self.bound_texture = handle;
    }

    /// Release a texture name, unbinding it when bound.
    pub fn delete_texture(&mut self, handle: TextureHandle) {
        if self.bound_texture == Some(handle) {
            self.bound_texture = None;
        }
        self.textures.delete(handle);
    }

    // ---- images ----

    /// Upload a blit image. Pixels whose RGB equals `color_key` become transparent.
    pub fn upload_image(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[Pixel],
        color_key: Option<[u8; 3]>,
    ) -> SoftGlResult<ImageHandle> {
        self.images.upload(width, height, pixels, color_key)
    }

    /// Upload a blit image decoded by the `image` crate.
    pub fn upload_rgba_image(
        &mut self,
        img: &image::RgbaImage,
        color_key: Option<[u8; 3]>,
    ) -> SoftGlResult<ImageHandle> {
        self.images.upload_rgba(img, color_key)
    }

    /// Replace the contents of a blit image and bump its version.
    pub fn update_image(
        &mut self,
        handle: ImageHandle,
        width: u32,
        height: u32,
        pixels: &[Pixel],
        color_key: Option<[u8; 3]>,
    ) -> SoftGlResult<()> {
        self.images.update(handle, width, height, pixels, color_key)
    }

    /// Release a blit image.
    pub fn delete_image(&mut self, handle: ImageHandle) {
        self.images.delete(handle);
    }

    /// Look up an uploaded blit image.
    pub fn image(&self, handle: ImageHandle) -> Option<&BlitImage> {
        self.images.get(handle)
    }

    // ---- shadow masks ----

    /// Allocate a cleared, framebuffer-sized shadow mask.
    pub fn create_shadow_mask(&mut self) -> ShadowMaskHandle {
        self.fb.create_shadow_mask()
    }

    /// Release a shadow mask.
    pub fn delete_shadow_mask(&mut self, handle: ShadowMaskHandle) {
        self.fb.delete_shadow_mask(handle);
    }

    // ---- recorded operations ----

    /// Record an image draw. Unknown images are ignored.
    pub fn blit(&mut self, handle: ImageHandle, transform: BlitTransform, target: BlitTarget) {
        let state = self.render_state();
        let Some(image) = self.images.get(handle) else {
            tracing::warn!(image = handle.0, "blit of an unknown image ignored");
            return;
        };
        self.recorder
            .record_blit(state, handle, image, transform, target);
    }

    /// Record a clear of the color buffer, the depth buffer, or both, within the scissor.
    ///
    /// `depth` is normalized, `1.0` being the far plane.
    pub fn clear(&mut self, color: Option<[f32; 4]>, depth: Option<f32>) {
        let state = self.render_state();
        let depth =
            depth.map(|d| (f64::from(d.clamp(0.0, 1.0)) * f64::from(DEPTH_MAX)).round() as u32);
        self.recorder
            .record_clear(state, color.map(color_to_pixel), depth);
    }

    /// Draw calls recorded for the frame in progress.
    pub fn recorded_calls(&self) -> &[DrawCall] {
        self.recorder.current()
    }

    // ---- presentation ----

    /// Diff this frame against the previous one, redraw what changed and start a new frame.
    ///
    /// Panics inside `begin`/`end`.
    #[tracing::instrument(skip(self))]
    pub fn present_frame(&mut self) -> PresentStats {
        assert!(self.pending.is_none(), "present_frame called between begin and end");
        self.presenter.present(
            &mut self.recorder,
            &mut self.fb,
            &self.textures,
            &self.images,
        )
    }

    /// The framebuffer as of the last present.
    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    /// The last presented frame as packed RGBA8 bytes.
    pub fn frame_rgba(&self) -> FrameRGBA {
        self.fb.to_frame()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/context/mod.rs"]
mod tests;
