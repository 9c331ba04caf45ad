use crate::context::state::{BlendFactor, CompareFunc, RenderState, ShadowMode};
use crate::foundation::core::{Canvas, Pixel, Rect};
use crate::raster::blend::blend;

/// Depth value of the far plane; the depth buffer stores 24-bit values.
pub const DEPTH_MAX: u32 = 0x00FF_FFFF;

/// Handle to a shadow mask plane owned by a [`FrameBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ShadowMaskHandle(pub u32);

/// A presented frame as tightly packed, row-major, straight-alpha RGBA8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

/// Per-draw fragment pipeline derived from a [`RenderState`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct FragmentOps {
    pub(crate) alpha_test: Option<(CompareFunc, u8)>,
    pub(crate) depth_test: Option<CompareFunc>,
    pub(crate) depth_write: bool,
    pub(crate) blend: Option<(BlendFactor, BlendFactor)>,
    pub(crate) shadow: Option<(ShadowMode, usize)>,
}

impl FragmentOps {
    pub(crate) fn from_state(state: &RenderState, fb: &FrameBuffer) -> Self {
        let shadow = match (state.shadow_mode, state.shadow_mask) {
            (ShadowMode::Off, _) | (_, None) => None,
            (mode, Some(h)) => fb.mask_index(h).map(|idx| (mode, idx)),
        };
        Self {
            alpha_test: state
                .alpha_test_enabled
                .then_some((state.alpha_func, state.alpha_ref)),
            depth_test: state.depth_test_enabled.then_some(state.depth_func),
            depth_write: state.depth_test_enabled && state.depth_write,
            blend: state
                .blend_enabled
                .then_some((state.blend_src, state.blend_dst)),
            shadow,
        }
    }

    /// Blits only honor blending; depth, alpha test and shadow masks do not apply to them.
    pub(crate) fn for_blit(state: &RenderState) -> Self {
        Self {
            alpha_test: None,
            depth_test: None,
            depth_write: false,
            blend: state
                .blend_enabled
                .then_some((state.blend_src, state.blend_dst)),
            shadow: None,
        }
    }
}

/// Color, depth and shadow-mask planes plus the active scissor.
#[derive(Debug)]
pub struct FrameBuffer {
    canvas: Canvas,
    color: Vec<Pixel>,
    depth: Vec<u32>,
    shadow_masks: Vec<Option<Vec<u8>>>,
    scissor: Rect,
    pixel_writes: u64,
}

impl FrameBuffer {
    /// Allocate planes for `canvas`, filling color with `background` and depth with the far plane.
    pub fn new(canvas: Canvas, background: Pixel) -> Self {
        let n = canvas.pixel_count();
        Self {
            canvas,
            color: vec![background; n],
            depth: vec![DEPTH_MAX; n],
            shadow_masks: Vec::new(),
            scissor: canvas.bounds(),
            pixel_writes: 0,
        }
    }

    /// Framebuffer extent.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Row-major color plane.
    pub fn pixels(&self) -> &[Pixel] {
        &self.color
    }

    /// Row-major depth plane.
    pub fn depths(&self) -> &[u32] {
        &self.depth
    }

    /// Color at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.color[self.index(x as i32, y as i32)]
    }

    /// Depth at `(x, y)`. Panics when out of bounds.
    pub fn depth(&self, x: u32, y: u32) -> u32 {
        self.depth[self.index(x as i32, y as i32)]
    }

    /// Number of color/depth/mask writes performed by draw calls since the last reset.
    pub fn pixel_writes(&self) -> u64 {
        self.pixel_writes
    }

    pub(crate) fn reset_pixel_writes(&mut self) {
        self.pixel_writes = 0;
    }

    /// Active scissor.
    pub fn scissor(&self) -> Rect {
        self.scissor
    }

    /// Restrict writes to `rect`, clipped to the framebuffer.
    pub(crate) fn set_scissor(&mut self, rect: Rect) {
        self.scissor = rect.intersect(self.canvas.bounds());
    }

    #[inline]
    pub(crate) fn index(&self, x: i32, y: i32) -> usize {
        (y as usize) * (self.canvas.width as usize) + (x as usize)
    }

    /// Allocate a zeroed shadow mask plane.
    pub(crate) fn create_shadow_mask(&mut self) -> ShadowMaskHandle {
        let plane = vec![0u8; self.canvas.pixel_count()];
        if let Some(idx) = self.shadow_masks.iter().position(Option::is_none) {
            self.shadow_masks[idx] = Some(plane);
            return ShadowMaskHandle(idx as u32);
        }
        self.shadow_masks.push(Some(plane));
        ShadowMaskHandle((self.shadow_masks.len() - 1) as u32)
    }

    pub(crate) fn delete_shadow_mask(&mut self, handle: ShadowMaskHandle) {
        if let Some(slot) = self.shadow_masks.get_mut(handle.0 as usize) {
            *slot = None;
        }
    }

    /// Shadow mask contents, `None` for unknown handles.
    pub fn shadow_mask(&self, handle: ShadowMaskHandle) -> Option<&[u8]> {
        self.shadow_masks
            .get(handle.0 as usize)
            .and_then(Option::as_deref)
    }

    fn mask_index(&self, handle: ShadowMaskHandle) -> Option<usize> {
        let idx = handle.0 as usize;
        matches!(self.shadow_masks.get(idx), Some(Some(_))).then_some(idx)
    }

    /// Reset every plane inside `rect` to its initial value. Not counted as draw-call writes.
    pub(crate) fn reset_rect(&mut self, rect: Rect, background: Pixel) -> u64 {
        let rect = rect.intersect(self.canvas.bounds());
        if rect.is_empty() {
            return 0;
        }
        for y in rect.top..rect.bottom {
            let start = self.index(rect.left, y);
            let end = start + rect.width() as usize;
            self.color[start..end].fill(background);
            self.depth[start..end].fill(DEPTH_MAX);
            for mask in self.shadow_masks.iter_mut().flatten() {
                mask[start..end].fill(0);
            }
        }
        rect.area()
    }

    /// Fill the scissored part of `rect` with a color and/or depth value.
    pub(crate) fn clear_rect(&mut self, rect: Rect, color: Option<Pixel>, depth: Option<u32>) {
        let rect = rect.intersect(self.scissor);
        if rect.is_empty() || (color.is_none() && depth.is_none()) {
            return;
        }
        for y in rect.top..rect.bottom {
            let start = self.index(rect.left, y);
            let end = start + rect.width() as usize;
            if let Some(c) = color {
                self.color[start..end].fill(c);
            }
            if let Some(d) = depth {
                self.depth[start..end].fill(d);
            }
        }
        self.pixel_writes += rect.area();
    }

    /// Copy a run of pixels starting at `(x, y)`. The caller clips the run to the scissor.
    #[inline]
    pub(crate) fn copy_span(&mut self, x: i32, y: i32, src: &[Pixel]) {
        let start = self.index(x, y);
        self.color[start..start + src.len()].copy_from_slice(src);
        self.pixel_writes += src.len() as u64;
    }

    #[inline]
    pub(crate) fn write_depth(&mut self, idx: usize, z: u32) {
        self.depth[idx] = z;
        self.pixel_writes += 1;
    }

    /// Write a blit pixel: blend when enabled, otherwise overwrite.
    #[inline]
    pub(crate) fn put_color(&mut self, idx: usize, src: Pixel, ops: &FragmentOps) {
        self.color[idx] = match ops.blend {
            Some((s, d)) => blend(src, self.color[idx], s, d),
            None => src,
        };
        self.pixel_writes += 1;
    }

    /// Run the fragment pipeline for an in-scissor pixel: alpha test, depth test, shadow mask,
    /// then blend or write. Returns `true` when anything was written.
    #[inline]
    pub(crate) fn write_fragment(
        &mut self,
        ops: &FragmentOps,
        idx: usize,
        z: u32,
        src: Pixel,
    ) -> bool {
        if let Some((func, reference)) = ops.alpha_test
            && !func.test(src[3], reference)
        {
            return false;
        }
        if let Some(func) = ops.depth_test
            && !func.test(z, self.depth[idx])
        {
            return false;
        }
        if let Some((mode, mask)) = ops.shadow {
            let Some(plane) = self.shadow_masks[mask].as_mut() else {
                return false;
            };
            match mode {
                ShadowMode::WriteMask => {
                    plane[idx] = 0xFF;
                    self.pixel_writes += 1;
                    return true;
                }
                ShadowMode::ApplyMask if plane[idx] == 0 => return false,
                ShadowMode::ApplyMask | ShadowMode::Off => {}
            }
        }
        if ops.depth_write {
            self.depth[idx] = z;
        }
        self.put_color(idx, src, ops);
        true
    }

    /// Copy the color plane into packed RGBA8 bytes.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.color.iter().flatten().copied().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/framebuffer.rs"]
mod tests;
