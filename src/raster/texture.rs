use crate::foundation::core::Pixel;
use crate::foundation::error::{SoftGlError, SoftGlResult};

/// Largest accepted texture edge, in pixels.
pub const MAX_TEXTURE_EDGE: u32 = 4096;

/// Opaque texture name returned by [`TextureStore::generate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureHandle(pub u32);

/// Texel lookup filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    /// Nearest texel.
    #[default]
    Nearest,
    /// Weighted average of the four nearest texels.
    Bilinear,
}

/// Behaviour of texture coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrap {
    /// Tile the texture.
    #[default]
    Repeat,
    /// Clamp to the edge texels.
    Clamp,
}

/// A texture name plus its (possibly not yet uploaded) contents.
#[derive(Clone, Debug, Default)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Pixel>,
    filter: TextureFilter,
    wrap: TextureWrap,
    version: u64,
}

impl Texture {
    /// Width in texels, zero before the first upload.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels, zero before the first upload.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Content version; bumped by every upload or parameter change. Zero means never uploaded.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Return `true` once pixel data has been uploaded.
    pub fn is_uploaded(&self) -> bool {
        !self.texels.is_empty()
    }

    fn texel(&self, x: i64, y: i64) -> Pixel {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        let (x, y) = match self.wrap {
            TextureWrap::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
            TextureWrap::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
        };
        self.texels[(y * w + x) as usize]
    }

    /// Sample at normalized coordinates `(s, t)`; `t = 0` is the first uploaded row.
    pub fn sample(&self, s: f32, t: f32) -> Pixel {
        let u = s * self.width as f32;
        let v = t * self.height as f32;
        match self.filter {
            TextureFilter::Nearest => self.texel(u.floor() as i64, v.floor() as i64),
            TextureFilter::Bilinear => {
                let u = u - 0.5;
                let v = v - 0.5;
                let (x0, y0) = (u.floor(), v.floor());
                let (fx, fy) = (u - x0, v - y0);
                let (x0, y0) = (x0 as i64, y0 as i64);
                let p00 = self.texel(x0, y0);
                let p10 = self.texel(x0 + 1, y0);
                let p01 = self.texel(x0, y0 + 1);
                let p11 = self.texel(x0 + 1, y0 + 1);
                let mut out = [0u8; 4];
                for i in 0..4 {
                    let top = f32::from(p00[i]) * (1.0 - fx) + f32::from(p10[i]) * fx;
                    let bottom = f32::from(p01[i]) * (1.0 - fx) + f32::from(p11[i]) * fx;
                    out[i] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
                }
                out
            }
        }
    }
}

/// Slab of texture names owned by a context.
#[derive(Debug, Default)]
pub struct TextureStore {
    slots: Vec<Option<Texture>>,
    free: Vec<u32>,
    next_version: u64,
}

impl TextureStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_version(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }

    /// Allocate a new texture name with no contents.
    pub fn generate(&mut self) -> TextureHandle {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(Texture::default());
            return TextureHandle(idx);
        }
        self.slots.push(Some(Texture::default()));
        TextureHandle((self.slots.len() - 1) as u32)
    }

    /// Look up a live texture.
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.slots.get(handle.0 as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, handle: TextureHandle) -> SoftGlResult<&mut Texture> {
        self.slots
            .get_mut(handle.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| SoftGlError::upload(format!("unknown texture {}", handle.0)))
    }

    /// Replace the contents of a texture. `texels` is row-major, `width * height` long.
    pub fn upload(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        texels: &[Pixel],
    ) -> SoftGlResult<()> {
        if width == 0 || height == 0 {
            return Err(SoftGlError::upload("texture width and height must be > 0"));
        }
        if width > MAX_TEXTURE_EDGE || height > MAX_TEXTURE_EDGE {
            return Err(SoftGlError::upload(format!(
                "texture {width}x{height} exceeds the {MAX_TEXTURE_EDGE} texel edge limit"
            )));
        }
        let expected = (width as usize) * (height as usize);
        if texels.len() != expected {
            return Err(SoftGlError::upload(format!(
                "texture upload expects {expected} texels, got {}",
                texels.len()
            )));
        }
        let version = self.bump_version();
        let tex = self.get_mut(handle)?;
        tex.width = width;
        tex.height = height;
        tex.texels.clear();
        tex.texels.extend_from_slice(texels);
        tex.version = version;
        Ok(())
    }

    /// Change the sampling parameters of a texture.
    pub fn set_params(
        &mut self,
        handle: TextureHandle,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> SoftGlResult<()> {
        let version = self.bump_version();
        let tex = self.get_mut(handle)?;
        if tex.filter == filter && tex.wrap == wrap {
            return Ok(());
        }
        tex.filter = filter;
        tex.wrap = wrap;
        if tex.is_uploaded() {
            tex.version = version;
        }
        Ok(())
    }

    /// Release a texture name. Unknown handles are ignored.
    pub fn delete(&mut self, handle: TextureHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize)
            && slot.take().is_some()
        {
            self.free.push(handle.0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/texture.rs"]
mod tests;
