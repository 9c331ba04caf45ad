use crate::foundation::core::Pixel;
use crate::foundation::error::{SoftGlError, SoftGlResult};

/// Largest accepted image edge, in pixels.
pub const MAX_IMAGE_EDGE: u32 = 8192;

/// Opaque name of an uploaded blit image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ImageHandle(pub u32);

/// A maximal horizontal run of non-transparent pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    /// First column of the run.
    pub x: u32,
    /// Row of the run.
    pub y: u32,
    /// Run length in pixels.
    pub length: u32,
    /// Index of the first pixel in the image's row-major pixel array.
    pub offset: usize,
}

/// A decoded bitmap plus the opaque-run index derived from it at upload time.
#[derive(Clone, Debug)]
pub struct BlitImage {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    lines: Vec<Line>,
    binary_transparent: bool,
    version: u64,
}

impl BlitImage {
    fn build(
        width: u32,
        height: u32,
        pixels: &[Pixel],
        color_key: Option<[u8; 3]>,
        version: u64,
    ) -> SoftGlResult<Self> {
        if width == 0 || height == 0 {
            return Err(SoftGlError::upload("image width and height must be > 0"));
        }
        if width > MAX_IMAGE_EDGE || height > MAX_IMAGE_EDGE {
            return Err(SoftGlError::upload(format!(
                "image {width}x{height} exceeds the {MAX_IMAGE_EDGE} pixel edge limit"
            )));
        }
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(SoftGlError::upload(format!(
                "image upload expects {expected} pixels, got {}",
                pixels.len()
            )));
        }

        let mut pixels = pixels.to_vec();
        if let Some(key) = color_key {
            for px in pixels.iter_mut().filter(|px| px[..3] == key) {
                *px = [0, 0, 0, 0];
            }
        }
        let lines = scan_lines(width, &pixels);
        let binary_transparent = pixels.iter().all(|px| px[3] == 0 || px[3] == 255);
        Ok(Self {
            width,
            height,
            pixels,
            lines,
            binary_transparent,
            version,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, with color-keyed pixels already made transparent.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Runs of non-transparent pixels in row-major order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Return `true` when every pixel is either fully transparent or fully opaque.
    pub fn is_binary_transparent(&self) -> bool {
        self.binary_transparent
    }

    /// Content version, bumped by every upload.
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

fn scan_lines(width: u32, pixels: &[Pixel]) -> Vec<Line> {
    let mut lines = Vec::new();
    for (y, row) in pixels.chunks_exact(width as usize).enumerate() {
        let mut x = 0usize;
        while x < row.len() {
            if row[x][3] == 0 {
                x += 1;
                continue;
            }
            let start = x;
            while x < row.len() && row[x][3] != 0 {
                x += 1;
            }
            lines.push(Line {
                x: start as u32,
                y: y as u32,
                length: (x - start) as u32,
                offset: y * width as usize + start,
            });
        }
    }
    lines
}

/// Slab of uploaded images owned by a context.
#[derive(Debug, Default)]
pub struct ImageStore {
    slots: Vec<Option<BlitImage>>,
    free: Vec<u32>,
    next_version: u64,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_version(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }

    /// Upload a new image. `pixels` is row-major, `width * height` long.
    pub fn upload(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[Pixel],
        color_key: Option<[u8; 3]>,
    ) -> SoftGlResult<ImageHandle> {
        let version = self.bump_version();
        let image = BlitImage::build(width, height, pixels, color_key, version)?;
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(image);
            return Ok(ImageHandle(idx));
        }
        self.slots.push(Some(image));
        Ok(ImageHandle((self.slots.len() - 1) as u32))
    }

    /// Upload an image decoded by the `image` crate.
    pub fn upload_rgba(
        &mut self,
        img: &image::RgbaImage,
        color_key: Option<[u8; 3]>,
    ) -> SoftGlResult<ImageHandle> {
        let pixels: Vec<Pixel> = img.pixels().map(|p| p.0).collect();
        self.upload(img.width(), img.height(), &pixels, color_key)
    }

    /// Replace the contents of an existing image; the line index is rebuilt and the version
    /// bumped.
    pub fn update(
        &mut self,
        handle: ImageHandle,
        width: u32,
        height: u32,
        pixels: &[Pixel],
        color_key: Option<[u8; 3]>,
    ) -> SoftGlResult<()> {
        if self.get(handle).is_none() {
            return Err(SoftGlError::upload(format!("unknown image {}", handle.0)));
        }
        let version = self.bump_version();
        let image = BlitImage::build(width, height, pixels, color_key, version)?;
        self.slots[handle.0 as usize] = Some(image);
        Ok(())
    }

    /// Look up a live image.
    pub fn get(&self, handle: ImageHandle) -> Option<&BlitImage> {
        self.slots.get(handle.0 as usize).and_then(Option::as_ref)
    }

    /// Release an image. Unknown handles are ignored.
    pub fn delete(&mut self, handle: ImageHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize)
            && slot.take().is_some()
        {
            self.free.push(handle.0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blit/image.rs"]
mod tests;
