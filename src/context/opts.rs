use std::path::Path;

use crate::foundation::core::{Canvas, Pixel};
use crate::foundation::error::{SoftGlError, SoftGlResult};

/// Options for [`crate::Context::new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContextOpts {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Redraw only changed regions; `false` redraws the whole frame on every present.
    pub dirty_rects: bool,
    /// Margin in pixels added around rasterization bounding boxes (at least one is always used).
    pub dirty_padding: u32,
    /// Vertices preallocated per frame arena half.
    pub arena_capacity: usize,
    /// Color redrawn regions are reset to before replay.
    pub background: Pixel,
}

impl Default for ContextOpts {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            dirty_rects: true,
            dirty_padding: 2,
            arena_capacity: 64 * 1024,
            background: [0, 0, 0, 255],
        }
    }
}

impl ContextOpts {
    /// Default options for a `width x height` framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Return options with dirty-rectangle presentation on or off.
    pub fn with_dirty_rects(mut self, enabled: bool) -> Self {
        self.dirty_rects = enabled;
        self
    }

    /// Return options with a different rasterization dirty margin.
    pub fn with_dirty_padding(mut self, padding: u32) -> Self {
        self.dirty_padding = padding;
        self
    }

    /// Return options with a different per-half arena capacity.
    pub fn with_arena_capacity(mut self, vertices: usize) -> Self {
        self.arena_capacity = vertices;
        self
    }

    /// Return options with a different background color.
    pub fn with_background(mut self, background: Pixel) -> Self {
        self.background = background;
        self
    }

    /// Check the options and return the framebuffer extent they describe.
    pub fn validate(&self) -> SoftGlResult<Canvas> {
        if self.dirty_padding > 1024 {
            return Err(SoftGlError::validation(format!(
                "dirty_padding {} is larger than 1024",
                self.dirty_padding
            )));
        }
        Canvas::new(self.width, self.height)
    }

    /// Parse and validate options from JSON.
    pub fn from_json_str(s: &str) -> SoftGlResult<Self> {
        let opts: Self = serde_json::from_str(s).map_err(|e| SoftGlError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read, parse and validate options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SoftGlResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SoftGlError::Other(anyhow::Error::new(e).context(format!("read {}", path.display())))
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/context/opts.rs"]
mod tests;
