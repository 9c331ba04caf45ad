//! Frame differencing: find what changed since the previous frame and redraw only that.

pub(crate) mod rects;

use crate::blit::image::ImageStore;
use crate::foundation::core::{Pixel, Rect};
use crate::raster::framebuffer::FrameBuffer;
use crate::raster::texture::TextureStore;
use crate::record::Recorder;
use crate::record::draw_call::{DrawCall, ReplayEnv};

/// Stage of a present cycle, reported in trace logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PresentPhase {
    Comparing,
    Unioning,
    Merging,
    Replaying,
    Retiring,
}

/// What one [`crate::Context::present_frame`] call did.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PresentStats {
    /// Zero-based index of the presented frame.
    pub frame: u64,
    /// Draw calls recorded for this frame.
    pub current_calls: usize,
    /// Draw calls of the previous frame.
    pub previous_calls: usize,
    /// Index of the first call that differs from the previous frame; `None` when both frames
    /// are identical.
    pub first_mismatch: Option<usize>,
    /// Merged dirty rectangles that were redrawn.
    pub rects: Vec<Rect>,
    /// Total pixel area of `rects`.
    pub dirty_area: u64,
    /// Draw-call replays performed (a call intersecting two rectangles counts twice).
    pub replayed_calls: usize,
    /// Pixels written by replayed calls, excluding the background reset.
    pub pixel_writes: u64,
}

/// Index of the first pair that differs, or the shorter length when one queue extends the
/// other. `None` when both queues are equal.
///
/// A current call whose image or texture changed after it was recorded counts as different
/// even when it matches the previous call.
pub(crate) fn first_mismatch(
    prev: &[DrawCall],
    cur: &[DrawCall],
    recorder: &Recorder,
    textures: &TextureStore,
    images: &ImageStore,
) -> Option<usize> {
    let arena = recorder.arena();
    let common = prev.len().min(cur.len());
    (0..common)
        .find(|&i| {
            !prev[i].same_output(&cur[i], arena) || !cur[i].resources_current(textures, images)
        })
        .or_else(|| (prev.len() != cur.len()).then_some(common))
}

/// Runs the compare / union / merge / replay / retire cycle over a [`Recorder`].
#[derive(Debug)]
pub(crate) struct Presenter {
    dirty_rects: bool,
    background: Pixel,
    frame: u64,
}

impl Presenter {
    pub(crate) fn new(dirty_rects: bool, background: Pixel) -> Self {
        Self {
            dirty_rects,
            background,
            frame: 0,
        }
    }

    pub(crate) fn present(
        &mut self,
        recorder: &mut Recorder,
        fb: &mut FrameBuffer,
        textures: &TextureStore,
        images: &ImageStore,
    ) -> PresentStats {
        let bounds = fb.canvas().bounds();
        let (prev, cur) = (recorder.previous(), recorder.current());
        let mut stats = PresentStats {
            frame: self.frame,
            current_calls: cur.len(),
            previous_calls: prev.len(),
            ..PresentStats::default()
        };

        tracing::trace!(phase = ?PresentPhase::Comparing, frame = self.frame);
        stats.first_mismatch = first_mismatch(prev, cur, recorder, textures, images);

        stats.rects = if self.dirty_rects {
            match stats.first_mismatch {
                None => Vec::new(),
                Some(start) => {
                    tracing::trace!(phase = ?PresentPhase::Unioning, start);
                    let touched = prev[start..].iter().chain(&cur[start..]).map(DrawCall::dirty);
                    tracing::trace!(phase = ?PresentPhase::Merging);
                    rects::merge_rects(touched, bounds)
                }
            }
        } else {
            vec![bounds]
        };
        stats.dirty_area = stats.rects.iter().map(|r| r.area()).sum();

        tracing::trace!(phase = ?PresentPhase::Replaying, rects = stats.rects.len());
        fb.reset_pixel_writes();
        let env = ReplayEnv {
            arena: recorder.arena(),
            textures,
            images,
        };
        for &rect in &stats.rects {
            fb.reset_rect(rect, self.background);
            for call in cur.iter().filter(|c| c.dirty().intersects(rect)) {
                call.replay(fb, &env, rect);
                stats.replayed_calls += 1;
            }
        }
        fb.set_scissor(bounds);
        stats.pixel_writes = fb.pixel_writes();

        tracing::trace!(phase = ?PresentPhase::Retiring);
        recorder.retire();
        self.frame += 1;

        tracing::debug!(
            frame = stats.frame,
            calls = stats.current_calls,
            first_mismatch = ?stats.first_mismatch,
            rects = stats.rects.len(),
            dirty_area = stats.dirty_area,
            replayed = stats.replayed_calls,
            pixel_writes = stats.pixel_writes,
            "presented frame"
        );
        stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/mod.rs"]
mod tests;
