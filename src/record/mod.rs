//! Draw-call recording: state snapshots, vertex payloads in the frame arena and dirty regions.

pub(crate) mod arena;
pub(crate) mod draw_call;
pub(crate) mod fingerprint;

use crate::blit::draw::{BlitTarget, BlitTransform};
use crate::blit::image::{BlitImage, ImageHandle};
use crate::context::state::{RenderState, Topology};
use crate::foundation::core::{Pixel, Rect};
use crate::raster::vertex::Vertex;
use crate::record::arena::FrameArena;
use crate::record::draw_call::DrawCall;

/// Per-frame draw-call queues plus the arena backing their vertex payloads.
#[derive(Debug)]
pub(crate) struct Recorder {
    arena: FrameArena,
    previous: Vec<DrawCall>,
    current: Vec<DrawCall>,
    padding: u32,
    bounds: Rect,
}

impl Recorder {
    pub(crate) fn new(arena_capacity: usize, padding: u32, bounds: Rect) -> Self {
        Self {
            arena: FrameArena::new(arena_capacity),
            previous: Vec::new(),
            current: Vec::new(),
            padding,
            bounds,
        }
    }

    pub(crate) fn record_rasterization(
        &mut self,
        state: RenderState,
        topology: Topology,
        vertices: &[Vertex],
    ) {
        let call = DrawCall::rasterization(
            state,
            topology,
            vertices,
            &mut self.arena,
            self.padding,
            self.bounds,
        );
        self.current.push(call);
    }

    pub(crate) fn record_blit(
        &mut self,
        state: RenderState,
        handle: ImageHandle,
        image: &BlitImage,
        transform: BlitTransform,
        target: BlitTarget,
    ) {
        let call = DrawCall::blit(state, handle, image, transform, target, self.bounds);
        self.current.push(call);
    }

    pub(crate) fn record_clear(
        &mut self,
        state: RenderState,
        color: Option<Pixel>,
        depth: Option<u32>,
    ) {
        self.current.push(DrawCall::clear(state, color, depth, self.bounds));
    }

    pub(crate) fn previous(&self) -> &[DrawCall] {
        &self.previous
    }

    pub(crate) fn current(&self) -> &[DrawCall] {
        &self.current
    }

    pub(crate) fn arena(&self) -> &FrameArena {
        &self.arena
    }

    /// Promote the current queue to previous and start an empty one in the other arena half.
    pub(crate) fn retire(&mut self) {
        self.previous = std::mem::take(&mut self.current);
        self.arena.advance();
    }
}
