use crate::raster::vertex::Vertex;

/// Handle to a vertex run stored in a [`FrameArena`].
///
/// The handle carries the generation of the half it was allocated from; once that half is
/// reset the handle no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArenaSlice {
    half: u8,
    generation: u64,
    start: u32,
    len: u32,
}

impl ArenaSlice {
    /// Number of vertices in the run.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Return `true` for an empty run.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
struct Half {
    generation: u64,
    vertices: Vec<Vertex>,
}

/// Double-buffered bump allocator for per-frame vertex payloads.
///
/// Frame N allocates from the active half. [`FrameArena::advance`] switches halves and resets
/// the newly active one, so the half holding frame N is only reset when frame N+2 starts
/// recording and frame N's calls stay readable while frame N+1 is diffed against them.
#[derive(Debug)]
pub struct FrameArena {
    halves: [Half; 2],
    active: usize,
    capacity: usize,
    next_generation: u64,
}

impl FrameArena {
    /// Create an arena whose halves each preallocate `capacity` vertices.
    pub fn new(capacity: usize) -> Self {
        Self {
            halves: [
                Half {
                    generation: 1,
                    vertices: Vec::with_capacity(capacity),
                },
                Half {
                    generation: 2,
                    vertices: Vec::with_capacity(capacity),
                },
            ],
            active: 0,
            capacity,
            next_generation: 3,
        }
    }

    /// Copy `vertices` into the active half.
    ///
    /// Allocating past the configured capacity grows the half and logs a warning.
    pub fn alloc(&mut self, vertices: &[Vertex]) -> ArenaSlice {
        let half = &mut self.halves[self.active];
        let start = half.vertices.len();
        if start + vertices.len() > self.capacity && start <= self.capacity {
            tracing::warn!(
                capacity = self.capacity,
                requested = start + vertices.len(),
                "frame arena half grew past its configured capacity"
            );
        }
        half.vertices.extend_from_slice(vertices);
        ArenaSlice {
            half: self.active as u8,
            generation: half.generation,
            start: start as u32,
            len: vertices.len() as u32,
        }
    }

    /// Resolve a slice, `None` when its half has been reset since allocation.
    pub fn get(&self, slice: ArenaSlice) -> Option<&[Vertex]> {
        let half = self.halves.get(slice.half as usize)?;
        if half.generation != slice.generation {
            return None;
        }
        let start = slice.start as usize;
        half.vertices.get(start..start + slice.len as usize)
    }

    /// Start a new frame: switch halves and reset the one becoming active.
    pub fn advance(&mut self) {
        self.active ^= 1;
        let half = &mut self.halves[self.active];
        half.vertices.clear();
        half.generation = self.next_generation;
        self.next_generation += 1;
    }

    /// Vertices allocated in the active half.
    pub fn active_len(&self) -> usize {
        self.halves[self.active].vertices.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/arena.rs"]
mod tests;
