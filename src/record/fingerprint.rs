use xxhash_rust::xxh3::Xxh3;

use crate::context::state::Topology;
use crate::raster::vertex::Vertex;

const XXH3_SEED: u64 = 0x5f0f_7a1e_c3d2_b1a9;

/// Digest of a recorded vertex run, used to reject unequal draw calls before a full
/// comparison.
pub(crate) fn fingerprint_vertices(topology: Topology, vertices: &[Vertex]) -> u64 {
    let mut h = StableHasher::new();
    h.write_u8(topology as u8);
    h.write_u64(vertices.len() as u64);
    for v in vertices {
        for bits in v.bits() {
            h.write_u32(bits);
        }
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn finish(self) -> u64 {
        self.inner.digest()
    }
}
