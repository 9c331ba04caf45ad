//! Immediate-mode geometry submission.

use super::{Context, PendingPrimitive};
use crate::context::state::Topology;
use crate::foundation::math::Vec4;
use crate::raster::vertex::Vertex;

impl Context {
    /// Start a primitive group. Panics when a group is already open.
    pub fn begin(&mut self, topology: Topology) {
        assert!(self.pending.is_none(), "begin called inside begin/end");
        self.pending = Some(PendingPrimitive {
            topology,
            vertices: Vec::new(),
        });
    }

    /// Set the current color; subsequent vertices capture it.
    pub fn color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.color = [r, g, b, a];
    }

    /// Set the current texture coordinate.
    pub fn texcoord(&mut self, s: f32, t: f32) {
        self.texcoord = [s, t];
    }

    /// Set the current normal.
    pub fn normal(&mut self, x: f32, y: f32, z: f32) {
        self.normal = [x, y, z];
    }

    /// Emit a vertex at object-space `(x, y, z)`.
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) {
        self.vertex4(x, y, z, 1.0);
    }

    /// Emit a vertex at homogeneous object-space `(x, y, z, w)`.
    ///
    /// Panics outside `begin`/`end`.
    pub fn vertex4(&mut self, x: f32, y: f32, z: f32, w: f32) {
        let mvp = *self.projection.top() * *self.modelview.top();
        let clip = mvp.transform(Vec4::new(x, y, z, w));
        let v = Vertex::new(clip, self.state.color, self.texcoord, self.normal);
        let Some(pending) = self.pending.as_mut() else {
            panic!("vertex called outside begin/end");
        };
        pending.vertices.push(v);
    }

    /// Close the primitive group, project its vertices and record it.
    ///
    /// Panics without a matching `begin`, or when the vertex count does not form whole
    /// primitives of the topology.
    pub fn end(&mut self) {
        let Some(pending) = self.pending.take() else {
            panic!("end called without begin");
        };
        let count = pending.vertices.len();
        assert!(
            pending.topology.accepts_vertex_count(count),
            "{count} vertices do not form whole {:?} primitives",
            pending.topology
        );
        if count == 0 {
            return;
        }
        let state = self.render_state();
        let vertices: Vec<Vertex> = pending
            .vertices
            .into_iter()
            .map(|v| v.projected(&state.viewport))
            .collect();
        self.recorder
            .record_rasterization(state, pending.topology, &vertices);
    }
}
