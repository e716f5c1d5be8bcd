use crate::state::{AspectSet, StateAspect};

/// Counters maintained by the dispatcher.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawStats {
    /// Draw calls issued for buffered immediate geometry.
    pub immediate_draws: u64,
    /// Draw calls issued for caller-owned meshes.
    pub mesh_draws: u64,
    /// Shader binds pushed by commits.
    pub shader_changes: u64,
    /// Non-shader aspects pushed by commits.
    pub granular_state_changes: u64,
    /// Synchronization points (explicit or implicit flushes).
    pub flushes: u64,
    /// Immediate polygons discarded for not fitting in the batch.
    pub dropped_polys: u64,
}

impl DrawStats {
    pub(super) fn record_commit(&mut self, applied: AspectSet) {
        let shader = applied.contains(StateAspect::Shader) as u64;
        self.shader_changes += shader;
        self.granular_state_changes += applied.len() as u64 - shader;
    }

    /// Total backend draw calls.
    #[inline]
    pub fn draw_calls(&self) -> u64 {
        self.immediate_draws + self.mesh_draws
    }
}
