use super::{MeshHandle, VertexBuffer, VertexFormatItem};

/// Maximum number of attributes in one mesh layout.
pub const MESH_MAX_VERTEX_FORMAT_ITEMS: usize = 32;

/// Maximum number of vertex streams bound to one mesh.
pub const MESH_MAX_VERTEX_BUFFERS: usize = 16;

/// Mesh descriptor: a layout plus the vertex streams it reads from.
///
/// The layout is only pushed to the backend by `apply_structure`; editing
/// `vertex_format` or `vertex_buffers` alone has no GPU-side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    pub handle: MeshHandle,
    /// Vertices drawn by a full-mesh draw.
    pub vertex_count: u32,
    pub vertex_format: Vec<VertexFormatItem>,
    pub vertex_buffers: Vec<VertexBuffer>,
}

impl Mesh {
    /// Creates an empty mesh around a backend handle.
    pub fn new(handle: MeshHandle) -> Self {
        Self {
            handle,
            vertex_count: 0,
            vertex_format: Vec::new(),
            vertex_buffers: Vec::new(),
        }
    }

    /// Checks that every layout item refers to an attached vertex buffer.
    pub fn validate_structure(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.vertex_format.len() <= MESH_MAX_VERTEX_FORMAT_ITEMS,
            "mesh has {} vertex format items (max {MESH_MAX_VERTEX_FORMAT_ITEMS})",
            self.vertex_format.len()
        );
        anyhow::ensure!(
            self.vertex_buffers.len() <= MESH_MAX_VERTEX_BUFFERS,
            "mesh has {} vertex buffers (max {MESH_MAX_VERTEX_BUFFERS})",
            self.vertex_buffers.len()
        );
        for item in &self.vertex_format {
            anyhow::ensure!(
                (item.buffer_index as usize) < self.vertex_buffers.len(),
                "vertex format buffer index {} is out of range (vertex buffer count {})",
                item.buffer_index,
                self.vertex_buffers.len()
            );
        }
        Ok(())
    }
}
