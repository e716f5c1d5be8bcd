use super::VertexBufferHandle;

/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum VertexFormatType {
    #[default]
    Float,
    /// Unsigned, non-normalized byte.
    Byte,
}

impl VertexFormatType {
    /// Size in bytes of one component.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            VertexFormatType::Float => 4,
            VertexFormatType::Byte => 1,
        }
    }
}

/// Expected update frequency of a vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum VertexBufferUsage {
    #[default]
    Static,
    Dynamic,
}

/// One attribute of a vertex layout.
///
/// Offsets and strides are in bytes. `input_index` is the shader attribute
/// location the attribute feeds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct VertexFormatItem {
    pub buffer_index: u32,
    pub input_index: u32,
    pub offset: u32,
    pub stride: u32,
    pub ty: VertexFormatType,
    pub component_count: u32,
}

impl VertexFormatItem {
    /// Attribute in buffer 0, the only layout the immediate batch accepts.
    #[inline]
    pub const fn new(
        input_index: u32,
        offset: u32,
        stride: u32,
        ty: VertexFormatType,
        component_count: u32,
    ) -> Self {
        Self {
            buffer_index: 0,
            input_index,
            offset,
            stride,
            ty,
            component_count,
        }
    }

    /// Size in bytes of the attribute itself (not the vertex).
    #[inline]
    pub const fn size(&self) -> usize {
        self.ty.size() * self.component_count as usize
    }
}

/// Vertex buffer descriptor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexBuffer {
    pub handle: VertexBufferHandle,
    pub size_in_bytes: usize,
    pub usage: VertexBufferUsage,
}

impl VertexBuffer {
    /// Returns true if `[offset, offset + len)` lies inside the buffer.
    #[inline]
    pub fn contains_range(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.size_in_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_size_accounts_for_component_type() {
        let pos = VertexFormatItem::new(0, 0, 12, VertexFormatType::Float, 2);
        let col = VertexFormatItem::new(1, 8, 12, VertexFormatType::Byte, 4);
        assert_eq!(pos.size(), 8);
        assert_eq!(col.size(), 4);
        assert_eq!(pos.buffer_index, 0);
    }

    #[test]
    fn contains_range_rejects_overflow() {
        let vb = VertexBuffer {
            handle: VertexBufferHandle::from_raw(1),
            size_in_bytes: 64,
            usage: VertexBufferUsage::Dynamic,
        };
        assert!(vb.contains_range(0, 64));
        assert!(vb.contains_range(60, 4));
        assert!(!vb.contains_range(60, 8));
        assert!(!vb.contains_range(usize::MAX, 2));
    }
}
