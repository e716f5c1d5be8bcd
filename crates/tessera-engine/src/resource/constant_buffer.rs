use super::ConstantBufferHandle;

/// Uniform block storage shared with shaders.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ConstantBuffer {
    pub handle: ConstantBufferHandle,
    pub size: usize,
}

impl ConstantBuffer {
    /// Returns true if `[offset, offset + len)` lies inside the buffer.
    #[inline]
    pub fn contains_range(&self, offset: usize, len: usize) -> bool {
        offset.checked_add(len).is_some_and(|end| end <= self.size)
    }
}
