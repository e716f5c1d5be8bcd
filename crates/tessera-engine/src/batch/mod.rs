//! Immediate-mode staging buffer.
//!
//! Polygons are fan-expanded on append so the buffer always holds a plain
//! triangle list, ready to be uploaded and drawn in one call.

mod fan;

pub use fan::{expand_fan_into, expanded_vertex_count, fan_indices};

use crate::resource::VertexFormatItem;

/// Default capacity of the immediate batch, in bytes.
pub const DEFAULT_BATCH_CAPACITY: usize = 64 * 1024;

/// Fixed-capacity byte buffer of fan-expanded vertices.
///
/// Invariant: `len() <= capacity()`. The buffer never grows; callers check
/// [`fits`](Self::fits) and flush before appending.
#[derive(Debug)]
pub struct ImmediateBatch {
    bytes: Vec<u8>,
    capacity: usize,
    vertex_count: u32,

    format: Vec<VertexFormatItem>,
    stride: usize,
}

impl ImmediateBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
            vertex_count: 0,
            format: Vec::new(),
            stride: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes used (the write cursor).
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.bytes.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn format(&self) -> &[VertexFormatItem] {
        &self.format
    }

    /// Bytes per vertex; zero until a format is set.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn has_format(&self) -> bool {
        self.stride != 0
    }

    /// Installs a new vertex layout. Returns false if it equals the current one.
    ///
    /// # Panics
    /// Panics if vertices are still buffered; they would be reinterpreted
    /// under the new layout.
    pub fn set_format(&mut self, format: &[VertexFormatItem]) -> bool {
        if self.format == format {
            return false;
        }
        assert!(self.is_empty(), "vertex format changed with vertices buffered");

        self.format.clear();
        self.format.extend_from_slice(format);
        self.stride = format.first().map_or(0, |item| item.stride as usize);
        true
    }

    /// Byte size of an `n`-vertex polygon once fan-expanded.
    #[inline]
    pub fn expanded_size(&self, n: usize) -> usize {
        expanded_vertex_count(n) * self.stride
    }

    /// True if `size` more bytes can be appended without overflowing.
    #[inline]
    pub fn fits(&self, size: usize) -> bool {
        self.bytes.len() + size <= self.capacity
    }

    /// Fan-expands one polygon into the buffer.
    ///
    /// # Panics
    /// Panics if no format is set, if `vertices` is not `n * stride` bytes
    /// with `n >= 3`, or if the expansion does not fit.
    pub fn append_poly(&mut self, vertices: &[u8]) {
        assert!(self.has_format(), "immediate vertex format not set");
        let n = vertices.len() / self.stride;
        assert!(n >= 3, "polygon needs at least 3 vertices, got {n}");

        let size = self.expanded_size(n);
        assert!(self.fits(size), "polygon of {size} bytes overflows the batch");

        expand_fan_into(vertices, self.stride, &mut self.bytes);
        self.vertex_count += expanded_vertex_count(n) as u32;
        debug_assert!(self.bytes.len() <= self.capacity);
    }

    /// Drops buffered vertices; the format and allocation are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.vertex_count = 0;
    }
}
