//! Draw dispatcher.
//!
//! [`Draw`] owns the backend, the draw-state tracker and the immediate batch,
//! and orders everything that reaches the backend:
//!
//! - buffered immediate geometry is drawn before any state it was not
//!   submitted under reaches the backend
//! - pipeline state is committed lazily, one aspect at a time, only where it
//!   changed
//! - every other backend-visible mutation (resources, uniforms, viewport,
//!   clears) goes through [`Draw::flush`] first

mod config;
mod flushed;
mod resources;
mod stats;

pub use config::DrawConfig;
pub use flushed::Flushed;
pub use stats::DrawStats;

use anyhow::{Context, Result};
use bytemuck::Pod;

use crate::backend::DrawBackend;
use crate::batch::ImmediateBatch;
use crate::coords::Viewport;
use crate::paint::Color;
use crate::resource::{
    MESH_MAX_VERTEX_FORMAT_ITEMS, Mesh, VertexBuffer, VertexBufferUsage, VertexFormatItem,
};
use crate::state::{DrawState, StateTracker};

/// One rendering session over a backend.
///
/// Created by [`Draw::init`], torn down by [`Draw::free`]. Holding a `Draw`
/// is what "initialized" means; there is no way to call into an
/// uninitialized dispatcher.
#[derive(Debug)]
pub struct Draw<B: DrawBackend> {
    backend: B,
    config: DrawConfig,
    state: StateTracker,

    batch: ImmediateBatch,
    batch_mesh: Mesh,

    stats: DrawStats,
}

impl<B: DrawBackend> Draw<B> {
    /// Initializes `backend` and opens a session on it.
    ///
    /// Creates the immediate batch's mesh and dynamic vertex buffer, then
    /// pushes the full default draw state so the backend starts from a known
    /// configuration.
    pub fn init(mut backend: B, config: DrawConfig) -> Result<Self> {
        backend.init().context("backend initialization failed")?;

        let mesh_handle = match backend.mesh_init() {
            Ok(handle) => handle,
            Err(err) => {
                backend.shutdown();
                return Err(err.context("failed to create the immediate batch mesh"));
            }
        };

        let capacity = config.immediate_batch_capacity;
        let vb_handle = match backend.vertex_buffer_init(capacity, VertexBufferUsage::Dynamic) {
            Ok(handle) => handle,
            Err(err) => {
                backend.mesh_free(mesh_handle);
                backend.shutdown();
                return Err(err.context("failed to create the immediate batch vertex buffer"));
            }
        };

        let mut batch_mesh = Mesh::new(mesh_handle);
        batch_mesh.vertex_buffers.push(VertexBuffer {
            handle: vb_handle,
            size_in_bytes: capacity,
            usage: VertexBufferUsage::Dynamic,
        });

        let mut draw = Self {
            backend,
            state: StateTracker::new(),
            batch: ImmediateBatch::new(capacity),
            batch_mesh,
            stats: DrawStats::default(),
            config,
        };
        draw.state.force_full();
        draw.commit_state();

        log::info!(
            "draw session started (batch {capacity} bytes, debug checks {})",
            draw.config.debug_checks
        );
        Ok(draw)
    }

    /// Ends the session: draws pending geometry, releases the batch mesh,
    /// shuts the backend down and hands it back.
    pub fn free(mut self) -> B {
        self.sync();

        for vb in self.batch_mesh.vertex_buffers.drain(..) {
            self.backend.vertex_buffer_free(vb.handle);
        }
        self.backend.mesh_free(self.batch_mesh.handle);
        self.backend.shutdown();

        log::info!(
            "draw session ended ({} draws, {} flushes)",
            self.stats.draw_calls(),
            self.stats.flushes
        );
        self.backend
    }

    // ── accessors ─────────────────────────────────────────────────────────

    /// Read-only view of the backend. Mutable access goes through [`flush`](Self::flush).
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = DrawStats::default();
    }

    /// Bytes currently buffered in the immediate batch.
    #[inline]
    pub fn pending_immediate_bytes(&self) -> usize {
        self.batch.len()
    }

    /// Vertices currently buffered in the immediate batch.
    #[inline]
    pub fn pending_immediate_vertices(&self) -> u32 {
        self.batch.vertex_count()
    }

    // ── draw state ────────────────────────────────────────────────────────

    /// State the next draw will use.
    #[inline]
    pub fn draw_state(&self) -> &DrawState {
        self.state.current()
    }

    /// In-place edit of the state the next draw will use.
    ///
    /// Takes effect at the next submission or flush, never retroactively for
    /// geometry already buffered.
    #[inline]
    pub fn draw_state_mut(&mut self) -> &mut DrawState {
        self.state.current_mut()
    }

    /// Replaces the state the next draw will use. Returns true if it differs
    /// from the previous request.
    #[inline]
    pub fn set_draw_state(&mut self, state: DrawState) -> bool {
        self.state.set(state)
    }

    #[inline]
    pub fn is_draw_state_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Makes the next immediate submission flush and the next commit diff,
    /// even if no change is visible.
    #[inline]
    pub fn mark_draw_state_dirty(&mut self) {
        self.state.mark_dirty();
    }

    /// Forgets what the backend is known to hold; the next commit applies
    /// every aspect. Needed after touching pipeline state behind the
    /// dispatcher's back or after the backend lost its context.
    #[inline]
    pub fn invalidate_draw_state(&mut self) {
        self.state.force_full();
    }

    // ── immediate mode ────────────────────────────────────────────────────

    /// Sets the layout of vertices passed to the immediate submit calls.
    ///
    /// All items must read from stream 0 with one common stride. A change
    /// of layout flushes first, since buffered bytes are not self-describing.
    pub fn set_immediate_vertex_format(&mut self, format: &[VertexFormatItem]) {
        assert!(!format.is_empty(), "empty immediate vertex format");
        if self.config.debug_checks {
            check_immediate_format(format);
        }
        if self.batch.format() == format {
            return;
        }

        self.sync();
        self.batch.set_format(format);
        self.batch_mesh.vertex_format.clear();
        self.batch_mesh.vertex_format.extend_from_slice(format);
        self.backend.mesh_apply_structure(&self.batch_mesh);

        log::debug!(
            "immediate vertex format: {} items, stride {}",
            format.len(),
            self.batch.stride()
        );
    }

    /// Submits one convex polygon of plain-old-data vertices.
    ///
    /// # Panics
    /// Panics if `V` does not match the immediate format's stride, and in
    /// every case [`submit_immediate_poly_bytes`](Self::submit_immediate_poly_bytes)
    /// panics.
    pub fn submit_immediate_poly<V: Pod>(&mut self, vertices: &[V]) {
        assert!(self.batch.has_format(), "immediate vertex format not set");
        assert_eq!(
            size_of::<V>(),
            self.batch.stride(),
            "vertex type size does not match the immediate format stride"
        );
        self.submit_immediate_poly_bytes(bytemuck::cast_slice(vertices));
    }

    /// Submits one convex polygon as packed vertex records.
    ///
    /// The polygon is fan-triangulated and buffered. Pending geometry is
    /// flushed first if the draw state changed since it was buffered or if
    /// the polygon would not fit, so it is always drawn with the state in
    /// effect now.
    ///
    /// A polygon larger than the whole batch panics with debug checks on and
    /// is dropped otherwise.
    ///
    /// # Panics
    /// Panics if no immediate format is set, if `vertices` is not a whole
    /// number of records or if it holds fewer than 3 vertices.
    pub fn submit_immediate_poly_bytes(&mut self, vertices: &[u8]) {
        assert!(self.batch.has_format(), "immediate vertex format not set");
        let stride = self.batch.stride();
        assert_eq!(vertices.len() % stride, 0, "partial vertex record");

        let n = vertices.len() / stride;
        assert!(n >= 3, "polygon needs at least 3 vertices, got {n}");

        let size = self.batch.expanded_size(n);
        if size > self.batch.capacity() {
            if self.config.debug_checks {
                panic!(
                    "polygon of {n} vertices expands to {size} bytes, more than the \
                     immediate batch capacity of {} bytes",
                    self.batch.capacity()
                );
            }
            log::debug!("dropping {n}-vertex polygon ({size} bytes): larger than the batch");
            self.stats.dropped_polys += 1;
            return;
        }

        if self.state.is_dirty() || !self.batch.fits(size) {
            self.sync();
        }
        self.batch.append_poly(vertices);
    }

    /// Draws pending immediate geometry, then commits the current state.
    pub fn flush(&mut self) -> Flushed<'_, B> {
        self.sync();
        Flushed::new(&mut self.backend)
    }

    fn sync(&mut self) {
        self.stats.flushes += 1;
        self.draw_batch();
        self.commit_state();
    }

    fn draw_batch(&mut self) {
        if self.batch.is_empty() {
            return;
        }

        let count = self.batch.vertex_count();
        log::debug!("immediate draw: {count} vertices, {} bytes", self.batch.len());

        self.backend
            .vertex_buffer_update(&self.batch_mesh.vertex_buffers[0], 0, self.batch.bytes());
        self.batch_mesh.vertex_count = count;
        self.backend.mesh_draw(&self.batch_mesh, 0, count);
        self.batch.reset();
        self.stats.immediate_draws += 1;
    }

    fn commit_state(&mut self) {
        let applied = self.state.commit(&mut self.backend, self.config.debug_checks);
        self.stats.record_commit(applied);
    }

    // ── frame / target ────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.config.debug_checks {
            assert!(viewport.is_valid(), "invalid viewport {viewport:?}");
        }
        self.flush().backend().set_viewport(viewport);
    }

    pub fn clear_color(&mut self, color: Color) {
        if self.config.debug_checks {
            assert!(color.is_finite(), "non-finite clear color {color:?}");
        }
        self.flush().backend().clear_color(color);
    }

    pub fn clear_depth(&mut self, value: f32) {
        self.flush().backend().clear_depth(value);
    }

    pub fn clear_stencil(&mut self, value: i32) {
        self.flush().backend().clear_stencil(value);
    }
}

fn check_immediate_format(format: &[VertexFormatItem]) {
    assert!(
        format.len() <= MESH_MAX_VERTEX_FORMAT_ITEMS,
        "immediate format has {} items (max {MESH_MAX_VERTEX_FORMAT_ITEMS})",
        format.len()
    );
    let stride = format[0].stride;
    assert!(stride > 0, "immediate format has a zero stride");
    for item in format {
        assert_eq!(item.buffer_index, 0, "immediate format must read from stream 0");
        assert_eq!(item.stride, stride, "immediate format strides differ");
        assert!(
            item.offset as usize + item.size() <= stride as usize,
            "attribute {} overruns the vertex stride",
            item.input_index
        );
    }
}

#[cfg(test)]
mod tests;
