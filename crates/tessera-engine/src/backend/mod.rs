//! Backend contract.
//!
//! A backend is the concrete GPU-API layer under the draw dispatcher. Every
//! call is synchronous from the caller's point of view: its side effects are
//! visible to the next call. Backends never buffer geometry; that is the
//! dispatcher's job.
//!
//! Error policy:
//! - resource creation returns `anyhow::Result`; `Err` means the GPU object
//!   was not created
//! - state application, updates, draws and clears are infallible; a backend
//!   that cannot honor one must panic

mod recording;
mod texture_units;
#[cfg(feature = "wgpu")]
pub mod wgpu_state;

use std::path::Path;

use anyhow::Result;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::resource::{
    ConstantBuffer, ConstantBufferHandle, Mesh, MeshHandle, Shader, ShaderConstantBuffer,
    ShaderHandle, ShaderUniform, Texture, TextureHandle, TextureInitSettings, VertexBuffer,
    VertexBufferHandle, VertexBufferUsage,
};
use crate::state::{
    BlendMode, CullMode, DepthTestMode, DrawState, PolygonFillMode, StateAspect, StencilState,
};

pub use recording::{BackendCall, DrawRecord, RecordingBackend};
pub use texture_units::TextureUnits;

/// Operations a GPU backend supplies to the draw dispatcher.
pub trait DrawBackend {
    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Prepares the device for drawing. Called once, before anything else.
    fn init(&mut self) -> Result<()>;

    /// Releases backend-global objects. Called once, last.
    fn shutdown(&mut self);

    // ── vertex buffers ────────────────────────────────────────────────────

    fn vertex_buffer_init(
        &mut self,
        size_in_bytes: usize,
        usage: VertexBufferUsage,
    ) -> Result<VertexBufferHandle>;

    /// Writes `data` at byte `offset`. The range is validated by the caller.
    fn vertex_buffer_update(&mut self, buffer: &VertexBuffer, offset: usize, data: &[u8]);

    fn vertex_buffer_free(&mut self, buffer: VertexBufferHandle);

    // ── meshes ────────────────────────────────────────────────────────────

    fn mesh_init(&mut self) -> Result<MeshHandle>;

    /// Binds the mesh's vertex streams according to its vertex format.
    fn mesh_apply_structure(&mut self, mesh: &Mesh);

    /// Draws `vertex_count` vertices as a triangle list, starting at
    /// `vertex_offset`, with whatever state is live on the backend.
    fn mesh_draw(&mut self, mesh: &Mesh, vertex_offset: u32, vertex_count: u32);

    fn mesh_free(&mut self, mesh: MeshHandle);

    // ── shaders ───────────────────────────────────────────────────────────

    /// Loads, compiles and links the program at `path` and reflects its
    /// bindings.
    fn shader_load(&mut self, path: &Path) -> Result<Shader>;

    fn shader_free(&mut self, shader: ShaderHandle);

    fn shader_set_uniform_int(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        value: i32,
    );

    fn shader_set_uniform_float(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        value: f32,
    );

    fn shader_set_uniform_texture(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        texture: &Texture,
    );

    // ── constant buffers ──────────────────────────────────────────────────

    fn constant_buffer_init(&mut self, size: usize) -> Result<ConstantBufferHandle>;

    fn constant_buffer_attach(
        &mut self,
        buffer: &ConstantBuffer,
        shader: &Shader,
        block: &ShaderConstantBuffer,
    );

    fn constant_buffer_update(&mut self, buffer: &ConstantBuffer, offset: usize, data: &[u8]);

    fn constant_buffer_free(&mut self, buffer: ConstantBufferHandle);

    // ── textures ──────────────────────────────────────────────────────────

    /// Creates a texture; `settings` is already resolved.
    fn texture_init(&mut self, settings: &TextureInitSettings) -> Result<TextureHandle>;

    /// Uploads a `width x height` region at `(x, y)` of the top mip level.
    fn texture_update(
        &mut self,
        texture: &Texture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    );

    fn texture_generate_mipmaps(&mut self, texture: &Texture);

    fn texture_free(&mut self, texture: TextureHandle);

    // ── pipeline state ────────────────────────────────────────────────────

    fn set_shader(&mut self, shader: Option<ShaderHandle>);
    fn set_polygon_fill_mode(&mut self, mode: PolygonFillMode);
    fn set_blend_mode(&mut self, mode: BlendMode);
    fn set_cull_mode(&mut self, mode: CullMode);
    fn set_depth_test(&mut self, mode: DepthTestMode);
    fn set_depth_write(&mut self, enabled: bool);
    fn set_stencil(&mut self, stencil: &StencilState);

    /// Applies one aspect of `state`.
    ///
    /// Backends that prefer a combined state object can override this and
    /// rebuild it here; the default forwards to the per-aspect setters.
    fn apply_aspect(&mut self, aspect: StateAspect, state: &DrawState) {
        match aspect {
            StateAspect::Shader => self.set_shader(state.shader),
            StateAspect::PolygonFillMode => self.set_polygon_fill_mode(state.polygon_fill_mode),
            StateAspect::BlendMode => self.set_blend_mode(state.blend_mode),
            StateAspect::CullMode => self.set_cull_mode(state.cull_mode),
            StateAspect::DepthTest => self.set_depth_test(state.depth_test),
            StateAspect::DepthWrite => self.set_depth_write(state.depth_write),
            StateAspect::Stencil => self.set_stencil(&state.stencil),
        }
    }

    // ── frame / target ────────────────────────────────────────────────────

    fn set_viewport(&mut self, viewport: Viewport);
    fn clear_color(&mut self, color: Color);
    fn clear_depth(&mut self, value: f32);
    fn clear_stencil(&mut self, value: i32);
}
