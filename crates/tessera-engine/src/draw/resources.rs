//! Resource operations. Each one flushes before touching the backend.

use std::path::Path;

use anyhow::{Context, Result};

use crate::backend::DrawBackend;
use crate::resource::{
    ConstantBuffer, Mesh, Shader, ShaderConstantBuffer, ShaderUniform, Texture,
    TextureInitSettings, VertexBuffer, VertexBufferUsage,
};

use super::Draw;

impl<B: DrawBackend> Draw<B> {
    // ── shaders ───────────────────────────────────────────────────────────

    pub fn load_shader(&mut self, path: impl AsRef<Path>) -> Result<Shader> {
        let path = path.as_ref();
        log::info!("loading shader {}", path.display());

        let shader = self
            .flush()
            .backend()
            .shader_load(path)
            .with_context(|| format!("failed to load shader {}", path.display()))?;

        log::debug!(
            "shader {}: {} attributes, {} uniforms, {} constant buffers",
            path.display(),
            shader.reflection.attributes().len(),
            shader.reflection.uniforms().len(),
            shader.reflection.constant_buffers().len()
        );
        Ok(shader)
    }

    /// Frees `shader`, unbinding it first if it is requested or bound.
    ///
    /// A different shader already requested stays requested; the flush binds
    /// it in place of the freed one.
    pub fn free_shader(&mut self, shader: Shader) {
        if self.state.current().shader == Some(shader.handle) {
            self.state.current_mut().shader = None;
        }
        self.flush().backend().shader_free(shader.handle);
    }

    pub fn set_uniform_int(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        value: i32,
    ) {
        self.check_uniform(uniform, array_index);
        self.flush()
            .backend()
            .shader_set_uniform_int(shader, uniform, array_index, value);
    }

    pub fn set_uniform_float(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        value: f32,
    ) {
        self.check_uniform(uniform, array_index);
        self.flush()
            .backend()
            .shader_set_uniform_float(shader, uniform, array_index, value);
    }

    pub fn set_uniform_texture(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        texture: &Texture,
    ) {
        self.check_uniform(uniform, array_index);
        self.flush()
            .backend()
            .shader_set_uniform_texture(shader, uniform, array_index, texture);
    }

    fn check_uniform(&self, uniform: &ShaderUniform, array_index: u32) {
        if self.config.debug_checks {
            assert!(
                array_index < uniform.array_len.max(1),
                "uniform {} index {array_index} out of bounds (length {})",
                uniform.name,
                uniform.array_len
            );
        }
    }

    // ── constant buffers ──────────────────────────────────────────────────

    pub fn init_constant_buffer(&mut self, size: usize) -> Result<ConstantBuffer> {
        let handle = self
            .flush()
            .backend()
            .constant_buffer_init(size)
            .with_context(|| format!("failed to create a {size} byte constant buffer"))?;
        Ok(ConstantBuffer { handle, size })
    }

    pub fn attach_constant_buffer(
        &mut self,
        buffer: &ConstantBuffer,
        shader: &Shader,
        block: &ShaderConstantBuffer,
    ) {
        self.flush()
            .backend()
            .constant_buffer_attach(buffer, shader, block);
    }

    /// # Panics
    /// Panics if the range does not lie inside the buffer.
    pub fn set_constant_buffer_data(&mut self, buffer: &ConstantBuffer, offset: usize, data: &[u8]) {
        assert!(
            buffer.contains_range(offset, data.len()),
            "constant buffer write of {} bytes at {offset} exceeds size {}",
            data.len(),
            buffer.size
        );
        self.flush()
            .backend()
            .constant_buffer_update(buffer, offset, data);
    }

    pub fn free_constant_buffer(&mut self, buffer: ConstantBuffer) {
        self.flush().backend().constant_buffer_free(buffer.handle);
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Creates a texture. Unset sampling modes are resolved to defaults
    /// before the backend sees them.
    pub fn init_texture(&mut self, settings: TextureInitSettings) -> Result<Texture> {
        let settings = settings.resolved();
        let handle = self
            .flush()
            .backend()
            .texture_init(&settings)
            .with_context(|| {
                format!(
                    "failed to create {:?} texture {}x{}",
                    settings.ty, settings.width, settings.height
                )
            })?;
        Ok(Texture::new(handle, settings))
    }

    /// Uploads a region of the top mip level.
    ///
    /// # Panics
    /// Panics if the region is outside the texture or `data` has the wrong
    /// length for it.
    pub fn set_texture_data(
        &mut self,
        texture: &Texture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) {
        assert!(
            texture.contains_region(x, y, width, height),
            "texture region {width}x{height} at ({x}, {y}) outside {}x{}",
            texture.width(),
            texture.height()
        );
        assert_eq!(
            data.len(),
            texture.settings.region_size(width, height),
            "texture data length does not match the region"
        );
        self.flush()
            .backend()
            .texture_update(texture, x, y, width, height, data);
    }

    pub fn generate_texture_mipmaps(&mut self, texture: &mut Texture) {
        self.flush().backend().texture_generate_mipmaps(texture);
        texture.has_mipmaps = true;
    }

    pub fn free_texture(&mut self, texture: Texture) {
        self.flush().backend().texture_free(texture.handle);
    }

    // ── meshes / vertex buffers ───────────────────────────────────────────

    pub fn init_vertex_buffer(
        &mut self,
        size_in_bytes: usize,
        usage: VertexBufferUsage,
    ) -> Result<VertexBuffer> {
        let handle = self
            .flush()
            .backend()
            .vertex_buffer_init(size_in_bytes, usage)
            .with_context(|| format!("failed to create a {size_in_bytes} byte vertex buffer"))?;
        Ok(VertexBuffer { handle, size_in_bytes, usage })
    }

    /// # Panics
    /// Panics if the range does not lie inside the buffer.
    pub fn set_vertex_buffer_data(&mut self, buffer: &VertexBuffer, offset: usize, data: &[u8]) {
        assert!(
            buffer.contains_range(offset, data.len()),
            "vertex buffer write of {} bytes at {offset} exceeds size {}",
            data.len(),
            buffer.size_in_bytes
        );
        self.flush()
            .backend()
            .vertex_buffer_update(buffer, offset, data);
    }

    pub fn free_vertex_buffer(&mut self, buffer: VertexBuffer) {
        self.flush().backend().vertex_buffer_free(buffer.handle);
    }

    pub fn init_mesh(&mut self) -> Result<Mesh> {
        let handle = self
            .flush()
            .backend()
            .mesh_init()
            .context("failed to create a mesh")?;
        Ok(Mesh::new(handle))
    }

    /// Pushes the mesh's vertex format and streams to the backend.
    pub fn apply_mesh_structure(&mut self, mesh: &Mesh) -> Result<()> {
        mesh.validate_structure()
            .context("cannot apply mesh structure")?;
        self.flush().backend().mesh_apply_structure(mesh);
        Ok(())
    }

    /// Draws `vertex_count` vertices of `mesh` from `vertex_offset` with the
    /// current draw state.
    pub fn draw_mesh(&mut self, mesh: &Mesh, vertex_offset: u32, vertex_count: u32) {
        if self.config.debug_checks && mesh.vertex_count != 0 {
            assert!(
                vertex_offset as u64 + vertex_count as u64 <= mesh.vertex_count as u64,
                "mesh draw of {vertex_count} vertices at {vertex_offset} exceeds {}",
                mesh.vertex_count
            );
        }
        self.flush()
            .backend()
            .mesh_draw(mesh, vertex_offset, vertex_count);
        self.stats.mesh_draws += 1;
    }

    /// Frees the mesh's vertex buffers, then the mesh.
    pub fn free_mesh(&mut self, mesh: Mesh) {
        let mut flushed = self.flush();
        let backend = flushed.backend();
        for vb in &mesh.vertex_buffers {
            backend.vertex_buffer_free(vb.handle);
        }
        backend.mesh_free(mesh.handle);
    }
}
