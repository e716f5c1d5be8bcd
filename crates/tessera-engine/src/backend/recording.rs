use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::resource::{
    ConstantBuffer, ConstantBufferHandle, Mesh, MeshHandle, Shader, ShaderConstantBuffer,
    ShaderHandle, ShaderReflection, ShaderUniform, Texture, TextureHandle, TextureInitSettings,
    VertexBuffer, VertexBufferHandle, VertexBufferUsage,
};
use crate::state::{BlendMode, CullMode, DepthTestMode, DrawState, PolygonFillMode, StencilState};

use super::{DrawBackend, TextureUnits};

const DEFAULT_TEXTURE_UNITS: u32 = 32;

/// One call received by a [`RecordingBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Init,
    Shutdown,

    VertexBufferInit { buffer: VertexBufferHandle, size: usize, usage: VertexBufferUsage },
    VertexBufferUpdate { buffer: VertexBufferHandle, offset: usize, len: usize },
    VertexBufferFree(VertexBufferHandle),

    MeshInit(MeshHandle),
    MeshApplyStructure { mesh: MeshHandle, format_items: usize },
    MeshDraw { mesh: MeshHandle, vertex_offset: u32, vertex_count: u32 },
    MeshFree(MeshHandle),

    ShaderLoad { shader: ShaderHandle, path: PathBuf },
    ShaderFree(ShaderHandle),
    SetUniformInt { shader: ShaderHandle, location: i32, array_index: u32, value: i32 },
    SetUniformFloat { shader: ShaderHandle, location: i32, array_index: u32, value: f32 },
    SetUniformTexture {
        shader: ShaderHandle,
        location: i32,
        array_index: u32,
        texture: TextureHandle,
        unit: u32,
    },

    ConstantBufferInit { buffer: ConstantBufferHandle, size: usize },
    ConstantBufferAttach { buffer: ConstantBufferHandle, shader: ShaderHandle, binding_point: u32 },
    ConstantBufferUpdate { buffer: ConstantBufferHandle, offset: usize, len: usize },
    ConstantBufferFree(ConstantBufferHandle),

    TextureInit { texture: TextureHandle, settings: TextureInitSettings },
    TextureUpdate { texture: TextureHandle, x: u32, y: u32, width: u32, height: u32 },
    TextureGenerateMipmaps(TextureHandle),
    TextureFree(TextureHandle),

    SetShader(Option<ShaderHandle>),
    SetPolygonFillMode(PolygonFillMode),
    SetBlendMode(BlendMode),
    SetCullMode(CullMode),
    SetDepthTest(DepthTestMode),
    SetDepthWrite(bool),
    SetStencil(StencilState),

    SetViewport(Viewport),
    ClearColor(Color),
    ClearDepth(f32),
    ClearStencil(i32),
}

impl BackendCall {
    /// True for the per-aspect pipeline state setters.
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            BackendCall::SetShader(_)
                | BackendCall::SetPolygonFillMode(_)
                | BackendCall::SetBlendMode(_)
                | BackendCall::SetCullMode(_)
                | BackendCall::SetDepthTest(_)
                | BackendCall::SetDepthWrite(_)
                | BackendCall::SetStencil(_)
        )
    }

    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(self, BackendCall::MeshDraw { .. })
    }
}

/// A draw as the GPU would have seen it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub mesh: MeshHandle,
    pub vertex_offset: u32,
    pub vertex_count: u32,
    /// Pipeline state live on the backend when the draw was issued.
    pub state: DrawState,
    /// Bytes of the drawn vertex range, read from the mesh's first stream.
    pub vertices: Vec<u8>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ResourceKind {
    VertexBuffer,
    Mesh,
    Shader,
    ConstantBuffer,
    Texture,
}

/// Headless backend that records every call instead of touching a GPU.
///
/// It mirrors the pipeline state it receives and keeps vertex buffer contents,
/// so each draw can be inspected together with the state and the bytes it
/// consumed. Used by the test suites and by the studio replay tool.
#[derive(Debug)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    draws: Vec<DrawRecord>,
    state: DrawState,
    viewport: Viewport,

    vertex_data: HashMap<VertexBufferHandle, Vec<u8>>,
    live: HashMap<u32, ResourceKind>,
    next_handle: u32,

    shader_sources: HashMap<PathBuf, ShaderReflection>,
    texture_units: TextureUnits,

    initialized: bool,
    fail_allocations: bool,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            draws: Vec::new(),
            state: DrawState::default(),
            viewport: Viewport::default(),
            vertex_data: HashMap::new(),
            live: HashMap::new(),
            next_handle: 1,
            shader_sources: HashMap::new(),
            texture_units: TextureUnits::new(DEFAULT_TEXTURE_UNITS),
            initialized: false,
            fail_allocations: false,
        }
    }

    /// Registers a program that `shader_load` will "compile" for `path`.
    ///
    /// Loading an unregistered path fails like a missing source file.
    pub fn with_shader(mut self, path: impl Into<PathBuf>, reflection: ShaderReflection) -> Self {
        self.shader_sources.insert(path.into(), reflection);
        self
    }

    /// Makes every subsequent resource creation fail.
    pub fn set_fail_allocations(&mut self, fail: bool) {
        self.fail_allocations = fail;
    }

    #[inline]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    #[inline]
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Forgets recorded calls and draws; resources and state are kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.draws.clear();
    }

    /// Pipeline state as last applied through the setters.
    #[inline]
    pub fn live_state(&self) -> &DrawState {
        &self.state
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of GPU objects created and not yet freed.
    #[inline]
    pub fn live_resource_count(&self) -> usize {
        self.live.len()
    }

    /// Current contents of a vertex buffer.
    pub fn vertex_buffer_data(&self, buffer: VertexBufferHandle) -> Option<&[u8]> {
        self.vertex_data.get(&buffer).map(Vec::as_slice)
    }

    fn allocate(&mut self, kind: ResourceKind) -> Result<u32> {
        anyhow::ensure!(!self.fail_allocations, "{kind:?} allocation refused");
        let raw = self.next_handle;
        self.next_handle += 1;
        self.live.insert(raw, kind);
        Ok(raw)
    }

    fn release(&mut self, raw: u32, kind: ResourceKind) {
        match self.live.remove(&raw) {
            Some(found) => assert_eq!(found, kind, "handle {raw} freed as the wrong kind"),
            None => panic!("{kind:?} {raw} freed twice or never created"),
        }
    }

    fn record(&mut self, call: BackendCall) {
        self.calls.push(call);
    }
}

impl DrawBackend for RecordingBackend {
    fn init(&mut self) -> Result<()> {
        anyhow::ensure!(!self.initialized, "recording backend initialized twice");
        self.initialized = true;
        self.record(BackendCall::Init);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.initialized = false;
        self.texture_units.reset();
        self.record(BackendCall::Shutdown);
    }

    fn vertex_buffer_init(
        &mut self,
        size_in_bytes: usize,
        usage: VertexBufferUsage,
    ) -> Result<VertexBufferHandle> {
        let buffer = VertexBufferHandle::from_raw(self.allocate(ResourceKind::VertexBuffer)?);
        self.vertex_data.insert(buffer, vec![0; size_in_bytes]);
        self.record(BackendCall::VertexBufferInit { buffer, size: size_in_bytes, usage });
        Ok(buffer)
    }

    fn vertex_buffer_update(&mut self, buffer: &VertexBuffer, offset: usize, data: &[u8]) {
        let Some(storage) = self.vertex_data.get_mut(&buffer.handle) else {
            panic!("update of unknown vertex buffer {:?}", buffer.handle);
        };
        let end = offset + data.len();
        assert!(end <= storage.len(), "vertex buffer update out of range");
        storage[offset..end].copy_from_slice(data);
        self.record(BackendCall::VertexBufferUpdate {
            buffer: buffer.handle,
            offset,
            len: data.len(),
        });
    }

    fn vertex_buffer_free(&mut self, buffer: VertexBufferHandle) {
        self.release(buffer.raw(), ResourceKind::VertexBuffer);
        self.vertex_data.remove(&buffer);
        self.record(BackendCall::VertexBufferFree(buffer));
    }

    fn mesh_init(&mut self) -> Result<MeshHandle> {
        let mesh = MeshHandle::from_raw(self.allocate(ResourceKind::Mesh)?);
        self.record(BackendCall::MeshInit(mesh));
        Ok(mesh)
    }

    fn mesh_apply_structure(&mut self, mesh: &Mesh) {
        if let Err(err) = mesh.validate_structure() {
            panic!("invalid mesh structure: {err:#}");
        }
        self.record(BackendCall::MeshApplyStructure {
            mesh: mesh.handle,
            format_items: mesh.vertex_format.len(),
        });
    }

    fn mesh_draw(&mut self, mesh: &Mesh, vertex_offset: u32, vertex_count: u32) {
        let stride = mesh.vertex_format.first().map_or(0, |f| f.stride as usize);
        let vertices = mesh
            .vertex_buffers
            .first()
            .and_then(|vb| self.vertex_data.get(&vb.handle))
            .map(|data| {
                let start = (vertex_offset as usize * stride).min(data.len());
                let end = (start + vertex_count as usize * stride).min(data.len());
                data[start..end].to_vec()
            })
            .unwrap_or_default();

        self.draws.push(DrawRecord {
            mesh: mesh.handle,
            vertex_offset,
            vertex_count,
            state: self.state,
            vertices,
        });
        self.record(BackendCall::MeshDraw { mesh: mesh.handle, vertex_offset, vertex_count });
    }

    fn mesh_free(&mut self, mesh: MeshHandle) {
        self.release(mesh.raw(), ResourceKind::Mesh);
        self.record(BackendCall::MeshFree(mesh));
    }

    fn shader_load(&mut self, path: &Path) -> Result<Shader> {
        let reflection = self
            .shader_sources
            .get(path)
            .cloned()
            .with_context(|| format!("no shader source registered for {}", path.display()))?;
        let shader = ShaderHandle::from_raw(self.allocate(ResourceKind::Shader)?);
        self.record(BackendCall::ShaderLoad { shader, path: path.to_path_buf() });
        Ok(Shader::new(shader, reflection))
    }

    fn shader_free(&mut self, shader: ShaderHandle) {
        self.release(shader.raw(), ResourceKind::Shader);
        self.record(BackendCall::ShaderFree(shader));
    }

    fn shader_set_uniform_int(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        value: i32,
    ) {
        self.record(BackendCall::SetUniformInt {
            shader: shader.handle,
            location: uniform.location,
            array_index,
            value,
        });
    }

    fn shader_set_uniform_float(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        value: f32,
    ) {
        self.record(BackendCall::SetUniformFloat {
            shader: shader.handle,
            location: uniform.location,
            array_index,
            value,
        });
    }

    fn shader_set_uniform_texture(
        &mut self,
        shader: &Shader,
        uniform: &ShaderUniform,
        array_index: u32,
        texture: &Texture,
    ) {
        let unit = self.texture_units.next_unit();
        self.record(BackendCall::SetUniformTexture {
            shader: shader.handle,
            location: uniform.location,
            array_index,
            texture: texture.handle,
            unit,
        });
    }

    fn constant_buffer_init(&mut self, size: usize) -> Result<ConstantBufferHandle> {
        let buffer = ConstantBufferHandle::from_raw(self.allocate(ResourceKind::ConstantBuffer)?);
        self.record(BackendCall::ConstantBufferInit { buffer, size });
        Ok(buffer)
    }

    fn constant_buffer_attach(
        &mut self,
        buffer: &ConstantBuffer,
        shader: &Shader,
        block: &ShaderConstantBuffer,
    ) {
        self.record(BackendCall::ConstantBufferAttach {
            buffer: buffer.handle,
            shader: shader.handle,
            binding_point: block.binding_point,
        });
    }

    fn constant_buffer_update(&mut self, buffer: &ConstantBuffer, offset: usize, data: &[u8]) {
        self.record(BackendCall::ConstantBufferUpdate {
            buffer: buffer.handle,
            offset,
            len: data.len(),
        });
    }

    fn constant_buffer_free(&mut self, buffer: ConstantBufferHandle) {
        self.release(buffer.raw(), ResourceKind::ConstantBuffer);
        self.record(BackendCall::ConstantBufferFree(buffer));
    }

    fn texture_init(&mut self, settings: &TextureInitSettings) -> Result<TextureHandle> {
        let texture = TextureHandle::from_raw(self.allocate(ResourceKind::Texture)?);
        self.record(BackendCall::TextureInit { texture, settings: *settings });
        Ok(texture)
    }

    fn texture_update(
        &mut self,
        texture: &Texture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        _data: &[u8],
    ) {
        self.record(BackendCall::TextureUpdate { texture: texture.handle, x, y, width, height });
    }

    fn texture_generate_mipmaps(&mut self, texture: &Texture) {
        self.record(BackendCall::TextureGenerateMipmaps(texture.handle));
    }

    fn texture_free(&mut self, texture: TextureHandle) {
        self.release(texture.raw(), ResourceKind::Texture);
        self.record(BackendCall::TextureFree(texture));
    }

    fn set_shader(&mut self, shader: Option<ShaderHandle>) {
        self.state.shader = shader;
        self.record(BackendCall::SetShader(shader));
    }

    fn set_polygon_fill_mode(&mut self, mode: PolygonFillMode) {
        self.state.polygon_fill_mode = mode;
        self.record(BackendCall::SetPolygonFillMode(mode));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
        self.record(BackendCall::SetBlendMode(mode));
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.state.cull_mode = mode;
        self.record(BackendCall::SetCullMode(mode));
    }

    fn set_depth_test(&mut self, mode: DepthTestMode) {
        self.state.depth_test = mode;
        self.record(BackendCall::SetDepthTest(mode));
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.state.depth_write = enabled;
        self.record(BackendCall::SetDepthWrite(enabled));
    }

    fn set_stencil(&mut self, stencil: &StencilState) {
        self.state.stencil = *stencil;
        self.record(BackendCall::SetStencil(*stencil));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.record(BackendCall::SetViewport(viewport));
    }

    fn clear_color(&mut self, color: Color) {
        self.record(BackendCall::ClearColor(color));
    }

    fn clear_depth(&mut self, value: f32) {
        self.record(BackendCall::ClearDepth(value));
    }

    fn clear_stencil(&mut self, value: i32) {
        self.record(BackendCall::ClearStencil(value));
    }
}
