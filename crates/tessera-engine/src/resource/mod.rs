//! GPU resource descriptors.
//!
//! Every resource here is created and destroyed by a [`DrawBackend`](crate::backend::DrawBackend).
//! The caller owns the descriptor value; the backend owns the GPU object behind the handle.
//! Nothing in this module talks to a GPU.

mod constant_buffer;
mod handle;
mod mesh;
mod shader;
mod texture;
mod vertex;

pub use constant_buffer::ConstantBuffer;
pub use handle::{ConstantBufferHandle, MeshHandle, ShaderHandle, TextureHandle, VertexBufferHandle};
pub use mesh::{Mesh, MESH_MAX_VERTEX_BUFFERS, MESH_MAX_VERTEX_FORMAT_ITEMS};
pub use shader::{
    strip_array_suffix, Shader, ShaderAttribute, ShaderConstantBuffer, ShaderReflection,
    ShaderUniform, SHADER_MAX_ATTRIBUTES, SHADER_MAX_CONSTANT_BUFFERS, SHADER_MAX_UNIFORMS,
};
pub use texture::{
    Texture, TextureFilterMode, TextureFormat, TextureInitSettings, TextureType, TextureWrapMode,
};
pub use vertex::{VertexBuffer, VertexBufferUsage, VertexFormatItem, VertexFormatType};
