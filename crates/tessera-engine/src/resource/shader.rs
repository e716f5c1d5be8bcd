use super::ShaderHandle;

pub const SHADER_MAX_ATTRIBUTES: usize = 32;
pub const SHADER_MAX_UNIFORMS: usize = 64;
pub const SHADER_MAX_CONSTANT_BUFFERS: usize = 16;

/// Vertex input reflected from a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderAttribute {
    pub name: String,
    pub location: i32,
    /// Backend-specific type enum (e.g. a GL type constant).
    pub ty: u32,
    pub array_len: u32,
}

/// Loose (non-block) uniform reflected from a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderUniform {
    pub name: String,
    pub location: i32,
    pub ty: u32,
    pub array_len: u32,
    pub is_array: bool,
}

/// Uniform block reflected from a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderConstantBuffer {
    pub name: String,
    pub index: u32,
    pub binding_point: u32,
}

/// Binding information a backend extracts when it links a program.
///
/// The engine never interprets shader code; it only uses this table to look
/// up binding points by name. Lookups are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderReflection {
    attributes: Vec<ShaderAttribute>,
    uniforms: Vec<ShaderUniform>,
    constant_buffers: Vec<ShaderConstantBuffer>,
}

impl ShaderReflection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an attribute. Returns false (and logs) once the table is full.
    pub fn push_attribute(&mut self, attribute: ShaderAttribute) -> bool {
        if self.attributes.len() >= SHADER_MAX_ATTRIBUTES {
            log::warn!("too many shader attributes; dropping `{}`", attribute.name);
            return false;
        }
        self.attributes.push(attribute);
        true
    }

    /// Records a uniform. Uniforms living inside a block report a negative
    /// location and are skipped.
    pub fn push_uniform(&mut self, uniform: ShaderUniform) -> bool {
        if uniform.location < 0 {
            return false;
        }
        if self.uniforms.len() >= SHADER_MAX_UNIFORMS {
            log::warn!("too many shader uniforms; dropping `{}`", uniform.name);
            return false;
        }
        self.uniforms.push(uniform);
        true
    }

    pub fn push_constant_buffer(&mut self, constant_buffer: ShaderConstantBuffer) -> bool {
        if self.constant_buffers.len() >= SHADER_MAX_CONSTANT_BUFFERS {
            log::warn!(
                "too many shader uniform buffers; dropping `{}`",
                constant_buffer.name
            );
            return false;
        }
        self.constant_buffers.push(constant_buffer);
        true
    }

    #[inline]
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    #[inline]
    pub fn uniforms(&self) -> &[ShaderUniform] {
        &self.uniforms
    }

    #[inline]
    pub fn constant_buffers(&self) -> &[ShaderConstantBuffer] {
        &self.constant_buffers
    }

    pub fn find_attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn find_uniform_index(&self, name: &str) -> Option<usize> {
        self.uniforms.iter().position(|u| u.name == name)
    }

    pub fn find_constant_buffer_index(&self, name: &str) -> Option<usize> {
        self.constant_buffers.iter().position(|c| c.name == name)
    }

    pub fn find_attribute(&self, name: &str) -> Option<&ShaderAttribute> {
        self.find_attribute_index(name).map(|i| &self.attributes[i])
    }

    pub fn find_uniform(&self, name: &str) -> Option<&ShaderUniform> {
        self.find_uniform_index(name).map(|i| &self.uniforms[i])
    }

    pub fn find_constant_buffer(&self, name: &str) -> Option<&ShaderConstantBuffer> {
        self.find_constant_buffer_index(name)
            .map(|i| &self.constant_buffers[i])
    }
}

/// Linked shader program plus its reflection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub handle: ShaderHandle,
    pub reflection: ShaderReflection,
}

impl Shader {
    pub fn new(handle: ShaderHandle, reflection: ShaderReflection) -> Self {
        Self { handle, reflection }
    }

    #[inline]
    pub fn find_uniform(&self, name: &str) -> Option<&ShaderUniform> {
        self.reflection.find_uniform(name)
    }

    #[inline]
    pub fn find_attribute(&self, name: &str) -> Option<&ShaderAttribute> {
        self.reflection.find_attribute(name)
    }

    #[inline]
    pub fn find_constant_buffer(&self, name: &str) -> Option<&ShaderConstantBuffer> {
        self.reflection.find_constant_buffer(name)
    }
}

/// Removes array notation from a reflected name.
///
/// Drivers report array uniforms as `name[0]`. Returns the bare name and
/// whether a suffix was present.
pub fn strip_array_suffix(name: &str) -> (&str, bool) {
    match name.find('[') {
        Some(pos) => (&name[..pos], true),
        None => (name, false),
    }
}
