/// Declares an opaque backend handle.
///
/// Handles are plain integers minted by a backend. The engine only copies and
/// compares them.
macro_rules! backend_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a backend-specific raw identifier.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the backend-specific raw identifier.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

backend_handle!(
    /// Vertex array object (or backend equivalent) describing a mesh layout.
    MeshHandle
);
backend_handle!(
    /// GPU vertex buffer.
    VertexBufferHandle
);
backend_handle!(
    /// Linked shader program.
    ShaderHandle
);
backend_handle!(
    /// Texture object.
    TextureHandle
);
backend_handle!(
    /// Uniform/constant buffer.
    ConstantBufferHandle
);
