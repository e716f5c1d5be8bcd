use crate::resource::ShaderHandle;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PolygonFillMode {
    #[default]
    Fill,
    Line,
    Point,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BlendMode {
    #[default]
    None,
    /// Straight alpha; alpha channel accumulates as premultiplied.
    Alpha,
    Add,
    Subtract,
    Multiply,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CullMode {
    #[default]
    None,
    Back,
    Front,
}

/// Comparison used by both the depth and the stencil test.
///
/// `None` disables the test entirely, which is not the same as `Always`
/// (an enabled test that always passes).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum DepthTestMode {
    #[default]
    None,
    Always,
    Never,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    Inc,
    IncWrap,
    Dec,
    DecWrap,
    Invert,
}

/// Stencil test configuration, applied as one unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct StencilState {
    pub test: DepthTestMode,
    pub op_fail_stencil: StencilOp,
    pub op_fail_depth: StencilOp,
    pub op_pass: StencilOp,
    pub write_mask: u8,
    pub reference: u8,
    pub read_mask: u8,
}

impl StencilState {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.test != DepthTestMode::None
    }
}

/// Full pipeline configuration used by the next draw.
///
/// The all-default value (no shader, filled polygons, no blending, no culling,
/// depth and stencil tests off, depth writes off) is valid and cheap to apply.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct DrawState {
    pub shader: Option<ShaderHandle>,
    pub polygon_fill_mode: PolygonFillMode,
    pub blend_mode: BlendMode,
    pub cull_mode: CullMode,
    pub depth_test: DepthTestMode,
    pub depth_write: bool,
    pub stencil: StencilState,
}

impl DrawState {
    #[inline]
    pub fn with_shader(mut self, shader: Option<ShaderHandle>) -> Self {
        self.shader = shader;
        self
    }

    #[inline]
    pub fn with_blend(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    #[inline]
    pub fn with_cull(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    #[inline]
    pub fn with_fill(mut self, polygon_fill_mode: PolygonFillMode) -> Self {
        self.polygon_fill_mode = polygon_fill_mode;
        self
    }

    #[inline]
    pub fn with_depth(mut self, depth_test: DepthTestMode, depth_write: bool) -> Self {
        self.depth_test = depth_test;
        self.depth_write = depth_write;
        self
    }

    #[inline]
    pub fn with_stencil(mut self, stencil: StencilState) -> Self {
        self.stencil = stencil;
        self
    }
}
