//! Translation of engine pipeline state into wgpu descriptors.
//!
//! wgpu bakes blend, raster and depth-stencil configuration into render
//! pipelines, so a wgpu backend keys its pipeline cache on the applied
//! [`DrawState`] and builds descriptors from these helpers. None of them need
//! a device.
//!
//! Nothing in this crate calls these; they are for out-of-tree backends that
//! implement [`DrawBackend`](super::DrawBackend) on a `wgpu::Device`. Built
//! with the default `wgpu` feature; `--no-default-features` leaves wgpu out
//! for recording-only builds.

use anyhow::{Result, bail};

use crate::resource::{VertexFormatItem, VertexFormatType};
use crate::state::{BlendMode, CullMode, DepthTestMode, DrawState, PolygonFillMode, StencilOp};

// ── blend ─────────────────────────────────────────────────────────────────

const fn component(
    src_factor: wgpu::BlendFactor,
    dst_factor: wgpu::BlendFactor,
    operation: wgpu::BlendOperation,
) -> wgpu::BlendComponent {
    wgpu::BlendComponent { src_factor, dst_factor, operation }
}

/// `None` disables blending.
pub fn blend_state(mode: BlendMode) -> Option<wgpu::BlendState> {
    use wgpu::BlendFactor as F;
    use wgpu::BlendOperation as Op;

    let state = match mode {
        BlendMode::None => return None,
        // Straight-alpha colour over a premultiplied alpha channel.
        BlendMode::Alpha => wgpu::BlendState {
            color: component(F::SrcAlpha, F::OneMinusSrcAlpha, Op::Add),
            alpha: component(F::One, F::OneMinusSrcAlpha, Op::Add),
        },
        BlendMode::Add => {
            let c = component(F::SrcAlpha, F::One, Op::Add);
            wgpu::BlendState { color: c, alpha: c }
        }
        BlendMode::Subtract => {
            let c = component(F::SrcAlpha, F::One, Op::ReverseSubtract);
            wgpu::BlendState { color: c, alpha: c }
        }
        BlendMode::Multiply => {
            let c = component(F::Dst, F::Zero, Op::Add);
            wgpu::BlendState { color: c, alpha: c }
        }
    };
    Some(state)
}

// ── raster ────────────────────────────────────────────────────────────────

pub fn cull_face(mode: CullMode) -> Option<wgpu::Face> {
    match mode {
        CullMode::None => None,
        CullMode::Back => Some(wgpu::Face::Back),
        CullMode::Front => Some(wgpu::Face::Front),
    }
}

pub fn polygon_mode(mode: PolygonFillMode) -> wgpu::PolygonMode {
    match mode {
        PolygonFillMode::Fill => wgpu::PolygonMode::Fill,
        PolygonFillMode::Line => wgpu::PolygonMode::Line,
        PolygonFillMode::Point => wgpu::PolygonMode::Point,
    }
}

/// Triangle-list primitive state. Front faces wind clockwise.
pub fn primitive_state(state: &DrawState) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        front_face: wgpu::FrontFace::Cw,
        cull_mode: cull_face(state.cull_mode),
        polygon_mode: polygon_mode(state.polygon_fill_mode),
        ..Default::default()
    }
}

// ── depth / stencil ───────────────────────────────────────────────────────

/// A disabled test (`None`) compares as `Always`.
pub fn compare_function(mode: DepthTestMode) -> wgpu::CompareFunction {
    match mode {
        DepthTestMode::None | DepthTestMode::Always => wgpu::CompareFunction::Always,
        DepthTestMode::Never => wgpu::CompareFunction::Never,
        DepthTestMode::Equal => wgpu::CompareFunction::Equal,
        DepthTestMode::NotEqual => wgpu::CompareFunction::NotEqual,
        DepthTestMode::Less => wgpu::CompareFunction::Less,
        DepthTestMode::LessEqual => wgpu::CompareFunction::LessEqual,
        DepthTestMode::Greater => wgpu::CompareFunction::Greater,
        DepthTestMode::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
    }
}

pub fn stencil_operation(op: StencilOp) -> wgpu::StencilOperation {
    match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::Zero => wgpu::StencilOperation::Zero,
        StencilOp::Replace => wgpu::StencilOperation::Replace,
        StencilOp::Inc => wgpu::StencilOperation::IncrementClamp,
        StencilOp::IncWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOp::Dec => wgpu::StencilOperation::DecrementClamp,
        StencilOp::DecWrap => wgpu::StencilOperation::DecrementWrap,
        StencilOp::Invert => wgpu::StencilOperation::Invert,
    }
}

fn stencil_state(state: &DrawState) -> wgpu::StencilState {
    let stencil = &state.stencil;
    if !stencil.is_enabled() {
        return wgpu::StencilState::default();
    }

    let face = wgpu::StencilFaceState {
        compare: compare_function(stencil.test),
        fail_op: stencil_operation(stencil.op_fail_stencil),
        depth_fail_op: stencil_operation(stencil.op_fail_depth),
        pass_op: stencil_operation(stencil.op_pass),
    };
    wgpu::StencilState {
        front: face,
        back: face,
        read_mask: stencil.read_mask as u32,
        write_mask: stencil.write_mask as u32,
    }
}

/// Depth-stencil configuration, or `None` when neither test is enabled.
///
/// Depth writes only happen while the depth test is on; a disabled test with
/// writes requested writes nothing.
pub fn depth_stencil_state(
    state: &DrawState,
    format: wgpu::TextureFormat,
) -> Option<wgpu::DepthStencilState> {
    let depth_enabled = state.depth_test != DepthTestMode::None;
    if !depth_enabled && !state.stencil.is_enabled() {
        return None;
    }

    Some(wgpu::DepthStencilState {
        format,
        depth_write_enabled: depth_enabled && state.depth_write,
        depth_compare: compare_function(state.depth_test),
        stencil: stencil_state(state),
        bias: wgpu::DepthBiasState::default(),
    })
}

/// Value for `RenderPass::set_stencil_reference`; wgpu keeps it dynamic.
#[inline]
pub fn stencil_reference(state: &DrawState) -> u32 {
    state.stencil.reference as u32
}

// ── vertex layout ─────────────────────────────────────────────────────────

/// `None` for combinations wgpu has no format for (three bytes).
pub fn vertex_format(item: &VertexFormatItem) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as V;

    match (item.ty, item.component_count) {
        (VertexFormatType::Float, 1) => Some(V::Float32),
        (VertexFormatType::Float, 2) => Some(V::Float32x2),
        (VertexFormatType::Float, 3) => Some(V::Float32x3),
        (VertexFormatType::Float, 4) => Some(V::Float32x4),
        (VertexFormatType::Byte, 1) => Some(V::Uint8),
        (VertexFormatType::Byte, 2) => Some(V::Uint8x2),
        (VertexFormatType::Byte, 4) => Some(V::Uint8x4),
        _ => None,
    }
}

/// Attributes of vertex stream `buffer_index`, in format order.
pub fn vertex_attributes(
    format: &[VertexFormatItem],
    buffer_index: u32,
) -> Result<Vec<wgpu::VertexAttribute>> {
    format
        .iter()
        .filter(|item| item.buffer_index == buffer_index)
        .map(|item| {
            let Some(vf) = vertex_format(item) else {
                bail!(
                    "input {}: {} x {:?} has no wgpu vertex format",
                    item.input_index,
                    item.component_count,
                    item.ty
                );
            };
            Ok(wgpu::VertexAttribute {
                format: vf,
                offset: item.offset as u64,
                shader_location: item.input_index,
            })
        })
        .collect()
}
