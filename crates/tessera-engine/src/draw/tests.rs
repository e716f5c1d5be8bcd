use super::*;
use crate::backend::{BackendCall, RecordingBackend};
use crate::resource::{
    ShaderReflection, ShaderUniform, TextureFormat, TextureInitSettings, TextureWrapMode,
    VertexFormatType,
};
use crate::state::{BlendMode, StateAspect};

type Vertex = [u8; 4];

const FORMAT: [VertexFormatItem; 1] = [VertexFormatItem::new(0, 0, 4, VertexFormatType::Byte, 4)];

fn tri(tag: u8) -> [Vertex; 3] {
    [[tag, 0, 0, 0], [tag, 1, 0, 0], [tag, 2, 0, 0]]
}

fn session(config: DrawConfig) -> Draw<RecordingBackend> {
    let backend = RecordingBackend::new().with_shader("sprite", ShaderReflection::new());
    let mut draw = Draw::init(backend, config).unwrap();
    draw.set_immediate_vertex_format(&FORMAT);
    draw
}

fn draw_count(draw: &Draw<RecordingBackend>) -> usize {
    draw.backend().draws().len()
}

// ── lifecycle ──

#[test]
fn init_applies_every_aspect_once() {
    let draw = Draw::init(RecordingBackend::new(), DrawConfig::default()).unwrap();
    let state_calls = draw
        .backend()
        .calls()
        .iter()
        .filter(|c| c.is_state_change())
        .count();
    assert_eq!(state_calls, StateAspect::ALL.len());
    assert!(!draw.is_draw_state_dirty());
    assert_eq!(draw.stats().granular_state_changes, 6);
    assert_eq!(draw.stats().shader_changes, 1);
}

#[test]
fn init_propagates_allocation_failure() {
    let mut backend = RecordingBackend::new();
    backend.set_fail_allocations(true);
    let err = Draw::init(backend, DrawConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("immediate batch mesh"));
}

#[test]
fn free_draws_pending_geometry_and_releases_everything() {
    let mut draw = session(DrawConfig::default());
    draw.submit_immediate_poly(&tri(1));

    let backend = draw.free();
    assert_eq!(backend.draws().len(), 1);
    assert_eq!(backend.live_resource_count(), 0);
    assert!(!backend.is_initialized());
    assert_eq!(backend.calls().last(), Some(&BackendCall::Shutdown));
}

// ── immediate mode ──

#[test]
fn same_format_twice_does_not_flush() {
    let mut draw = session(DrawConfig::default());
    draw.submit_immediate_poly(&tri(1));
    draw.set_immediate_vertex_format(&FORMAT);
    assert_eq!(draw.pending_immediate_vertices(), 3);
}

#[test]
fn format_change_flushes_pending_geometry() {
    let mut draw = session(DrawConfig::default());
    draw.submit_immediate_poly(&tri(1));

    let wide = [VertexFormatItem::new(0, 0, 8, VertexFormatType::Float, 2)];
    draw.set_immediate_vertex_format(&wide);
    assert_eq!(draw_count(&draw), 1);
    assert_eq!(draw.pending_immediate_vertices(), 0);
}

#[test]
#[should_panic(expected = "strides differ")]
fn mixed_strides_are_rejected() {
    let mut draw = session(DrawConfig::default().with_debug_checks(true));
    draw.set_immediate_vertex_format(&[
        VertexFormatItem::new(0, 0, 8, VertexFormatType::Float, 1),
        VertexFormatItem::new(1, 4, 12, VertexFormatType::Float, 1),
    ]);
}

#[test]
#[should_panic(expected = "vertex format not set")]
fn submit_without_format_panics() {
    let mut draw = Draw::init(RecordingBackend::new(), DrawConfig::default()).unwrap();
    draw.submit_immediate_poly_bytes(&[0; 12]);
}

#[test]
#[should_panic(expected = "vertex format not set")]
fn typed_submit_without_format_reports_missing_format() {
    let mut draw = Draw::init(RecordingBackend::new(), DrawConfig::default()).unwrap();
    draw.submit_immediate_poly(&tri(1));
}

#[test]
#[should_panic(expected = "at least 3 vertices")]
fn two_vertex_polygon_panics() {
    let mut draw = session(DrawConfig::default());
    draw.submit_immediate_poly(&[[0u8; 4]; 2]);
}

#[test]
fn oversized_polygon_is_dropped_without_debug_checks() {
    let config = DrawConfig::default()
        .with_batch_capacity(32)
        .with_debug_checks(false);
    let mut draw = session(config);

    // 5 vertices expand to 9 * 4 = 36 bytes.
    draw.submit_immediate_poly(&[[0u8; 4]; 5]);
    draw.flush();

    assert_eq!(draw_count(&draw), 0);
    assert_eq!(draw.stats().dropped_polys, 1);
}

#[test]
#[should_panic(expected = "more than the immediate batch capacity")]
fn oversized_polygon_panics_with_debug_checks() {
    let config = DrawConfig::default()
        .with_batch_capacity(32)
        .with_debug_checks(true);
    let mut draw = session(config);
    draw.submit_immediate_poly(&[[0u8; 4]; 5]);
}

#[test]
fn polygon_filling_the_batch_exactly_is_accepted() {
    let mut draw = session(DrawConfig::default().with_batch_capacity(24));
    draw.submit_immediate_poly(&[[7u8; 4]; 4]);
    assert_eq!(draw.pending_immediate_bytes(), 24);
    assert_eq!(draw.stats().dropped_polys, 0);
}

#[test]
fn flush_with_empty_batch_draws_nothing() {
    let mut draw = session(DrawConfig::default());
    draw.flush();
    draw.flush();
    assert_eq!(draw_count(&draw), 0);
    assert_eq!(draw.stats().immediate_draws, 0);
}

#[test]
fn marked_dirty_state_splits_batches() {
    let mut draw = session(DrawConfig::default());
    draw.submit_immediate_poly(&tri(1));
    draw.mark_draw_state_dirty();
    draw.submit_immediate_poly(&tri(2));
    draw.flush();
    assert_eq!(draw_count(&draw), 2);
}

#[test]
fn invalidated_state_is_reapplied_in_full() {
    let mut draw = session(DrawConfig::default());
    draw.flush().backend().clear_calls();
    draw.invalidate_draw_state();
    draw.flush();
    let state_calls = draw
        .backend()
        .calls()
        .iter()
        .filter(|c| c.is_state_change())
        .count();
    assert_eq!(state_calls, StateAspect::ALL.len());
}

// ── resources ──

#[test]
fn freeing_the_bound_shader_unbinds_it_first() {
    let mut draw = session(DrawConfig::default());
    let shader = draw.load_shader("sprite").unwrap();
    draw.draw_state_mut().shader = Some(shader.handle);
    draw.submit_immediate_poly(&tri(1));
    draw.flush().backend().clear_calls();

    let handle = shader.handle;
    draw.free_shader(shader);

    assert_eq!(draw.draw_state().shader, None);
    assert_eq!(
        draw.backend().calls(),
        &[BackendCall::SetShader(None), BackendCall::ShaderFree(handle)]
    );
}

#[test]
fn freeing_the_bound_shader_keeps_a_newer_request() {
    let mut draw = session(DrawConfig::default());
    let old = draw.load_shader("sprite").unwrap();
    let new = draw.load_shader("sprite").unwrap();
    draw.draw_state_mut().shader = Some(old.handle);
    draw.flush();

    draw.draw_state_mut().shader = Some(new.handle);
    draw.flush().backend().clear_calls();
    let old_handle = old.handle;
    draw.free_shader(old);

    assert_eq!(draw.draw_state().shader, Some(new.handle));
    assert_eq!(draw.backend().live_state().shader, Some(new.handle));
    assert_eq!(draw.backend().calls(), &[BackendCall::ShaderFree(old_handle)]);
}

#[test]
fn applied_shader_is_replaced_by_the_request_when_freed() {
    let mut draw = session(DrawConfig::default());
    let old = draw.load_shader("sprite").unwrap();
    let new = draw.load_shader("sprite").unwrap();
    draw.draw_state_mut().shader = Some(old.handle);
    draw.flush().backend().clear_calls();

    // Requested but not yet committed when the bound one goes away.
    draw.draw_state_mut().shader = Some(new.handle);
    let old_handle = old.handle;
    draw.free_shader(old);

    assert_eq!(draw.draw_state().shader, Some(new.handle));
    assert_eq!(
        draw.backend().calls(),
        &[
            BackendCall::SetShader(Some(new.handle)),
            BackendCall::ShaderFree(old_handle),
        ]
    );
}

#[test]
fn unbound_shader_is_freed_without_state_change() {
    let mut draw = session(DrawConfig::default());
    let shader = draw.load_shader("sprite").unwrap();
    draw.flush().backend().clear_calls();

    let handle = shader.handle;
    draw.free_shader(shader);
    assert_eq!(draw.backend().calls(), &[BackendCall::ShaderFree(handle)]);
}

#[test]
fn missing_shader_reports_path() {
    let mut draw = session(DrawConfig::default());
    let err = draw.load_shader("shaders/nope").unwrap_err();
    assert!(format!("{err:#}").contains("failed to load shader shaders/nope"));
}

#[test]
fn uniform_set_flushes_pending_geometry_first() {
    let mut draw = session(DrawConfig::default());
    let shader = draw.load_shader("sprite").unwrap();
    let uniform = ShaderUniform {
        name: "scale".into(),
        location: 3,
        ty: 0,
        array_len: 1,
        is_array: false,
    };

    draw.submit_immediate_poly(&tri(1));
    draw.set_uniform_float(&shader, &uniform, 0, 2.0);

    let calls = draw.backend().calls();
    let draw_at = calls.iter().position(BackendCall::is_draw).unwrap();
    let set_at = calls
        .iter()
        .position(|c| matches!(c, BackendCall::SetUniformFloat { .. }))
        .unwrap();
    assert!(draw_at < set_at);
}

#[test]
fn texture_settings_are_resolved_and_mipmaps_tracked() {
    let mut draw = session(DrawConfig::default());
    let mut texture = draw
        .init_texture(TextureInitSettings::texture_2d(TextureFormat::Rgba8, 4, 4))
        .unwrap();
    assert_eq!(texture.settings.wrap_mode, TextureWrapMode::Repeat);

    draw.set_texture_data(&texture, 1, 1, 2, 2, &[0; 16]);
    draw.generate_texture_mipmaps(&mut texture);
    assert!(texture.has_mipmaps);
    draw.free_texture(texture);
}

#[test]
#[should_panic(expected = "outside 4x4")]
fn texture_upload_outside_bounds_panics() {
    let mut draw = session(DrawConfig::default());
    let texture = draw
        .init_texture(TextureInitSettings::texture_2d(TextureFormat::Rgb8, 4, 4))
        .unwrap();
    draw.set_texture_data(&texture, 3, 0, 2, 1, &[0; 6]);
}

#[test]
#[should_panic(expected = "exceeds size 16")]
fn constant_buffer_overrun_panics() {
    let mut draw = session(DrawConfig::default());
    let buffer = draw.init_constant_buffer(16).unwrap();
    draw.set_constant_buffer_data(&buffer, 8, &[0; 12]);
}

#[test]
fn mesh_free_releases_streams_before_mesh() {
    let mut draw = session(DrawConfig::default());
    let mut mesh = draw.init_mesh().unwrap();
    let vb = draw.init_vertex_buffer(48, VertexBufferUsage::Static).unwrap();
    mesh.vertex_buffers.push(vb);
    mesh.vertex_format.extend_from_slice(&FORMAT);
    mesh.vertex_count = 12;
    draw.apply_mesh_structure(&mesh).unwrap();
    draw.set_vertex_buffer_data(&vb, 0, &[1; 48]);
    draw.draw_mesh(&mesh, 0, 12);
    assert_eq!(draw.stats().mesh_draws, 1);

    draw.flush().backend().clear_calls();
    let mesh_handle = mesh.handle;
    draw.free_mesh(mesh);
    assert_eq!(
        draw.backend().calls(),
        &[BackendCall::VertexBufferFree(vb.handle), BackendCall::MeshFree(mesh_handle)]
    );
}

#[test]
fn bad_mesh_structure_is_an_error() {
    let mut draw = session(DrawConfig::default());
    let mut mesh = draw.init_mesh().unwrap();
    mesh.vertex_format.extend_from_slice(&FORMAT);
    let err = draw.apply_mesh_structure(&mesh).unwrap_err();
    assert!(format!("{err:#}").contains("out of range"));
}

// ── frame ops ──

#[test]
fn clears_flush_first() {
    let mut draw = session(DrawConfig::default());
    draw.set_draw_state(DrawState::default().with_blend(BlendMode::Alpha));
    draw.submit_immediate_poly(&tri(1));
    draw.clear_color(crate::paint::Color::black());

    let calls = draw.backend().calls();
    assert!(matches!(calls.last(), Some(BackendCall::ClearColor(_))));
    assert!(calls[calls.len() - 2].is_draw());
}

#[test]
fn reset_stats_zeroes_counters() {
    let mut draw = session(DrawConfig::default());
    draw.submit_immediate_poly(&tri(1));
    draw.flush();
    assert!(draw.stats().flushes > 0);
    draw.reset_stats();
    assert_eq!(draw.stats(), DrawStats::default());
}
