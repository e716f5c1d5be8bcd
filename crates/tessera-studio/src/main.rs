//! Headless replay of a small frame through the recording backend.
//!
//! Prints every backend call the dispatcher issued and the session counters.
//! Run with `RUST_LOG=debug` (or `trace`) to see the dispatcher's own logs.

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};

use tessera_engine::backend::{BackendCall, RecordingBackend};
use tessera_engine::coords::Viewport;
use tessera_engine::draw::{Draw, DrawConfig, DrawStats};
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::paint::Color;
use tessera_engine::resource::{
    ShaderAttribute, ShaderReflection, ShaderUniform, TextureFormat, TextureInitSettings,
    VertexFormatItem, VertexFormatType,
};
use tessera_engine::state::{BlendMode, CullMode, DrawState};

const SPRITE_SHADER: &str = "shaders/sprite.glsl";

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteVertex {
    pos: [f32; 2],
    rgba: [u8; 4],
}

impl SpriteVertex {
    const STRIDE: u32 = size_of::<Self>() as u32;

    const FORMAT: [VertexFormatItem; 2] = [
        VertexFormatItem::new(0, 0, Self::STRIDE, VertexFormatType::Float, 2),
        VertexFormatItem::new(1, 8, Self::STRIDE, VertexFormatType::Byte, 4),
    ];

    const fn new(x: f32, y: f32, rgba: [u8; 4]) -> Self {
        Self { pos: [x, y], rgba }
    }
}

fn sprite_reflection() -> ShaderReflection {
    let mut r = ShaderReflection::new();
    r.push_attribute(ShaderAttribute { name: "a_pos".into(), location: 0, ty: 0, array_len: 1 });
    r.push_attribute(ShaderAttribute { name: "a_color".into(), location: 1, ty: 0, array_len: 1 });
    r.push_uniform(ShaderUniform {
        name: "u_texture".into(),
        location: 0,
        ty: 0,
        array_len: 1,
        is_array: false,
    });
    r
}

fn regular_polygon(sides: usize, radius: f32, rgba: [u8; 4]) -> Vec<SpriteVertex> {
    (0..sides)
        .map(|i| {
            let a = i as f32 / sides as f32 * std::f32::consts::TAU;
            SpriteVertex::new(radius * a.cos(), radius * a.sin(), rgba)
        })
        .collect()
}

fn run_frame(draw: &mut Draw<RecordingBackend>) -> Result<()> {
    let shader = draw.load_shader(SPRITE_SHADER)?;
    let texture = draw.init_texture(TextureInitSettings::texture_2d(TextureFormat::Rgba8, 2, 2))?;
    draw.set_texture_data(&texture, 0, 0, 2, 2, &[255; 16]);

    draw.set_viewport(Viewport::from_size(800, 600));
    draw.clear_color(Color::new(0.1, 0.1, 0.12, 1.0));
    draw.clear_depth(1.0);

    let u_texture = shader
        .find_uniform("u_texture")
        .cloned()
        .context("sprite shader has no u_texture uniform")?;
    draw.set_uniform_texture(&shader, &u_texture, 0, &texture);

    draw.set_immediate_vertex_format(&SpriteVertex::FORMAT);
    draw.set_draw_state(
        DrawState::default()
            .with_shader(Some(shader.handle))
            .with_blend(BlendMode::Alpha)
            .with_cull(CullMode::Back),
    );

    // Same state: both land in one draw.
    draw.submit_immediate_poly(&regular_polygon(4, 0.5, [255, 0, 0, 255]));
    draw.submit_immediate_poly(&regular_polygon(3, 0.25, [0, 255, 0, 255]));

    // Blend change splits the batch.
    draw.draw_state_mut().blend_mode = BlendMode::Add;
    draw.submit_immediate_poly(&regular_polygon(5, 0.75, [0, 0, 255, 128]));
    draw.flush();

    draw.free_texture(texture);
    draw.free_shader(shader);
    Ok(())
}

fn print_trace(calls: &[BackendCall]) {
    println!("backend trace ({} calls):", calls.len());
    for (i, call) in calls.iter().enumerate() {
        let marker = if call.is_draw() {
            "*"
        } else if call.is_state_change() {
            "~"
        } else {
            " "
        };
        println!("  {i:3} {marker} {call:?}");
    }
}

fn print_stats(stats: &DrawStats) {
    println!("stats:");
    println!("  immediate draws         {}", stats.immediate_draws);
    println!("  mesh draws              {}", stats.mesh_draws);
    println!("  shader changes          {}", stats.shader_changes);
    println!("  granular state changes  {}", stats.granular_state_changes);
    println!("  flushes                 {}", stats.flushes);
    println!("  dropped polygons        {}", stats.dropped_polys);
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let backend = RecordingBackend::new().with_shader(SPRITE_SHADER, sprite_reflection());
    let mut draw = Draw::init(backend, DrawConfig::default())?;

    run_frame(&mut draw)?;
    let stats = draw.stats();
    let backend = draw.free();

    print_trace(backend.calls());
    for (i, record) in backend.draws().iter().enumerate() {
        println!(
            "draw {i}: {} vertices, blend {:?}, cull {:?}",
            record.vertex_count, record.state.blend_mode, record.state.cull_mode
        );
    }
    print_stats(&stats);

    log::info!("replay finished");
    Ok(())
}
