//! # Debug Draw Demo
//!
//! Headless host for the debug draw system. Runs a fixed number of frames,
//! drawing a grid, orbiting markers, filled and screen-space quads and a text
//! label each frame, and logs what every camera would submit to the GPU.
//!
//! ```text
//! RUST_LOG=debug cargo run --bin debug_draw_demo -- --frames 5 --cameras 2
//! ```

mod text;

use clap::Parser;
use glam::{Mat4, Vec2, Vec3};

use lilium_debug_draw::{
    BatchPayload, BatchSubmitter, DEFAULT_INITIAL_CAPACITY, DebugDraw, DebugDrawConfig,
    DebugDrawError, DrawTarget, FrameView, GlyphQuad, QuadColors, colors,
};

/// Debug draw demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "debug_draw_demo",
    about = "Drive the debug draw frame cycle without a window or GPU",
    version
)]
struct Args {
    /// Number of frames to simulate.
    #[arg(long, default_value = "3")]
    frames: u32,

    /// Line markers drawn per frame.
    #[arg(long, default_value = "64")]
    lines: u32,

    /// Filled world-space quads drawn per frame.
    #[arg(long, default_value = "16")]
    quads: u32,

    /// Label drawn as a glyph run.
    #[arg(long, default_value = "RedLilium debug draw")]
    text: String,

    /// Starting vertex capacity (and growth increment) of each batch.
    #[arg(long, default_value_t = DEFAULT_INITIAL_CAPACITY)]
    initial_capacity: usize,

    /// Cameras rendering each frame.
    #[arg(long, default_value = "1")]
    cameras: u32,

    /// Viewport width in pixels.
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Orbit camera producing the per-frame [`FrameView`].
struct OrbitCamera {
    distance: f32,
    height: f32,
    fov_y: f32,
    viewport: Vec2,
}

impl OrbitCamera {
    fn view(&self, angle: f32) -> FrameView {
        let eye = Vec3::new(
            angle.cos() * self.distance,
            self.height,
            angle.sin() * self.distance,
        );
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, self.viewport.x / self.viewport.y, 0.1, 100.0);
        FrameView::new((proj * view).to_cols_array_2d(), self.viewport.to_array())
    }
}

/// Stands in for the renderer: logs each payload instead of recording a
/// draw command.
#[derive(Default)]
struct LoggingSubmitter {
    draws: usize,
    vertices: usize,
    index_bytes: usize,
}

impl BatchSubmitter for LoggingSubmitter {
    fn submit(&mut self, view: &FrameView, payload: &BatchPayload<'_>) {
        let geometry = &payload.geometry;
        let vertex_bytes = match geometry.interleaved_glyphs() {
            Some(vertices) => std::mem::size_of_val(vertices.as_slice()),
            None => std::mem::size_of_val(geometry.interleaved().as_slice()),
        };
        log::debug!(
            "draw {:?} material {} {:?}: {} vertices ({} bytes), {} indices, viewport {:?}",
            payload.kind,
            payload.material.0,
            payload.topology(),
            geometry.vertex_count(),
            vertex_bytes,
            geometry.index_count(),
            view.viewport_size,
        );
        self.draws += 1;
        self.vertices += geometry.vertex_count();
        self.index_bytes += geometry.index_bytes().len();
    }
}

/// Everything the demo's "game logic" draws in one frame.
fn draw_scene(draw: &mut impl DrawTarget, args: &Args, label: &[GlyphQuad], time: f32) {
    draw.draw_grid([0.0; 3], 1.0, 10, [0.3, 0.3, 0.3, 1.0]);
    draw.draw_axes([0.0; 3], 2.0);

    for i in 0..args.lines {
        let angle = time + i as f32 / args.lines.max(1) as f32 * std::f32::consts::TAU;
        let p = Vec3::new(angle.cos() * 4.0, 0.5, angle.sin() * 4.0);
        draw.draw_cross(p.to_array(), 0.25, colors::YELLOW);
    }

    for i in 0..args.quads {
        let x = i as f32 - args.quads as f32 * 0.5;
        let corners = [
            [x, 0.0, -2.0],
            [x + 0.8, 0.0, -2.0],
            [x + 0.8, 0.8, -2.0],
            [x, 0.8, -2.0],
        ];
        draw.draw_filled_quad(
            &corners,
            QuadColors::PerCorner([colors::RED, colors::GREEN, colors::BLUE, colors::WHITE]),
        );
        draw.draw_wire_quad(&corners, colors::BLACK.into());
    }

    draw.draw_aabb([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0], colors::GREEN);
    draw.draw_sphere([0.0, 1.0, 0.0], 1.0, colors::BLUE);

    // HUD panel in pixels and a progress bar in normalized coordinates.
    draw.draw_pixel_screen_quad(
        &[
            [16.0, 16.0, 0.0],
            [336.0, 16.0, 0.0],
            [336.0, 64.0, 0.0],
            [16.0, 64.0, 0.0],
        ],
        [0.0, 0.0, 0.0, 0.6].into(),
    );
    let progress = time.fract();
    draw.draw_normalized_screen_quad(
        &[
            [0.1, 0.95, 0.0],
            [0.1 + 0.8 * progress, 0.95, 0.0],
            [0.1 + 0.8 * progress, 0.97, 0.0],
            [0.1, 0.97, 0.0],
        ],
        colors::GREEN.into(),
    );

    draw.draw_text_run(label, [24.0, 48.0, 0.0], colors::WHITE);
}

fn run(args: &Args) -> Result<(), DebugDrawError> {
    let config = DebugDrawConfig::new()
        .with_initial_capacity(args.initial_capacity)
        .with_soft_vertex_ceiling(args.initial_capacity);
    let mut debug_draw = DebugDraw::new(config)?;

    let label = text::shape_monospace(&args.text, Vec2::new(8.0, 16.0));
    let cameras: Vec<OrbitCamera> = (0..args.cameras.max(1))
        .map(|i| OrbitCamera {
            distance: 10.0 + i as f32 * 4.0,
            height: 5.0,
            fov_y: 60f32.to_radians(),
            viewport: Vec2::new(args.width as f32, args.height as f32),
        })
        .collect();

    let mut submitter = LoggingSubmitter::default();
    for frame in 0..args.frames {
        let time = frame as f32 * 0.25;

        debug_draw.on_frame_start();
        draw_scene(&mut debug_draw, args, &label, time);

        for (i, camera) in cameras.iter().enumerate() {
            let view = camera.view(time + i as f32);
            let report = debug_draw.on_frame_render(&view, &mut submitter);
            log::info!(
                "Frame {} camera {}: {} batches, {} vertices{}",
                report.frame,
                i,
                report.submitted,
                report.batches.iter().map(|b| b.vertices).sum::<usize>(),
                if report.overflowed { " (overflowed)" } else { "" }
            );
        }
    }

    log::info!(
        "Submitted {} draws, {} vertices, {} index bytes over {} frames",
        submitter.draws,
        submitter.vertices,
        submitter.index_bytes,
        args.frames
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting debug draw demo: {:?}", args);

    if let Err(err) = run(&args) {
        log::error!("Debug draw demo failed: {err}");
        std::process::exit(1);
    }
}
