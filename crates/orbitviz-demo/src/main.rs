use std::time::Instant;

use glam::{Vec2, Vec3, Vec4};

use orbitviz_engine::camera::OrbitCamera;
use orbitviz_engine::core::{App, AppControl, FrameCtx};
use orbitviz_engine::device::GpuInit;
use orbitviz_engine::fatal::OrExit;
use orbitviz_engine::input::Key;
use orbitviz_engine::logging::{init_logging, LoggingConfig};
use orbitviz_engine::mesh::{CubeSample, Grid, GridExtent};
use orbitviz_engine::render::{
    ColorLines, ColoredVertex, Cubemesh, Gridmesh, LineMode, Lines, TextureImage,
};
use orbitviz_engine::window::{Runtime, RuntimeConfig};

// ── scene constants ────────────────────────────────────────────────────────

const LINE_ROWS: usize = 10;
const LINE_VERTS: usize = 16;

const TERRAIN_N: usize = 24;
const TERRAIN_EXTENT: GridExtent = GridExtent {
    min_x: 2.0,
    max_x: 8.0,
    min_y: -3.0,
    max_y: 3.0,
};

const OUTLINE_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.6);

const SURFACE_N: usize = 32;
const CHECKER_SIZE: u32 = 256;
const CHECKER_CELL: u32 = 32;

struct Demo {
    start: Instant,
    mode: LineMode,
    home: OrbitCamera,

    grid_lines: ColorLines,
    outline: Lines,
    terrain: Cubemesh,
    surface: Gridmesh,
}

impl Demo {
    fn new(home: OrbitCamera, texture: TextureImage) -> Self {
        Self {
            start: Instant::now(),
            mode: LineMode::Lines,
            home,
            grid_lines: ColorLines::new(),
            outline: Lines::new(),
            terrain: Cubemesh::new(),
            surface: Gridmesh::new(texture),
        }
    }
}

impl App for Demo {
    fn on_keypress(&mut self, key: Key, camera: &mut OrbitCamera) {
        log::info!("got keypress: {key:?}");
        match key {
            Key::R => *camera = self.home,
            Key::P => {
                self.mode = self.mode.next();
                log::info!("line mode {:?}", self.mode);
            }
            _ => {}
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let t = ctx.time.now.duration_since(self.start).as_secs_f32();
        let mode = self.mode;

        ctx.overlay_text(
            format!("{mode:?}  [P] cycle  [R] reset"),
            Vec2::new(25.0, 50.0),
            Vec4::new(0.7, 0.7, 0.7, 1.0),
        );

        let lines = color_line_rows();
        let footprint = [extent_outline(TERRAIN_EXTENT)];
        let columns = terrain(t);
        let sheet = ripple(t);

        ctx.render(|rctx, target, view_proj| {
            self.grid_lines.update(rctx, &lines[..]);
            self.grid_lines.draw(rctx, target, view_proj, mode);

            self.outline.update(rctx, &footprint[..]);
            self.outline.draw(rctx, target, view_proj, OUTLINE_COLOR, LineMode::LineStrip);

            self.terrain.update(rctx, &columns, TERRAIN_EXTENT).or_exit();
            self.terrain.draw(rctx, target, view_proj);

            self.surface.update(rctx, &sheet).or_exit();
            self.surface.draw(rctx, target, view_proj);
        })
    }
}

/// Ten rows of sixteen vertices on the z = 0 plane, fading red to blue.
fn color_line_rows() -> Vec<Vec<ColoredVertex>> {
    (0..LINE_ROWS)
        .map(|kr| {
            (0..LINE_VERTS)
                .map(|kb| {
                    let r = kr as f32 / (LINE_ROWS - 1) as f32;
                    let b = kb as f32 / (LINE_VERTS - 1) as f32;
                    ColoredVertex::new(
                        Vec3::new(-(kr as f32), -(kb as f32), 0.0),
                        Vec4::new(r, 1.0 - r * b, b, 1.0),
                    )
                })
                .collect()
        })
        .collect()
}

/// Closed loop around the terrain footprint on the z = 0 plane.
fn extent_outline(e: GridExtent) -> [Vec3; 5] {
    [
        Vec3::new(e.min_x, e.min_y, 0.0),
        Vec3::new(e.max_x, e.min_y, 0.0),
        Vec3::new(e.max_x, e.max_y, 0.0),
        Vec3::new(e.min_x, e.max_y, 0.0),
        Vec3::new(e.min_x, e.min_y, 0.0),
    ]
}

/// Animated columns; world +Z is down, so heights are negative.
fn terrain(t: f32) -> Grid<CubeSample> {
    Grid::from_fn(TERRAIN_N, TERRAIN_N, |kx, ky| {
        let u = kx as f32 / (TERRAIN_N - 1) as f32;
        let v = ky as f32 / (TERRAIN_N - 1) as f32;
        let h = 0.5 + 0.5 * (6.0 * u + t).sin() * (4.0 * v - 0.5 * t).cos();
        CubeSample::new(-h, Vec3::new(h, 0.3 + 0.4 * u, 1.0 - h))
    })
}

/// Textured sheet with a travelling ripple, hanging above the line grid.
fn ripple(t: f32) -> Grid<Vec3> {
    Grid::from_fn(SURFACE_N, SURFACE_N, |r, c| {
        let x = -9.0 + 9.0 * r as f32 / (SURFACE_N - 1) as f32;
        let y = -15.0 + 15.0 * c as f32 / (SURFACE_N - 1) as f32;
        let d = Vec2::new(x + 4.5, y + 7.5).length();
        Vec3::new(x, y, -3.0 + 0.3 * (2.0 * d - 3.0 * t).sin())
    })
}

fn checker_texture() -> TextureImage {
    let mut pixels = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 4) as usize);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let on = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0;
            let px = if on { [230, 200, 60, 255] } else { [40, 60, 120, 255] };
            pixels.extend_from_slice(&px);
        }
    }
    TextureImage::from_rgba(CHECKER_SIZE, CHECKER_SIZE, pixels).or_exit()
}

fn main() {
    init_logging(LoggingConfig::default());

    // Optional first argument: an image file for the grid surface.
    let texture = match std::env::args_os().nth(1) {
        Some(path) => TextureImage::from_path(path).or_exit(),
        None => checker_texture(),
    };

    let config = RuntimeConfig {
        title: "orbitviz demo".to_string(),
        ..Default::default()
    };
    let app = Demo::new(config.camera, texture);

    Runtime::run(config, GpuInit::default(), app).or_exit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_outline_is_closed() {
        let loop_ = extent_outline(TERRAIN_EXTENT);
        assert_eq!(loop_.first(), loop_.last());
        assert!(loop_.iter().all(|p| p.z == 0.0));
        assert_eq!(loop_[2], Vec3::new(8.0, 3.0, 0.0));
    }

    #[test]
    fn line_rows_have_expected_shape() {
        let rows = color_line_rows();
        assert_eq!(rows.len(), LINE_ROWS);
        assert!(rows.iter().all(|r| r.len() == LINE_VERTS));
    }
}
