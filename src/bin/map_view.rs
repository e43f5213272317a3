//! Top-down 2-D view of a portal level.
//!
//! ```bash
//! cargo run --release --bin map_view -- levels/demo.txt --spawn 2,3
//! ```
//!
//! Solid walls white, portals red, the sector holding the spawn point
//! yellow. Esc quits.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use glam::{Vec2, vec2};
use log::{LevelFilter, info, warn};
use minifb::{Key, Window, WindowOptions};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use portal_rs::{
    level::load_level,
    renderer::{FrameBuffer, Rgba, Surface},
    world::{Camera, Level, SectorId},
};

const SOLID: Rgba = 0x00_FFFFFF;
const PORTAL: Rgba = 0x00_AA0000;
const HIGHLIGHT: Rgba = 0x00_FFFF00;
const CAMERA: Rgba = 0x00_00FF00;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Level file (`[sectors]` / `[walls]` text format)
    #[arg(value_name = "LEVEL", default_value = "levels/demo.txt")]
    level: PathBuf,

    /// Camera position as `x,y`
    #[arg(long, value_name = "X,Y", value_parser = parse_point, default_value = "2,3")]
    spawn: Vec2,

    /// Camera heading in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    yaw: f32,

    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 768)]
    height: usize,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let num = |t: &str| t.trim().parse::<f32>().map_err(|e| format!("`{t}`: {e}"));
    Ok(vec2(num(x)?, num(y)?))
}

/// Map-space → screen-space transform, 10 % margin, north up.
struct MapTransform {
    min: Vec2,
    scale: f32,
    offset: Vec2,
    height: f32,
}

impl MapTransform {
    fn fit(level: &Level, width: usize, height: usize) -> Option<Self> {
        let (min, max) = level.bounds()?;
        let size = (max - min).max(Vec2::splat(1.0));
        let (w, h) = (width as f32, height as f32);
        let scale = (w / size.x).min(h / size.y) * 0.9;
        Some(Self {
            min,
            scale,
            offset: (vec2(w, h) - size * scale) * 0.5,
            height: h,
        })
    }

    fn to_screen(&self, p: Vec2) -> (i32, i32) {
        let s = (p - self.min) * self.scale + self.offset;
        (s.x as i32, (self.height - s.y) as i32)
    }
}

fn draw_map(fb: &mut FrameBuffer, level: &Level, xf: &MapTransform, spawn: Option<SectorId>) {
    for (id, sector) in level.sectors.iter().enumerate() {
        let lit = spawn == Some(id as SectorId);
        for wall in &level.walls[sector.wall_range()] {
            let colour = match (lit, wall.is_portal()) {
                (true, _) => HIGHLIGHT,
                (false, true) => PORTAL,
                (false, false) => SOLID,
            };
            let (x0, y0) = xf.to_screen(wall.p0);
            let (x1, y1) = xf.to_screen(wall.p1);
            fb.line(x0, y0, x1, y1, colour);
        }
    }
}

fn draw_camera(fb: &mut FrameBuffer, cam: &Camera, xf: &MapTransform) {
    let (cx, cy) = xf.to_screen(cam.pos);
    for d in -2..=2 {
        fb.line(cx - 2, cy + d, cx + 2, cy + d, CAMERA);
    }
    // heading tick, one map unit long
    let (hx, hy) = xf.to_screen(cam.pos + cam.forward());
    fb.line(cx, cy, hx, hy, CAMERA);
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let level_filter = match opts.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level_filter,
        ConfigBuilder::default().build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let level = load_level(&opts.level)
        .with_context(|| format!("loading level {}", opts.level.display()))?;
    let Some(xf) = MapTransform::fit(&level, opts.width, opts.height) else {
        bail!("level `{}` has no walls to draw", level.name);
    };

    let camera = Camera::new(opts.spawn, opts.yaw, 0.0);
    let spawn = level.locate_sector(camera.pos);
    match spawn {
        Some(id) => info!("spawn {} is in sector {id}", camera.pos),
        None => warn!("spawn {} is outside every sector", camera.pos),
    }

    // ─────────── rasterise once ────────────
    let mut fb = FrameBuffer::new(opts.width, opts.height);
    draw_map(&mut fb, &level, &xf, spawn);
    draw_camera(&mut fb, &camera, &xf);

    // ─────────── show window ────────────
    let mut window = Window::new(
        &format!("portal_rs map - {}", level.name),
        opts.width,
        opts.height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(fb.pixels(), opts.width, opts.height)?;
    }
    Ok(())
}
