//! First-person portal renderer.
//!
//! ```bash
//! cargo run --release -- levels/demo.txt --texture brick.png
//! ```
//!
//! W/S move, A/D strafe, ←/→ turn, Esc quits.

use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glam::{Vec2, vec2};
use log::{LevelFilter, info};
use minifb::{Key, Scale, Window, WindowOptions};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use portal_rs::{
    level::load_level,
    renderer::{RenderConfig, Renderer, Software},
    sim::{FrameClock, InputCmd, Player},
    world::Texture,
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Level file (`[sectors]` / `[walls]` text format)
    #[arg(value_name = "LEVEL", default_value = "levels/demo.txt")]
    level: PathBuf,

    /// Wall texture (PNG, JPEG or BMP); checkerboard when omitted
    #[arg(long, short, value_name = "FILE")]
    texture: Option<PathBuf>,

    #[arg(long, default_value_t = 400)]
    width: usize,

    #[arg(long, default_value_t = 300)]
    height: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Focal length in pixels; derived from --fov when omitted
    #[arg(long)]
    focal: Option<f32>,

    /// Spawn position as `x,y`
    #[arg(long, value_name = "X,Y", value_parser = parse_point, default_value = "2,3")]
    spawn: Vec2,

    /// Spawn heading in degrees (0 = +X, counter-clockwise)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    yaw: f32,

    /// Window pixel scale
    #[arg(long, value_enum, default_value_t = WinScale::X2)]
    scale: WinScale,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WinScale {
    X1,
    X2,
    X4,
}

impl From<WinScale> for Scale {
    fn from(s: WinScale) -> Self {
        match s {
            WinScale::X1 => Scale::X1,
            WinScale::X2 => Scale::X2,
            WinScale::X4 => Scale::X4,
        }
    }
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let num = |t: &str| t.trim().parse::<f32>().map_err(|e| format!("`{t}`: {e}"));
    Ok(vec2(num(x)?, num(y)?))
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    TermLogger::init(
        log_level(opts.verbose),
        ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    // ─────────── load level & texture ───────
    let level = load_level(&opts.level)
        .with_context(|| format!("loading level {}", opts.level.display()))?;
    let texture = match &opts.texture {
        Some(path) => Texture::load(path)
            .with_context(|| format!("loading texture {}", path.display()))?,
        None => Texture::default(),
    };

    let mut config = RenderConfig::with_fov(opts.width, opts.height, opts.fov);
    if let Some(focal) = opts.focal {
        config.focal_length = focal;
    }
    let (w, h) = (config.width, config.height);
    let mut renderer = Software::new(config);

    let mut player = Player::spawn(&level, opts.spawn, opts.yaw);
    info!(
        "level `{}`: {} sectors, spawn {} in sector {}",
        level.name,
        level.sectors.len(),
        opts.spawn,
        player.sector()
    );

    let mut win = Window::new(
        &format!("portal_rs - {}", level.name),
        w,
        h,
        WindowOptions {
            scale: opts.scale.into(),
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    let mut clock = FrameClock::default();
    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = clock.tick();

        let cmd = InputCmd::from_keys(
            win.is_key_down(Key::W) || win.is_key_down(Key::Up),
            win.is_key_down(Key::S) || win.is_key_down(Key::Down),
            win.is_key_down(Key::A),
            win.is_key_down(Key::D),
            win.is_key_down(Key::Left),
            win.is_key_down(Key::Right),
        );
        let root = player.update(&level, cmd, dt);

        let t0 = Instant::now(); // ┌─ render timer start
        renderer.begin_frame(w, h);
        let stats = renderer
            .draw_level(&level, &texture, &player.camera, root)
            .with_context(|| format!("rendering from sector {root}"))?;
        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| shown = win.update_with_buffer(fb, w, h));
        shown?;

        // ─────────── report every ~3 s ───────
        if let Some(r) = clock.record(t0.elapsed()) {
            info!(
                "avg render: {:.2} ms  ({:.1} FPS) over {} frames, last: {} sectors, {} columns",
                r.avg_ms, r.fps, r.frames, stats.tasks, stats.columns
            );
        }
    }
    Ok(())
}
