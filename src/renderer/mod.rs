//! Rendering abstraction layer.
//!
//! *The portal traversal never touches a window directly.*
//! It writes through the [`Surface`] trait, so the same code paints into an
//! in-memory [`FrameBuffer`], a window back-buffer, or a test probe.
//!
//! * [`Renderer`] is the per-frame driver (`begin_frame` → `draw_level` →
//!   `end_frame`); [`Software`] is the CPU column renderer behind it.
//! * [`RenderConfig`] carries screen size, lens and shading colours.

use thiserror::Error;

use crate::world::{Camera, Level, SectorId, Texture};

mod config;
pub mod software;

pub use config::{RenderConfig, Shading, View};
pub use software::{FrameStats, Software};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Anything the renderer can paint into.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Write one pixel; coordinates outside the surface are ignored.
    fn plot(&mut self, x: i32, y: i32, colour: Rgba);

    /// Vertical line `y0 ..= y1` in column `x`; empty when `y0 > y1`.
    fn vline(&mut self, x: i32, y0: i32, y1: i32, colour: Rgba) {
        for y in y0..=y1 {
            self.plot(x, y, colour);
        }
    }

    /// Integer Bresenham line, clipped per pixel.
    fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Owned row-major frame-buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameBuffer {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    /// (Re)allocate if the resolution changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height, 0);
        }
    }

    pub fn fill(&mut self, colour: Rgba) {
        self.pixels.fill(colour);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

impl Surface for FrameBuffer {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn plot(&mut self, x: i32, y: i32, colour: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.pixels[y as usize * self.width + x as usize] = colour;
        }
    }

    fn vline(&mut self, x: i32, y0: i32, y1: i32, colour: Rgba) {
        if !(0..self.width as i32).contains(&x) {
            return;
        }
        let y0 = y0.max(0);
        let y1 = y1.min(self.height as i32 - 1);
        let mut idx = y0 as usize * self.width + x as usize;
        for _ in y0..=y1 {
            self.pixels[idx] = colour;
            idx += self.width;
        }
    }
}

/// Things that abort a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// More portal tasks than the queue holds: a malformed portal graph
    /// or a clipping defect.
    #[error("portal task queue overflow (capacity {capacity})")]
    QueueOverflow { capacity: usize },

    #[error("root sector {sector} out of range ({sectors} sectors)")]
    BadSector { sector: SectorId, sectors: usize },

    #[error("surface {got_w}x{got_h} smaller than configured {want_w}x{want_h}")]
    SurfaceTooSmall {
        got_w: usize,
        got_h: usize,
        want_w: usize,
        want_h: usize,
    },
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Paint everything visible from `camera`, starting in sector `root`.
    fn draw_level(
        &mut self,
        level: &Level,
        texture: &Texture,
        camera: &Camera,
        root: SectorId,
    ) -> Result<FrameStats, RenderError>;

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}
