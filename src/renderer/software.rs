//! ---------------------------------------------------------------------------
//! Portal (CPU) column renderer
//!
//! * Paints any [`Surface`]; as a [`Renderer`] it owns a scratch
//!   [`FrameBuffer`] in **0x00RRGGBB** format and loans it out in `end_frame`.
//! * Visibility comes from walking sector portals front-to-back, so no
//!   Z-buffer is needed: per-column clip bands stop far geometry from
//!   overdrawing near geometry.
//! ---------------------------------------------------------------------------

mod column;
mod projection;
mod queue;
mod traversal;

pub use column::ClipBands;
pub use projection::DEPTH_EPSILON;
pub use queue::{QUEUE_CAPACITY, Task};
pub use traversal::{FrameStats, Traversal};

use crate::{
    renderer::{FrameBuffer, RenderConfig, RenderError, Renderer, Rgba, Surface},
    world::{Camera, Level, SectorId, Texture},
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Portal renderer.
#[derive(Default)]
pub struct Software {
    config: RenderConfig,
    scratch: FrameBuffer,
    /* clip bands survive across frames, reset on every render */
    bands: ClipBands,
}

impl Software {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            scratch: FrameBuffer::new(config.width, config.height),
            bands: ClipBands::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Paint everything visible from `camera` into `surface`, starting with
    /// the whole screen in sector `root`.
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        level: &Level,
        texture: &Texture,
        camera: &Camera,
        root: SectorId,
    ) -> Result<FrameStats, RenderError> {
        render_into(
            &self.config,
            &mut self.bands,
            surface,
            level,
            texture,
            camera,
            root,
        )
    }
}

fn render_into<S: Surface + ?Sized>(
    config: &RenderConfig,
    bands: &mut ClipBands,
    surface: &mut S,
    level: &Level,
    texture: &Texture,
    camera: &Camera,
    root: SectorId,
) -> Result<FrameStats, RenderError> {
    let seed = Task::full(root, config.width);
    Traversal::new(level, texture, camera, config, bands, seed)?.run(surface)
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // re-derive the lens if the resolution changed, keep colours
        if w != self.config.width || h != self.config.height {
            let shading = self.config.shading;
            self.config = RenderConfig {
                shading,
                ..RenderConfig::with_fov(w, h, self.config.hfov_deg)
            };
        }
        self.scratch.resize(w, h);
        self.scratch.fill(self.config.shading.clear);
    }

    fn draw_level(
        &mut self,
        level: &Level,
        texture: &Texture,
        camera: &Camera,
        root: SectorId,
    ) -> Result<FrameStats, RenderError> {
        render_into(
            &self.config,
            &mut self.bands,
            &mut self.scratch,
            level,
            texture,
            camera,
            root,
        )
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(
            self.scratch.pixels(),
            self.scratch.width(),
            self.scratch.height(),
        );
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::fixtures::two_rooms;
    use glam::vec2;

    fn camera() -> Camera {
        Camera::new(vec2(1.0, 2.0), 0.0, 1.5)
    }

    #[test]
    fn frame_cycle_hands_out_painted_buffer() {
        let level = two_rooms();
        let tex = Texture::default();
        let mut sw = Software::new(RenderConfig::default());

        sw.begin_frame(400, 300);
        let stats = sw.draw_level(&level, &tex, &camera(), 0).unwrap();
        assert_eq!(stats.tasks, 2);

        let mut seen = None;
        sw.end_frame(|px, w, h| {
            seen = Some((px.len(), w, h, px[150 * w + 200]));
        });
        let (len, w, h, centre) = seen.expect("submit called");
        assert_eq!((len, w, h), (400 * 300, 400, 300));
        // far wall of the east room, textured with the checker
        assert!(tex.pixels().contains(&centre));
    }

    #[test]
    fn resolution_change_rederives_lens() {
        let mut cfg = RenderConfig::default();
        cfg.shading.clear = 0x42;
        let mut sw = Software::new(cfg);
        sw.begin_frame(800, 600);
        assert_eq!(sw.config().width, 800);
        assert!((sw.config().focal_length - 400.0).abs() < 1e-2);
        assert_eq!(sw.config().shading.clear, 0x42);
        sw.end_frame(|px, _, _| assert!(px.iter().all(|&p| p == 0x42)));
    }

    #[test]
    fn render_into_external_surface_reuses_bands() {
        let level = two_rooms();
        let tex = Texture::default();
        let mut sw = Software::default();
        let mut fb = FrameBuffer::new(400, 300);
        let a = sw.render(&mut fb, &level, &tex, &camera(), 0).unwrap();
        let b = sw.render(&mut fb, &level, &tex, &camera(), 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            sw.render(&mut fb, &level, &tex, &camera(), 9),
            Err(RenderError::BadSector {
                sector: 9,
                sectors: 2
            })
        );
    }
}
