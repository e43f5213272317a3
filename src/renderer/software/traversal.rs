//! Breadth-first walk of the portal graph.
//!
//! ```text
//!   seed (root, 0, w-1)
//!     └─► for each wall of the sector
//!           project ─► clip to task range ─► paint columns
//!           portal?  ─► enqueue (neighbour, overlap)
//! ```
//!
//! Each task only ever narrows its children's column ranges, and the clip
//! bands only shrink, so a frame terminates as long as the queue holds.

use crate::{
    renderer::{RenderConfig, RenderError, Shading, Surface, View},
    world::{Camera, Level, SectorId, Texture},
};

use super::{
    column::{ClipBands, Column, Rows, draw_portal, draw_solid},
    projection::{Culled, Edge, lerp, project_wall},
    queue::{Task, TaskQueue},
};

/// Counters for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Tasks dequeued and processed.
    pub tasks: usize,
    /// Tasks pushed for neighbouring sectors (the seed is not counted).
    pub enqueued: usize,
    pub walls_drawn: usize,
    pub walls_behind: usize,
    pub walls_backfacing: usize,
    /// Projected outside the task's column range, or to an empty span.
    pub walls_outside: usize,
    /// Wall columns visited, open or not.
    pub columns: usize,
}

/// One frame of portal traversal, driven task by task.
pub struct Traversal<'a> {
    level: &'a Level,
    texture: &'a Texture,
    camera: &'a Camera,
    view: View,
    shading: Shading,
    bands: &'a mut ClipBands,
    queue: TaskQueue,
    stats: FrameStats,
}

impl<'a> Traversal<'a> {
    /// Reset `bands` and queue `seed`, clamped to the screen.
    pub fn new(
        level: &'a Level,
        texture: &'a Texture,
        camera: &'a Camera,
        config: &RenderConfig,
        bands: &'a mut ClipBands,
        seed: Task,
    ) -> Result<Self, RenderError> {
        if seed.sector as usize >= level.sectors.len() {
            return Err(RenderError::BadSector {
                sector: seed.sector,
                sectors: level.sectors.len(),
            });
        }

        bands.reset(config.width, config.height);
        let mut queue = TaskQueue::default();
        queue.push(Task {
            sector: seed.sector,
            x0: seed.x0.max(0),
            x1: seed.x1.min(config.width as i32 - 1),
        })?;

        Ok(Self {
            level,
            texture,
            camera,
            view: View::from(config),
            shading: config.shading,
            bands,
            queue,
            stats: FrameStats::default(),
        })
    }

    #[inline]
    pub fn bands(&self) -> &ClipBands {
        &*self.bands
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Tasks queued but not yet processed.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Drain the queue.
    pub fn run<S: Surface + ?Sized>(mut self, surface: &mut S) -> Result<FrameStats, RenderError> {
        while self.step(surface)?.is_some() {}
        Ok(self.stats)
    }

    /// Process the next task; `None` once the queue is empty.
    pub fn step<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<Option<Task>, RenderError> {
        if surface.width() < self.view.w || surface.height() < self.view.h {
            return Err(RenderError::SurfaceTooSmall {
                got_w: surface.width(),
                got_h: surface.height(),
                want_w: self.view.w,
                want_h: self.view.h,
            });
        }
        let Some(task) = self.queue.pop() else {
            return Ok(None);
        };
        self.stats.tasks += 1;

        let level = self.level;
        for wall in level.walls_of(task.sector) {
            let edge = match project_wall(wall, self.camera, &self.view, self.texture.w()) {
                Ok(edge) => edge,
                Err(Culled::Behind) => {
                    self.stats.walls_behind += 1;
                    continue;
                }
                Err(Culled::BackFacing) => {
                    self.stats.walls_backfacing += 1;
                    continue;
                }
            };

            let (x0, x1) = (edge.x_l.max(task.x0), edge.x_r.min(task.x1));
            if edge.x_l > edge.x_r || x0 > x1 {
                self.stats.walls_outside += 1;
                continue;
            }

            self.draw_wall(surface, &task, &edge, wall.portal, x0, x1);
            self.stats.walls_drawn += 1;
            self.stats.columns += (x1 - x0 + 1) as usize;

            if let Some(neighbour) = wall.portal {
                self.queue.push(Task {
                    sector: neighbour,
                    x0,
                    x1,
                })?;
                self.stats.enqueued += 1;
            }
        }

        Ok(Some(task))
    }

    fn draw_wall<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        task: &Task,
        edge: &Edge,
        portal: Option<SectorId>,
        x0: i32,
        x1: i32,
    ) {
        let sector = self.level.sector(task.sector);
        let eye = self.camera.eye_z;
        let view = &self.view;

        let (top_l, top_r) = edge.rows(sector.ceil_h - eye, view);
        let (bot_l, bot_r) = edge.rows(sector.floor_h - eye, view);
        let ceil = self.shading.ceiling(sector.ceil_h);
        let floor = self.shading.floor(sector.floor_h);

        // neighbour ceiling/floor rows at both ends
        let border = portal.map(|n| {
            let n = self.level.sector(n);
            (
                edge.rows(n.ceil_h - eye, view),
                edge.rows(n.floor_h - eye, view),
            )
        });

        for x in x0..=x1 {
            let t = edge.t_at(x);
            let col = Column {
                x,
                rows: Rows {
                    top: lerp(top_l, top_r, t),
                    bottom: lerp(bot_l, bot_r, t),
                },
                u: edge.u_at(t),
                ceil,
                floor,
            };
            match border {
                None => draw_solid(surface, self.bands, self.texture, &col),
                Some(((nc_l, nc_r), (nf_l, nf_r))) => {
                    let neighbour = Rows {
                        top: lerp(nc_l, nc_r, t),
                        bottom: lerp(nf_l, nf_r, t),
                    };
                    draw_portal(surface, self.bands, &col, neighbour, self.shading.step);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        level::fixtures::{single_room, two_rooms},
        renderer::{FrameBuffer, Rgba},
    };
    use glam::vec2;

    const WALL: Rgba = 0x00_C0C0C0;
    const SKY: Rgba = 0x00_ABCDEF;

    fn setup() -> (RenderConfig, FrameBuffer, ClipBands, Texture) {
        let cfg = RenderConfig::default();
        let mut fb = FrameBuffer::new(cfg.width, cfg.height);
        fb.fill(SKY);
        (cfg, fb, ClipBands::default(), Texture::solid(64, 64, WALL))
    }

    fn eye_camera(yaw: f32) -> Camera {
        Camera::new(vec2(1.0, 2.0), yaw, 1.5)
    }

    #[test]
    fn square_room_head_on_is_a_rectangle() {
        let (cfg, mut fb, mut bands, tex) = setup();
        let level = single_room();
        let cam = eye_camera(0.0);
        let tr = Traversal::new(&level, &tex, &cam, &cfg, &mut bands, Task::full(0, cfg.width))
            .unwrap();
        let stats = tr.run(&mut fb).unwrap();

        assert_eq!(stats.tasks, 1);
        assert_eq!(stats.enqueued, 0);
        // east wall ahead, north wall left, south wall right, west behind
        assert_eq!(stats.walls_drawn, 3);
        assert_eq!(stats.walls_behind, 1);
        // every screen column once, plus the few shared by adjacent corners
        assert!((cfg.width..=cfg.width + 4).contains(&stats.columns));

        let ceil = cfg.shading.ceiling(3.0);
        let floor = cfg.shading.floor(0.0);
        // wall rows 50..=250, give or take interpolation rounding
        assert_eq!(fb.pixel(200, 48), ceil);
        assert_eq!(fb.pixel(200, 51), WALL);
        assert_eq!(fb.pixel(200, 249), WALL);
        assert_eq!(fb.pixel(200, 252), floor);
        // equal depth across the facing wall: flat top edge
        assert_eq!(fb.pixel(70, 51), WALL);
        assert_eq!(fb.pixel(330, 51), WALL);
        assert_eq!(fb.pixel(70, 48), ceil);
        assert_eq!(fb.pixel(330, 48), ceil);

        // portal-free room: every column ends closed, nothing left unpainted
        assert_eq!(bands.open_columns(), 0);
        assert!(fb.pixels().iter().all(|&p| p != SKY));
    }

    #[test]
    fn off_axis_wall_is_a_trapezoid() {
        let (cfg, mut fb, mut bands, tex) = setup();
        let level = single_room();
        let cam = eye_camera(10.0);
        let tr = Traversal::new(&level, &tex, &cam, &cfg, &mut bands, Task::full(0, cfg.width))
            .unwrap();
        tr.run(&mut fb).unwrap();

        // near end (right) reaches higher up the screen than the far end
        let ceil = cfg.shading.ceiling(3.0);
        assert_eq!(fb.pixel(120, 45), ceil);
        assert_eq!(fb.pixel(380, 45), WALL);
        assert_eq!(bands.open_columns(), 0);
    }

    #[test]
    fn lower_neighbour_ceiling_draws_step_and_enqueues_subrange() {
        let (cfg, mut fb, mut bands, tex) = setup();
        let level = two_rooms();
        let cam = eye_camera(0.0);
        let seed = Task::full(0, cfg.width);
        let mut tr = Traversal::new(&level, &tex, &cam, &cfg, &mut bands, seed).unwrap();

        assert_eq!(tr.pending(), 1);
        let first = tr.step(&mut fb).unwrap();
        assert_eq!(first, Some(seed));
        assert_eq!(tr.stats().enqueued, 1);
        assert_eq!(tr.pending(), 1);

        // step band between ceiling 3 (row 50) and neighbour ceiling 2 (row ~116.7)
        assert_eq!(fb.pixel(200, 60), cfg.shading.step);
        assert_eq!(fb.pixel(200, 116), cfg.shading.step);
        assert_eq!(fb.pixel(200, 117), SKY);
        assert_eq!(tr.bands().high(200), 117);
        // same floor height: no lower step, bottom narrowed to own floor
        assert!((249..=250).contains(&tr.bands().low(200)));
        assert_eq!(fb.pixel(200, 240), SKY);
        assert_eq!(fb.pixel(200, 260), cfg.shading.floor(0.0));

        let child = tr.step(&mut fb).unwrap().expect("neighbour task");
        assert_eq!(
            child,
            Task {
                sector: 1,
                x0: 66,
                x1: 333
            }
        );
        assert!(seed.contains(&child));
        // back portal into room 0 is seen from behind
        assert_eq!(tr.stats().walls_backfacing, 1);
        assert_eq!(tr.step(&mut fb).unwrap(), None);

        // far wall of room 1 now fills the window
        assert_eq!(fb.pixel(200, 150), WALL);
        assert_eq!(tr.stats().tasks, 2);
    }

    #[test]
    fn envelope_never_widens_between_tasks() {
        let (cfg, mut fb, mut bands, tex) = setup();
        let level = two_rooms();
        let cam = eye_camera(0.0);
        let mut tr =
            Traversal::new(&level, &tex, &cam, &cfg, &mut bands, Task::full(0, cfg.width))
                .unwrap();

        let snapshot = |b: &ClipBands| -> Vec<(i32, i32)> {
            (0..b.width() as i32).map(|x| (b.high(x), b.low(x))).collect()
        };
        let mut prev = snapshot(tr.bands());
        while tr.step(&mut fb).unwrap().is_some() {
            let now = snapshot(tr.bands());
            for (x, (&(h0, l0), &(h1, l1))) in prev.iter().zip(&now).enumerate() {
                assert!(h1 >= h0 && l1 <= l0, "column {x} widened");
            }
            prev = now;
        }
    }

    #[test]
    fn wall_outside_task_range_is_skipped() {
        let (cfg, mut fb, mut bands, tex) = setup();
        let level = two_rooms();
        let cam = eye_camera(0.0);
        let seed = Task {
            sector: 0,
            x0: 0,
            x1: 50,
        };
        let stats = Traversal::new(&level, &tex, &cam, &cfg, &mut bands, seed)
            .unwrap()
            .run(&mut fb)
            .unwrap();

        // only the north wall reaches columns 0..=50; the portal does not
        assert_eq!(stats.walls_drawn, 1);
        assert_eq!(stats.walls_outside, 2);
        assert_eq!(stats.enqueued, 0);
        assert_eq!(fb.pixel(200, 150), SKY);
        assert!(bands.is_open(51) && bands.is_open(399));
        assert!(!bands.is_open(0));
    }

    #[test]
    fn bad_root_and_small_surface_are_errors() {
        let (cfg, _, mut bands, tex) = setup();
        let level = single_room();
        let cam = eye_camera(0.0);
        let err = Traversal::new(&level, &tex, &cam, &cfg, &mut bands, Task::full(5, 400))
            .err()
            .unwrap();
        assert_eq!(
            err,
            RenderError::BadSector {
                sector: 5,
                sectors: 1
            }
        );

        let mut small = FrameBuffer::new(10, 10);
        let tr = Traversal::new(&level, &tex, &cam, &cfg, &mut bands, Task::full(0, 400)).unwrap();
        assert!(matches!(
            tr.run(&mut small),
            Err(RenderError::SurfaceTooSmall { got_w: 10, .. })
        ));
    }
}
