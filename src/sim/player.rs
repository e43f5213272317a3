use glam::{Vec2, vec2};

use super::InputCmd;
use crate::world::{Camera, Level, SectorId, SectorTracker};

pub const TURN_RATE: f32 = 100.0; // degrees per second
pub const MOVE_SPEED: f32 = 5.0; // map units per second
/// Eye above the floor of the current sector.
pub const EYE_HEIGHT: f32 = 1.5;

/// The viewer: a camera that walks through a level without collision.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub camera: Camera,
    pub tracker: SectorTracker,
    pub eye_height: f32,
}

impl Player {
    /// Place the player at `pos` facing `yaw` degrees, eyes on the floor of
    /// whatever sector contains `pos`.
    pub fn spawn(level: &Level, pos: Vec2, yaw: f32) -> Self {
        let mut player = Self {
            camera: Camera::new(pos, yaw, EYE_HEIGHT),
            tracker: SectorTracker::locate(level, pos),
            eye_height: EYE_HEIGHT,
        };
        player.settle(level);
        player
    }

    /// Sector to render from.
    #[inline]
    pub fn sector(&self) -> SectorId {
        self.tracker.current()
    }

    /// Apply one frame of input over `dt` seconds. Returns the new sector.
    pub fn update(&mut self, level: &Level, cmd: InputCmd, dt: f32) -> SectorId {
        if cmd.turn != 0.0 {
            self.camera.turn(cmd.turn * TURN_RATE * dt);
        }

        // diagonal moves are no faster than straight ones
        let wish = vec2(cmd.forward, cmd.strafe).normalize_or_zero() * MOVE_SPEED * dt;
        self.camera.step(wish.x, wish.y);

        self.settle(level)
    }

    fn settle(&mut self, level: &Level) -> SectorId {
        let id = self.tracker.update(level, self.camera.pos);
        if let Some(sector) = level.sectors.get(id as usize) {
            self.camera.eye_z = sector.floor_h + self.eye_height;
        }
        id
    }
}
