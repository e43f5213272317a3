use glam::Vec2;
use log::trace;

use super::{Level, SectorId};

// ──────────────────────────────────────────────────────────────────────────
//                       Level – point location
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Sector containing `p`, or `None` if no sector does.
    ///
    /// A point is inside a sector when it sits on the interior side of
    /// every wall of that sector. Linear in the total wall count.
    pub fn locate_sector(&self, p: Vec2) -> Option<SectorId> {
        (0..self.sectors.len() as SectorId).find(|&id| {
            let walls = self.walls_of(id);
            !walls.is_empty() && walls.iter().all(|w| w.faces(p))
        })
    }
}

/// Last sector the camera was known to be in.
///
/// Point location fails transiently, e.g. when the camera sits exactly on
/// a shared edge; the tracker then keeps the previous answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorTracker {
    last: SectorId,
}

impl SectorTracker {
    pub fn new(start: SectorId) -> Self {
        Self { last: start }
    }

    /// Start from whatever sector contains `p`, falling back to sector 0.
    pub fn locate(level: &Level, p: Vec2) -> Self {
        Self::new(level.locate_sector(p).unwrap_or(0))
    }

    #[inline]
    pub fn current(&self) -> SectorId {
        self.last
    }

    /// Re-locate `p` once per frame and return the sector to render from.
    pub fn update(&mut self, level: &Level, p: Vec2) -> SectorId {
        match level.locate_sector(p) {
            Some(id) => self.last = id,
            None => trace!("no sector contains {p}, keeping sector {}", self.last),
        }
        self.last
    }
}
