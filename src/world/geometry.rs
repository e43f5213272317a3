use glam::Vec2;

pub type SectorId = u16;
pub type WallId = u16;

/// Upper bound on sectors per level; also bounds the portal task queue.
pub const MAX_SECTORS: usize = 256;
/// Upper bound on walls per level.
pub const MAX_WALLS: usize = 1024;

/// Runtime snapshot of one map (immutable after load).
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub sectors: Vec<Sector>,
    /// Every wall of every sector, in file order.
    pub walls: Vec<Wall>,
}

/*--------------------------- sectors --------------------------------*/

/// Convex polygonal region owning a contiguous run of `walls`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    /// Identifier as written in the level file (informational only).
    pub id: i32,
    pub first_wall: WallId,
    pub num_walls: u16,
    pub floor_h: f32,
    pub ceil_h: f32,
}

impl Sector {
    /// Index range of this sector's walls inside [`Level::walls`].
    #[inline]
    pub fn wall_range(&self) -> std::ops::Range<usize> {
        let start = self.first_wall as usize;
        start..start + self.num_walls as usize
    }
}

/*---------------------------- walls ---------------------------------*/

/// Oriented edge; walls of a sector run clockwise seen from inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub p0: Vec2,
    pub p1: Vec2,
    /// Neighbouring sector visible through this wall, `None` if solid.
    pub portal: Option<SectorId>,
}

impl Wall {
    #[inline]
    pub fn is_portal(&self) -> bool {
        self.portal.is_some()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.p0.distance(self.p1)
    }

    /// True if `p` lies on the sector-interior side of this wall.
    #[inline]
    pub fn faces(&self, p: Vec2) -> bool {
        is_interior(self.p0, self.p1, p)
    }
}

/// Half-plane test shared by back-face culling and point location.
///
/// ```text
///           p1
///           |
///   outside |  interior
///           |
///           p0
/// ```
///
/// With clockwise winding the interior of a sector lies to the right of
/// every directed edge `p0 → p1`. Points exactly on the line are outside.
#[inline]
pub fn is_interior(p0: Vec2, p1: Vec2, p: Vec2) -> bool {
    (p - p0).perp_dot(p1 - p0) > 0.0
}

impl Level {
    #[inline]
    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id as usize]
    }

    /// The walls bounding sector `id`, in winding order.
    #[inline]
    pub fn walls_of(&self, id: SectorId) -> &[Wall] {
        &self.walls[self.sector(id).wall_range()]
    }

    /// Axis-aligned bounds of every wall endpoint as `(min, max)`.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut pts = self.walls.iter().flat_map(|w| [w.p0, w.p1]);
        let first = pts.next()?;
        Some(pts.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}
