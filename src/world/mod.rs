mod camera;
mod geometry;
mod locate;
mod texture;

pub use geometry::{
    Level, MAX_SECTORS, MAX_WALLS, Sector, SectorId, Wall, WallId, is_interior,
};

pub use camera::Camera;

pub use locate::SectorTracker;

pub use texture::{Texture, TextureError};
