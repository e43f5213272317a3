//! Portal-based 2.5D software renderer.
//!
//! * [`world`]    – level geometry, camera, point location, textures.
//! * [`level`]    – plain-text level loader.
//! * [`renderer`] – pixel surfaces and the software portal renderer.
//! * [`sim`]      – per-frame input, player movement and frame timing.

pub mod level;
pub mod renderer;
pub mod sim;
pub mod world;
