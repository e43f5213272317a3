//! Per-frame simulation: key state in, camera pose out.

mod input;
mod player;
mod tic;

pub use input::InputCmd;
pub use player::{EYE_HEIGHT, MOVE_SPEED, Player, TURN_RATE};
pub use tic::{FrameClock, FrameReport, MAX_FRAME_DT, REPORT_EVERY};
