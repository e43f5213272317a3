//! Plain-text level loader.
//!
//! ```text
//! [sectors]
//! # id start_wall num_walls floor ceiling
//! 0 0 4 0 3
//! [walls]
//! # x0 y0 x1 y1 portal (-1 = solid)
//! 0 0 0 4 -1
//! ```

mod parse;

pub use parse::{LevelError, load_level, parse_level};

#[cfg(test)]
pub(crate) mod fixtures;
