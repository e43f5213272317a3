//! Small hand-made maps shared by unit tests.

use crate::world::Level;

use super::parse_level;

/// Two 4×4 rooms side by side; the east room has a lower ceiling.
pub const TWO_ROOMS: &str = "\
# two rooms joined by the wall x = 4
[sectors]
1 0 4 0 3
2 4 4 0 2

[walls]
0 0 0 4 -1
0 4 4 4 -1
4 4 4 0 1
4 0 0 0 -1
4 0 4 4 0
4 4 8 4 -1
8 4 8 0 -1
8 0 4 0 -1
";

/// One closed 4×4 room, floor 0, ceiling 3.
pub const SINGLE_ROOM: &str = "\
[sectors]
0 0 4 0 3
[walls]
0 0 0 4 -1
0 4 4 4 -1
4 4 4 0 -1
4 0 0 0 -1
";

pub fn two_rooms() -> Level {
    parse_level("two_rooms", TWO_ROOMS).unwrap()
}

pub fn single_room() -> Level {
    parse_level("single_room", SINGLE_ROOM).unwrap()
}
