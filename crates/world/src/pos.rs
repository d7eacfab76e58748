use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer block position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position `n` blocks straight up.
    pub const fn above(self, n: i32) -> Self {
        Self::new(self.x, self.y + n, self.z)
    }

    /// Position `n` blocks straight down.
    pub const fn below(self, n: i32) -> Self {
        Self::new(self.x, self.y - n, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
