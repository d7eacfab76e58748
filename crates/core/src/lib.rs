#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod registry;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use item::{GameMode, ItemStack};
pub use registry::{ItemKey, ItemKeyError, AIR_PATH, DEFAULT_NAMESPACE};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_monotonically() {
        let tick = SimTick::ZERO.advance(3).advance(2);
        assert_eq!(tick, SimTick(5));
        assert!(tick > SimTick::ZERO);
    }
}
