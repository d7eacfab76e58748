//! Locating the press above a smithing station.
//!
//! The station only needs one capability from the mechanism: how far it is
//! extended right now. Lookups return that capability by position so any
//! mechanism type can drive a station.

use crate::pos::BlockPos;

/// A mechanism with a continuous extension in `[0, 1]`.
pub trait ExtensionProgress {
    /// Extension at the given sub-tick interpolation factor (0 = current tick).
    fn extension_progress(&self, partial_ticks: f32) -> f32;
}

/// World query for extension-capable mechanisms.
pub trait ActuatorLookup {
    fn actuator_at(&self, pos: BlockPos) -> Option<&dyn ExtensionProgress>;
}

/// Offsets probed above a station, nearest first. The press anchor sits one
/// or two blocks up depending on how the head is drawn at the time.
pub const PROBE_OFFSETS: [i32; 2] = [1, 2];

/// One tick's reading of the actuator. Borrows the lookup, so it cannot be
/// held past the tick it was taken in.
#[derive(Clone, Copy)]
pub struct ActuatorSnapshot<'w> {
    pub pos: BlockPos,
    pub progress: f32,
    actuator: &'w dyn ExtensionProgress,
}

impl<'w> ActuatorSnapshot<'w> {
    pub fn actuator(&self) -> &'w dyn ExtensionProgress {
        self.actuator
    }
}

impl std::fmt::Debug for ActuatorSnapshot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActuatorSnapshot")
            .field("pos", &self.pos)
            .field("progress", &self.progress)
            .finish()
    }
}

/// Find the actuator above `station` and sample its authoritative progress.
pub fn observe<L>(lookup: &L, station: BlockPos) -> Option<ActuatorSnapshot<'_>>
where
    L: ActuatorLookup + ?Sized,
{
    PROBE_OFFSETS.iter().find_map(|&dy| {
        let pos = station.above(dy);
        lookup.actuator_at(pos).map(|actuator| ActuatorSnapshot {
            pos,
            progress: actuator.extension_progress(0.0).clamp(0.0, 1.0),
            actuator,
        })
    })
}
