//! Turning continuous press progress into discrete craft attempts.

use serde::{Deserialize, Serialize};

/// Press extension above which a craft is attempted.
pub const CRAFT_THRESHOLD: f32 = 0.5;

/// How repeated samples above the threshold are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Attempt on every tick the head is down and the station is full.
    Level,
    /// Attempt at most once per press stroke.
    #[default]
    RisingEdge,
}

/// Per-station trigger. The latch lives only in memory.
#[derive(Debug, Clone, Default)]
pub struct CraftTrigger {
    mode: TriggerMode,
    latched: bool,
}

impl CraftTrigger {
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            latched: false,
        }
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// True while a stroke has already produced an attempt.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Feed one tick's sample. `progress` is `None` when no press was found.
    /// Returns `true` if a craft should be attempted this tick.
    pub fn evaluate(&mut self, progress: Option<f32>, station_full: bool) -> bool {
        let head_down = progress.is_some_and(|p| p > CRAFT_THRESHOLD);
        if !head_down {
            self.latched = false;
            return false;
        }
        if !station_full {
            return false;
        }

        match self.mode {
            TriggerMode::Level => true,
            TriggerMode::RisingEdge => {
                if self.latched {
                    return false;
                }
                self.latched = true;
                true
            }
        }
    }
}
