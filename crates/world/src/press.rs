//! Mechanical press: a reciprocating head driven by rotational speed.
//!
//! A pressing cycle is [`PRESS_CYCLE`] running-ticks long. The head
//! accelerates down during the first two thirds of the cycle and retracts
//! linearly during the last third.

use crate::actuator::ExtensionProgress;
use serde::{Deserialize, Serialize};

/// Running-ticks per pressing cycle.
pub const PRESS_CYCLE: i32 = 240;

/// Rotational speed (rpm) at which the press reaches its fastest stroke.
pub const MAX_STROKE_RPM: f32 = 512.0;

/// Rotation-driven press head; the actuator stations look for above them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicalPress {
    /// Rotational speed feeding the press. Sign is ignored.
    pub rpm: f32,
    /// Start a new cycle as soon as one finishes.
    pub repeat: bool,
    running: bool,
    running_ticks: i32,
    prev_running_ticks: i32,
}

impl MechanicalPress {
    /// Idle, single-stroke press.
    pub fn new(rpm: f32) -> Self {
        Self {
            rpm,
            repeat: false,
            running: false,
            running_ticks: 0,
            prev_running_ticks: 0,
        }
    }

    /// A press that cycles continuously while it has speed.
    pub fn repeating(rpm: f32) -> Self {
        Self {
            repeat: true,
            ..Self::new(rpm)
        }
    }

    /// Mid-stroke.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Running, or a repeating press with speed that will start on its next tick.
    pub fn is_active(&self) -> bool {
        self.running || (self.repeat && self.rpm != 0.0)
    }

    /// Progress through the current cycle, `0..PRESS_CYCLE`.
    pub fn running_ticks(&self) -> i32 {
        self.running_ticks
    }

    /// Running-ticks gained per game tick: 1 at standstill up to 60 at full speed.
    pub fn running_tick_speed(&self) -> i32 {
        let t = (self.rpm.abs() / MAX_STROKE_RPM).clamp(0.0, 1.0);
        (1.0 + t * 59.0) as i32
    }

    /// Begin a pressing cycle. Returns `false` if the press has no speed or
    /// is already mid-cycle.
    pub fn start(&mut self) -> bool {
        if self.rpm == 0.0 || self.running {
            return false;
        }
        self.running = true;
        self.running_ticks = 0;
        self.prev_running_ticks = 0;
        true
    }

    /// Advance the head by one game tick.
    pub fn tick(&mut self) {
        if !self.running {
            if self.repeat {
                self.start();
            }
            return;
        }

        if self.rpm == 0.0 {
            self.stop();
            return;
        }

        self.prev_running_ticks = self.running_ticks;
        self.running_ticks += self.running_tick_speed();

        if self.running_ticks >= PRESS_CYCLE {
            self.stop();
            if self.repeat {
                self.start();
            }
        }
    }

    /// Abort the cycle and retract the head.
    pub fn stop(&mut self) {
        self.running = false;
        self.running_ticks = 0;
        self.prev_running_ticks = 0;
    }
}

impl ExtensionProgress for MechanicalPress {
    fn extension_progress(&self, partial_ticks: f32) -> f32 {
        if !self.running {
            return 0.0;
        }
        let prev = self.prev_running_ticks as f32;
        let ticks = prev + (self.running_ticks as f32 - prev) * partial_ticks;
        let cycle = PRESS_CYCLE as f32;

        if self.running_ticks < PRESS_CYCLE * 2 / 3 {
            (ticks / cycle * 2.0).powi(3).clamp(0.0, 1.0)
        } else {
            ((cycle - ticks) / cycle * 3.0).clamp(0.0, 1.0)
        }
    }
}
