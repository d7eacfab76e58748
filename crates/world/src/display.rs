//! Floating item layout above a smithing station.
//!
//! Purely derived from slot contents and world time; nothing here feeds back
//! into simulation.

use crate::slots::{SlotStore, SLOT_COUNT};
use autosmith_core::{ItemKey, SimTick};
use glam::{Mat4, Quat, Vec3};

/// Block-local anchor per slot: template at the back, base and addition in front.
pub const DISPLAY_OFFSETS: [Vec3; SLOT_COUNT] = [
    Vec3::new(0.5, 1.1, 0.25),
    Vec3::new(0.75, 1.1, 0.75),
    Vec3::new(0.25, 1.1, 0.75),
];

/// Uniform scale applied to displayed items.
pub const DISPLAY_SCALE: f32 = 0.4;

/// Spin rate in degrees per tick.
pub const SPIN_DEGREES_PER_TICK: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTransform {
    pub slot: usize,
    pub item: ItemKey,
    pub translation: Vec3,
    pub yaw_degrees: f32,
    pub scale: f32,
}

impl DisplayTransform {
    /// Block-local model matrix: translate, then spin about Y, then scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            self.translation,
        )
    }
}

/// Spin angle in `[0, 360)` for the given time.
pub fn spin_degrees(game_time: SimTick, partial_ticks: f32) -> f32 {
    // 180 ticks per revolution; wrap before converting to keep f32 precision.
    let ticks_per_turn = (360.0 / SPIN_DEGREES_PER_TICK) as u64;
    let ticks = (game_time.0 % ticks_per_turn) as f32 + partial_ticks;
    (ticks * SPIN_DEGREES_PER_TICK).rem_euclid(360.0)
}

/// One transform per occupied slot, in slot order.
pub fn display_transforms(slots: &SlotStore, game_time: SimTick, partial_ticks: f32) -> Vec<DisplayTransform> {
    let yaw_degrees = spin_degrees(game_time, partial_ticks);
    slots
        .contents()
        .iter()
        .enumerate()
        .filter_map(|(slot, kind)| {
            kind.as_ref().map(|item| DisplayTransform {
                slot,
                item: item.clone(),
                translation: DISPLAY_OFFSETS[slot],
                yaw_degrees,
                scale: DISPLAY_SCALE,
            })
        })
        .collect()
}
