//! Player use handling for smithing stations.
//!
//! A use with an item in hand places one unit into the first empty slot
//! (template, base, addition). A use with an empty hand takes back the most
//! recently filled slot. Either way the use is consumed: the station never
//! falls through to the block's default behaviour.

use crate::slots::{SlotStore, SLOT_COUNT};
use autosmith_core::{GameMode, ItemStack};

/// Result of a player use on a station. Every variant counts as handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// One held item moved into `slot`.
    Placed { slot: usize },
    /// The contents of `slot` moved into the player's hand.
    Removed { slot: usize },
    /// Nothing to place into or take from.
    NoOp,
}

impl UseOutcome {
    /// Whether the slot store was mutated.
    pub fn changed(self) -> bool {
        !matches!(self, UseOutcome::NoOp)
    }
}

/// Apply a player use to `slots`.
///
/// `hand` is the player's held stack; it is shrunk on placement (except in
/// creative) and filled on removal.
pub fn handle_use(slots: &mut SlotStore, hand: &mut Option<ItemStack>, mode: GameMode) -> UseOutcome {
    match hand.as_mut().filter(|held| !held.is_empty()) {
        Some(held) => {
            let Some(slot) = (0..SLOT_COUNT).find(|&i| slots.is_empty(i)) else {
                return UseOutcome::NoOp;
            };
            if let Err(err) = slots.set(slot, held.kind.clone(), 1) {
                tracing::warn!(%err, "rejected slot insert");
                return UseOutcome::NoOp;
            }
            if !mode.has_unlimited_items() {
                held.shrink(1);
                if held.is_empty() {
                    *hand = None;
                }
            }
            UseOutcome::Placed { slot }
        }
        None => {
            let Some(slot) = (0..SLOT_COUNT).rev().find(|&i| !slots.is_empty(i)) else {
                return UseOutcome::NoOp;
            };
            *hand = slots.take(slot);
            UseOutcome::Removed { slot }
        }
    }
}
