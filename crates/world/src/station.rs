//! Smithing station block entity.
//!
//! Each server tick the station samples the press above it, lets its trigger
//! decide whether this is a craft tick, and if so swaps its three inputs for
//! the recipe result in one assignment. The station never saves or syncs
//! itself: every mutating call reports whether state changed and the owner
//! does the notification.

use crate::actuator::{observe, ActuatorLookup};
use crate::events::LevelEvent;
use crate::interaction::{handle_use, UseOutcome};
use crate::persist::StationRecord;
use crate::pos::BlockPos;
use crate::recipe::{RecipeSource, SmithingInput};
use crate::slots::SlotStore;
use crate::trigger::{CraftTrigger, TriggerMode};
use anyhow::Result;
use autosmith_core::{GameMode, ItemKey, ItemStack};
use tracing::debug;

/// Result of a craft attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftOutcome {
    /// Inputs consumed; `result` now sits in the template slot.
    Committed { result: ItemKey },
    /// Not all slots filled, or no recipe for the triple. Nothing changed.
    NoMatch,
}

impl CraftOutcome {
    /// Whether the inputs were swapped for a result.
    pub fn is_committed(&self) -> bool {
        matches!(self, CraftOutcome::Committed { .. })
    }
}

/// What happened during one station tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Where the press was found, if anywhere.
    pub actuator: Option<BlockPos>,
    /// Sampled press extension.
    pub progress: Option<f32>,
    /// Outcome of the craft attempt, if the trigger fired.
    pub craft: Option<CraftOutcome>,
}

impl TickReport {
    /// Whether the trigger fired this tick.
    pub fn triggered(&self) -> bool {
        self.craft.is_some()
    }

    /// Whether the slots changed this tick.
    pub fn changed(&self) -> bool {
        self.craft.as_ref().is_some_and(CraftOutcome::is_committed)
    }
}

/// Block entity holding three input slots and a craft trigger.
#[derive(Debug, Clone)]
pub struct SmithingStation {
    pos: BlockPos,
    slots: SlotStore,
    trigger: CraftTrigger,
    events: Vec<LevelEvent>,
}

impl SmithingStation {
    /// Empty station at `pos`.
    pub fn new(pos: BlockPos, mode: TriggerMode) -> Self {
        Self {
            pos,
            slots: SlotStore::new(),
            trigger: CraftTrigger::new(mode),
            events: Vec::new(),
        }
    }

    /// Block position of the station.
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Current slot contents.
    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    /// Craft trigger state (mode and latch).
    pub fn trigger(&self) -> &CraftTrigger {
        &self.trigger
    }

    /// Player use: place one held item or take one back.
    pub fn handle_use(&mut self, hand: &mut Option<ItemStack>, mode: GameMode) -> UseOutcome {
        let outcome = handle_use(&mut self.slots, hand, mode);
        if outcome.changed() {
            debug!(pos = %self.pos, ?outcome, "smithing station used");
        }
        outcome
    }

    /// One server tick: observe the press, evaluate the trigger, maybe craft.
    pub fn tick<L, R>(&mut self, actuators: &L, recipes: &R) -> TickReport
    where
        L: ActuatorLookup + ?Sized,
        R: RecipeSource + ?Sized,
    {
        let snapshot = observe(actuators, self.pos);
        let mut report = TickReport {
            actuator: snapshot.map(|s| s.pos),
            progress: snapshot.map(|s| s.progress),
            craft: None,
        };

        if self
            .trigger
            .evaluate(report.progress, self.slots.is_full())
        {
            debug!(pos = %self.pos, progress = ?report.progress, "press trigger fired");
            report.craft = Some(self.attempt_craft(recipes));
        }
        report
    }

    /// Match the held triple and, on success, replace all inputs with the
    /// result in the template slot and queue a
    /// [`LevelEvent::SmithingComplete`].
    pub fn attempt_craft<R>(&mut self, recipes: &R) -> CraftOutcome
    where
        R: RecipeSource + ?Sized,
    {
        let Some(input) = SmithingInput::from_slots(&self.slots) else {
            return CraftOutcome::NoMatch;
        };
        let Some(result) = recipes.match_smithing(&input) else {
            return CraftOutcome::NoMatch;
        };

        self.slots.replace_all([Some(result.kind.clone()), None, None]);
        debug!(
            pos = %self.pos,
            template = %input.template,
            base = %input.base,
            addition = %input.addition,
            result = %result.kind,
            "smithing craft committed"
        );
        self.events.push(LevelEvent::SmithingComplete {
            pos: self.pos,
            result: result.kind.clone(),
        });
        CraftOutcome::Committed { result: result.kind }
    }

    /// Level events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Durable/sync record of the slots.
    pub fn to_record(&self) -> StationRecord {
        StationRecord::encode(&self.slots)
    }

    /// Restore slots from a record. Sub-records the record lacks keep their
    /// current contents.
    pub fn load_record(&mut self, record: &StationRecord) -> Result<()> {
        record.decode_into(&mut self.slots)
    }
}
