//! Durable record format for smithing station slots.
//!
//! A station record is one container holding up to three named sub-records,
//! `Slot0`..`Slot2`, each with an item-kind string and a 64-bit amount.
//! Missing sub-records leave the corresponding slot untouched, so records
//! written before a slot existed still load.

use crate::slots::{SlotStore, SLOT_COUNT};
use anyhow::{Context, Result};
use autosmith_core::ItemKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Item-kind string stored for an empty slot.
pub const BLANK_VARIANT: &str = "mdm:air";

/// Name of the sub-record for slot `index`.
pub fn slot_tag_name(index: usize) -> String {
    format!("Slot{index}")
}

/// Persisted contents of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTag {
    /// Item kind key, [`BLANK_VARIANT`] when empty.
    pub variant: String,
    /// Item count; anything above one is clamped on load.
    pub amount: i64,
}

impl SlotTag {
    /// Tag written for an empty slot.
    pub fn blank() -> Self {
        Self {
            variant: BLANK_VARIANT.to_string(),
            amount: 0,
        }
    }

    fn is_blank(&self) -> bool {
        self.variant == BLANK_VARIANT || self.amount <= 0
    }
}

/// Container record for a station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default)]
    pub tags: BTreeMap<String, SlotTag>,
}

impl StationRecord {
    /// Write every slot, blank ones included.
    pub fn encode(slots: &SlotStore) -> Self {
        let tags = (0..SLOT_COUNT)
            .map(|index| {
                let tag = match slots.kind(index) {
                    Some(kind) => SlotTag {
                        variant: kind.to_string(),
                        amount: 1,
                    },
                    None => SlotTag::blank(),
                };
                (slot_tag_name(index), tag)
            })
            .collect();
        Self { tags }
    }

    /// Decode into fresh (empty) slots.
    pub fn decode(&self) -> Result<SlotStore> {
        let mut slots = SlotStore::new();
        self.decode_into(&mut slots)?;
        Ok(slots)
    }

    /// Restore the sub-records this record has. On error `slots` is unchanged.
    pub fn decode_into(&self, slots: &mut SlotStore) -> Result<()> {
        let mut restored = slots.contents().clone();

        for (index, slot) in restored.iter_mut().enumerate() {
            let name = slot_tag_name(index);
            let Some(tag) = self.tags.get(&name) else {
                continue;
            };
            if tag.is_blank() {
                *slot = None;
                continue;
            }
            if tag.amount > 1 {
                warn!(
                    slot = %name,
                    amount = tag.amount,
                    "slot record exceeds capacity, keeping one item"
                );
            }
            let kind = ItemKey::parse(&tag.variant)
                .with_context(|| format!("Invalid item kind in {name}: {:?}", tag.variant))?;
            *slot = Some(kind);
        }

        slots.replace_all(restored);
        Ok(())
    }

    /// Binary form for save files.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).context("Failed to serialize station record")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).context("Failed to deserialize station record")
    }
}
