//! Three fixed single-item slots of a smithing station.
//!
//! Each slot holds either nothing or exactly one unit of one item kind. The
//! store has no side effects of its own; callers decide when a mutation needs
//! to be saved or synchronized.

use autosmith_core::{ItemKey, ItemStack};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of slots on a smithing station.
pub const SLOT_COUNT: usize = 3;

/// Fixed semantic role of each slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotRole {
    /// Slot 0. Also receives the crafted result.
    Template,
    /// Slot 1.
    Base,
    /// Slot 2.
    Addition,
}

impl SlotRole {
    /// Roles in slot-index order.
    pub const ALL: [SlotRole; SLOT_COUNT] = [SlotRole::Template, SlotRole::Base, SlotRole::Addition];

    pub const fn index(self) -> usize {
        match self {
            SlotRole::Template => 0,
            SlotRole::Base => 1,
            SlotRole::Addition => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Misuse of the slot store. Not expected at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("invalid slot operation: index {index}, count {count} (slots hold exactly one item)")]
    InvalidSlotOperation { index: usize, count: u32 },
    #[error("slot {index} cannot hold air")]
    BlankItem { index: usize },
}

/// Capacity-1 storage for the template, base and addition items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStore {
    slots: [Option<ItemKey>; SLOT_COUNT],
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the slot holds nothing. Out-of-range indices read as empty.
    pub fn is_empty(&self, index: usize) -> bool {
        self.kind(index).is_none()
    }

    /// True when every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// True when no slot is occupied.
    pub fn is_all_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Store one unit of `kind` in `index`, replacing whatever was there.
    pub fn set(&mut self, index: usize, kind: ItemKey, count: u32) -> Result<(), SlotError> {
        if count != 1 || index >= SLOT_COUNT {
            return Err(SlotError::InvalidSlotOperation { index, count });
        }
        if kind.is_air() {
            return Err(SlotError::BlankItem { index });
        }
        self.slots[index] = Some(kind);
        Ok(())
    }

    /// Empty a slot. Returns `true` if it held something.
    pub fn clear(&mut self, index: usize) -> bool {
        self.take(index).is_some()
    }

    /// Empty a slot, returning what it held as a stack of one.
    pub fn take(&mut self, index: usize) -> Option<ItemStack> {
        self.slots
            .get_mut(index)?
            .take()
            .map(|kind| ItemStack::new(kind, 1))
    }

    /// Contents of a slot as a stack of one.
    pub fn get(&self, index: usize) -> Option<ItemStack> {
        self.kind(index).map(|kind| ItemStack::new(kind.clone(), 1))
    }

    /// Item kind held in a slot.
    pub fn kind(&self, index: usize) -> Option<&ItemKey> {
        self.slots.get(index)?.as_ref()
    }

    /// Item kind held in the slot with the given role.
    pub fn by_role(&self, role: SlotRole) -> Option<&ItemKey> {
        self.kind(role.index())
    }

    /// Install all three slots in a single assignment. Air installs as empty.
    pub fn replace_all(&mut self, slots: [Option<ItemKey>; SLOT_COUNT]) {
        self.slots = slots.map(|slot| slot.filter(|kind| !kind.is_air()));
    }

    /// Snapshot of all slot contents in index order.
    pub fn contents(&self) -> &[Option<ItemKey>; SLOT_COUNT] {
        &self.slots
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> ItemKey {
        ItemKey::parse(path).unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let store = SlotStore::new();
        assert!(store.is_all_empty());
        assert!(!store.is_full());
        for index in 0..SLOT_COUNT {
            assert!(store.is_empty(index));
            assert_eq!(store.get(index), None);
        }
    }

    #[test]
    fn set_rejects_counts_other_than_one() {
        let mut store = SlotStore::new();
        assert_eq!(
            store.set(0, key("diamond"), 2),
            Err(SlotError::InvalidSlotOperation { index: 0, count: 2 })
        );
        assert_eq!(
            store.set(1, key("diamond"), 0),
            Err(SlotError::InvalidSlotOperation { index: 1, count: 0 })
        );
        assert!(store.is_all_empty());
    }

    #[test]
    fn set_rejects_out_of_range_index() {
        let mut store = SlotStore::new();
        assert_eq!(
            store.set(3, key("diamond"), 1),
            Err(SlotError::InvalidSlotOperation { index: 3, count: 1 })
        );
        assert!(store.is_empty(3));
        assert!(!store.clear(3));
    }

    #[test]
    fn take_returns_single_item_and_clears() {
        let mut store = SlotStore::new();
        store.set(1, key("diamond_chestplate"), 1).unwrap();
        assert_eq!(store.by_role(SlotRole::Base), Some(&key("diamond_chestplate")));

        let taken = store.take(1).unwrap();
        assert_eq!(taken.count, 1);
        assert_eq!(taken.kind, key("diamond_chestplate"));
        assert!(store.is_empty(1));
        assert_eq!(store.take(1), None);
    }

    #[test]
    fn full_after_all_roles_filled() {
        let mut store = SlotStore::new();
        for role in SlotRole::ALL {
            store.set(role.index(), key("iron_ingot"), 1).unwrap();
        }
        assert!(store.is_full());
        assert_eq!(store.occupied(), 3);
        assert_eq!(SlotRole::from_index(2), Some(SlotRole::Addition));
        assert_eq!(SlotRole::from_index(3), None);
    }

    #[test]
    fn air_never_occupies_a_slot() {
        let mut store = SlotStore::new();
        assert_eq!(
            store.set(0, ItemKey::air(), 1),
            Err(SlotError::BlankItem { index: 0 })
        );
        store.replace_all([Some(ItemKey::air()), Some(key("netherite_ingot")), None]);
        assert!(store.is_empty(0));
        assert_eq!(store.occupied(), 1);
    }
}
