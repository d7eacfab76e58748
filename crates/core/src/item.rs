//! Item stacks and player game modes.

use crate::registry::{ItemKey, ItemKeyError};
use serde::{Deserialize, Serialize};

/// Player game mode, as far as item handling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Items are consumed when used.
    #[default]
    Survival,
    /// Unlimited resources: using an item never shrinks the held stack.
    Creative,
}

impl GameMode {
    /// Whether held items are left untouched when placed.
    pub fn has_unlimited_items(self) -> bool {
        matches!(self, GameMode::Creative)
    }
}

/// A stack of identical items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Kind of item.
    pub kind: ItemKey,
    /// Quantity in stack.
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(kind: ItemKey, count: u32) -> Self {
        Self { kind, count }
    }

    /// Create a single item from a textual key.
    pub fn parse_one(key: &str) -> Result<Self, ItemKeyError> {
        Ok(Self::new(ItemKey::parse(key)?, 1))
    }

    /// True when the stack holds no items. A stack of air is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.kind.is_air()
    }

    /// Remove up to `amount` items from the stack.
    pub fn shrink(&mut self, amount: u32) {
        self.count = self.count.saturating_sub(amount);
    }
}
