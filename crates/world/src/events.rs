use crate::pos::BlockPos;
use autosmith_core::ItemKey;
use serde::{Deserialize, Serialize};

/// Legacy level-event code clients map to the smithing table sound.
pub const SMITHING_TABLE_USE_EVENT: u32 = 1044;

/// One-shot, world-visible effects raised by block entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// A station committed a craft (sound + particles at `pos`).
    SmithingComplete { pos: BlockPos, result: ItemKey },
}

impl LevelEvent {
    pub fn code(&self) -> u32 {
        match self {
            LevelEvent::SmithingComplete { .. } => SMITHING_TABLE_USE_EVENT,
        }
    }

    pub fn pos(&self) -> BlockPos {
        match self {
            LevelEvent::SmithingComplete { pos, .. } => *pos,
        }
    }
}
