//! Server to client mirroring of station state.
//!
//! After every state change the server queues one [`BlockEntityDataPacket`]
//! carrying the full station record. Presentation copies apply packets as
//! they arrive and only ever read the latest one.

use crate::display::{display_transforms, DisplayTransform};
use crate::persist::StationRecord;
use crate::pos::BlockPos;
use crate::slots::SlotStore;
use anyhow::{Context, Result};
use autosmith_core::SimTick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full station state pushed to presentation copies after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntityDataPacket {
    /// Station position.
    pub pos: BlockPos,
    /// Complete slot record; receivers replace what they hold.
    pub record: StationRecord,
}

impl BlockEntityDataPacket {
    /// Wire bytes (postcard).
    pub fn encode(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).context("Failed to encode block entity packet")
    }

    /// Parse wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes).context("Failed to decode block entity packet")
    }
}

/// Client-side mirror of every station it has heard about.
#[derive(Debug, Clone, Default)]
pub struct RemoteStationView {
    stations: BTreeMap<BlockPos, SlotStore>,
}

impl RemoteStationView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one packet. Returns the position it updated.
    pub fn apply(&mut self, packet: &BlockEntityDataPacket) -> Result<BlockPos> {
        let mut slots = self.stations.get(&packet.pos).cloned().unwrap_or_default();
        packet
            .record
            .decode_into(&mut slots)
            .with_context(|| format!("Rejected station update at {}", packet.pos))?;
        self.stations.insert(packet.pos, slots);
        Ok(packet.pos)
    }

    /// Decode and apply a packet straight off the wire.
    pub fn apply_bytes(&mut self, bytes: &[u8]) -> Result<BlockPos> {
        let packet = BlockEntityDataPacket::decode(bytes)?;
        self.apply(&packet)
    }

    /// Forget a station (block removed).
    pub fn remove(&mut self, pos: BlockPos) -> Option<SlotStore> {
        self.stations.remove(&pos)
    }

    pub fn get(&self, pos: BlockPos) -> Option<&SlotStore> {
        self.stations.get(&pos)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Floating item transforms for the station at `pos`.
    pub fn display(&self, pos: BlockPos, game_time: SimTick, partial_ticks: f32) -> Vec<DisplayTransform> {
        self.get(pos)
            .map(|slots| display_transforms(slots, game_time, partial_ticks))
            .unwrap_or_default()
    }
}
