//! Host world: owns stations and presses, runs the tick loop and routes
//! player uses.
//!
//! Stations report whether they changed; the world turns every change into
//! exactly one dirty mark and one sync packet.

use crate::actuator::{ActuatorLookup, ExtensionProgress};
use crate::events::LevelEvent;
use crate::interaction::UseOutcome;
use crate::persist::StationRecord;
use crate::pos::BlockPos;
use crate::press::MechanicalPress;
use crate::recipe::SmithingRecipeBook;
use crate::station::{CraftOutcome, SmithingStation};
use crate::sync::BlockEntityDataPacket;
use crate::trigger::TriggerMode;
use anyhow::{Context, Result};
use autosmith_core::{GameMode, ItemStack, SimTick};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Magic number for station save files ("MDSM").
const SAVE_MAGIC: u32 = 0x4D44534D;

/// Current save file format version.
const SAVE_VERSION: u16 = 1;

const HEADER_LEN: usize = 14;

/// Presses by anchor position.
#[derive(Debug, Clone, Default)]
pub struct PressMap {
    presses: BTreeMap<BlockPos, MechanicalPress>,
}

impl PressMap {
    pub fn insert(&mut self, pos: BlockPos, press: MechanicalPress) -> Option<MechanicalPress> {
        self.presses.insert(pos, press)
    }

    pub fn remove(&mut self, pos: BlockPos) -> Option<MechanicalPress> {
        self.presses.remove(&pos)
    }

    pub fn get(&self, pos: BlockPos) -> Option<&MechanicalPress> {
        self.presses.get(&pos)
    }

    pub fn get_mut(&mut self, pos: BlockPos) -> Option<&mut MechanicalPress> {
        self.presses.get_mut(&pos)
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    /// True when no press is mid-stroke or about to start one.
    pub fn all_idle(&self) -> bool {
        self.presses.values().all(|press| !press.is_active())
    }

    fn tick_all(&mut self) {
        for press in self.presses.values_mut() {
            press.tick();
        }
    }
}

impl ActuatorLookup for PressMap {
    fn actuator_at(&self, pos: BlockPos) -> Option<&dyn ExtensionProgress> {
        self.presses
            .get(&pos)
            .map(|press| press as &dyn ExtensionProgress)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StationSave {
    tick: u64,
    stations: Vec<(BlockPos, StationRecord)>,
}

impl StationSave {
    /// Header (magic, version, CRC32, payload length) followed by the bincode payload.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self).context("Failed to serialize stations")?;

        let mut hasher = Hasher::new();
        hasher.update(&payload);
        let crc32 = hasher.finalize();

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&SAVE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&SAVE_VERSION.to_le_bytes());
        bytes.extend_from_slice(&crc32.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }
}

/// Stations, presses and the notification queues their changes feed.
pub struct SmithingWorld {
    tick: SimTick,
    client: bool,
    trigger_mode: TriggerMode,
    recipes: SmithingRecipeBook,
    stations: BTreeMap<BlockPos, SmithingStation>,
    presses: PressMap,
    dirty: BTreeSet<BlockPos>,
    outbox: Vec<BlockEntityDataPacket>,
    events: Vec<LevelEvent>,
}

impl SmithingWorld {
    /// Authoritative (server) world.
    pub fn new(recipes: SmithingRecipeBook, trigger_mode: TriggerMode) -> Self {
        Self {
            tick: SimTick::ZERO,
            client: false,
            trigger_mode,
            recipes,
            stations: BTreeMap::new(),
            presses: PressMap::default(),
            dirty: BTreeSet::new(),
            outbox: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Non-authoritative copy: presses animate but stations never tick or mutate.
    pub fn new_client(recipes: SmithingRecipeBook, trigger_mode: TriggerMode) -> Self {
        Self {
            client: true,
            ..Self::new(recipes, trigger_mode)
        }
    }

    pub fn is_client(&self) -> bool {
        self.client
    }

    pub fn current_tick(&self) -> SimTick {
        self.tick
    }

    pub fn recipes(&self) -> &SmithingRecipeBook {
        &self.recipes
    }

    /// Place an empty station. Returns `false` if one already exists there.
    pub fn add_station(&mut self, pos: BlockPos) -> bool {
        if self.stations.contains_key(&pos) {
            return false;
        }
        self.stations
            .insert(pos, SmithingStation::new(pos, self.trigger_mode));
        self.mark_changed(pos);
        true
    }

    /// Remove a station, returning its final contents as item stacks.
    pub fn remove_station(&mut self, pos: BlockPos) -> Option<Vec<ItemStack>> {
        let station = self.stations.remove(&pos)?;
        self.dirty.remove(&pos);
        Some(
            (0..crate::slots::SLOT_COUNT)
                .filter_map(|index| station.slots().get(index))
                .collect(),
        )
    }

    pub fn station(&self, pos: BlockPos) -> Option<&SmithingStation> {
        self.stations.get(&pos)
    }

    pub fn stations(&self) -> impl Iterator<Item = &SmithingStation> {
        self.stations.values()
    }

    pub fn add_press(&mut self, pos: BlockPos, press: MechanicalPress) {
        self.presses.insert(pos, press);
    }

    pub fn remove_press(&mut self, pos: BlockPos) -> Option<MechanicalPress> {
        self.presses.remove(pos)
    }

    pub fn press(&self, pos: BlockPos) -> Option<&MechanicalPress> {
        self.presses.get(pos)
    }

    pub fn press_mut(&mut self, pos: BlockPos) -> Option<&mut MechanicalPress> {
        self.presses.get_mut(pos)
    }

    pub fn presses(&self) -> &PressMap {
        &self.presses
    }

    /// Route a player use at `pos`. `None` means no station is there and the
    /// block's default behaviour applies.
    pub fn use_block(
        &mut self,
        pos: BlockPos,
        hand: &mut Option<ItemStack>,
        mode: GameMode,
    ) -> Option<UseOutcome> {
        if self.client {
            return self.stations.contains_key(&pos).then_some(UseOutcome::NoOp);
        }
        let station = self.stations.get_mut(&pos)?;
        let outcome = station.handle_use(hand, mode);
        if outcome.changed() {
            self.mark_changed(pos);
        }
        Some(outcome)
    }

    /// Advance one tick: presses first, then every station in position order.
    pub fn tick(&mut self) {
        self.tick = self.tick.advance(1);
        self.presses.tick_all();

        if self.client {
            return;
        }

        let mut committed = Vec::new();
        for (pos, station) in self.stations.iter_mut() {
            let report = station.tick(&self.presses, &self.recipes);
            match report.craft {
                Some(CraftOutcome::Committed { .. }) => committed.push(*pos),
                Some(CraftOutcome::NoMatch) => {
                    debug!(pos = %pos, "press came down on an unmatched triple");
                }
                None => {}
            }
            self.events.extend(station.drain_events());
        }

        for pos in committed {
            self.mark_changed(pos);
        }
    }

    /// Run `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn mark_changed(&mut self, pos: BlockPos) {
        let Some(station) = self.stations.get(&pos) else {
            return;
        };
        self.dirty.insert(pos);
        self.outbox.push(BlockEntityDataPacket {
            pos,
            record: station.to_record(),
        });
    }

    /// Stations changed since the last drain (the persistence layer's save list).
    pub fn drain_dirty(&mut self) -> Vec<BlockPos> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn is_dirty(&self, pos: BlockPos) -> bool {
        self.dirty.contains(&pos)
    }

    /// Sync packets queued since the last drain, in emission order.
    pub fn drain_sync(&mut self) -> Vec<BlockEntityDataPacket> {
        std::mem::take(&mut self.outbox)
    }

    /// Level events raised since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Write every station to `path` and clear the dirty set.
    pub fn save_to_path(&mut self, path: &Path) -> Result<usize> {
        let save = StationSave {
            tick: self.tick.0,
            stations: self
                .stations
                .iter()
                .map(|(pos, station)| (*pos, station.to_record()))
                .collect(),
        };
        let bytes = save.to_bytes()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create save directory")?;
        }
        fs::write(path, bytes)
            .with_context(|| format!("Failed to write station save {}", path.display()))?;

        self.dirty.clear();
        info!(path = %path.display(), stations = save.stations.len(), "saved smithing stations");
        Ok(save.stations.len())
    }

    /// Load stations saved by [`save_to_path`](Self::save_to_path). Existing
    /// stations at saved positions are restored in place; others are created.
    pub fn load_from_path(&mut self, path: &Path) -> Result<usize> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read station save {}", path.display()))?;
        if bytes.len() < HEADER_LEN {
            anyhow::bail!("Station save header too short");
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != SAVE_MAGIC {
            anyhow::bail!(
                "Invalid station save magic: expected 0x{:08X}, got 0x{:08X}",
                SAVE_MAGIC,
                magic
            );
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != SAVE_VERSION {
            anyhow::bail!("Unsupported station save version {version}");
        }
        let crc32 = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let payload_len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]) as usize;

        let payload = bytes
            .get(HEADER_LEN..HEADER_LEN + payload_len)
            .context("Station save payload truncated")?;

        let mut hasher = Hasher::new();
        hasher.update(payload);
        let computed = hasher.finalize();
        if computed != crc32 {
            anyhow::bail!(
                "CRC32 mismatch: expected {:08X}, got {:08X}",
                crc32,
                computed
            );
        }

        let save: StationSave =
            bincode::deserialize(payload).context("Failed to deserialize stations")?;

        let mut loaded = 0;
        for (pos, record) in save.stations {
            let mut station = self
                .stations
                .get(&pos)
                .cloned()
                .unwrap_or_else(|| SmithingStation::new(pos, self.trigger_mode));
            if let Err(err) = station.load_record(&record) {
                warn!(pos = %pos, "skipping unreadable station record: {err:#}");
                continue;
            }
            // Restored state is already durable; only presentation copies need it.
            self.outbox.push(BlockEntityDataPacket {
                pos,
                record: station.to_record(),
            });
            self.stations.insert(pos, station);
            loaded += 1;
        }
        self.tick = self.tick.max(SimTick(save.tick));
        info!(path = %path.display(), stations = loaded, "loaded smithing stations");
        Ok(loaded)
    }
}
