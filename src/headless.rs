use crate::command_script::{CommandScriptPlayer, ScriptCommand};
use crate::config::AutosmithConfig;
use anyhow::{Context, Result};
use autosmith_core::{ItemStack, SimTick};
use autosmith_testkit::{EventRecord, JsonlSink};
use autosmith_world::{
    LevelEvent, MechanicalPress, RemoteStationView, SmithingRecipeBook, SmithingWorld,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct HeadlessConfig {
    pub settings: AutosmithConfig,
    pub command_script: Option<PathBuf>,
}

/// Totals reported once a headless run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub uses: u64,
    pub crafts: u64,
    pub saves: u64,
}

struct HeadlessRun {
    settings: AutosmithConfig,
    world: SmithingWorld,
    view: RemoteStationView,
    sink: Option<JsonlSink>,
    summary: RunSummary,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let recipes = match &cfg.settings.recipes_path {
        Some(path) => SmithingRecipeBook::load_from_file(path)
            .with_context(|| format!("Failed to load recipes from {}", path.display()))?,
        None => SmithingRecipeBook::with_defaults(),
    };
    info!(recipes = recipes.recipe_count(), "recipe book ready");

    let mut world = SmithingWorld::new(recipes, cfg.settings.trigger_mode);
    if let Some(path) = cfg.settings.save_path.as_deref().filter(|path| path.exists()) {
        let restored = world.load_from_path(path)?;
        info!(path = %path.display(), stations = restored, "resumed from save");
    }

    let mut script = cfg
        .command_script
        .as_deref()
        .map(CommandScriptPlayer::from_path)
        .transpose()?;

    let sink = cfg
        .settings
        .events_path
        .as_deref()
        .map(JsonlSink::create)
        .transpose()?;

    let mut state = HeadlessRun {
        settings: cfg.settings,
        world,
        view: RemoteStationView::new(),
        sink,
        summary: RunSummary::default(),
    };
    // Mirror whatever the save restored.
    state.pump()?;

    while state.world.current_tick().0 < state.settings.max_ticks {
        if let Some(script) = script.as_mut() {
            for command in script.drain_ready_commands(state.world.current_tick()) {
                state.execute(command)?;
            }
        }
        state.pump()?;

        let script_done = script.as_ref().map_or(true, CommandScriptPlayer::is_finished);
        if script_done && state.world.presses().all_idle() {
            break;
        }

        state.world.tick();
        state.pump()?;
    }
    state.summary.ticks = state.world.current_tick().0;

    if state.settings.save_path.is_some() {
        state.save()?;
    }
    if let Some(sink) = state.sink.as_mut() {
        sink.flush()?;
    }

    info!(
        ticks = state.summary.ticks,
        uses = state.summary.uses,
        crafts = state.summary.crafts,
        "headless run finished"
    );
    Ok(state.summary)
}

impl HeadlessRun {
    fn tick(&self) -> SimTick {
        self.world.current_tick()
    }

    fn record(&mut self, kind: &str, payload: String) -> Result<()> {
        let tick = self.tick();
        if let Some(sink) = self.sink.as_mut() {
            sink.write(&EventRecord::new(tick, kind, payload))?;
        }
        Ok(())
    }

    fn execute(&mut self, command: ScriptCommand) -> Result<()> {
        debug!(tick = self.tick().0, ?command, "script command");
        match command {
            ScriptCommand::PlaceStation(pos) => {
                if !self.world.add_station(pos) {
                    warn!(pos = %pos, "station already present");
                }
            }
            ScriptCommand::PlacePress { pos, rpm } => {
                let rpm = rpm.unwrap_or(self.settings.press_rpm);
                let press = if self.settings.press_repeat {
                    MechanicalPress::repeating(rpm)
                } else {
                    MechanicalPress::new(rpm)
                };
                self.world.add_press(pos, press);
            }
            ScriptCommand::StartPress(pos) => match self.world.press_mut(pos) {
                Some(press) => {
                    if !press.start() {
                        warn!(pos = %pos, "press could not start (stalled or mid-stroke)");
                    }
                }
                None => warn!(pos = %pos, "no press to start"),
            },
            ScriptCommand::Use { pos, item, mode } => {
                let mut hand = item.map(|kind| ItemStack::new(kind, 1));
                match self.world.use_block(pos, &mut hand, mode) {
                    Some(outcome) => {
                        self.summary.uses += 1;
                        self.record("use", format!("{pos} {outcome:?}"))?;
                    }
                    None => warn!(pos = %pos, "no station to use"),
                }
            }
            ScriptCommand::Save => self.save()?,
            ScriptCommand::Log => {
                let lines: Vec<String> = self
                    .world
                    .stations()
                    .map(|station| {
                        let slots: Vec<String> = station
                            .slots()
                            .contents()
                            .iter()
                            .map(|slot| match slot {
                                Some(kind) => kind.to_string(),
                                None => "-".to_string(),
                            })
                            .collect();
                        format!("{} [{}]", station.pos(), slots.join(", "))
                    })
                    .collect();
                for line in lines {
                    info!("{line}");
                    self.record("log", line)?;
                }
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = self.settings.save_path.clone() else {
            warn!("save requested but no save path is configured");
            return Ok(());
        };
        let count = self.world.save_to_path(&path)?;
        self.summary.saves += 1;
        self.record("save", format!("{} stations to {}", count, path.display()))
    }

    /// Ship queued sync packets to the presentation copy and log level events.
    fn pump(&mut self) -> Result<()> {
        for packet in self.world.drain_sync() {
            let bytes = packet.encode()?;
            self.view.apply_bytes(&bytes)?;
        }

        for event in self.world.drain_events() {
            match event {
                LevelEvent::SmithingComplete { pos, ref result } => {
                    self.summary.crafts += 1;
                    info!(pos = %pos, result = %result, code = event.code(), "smithing complete");
                    self.record("craft", format!("{pos} {result}"))?;
                }
            }
        }
        Ok(())
    }
}
