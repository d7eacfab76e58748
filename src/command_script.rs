use anyhow::{Context, Result};
use autosmith_core::{GameMode, ItemKey, SimTick};
use autosmith_world::BlockPos;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    tick: u64,
    command: String,
}

/// A parsed script command.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// `station x y z`
    PlaceStation(BlockPos),
    /// `press x y z [rpm]`
    PlacePress { pos: BlockPos, rpm: Option<f32> },
    /// `start x y z`: begin one press stroke.
    StartPress(BlockPos),
    /// `use x y z [item] [creative]`: empty hand when no item is given.
    Use {
        pos: BlockPos,
        item: Option<ItemKey>,
        mode: GameMode,
    },
    /// `save`
    Save,
    /// `log`: dump every station's contents to the event log.
    Log,
}

impl ScriptCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().context("empty command")?;
        let args: Vec<&str> = words.collect();

        let pos = |args: &[&str]| -> Result<BlockPos> {
            let [x, y, z] = args
                .get(..3)
                .and_then(|s| <[&str; 3]>::try_from(s).ok())
                .with_context(|| format!("`{verb}` needs x y z coordinates"))?;
            Ok(BlockPos::new(
                x.parse().with_context(|| format!("bad x coordinate `{x}`"))?,
                y.parse().with_context(|| format!("bad y coordinate `{y}`"))?,
                z.parse().with_context(|| format!("bad z coordinate `{z}`"))?,
            ))
        };

        let command = match verb {
            "station" => ScriptCommand::PlaceStation(pos(&args)?),
            "press" => ScriptCommand::PlacePress {
                pos: pos(&args)?,
                rpm: args
                    .get(3)
                    .map(|rpm| rpm.parse().with_context(|| format!("bad rpm `{rpm}`")))
                    .transpose()?,
            },
            "start" => ScriptCommand::StartPress(pos(&args)?),
            "use" => {
                let mut item = None;
                let mut mode = GameMode::Survival;
                for &word in args.iter().skip(3) {
                    if word == "creative" {
                        mode = GameMode::Creative;
                    } else if item.is_none() {
                        item = Some(
                            ItemKey::parse(word)
                                .with_context(|| format!("bad item key `{word}`"))?,
                        );
                    } else {
                        anyhow::bail!("unexpected argument `{word}` to use");
                    }
                }
                ScriptCommand::Use {
                    pos: pos(&args)?,
                    item,
                    mode,
                }
            }
            "save" => ScriptCommand::Save,
            "log" => ScriptCommand::Log,
            other => anyhow::bail!("unknown command `{other}`"),
        };
        Ok(command)
    }
}

#[derive(Debug, Clone)]
struct CommandScriptStep {
    tick: SimTick,
    command: ScriptCommand,
}

/// Deterministic command script runner.
///
/// Scripts are a simple list of `{tick, command}` steps, executed in file order.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read command script {}", path.display()))?;
        Self::from_str(&contents)
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for (idx, step) in file.steps.into_iter().enumerate() {
            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("command script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            let command = ScriptCommand::parse(step.command.trim())
                .with_context(|| format!("invalid command in step {}", idx + 1))?;
            pending.push_back(CommandScriptStep {
                tick: SimTick(step.tick),
                command,
            });
        }

        Ok(Self { pending })
    }

    /// Drain and return all commands scheduled for ticks `<= tick`.
    pub fn drain_ready_commands(&mut self, tick: SimTick) -> Vec<ScriptCommand> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_script_rejects_unsorted_ticks() {
        let json = r#"{
            "steps": [
                {"tick": 2, "command": "station 0 64 0"},
                {"tick": 1, "command": "save"}
            ]
        }"#;
        let err = CommandScriptPlayer::from_str(json).unwrap_err();
        assert!(
            err.to_string().contains("sorted by tick"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn command_script_rejects_unknown_commands() {
        let json = r#"{"steps": [{"tick": 0, "command": "/weather clear"}]}"#;
        let err = CommandScriptPlayer::from_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("unknown command"), "{err:#}");
    }

    #[test]
    fn command_script_drains_in_order_and_is_deterministic() {
        let json = r#"{
            "steps": [
                {"tick": 1, "command": "station 0 64 0"},
                {"tick": 1, "command": "press 0 66 0 128"},
                {"tick": 3, "command": "start 0 66 0"}
            ]
        }"#;
        let mut script = CommandScriptPlayer::from_str(json).expect("script should parse");

        assert!(script.drain_ready_commands(SimTick(0)).is_empty());
        assert_eq!(
            script.drain_ready_commands(SimTick(1)),
            vec![
                ScriptCommand::PlaceStation(BlockPos::new(0, 64, 0)),
                ScriptCommand::PlacePress {
                    pos: BlockPos::new(0, 66, 0),
                    rpm: Some(128.0)
                },
            ]
        );
        assert!(script.drain_ready_commands(SimTick(2)).is_empty());
        assert_eq!(
            script.drain_ready_commands(SimTick(3)),
            vec![ScriptCommand::StartPress(BlockPos::new(0, 66, 0))]
        );
        assert!(script.is_finished());
    }

    #[test]
    fn use_command_variants() {
        assert_eq!(
            ScriptCommand::parse("use 1 2 3").unwrap(),
            ScriptCommand::Use {
                pos: BlockPos::new(1, 2, 3),
                item: None,
                mode: GameMode::Survival,
            }
        );
        assert_eq!(
            ScriptCommand::parse("use 1 2 -3 netherite_ingot creative").unwrap(),
            ScriptCommand::Use {
                pos: BlockPos::new(1, 2, -3),
                item: Some(ItemKey::parse("netherite_ingot").unwrap()),
                mode: GameMode::Creative,
            }
        );
        assert!(ScriptCommand::parse("use 1 2").is_err());
        assert!(ScriptCommand::parse("use 1 2 3 a b").is_err());
    }
}
