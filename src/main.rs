//! autosmith - press-driven smithing stations in a deterministic sandbox
//!
//! Headless runner: loads configuration and recipes, replays a command script
//! against the tick loop, and writes an event log and a station save.

mod command_script;
mod config;
mod headless;

use anyhow::Result;
use autosmith_world::TriggerMode;
use clap::Parser;
use config::{AutosmithConfig, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run automatic smithing stations headlessly", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// JSON command script to replay
    #[arg(long)]
    script: Option<PathBuf>,
    /// Smithing recipe JSON (overrides the config file)
    #[arg(long)]
    recipes: Option<PathBuf>,
    /// Craft on every tick the press head is down instead of once per stroke
    #[arg(long)]
    level_trigger: bool,
    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Station save file
    #[arg(long)]
    save: Option<PathBuf>,
    /// JSONL event log
    #[arg(long)]
    events: Option<PathBuf>,
}

impl Args {
    fn apply(self, mut settings: AutosmithConfig) -> (AutosmithConfig, Option<PathBuf>) {
        if self.level_trigger {
            settings.trigger_mode = TriggerMode::Level;
        }
        if let Some(max_ticks) = self.max_ticks {
            settings.max_ticks = max_ticks;
        }
        settings.recipes_path = self.recipes.or(settings.recipes_path);
        settings.save_path = self.save.or(settings.save_path);
        settings.events_path = self.events.or(settings.events_path);
        (settings, self.script)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting autosmith v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let settings = AutosmithConfig::load_from_path(&args.config);
    let (settings, command_script) = args.apply(settings);

    let summary = headless::run(headless::HeadlessConfig {
        settings,
        command_script,
    })?;
    println!(
        "ticks={} uses={} crafts={} saves={}",
        summary.ticks, summary.uses, summary.crafts, summary.saves
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let args = Args::parse_from([
            "autosmith",
            "--level-trigger",
            "--max-ticks",
            "50",
            "--save",
            "out/stations.bin",
        ]);
        let file = AutosmithConfig {
            save_path: Some(PathBuf::from("saves/stations.bin")),
            events_path: Some(PathBuf::from("logs/events.jsonl")),
            ..AutosmithConfig::default()
        };

        let (settings, script) = args.apply(file);
        assert_eq!(settings.trigger_mode, TriggerMode::Level);
        assert_eq!(settings.max_ticks, 50);
        assert_eq!(settings.save_path, Some(PathBuf::from("out/stations.bin")));
        assert_eq!(settings.events_path, Some(PathBuf::from("logs/events.jsonl")));
        assert!(script.is_none());
    }
}
