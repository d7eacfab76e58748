#![warn(missing_docs)]
//! Deterministic event stream capture for headless runs and tests.

use anyhow::{Context, Result};
use autosmith_core::SimTick;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Primary event record captured by headless runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Short kind label (e.g. `craft`, `use`, `save`).
    pub kind: String,
    /// Free-form payload.
    pub payload: String,
}

impl EventRecord {
    /// Build a record from borrowed parts.
    pub fn new(tick: SimTick, kind: &str, payload: impl Into<String>) -> Self {
        Self {
            tick,
            kind: kind.to_string(),
            payload: payload.into(),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create event log {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read back a JSONL event log.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("invalid event on line {}", idx + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_round_trips_events() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs").join("events.jsonl");

        let events = vec![
            EventRecord::new(SimTick(3), "use", "placed slot 0"),
            EventRecord::new(SimTick(12), "craft", "mdm:netherite_sword"),
        ];
        let mut sink = JsonlSink::create(&path).expect("sink create");
        for event in &events {
            sink.write(event).expect("write succeeds");
        }
        sink.flush().expect("flush");
        assert_eq!(sink.written(), 2);

        assert_eq!(read_events(&path).expect("readable"), events);
    }

    #[test]
    fn read_reports_bad_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.jsonl");
        fs::write(&path, "{\"tick\":1,\"kind\":\"use\",\"payload\":\"\"}\nnot json\n").unwrap();
        let err = read_events(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
