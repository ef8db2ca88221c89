use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::note::Note;
use crate::pipeline::TickOutput;
use crate::smoothing::DisplayState;

/// One tick of analysis as exported to JSON.
#[derive(Debug, Serialize)]
pub struct ReadingRecord {
    pub tick: usize,
    pub time: f32,
    pub decibels: f32,
    pub pitch_hz: Option<f32>,
    #[serde(flatten)]
    pub display: DisplayState,
    pub note: Option<String>,
    pub midi: Option<i32>,
}

impl ReadingRecord {
    pub fn new(tick: usize, fps: u32, output: &TickOutput) -> Self {
        let note = output.display.persisted_pitch.and_then(Note::from_frequency);
        Self {
            tick,
            time: tick as f32 / fps.max(1) as f32,
            decibels: output.reading.decibels,
            pitch_hz: output.reading.pitch,
            display: output.display,
            note: note.map(|n| n.to_string()),
            midi: note.map(|n| n.midi),
        }
    }
}

pub fn write_readings(path: &Path, records: &[ReadingRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create readings file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).context("Failed to serialize readings")?;
    writer.flush().context("Failed to flush readings")?;
    log::info!("Wrote {} readings to {}", records.len(), path.display());
    Ok(())
}
