use super::frame::Frame;
use super::pitch::detect_pitch;

/// Loudness floor in dB; silence and empty windows report exactly this.
pub const SILENCE_DB: f32 = -100.0;

/// Instantaneous per-tick measurements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub decibels: f32,
    /// Detected fundamental in Hz, `None` when no pitch was found
    pub pitch: Option<f32>,
}

impl Reading {
    pub const SILENT: Reading = Reading {
        decibels: SILENCE_DB,
        pitch: None,
    };
}

pub fn analyze(frame: &Frame) -> Reading {
    if frame.samples.is_empty() {
        return Reading::SILENT;
    }
    Reading {
        decibels: decibels(&frame.samples),
        pitch: detect_pitch(&frame.samples, frame.sample_rate),
    }
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

pub fn decibels(samples: &[f32]) -> f32 {
    let rms = rms(samples);
    if rms <= 0.0 {
        return SILENCE_DB;
    }
    // No ceiling: rms > 1 is out of contract but still reported as-is
    (20.0 * rms.log10()).max(SILENCE_DB)
}
