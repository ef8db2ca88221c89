use anyhow::Result;
use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::AudioData;
use super::frame::{Frame, FrameError};

/// Where the pipeline pulls its per-tick frames from.
pub trait CaptureSource {
    fn sample_rate(&self) -> f32;
    /// The frame for the next tick, `None` once a finite source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError>;
}

/// Spectrum analyser parameters, matching the usual browser analyser defaults.
#[derive(Clone, Copy, Debug)]
pub struct AnalyserSettings {
    /// Time-domain window length; produces `fft_size / 2` bins
    pub fft_size: usize,
    /// Level mapped to intensity 0
    pub min_decibels: f32,
    /// Level mapped to intensity 255
    pub max_decibels: f32,
    /// Weight of the previous spectrum when blending in a new one (0.0-1.0)
    pub smoothing_time_constant: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            min_decibels: -100.0,
            max_decibels: -30.0,
            smoothing_time_constant: 0.8,
        }
    }
}

/// Replays decoded audio tick by tick as if it were arriving live.
///
/// Tick `i` sees the `fft_size` samples that would have been captured by the
/// end of that tick. Spectra for every tick are computed up front.
pub struct FileCapture {
    audio: AudioData,
    settings: AnalyserSettings,
    fps: u32,
    spectra: Vec<Vec<u8>>,
    position: usize,
}

impl FileCapture {
    pub fn new(audio: AudioData, fps: u32, settings: AnalyserSettings) -> Result<Self> {
        if audio.sample_rate == 0 {
            anyhow::bail!("Decoded audio has no sample rate");
        }
        if settings.fft_size < 2 || !settings.fft_size.is_power_of_two() {
            anyhow::bail!("FFT size must be a power of two, got {}", settings.fft_size);
        }
        let fps = fps.max(1);
        let ticks = (audio.duration() * fps as f32).ceil() as usize;

        log::info!(
            "Computing spectra for {} ticks (fft_size={}, {} bins)...",
            ticks,
            settings.fft_size,
            settings.fft_size / 2
        );
        let magnitudes = compute_magnitudes(&audio, fps, &settings, ticks);
        let spectra = smooth_and_quantize(&magnitudes, &settings);

        Ok(Self {
            audio,
            settings,
            fps,
            spectra,
            position: 0,
        })
    }

    pub fn tick_count(&self) -> usize {
        self.spectra.len()
    }

    pub fn bin_count(&self) -> usize {
        self.settings.fft_size / 2
    }
}

impl CaptureSource for FileCapture {
    fn sample_rate(&self) -> f32 {
        self.audio.sample_rate as f32
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        let Some(bins) = self.spectra.get(self.position).cloned() else {
            return Ok(None);
        };
        let samples = window_at(&self.audio, self.fps, self.settings.fft_size, self.position);
        self.position += 1;
        Frame::new(bins, samples, self.sample_rate()).map(Some)
    }
}

/// The `size` samples ending where tick `tick` ends, zero-padded before the start.
fn window_at(audio: &AudioData, fps: u32, size: usize, tick: usize) -> Vec<f32> {
    let end = (((tick + 1) as u64 * audio.sample_rate as u64) / fps as u64) as usize;
    let end = end.min(audio.samples.len());
    let start = end.saturating_sub(size);
    let mut window = vec![0.0f32; size - (end - start)];
    window.extend_from_slice(&audio.samples[start..end]);
    window
}

fn compute_magnitudes(
    audio: &AudioData,
    fps: u32,
    settings: &AnalyserSettings,
    ticks: usize,
) -> Vec<Vec<f32>> {
    let size = settings.fft_size;
    let fft = FftPlanner::<f32>::new().plan_fft_forward(size);
    let window = blackman_window(size);

    (0..ticks)
        .into_par_iter()
        .map(|tick| {
            let mut buffer: Vec<Complex<f32>> = window_at(audio, fps, size, tick)
                .iter()
                .zip(&window)
                .map(|(&s, &w)| Complex::new(s * w, 0.0))
                .collect();
            fft.process(&mut buffer);
            buffer[..size / 2]
                .iter()
                .map(|c| c.norm() / size as f32)
                .collect()
        })
        .collect()
}

/// Blend each spectrum into the running one, then map dB onto 0-255.
fn smooth_and_quantize(magnitudes: &[Vec<f32>], settings: &AnalyserSettings) -> Vec<Vec<u8>> {
    let tau = settings.smoothing_time_constant.clamp(0.0, 1.0);
    let mut running = vec![0.0f32; settings.fft_size / 2];

    magnitudes
        .iter()
        .map(|current| {
            running
                .iter_mut()
                .zip(current)
                .map(|(prev, &mag)| {
                    *prev = tau * *prev + (1.0 - tau) * mag;
                    quantize_db(20.0 * prev.log10(), settings.min_decibels, settings.max_decibels)
                })
                .collect()
        })
        .collect()
}

fn quantize_db(db: f32, min_db: f32, max_db: f32) -> u8 {
    let range = max_db - min_db;
    if !db.is_finite() || !(range > 0.0) {
        return 0;
    }
    (255.0 / range * (db - min_db)).floor().clamp(0.0, 255.0) as u8
}

fn blackman_window(size: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42f32, 0.5f32, 0.08f32);
    (0..size)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / size as f32;
            a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos()
        })
        .collect()
}
