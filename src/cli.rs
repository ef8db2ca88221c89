use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::render::mapping::{FrequencyMapping, DEFAULT_FRACTION};

const DEFAULT_MIN_FREQ: f32 = 60.0;
const DEFAULT_MAX_FREQ: f32 = 1200.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MappingMode {
    /// Lowest fraction of all bins
    Proportional,
    /// Fixed frequency window (--min-freq / --max-freq)
    FixedRange,
}

/// Settings left unset fall back to the config file, then built-in defaults.
#[derive(Parser, Debug)]
#[command(
    name = "pitchscope",
    about = "Scrolling spectrogram video with loudness and pitch readouts"
)]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Output video file
    #[arg(short, long, default_value = "pitchscope.mp4")]
    pub output: PathBuf,

    /// Config file (default: ./pitchscope.toml or ~/.config/pitchscope/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Video width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Video height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Analysis ticks (and video frames) per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Analyser window in samples (power of two)
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Smoothing history length in ticks
    #[arg(long)]
    pub history: Option<usize>,

    /// Columns scrolled per tick
    #[arg(long)]
    pub scroll_step: Option<u32>,

    /// Frequency-to-height mapping
    #[arg(long, value_enum)]
    pub mapping: Option<MappingMode>,

    /// Share of bins shown in proportional mode (0.0-1.0)
    #[arg(long)]
    pub fraction: Option<f32>,

    /// Bottom edge in fixed-range mode (Hz)
    #[arg(long)]
    pub min_freq: Option<f32>,

    /// Top edge in fixed-range mode (Hz)
    #[arg(long)]
    pub max_freq: Option<f32>,

    /// TTF/OTF font for the loudness and pitch readout; no text without it
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Readout font size in pixels
    #[arg(long, default_value_t = 28.0)]
    pub font_size: f32,

    /// Write per-tick readings to this JSON file
    #[arg(long)]
    pub readings: Option<PathBuf>,

    /// H.264 CRF quality (0-51, lower = better)
    #[arg(long)]
    pub crf: Option<u32>,

    /// FFmpeg video codec
    #[arg(long)]
    pub codec: Option<String>,

    /// FFmpeg pixel format
    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: String,

    /// Do not mux the source audio into the video
    #[arg(long)]
    pub no_audio: bool,
}

impl Cli {
    /// Overlay explicitly passed flags onto `config`.
    pub fn apply(&self, config: &mut Config) {
        let output = &mut config.output;
        if let Some(width) = self.width {
            output.width = width;
        }
        if let Some(height) = self.height {
            output.height = height;
        }
        if let Some(fps) = self.fps {
            output.fps = fps;
        }
        if let Some(crf) = self.crf {
            output.crf = crf;
        }
        if let Some(ref codec) = self.codec {
            output.codec = codec.clone();
        }
        if self.font.is_some() {
            output.font = self.font.clone();
        }

        if let Some(fft_size) = self.fft_size {
            config.analysis.fft_size = fft_size;
        }
        if let Some(history) = self.history {
            config.analysis.history = history;
        }
        if let Some(step) = self.scroll_step {
            config.spectrogram.scroll_step = step;
        }

        config.spectrogram.mapping = self.resolve_mapping(config.spectrogram.mapping);
    }

    fn resolve_mapping(&self, current: FrequencyMapping) -> FrequencyMapping {
        let mode = self.mapping.unwrap_or(match current {
            FrequencyMapping::Proportional { .. } => MappingMode::Proportional,
            FrequencyMapping::FixedRange { .. } => MappingMode::FixedRange,
        });
        match (mode, current) {
            (MappingMode::Proportional, FrequencyMapping::Proportional { fraction }) => {
                FrequencyMapping::Proportional {
                    fraction: self.fraction.unwrap_or(fraction),
                }
            }
            (MappingMode::Proportional, _) => FrequencyMapping::Proportional {
                fraction: self.fraction.unwrap_or(DEFAULT_FRACTION),
            },
            (MappingMode::FixedRange, FrequencyMapping::FixedRange { min_hz, max_hz }) => {
                FrequencyMapping::FixedRange {
                    min_hz: self.min_freq.unwrap_or(min_hz),
                    max_hz: self.max_freq.unwrap_or(max_hz),
                }
            }
            (MappingMode::FixedRange, _) => FrequencyMapping::FixedRange {
                min_hz: self.min_freq.unwrap_or(DEFAULT_MIN_FREQ),
                max_hz: self.max_freq.unwrap_or(DEFAULT_MAX_FREQ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pitchscope").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn unset_flags_keep_config() {
        let mut config = Config::default();
        config.output.fps = 30;
        parse(&["in.wav"]).apply(&mut config);
        assert_eq!(config.output.fps, 30);
        assert_eq!(config.spectrogram.mapping, FrequencyMapping::default());
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        parse(&["in.wav", "--fps", "50", "--scroll-step", "4", "--fft-size", "4096"]).apply(&mut config);
        assert_eq!(config.output.fps, 50);
        assert_eq!(config.spectrogram.scroll_step, 4);
        assert_eq!(config.analysis.fft_size, 4096);
    }

    #[test]
    fn fixed_range_from_flags() {
        let mut config = Config::default();
        parse(&["in.wav", "--mapping", "fixed-range", "--max-freq", "800"]).apply(&mut config);
        assert_eq!(
            config.spectrogram.mapping,
            FrequencyMapping::FixedRange {
                min_hz: DEFAULT_MIN_FREQ,
                max_hz: 800.0
            }
        );
    }

    #[test]
    fn range_flags_adjust_configured_window() {
        let mut config = Config::default();
        config.spectrogram.mapping = FrequencyMapping::FixedRange {
            min_hz: 100.0,
            max_hz: 2000.0,
        };
        parse(&["in.wav", "--min-freq", "80"]).apply(&mut config);
        assert_eq!(
            config.spectrogram.mapping,
            FrequencyMapping::FixedRange {
                min_hz: 80.0,
                max_hz: 2000.0
            }
        );
    }

    #[test]
    fn fraction_flag_applies_to_proportional() {
        let mut config = Config::default();
        parse(&["in.wav", "--fraction", "0.25"]).apply(&mut config);
        assert_eq!(
            config.spectrogram.mapping,
            FrequencyMapping::Proportional { fraction: 0.25 }
        );
    }
}
