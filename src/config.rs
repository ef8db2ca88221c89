use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audio::capture::AnalyserSettings;
use crate::render::mapping::FrequencyMapping;
use crate::smoothing::SmootherSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub spectrogram: SpectrogramConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_crf")]
    pub crf: u32,
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default)]
    pub font: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_history")]
    pub history: usize,
    #[serde(default = "default_fast_interval")]
    pub fast_interval: u32,
    #[serde(default = "default_slow_interval")]
    pub slow_interval: u32,
    #[serde(default = "default_min_decibels")]
    pub min_decibels: f32,
    #[serde(default = "default_max_decibels")]
    pub max_decibels: f32,
    #[serde(default = "default_smoothing_time_constant")]
    pub smoothing_time_constant: f32,
}

#[derive(Debug, Deserialize)]
pub struct SpectrogramConfig {
    #[serde(default = "default_scroll_step")]
    pub scroll_step: u32,
    #[serde(default)]
    pub mapping: FrequencyMapping,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            crf: default_crf(),
            codec: default_codec(),
            font: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            history: default_history(),
            fast_interval: default_fast_interval(),
            slow_interval: default_slow_interval(),
            min_decibels: default_min_decibels(),
            max_decibels: default_max_decibels(),
            smoothing_time_constant: default_smoothing_time_constant(),
        }
    }
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            scroll_step: default_scroll_step(),
            mapping: FrequencyMapping::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn analyser(&self) -> AnalyserSettings {
        AnalyserSettings {
            fft_size: self.fft_size,
            min_decibels: self.min_decibels,
            max_decibels: self.max_decibels,
            smoothing_time_constant: self.smoothing_time_constant,
        }
    }

    pub fn smoother(&self) -> SmootherSettings {
        SmootherSettings {
            history: self.history,
            fast_interval: self.fast_interval,
            slow_interval: self.slow_interval,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.fft_size < 32 || !analysis.fft_size.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "fft_size must be a power of two >= 32, got {}",
                analysis.fft_size
            )));
        }
        if analysis.history == 0 || analysis.fast_interval == 0 || analysis.slow_interval == 0 {
            return Err(ConfigError::Invalid(
                "history and update intervals must be at least 1".into(),
            ));
        }
        if analysis.min_decibels >= analysis.max_decibels {
            return Err(ConfigError::Invalid(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                analysis.min_decibels, analysis.max_decibels
            )));
        }
        if !(0.0..=1.0).contains(&analysis.smoothing_time_constant) {
            return Err(ConfigError::Invalid(format!(
                "smoothing_time_constant must be within 0-1, got {}",
                analysis.smoothing_time_constant
            )));
        }
        if self.spectrogram.scroll_step == 0 {
            return Err(ConfigError::Invalid("scroll_step must be at least 1".into()));
        }
        if self.output.fps == 0 {
            return Err(ConfigError::Invalid("fps must be at least 1".into()));
        }
        match self.spectrogram.mapping {
            FrequencyMapping::Proportional { fraction } if !(fraction > 0.0 && fraction <= 1.0) => {
                Err(ConfigError::Invalid(format!(
                    "mapping fraction must be within (0, 1], got {}",
                    fraction
                )))
            }
            FrequencyMapping::FixedRange { min_hz, max_hz } if !(min_hz >= 0.0 && min_hz < max_hz) => {
                Err(ConfigError::Invalid(format!(
                    "frequency range {}-{} Hz is empty",
                    min_hz, max_hz
                )))
            }
            _ => Ok(()),
        }
    }
}

fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_fps() -> u32 { 60 }
fn default_crf() -> u32 { 18 }
fn default_codec() -> String { "libx264".into() }
fn default_fft_size() -> usize { 2048 }
fn default_history() -> usize { 30 }
fn default_fast_interval() -> u32 { 5 }
fn default_slow_interval() -> u32 { 30 }
fn default_min_decibels() -> f32 { -100.0 }
fn default_max_decibels() -> f32 { -30.0 }
fn default_smoothing_time_constant() -> f32 { 0.8 }
fn default_scroll_step() -> u32 { 2 }

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// `pitchscope.toml` in the working directory, then the per-user config file.
pub fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from("pitchscope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("pitchscope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("pitchscope").join("config.toml"))
        .filter(|path| path.exists())
}
