use serde::Deserialize;
use std::ops::Range;

/// Which slice of the spectrum is stretched over the raster height.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FrequencyMapping {
    /// The lowest `fraction` of all bins
    Proportional {
        #[serde(default = "default_fraction")]
        fraction: f32,
    },
    /// A fixed frequency window in Hz
    FixedRange { min_hz: f32, max_hz: f32 },
}

pub const DEFAULT_FRACTION: f32 = 0.4;

fn default_fraction() -> f32 {
    DEFAULT_FRACTION
}

impl Default for FrequencyMapping {
    fn default() -> Self {
        Self::Proportional {
            fraction: DEFAULT_FRACTION,
        }
    }
}

impl FrequencyMapping {
    /// Bin indices drawn from bottom (start) to top (end).
    pub fn bin_range(&self, bin_count: usize, sample_rate: f32) -> Range<usize> {
        match *self {
            Self::Proportional { fraction } => {
                let end = (bin_count as f32 * fraction.clamp(0.0, 1.0)).floor() as usize;
                0..end.min(bin_count)
            }
            Self::FixedRange { min_hz, max_hz } => {
                let start = bin_index(min_hz, bin_count, sample_rate);
                let end = bin_index(max_hz, bin_count, sample_rate);
                start..end.max(start)
            }
        }
    }

    /// Height fraction (0.0 = bottom edge, 1.0 = top edge) at which `freq_hz`
    /// is drawn, clamped to the visible range.
    pub fn frequency_position(&self, freq_hz: f32, bin_count: usize, sample_rate: f32) -> f32 {
        let (low, high) = match *self {
            Self::Proportional { .. } => {
                let range = self.bin_range(bin_count, sample_rate);
                let hz_per_bin = sample_rate / 2.0 / bin_count.max(1) as f32;
                (0.0, range.end as f32 * hz_per_bin)
            }
            Self::FixedRange { min_hz, max_hz } => (min_hz, max_hz),
        };
        let span = high - low;
        if !(span > 0.0) {
            return 0.0;
        }
        ((freq_hz - low) / span).clamp(0.0, 1.0)
    }
}

/// `floor(freq / nyquist * bin_count)`, clamped to `[0, bin_count]`.
pub fn bin_index(freq_hz: f32, bin_count: usize, sample_rate: f32) -> usize {
    let nyquist = sample_rate / 2.0;
    if !(nyquist > 0.0) || !(freq_hz > 0.0) {
        return 0;
    }
    let index = (freq_hz / nyquist * bin_count as f32).floor();
    (index as usize).min(bin_count)
}
