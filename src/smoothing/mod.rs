pub mod decimator;
pub mod history;

use serde::Serialize;

use crate::audio::analysis::{Reading, SILENCE_DB};
use decimator::Decimator;
use history::{positive_mean, History};

/// Number of newest pitch entries the fast marker looks at.
const FAST_WINDOW: usize = 10;
/// The fast marker needs more than this many voiced entries in its window.
const FAST_MIN_VOICED: usize = 3;

#[derive(Clone, Copy, Debug)]
pub struct SmootherSettings {
    /// History length in ticks (30 is ~0.5s at 60 Hz)
    pub history: usize,
    /// Ticks between loudness / fast pitch marker updates
    pub fast_interval: u32,
    /// Ticks between persisted pitch readout updates
    pub slow_interval: u32,
}

impl Default for SmootherSettings {
    fn default() -> Self {
        Self {
            history: 30,
            fast_interval: 5,
            slow_interval: 30,
        }
    }
}

/// Values shown to the user, refreshed on their own decimated schedules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DisplayState {
    pub loudness_db: f32,
    /// Responsive pitch estimate; drops to `None` during silence
    pub fast_pitch: Option<f32>,
    /// Stable pitch readout; holds its last value through silence
    pub persisted_pitch: Option<f32>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            loudness_db: SILENCE_DB,
            fast_pitch: None,
            persisted_pitch: None,
        }
    }
}

/// Owns the loudness and pitch histories and turns noisy per-tick readings
/// into display values.
///
/// The fast cadence averages loudness over the whole history and the pitch
/// over the last few ticks. The slow cadence only replaces the persisted
/// pitch when enough of the history is voiced, so the readout freezes rather
/// than resetting when the input goes quiet.
#[derive(Clone, Debug)]
pub struct TemporalSmoother {
    loudness: History,
    pitch: History,
    fast: Decimator,
    slow: Decimator,
    display: DisplayState,
}

impl TemporalSmoother {
    pub fn new(settings: SmootherSettings) -> Self {
        Self {
            loudness: History::new(settings.history),
            pitch: History::new(settings.history),
            fast: Decimator::new(settings.fast_interval),
            slow: Decimator::new(settings.slow_interval),
            display: DisplayState::default(),
        }
    }

    pub fn update(&mut self, reading: &Reading) -> &DisplayState {
        // Coerce before touching either history so both get exactly one entry
        let decibels = if reading.decibels.is_finite() {
            reading.decibels
        } else {
            SILENCE_DB
        };
        let pitch = reading
            .pitch
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(0.0);
        self.loudness.push(decibels);
        self.pitch.push(pitch);

        if self.fast.tick() {
            self.refresh_fast();
        }
        if self.slow.tick() {
            self.refresh_persisted();
        }
        &self.display
    }

    fn refresh_fast(&mut self) {
        if let Some(mean) = self.loudness.mean() {
            self.display.loudness_db = mean;
        }
        let (mean, voiced) = positive_mean(self.pitch.recent(FAST_WINDOW));
        self.display.fast_pitch = if voiced > FAST_MIN_VOICED { mean } else { None };
    }

    fn refresh_persisted(&mut self) {
        let (mean, voiced) = positive_mean(self.pitch.iter());
        if voiced > self.pitch.capacity() / 3 {
            if let Some(mean) = mean {
                log::debug!("Persisted pitch {:.1} Hz ({} voiced ticks)", mean, voiced);
                self.display.persisted_pitch = Some(mean);
            }
        }
    }

    /// Back to the just-constructed state, for a capture that restarts.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn reset(&mut self) {
        self.loudness.clear();
        self.pitch.clear();
        self.fast.reset();
        self.slow.reset();
        self.display = DisplayState::default();
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(SmootherSettings::default())
    }
}
