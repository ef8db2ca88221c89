use std::fmt;

const A4_HZ: f32 = 440.0;
const A4_MIDI: i32 = 69;
const SEMITONES: i32 = 12;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Nearest equal-tempered note to a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub midi: i32,
    pub name: &'static str,
    pub octave: i32,
}

impl Note {
    pub fn from_frequency(freq_hz: f32) -> Option<Self> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return None;
        }

        let semitones_from_a4 = (SEMITONES as f32 * (freq_hz / A4_HZ).log2()).round() as i32;
        let midi = semitones_from_a4 + A4_MIDI;

        Some(Self {
            midi,
            name: NOTE_NAMES[midi.rem_euclid(SEMITONES) as usize],
            octave: midi.div_euclid(SEMITONES) - 1,
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}
