use super::analysis::rms;

/// Windows quieter than this never report a pitch.
const SILENCE_GATE_RMS: f32 = 0.01;
/// Correlation a lag must exceed before it can start a peak.
const PEAK_THRESHOLD: f32 = 0.9;
/// Minimum correlation for the coarse, uninterpolated fallback.
const FALLBACK_THRESHOLD: f32 = 0.01;

/// Estimate the fundamental frequency of `samples` by time-domain
/// autocorrelation.
///
/// Lags in `[0, len / 2)` are scored as `1 - mean |s[i] - s[i + lag]|`. The
/// scan stops at the first peak above [`PEAK_THRESHOLD`], whose position is
/// refined to sub-sample precision by fitting a parabola through the peak
/// and its two neighbours.
pub fn detect_pitch(samples: &[f32], sample_rate: f32) -> Option<f32> {
    if samples.is_empty() || rms(samples) < SILENCE_GATE_RMS {
        return None;
    }

    let max_lag = samples.len() / 2;
    let mut correlations = vec![0.0f32; max_lag];
    let mut last_correlation = 1.0f32;
    let mut best_correlation = 0.0f32;
    let mut best_offset = 0usize;
    let mut found_peak = false;

    for offset in 0..max_lag {
        let diff: f32 = samples[..max_lag]
            .iter()
            .zip(&samples[offset..offset + max_lag])
            .map(|(a, b)| (a - b).abs())
            .sum::<f32>()
            / max_lag as f32;
        let correlation = 1.0 - diff;
        correlations[offset] = correlation;

        if correlation > PEAK_THRESHOLD && correlation > last_correlation {
            found_peak = true;
            if correlation > best_correlation {
                best_correlation = correlation;
                best_offset = offset;
            }
        } else if found_peak {
            return refine_peak(&correlations[..=offset], best_offset, sample_rate);
        }
        last_correlation = correlation;
    }

    if best_correlation > FALLBACK_THRESHOLD && best_offset > 0 {
        return Some(sample_rate / best_offset as f32);
    }
    None
}

/// Parabolic interpolation around `best`, falling back to the integer lag when
/// either neighbour is missing or the fit degenerates. Lag 0 has no period.
fn refine_peak(correlations: &[f32], best: usize, sample_rate: f32) -> Option<f32> {
    if best == 0 {
        return None;
    }
    let coarse = sample_rate / best as f32;
    if best + 1 >= correlations.len() {
        return Some(coarse);
    }

    let prev = correlations[best - 1];
    let peak = correlations[best];
    let next = correlations[best + 1];
    let denominator = 2.0 * (2.0 * peak - next - prev);
    if denominator == 0.0 {
        return Some(coarse);
    }

    let refined = sample_rate / (best as f32 + (next - prev) / denominator);
    if refined.is_finite() && refined > 0.0 {
        Some(refined)
    } else {
        Some(coarse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const SR: f32 = 44100.0;
    const WINDOW: usize = 2048;

    fn sine(freq: f32, amplitude: f32) -> Vec<f32> {
        (0..WINDOW)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SR).sin())
            .collect()
    }

    fn assert_close(detected: Option<f32>, expected: f32) {
        let detected = detected.unwrap_or_else(|| panic!("no pitch for {} Hz", expected));
        let error = (detected - expected).abs() / expected;
        assert!(error < 0.01, "expected {} Hz, got {} Hz", expected, detected);
    }

    #[test]
    fn silence_has_no_pitch() {
        assert_eq!(detect_pitch(&[0.0; WINDOW], SR), None);
        assert_eq!(detect_pitch(&[], SR), None);
    }

    #[test]
    fn quiet_signal_is_gated() {
        assert_eq!(detect_pitch(&sine(440.0, 0.005), SR), None);
    }

    #[test]
    fn detects_vocal_range_sines() {
        for freq in [110.0, 220.0, 330.0, 440.0, 660.0, 880.0, 1046.5] {
            assert_close(detect_pitch(&sine(freq, 0.5), SR), freq);
        }
    }

    #[test]
    fn detects_low_amplitude_sine() {
        assert_close(detect_pitch(&sine(440.0, 0.1), SR), 440.0);
    }

    #[test]
    fn interpolation_beats_lag_quantization() {
        // Period of 44.5 samples, halfway between two integer lags
        let freq = SR / 44.5;
        let detected = detect_pitch(&sine(freq, 0.5), SR).unwrap();
        assert!((detected - freq).abs() / freq < 0.003, "expected {}, got {}", freq, detected);
    }

    #[test]
    fn refine_guards_left_edge() {
        assert_eq!(refine_peak(&[1.0, 0.95], 0, SR), None);
        assert_eq!(refine_peak(&[0.5, 0.95], 1, SR), Some(SR));
    }

    #[test]
    fn refine_guards_flat_peak() {
        assert_eq!(refine_peak(&[0.95, 0.95, 0.95], 1, SR), Some(SR));
    }

    #[test]
    fn refine_moves_toward_higher_neighbour() {
        let refined = refine_peak(&[0.91, 0.99, 0.97], 1, 100.0).unwrap();
        // Peak shifts right of lag 1, so frequency drops below 100 Hz
        assert!(refined < 100.0 && refined > 50.0, "got {}", refined);
    }
}
