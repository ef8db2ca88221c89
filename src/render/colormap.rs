/// RGBA, 8 bits per channel.
pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Intensities at or below this are left unpainted.
pub const SILENCE_THRESHOLD: u8 = 10;

/// Ramp stops: transparent, blue, cyan-green, yellow, red.
/// Alpha rises from zero across the first band so the fade-in has no seam.
const STOPS: [(u8, Rgba); 5] = [
    (SILENCE_THRESHOLD, TRANSPARENT),
    (64, [0, 64, 255, 255]),
    (128, [0, 255, 128, 255]),
    (192, [255, 255, 0, 255]),
    (255, [255, 0, 0, 255]),
];

/// Map a bin intensity to a heat color.
pub fn intensity_to_color(intensity: u8) -> Rgba {
    if intensity <= SILENCE_THRESHOLD {
        return TRANSPARENT;
    }

    for pair in STOPS.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if intensity <= hi {
            let t = (intensity - lo) as f32 / (hi - lo) as f32;
            return lerp(lo_color, hi_color, t);
        }
    }
    STOPS[STOPS.len() - 1].1
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let value = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: Rgba, b: Rgba) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x as f32 - y as f32).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    #[test]
    fn silence_is_transparent() {
        for i in 0..=SILENCE_THRESHOLD {
            assert_eq!(intensity_to_color(i)[3], 0, "intensity {}", i);
        }
        assert_eq!(intensity_to_color(0), TRANSPARENT);
    }

    #[test]
    fn adjacent_intensities_stay_close() {
        for i in 0..255u8 {
            let d = distance(intensity_to_color(i), intensity_to_color(i + 1));
            assert!(d < 12.0, "jump of {} between {} and {}", d, i, i + 1);
        }
    }

    #[test]
    fn stops_are_hit_exactly() {
        assert_eq!(intensity_to_color(64), [0, 64, 255, 255]);
        assert_eq!(intensity_to_color(192), [255, 255, 0, 255]);
        assert_eq!(intensity_to_color(255), [255, 0, 0, 255]);
    }

    #[test]
    fn warmth_never_decreases() {
        // Red minus blue as a rough warmth measure, over the opaque part of the ramp
        let warmth = |c: Rgba| c[0] as i32 - c[2] as i32;
        for i in 64..255u8 {
            assert!(warmth(intensity_to_color(i + 1)) >= warmth(intensity_to_color(i)));
        }
    }

    #[test]
    fn fade_in_only_gains_opacity() {
        // Below the blue stop the ramp is a cold fade: opacity rises, no red appears
        for i in SILENCE_THRESHOLD..64 {
            let (lo, hi) = (intensity_to_color(i), intensity_to_color(i + 1));
            assert!(hi[3] >= lo[3], "alpha drops between {} and {}", i, i + 1);
            assert!(hi[2] >= lo[2], "blue drops between {} and {}", i, i + 1);
            assert_eq!(hi[0], 0, "red at {}", i + 1);
        }
        assert!(intensity_to_color(SILENCE_THRESHOLD + 1)[3] < intensity_to_color(64)[3]);
    }

    #[test]
    fn loud_bins_are_opaque() {
        assert!((64..=255).all(|i| intensity_to_color(i as u8)[3] == 255));
    }
}
