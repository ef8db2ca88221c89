use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use std::path::Path;

use super::colormap::Rgba;
use super::raster::RgbaRaster;
use super::spectrogram::position_row;
use crate::note::Note;
use crate::smoothing::DisplayState;

pub const BACKGROUND: Rgba = [12, 12, 20, 255];
const MARKER_COLOR: Rgba = [255, 255, 255, 230];
const TEXT_COLOR: Rgba = [255, 255, 255, 220];
/// Width of the fast pitch marker as a share of the frame width.
const MARKER_SPAN: f32 = 0.08;

/// Flatten the spectrogram onto an opaque background, ready for encoding.
pub fn compose_frame(raster: &RgbaRaster, background: Rgba) -> Vec<u8> {
    let mut out = Vec::with_capacity(raster.pixels().len());
    for px in raster.pixels().chunks_exact(4) {
        let a = px[3] as f32 / 255.0;
        for c in 0..3 {
            out.push((px[c] as f32 * a + background[c] as f32 * (1.0 - a)).round() as u8);
        }
        out.push(255);
    }
    out
}

/// Horizontal line at the right edge marking the responsive pitch estimate.
/// `position` is the height fraction from the bottom.
pub fn draw_pitch_marker(pixels: &mut [u8], width: u32, height: u32, position: f32) {
    if width == 0 || height == 0 {
        return;
    }
    let y = position_row(position, height);
    let span = ((width as f32 * MARKER_SPAN).ceil() as u32).clamp(1, width);
    for row in y.saturating_sub(1)..(y + 2).min(height) {
        for x in (width - span)..width {
            blend(pixels, width, x, row, MARKER_COLOR, 1.0);
        }
    }
}

fn blend(pixels: &mut [u8], width: u32, x: u32, y: u32, color: Rgba, coverage: f32) {
    let idx = ((y as usize * width as usize) + x as usize) * 4;
    if idx + 3 >= pixels.len() {
        return;
    }
    let a = coverage * (color[3] as f32 / 255.0);
    for c in 0..3 {
        pixels[idx + c] = (color[c] as f32 * a + pixels[idx + c] as f32 * (1.0 - a)) as u8;
    }
    pixels[idx + 3] = 255;
}

/// Loudness / pitch / note text in the top-left corner.
pub struct ReadoutOverlay {
    font: Font,
    font_size: f32,
}

impl ReadoutOverlay {
    pub fn from_file(path: &Path, font_size: f32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font: {}", path.display()))?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font {}: {}", path.display(), e))?;
        Ok(Self { font, font_size })
    }

    pub fn lines(display: &DisplayState) -> Vec<String> {
        let pitch = match display.persisted_pitch {
            Some(hz) => format!("{:.1} Hz", hz),
            None => "-- Hz".to_string(),
        };
        let note = display
            .persisted_pitch
            .and_then(Note::from_frequency)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "--".to_string());
        vec![format!("{:.1} dB", display.loudness_db), pitch, note]
    }

    pub fn draw(&self, pixels: &mut [u8], width: u32, height: u32, display: &DisplayState) {
        let margin = (self.font_size * 0.5) as i32;
        let line_height = (self.font_size * 1.2) as i32;
        for (i, line) in Self::lines(display).iter().enumerate() {
            self.draw_text(pixels, width, height, line, margin, margin + i as i32 * line_height);
        }
    }

    fn draw_text(&self, pixels: &mut [u8], width: u32, height: u32, text: &str, x: i32, y: i32) {
        let mut pen_x = x;
        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, self.font_size);
            let top = y + self.font_size as i32 - metrics.height as i32 - metrics.ymin;

            for (i, &alpha) in coverage.iter().enumerate() {
                if alpha == 0 {
                    continue;
                }
                let px = pen_x + (i % metrics.width) as i32;
                let py = top + (i / metrics.width) as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    continue;
                }
                blend(pixels, width, px as u32, py as u32, TEXT_COLOR, alpha as f32 / 255.0);
            }
            pen_x += metrics.advance_width.round() as i32;
        }
    }
}
