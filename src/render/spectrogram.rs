use super::colormap::intensity_to_color;
use super::mapping::FrequencyMapping;
use super::raster::PixelSurface;

/// Paints one spectrum per tick as a new strip on the right edge of a
/// scrolling surface. Low frequencies sit at the bottom.
#[derive(Clone, Debug)]
pub struct SpectrogramRenderer {
    mapping: FrequencyMapping,
    scroll_step: u32,
}

impl SpectrogramRenderer {
    pub fn new(mapping: FrequencyMapping, scroll_step: u32) -> Self {
        Self {
            mapping,
            scroll_step: scroll_step.max(1),
        }
    }

    pub fn mapping(&self) -> &FrequencyMapping {
        &self.mapping
    }

    pub fn draw<S: PixelSurface + ?Sized>(&self, surface: &mut S, bins: &[u8], sample_rate: f32) {
        let width = surface.width();
        let height = surface.height();
        if width == 0 || height == 0 {
            return;
        }

        let step = self.scroll_step.min(width);
        let x = width - step;
        surface.shift_left(step);
        surface.clear_region(x, 0, step, height);

        let range = self.mapping.bin_range(bins.len(), sample_rate);
        let size = range.len();
        if size == 0 {
            return;
        }
        // Rows overlap rather than leave gaps when few bins span many pixels
        let thickness = height.div_ceil(size as u32);

        for (relative, &intensity) in bins[range].iter().enumerate() {
            let color = intensity_to_color(intensity);
            if color[3] == 0 {
                continue;
            }
            let bottom = row_y(relative, size, height);
            let top = (bottom + 1).saturating_sub(thickness);
            surface.fill_region(x, top, step, bottom + 1 - top, color);
        }
    }
}

/// Bottom pixel row of bin `relative` out of `size`; bin 0 sits on the last row.
fn row_y(relative: usize, size: usize, height: u32) -> u32 {
    position_row(relative as f32 / size as f32, height)
}

/// Pixel row for a height fraction (0.0 = bottom edge). Shared by the bands
/// and anything drawn on top of them. `height` must be non-zero.
pub fn position_row(position: f32, height: u32) -> u32 {
    let offset = (position.clamp(0.0, 1.0) * height as f32).floor() as u32;
    height - 1 - offset.min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colormap::{Rgba, TRANSPARENT};
    use crate::render::raster::RgbaRaster;

    const SR: f32 = 48000.0;

    fn full_range() -> FrequencyMapping {
        FrequencyMapping::Proportional { fraction: 1.0 }
    }

    #[test]
    fn row_positions_span_height() {
        assert_eq!(row_y(0, 4, 8), 7);
        assert_eq!(row_y(2, 4, 8), 3);
        assert_eq!(row_y(3, 4, 8), 1);
        assert_eq!(row_y(0, 16, 4), 3);
    }

    #[test]
    fn paints_newest_strip_on_the_right() {
        let renderer = SpectrogramRenderer::new(full_range(), 2);
        let mut raster = RgbaRaster::new(6, 4);
        renderer.draw(&mut raster, &[255; 4], SR);

        for y in 0..4 {
            assert_eq!(raster.pixel(4, y), Some(intensity_to_color(255)));
            assert_eq!(raster.pixel(5, y), Some(intensity_to_color(255)));
            assert_eq!(raster.pixel(3, y), Some(TRANSPARENT));
        }
    }

    #[test]
    fn silent_bins_stay_unpainted() {
        let renderer = SpectrogramRenderer::new(full_range(), 1);
        let mut raster = RgbaRaster::new(3, 4);
        renderer.draw(&mut raster, &[0, 0, 200, 0], SR);

        let painted: Vec<bool> = (0..4).map(|y| raster.pixel(2, y) != Some(TRANSPARENT)).collect();
        // Bin 2 of 4 lands at row 1 with a thickness of one row
        assert_eq!(painted, vec![false, true, false, false]);
    }

    #[test]
    fn low_bins_at_bottom() {
        let renderer = SpectrogramRenderer::new(full_range(), 1);
        let mut raster = RgbaRaster::new(1, 4);
        renderer.draw(&mut raster, &[255, 0, 0, 0], SR);
        assert_ne!(raster.pixel(0, 3), Some(TRANSPARENT));
        assert_eq!(raster.pixel(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn thick_rows_cover_gaps() {
        let renderer = SpectrogramRenderer::new(full_range(), 1);
        let mut raster = RgbaRaster::new(1, 8);
        renderer.draw(&mut raster, &[255, 255], SR);
        assert!((0..8).all(|y| raster.pixel(0, y) != Some(TRANSPARENT)));
    }

    #[test]
    fn scroll_invariant_over_ticks() {
        let renderer = SpectrogramRenderer::new(full_range(), 2);
        let mut raster = RgbaRaster::new(10, 1);
        let intensities: [u8; 4] = [60, 120, 180, 240];
        for &i in &intensities {
            renderer.draw(&mut raster, &[i], SR);
        }

        // Rightmost k*s columns hold the k frames, oldest leftmost
        let colors: Vec<Rgba> = (2..10).map(|x| raster.pixel(x, 0).unwrap()).collect();
        let expected: Vec<Rgba> = intensities
            .iter()
            .flat_map(|&i| [intensity_to_color(i); 2])
            .collect();
        assert_eq!(colors, expected);
        assert_eq!(raster.pixel(0, 0), Some(TRANSPARENT));
    }

    #[test]
    fn history_scrolls_off_the_left() {
        let renderer = SpectrogramRenderer::new(full_range(), 3);
        let mut raster = RgbaRaster::new(4, 1);
        renderer.draw(&mut raster, &[255], SR);
        renderer.draw(&mut raster, &[100], SR);
        assert_eq!(raster.pixel(0, 0), Some(intensity_to_color(255)));
        assert_eq!(raster.pixel(1, 0), Some(intensity_to_color(100)));
    }

    #[test]
    fn zero_sized_surface_is_a_noop() {
        let renderer = SpectrogramRenderer::new(full_range(), 2);
        let mut raster = RgbaRaster::new(0, 5);
        renderer.draw(&mut raster, &[255; 8], SR);
        let mut raster = RgbaRaster::new(5, 0);
        renderer.draw(&mut raster, &[255; 8], SR);
        assert!(raster.pixels().is_empty());
    }

    #[test]
    fn fixed_range_draws_only_window() {
        // 4 bins over 24 kHz: 6 kHz each; window covers bins 1..3
        let mapping = FrequencyMapping::FixedRange {
            min_hz: 6000.0,
            max_hz: 18000.0,
        };
        let renderer = SpectrogramRenderer::new(mapping, 1);
        let mut raster = RgbaRaster::new(1, 2);
        renderer.draw(&mut raster, &[255, 0, 255, 255], SR);
        // Bin 1 (silent) at the bottom, bin 2 on top
        assert_eq!(raster.pixel(0, 1), Some(TRANSPARENT));
        assert_ne!(raster.pixel(0, 0), Some(TRANSPARENT));
    }
}
