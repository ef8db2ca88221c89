use super::colormap::{Rgba, TRANSPARENT};

/// The primitive operations the spectrogram issues against a pixel surface.
/// Regions are clipped to the surface bounds.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Move all content `columns` pixels to the left; the vacated columns on
    /// the right keep stale content until cleared.
    fn shift_left(&mut self, columns: u32);
    fn clear_region(&mut self, x: u32, y: u32, w: u32, h: u32);
    fn fill_region(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba);
}

/// Row-major RGBA8 pixel buffer.
#[derive(Clone, Debug)]
pub struct RgbaRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaRaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    /// Reallocate for new dimensions, discarding content.
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn paint(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }
        for row in y..y_end {
            let start = self.offset(x, row);
            let end = self.offset(x_end, row);
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }
}

impl PixelSurface for RgbaRaster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn shift_left(&mut self, columns: u32) {
        let columns = columns.min(self.width) as usize;
        if columns == 0 {
            return;
        }
        let row_bytes = self.width as usize * 4;
        for row in self.pixels.chunks_exact_mut(row_bytes) {
            row.copy_within(columns * 4.., 0);
        }
    }

    fn clear_region(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.paint(x, y, w, h, TRANSPARENT);
    }

    fn fill_region(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        self.paint(x, y, w, h, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    #[test]
    fn fill_is_clipped() {
        let mut raster = RgbaRaster::new(4, 4);
        raster.fill_region(2, 3, 10, 10, RED);
        assert_eq!(raster.pixel(3, 3), Some(RED));
        assert_eq!(raster.pixel(1, 3), Some(TRANSPARENT));
        assert_eq!(raster.pixel(3, 2), Some(TRANSPARENT));
        assert_eq!(raster.pixel(4, 3), None);
    }

    #[test]
    fn shift_moves_rows_independently() {
        let mut raster = RgbaRaster::new(4, 2);
        raster.fill_region(2, 0, 1, 1, RED);
        raster.fill_region(3, 1, 1, 1, BLUE);
        raster.shift_left(2);
        assert_eq!(raster.pixel(0, 0), Some(RED));
        assert_eq!(raster.pixel(1, 1), Some(BLUE));
        assert_eq!(raster.pixel(0, 1), Some(TRANSPARENT));
    }

    #[test]
    fn shift_past_width_is_harmless() {
        let mut raster = RgbaRaster::new(3, 1);
        raster.fill_region(0, 0, 3, 1, RED);
        raster.shift_left(10);
        assert_eq!(raster.pixel(0, 0), Some(RED));
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut raster = RgbaRaster::new(2, 2);
        raster.fill_region(0, 0, 2, 2, BLUE);
        raster.clear_region(1, 0, 1, 2);
        assert_eq!(raster.pixel(0, 1), Some(BLUE));
        assert_eq!(raster.pixel(1, 1), Some(TRANSPARENT));
    }

    #[test]
    fn zero_sized_raster_accepts_operations() {
        let mut raster = RgbaRaster::new(0, 0);
        raster.shift_left(1);
        raster.fill_region(0, 0, 1, 1, RED);
        assert!(raster.pixels().is_empty());
    }
}
