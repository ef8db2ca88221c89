use crate::audio::analysis::{analyze, Reading};
use crate::audio::frame::Frame;
use crate::render::raster::PixelSurface;
use crate::render::spectrogram::SpectrogramRenderer;
use crate::smoothing::{DisplayState, TemporalSmoother};

/// Per-tick driver: analyse the frame, fold the reading into the display
/// state, and paint the frame's spectrum onto the surface.
pub struct Pipeline {
    smoother: TemporalSmoother,
    renderer: SpectrogramRenderer,
    ticks: u64,
}

pub struct TickOutput {
    pub reading: Reading,
    pub display: DisplayState,
}

impl Pipeline {
    pub fn new(smoother: TemporalSmoother, renderer: SpectrogramRenderer) -> Self {
        Self {
            smoother,
            renderer,
            ticks: 0,
        }
    }

    pub fn tick<S: PixelSurface + ?Sized>(&mut self, frame: &Frame, surface: &mut S) -> TickOutput {
        let reading = analyze(frame);
        let display = *self.smoother.update(&reading);
        self.renderer.draw(surface, &frame.bins, frame.sample_rate);
        self.ticks += 1;

        log::trace!(
            "tick {}: {:.1} dB, pitch {:?}",
            self.ticks,
            reading.decibels,
            reading.pitch
        );
        TickOutput { reading, display }
    }

    pub fn renderer(&self) -> &SpectrogramRenderer {
        &self.renderer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
