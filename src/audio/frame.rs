use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("bin count {bins} does not match half the sample window ({samples} samples)")]
    LengthMismatch { bins: usize, samples: usize },
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),
}

/// One tick's worth of analyser output.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Per-bin magnitudes quantized to 0-255 (window / 2 elements)
    pub bins: Vec<u8>,
    /// Time-domain samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: f32,
}

impl Frame {
    pub fn new(bins: Vec<u8>, samples: Vec<f32>, sample_rate: f32) -> Result<Self, FrameError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FrameError::InvalidSampleRate(sample_rate));
        }
        if bins.len() != samples.len() / 2 {
            return Err(FrameError::LengthMismatch {
                bins: bins.len(),
                samples: samples.len(),
            });
        }
        Ok(Self {
            bins,
            samples,
            sample_rate,
        })
    }
}
