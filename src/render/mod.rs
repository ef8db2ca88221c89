pub mod colormap;
pub mod mapping;
pub mod overlay;
pub mod raster;
pub mod spectrogram;
