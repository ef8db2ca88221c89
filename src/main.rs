mod audio;
mod cli;
mod config;
mod encode;
mod note;
mod pipeline;
mod readings;
mod render;
mod smoothing;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use audio::capture::{CaptureSource, FileCapture};
use cli::Cli;
use config::Config;
use encode::ffmpeg::{EncoderSettings, FfmpegEncoder};
use pipeline::Pipeline;
use readings::ReadingRecord;
use render::overlay::{compose_frame, draw_pitch_marker, ReadoutOverlay, BACKGROUND};
use render::raster::RgbaRaster;
use render::spectrogram::SpectrogramRenderer;
use smoothing::TemporalSmoother;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let output = &config.output;
    log::info!("pitchscope - spectrogram with pitch and loudness readouts");
    log::info!("Input: {}", cli.input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!("Resolution: {}x{} @ {} ticks/s", output.width, output.height, output.fps);
    log::info!(
        "Mapping: {:?}, scroll step {}",
        config.spectrogram.mapping,
        config.spectrogram.scroll_step
    );

    // 1. Decode and prepare the replayed capture
    log::info!("Decoding audio...");
    let audio = audio::decode::decode_audio(&cli.input)?;
    let mut capture = FileCapture::new(audio, output.fps, config.analysis.analyser())?;
    let total_ticks = capture.tick_count();
    let bin_count = capture.bin_count();
    let sample_rate = capture.sample_rate();

    // 2. Core pipeline and its raster
    let mut pipeline = Pipeline::new(
        TemporalSmoother::new(config.analysis.smoother()),
        SpectrogramRenderer::new(config.spectrogram.mapping, config.spectrogram.scroll_step),
    );
    let mut raster = RgbaRaster::new(output.width, output.height);

    let readout = match output.font {
        Some(ref path) => Some(ReadoutOverlay::from_file(path, cli.font_size)?),
        None => {
            log::info!("No --font given; rendering without text readout");
            None
        }
    };

    // 3. Encoder
    log::info!("Starting FFmpeg encoder...");
    let mut encoder = FfmpegEncoder::new(&EncoderSettings {
        output: &cli.output,
        audio: (!cli.no_audio).then_some(cli.input.as_path()),
        width: output.width,
        height: output.height,
        fps: output.fps,
        codec: &output.codec,
        pix_fmt: &cli.pix_fmt,
        crf: output.crf,
    })?;

    // 4. Tick loop
    let pb = ProgressBar::new(total_ticks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let mut records = Vec::new();
    let mut tick = 0usize;
    while let Some(frame) = capture.next_frame()? {
        let out = pipeline.tick(&frame, &mut raster);

        let mut pixels = compose_frame(&raster, BACKGROUND);
        if let Some(hz) = out.display.fast_pitch {
            let position = pipeline
                .renderer()
                .mapping()
                .frequency_position(hz, bin_count, sample_rate);
            draw_pitch_marker(&mut pixels, output.width, output.height, position);
        }
        if let Some(ref overlay) = readout {
            overlay.draw(&mut pixels, output.width, output.height, &out.display);
        }
        encoder.write_frame(&pixels)?;

        if cli.readings.is_some() {
            records.push(ReadingRecord::new(tick, output.fps, &out));
        }
        tick += 1;
        pb.set_position(tick as u64);
    }
    pb.finish_with_message("Rendering complete");

    // 5. Finish
    log::info!("Finishing encoding...");
    encoder.finish()?;

    if let Some(ref path) = cli.readings {
        readings::write_readings(path, &records)?;
    }

    log::info!("Done! {} ticks rendered to {}", pipeline.ticks(), cli.output.display());
    Ok(())
}

/// Config file (explicit or discovered), overlaid with CLI flags, validated.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => config::load_config(path)?,
        None => match config::discover_config() {
            Some(path) => match config::load_config(&path) {
                Ok(cfg) => {
                    log::info!("Loaded config from {}", path.display());
                    cfg
                }
                Err(err) => {
                    log::warn!("Ignoring config: {}", err);
                    Config::default()
                }
            },
            None => Config::default(),
        },
    };
    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}
