//! `band-split`: runs a WAV file through the band-splitting filter bank.
//!
//! ```bash
//! band-split speech_48k.wav merged.wav --bands out/speech
//! RUST_LOG=debug band-split music_32k.wav merged.wav
//! ```

mod args;
mod error;
mod wav;

use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use webrtc_band_split::{AudioBuffer, StreamConfig};

use crate::args::Args;
use crate::error::{CliError, Result};
use crate::wav::{WavInput, WavOutput};

const PROGRESS_INTERVAL_FRAMES: usize = 100;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let result = Args::parse(std::env::args().skip(1)).and_then(|args| run(&args));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(usage)) => {
            eprintln!("{usage}");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut input = WavInput::open(&args.input)?;
    let sample_rate = input.sample_rate();
    let channels = input.channels();

    let config = StreamConfig::new(sample_rate as usize, usize::from(channels));
    let mut buffer = AudioBuffer::new(config)?;
    let num_bands = buffer.num_bands();
    tracing::info!(
        input = %args.input.display(),
        sample_rate,
        channels,
        num_bands,
        "splitting"
    );

    let mut output = WavOutput::create(&args.output, sample_rate, channels)?;
    let mut band_outputs = (0..num_bands)
        .filter_map(|band| args.band_path(band))
        .map(|path| WavOutput::create(&path, sample_rate / num_bands as u32, channels))
        .collect::<Result<Vec<_>>>()?;

    let mut frame = vec![0i16; config.num_samples()];
    let mut band_frame = vec![0i16; buffer.num_frames_per_band() * config.num_channels()];
    let mut frames = 0usize;

    while input.read_frame(&mut frame)? {
        buffer.copy_from_interleaved_i16(&frame);
        buffer.split_into_frequency_bands();

        for (band, band_output) in band_outputs.iter_mut().enumerate() {
            buffer.copy_band_to_interleaved_i16(band, &mut band_frame);
            band_output.write_frame(&band_frame)?;
        }

        buffer.merge_frequency_bands();
        buffer.copy_to_interleaved_i16(&mut frame);
        output.write_frame(&frame)?;

        frames += 1;
        if frames.is_multiple_of(PROGRESS_INTERVAL_FRAMES) {
            tracing::debug!(frames, "processed");
        }
    }

    let dropped = (input.duration() as usize).saturating_sub(frames * config.num_frames());
    if dropped > 0 {
        tracing::warn!(dropped, "trailing partial frame dropped");
    }

    output.finalize()?;
    for band_output in band_outputs {
        band_output.finalize()?;
    }

    tracing::info!(
        frames,
        seconds = frames as f32 / 100.0,
        output = %args.output.display(),
        "done"
    );
    Ok(())
}
