//! Stream configuration for 10 ms processing.
//!
//! Ported from `StreamConfig` in `api/audio/audio_processing.h`.

use crate::error::{Error, Result};

/// Native rates the splitting filter can run at without resampling.
pub(crate) const NATIVE_SAMPLE_RATES_HZ: [usize; 4] = [8000, 16000, 32000, 48000];

/// Sample rate and channel count of a stream processed in 10 ms chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    sample_rate_hz: usize,
    num_channels: usize,
    num_frames: usize,
}

impl StreamConfig {
    pub fn new(sample_rate_hz: usize, num_channels: usize) -> Self {
        Self {
            sample_rate_hz,
            num_channels,
            num_frames: sample_rate_hz / 100,
        }
    }

    #[inline]
    pub fn sample_rate_hz(&self) -> usize {
        self.sample_rate_hz
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Frames per channel in one 10 ms chunk.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Interleaved samples in one 10 ms chunk.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_channels * self.num_frames
    }

    /// Bands the stream is split into: 2 at 32 kHz, 3 at 48 kHz, otherwise 1.
    pub fn num_bands(&self) -> usize {
        match self.num_frames {
            320 => 2,
            480 => 3,
            _ => 1,
        }
    }

    /// Checks that the stream can be processed without resampling.
    pub fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(Error::BadNumberChannels(self.num_channels));
        }
        if !NATIVE_SAMPLE_RATES_HZ.contains(&self.sample_rate_hz) {
            return Err(Error::BadSampleRate(self.sample_rate_hz));
        }
        Ok(())
    }
}
