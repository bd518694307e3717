//! Frame buffer that owns the full-band samples of a stream, their sub-band
//! split and the splitting filter between the two.
//!
//! Samples are stored as FloatS16. Interleaved S16 and deinterleaved `[-1, 1]`
//! float frames are converted on the way in and out.
//!
//! Ported from `modules/audio_processing/audio_buffer.h/cc`, without
//! resampling or downmixing: the buffer always runs at the stream's rate and
//! channel count.

use webrtc_common_audio::audio_util;
use webrtc_common_audio::channel_buffer::ChannelBuffer;

use crate::error::Result;
use crate::splitting_filter::SplittingFilter;
use crate::stream_config::StreamConfig;

/// One 10 ms frame of a stream, full-band and split.
#[derive(derive_more::Debug)]
pub struct AudioBuffer {
    config: StreamConfig,
    num_bands: usize,
    num_split_frames: usize,

    #[debug(skip)]
    data: ChannelBuffer<f32>,
    #[debug(skip)]
    split_data: Option<ChannelBuffer<f32>>,
    splitting_filter: Option<SplittingFilter>,
    #[debug(skip)]
    interleaved: Vec<f32>,
}

impl AudioBuffer {
    /// Creates a zeroed buffer for `config`.
    ///
    /// Streams at 32 and 48 kHz get a splitting filter; 8 and 16 kHz streams
    /// stay single-band.
    pub fn new(config: StreamConfig) -> Result<Self> {
        config.validate()?;

        let num_frames = config.num_frames();
        let num_channels = config.num_channels();
        let num_bands = config.num_bands();
        let (split_data, splitting_filter) = if num_bands > 1 {
            (
                Some(ChannelBuffer::new(num_frames, num_channels, num_bands)),
                Some(SplittingFilter::new(num_channels, num_bands, num_frames)),
            )
        } else {
            (None, None)
        };

        tracing::debug!(
            sample_rate_hz = config.sample_rate_hz(),
            num_channels,
            num_bands,
            "created audio buffer"
        );

        Ok(Self {
            config,
            num_bands,
            num_split_frames: num_frames / num_bands,
            data: ChannelBuffer::new_single_band(num_frames, num_channels),
            split_data,
            splitting_filter,
            interleaved: vec![0.0; config.num_samples()],
        })
    }

    #[inline]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.config.num_channels()
    }

    /// Full-band samples per channel.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.config.num_frames()
    }

    #[inline]
    pub fn num_frames_per_band(&self) -> usize {
        self.num_split_frames
    }

    #[inline]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Full-band FloatS16 samples of `channel`.
    #[inline]
    pub fn channel(&self, channel: usize) -> &[f32] {
        self.data.bands(channel)
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        self.data.bands_mut(channel)
    }

    /// One sub-band of `channel`. A single-band buffer only has band 0, which
    /// is the full-band signal.
    pub fn split_band(&self, channel: usize, band: usize) -> &[f32] {
        match &self.split_data {
            Some(split) => split.channel(band, channel),
            None => self.data.channel(band, channel),
        }
    }

    pub fn split_band_mut(&mut self, channel: usize, band: usize) -> &mut [f32] {
        match &mut self.split_data {
            Some(split) => split.channel_mut(band, channel),
            None => self.data.channel_mut(band, channel),
        }
    }

    /// Copies one interleaved S16 frame in.
    ///
    /// # Panics
    ///
    /// Panics if `interleaved` is not `num_frames * num_channels` long.
    pub fn copy_from_interleaved_i16(&mut self, interleaved: &[i16]) {
        assert_eq!(
            interleaved.len(),
            self.config.num_samples(),
            "interleaved frame length mismatch"
        );
        audio_util::s16_to_float_s16_slice(interleaved, &mut self.interleaved);
        let num_frames = self.num_frames();
        let mut channels: Vec<&mut [f32]> =
            self.data.data_mut().chunks_exact_mut(num_frames).collect();
        audio_util::deinterleave(&self.interleaved, &mut channels);
    }

    /// Copies the full-band frame out as interleaved S16, rounding and
    /// clamping.
    ///
    /// # Panics
    ///
    /// Panics if `interleaved` is not `num_frames * num_channels` long.
    pub fn copy_to_interleaved_i16(&mut self, interleaved: &mut [i16]) {
        assert_eq!(
            interleaved.len(),
            self.config.num_samples(),
            "interleaved frame length mismatch"
        );
        let num_frames = self.num_frames();
        let channels: Vec<&[f32]> = self.data.data().chunks_exact(num_frames).collect();
        audio_util::interleave(&channels, &mut self.interleaved);
        audio_util::float_s16_to_s16_slice(&self.interleaved, interleaved);
    }

    /// Copies sub-band `band` of every channel out as interleaved S16. On a
    /// single-band buffer band 0 is the full-band frame.
    ///
    /// # Panics
    ///
    /// Panics if `band` is out of range or `interleaved` is not
    /// `num_frames_per_band * num_channels` long.
    pub fn copy_band_to_interleaved_i16(&mut self, band: usize, interleaved: &mut [i16]) {
        assert!(band < self.num_bands, "band {band} out of range");
        assert_eq!(
            interleaved.len(),
            self.num_split_frames * self.num_channels(),
            "interleaved band length mismatch"
        );
        let channels: Vec<&[f32]> = match &self.split_data {
            Some(split) => (0..self.config.num_channels())
                .map(|ch| split.channel(band, ch))
                .collect(),
            None => (0..self.config.num_channels())
                .map(|ch| self.data.channel(band, ch))
                .collect(),
        };
        let scratch = &mut self.interleaved[..interleaved.len()];
        audio_util::interleave(&channels, scratch);
        audio_util::float_s16_to_s16_slice(scratch, interleaved);
    }

    /// Copies one deinterleaved `[-1, 1]` float frame in.
    ///
    /// # Panics
    ///
    /// Panics unless there is one slice per channel, each `num_frames` long.
    pub fn copy_from_float(&mut self, stacked_data: &[&[f32]]) {
        assert_eq!(stacked_data.len(), self.num_channels(), "channel count mismatch");
        for (ch, src) in stacked_data.iter().enumerate() {
            audio_util::float_to_float_s16_slice(src, self.data.bands_mut(ch));
        }
    }

    /// Copies the full-band frame out as deinterleaved `[-1, 1]` floats.
    ///
    /// # Panics
    ///
    /// Panics unless there is one slice per channel, each `num_frames` long.
    pub fn copy_to_float(&self, stacked_data: &mut [&mut [f32]]) {
        assert_eq!(stacked_data.len(), self.num_channels(), "channel count mismatch");
        for (ch, dest) in stacked_data.iter_mut().enumerate() {
            audio_util::float_s16_to_float_slice(self.data.bands(ch), dest);
        }
    }

    /// Runs the splitting filter over the full-band frame. Single-band
    /// buffers are left alone.
    pub fn split_into_frequency_bands(&mut self) {
        if let (Some(filter), Some(split)) = (&mut self.splitting_filter, &mut self.split_data) {
            filter.analysis(&self.data, split);
        }
    }

    /// Rebuilds the full-band frame from the sub-bands. Single-band buffers
    /// are left alone.
    pub fn merge_frequency_bands(&mut self) {
        if let (Some(filter), Some(split)) = (&mut self.splitting_filter, &mut self.split_data) {
            filter.synthesis(split, &mut self.data);
        }
    }
}
