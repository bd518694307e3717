//! Band-splitting filter for 2-band (32 kHz) and 3-band (48 kHz) operation.
//!
//! Splits a full-band frame into sub-band frames:
//! - **2-band** (32 kHz → 2 × 160 samples): fixed-point all-pass QMF, run on
//!   S16 samples converted from the FloatS16 buffers
//! - **3-band** (48 kHz → 3 × 160 samples): FIR filter bank with DCT modulation
//!
//! Ported from `modules/audio_processing/splitting_filter.h/cc`.

use webrtc_common_audio::{
    audio_util::{float_s16_to_s16_slice, s16_to_float_s16_slice},
    channel_buffer::ChannelBuffer,
    signal_processing::{QmfAnalysis, QmfSynthesis},
};

use crate::three_band_filter_bank::{
    FULL_BAND_SIZE, NUM_BANDS, SPLIT_BAND_SIZE, ThreeBandFilterBank,
};

/// Full-band frame length of the 2-band split: 10 ms at 32 kHz.
pub const TWO_BAND_FILTER_SAMPLES_PER_FRAME: usize = 320;
const SAMPLES_PER_BAND: usize = TWO_BAND_FILTER_SAMPLES_PER_FRAME / 2;

/// QMF state of one channel.
#[derive(Debug, Clone, Default)]
struct TwoBandsStates {
    analysis: QmfAnalysis,
    synthesis: QmfSynthesis,
}

#[derive(derive_more::Debug)]
enum FilterState {
    TwoBand(#[debug(skip)] Vec<TwoBandsStates>),
    ThreeBand(#[debug(skip)] Vec<ThreeBandFilterBank>),
}

/// Band-splitting filter supporting 2-band and 3-band operation.
///
/// For each frame, call [`analysis`](Self::analysis) to split into bands, then
/// [`synthesis`](Self::synthesis) to merge them back. Every channel keeps its
/// own filter memory, which only moves forward with calls.
#[derive(Debug)]
pub struct SplittingFilter {
    num_bands: usize,
    num_channels: usize,
    num_frames: usize,
    state: FilterState,
}

impl SplittingFilter {
    /// Creates a filter for `num_channels` channels.
    ///
    /// # Panics
    ///
    /// Panics unless `num_bands` is 2 with `num_frames == 320`, or 3 with
    /// `num_frames == 480`.
    pub fn new(num_channels: usize, num_bands: usize, num_frames: usize) -> Self {
        assert!(num_bands == 2 || num_bands == 3, "num_bands must be 2 or 3, got {num_bands}");
        let state = if num_bands == 2 {
            assert_eq!(
                num_frames, TWO_BAND_FILTER_SAMPLES_PER_FRAME,
                "2-band splitting needs {TWO_BAND_FILTER_SAMPLES_PER_FRAME} frames"
            );
            FilterState::TwoBand(vec![TwoBandsStates::default(); num_channels])
        } else {
            assert_eq!(
                num_frames, FULL_BAND_SIZE,
                "3-band splitting needs {FULL_BAND_SIZE} frames"
            );
            FilterState::ThreeBand(vec![ThreeBandFilterBank::new(); num_channels])
        };
        tracing::debug!(num_channels, num_bands, num_frames, "created splitting filter");
        Self {
            num_bands,
            num_channels,
            num_frames,
            state,
        }
    }

    #[inline]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Full-band samples per channel and frame.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn check_shapes(&self, full_band: &ChannelBuffer<f32>, bands: &ChannelBuffer<f32>) {
        assert_eq!(bands.num_bands(), self.num_bands, "band count mismatch");
        assert_eq!(
            full_band.num_channels(),
            bands.num_channels(),
            "channel count mismatch between full-band and split buffers"
        );
        assert_eq!(
            full_band.num_frames(),
            bands.num_frames_per_band() * bands.num_bands(),
            "split buffer does not tile the full-band frame"
        );
        assert_eq!(full_band.num_frames(), self.num_frames, "frame length mismatch");
    }

    /// Splits every channel of `data` into `bands`.
    ///
    /// # Panics
    ///
    /// Panics if the buffers do not match the filter's band count, frame
    /// length and channel count. Nothing is filtered in that case.
    pub fn analysis(&mut self, data: &ChannelBuffer<f32>, bands: &mut ChannelBuffer<f32>) {
        self.check_shapes(data, bands);
        assert_eq!(
            data.num_channels(),
            self.num_channels,
            "analysis needs exactly {} channels",
            self.num_channels
        );
        match &mut self.state {
            FilterState::TwoBand(states) => two_bands_analysis(states, data, bands),
            FilterState::ThreeBand(banks) => three_bands_analysis(banks, data, bands),
        }
    }

    /// Merges `bands` back into every channel of `data`.
    ///
    /// # Panics
    ///
    /// Panics if the buffers do not match the filter's band count or frame
    /// length, or carry more channels than the filter was built for.
    pub fn synthesis(&mut self, bands: &ChannelBuffer<f32>, data: &mut ChannelBuffer<f32>) {
        self.check_shapes(data, bands);
        assert!(
            data.num_channels() <= self.num_channels,
            "synthesis got {} channels, filter has {}",
            data.num_channels(),
            self.num_channels
        );
        match &mut self.state {
            FilterState::TwoBand(states) => two_bands_synthesis(states, bands, data),
            FilterState::ThreeBand(banks) => three_bands_synthesis(banks, bands, data),
        }
    }
}

fn two_bands_analysis(
    states: &mut [TwoBandsStates],
    data: &ChannelBuffer<f32>,
    bands: &mut ChannelBuffer<f32>,
) {
    for (ch, state) in states.iter_mut().enumerate().take(data.num_channels()) {
        let mut full_band = [0i16; TWO_BAND_FILTER_SAMPLES_PER_FRAME];
        let mut low_band = [0i16; SAMPLES_PER_BAND];
        let mut high_band = [0i16; SAMPLES_PER_BAND];

        float_s16_to_s16_slice(data.bands(ch), &mut full_band);
        state.analysis.process(&full_band, &mut low_band, &mut high_band);
        s16_to_float_s16_slice(&low_band, bands.channel_mut(0, ch));
        s16_to_float_s16_slice(&high_band, bands.channel_mut(1, ch));
    }
}

fn two_bands_synthesis(
    states: &mut [TwoBandsStates],
    bands: &ChannelBuffer<f32>,
    data: &mut ChannelBuffer<f32>,
) {
    for (ch, state) in states.iter_mut().enumerate().take(data.num_channels()) {
        let mut low_band = [0i16; SAMPLES_PER_BAND];
        let mut high_band = [0i16; SAMPLES_PER_BAND];
        let mut full_band = [0i16; TWO_BAND_FILTER_SAMPLES_PER_FRAME];

        float_s16_to_s16_slice(bands.channel(0, ch), &mut low_band);
        float_s16_to_s16_slice(bands.channel(1, ch), &mut high_band);
        state.synthesis.process(&low_band, &high_band, &mut full_band);
        s16_to_float_s16_slice(&full_band, data.bands_mut(ch));
    }
}

fn three_bands_analysis(
    banks: &mut [ThreeBandFilterBank],
    data: &ChannelBuffer<f32>,
    bands: &mut ChannelBuffer<f32>,
) {
    for (ch, bank) in banks.iter_mut().enumerate().take(data.num_channels()) {
        let mut output = [[0.0f32; SPLIT_BAND_SIZE]; NUM_BANDS];
        bank.analysis(data.bands(ch), &mut output);
        for (band, samples) in output.iter().enumerate() {
            bands.channel_mut(band, ch).copy_from_slice(samples);
        }
    }
}

fn three_bands_synthesis(
    banks: &mut [ThreeBandFilterBank],
    bands: &ChannelBuffer<f32>,
    data: &mut ChannelBuffer<f32>,
) {
    for (ch, bank) in banks.iter_mut().enumerate().take(data.num_channels()) {
        let mut input = [[0.0f32; SPLIT_BAND_SIZE]; NUM_BANDS];
        for (band, samples) in input.iter_mut().enumerate() {
            samples.copy_from_slice(bands.channel(band, ch));
        }
        bank.synthesis(&input, data.bands_mut(ch));
    }
}
