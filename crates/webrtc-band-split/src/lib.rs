//! Band-splitting filter bank for 10 ms audio frames.
//!
//! Splits 32 kHz frames into two 16 kHz bands with a fixed-point all-pass
//! QMF, and 48 kHz frames into three 16 kHz bands with a DCT-modulated FIR
//! bank. [`SplittingFilter`] keeps per-channel filter state across calls;
//! [`AudioBuffer`] wraps it together with the full-band and split-band
//! buffers for interleaved S16 or deinterleaved float input.

mod audio_buffer;
mod error;
mod splitting_filter;
mod stream_config;
mod three_band_filter_bank;

pub use audio_buffer::AudioBuffer;
pub use error::Error;
pub use splitting_filter::{SplittingFilter, TWO_BAND_FILTER_SAMPLES_PER_FRAME};
pub use stream_config::StreamConfig;
pub use three_band_filter_bank::{FULL_BAND_SIZE, NUM_BANDS, SPLIT_BAND_SIZE, ThreeBandFilterBank};
pub use webrtc_common_audio::channel_buffer::ChannelBuffer;
