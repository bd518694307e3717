//! Common audio building blocks for the band-splitting filter bank.
//!
//! Contains the multi-band channel buffer, S16/FloatS16 sample conversions
//! and the fixed-point signal processing routines behind the two-band QMF.

pub mod audio_util;
pub mod channel_buffer;
pub mod signal_processing;
