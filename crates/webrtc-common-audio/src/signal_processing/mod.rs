//! Fixed-point signal processing routines.
//!
//! Ported from `common_audio/signal_processing`: the saturating arithmetic
//! helpers of `signal_processing_library.h` and the all-pass based two-band
//! QMF of `splitting_filter.c`.

mod all_pass_qmf;
mod splitting_filter;

pub use all_pass_qmf::{ALL_PASS_FILTER_1, ALL_PASS_FILTER_2, ALL_PASS_STATE_SIZE, AllPassCascade};
pub use splitting_filter::{MAX_BAND_FRAME_LENGTH, QmfAnalysis, QmfSynthesis};

/// `a - b`, clamped to the `i32` range instead of wrapping.
#[inline]
pub fn sub_sat_w32(a: i32, b: i32) -> i32 {
    a.saturating_sub(b)
}

/// Narrows a wide sample to `i16`, clamping on overflow.
#[inline]
pub fn sat_w32_to_w16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// `c + ((a * b) >> 16)` with a 64-bit product.
///
/// `a` is an unsigned Q16 coefficient. The final add saturates rather than
/// wraps.
#[inline]
pub fn scale_diff32(a: u16, b: i32, c: i32) -> i32 {
    let scaled = (i64::from(a) * i64::from(b)) >> 16;
    (i64::from(c) + scaled).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
