//! Two-band QMF analysis and synthesis built on [`AllPassCascade`].
//!
//! Ported from `common_audio/signal_processing/splitting_filter.c`.

use super::all_pass_qmf::{ALL_PASS_FILTER_1, ALL_PASS_FILTER_2, AllPassCascade};
use super::sat_w32_to_w16;

/// Longest supported band: 10 ms at 64 kHz.
pub const MAX_BAND_FRAME_LENGTH: usize = 320;

/// Q0 -> Q10.
const Q10_SCALE: i32 = 1 << 10;

/// Splits a full-band S16 signal into a low and a high band at half the rate.
///
/// Odd input samples run through [`ALL_PASS_FILTER_1`], even samples through
/// [`ALL_PASS_FILTER_2`]; the bands are the halved sum and difference of the
/// two branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QmfAnalysis {
    odd: AllPassCascade,
    even: AllPassCascade,
}

impl Default for QmfAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl QmfAnalysis {
    pub const fn new() -> Self {
        Self {
            odd: AllPassCascade::new(ALL_PASS_FILTER_1),
            even: AllPassCascade::new(ALL_PASS_FILTER_2),
        }
    }

    /// Splits `in_data` into `low_band` and `high_band`.
    ///
    /// # Panics
    ///
    /// Panics if `in_data` has odd length, if a band would exceed
    /// [`MAX_BAND_FRAME_LENGTH`], or if the band slices are not half the
    /// input length.
    pub fn process(&mut self, in_data: &[i16], low_band: &mut [i16], high_band: &mut [i16]) {
        assert!(
            in_data.len().is_multiple_of(2),
            "full-band length ({}) must be even",
            in_data.len()
        );
        let band_length = in_data.len() / 2;
        assert!(
            band_length <= MAX_BAND_FRAME_LENGTH,
            "band length ({band_length}) exceeds {MAX_BAND_FRAME_LENGTH}"
        );
        assert_eq!(low_band.len(), band_length, "low band length mismatch");
        assert_eq!(high_band.len(), band_length, "high band length mismatch");

        let mut half_in1 = [0i32; MAX_BAND_FRAME_LENGTH];
        let mut half_in2 = [0i32; MAX_BAND_FRAME_LENGTH];
        let mut filter1 = [0i32; MAX_BAND_FRAME_LENGTH];
        let mut filter2 = [0i32; MAX_BAND_FRAME_LENGTH];

        for (i, pair) in in_data.chunks_exact(2).enumerate() {
            half_in2[i] = i32::from(pair[0]) * Q10_SCALE;
            half_in1[i] = i32::from(pair[1]) * Q10_SCALE;
        }

        // The two branches are independent.
        self.odd
            .filter(&mut half_in1[..band_length], &mut filter1[..band_length]);
        self.even
            .filter(&mut half_in2[..band_length], &mut filter2[..band_length]);

        for i in 0..band_length {
            let tmp = filter1[i].saturating_add(filter2[i]).saturating_add(1024) >> 11;
            low_band[i] = sat_w32_to_w16(tmp);

            let tmp = filter1[i].saturating_sub(filter2[i]).saturating_add(1024) >> 11;
            high_band[i] = sat_w32_to_w16(tmp);
        }
    }
}

/// Merges a low and a high band back into one full-band S16 signal.
///
/// The sum channel runs through [`ALL_PASS_FILTER_2`] and the difference
/// channel through [`ALL_PASS_FILTER_1`], the reverse of [`QmfAnalysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QmfSynthesis {
    sum: AllPassCascade,
    difference: AllPassCascade,
}

impl Default for QmfSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

impl QmfSynthesis {
    pub const fn new() -> Self {
        Self {
            sum: AllPassCascade::new(ALL_PASS_FILTER_2),
            difference: AllPassCascade::new(ALL_PASS_FILTER_1),
        }
    }

    /// Merges `low_band` and `high_band` into `out_data`.
    ///
    /// # Panics
    ///
    /// Panics if the bands differ in length, exceed
    /// [`MAX_BAND_FRAME_LENGTH`], or `out_data` is not twice the band length.
    pub fn process(&mut self, low_band: &[i16], high_band: &[i16], out_data: &mut [i16]) {
        let band_length = low_band.len();
        assert_eq!(high_band.len(), band_length, "high band length mismatch");
        assert!(
            band_length <= MAX_BAND_FRAME_LENGTH,
            "band length ({band_length}) exceeds {MAX_BAND_FRAME_LENGTH}"
        );
        assert_eq!(
            out_data.len(),
            2 * band_length,
            "full-band length mismatch"
        );

        let mut half_in1 = [0i32; MAX_BAND_FRAME_LENGTH];
        let mut half_in2 = [0i32; MAX_BAND_FRAME_LENGTH];
        let mut filter1 = [0i32; MAX_BAND_FRAME_LENGTH];
        let mut filter2 = [0i32; MAX_BAND_FRAME_LENGTH];

        for (i, (&low, &high)) in low_band.iter().zip(high_band).enumerate() {
            half_in1[i] = (i32::from(low) + i32::from(high)) * Q10_SCALE;
            half_in2[i] = (i32::from(low) - i32::from(high)) * Q10_SCALE;
        }

        self.sum
            .filter(&mut half_in1[..band_length], &mut filter1[..band_length]);
        self.difference
            .filter(&mut half_in2[..band_length], &mut filter2[..band_length]);

        // Q10 back to Q0. The difference branch carries the even samples.
        for (i, pair) in out_data.chunks_exact_mut(2).enumerate() {
            pair[0] = sat_w32_to_w16(filter2[i].saturating_add(512) >> 10);
            pair[1] = sat_w32_to_w16(filter1[i].saturating_add(512) >> 10);
        }
    }
}
