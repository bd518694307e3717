//! Sample format conversions matching WebRTC's `audio_util.h`.
//!
//! | Name      | Type    | Range                          |
//! |-----------|---------|--------------------------------|
//! | S16       | `i16`   | \[-32768, 32767\]              |
//! | Float     | `f32`   | \[-1.0, 1.0\]                  |
//! | FloatS16  | `f32`   | \[-32768.0, 32768.0\]          |
//!
//! The splitting filter works on FloatS16 buffers and narrows to S16 around
//! the fixed-point QMF.

const S16_TO_FLOAT_SCALING: f32 = 1.0 / 32768.0;

/// Widens an S16 sample to FloatS16. Exact.
#[inline]
pub fn s16_to_float_s16(v: i16) -> f32 {
    f32::from(v)
}

/// Narrows a FloatS16 sample to S16, clamping and rounding half away from zero.
#[inline]
pub fn float_s16_to_s16(v: f32) -> i16 {
    let v = v.clamp(-32768.0, 32767.0);
    (v + f32::copysign(0.5, v)) as i16
}

/// Float \[-1, 1\] to FloatS16.
#[inline]
pub fn float_to_float_s16(v: f32) -> f32 {
    v.clamp(-1.0, 1.0) * 32768.0
}

/// FloatS16 to Float \[-1, 1\].
#[inline]
pub fn float_s16_to_float(v: f32) -> f32 {
    v.clamp(-32768.0, 32768.0) * S16_TO_FLOAT_SCALING
}

/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn s16_to_float_s16_slice(src: &[i16], dest: &mut [f32]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = s16_to_float_s16(s);
    }
}

/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn float_s16_to_s16_slice(src: &[f32], dest: &mut [i16]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = float_s16_to_s16(s);
    }
}

/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn float_to_float_s16_slice(src: &[f32], dest: &mut [f32]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = float_to_float_s16(s);
    }
}

/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn float_s16_to_float_slice(src: &[f32], dest: &mut [f32]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = float_s16_to_float(s);
    }
}

/// Splits interleaved frames into one slice per channel.
///
/// # Panics
///
/// Panics if `interleaved` is not `num_channels * samples_per_channel` long,
/// where `num_channels = deinterleaved.len()` and `samples_per_channel` is
/// the length of each destination.
pub fn deinterleave<T: Copy>(interleaved: &[T], deinterleaved: &mut [&mut [T]]) {
    let num_channels = deinterleaved.len();
    assert!(num_channels > 0, "num_channels must be > 0");
    let samples_per_channel = deinterleaved[0].len();
    assert_eq!(
        interleaved.len(),
        samples_per_channel * num_channels,
        "interleaved length mismatch"
    );
    for (ch, dest) in deinterleaved.iter_mut().enumerate() {
        assert_eq!(dest.len(), samples_per_channel, "channel {ch} length mismatch");
        for (slot, frame) in dest.iter_mut().zip(interleaved.chunks_exact(num_channels)) {
            *slot = frame[ch];
        }
    }
}

/// Inverse of [`deinterleave`].
///
/// # Panics
///
/// Panics on the same length mismatches as [`deinterleave`].
pub fn interleave<T: Copy>(deinterleaved: &[&[T]], interleaved: &mut [T]) {
    let num_channels = deinterleaved.len();
    assert!(num_channels > 0, "num_channels must be > 0");
    let samples_per_channel = deinterleaved[0].len();
    assert_eq!(
        interleaved.len(),
        samples_per_channel * num_channels,
        "interleaved length mismatch"
    );
    for (ch, src) in deinterleaved.iter().enumerate() {
        assert_eq!(src.len(), samples_per_channel, "channel {ch} length mismatch");
        for (frame, &sample) in interleaved.chunks_exact_mut(num_channels).zip(src.iter()) {
            frame[ch] = sample;
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn float_s16_to_s16_rounds_half_away_from_zero() {
        assert_eq!(float_s16_to_s16(0.0), 0);
        assert_eq!(float_s16_to_s16(0.4), 0);
        assert_eq!(float_s16_to_s16(0.5), 1);
        assert_eq!(float_s16_to_s16(-0.5), -1);
        assert_eq!(float_s16_to_s16(-1.4), -1);
        assert_eq!(float_s16_to_s16(1234.6), 1235);
    }

    #[test]
    fn float_s16_to_s16_clamps() {
        assert_eq!(float_s16_to_s16(32767.4), 32767);
        assert_eq!(float_s16_to_s16(40_000.0), 32767);
        assert_eq!(float_s16_to_s16(-32768.0), -32768);
        assert_eq!(float_s16_to_s16(-1.0e9), -32768);
    }

    #[test]
    fn float_and_float_s16_scales() {
        assert_eq!(float_to_float_s16(0.5), 16384.0);
        assert_eq!(float_to_float_s16(2.0), 32768.0);
        assert_eq!(float_s16_to_float(-16384.0), -0.5);
        assert_eq!(float_s16_to_float(-40_000.0), -1.0);
    }

    #[test]
    fn slice_conversions_match_scalar() {
        let src = [-32768i16, -1, 0, 1, 32767];
        let mut wide = [0.0f32; 5];
        s16_to_float_s16_slice(&src, &mut wide);
        assert_eq!(wide, [-32768.0, -1.0, 0.0, 1.0, 32767.0]);

        let mut narrow = [0i16; 5];
        float_s16_to_s16_slice(&wide, &mut narrow);
        assert_eq!(narrow, src);

        let mut unit = [0.0f32; 5];
        float_s16_to_float_slice(&wide, &mut unit);
        let mut back = [0.0f32; 5];
        float_to_float_s16_slice(&unit, &mut back);
        assert_eq!(back, wide);
    }

    #[test]
    #[should_panic(expected = "slice length mismatch")]
    fn slice_length_mismatch_panics() {
        let mut dest = [0i16; 2];
        float_s16_to_s16_slice(&[0.0; 3], &mut dest);
    }

    #[test]
    fn stereo_interleaving_roundtrips() {
        let interleaved = [1, 10, 2, 20, 3, 30];
        let mut left = [0; 3];
        let mut right = [0; 3];
        deinterleave(&interleaved, &mut [&mut left[..], &mut right[..]]);
        assert_eq!(left, [1, 2, 3]);
        assert_eq!(right, [10, 20, 30]);

        let mut out = [0; 6];
        interleave(&[&left[..], &right[..]], &mut out);
        assert_eq!(out, interleaved);
    }

    #[proptest]
    fn s16_roundtrips_through_float_s16(v: i16) {
        prop_assert_eq!(float_s16_to_s16(s16_to_float_s16(v)), v);
    }

    #[proptest]
    fn float_s16_to_s16_is_within_one_unit(#[strategy(-32768.0f32..32767.0)] v: f32) {
        let narrowed = f32::from(float_s16_to_s16(v));
        prop_assert!((narrowed - v).abs() < 1.0);
    }
}
