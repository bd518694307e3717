//! Three-band filter bank for 48 kHz frames.
//!
//! A 480-sample frame is decimated by 3 into 10 polyphase components, each
//! filtered by a 4-tap FIR with stride 4, then DCT-modulated into three
//! 160-sample bands (0–8, 8–16, 16–24 kHz). Synthesis runs the same steps in
//! reverse. Two of the 12 polyphase filters are identically zero and skipped.
//!
//! Ported from `modules/audio_processing/three_band_filter_bank.cc`.

/// Bands produced per frame.
pub const NUM_BANDS: usize = 3;
/// Full-band frame length: 10 ms at 48 kHz.
pub const FULL_BAND_SIZE: usize = 480;
/// Samples per band.
pub const SPLIT_BAND_SIZE: usize = FULL_BAND_SIZE / NUM_BANDS;

const SUB_SAMPLING: usize = NUM_BANDS;
const SPARSITY: usize = 4;
const STRIDE_LOG2: usize = 2;
const STRIDE: usize = 1 << STRIDE_LOG2;
const FILTER_SIZE: usize = 4;
const MEMORY_SIZE: usize = FILTER_SIZE * STRIDE - 1;

const NUM_ZERO_FILTERS: usize = 2;
const NUM_NON_ZERO_FILTERS: usize = SPARSITY * NUM_BANDS - NUM_ZERO_FILTERS;
const ZERO_FILTER_INDEX_1: usize = 3;
const ZERO_FILTER_INDEX_2: usize = 9;

const SQRT_3: f32 = 1.732_050_8;

#[rustfmt::skip]
const FILTER_COEFFS: [[f32; FILTER_SIZE]; NUM_NON_ZERO_FILTERS] = [
    [-0.00047749, -0.00496888, 0.16547118,  0.00425496],
    [-0.00173287, -0.01585778, 0.14989004,  0.00994113],
    [-0.00304815, -0.02536082, 0.12154542,  0.01157993],
    [-0.00346946, -0.02587886, 0.04760441,  0.00607594],
    [-0.00154717, -0.01136076, 0.01387458,  0.00186353],
    [ 0.00186353,  0.01387458,-0.01136076, -0.00154717],
    [ 0.00607594,  0.04760441,-0.02587886, -0.00346946],
    [ 0.00983212,  0.08543175,-0.02982767, -0.00383509],
    [ 0.00994113,  0.14989004,-0.01585778, -0.00173287],
    [ 0.00425496,  0.16547118,-0.00496888, -0.00047749],
];

#[rustfmt::skip]
const DCT_MODULATION: [[f32; NUM_BANDS]; NUM_NON_ZERO_FILTERS] = [
    [ 2.0,     2.0,    2.0],
    [ SQRT_3,  0.0,   -SQRT_3],
    [ 1.0,    -2.0,    1.0],
    [-1.0,     2.0,   -1.0],
    [-SQRT_3,  0.0,    SQRT_3],
    [-2.0,    -2.0,   -2.0],
    [-SQRT_3,  0.0,    SQRT_3],
    [-1.0,     2.0,   -1.0],
    [ 1.0,    -2.0,    1.0],
    [ SQRT_3,  0.0,   -SQRT_3],
];

/// Maps a polyphase index in `0..SPARSITY * NUM_BANDS` to its row in
/// [`FILTER_COEFFS`], or `None` for the two all-zero filters.
fn non_zero_filter_index(index: usize) -> Option<usize> {
    match index {
        ZERO_FILTER_INDEX_1 | ZERO_FILTER_INDEX_2 => None,
        i if i < ZERO_FILTER_INDEX_1 => Some(i),
        i if i < ZERO_FILTER_INDEX_2 => Some(i - 1),
        i => Some(i - 2),
    }
}

/// Sparse FIR: `output[k] = sum_i filter[i] * x[k - in_shift - i * STRIDE]`,
/// where negative positions come from `state` (the tail of the previous
/// input). `state` is refreshed from the end of `input`.
fn filter_core(
    filter: &[f32; FILTER_SIZE],
    input: &[f32; SPLIT_BAND_SIZE],
    in_shift: usize,
    output: &mut [f32; SPLIT_BAND_SIZE],
    state: &mut [f32; MEMORY_SIZE],
) {
    debug_assert!(in_shift < STRIDE);
    output.fill(0.0);

    // Outputs that only see the previous frame.
    for k in 0..in_shift {
        let mut j = MEMORY_SIZE + k - in_shift;
        for &tap in filter {
            output[k] += state[j] * tap;
            j = j.wrapping_sub(STRIDE);
        }
    }

    // Outputs straddling the frame boundary.
    for (shift, k) in (in_shift..FILTER_SIZE * STRIDE).enumerate() {
        let loop_limit = (1 + (shift >> STRIDE_LOG2)).min(FILTER_SIZE);
        for (i, &tap) in filter.iter().enumerate().take(loop_limit) {
            output[k] += input[shift - i * STRIDE] * tap;
        }
        for (i, &tap) in filter.iter().enumerate().skip(loop_limit) {
            output[k] += state[MEMORY_SIZE + shift - i * STRIDE] * tap;
        }
    }

    // Outputs entirely inside the current frame.
    let first_shift = FILTER_SIZE * STRIDE - in_shift;
    for (shift, k) in (first_shift..).zip(FILTER_SIZE * STRIDE..SPLIT_BAND_SIZE) {
        for (i, &tap) in filter.iter().enumerate() {
            output[k] += input[shift - i * STRIDE] * tap;
        }
    }

    state.copy_from_slice(&input[SPLIT_BAND_SIZE - MEMORY_SIZE..]);
}

/// Per-channel analysis and synthesis state of the three-band bank.
#[derive(derive_more::Debug, Clone)]
pub struct ThreeBandFilterBank {
    #[debug(skip)]
    state_analysis: [[f32; MEMORY_SIZE]; NUM_NON_ZERO_FILTERS],
    #[debug(skip)]
    state_synthesis: [[f32; MEMORY_SIZE]; NUM_NON_ZERO_FILTERS],
}

impl Default for ThreeBandFilterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreeBandFilterBank {
    pub fn new() -> Self {
        Self {
            state_analysis: [[0.0; MEMORY_SIZE]; NUM_NON_ZERO_FILTERS],
            state_synthesis: [[0.0; MEMORY_SIZE]; NUM_NON_ZERO_FILTERS],
        }
    }

    /// Splits one 480-sample frame into three 160-sample bands.
    ///
    /// # Panics
    ///
    /// Panics if `input` is not [`FULL_BAND_SIZE`] long.
    pub fn analysis(&mut self, input: &[f32], output: &mut [[f32; SPLIT_BAND_SIZE]; NUM_BANDS]) {
        assert_eq!(input.len(), FULL_BAND_SIZE, "full-band length mismatch");
        for band in output.iter_mut() {
            band.fill(0.0);
        }

        for downsampling_index in 0..SUB_SAMPLING {
            // Polyphase component, newest phase first.
            let mut in_subsampled = [0.0f32; SPLIT_BAND_SIZE];
            for (k, sample) in in_subsampled.iter_mut().enumerate() {
                *sample = input[(SUB_SAMPLING - 1) - downsampling_index + SUB_SAMPLING * k];
            }

            for in_shift in 0..STRIDE {
                let Some(filter_index) =
                    non_zero_filter_index(downsampling_index + in_shift * SUB_SAMPLING)
                else {
                    continue;
                };

                let mut out_subsampled = [0.0f32; SPLIT_BAND_SIZE];
                filter_core(
                    &FILTER_COEFFS[filter_index],
                    &in_subsampled,
                    in_shift,
                    &mut out_subsampled,
                    &mut self.state_analysis[filter_index],
                );

                for (band, &modulation) in output.iter_mut().zip(&DCT_MODULATION[filter_index]) {
                    for (out, &filtered) in band.iter_mut().zip(&out_subsampled) {
                        *out += modulation * filtered;
                    }
                }
            }
        }
    }

    /// Merges three 160-sample bands into one 480-sample frame.
    ///
    /// # Panics
    ///
    /// Panics if `output` is not [`FULL_BAND_SIZE`] long.
    pub fn synthesis(&mut self, input: &[[f32; SPLIT_BAND_SIZE]; NUM_BANDS], output: &mut [f32]) {
        assert_eq!(output.len(), FULL_BAND_SIZE, "full-band length mismatch");
        output.fill(0.0);

        for upsampling_index in 0..SUB_SAMPLING {
            for in_shift in 0..STRIDE {
                let Some(filter_index) =
                    non_zero_filter_index(upsampling_index + in_shift * SUB_SAMPLING)
                else {
                    continue;
                };

                let mut in_subsampled = [0.0f32; SPLIT_BAND_SIZE];
                for (band, &modulation) in input.iter().zip(&DCT_MODULATION[filter_index]) {
                    for (sample, &value) in in_subsampled.iter_mut().zip(band) {
                        *sample += modulation * value;
                    }
                }

                let mut out_subsampled = [0.0f32; SPLIT_BAND_SIZE];
                filter_core(
                    &FILTER_COEFFS[filter_index],
                    &in_subsampled,
                    in_shift,
                    &mut out_subsampled,
                    &mut self.state_synthesis[filter_index],
                );

                // Upsample with gain to undo the decimation.
                for (k, &filtered) in out_subsampled.iter().enumerate() {
                    output[upsampling_index + SUB_SAMPLING * k] += SUB_SAMPLING as f32 * filtered;
                }
            }
        }
    }
}
