//! Three cascaded first-order all-pass sections in fixed point.
//!
//! ```text
//!         a_3 + q^-1    a_2 + q^-1    a_1 + q^-1
//! y[n] =  -----------   -----------   -----------   x[n]
//!         1 + a_3q^-1   1 + a_2q^-1   1 + a_1q^-1
//! ```
//!
//! Samples are Q10 in `i32`, coefficients are unsigned Q16.

use super::{scale_diff32, sub_sat_w32};

/// Coefficients of the all-pass cascade applied to odd input samples during
/// analysis and to the difference channel during synthesis.
pub const ALL_PASS_FILTER_1: [u16; 3] = [6418, 36982, 57261];

/// Coefficients of the all-pass cascade applied to even input samples during
/// analysis and to the sum channel during synthesis.
pub const ALL_PASS_FILTER_2: [u16; 3] = [21333, 49062, 63010];

/// Words of state per cascade: (x[-1], y[-1]) for each of the three sections.
pub const ALL_PASS_STATE_SIZE: usize = 6;

/// A fixed-coefficient all-pass cascade together with its streaming state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllPassCascade {
    coefficients: [u16; 3],
    state: [i32; ALL_PASS_STATE_SIZE],
}

impl AllPassCascade {
    /// Creates a cascade with zeroed state.
    pub const fn new(coefficients: [u16; 3]) -> Self {
        Self {
            coefficients,
            state: [0; ALL_PASS_STATE_SIZE],
        }
    }

    /// The coefficient set this cascade was built with.
    #[inline]
    pub fn coefficients(&self) -> &[u16; 3] {
        &self.coefficients
    }

    /// Current state, laid out as `[x1[-1], y1[-1], x2[-1], y2[-1], x3[-1], y3[-1]]`.
    #[inline]
    pub fn state(&self) -> &[i32; ALL_PASS_STATE_SIZE] {
        &self.state
    }

    /// Filters `in_data` into `out_data`.
    ///
    /// The sections ping-pong between the two buffers, so `in_data` is used as
    /// scratch and holds the second section's output afterwards. An empty
    /// input leaves the state untouched.
    ///
    /// # Panics
    ///
    /// Panics if the two buffers differ in length.
    pub fn filter(&mut self, in_data: &mut [i32], out_data: &mut [i32]) {
        assert_eq!(
            in_data.len(),
            out_data.len(),
            "all-pass input and output lengths differ"
        );
        if in_data.is_empty() {
            return;
        }
        let [a1, a2, a3] = self.coefficients;
        all_pass_section(a1, in_data, out_data, &mut self.state[0..2]);
        all_pass_section(a2, out_data, in_data, &mut self.state[2..4]);
        all_pass_section(a3, in_data, out_data, &mut self.state[4..6]);
    }
}

/// One first-order section: `y[n] = x[n-1] + a * (x[n] - y[n-1])`.
///
/// `state` holds `[x[-1], y[-1]]` on entry and `[x[N-1], y[N-1]]` on exit.
fn all_pass_section(coefficient: u16, input: &[i32], output: &mut [i32], state: &mut [i32]) {
    debug_assert_eq!(state.len(), 2);
    let last = input.len() - 1;

    // Max magnitudes are around 2^25, but saturate anyway.
    let diff = sub_sat_w32(input[0], state[1]);
    output[0] = scale_diff32(coefficient, diff, state[0]);
    for k in 1..input.len() {
        let diff = sub_sat_w32(input[k], output[k - 1]);
        output[k] = scale_diff32(coefficient, diff, input[k - 1]);
    }

    state[0] = input[last];
    state[1] = output[last];
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as pvec;
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    const Q10_MAX: i32 = 32767 << 10;
    const Q10_MIN: i32 = -32768 << 10;

    fn run(cascade: &mut AllPassCascade, input: &[i32]) -> Vec<i32> {
        let mut scratch = input.to_vec();
        let mut out = vec![0; input.len()];
        cascade.filter(&mut scratch, &mut out);
        out
    }

    #[test]
    fn empty_input_leaves_state_untouched() {
        let mut cascade = AllPassCascade::new(ALL_PASS_FILTER_1);
        run(&mut cascade, &[1 << 20, -(1 << 18), 3 << 16]);
        let before = *cascade.state();

        let out = run(&mut cascade, &[]);
        assert!(out.is_empty());
        assert_eq!(*cascade.state(), before);
    }

    #[test]
    fn impulse_response_matches_hand_computed_values() {
        // With a Q16 unit impulse the first output is a3 * (a2 * a1 >> 16) >> 16.
        let mut cascade = AllPassCascade::new(ALL_PASS_FILTER_1);
        let mut input = [0i32; 6];
        input[0] = 1 << 16;
        let out = run(&mut cascade, &input);
        assert_eq!(out, vec![3163, 36681, 42312, -22862, 6519, 2432]);
    }

    #[test]
    fn state_records_last_samples_of_each_section() {
        let mut cascade = AllPassCascade::new(ALL_PASS_FILTER_2);
        let input = [1000 << 10, -2000 << 10, 500 << 10, 0];
        let mut scratch = input;
        let mut out = [0i32; 4];
        cascade.filter(&mut scratch, &mut out);

        let state = cascade.state();
        assert_eq!(state[0], input[3]);
        // Section two wrote into the scratch buffer, section three read it.
        assert_eq!(state[3], scratch[3]);
        assert_eq!(state[4], scratch[3]);
        assert_eq!(state[5], out[3]);
    }

    #[test]
    fn dc_input_settles_to_input_level() {
        let mut cascade = AllPassCascade::new(ALL_PASS_FILTER_2);
        let level = 12_345 << 10;
        for _ in 0..3 {
            run(&mut cascade, &[level; 160]);
        }
        let out = run(&mut cascade, &[level; 160]);
        for &y in &out {
            assert!((y - level).abs() <= 4, "y={y}, level={level}");
        }
    }

    #[test]
    fn full_scale_alternation_does_not_wrap() {
        let mut cascade = AllPassCascade::new(ALL_PASS_FILTER_1);
        let input: Vec<i32> = (0..320)
            .map(|k| if k % 2 == 0 { Q10_MAX } else { Q10_MIN })
            .collect();
        for _ in 0..3 {
            let out = run(&mut cascade, &input);
            assert!(out.iter().all(|y| y.abs() < 1 << 28));
        }
    }

    #[test]
    #[should_panic(expected = "lengths differ")]
    fn mismatched_lengths_panic() {
        let mut cascade = AllPassCascade::new(ALL_PASS_FILTER_1);
        let mut input = [0i32; 4];
        let mut out = [0i32; 3];
        cascade.filter(&mut input, &mut out);
    }

    #[proptest]
    fn split_calls_match_single_call(
        #[strategy(pvec(Q10_MIN..=Q10_MAX, 2..200))] input: Vec<i32>,
        #[strategy(1..#input.len())] split_at: usize,
    ) {
        let mut whole = AllPassCascade::new(ALL_PASS_FILTER_1);
        let expected = run(&mut whole, &input);

        let mut streamed = AllPassCascade::new(ALL_PASS_FILTER_1);
        let mut out = run(&mut streamed, &input[..split_at]);
        out.extend(run(&mut streamed, &input[split_at..]));

        prop_assert_eq!(out, expected);
        prop_assert_eq!(streamed.state(), whole.state());
    }

    #[proptest]
    fn filtering_is_deterministic(
        #[strategy(pvec(Q10_MIN..=Q10_MAX, 0..200))] input: Vec<i32>,
    ) {
        let mut a = AllPassCascade::new(ALL_PASS_FILTER_2);
        let mut b = AllPassCascade::new(ALL_PASS_FILTER_2);
        prop_assert_eq!(run(&mut a, &input), run(&mut b, &input));
        prop_assert_eq!(a, b);
    }
}
