/*
 * // Copyright (c) Radzivon Bartoshyk 12/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::kernel::LiftKernel;

/// One pipelined step of the CDF 9/7 lifting recurrence along a line.
///
/// Consumes the sample pair at interleaved positions `(2k, 2k+1)` and emits
/// the finished `(low, high)` coefficients for positions `(2k-4, 2k-3)` — the
/// recurrence looks four samples ahead, so outputs trail the input by two
/// pairs. The four carried values are the partially accumulated taps of the
/// four lifting stages; each call consumes every slot once and refills it for
/// the next pair, which is what lets a line be processed in disjoint
/// left-to-right chunks while reproducing a monolithic pass.
///
/// Outputs are unscaled; callers apply the low/high normalization.
#[inline]
pub(crate) fn butterfly_step<K: LiftKernel>(
    kernel: &K,
    carry: &mut [K::Carry; 4],
    a: K::Sample,
    b: K::Sample,
) -> (K::Sample, K::Sample) {
    let d1 = kernel.resolve(0, kernel.accum(0, carry[0], a));
    carry[0] = kernel.accum(0, kernel.enter(0, b), a);

    let s2 = kernel.resolve(1, kernel.accum(1, carry[1], d1));
    carry[1] = kernel.accum(1, kernel.enter(1, a), d1);

    let d3 = kernel.resolve(2, kernel.accum(2, carry[2], s2));
    carry[2] = kernel.accum(2, kernel.enter(2, d1), s2);

    let s4 = kernel.resolve(3, kernel.accum(3, carry[3], d3));
    carry[3] = kernel.accum(3, kernel.enter(3, s2), d3);

    (s4, d3)
}

/// Number of warm-up pairs that fully determine the carry from input alone.
///
/// Slot 0 is input-determined after one step, each later stage one step
/// after the previous, so four pairs fed ahead of the first kept output make
/// the carry exact at any chunk boundary.
#[cfg(test)]
pub(crate) const WARMUP_PAIRS: i64 = 4;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Cdf97Float, Cdf97Int};
    use crate::reflect::reflect;
    use crate::separable::lift_line_forward;

    fn pipelined_line<K: LiftKernel>(kernel: &K, line: &[K::Sample]) -> Vec<K::Sample> {
        let n = line.len();
        assert!(n.is_multiple_of(2));
        let half = (n / 2) as i64;
        let mut carry = [K::Carry::default(); 4];
        let mut out = vec![K::Sample::default(); n];
        for k in -WARMUP_PAIRS..=half + 1 {
            let a = line[reflect(2 * k, 0, 0, n)];
            let b = line[reflect(2 * k + 1, 0, 0, n)];
            let (low, high) = butterfly_step(kernel, &mut carry, a, b);
            let pair = k - 2;
            if pair >= 0 && pair < half {
                out[2 * pair as usize] = kernel.scale_low(low);
                out[2 * pair as usize + 1] = kernel.scale_high(high);
            }
        }
        out
    }

    #[test]
    fn test_pipelined_matches_direct_lifting_f32() {
        let kernel = Cdf97Float::<f32>::default();
        let line: Vec<f32> = (0..32)
            .map(|i| ((i * 37 + 11) % 61) as f32 - 13.5)
            .collect();
        let mut direct = line.clone();
        lift_line_forward(&kernel, &mut direct);
        let piped = pipelined_line(&kernel, &line);
        for (i, (a, b)) in direct.iter().zip(piped.iter()).enumerate() {
            assert!(
                (a - b).abs() <= 1e-4 * a.abs().max(1.0),
                "position {i}: direct {a} pipelined {b}"
            );
        }
    }

    #[test]
    fn test_pipelined_matches_direct_lifting_i32() {
        let kernel = Cdf97Int::default();
        let line: Vec<i32> = (0..24).map(|i| (i * i * 7 - 180) % 1021).collect();
        let mut direct = line.clone();
        lift_line_forward(&kernel, &mut direct);
        let piped = pipelined_line(&kernel, &line);
        assert_eq!(direct, piped);
    }

    #[test]
    fn test_carry_makes_chunked_pass_deterministic() {
        let kernel = Cdf97Float::<f32>::default();
        let line: Vec<f32> = (0..40).map(|i| (i as f32 * 0.73).sin() * 50.0).collect();
        let n = line.len();
        let half = (n / 2) as i64;

        let whole = pipelined_line(&kernel, &line);

        // Same traversal, carry threaded across an arbitrary chunk boundary.
        let mut carry = [0f32; 4];
        let mut chunked = vec![0f32; n];
        for bounds in [(-WARMUP_PAIRS, 7), (7, half + 2)] {
            for k in bounds.0..bounds.1 {
                let a = line[reflect(2 * k, 0, 0, n)];
                let b = line[reflect(2 * k + 1, 0, 0, n)];
                let (low, high) = butterfly_step(&kernel, &mut carry, a, b);
                let pair = k - 2;
                if pair >= 0 && pair < half {
                    chunked[2 * pair as usize] = kernel.scale_low(low);
                    chunked[2 * pair as usize + 1] = kernel.scale_high(high);
                }
            }
        }
        assert_eq!(whole, chunked);
    }
}
