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
use crate::WaveletSample;
use num_traits::{AsPrimitive, MulAdd};
use std::marker::PhantomData;
use std::ops::Mul;

pub(crate) const ALPHA: f64 = -1.58613434205992;
pub(crate) const BETA: f64 = -0.05298011857296;
pub(crate) const GAMMA: f64 = 0.88291107553093;
pub(crate) const DELTA: f64 = 0.44350685204397;

/// 1-D scale applied to low-pass outputs; the fused 2-D core applies the
/// squared forms `ZETA * ZETA` to LL and `1 / (ZETA * ZETA)` to HH once.
pub(crate) const ZETA: f64 = 1.14960439886024;

/// One set of CDF 9/7 lifting weights together with the arithmetic domain the
/// transform runs in.
///
/// Stages are numbered 0..4 in forward order: predict, update, predict,
/// update. `delta_term` is the complete two-neighbor contribution of a stage;
/// the `enter`/`accum`/`resolve` triple is the same contribution split for
/// the pipelined carry, and both forms agree bit for bit in the integer
/// domain.
pub(crate) trait LiftKernel: Copy + Send + Sync + 'static {
    type Sample: WaveletSample;
    type Carry: Copy + Default;

    /// Full stage contribution for neighbors `l` and `r`.
    fn delta_term(&self, stage: usize, l: Self::Sample, r: Self::Sample) -> Self::Sample;
    /// Moves a center sample into the carry domain of a stage.
    fn enter(&self, stage: usize, value: Self::Sample) -> Self::Carry;
    /// Accumulates one weighted neighbor into a carried value.
    fn accum(&self, stage: usize, acc: Self::Carry, x: Self::Sample) -> Self::Carry;
    /// Finalizes a carried value back into the sample domain.
    fn resolve(&self, stage: usize, acc: Self::Carry) -> Self::Sample;

    fn scale_low(&self, v: Self::Sample) -> Self::Sample;
    fn scale_high(&self, v: Self::Sample) -> Self::Sample;
    fn unscale_low(&self, v: Self::Sample) -> Self::Sample;
    fn unscale_high(&self, v: Self::Sample) -> Self::Sample;
    /// Squared low scale for the fused 2-D core.
    fn scale_ll(&self, v: Self::Sample) -> Self::Sample;
    /// Squared high scale for the fused 2-D core.
    fn scale_hh(&self, v: Self::Sample) -> Self::Sample;
}

/// Floating-point CDF 9/7 lifting over `f32` or `f64` samples.
#[derive(Default, Clone, Copy)]
pub(crate) struct Cdf97Float<T> {
    phantom0: PhantomData<T>,
}

#[inline]
fn weight(stage: usize) -> f64 {
    match stage {
        0 => ALPHA,
        1 => BETA,
        2 => GAMMA,
        _ => DELTA,
    }
}

impl<T: WaveletSample + Mul<T, Output = T> + MulAdd<T, Output = T>> LiftKernel for Cdf97Float<T>
where
    f64: AsPrimitive<T>,
{
    type Sample = T;
    type Carry = T;

    #[inline]
    fn delta_term(&self, stage: usize, l: T, r: T) -> T {
        let w: T = weight(stage).as_();
        w.mul_add(l, w * r)
    }

    #[inline]
    fn enter(&self, _stage: usize, value: T) -> T {
        value
    }

    #[inline]
    fn accum(&self, stage: usize, acc: T, x: T) -> T {
        let w: T = weight(stage).as_();
        w.mul_add(x, acc)
    }

    #[inline]
    fn resolve(&self, _stage: usize, acc: T) -> T {
        acc
    }

    #[inline]
    fn scale_low(&self, v: T) -> T {
        v * ZETA.as_()
    }

    #[inline]
    fn scale_high(&self, v: T) -> T {
        v * (1.0 / ZETA).as_()
    }

    #[inline]
    fn unscale_low(&self, v: T) -> T {
        v * (1.0 / ZETA).as_()
    }

    #[inline]
    fn unscale_high(&self, v: T) -> T {
        v * ZETA.as_()
    }

    #[inline]
    fn scale_ll(&self, v: T) -> T {
        v * (ZETA * ZETA).as_()
    }

    #[inline]
    fn scale_hh(&self, v: T) -> T {
        v * (1.0 / (ZETA * ZETA)).as_()
    }
}

const INT_WEIGHTS: [i64; 4] = [-203, -217, 113, 1817];
const INT_SHIFTS: [u32; 4] = [7, 12, 7, 12];

/// Reversible integer CDF 9/7 lifting over `i32` samples.
///
/// Weights are the fixed-point approximations `-203/128`, `-217/4096`,
/// `113/128`, `1817/4096` with round-half-up shifts, and no output scaling,
/// so the inverse reproduces the input exactly. Carried values live in a
/// pre-shifted `i64` domain so that the pipelined split of a stage rounds
/// once, exactly like the two-neighbor form.
#[derive(Default, Clone, Copy)]
pub(crate) struct Cdf97Int {}

impl LiftKernel for Cdf97Int {
    type Sample = i32;
    type Carry = i64;

    #[inline]
    fn delta_term(&self, stage: usize, l: i32, r: i32) -> i32 {
        let sum = l as i64 + r as i64;
        let shift = INT_SHIFTS[stage];
        ((INT_WEIGHTS[stage] * sum + (1i64 << (shift - 1))) >> shift) as i32
    }

    #[inline]
    fn enter(&self, stage: usize, value: i32) -> i64 {
        (value as i64) << INT_SHIFTS[stage]
    }

    #[inline]
    fn accum(&self, stage: usize, acc: i64, x: i32) -> i64 {
        acc + INT_WEIGHTS[stage] * x as i64
    }

    #[inline]
    fn resolve(&self, stage: usize, acc: i64) -> i32 {
        let shift = INT_SHIFTS[stage];
        ((acc + (1i64 << (shift - 1))) >> shift) as i32
    }

    #[inline]
    fn scale_low(&self, v: i32) -> i32 {
        v
    }

    #[inline]
    fn scale_high(&self, v: i32) -> i32 {
        v
    }

    #[inline]
    fn unscale_low(&self, v: i32) -> i32 {
        v
    }

    #[inline]
    fn unscale_high(&self, v: i32) -> i32 {
        v
    }

    #[inline]
    fn scale_ll(&self, v: i32) -> i32 {
        v
    }

    #[inline]
    fn scale_hh(&self, v: i32) -> i32 {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_pipelined_split_matches_pair_form() {
        let k = Cdf97Int::default();
        for stage in 0..4 {
            for (c, l, r) in [
                (17, -250, 1024),
                (-3, 8191, 8192),
                (0, -1, 1),
                (12345, -20000, 300),
            ] {
                let pair = c + k.delta_term(stage, l, r);
                let split = k.resolve(stage, k.accum(stage, k.accum(stage, k.enter(stage, c), l), r));
                assert_eq!(pair, split, "stage {stage} c {c} l {l} r {r}");
            }
        }
    }

    #[test]
    fn test_int_lift_is_reversible() {
        let k = Cdf97Int::default();
        for stage in 0..4 {
            for (c, l, r) in [(91, 17, -44), (-1000, 250, 251), (0, 0, 0)] {
                let lifted = c + k.delta_term(stage, l, r);
                assert_eq!(lifted - k.delta_term(stage, l, r), c);
            }
        }
    }

    #[test]
    fn test_float_weights_match_fixed_point() {
        assert!((ALPHA * 128.0 - INT_WEIGHTS[0] as f64).abs() < 0.55);
        assert!((BETA * 4096.0 - INT_WEIGHTS[1] as f64).abs() < 0.55);
        assert!((GAMMA * 128.0 - INT_WEIGHTS[2] as f64).abs() < 0.55);
        assert!((DELTA * 4096.0 - INT_WEIGHTS[3] as f64).abs() < 0.55);
    }

    #[test]
    fn test_squared_scales() {
        assert!((ZETA * ZETA - 1.32159).abs() < 1e-4);
        assert!((1.0 / (ZETA * ZETA) - 0.75666).abs() < 1e-4);
    }
}
