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
use crate::err::{FuseletError, try_vec};
use crate::image::ImageMut;
use crate::kernel::LiftKernel;
use crate::reflect::reflect;
use crate::{Dwt2DExecutor, Dwt2DForwardExecutor, Dwt2DInverseExecutor, max_levels};

/// Four lifting stages over one interleaved line, neighbors resolved through
/// symmetric reflection, followed by the low/high normalization.
pub(crate) fn lift_line_forward<K: LiftKernel>(kernel: &K, line: &mut [K::Sample]) {
    let n = line.len();
    debug_assert!(n >= 2);
    for stage in 0..4usize {
        let start = if stage.is_multiple_of(2) { 1 } else { 0 };
        for i in (start..n).step_by(2) {
            let l = line[reflect(i as i64 - 1, 0, 0, n)];
            let r = line[reflect(i as i64 + 1, 0, 0, n)];
            line[i] = line[i] + kernel.delta_term(stage, l, r);
        }
    }
    for i in (0..n).step_by(2) {
        line[i] = kernel.scale_low(line[i]);
    }
    for i in (1..n).step_by(2) {
        line[i] = kernel.scale_high(line[i]);
    }
}

/// Exact mirror of [`lift_line_forward`]: undoes normalization, then the four
/// stages in reverse order with subtraction.
pub(crate) fn lift_line_inverse<K: LiftKernel>(kernel: &K, line: &mut [K::Sample]) {
    let n = line.len();
    debug_assert!(n >= 2);
    for i in (0..n).step_by(2) {
        line[i] = kernel.unscale_low(line[i]);
    }
    for i in (1..n).step_by(2) {
        line[i] = kernel.unscale_high(line[i]);
    }
    for stage in (0..4usize).rev() {
        let start = if stage.is_multiple_of(2) { 1 } else { 0 };
        for i in (start..n).step_by(2) {
            let l = line[reflect(i as i64 - 1, 0, 0, n)];
            let r = line[reflect(i as i64 + 1, 0, 0, n)];
            line[i] = line[i] - kernel.delta_term(stage, l, r);
        }
    }
}

fn forward_axis_pass<K: LiftKernel>(
    kernel: &K,
    image: &mut ImageMut<'_, K::Sample>,
    extent: usize,
    lines: usize,
    scratch: &mut [K::Sample],
) {
    let low_count = extent.div_ceil(2);
    for line_idx in 0..lines {
        let line = &mut scratch[..extent];
        for (x, dst) in line.iter_mut().enumerate() {
            *dst = image.get(x, line_idx);
        }
        lift_line_forward(kernel, line);
        for m in 0..low_count {
            image.set(m, line_idx, line[2 * m]);
        }
        for m in 0..extent / 2 {
            image.set(low_count + m, line_idx, line[2 * m + 1]);
        }
    }
}

fn inverse_axis_pass<K: LiftKernel>(
    kernel: &K,
    image: &mut ImageMut<'_, K::Sample>,
    extent: usize,
    lines: usize,
    scratch: &mut [K::Sample],
) {
    let low_count = extent.div_ceil(2);
    for line_idx in 0..lines {
        let line = &mut scratch[..extent];
        for m in 0..low_count {
            line[2 * m] = image.get(m, line_idx);
        }
        for m in 0..extent / 2 {
            line[2 * m + 1] = image.get(low_count + m, line_idx);
        }
        lift_line_inverse(kernel, line);
        for (x, src) in line.iter().enumerate() {
            image.set(x, line_idx, *src);
        }
    }
}

/// Checks the requested depth against what the geometry supports and returns
/// the per-level extents, finest first.
fn level_extents(
    size_x: usize,
    size_y: usize,
    levels: usize,
) -> Result<Vec<(usize, usize)>, FuseletError> {
    let max = max_levels(size_x, size_y);
    if levels == 0 || levels > max {
        return Err(FuseletError::LevelsOutOfRange(levels, max));
    }
    let mut extents = Vec::with_capacity(levels);
    let (mut sx, mut sy) = (size_x, size_y);
    for _ in 0..levels {
        extents.push((sx, sy));
        sx = sx.div_ceil(2);
        sy = sy.div_ceil(2);
    }
    Ok(extents)
}

/// Per-level separable CDF 9/7 transform in the packed-subband layout.
///
/// Each level lifts the rows and then the columns of the current LL
/// rectangle, splitting every line into its low half and high half. This is
/// the plain one-level-at-a-time formulation the fused multiscale path is
/// measured against, and the general path for geometries the fused tiling
/// does not cover.
pub(crate) struct SeparableCdf97<K> {
    pub(crate) kernel: K,
}

impl<K: LiftKernel> Dwt2DForwardExecutor<K::Sample> for SeparableCdf97<K> {
    fn execute_forward(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<(), FuseletError> {
        let extents = level_extents(image.size_x(), image.size_y(), levels)?;
        let mut scratch = try_vec![K::Sample::default(); image.size_x().max(image.size_y())];
        for &(sx, sy) in extents.iter() {
            forward_axis_pass(&self.kernel, image, sx, sy, &mut scratch);
            forward_axis_pass(&self.kernel, &mut image.transposed(), sy, sx, &mut scratch);
        }
        Ok(())
    }
}

impl<K: LiftKernel> Dwt2DInverseExecutor<K::Sample> for SeparableCdf97<K> {
    fn execute_inverse(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<(), FuseletError> {
        let extents = level_extents(image.size_x(), image.size_y(), levels)?;
        let mut scratch = try_vec![K::Sample::default(); image.size_x().max(image.size_y())];
        for &(sx, sy) in extents.iter().rev() {
            inverse_axis_pass(&self.kernel, &mut image.transposed(), sy, sx, &mut scratch);
            inverse_axis_pass(&self.kernel, image, sx, sy, &mut scratch);
        }
        Ok(())
    }
}

impl<K: LiftKernel> Dwt2DExecutor<K::Sample> for SeparableCdf97<K> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Cdf97Float, Cdf97Int};

    fn roundtrip_f32(size_x: usize, size_y: usize, levels: usize) {
        let executor = SeparableCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        };
        let original: Vec<f32> = (0..size_x * size_y)
            .map(|i| ((i * 73 + 19) % 251) as f32 - 60.0)
            .collect();
        let mut plane = original.clone();
        let mut image = ImageMut::new(&mut plane, size_x, size_y).unwrap();
        executor.execute_forward(&mut image, levels).unwrap();
        executor.execute_inverse(&mut image, levels).unwrap();
        for (i, (o, r)) in original.iter().zip(plane.iter()).enumerate() {
            assert!(
                (o - r).abs() < 1e-3,
                "roundtrip {size_x}x{size_y} levels {levels} diverged at {i}: {o} vs {r}"
            );
        }
    }

    #[test]
    fn test_roundtrip_f32_even() {
        roundtrip_f32(16, 16, 2);
    }

    #[test]
    fn test_roundtrip_f32_odd() {
        roundtrip_f32(9, 9, 1);
        roundtrip_f32(21, 13, 2);
    }

    #[test]
    fn test_roundtrip_i32_is_exact() {
        let executor = SeparableCdf97 {
            kernel: Cdf97Int::default(),
        };
        let original: Vec<i32> = (0..20 * 12).map(|i| (i * i * 31 - 777) % 4001).collect();
        let mut plane = original.clone();
        let mut image = ImageMut::new(&mut plane, 20, 12).unwrap();
        executor.execute_forward(&mut image, 2).unwrap();
        assert_ne!(original, plane);
        let mut image = ImageMut::new(&mut plane, 20, 12).unwrap();
        executor.execute_inverse(&mut image, 2).unwrap();
        assert_eq!(original, plane);
    }

    #[test]
    fn test_zero_plane_stays_zero() {
        let executor = SeparableCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        };
        let mut plane = vec![0f32; 8 * 8];
        let mut image = ImageMut::new(&mut plane, 8, 8).unwrap();
        executor.execute_forward(&mut image, 2).unwrap();
        assert!(plane.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_excessive_depth() {
        let executor = SeparableCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        };
        let mut plane = vec![0f32; 8 * 8];
        let mut image = ImageMut::new(&mut plane, 8, 8).unwrap();
        assert!(matches!(
            executor.execute_forward(&mut image, 4),
            Err(FuseletError::LevelsOutOfRange(4, _))
        ));
        assert!(matches!(
            executor.execute_forward(&mut image, 0),
            Err(FuseletError::LevelsOutOfRange(0, _))
        ));
    }
}
