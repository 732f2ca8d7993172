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
use crate::core4x4::{CarryPlane, unified_core};
use crate::err::{FuseletError, try_vec};
use crate::image::ImageMut;
use crate::kernel::LiftKernel;
use crate::reflect::{reflect, reflect_checked};
use crate::separable::SeparableCdf97;
use crate::{Dwt2DExecutor, Dwt2DForwardExecutor, Dwt2DInverseExecutor, max_levels};

/// Whether the fused multiscale tiling covers this geometry.
///
/// Every level must keep even extents and the top-level tile lattice must be
/// exact, which holds when both extents are multiples of `2^(levels+1)`.
pub fn fused_geometry_supported(size_x: usize, size_y: usize, levels: usize) -> bool {
    if levels == 0 || levels > 20 || size_x == 0 || size_y == 0 {
        return false;
    }
    let tile = 1usize << (levels + 1);
    size_x.is_multiple_of(tile) && size_y.is_multiple_of(tile)
}

/// Last few authoritative samples of every line at one scale, kept so that
/// tiles past the right or bottom boundary can be fed the per-scale mirror of
/// the line instead of the raw continuation of the finer scale.
///
/// The mirror axis of a subsampled line no longer falls on a sample of the
/// finer scale, so the continuation a boundary tile would naturally receive
/// from its children differs from the symmetric extension of the scale's own
/// line; these cached tails restore the latter.
struct TailCache<S> {
    rows: Vec<[S; 8]>,
    base: i64,
    extent: i64,
}

impl<S: Copy + Default> TailCache<S> {
    fn new(ortho_len: usize, extent: i64) -> Result<Self, FuseletError> {
        Ok(Self {
            rows: try_vec![[S::default(); 8]; ortho_len],
            base: (extent - 8).max(0),
            extent,
        })
    }

    #[inline]
    fn record(&mut self, along: i64, ortho: i64, value: S) {
        if along < self.base || along >= self.extent {
            return;
        }
        let row = ortho + 8;
        if row < 0 || row >= self.rows.len() as i64 {
            return;
        }
        self.rows[row as usize][(along - self.base) as usize] = value;
    }

    #[inline]
    fn lookup(&self, along: i64, ortho: i64) -> Option<S> {
        if along < self.base || along >= self.extent {
            return None;
        }
        let row = ortho + 8;
        if row < 0 || row >= self.rows.len() as i64 {
            return None;
        }
        Some(self.rows[row as usize][(along - self.base) as usize])
    }
}

/// One fused multiscale traversal: carries, boundary tails and the pristine
/// source plane for the duration of a single forward call.
struct FusedPass<K: LiftKernel> {
    kernel: K,
    source: Vec<K::Sample>,
    src_width: usize,
    sizes: Vec<(i64, i64)>,
    row_carry: Vec<CarryPlane<K::Carry>>,
    col_carry: Vec<CarryPlane<K::Carry>>,
    tail_x: Vec<TailCache<K::Sample>>,
    tail_y: Vec<TailCache<K::Sample>>,
}

impl<K: LiftKernel> FusedPass<K> {
    fn new(
        kernel: K,
        image: &ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<Self, FuseletError> {
        let (sx0, sy0) = (image.size_x(), image.size_y());
        let mut source = try_vec![K::Sample::default(); sx0 * sy0];
        for y in 0..sy0 {
            for x in 0..sx0 {
                source[y * sx0 + x] = image.get(x, y);
            }
        }

        let sizes: Vec<(i64, i64)> = (0..levels)
            .map(|j| ((sx0 >> j) as i64, (sy0 >> j) as i64))
            .collect();

        // Tile origins a level can see: the top sweep ends at the top extent
        // and every recursion step maps an origin p to at most 2p + 8.
        let top = levels - 1;
        let mut reach = vec![(0i64, 0i64); levels];
        reach[top] = sizes[top];
        for j in (0..top).rev() {
            reach[j] = (2 * reach[j + 1].0 + 8, 2 * reach[j + 1].1 + 8);
        }

        let mut row_carry = Vec::with_capacity(levels);
        let mut col_carry = Vec::with_capacity(levels);
        let mut tail_x = Vec::with_capacity(levels);
        let mut tail_y = Vec::with_capacity(levels);
        for j in 0..levels {
            row_carry.push(CarryPlane::new((reach[j].1 + 8) as usize, 4)?);
            col_carry.push(CarryPlane::new((reach[j].0 + 8) as usize, 4)?);
            tail_x.push(TailCache::new((sizes[j].1 + 16) as usize, sizes[j].0)?);
            tail_y.push(TailCache::new((sizes[j].0 + 16) as usize, sizes[j].1)?);
        }

        Ok(Self {
            kernel,
            source,
            src_width: sx0,
            sizes,
            row_carry,
            col_carry,
            tail_x,
            tail_y,
        })
    }

    fn run(&mut self, image: &mut ImageMut<'_, K::Sample>) {
        let levels = self.sizes.len();
        let (sx_top, sy_top) = self.sizes[levels - 1];
        // Two leading tiles per line warm the carries up from the mirrored
        // extension; trailing tiles flush the lagged outputs.
        let mut y = -4i64;
        while y <= sy_top {
            let mut x = -4i64;
            while x <= sx_top {
                self.compose(image, levels - 1, x, y, true);
                x += 4;
            }
            y += 4;
        }
    }

    /// Transforms the 4x4 tile at level-`j` origin `(x, y)`, recursing into
    /// four child tiles to gather its window when `j > 0`, and returns the
    /// 2x2 LL quadrant for the caller's own window.
    fn compose(
        &mut self,
        image: &mut ImageMut<'_, K::Sample>,
        j: usize,
        x: i64,
        y: i64,
        top: bool,
    ) -> [[K::Sample; 2]; 2] {
        let (sx, sy) = self.sizes[j];
        let mut window = [[K::Sample::default(); 4]; 4];

        if j == 0 {
            for (r, row) in window.iter_mut().enumerate() {
                let ry = reflect(y, r as i64, 0, sy as usize);
                for (i, v) in row.iter_mut().enumerate() {
                    let rx = reflect(x, i as i64, 0, sx as usize);
                    *v = self.source[ry * self.src_width + rx];
                }
            }
        } else {
            for seg_y in 0..2i64 {
                for seg_x in 0..2i64 {
                    let quadrant = self.compose(
                        image,
                        j - 1,
                        2 * x + 4 * seg_x + 4,
                        2 * y + 4 * seg_y + 4,
                        false,
                    );
                    for (qr, qrow) in quadrant.iter().enumerate() {
                        for (qi, qv) in qrow.iter().enumerate() {
                            window[2 * seg_y as usize + qr][2 * seg_x as usize + qi] = *qv;
                        }
                    }
                }
            }
            self.fix_scale_boundary(j, x, y, &mut window);
        }

        let kernel = self.kernel;
        let out = unified_core(
            &kernel,
            window,
            &mut self.row_carry[j],
            y,
            &mut self.col_carry[j],
            x,
        );

        self.write_outputs(image, j, x, y, &out, top);

        [[out[0][0], out[0][2]], [out[2][0], out[2][2]]]
    }

    /// Records authoritative tail samples and replaces window cells past the
    /// right or bottom edge with the per-scale symmetric extension.
    fn fix_scale_boundary(&mut self, j: usize, x: i64, y: i64, window: &mut [[K::Sample; 4]; 4]) {
        let (sx, sy) = self.sizes[j];
        for (r, row) in window.iter_mut().enumerate() {
            let py = y + r as i64;
            for (i, v) in row.iter_mut().enumerate() {
                let px = x + i as i64;
                if px < sx && py < sy {
                    self.tail_x[j].record(px, py, *v);
                    self.tail_y[j].record(py, px, *v);
                } else {
                    // Folded back into the line; the orthogonal coordinate is
                    // kept raw below zero because warm-up rows are cached
                    // under their virtual position.
                    let mx = if px >= sx {
                        reflect(px, 0, 0, sx as usize) as i64
                    } else {
                        px
                    };
                    let my = if py >= sy {
                        reflect(py, 0, 0, sy as usize) as i64
                    } else {
                        py
                    };
                    *v = self.tail_x[j]
                        .lookup(mx, my)
                        .or_else(|| self.tail_y[j].lookup(my, mx))
                        .unwrap_or_default();
                }
            }
        }
    }

    /// Commits one finished 4x4 output tile into the packed-subband plane.
    ///
    /// The tile belongs to positions `(x-4.., y-4..)` at level `j`; targets
    /// outside the level's extent are dropped. Even/even cells are the LL
    /// samples of the next scale and stay in registers except at the top
    /// level, where LL is a genuine output.
    fn write_outputs(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        j: usize,
        x: i64,
        y: i64,
        out: &[[K::Sample; 4]; 4],
        top: bool,
    ) {
        let (sx, sy) = self.sizes[j];
        for (r, row) in out.iter().enumerate() {
            let low_y = r.is_multiple_of(2);
            for (i, v) in row.iter().enumerate() {
                let low_x = i.is_multiple_of(2);
                if low_x && low_y && !top {
                    continue;
                }
                let px = x - 4 + i as i64;
                let py = y - 4 + r as i64;
                let (Some(px), Some(py)) = (
                    reflect_checked(px, 0, 0, sx as usize),
                    reflect_checked(py, 0, 0, sy as usize),
                ) else {
                    continue;
                };
                let cx = px / 2 + if low_x { 0 } else { sx as usize / 2 };
                let cy = py / 2 + if low_y { 0 } else { sy as usize / 2 };
                image.set(cx, cy, *v);
            }
        }
    }
}

/// Fused multiscale CDF 9/7 executor.
///
/// One blocked raster pass over the image computes all requested levels: each
/// top-level tile recursively gathers its children's LL quadrants in locals,
/// so intermediate approximation samples never round-trip through memory.
/// Geometry must satisfy [`fused_geometry_supported`]; the inverse delegates
/// to the per-level separable path, which the forward is coefficient-exact
/// against.
pub(crate) struct FusedCdf97<K> {
    pub(crate) kernel: K,
}

impl<K: LiftKernel> Dwt2DForwardExecutor<K::Sample> for FusedCdf97<K> {
    fn execute_forward(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<(), FuseletError> {
        let (sx, sy) = (image.size_x(), image.size_y());
        if levels == 0 {
            return Err(FuseletError::LevelsOutOfRange(levels, max_levels(sx, sy)));
        }
        if !fused_geometry_supported(sx, sy, levels) {
            return Err(FuseletError::UnsupportedGeometry(sx, sy, levels));
        }
        let mut pass = FusedPass::new(self.kernel, image, levels)?;
        pass.run(image);
        Ok(())
    }
}

impl<K: LiftKernel> Dwt2DInverseExecutor<K::Sample> for FusedCdf97<K> {
    fn execute_inverse(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<(), FuseletError> {
        SeparableCdf97 {
            kernel: self.kernel,
        }
        .execute_inverse(image, levels)
    }
}

impl<K: LiftKernel> Dwt2DExecutor<K::Sample> for FusedCdf97<K> {}

/// Picks the fused path when the geometry tiles under it and falls back to
/// the separable path otherwise, so the public executors stay total over
/// supported depths.
pub(crate) struct DispatchCdf97<K> {
    pub(crate) kernel: K,
}

impl<K: LiftKernel> Dwt2DForwardExecutor<K::Sample> for DispatchCdf97<K> {
    fn execute_forward(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<(), FuseletError> {
        if fused_geometry_supported(image.size_x(), image.size_y(), levels) {
            FusedCdf97 {
                kernel: self.kernel,
            }
            .execute_forward(image, levels)
        } else {
            SeparableCdf97 {
                kernel: self.kernel,
            }
            .execute_forward(image, levels)
        }
    }
}

impl<K: LiftKernel> Dwt2DInverseExecutor<K::Sample> for DispatchCdf97<K> {
    fn execute_inverse(
        &self,
        image: &mut ImageMut<'_, K::Sample>,
        levels: usize,
    ) -> Result<(), FuseletError> {
        SeparableCdf97 {
            kernel: self.kernel,
        }
        .execute_inverse(image, levels)
    }
}

impl<K: LiftKernel> Dwt2DExecutor<K::Sample> for DispatchCdf97<K> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Cdf97Float, Cdf97Int};

    fn fused_f32() -> FusedCdf97<Cdf97Float<f32>> {
        FusedCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        }
    }

    fn fused_i32() -> FusedCdf97<Cdf97Int> {
        FusedCdf97 {
            kernel: Cdf97Int::default(),
        }
    }

    fn separable_f32() -> SeparableCdf97<Cdf97Float<f32>> {
        SeparableCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        }
    }

    fn separable_i32() -> SeparableCdf97<Cdf97Int> {
        SeparableCdf97 {
            kernel: Cdf97Int::default(),
        }
    }

    fn assert_close(fused: &[f32], reference: &[f32], tolerance: f32) {
        for (i, (a, b)) in fused.iter().zip(reference.iter()).enumerate() {
            let scale = a.abs().max(b.abs()).max(1.0);
            assert!(
                (a - b).abs() <= tolerance * scale,
                "coefficient {i} differs: fused {a} reference {b}"
            );
        }
    }

    fn test_pattern_f32(size: usize) -> Vec<f32> {
        (0..size * size)
            .map(|i| ((i * 97 + 31) % 509) as f32 - 120.0)
            .collect()
    }

    fn test_pattern_i32(size: usize) -> Vec<i32> {
        (0..size * size)
            .map(|i| ((i as i32).wrapping_mul(2_654_435_761u32 as i32) >> 20) % 2048)
            .collect()
    }

    #[test]
    fn test_single_level_matches_separable_f32() {
        let original = test_pattern_f32(16);
        let mut fused_plane = original.clone();
        let mut reference_plane = original;
        let mut fused_image = ImageMut::new(&mut fused_plane, 16, 16).unwrap();
        fused_f32().execute_forward(&mut fused_image, 1).unwrap();
        let mut reference_image = ImageMut::new(&mut reference_plane, 16, 16).unwrap();
        separable_f32()
            .execute_forward(&mut reference_image, 1)
            .unwrap();
        assert_close(&fused_plane, &reference_plane, 1e-5);
    }

    #[test]
    fn test_single_level_matches_separable_i32_exactly() {
        let original = test_pattern_i32(24);
        let mut fused_plane = original.clone();
        let mut reference_plane = original;
        let mut fused_image = ImageMut::new(&mut fused_plane, 24, 24).unwrap();
        fused_i32().execute_forward(&mut fused_image, 1).unwrap();
        let mut reference_image = ImageMut::new(&mut reference_plane, 24, 24).unwrap();
        separable_i32()
            .execute_forward(&mut reference_image, 1)
            .unwrap();
        assert_eq!(fused_plane, reference_plane);
    }

    #[test]
    fn test_multiscale_matches_separable_i32_exactly() {
        for (size, levels) in [(16usize, 2usize), (32, 2), (32, 3)] {
            let original = test_pattern_i32(size);
            let mut fused_plane = original.clone();
            let mut reference_plane = original;
            let mut fused_image = ImageMut::new(&mut fused_plane, size, size).unwrap();
            fused_i32()
                .execute_forward(&mut fused_image, levels)
                .unwrap();
            let mut reference_image = ImageMut::new(&mut reference_plane, size, size).unwrap();
            separable_i32()
                .execute_forward(&mut reference_image, levels)
                .unwrap();
            assert_eq!(
                fused_plane, reference_plane,
                "divergence at {size}x{size} levels {levels}"
            );
        }
    }

    #[test]
    fn test_multiscale_matches_separable_f32() {
        let original = test_pattern_f32(32);
        let mut fused_plane = original.clone();
        let mut reference_plane = original;
        let mut fused_image = ImageMut::new(&mut fused_plane, 32, 32).unwrap();
        fused_f32().execute_forward(&mut fused_image, 2).unwrap();
        let mut reference_image = ImageMut::new(&mut reference_plane, 32, 32).unwrap();
        separable_f32()
            .execute_forward(&mut reference_image, 2)
            .unwrap();
        assert_close(&fused_plane, &reference_plane, 1e-4);
    }

    #[test]
    fn test_ramp_roundtrip_is_exact() {
        let original: Vec<i32> = (0..16 * 16).map(|i| (i % 16 + 16 * (i / 16)) as i32).collect();
        let mut plane = original.clone();
        let executor = fused_i32();
        let mut image = ImageMut::new(&mut plane, 16, 16).unwrap();
        executor.execute_forward(&mut image, 2).unwrap();
        let mut image = ImageMut::new(&mut plane, 16, 16).unwrap();
        executor.execute_inverse(&mut image, 2).unwrap();
        assert_eq!(original, plane);
    }

    #[test]
    fn test_zero_plane_transforms_to_zero() {
        let mut plane = vec![0f32; 8 * 8];
        let mut image = ImageMut::new(&mut plane, 8, 8).unwrap();
        fused_f32().execute_forward(&mut image, 2).unwrap();
        assert!(plane.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_impulse_matches_separable_f32() {
        let mut fused_plane = vec![0f32; 64 * 64];
        fused_plane[32 * 64 + 32] = 1.0;
        let mut reference_plane = fused_plane.clone();
        let mut fused_image = ImageMut::new(&mut fused_plane, 64, 64).unwrap();
        fused_f32().execute_forward(&mut fused_image, 3).unwrap();
        let mut reference_image = ImageMut::new(&mut reference_plane, 64, 64).unwrap();
        separable_f32()
            .execute_forward(&mut reference_image, 3)
            .unwrap();
        assert_close(&fused_plane, &reference_plane, 1e-5);
    }

    #[test]
    fn test_fused_rejects_unsupported_geometry() {
        let mut plane = vec![0f32; 12 * 12];
        let mut image = ImageMut::new(&mut plane, 12, 12).unwrap();
        assert!(matches!(
            fused_f32().execute_forward(&mut image, 2),
            Err(FuseletError::UnsupportedGeometry(12, 12, 2))
        ));

        let mut plane = vec![0f32; 10 * 10];
        let mut image = ImageMut::new(&mut plane, 10, 10).unwrap();
        assert!(matches!(
            fused_f32().execute_forward(&mut image, 1),
            Err(FuseletError::UnsupportedGeometry(10, 10, 1))
        ));
    }

    #[test]
    fn test_dispatch_falls_back_to_separable() {
        let executor = DispatchCdf97 {
            kernel: Cdf97Int::default(),
        };
        let original = test_pattern_i32(12);
        let mut plane = original.clone();
        let mut image = ImageMut::new(&mut plane, 12, 12).unwrap();
        executor.execute_forward(&mut image, 2).unwrap();
        let mut image = ImageMut::new(&mut plane, 12, 12).unwrap();
        executor.execute_inverse(&mut image, 2).unwrap();
        assert_eq!(original, plane);
    }

    #[test]
    fn test_geometry_predicate() {
        assert!(fused_geometry_supported(16, 16, 2));
        assert!(fused_geometry_supported(16, 16, 3));
        assert!(fused_geometry_supported(64, 32, 3));
        assert!(!fused_geometry_supported(16, 16, 4));
        assert!(!fused_geometry_supported(12, 16, 1));
        assert!(!fused_geometry_supported(16, 16, 0));
    }
}
