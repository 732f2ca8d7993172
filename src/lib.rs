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
#![allow(clippy::excessive_precision)]

use std::fmt::Debug;
use std::ops::{Add, Sub};
use std::sync::Arc;

mod butterfly;
mod core4x4;
mod err;
mod image;
mod kernel;
mod multiscale;
mod reflect;
mod separable;

use crate::kernel::{Cdf97Float, Cdf97Int};
use crate::multiscale::{DispatchCdf97, FusedCdf97};
use crate::separable::SeparableCdf97;
pub use err::FuseletError;
pub use image::ImageMut;
pub use multiscale::fused_geometry_supported;

/// Numeric sample types the transform executors operate on.
pub trait WaveletSample:
    Copy
    + Default
    + Debug
    + PartialEq
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Send
    + Sync
    + 'static
{
}

impl WaveletSample for f32 {}
impl WaveletSample for f64 {}
impl WaveletSample for i32 {}

/// Trait for performing the **forward 2-D discrete wavelet transform**.
///
/// # Type Parameters
/// - `T`: The numeric type of the image samples (e.g., `f32` or `i32`).
pub trait Dwt2DForwardExecutor<T> {
    /// Decomposes the image in place into `levels` scales of packed
    /// subbands: the coarsest LL rectangle sits in the top-left corner,
    /// surrounded by successively larger HL/LH/HH rings.
    ///
    /// # Parameters
    /// - `image`: Strided view over the plane to transform in place.
    /// - `levels`: Number of decomposition levels, at least 1.
    ///
    /// # Returns
    /// `Ok(())` on success, or a `FuseletError` when the geometry does not
    /// support the requested depth.
    fn execute_forward(
        &self,
        image: &mut ImageMut<'_, T>,
        levels: usize,
    ) -> Result<(), FuseletError>;
}

/// Trait for performing the **inverse 2-D discrete wavelet transform**.
///
/// # Type Parameters
/// - `T`: The numeric type of the coefficients (e.g., `f32` or `i32`).
pub trait Dwt2DInverseExecutor<T> {
    /// Reconstructs the image in place from `levels` scales of packed
    /// subbands produced by the matching forward transform.
    ///
    /// # Parameters
    /// - `image`: Strided view over the coefficient plane.
    /// - `levels`: Number of decomposition levels that were applied.
    ///
    /// # Returns
    /// `Ok(())` on success, or a `FuseletError` when the geometry does not
    /// support the requested depth.
    fn execute_inverse(
        &self,
        image: &mut ImageMut<'_, T>,
        levels: usize,
    ) -> Result<(), FuseletError>;
}

/// Full 2-D DWT executor combining forward and inverse operations.
pub trait Dwt2DExecutor<T>:
    Dwt2DForwardExecutor<T> + Dwt2DInverseExecutor<T> + Send + Sync
{
}

/// Deepest decomposition the separable path supports for this geometry:
/// every processed scale must keep both extents at least 4 samples.
pub fn max_levels(size_x: usize, size_y: usize) -> usize {
    let (mut sx, mut sy) = (size_x, size_y);
    let mut levels = 0;
    while sx >= 4 && sy >= 4 {
        levels += 1;
        sx = sx.div_ceil(2);
        sy = sy.div_ceil(2);
    }
    levels
}

/// Frequency-orientation classification of a coefficient within one
/// decomposition level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subband {
    /// Low-pass in both axes; the approximation handed to the next level.
    LL,
    /// High-pass horizontally, low-pass vertically.
    HL,
    /// Low-pass horizontally, high-pass vertically.
    LH,
    /// High-pass in both axes.
    HH,
}

#[inline]
fn halved(mut s: usize, times: usize) -> usize {
    for _ in 0..times {
        s = s.div_ceil(2);
    }
    s
}

/// Rectangle `(x, y, width, height)` a subband occupies in the packed plane.
///
/// For the detail bands `level` is the zero-based scale that produced them;
/// for [`Subband::LL`] it is the total number of levels applied, and the
/// returned rectangle is the final approximation block.
pub fn band_rect(
    size_x: usize,
    size_y: usize,
    level: usize,
    band: Subband,
) -> (usize, usize, usize, usize) {
    match band {
        Subband::LL => (0, 0, halved(size_x, level), halved(size_y, level)),
        Subband::HL => {
            let (wx, wy) = (halved(size_x, level), halved(size_y, level));
            let (nx, ny) = (wx.div_ceil(2), wy.div_ceil(2));
            (nx, 0, wx - nx, ny)
        }
        Subband::LH => {
            let (wx, wy) = (halved(size_x, level), halved(size_y, level));
            let (nx, ny) = (wx.div_ceil(2), wy.div_ceil(2));
            (0, ny, nx, wy - ny)
        }
        Subband::HH => {
            let (wx, wy) = (halved(size_x, level), halved(size_y, level));
            let (nx, ny) = (wx.div_ceil(2), wy.div_ceil(2));
            (nx, ny, wx - nx, wy - ny)
        }
    }
}

/// Factory for CDF 9/7 transform executors.
///
/// The plain `make_cdf97_*` constructors return executors that pick the fused
/// multiscale path whenever the geometry tiles under it and fall back to the
/// per-level separable path otherwise. The `_fused_` and `_separable_`
/// constructors pin one of the two paths.
pub struct Fuselet {}

impl Fuselet {
    /// Creates a CDF 9/7 executor for `f32` images.
    ///
    /// # Returns
    /// A boxed `Dwt2DExecutor<f32>` that is thread-safe and can be shared
    /// across threads.
    pub fn make_cdf97_f32() -> Arc<dyn Dwt2DExecutor<f32> + Send + Sync> {
        Arc::new(DispatchCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        })
    }

    /// Creates a CDF 9/7 executor for `f64` images.
    ///
    /// Same as [`Fuselet::make_cdf97_f32`], but for double-precision samples.
    pub fn make_cdf97_f64() -> Arc<dyn Dwt2DExecutor<f64> + Send + Sync> {
        Arc::new(DispatchCdf97 {
            kernel: Cdf97Float::<f64>::default(),
        })
    }

    /// Creates a reversible integer CDF 9/7 executor for `i32` images.
    ///
    /// # Description
    /// The integer variant replaces each weight multiplication with a
    /// fixed-point multiply, round and shift, and applies no output scaling,
    /// so forward followed by inverse reproduces the input exactly.
    ///
    /// # Dynamic Range
    /// Safe for amplitudes up to roughly ±(1 << 28); intermediate lifting
    /// sums are evaluated in 64-bit arithmetic.
    pub fn make_cdf97_i32() -> Arc<dyn Dwt2DExecutor<i32> + Send + Sync> {
        Arc::new(DispatchCdf97 {
            kernel: Cdf97Int::default(),
        })
    }

    /// Creates an executor pinned to the fused multiscale path for `f32`.
    ///
    /// # Description
    /// One blocked raster pass computes all requested levels, keeping every
    /// intermediate LL sample in locals. The geometry must satisfy
    /// [`fused_geometry_supported`], otherwise the forward call returns
    /// [`FuseletError::UnsupportedGeometry`].
    pub fn make_cdf97_fused_f32() -> Arc<dyn Dwt2DExecutor<f32> + Send + Sync> {
        Arc::new(FusedCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        })
    }

    /// Creates an executor pinned to the fused multiscale path for `f64`.
    ///
    /// Same as [`Fuselet::make_cdf97_fused_f32`], but for double-precision
    /// samples.
    pub fn make_cdf97_fused_f64() -> Arc<dyn Dwt2DExecutor<f64> + Send + Sync> {
        Arc::new(FusedCdf97 {
            kernel: Cdf97Float::<f64>::default(),
        })
    }

    /// Creates an executor pinned to the fused multiscale path for `i32`.
    ///
    /// The fused integer forward is coefficient-exact against the separable
    /// path, and exactly reversible through the inverse.
    pub fn make_cdf97_fused_i32() -> Arc<dyn Dwt2DExecutor<i32> + Send + Sync> {
        Arc::new(FusedCdf97 {
            kernel: Cdf97Int::default(),
        })
    }

    /// Creates an executor pinned to the per-level separable path for `f32`.
    ///
    /// The separable path supports any geometry with both extents at least 4
    /// at every processed scale and serves as the correctness oracle for the
    /// fused path.
    pub fn make_cdf97_separable_f32() -> Arc<dyn Dwt2DExecutor<f32> + Send + Sync> {
        Arc::new(SeparableCdf97 {
            kernel: Cdf97Float::<f32>::default(),
        })
    }

    /// Creates an executor pinned to the per-level separable path for `f64`.
    ///
    /// Same as [`Fuselet::make_cdf97_separable_f32`], but for
    /// double-precision samples.
    pub fn make_cdf97_separable_f64() -> Arc<dyn Dwt2DExecutor<f64> + Send + Sync> {
        Arc::new(SeparableCdf97 {
            kernel: Cdf97Float::<f64>::default(),
        })
    }

    /// Creates an executor pinned to the per-level separable path for `i32`.
    pub fn make_cdf97_separable_i32() -> Arc<dyn Dwt2DExecutor<i32> + Send + Sync> {
        Arc::new(SeparableCdf97 {
            kernel: Cdf97Int::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_roundtrip_f32() {
        let executor = Fuselet::make_cdf97_f32();
        let original: Vec<f32> = (0..16 * 16).map(|i| (i % 255) as f32).collect();
        let mut plane = original.clone();
        let mut image = ImageMut::new(&mut plane, 16, 16).unwrap();
        executor.execute_forward(&mut image, 2).unwrap();
        let mut image = ImageMut::new(&mut plane, 16, 16).unwrap();
        executor.execute_inverse(&mut image, 2).unwrap();
        for (o, r) in original.iter().zip(plane.iter()) {
            assert!((o - r).abs() < 1e-3);
        }
    }

    #[test]
    fn test_factory_roundtrip_i32_exact() {
        let executor = Fuselet::make_cdf97_i32();
        let original: Vec<i32> = (0..32 * 32).map(|i| (i * 7 % 1733) - 800).collect();
        let mut plane = original.clone();
        let mut image = ImageMut::new(&mut plane, 32, 32).unwrap();
        executor.execute_forward(&mut image, 3).unwrap();
        let mut image = ImageMut::new(&mut plane, 32, 32).unwrap();
        executor.execute_inverse(&mut image, 3).unwrap();
        assert_eq!(original, plane);
    }

    #[test]
    fn test_max_levels() {
        assert_eq!(max_levels(8, 8), 2);
        assert_eq!(max_levels(16, 16), 3);
        assert_eq!(max_levels(64, 4), 1);
        assert_eq!(max_levels(3, 64), 0);
    }

    #[test]
    fn test_band_rects_tile_the_plane() {
        let (sx, sy) = (16usize, 16usize);
        let mut covered = vec![0u8; sx * sy];
        let levels = 2;
        for level in 0..levels {
            for band in [Subband::HL, Subband::LH, Subband::HH] {
                let (x0, y0, w, h) = band_rect(sx, sy, level, band);
                for y in y0..y0 + h {
                    for x in x0..x0 + w {
                        covered[y * sx + x] += 1;
                    }
                }
            }
        }
        let (x0, y0, w, h) = band_rect(sx, sy, levels, Subband::LL);
        assert_eq!((x0, y0, w, h), (0, 0, 4, 4));
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                covered[y * sx + x] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }
}
