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
use crate::err::FuseletError;

/// Mutable strided view over a rectangular plane of samples.
///
/// Addressing is `base + x * stride_x + y * stride_y` with both strides in
/// elements, so sub-rectangles and transposed walks are views over the same
/// storage rather than copies. The transform mutates the plane in place
/// through this view.
#[derive(Debug)]
pub struct ImageMut<'a, T> {
    pub(crate) data: &'a mut [T],
    pub(crate) size_x: usize,
    pub(crate) size_y: usize,
    pub(crate) stride_x: usize,
    pub(crate) stride_y: usize,
}

impl<'a, T: Copy> ImageMut<'a, T> {
    /// Wraps a dense row-major plane of `size_x` by `size_y` samples.
    ///
    /// # Parameters
    /// - `data`: Backing storage, at least `size_x * size_y` elements.
    /// - `size_x`, `size_y`: Logical extents of the plane.
    ///
    /// # Returns
    /// `Ok(ImageMut)` on success, or a `FuseletError` for zero extents or
    /// undersized storage.
    pub fn new(data: &'a mut [T], size_x: usize, size_y: usize) -> Result<Self, FuseletError> {
        Self::from_strided(data, size_x, size_y, 1, size_x)
    }

    /// Wraps a plane with explicit element strides.
    ///
    /// # Parameters
    /// - `stride_x`: Element distance between horizontal neighbors.
    /// - `stride_y`: Element distance between vertical neighbors.
    pub fn from_strided(
        data: &'a mut [T],
        size_x: usize,
        size_y: usize,
        stride_x: usize,
        stride_y: usize,
    ) -> Result<Self, FuseletError> {
        if size_x == 0 || size_y == 0 {
            return Err(FuseletError::ZeroedBaseSize);
        }
        if stride_x == 0 || stride_y == 0 {
            return Err(FuseletError::StrideTooSmall(0, 1));
        }
        let span_x = (size_x - 1)
            .checked_mul(stride_x)
            .ok_or(FuseletError::Overflow)?;
        let span_y = (size_y - 1)
            .checked_mul(stride_y)
            .ok_or(FuseletError::Overflow)?;
        let required = span_x
            .checked_add(span_y)
            .and_then(|v| v.checked_add(1))
            .ok_or(FuseletError::Overflow)?;
        if data.len() < required {
            return Err(FuseletError::InputSize(required, data.len()));
        }
        Ok(Self {
            data,
            size_x,
            size_y,
            stride_x,
            stride_y,
        })
    }

    /// Horizontal extent in samples.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Vertical extent in samples.
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Reborrows the same storage with the axes swapped.
    ///
    /// A transform applied through the transposed view walks columns where the
    /// original walks rows, which is what column passes use instead of a
    /// gather-scatter copy.
    #[inline]
    pub fn transposed(&mut self) -> ImageMut<'_, T> {
        ImageMut {
            data: self.data,
            size_x: self.size_y,
            size_y: self.size_x,
            stride_x: self.stride_y,
            stride_y: self.stride_x,
        }
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size_x && y < self.size_y);
        x * self.stride_x + y * self.stride_y
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }
}
