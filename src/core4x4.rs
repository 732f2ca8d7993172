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
use crate::butterfly::butterfly_step;
use crate::err::{FuseletError, try_vec};
use crate::kernel::LiftKernel;

/// Per-line lifting state for one scale, indexed by the orthogonal line
/// coordinate. Slot `(coord)` must always hold the carry left behind by the
/// previous tile along that line; tiles therefore have to visit each line in
/// a fixed left-to-right (or top-to-bottom) order.
pub(crate) struct CarryPlane<C> {
    slots: Vec<[C; 4]>,
    offset: i64,
}

impl<C: Copy + Default> CarryPlane<C> {
    pub(crate) fn new(len: usize, offset: i64) -> Result<Self, FuseletError> {
        Ok(Self {
            slots: try_vec![[C::default(); 4]; len],
            offset,
        })
    }

    #[inline]
    pub(crate) fn slot(&mut self, coord: i64) -> &mut [C; 4] {
        &mut self.slots[(coord + self.offset) as usize]
    }
}

#[inline]
pub(crate) fn transpose4<T: Copy + Default>(m: [[T; 4]; 4]) -> [[T; 4]; 4] {
    let mut t = [[T::default(); 4]; 4];
    for (r, row) in m.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            t[c][r] = *v;
        }
    }
    t
}

/// One vertical plus horizontal lifting step over a 4x4 window of samples.
///
/// Runs two butterfly steps along each of the four rows against the per-row
/// carries, transposes the intermediate tile in locals, runs two steps along
/// each of the four former columns against the per-column carries, and
/// rescales. Because the butterfly trails its input by four positions, the
/// returned tile belongs to positions `(x-4.., y-4..)`; even local
/// coordinates carry the low result in that axis, so cells `(0,0)`, `(0,2)`,
/// `(2,0)`, `(2,2)` form the 2x2 LL quadrant and the rest are the
/// HL/LH/HH coefficients.
pub(crate) fn unified_core<K: LiftKernel>(
    kernel: &K,
    window: [[K::Sample; 4]; 4],
    row_carry: &mut CarryPlane<K::Carry>,
    y: i64,
    col_carry: &mut CarryPlane<K::Carry>,
    x: i64,
) -> [[K::Sample; 4]; 4] {
    let mut mid = [[K::Sample::default(); 4]; 4];
    for (r, row) in window.iter().enumerate() {
        let carry = row_carry.slot(y + r as i64);
        let (l0, h0) = butterfly_step(kernel, carry, row[0], row[1]);
        let (l1, h1) = butterfly_step(kernel, carry, row[2], row[3]);
        mid[r] = [l0, h0, l1, h1];
    }

    let lanes = transpose4(mid);

    let mut out_t = [[K::Sample::default(); 4]; 4];
    for (i, lane) in lanes.iter().enumerate() {
        let carry = col_carry.slot(x + i as i64);
        let (l0, h0) = butterfly_step(kernel, carry, lane[0], lane[1]);
        let (l1, h1) = butterfly_step(kernel, carry, lane[2], lane[3]);
        out_t[i] = [l0, h0, l1, h1];
    }

    let mut out = transpose4(out_t);
    for (r, row) in out.iter_mut().enumerate() {
        for (i, v) in row.iter_mut().enumerate() {
            if i.is_multiple_of(2) && r.is_multiple_of(2) {
                *v = kernel.scale_ll(*v);
            } else if !i.is_multiple_of(2) && !r.is_multiple_of(2) {
                *v = kernel.scale_hh(*v);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Cdf97Float;

    #[test]
    fn test_zero_window_stays_zero() {
        let kernel = Cdf97Float::<f32>::default();
        let mut rows = CarryPlane::<f32>::new(16, 4).unwrap();
        let mut cols = CarryPlane::<f32>::new(16, 4).unwrap();
        let out = unified_core(&kernel, [[0f32; 4]; 4], &mut rows, 0, &mut cols, 0);
        assert_eq!(out, [[0f32; 4]; 4]);
    }

    #[test]
    fn test_transpose4() {
        let m = [[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]];
        let t = transpose4(m);
        assert_eq!(t[0], [0, 4, 8, 12]);
        assert_eq!(t[3], [3, 7, 11, 15]);
        assert_eq!(transpose4(t), m);
    }
}
