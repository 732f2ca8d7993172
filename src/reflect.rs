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

/// Resolves a virtual coordinate to a real one by whole-sample symmetric
/// extension, the boundary rule of the biorthogonal 9/7 filter bank.
///
/// The candidate index is `pos + offset - overlap`. Negative candidates mirror
/// around sample `0`, candidates at or past `size` mirror around `size - 1`.
/// The fold repeats until the index lands in `[0, size)`, so the mapping is
/// total for any virtual coordinate, not only those within one mirror span.
#[inline]
pub(crate) fn reflect(pos: i64, offset: i64, overlap: i64, size: usize) -> usize {
    debug_assert!(size != 0);
    let mut candidate = pos + offset - overlap;
    if size == 1 {
        return 0;
    }
    let last = size as i64 - 1;
    loop {
        if candidate < 0 {
            candidate = -candidate;
        } else if candidate > last {
            candidate = 2 * last - candidate;
        } else {
            return candidate as usize;
        }
    }
}

/// Write-side twin of [`reflect`]: computes the same candidate index but
/// returns `None` when it falls outside `[0, size)` instead of mirroring.
///
/// Coefficients produced for guard and overlap positions must be dropped, not
/// folded back, otherwise boundary coefficients would be written twice.
#[inline]
pub(crate) fn reflect_checked(pos: i64, offset: i64, overlap: i64, size: usize) -> Option<usize> {
    let candidate = pos + offset - overlap;
    if candidate < 0 || candidate >= size as i64 {
        return None;
    }
    Some(candidate as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_identity_in_range() {
        for pos in 0..9i64 {
            assert_eq!(reflect(pos, 0, 0, 9), pos as usize);
        }
    }

    #[test]
    fn test_reflect_mirrors_left_edge() {
        assert_eq!(reflect(-1, 0, 0, 8), 1);
        assert_eq!(reflect(-2, 0, 0, 8), 2);
        assert_eq!(reflect(-7, 0, 0, 8), 7);
    }

    #[test]
    fn test_reflect_mirrors_right_edge() {
        assert_eq!(reflect(8, 0, 0, 8), 6);
        assert_eq!(reflect(9, 0, 0, 8), 5);
        assert_eq!(reflect(14, 0, 0, 8), 0);
    }

    #[test]
    fn test_reflect_total_over_padded_range() {
        for size in [4usize, 5, 8, 13, 16] {
            let overlap = 4 * size as i64;
            for pos in -overlap..(size as i64 + overlap) {
                let real = reflect(pos, 0, 0, size);
                assert!(real < size, "pos {pos} size {size} gave {real}");
            }
        }
    }

    #[test]
    fn test_reflect_applies_offset_and_overlap() {
        assert_eq!(reflect(3, 2, 1, 16), 4);
        assert_eq!(reflect(0, 0, 3, 16), 3);
    }

    #[test]
    fn test_reflect_checked_drops_virtual_targets() {
        assert_eq!(reflect_checked(-1, 0, 0, 8), None);
        assert_eq!(reflect_checked(8, 0, 0, 8), None);
        assert_eq!(reflect_checked(0, 0, 0, 8), Some(0));
        assert_eq!(reflect_checked(7, 0, 0, 8), Some(7));
        assert_eq!(reflect_checked(10, 1, 4, 8), Some(7));
    }
}
