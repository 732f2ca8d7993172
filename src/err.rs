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

#[derive(Clone, Debug)]
pub enum FuseletError {
    OutOfMemory(usize),
    Overflow,
    ZeroedBaseSize,
    InputSize(usize, usize),
    MinImageSize(usize, usize),
    LevelsOutOfRange(usize, usize),
    UnsupportedGeometry(usize, usize, usize),
    StrideTooSmall(usize, usize),
}

impl Error for FuseletError {}

impl std::fmt::Display for FuseletError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FuseletError::OutOfMemory(length) => {
                f.write_fmt(format_args!("Cannot allocate {length} bytes to vector"))
            }
            FuseletError::Overflow => f.write_str("Overflow is happened"),
            FuseletError::ZeroedBaseSize => f.write_str("Image dimensions must not be zero"),
            FuseletError::InputSize(expected, actual) => f.write_fmt(format_args!(
                "Image storage must hold {expected} samples, but it holds {actual}"
            )),
            FuseletError::MinImageSize(actual, min) => f.write_fmt(format_args!(
                "Image extent {actual} can't be less than {min}"
            )),
            FuseletError::LevelsOutOfRange(levels, max) => f.write_fmt(format_args!(
                "Decomposition depth {levels} is not in the supported range 1..={max}"
            )),
            FuseletError::UnsupportedGeometry(size_x, size_y, levels) => {
                f.write_fmt(format_args!(
                    "Image {size_x}x{size_y} does not tile under {levels} fused levels, extents must be multiples of {}",
                    1usize << (levels + 1)
                ))
            }
            FuseletError::StrideTooSmall(stride, extent) => f.write_fmt(format_args!(
                "Stride {stride} is smaller than the image extent {extent}"
            )),
        }
    }
}

macro_rules! try_vec {
    () => {
        Vec::new()
    };
    ($elem:expr; $n:expr) => {{
        let mut v = Vec::new();
        v.try_reserve_exact($n)
            .map_err(|_| crate::err::FuseletError::OutOfMemory($n))?;
        v.resize($n, $elem);
        v
    }};
}

use std::error::Error;
use std::fmt::Formatter;
pub(crate) use try_vec;
