//! Edge enhancement with a discrete Laplacian of Gaussian
//!
//! The kernel is applied as-is near the borders: taps falling outside the grid
//! contribute nothing and the kernel is not renormalized, so the outermost two
//! rows and columns get a different response than the interior.

use crate::config::LogKernel;
use crate::models::{GrayGrid, PixelGrid};
use rayon::prelude::*;

/// 5x5 Laplacian of Gaussian, sums to zero
pub const LOG_5X5: [[i32; 5]; 5] = [
    [0, 0, 1, 0, 0],
    [0, 1, 2, 1, 0],
    [1, 2, -16, 2, 1],
    [0, 1, 2, 1, 0],
    [0, 0, 1, 0, 0],
];

/// 3x3 discrete Laplacian, sums to zero
pub const LAPLACIAN_3X3: [[i32; 3]; 3] = [[0, 1, 0], [1, -4, 1], [0, 1, 0]];

/// Convolve with the selected kernel and rescale the response to 0..=255
///
/// A flat input has no edges and gives an all-zero grid. Without this check
/// the clipped border taps would still produce a response frame.
pub fn laplacian_of_gaussian(gray: &GrayGrid, kernel: LogKernel) -> GrayGrid {
    let pixels = gray.as_slice();
    if let Some(&first) = pixels.first() {
        if pixels.iter().all(|&v| v == first) {
            log::warn!("flat input image ({}), no edges", first);
            return GrayGrid::new(gray.width(), gray.height());
        }
    }

    let raw = match kernel {
        LogKernel::Large5 => convolve(gray, &LOG_5X5),
        LogKernel::Small3 => convolve(gray, &LAPLACIAN_3X3),
    };
    normalize(&raw)
}

/// Signed convolution with zero contribution from taps outside the grid
pub fn convolve<const N: usize>(gray: &GrayGrid, kernel: &[[i32; N]; N]) -> PixelGrid<i32> {
    let (width, height) = gray.dimensions();
    let half = (N / 2) as isize;
    let src = gray.as_slice();
    let mut out = PixelGrid::<i32>::new(width, height);

    // Process rows in parallel
    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, dst) in row.iter_mut().enumerate() {
                let mut sum = 0i32;
                for (ky, krow) in kernel.iter().enumerate() {
                    let sy = y as isize + ky as isize - half;
                    if sy < 0 || sy >= height as isize {
                        continue;
                    }
                    let line = &src[sy as usize * width..(sy as usize + 1) * width];
                    for (kx, &k) in krow.iter().enumerate() {
                        let sx = x as isize + kx as isize - half;
                        if k == 0 || sx < 0 || sx >= width as isize {
                            continue;
                        }
                        sum += k * line[sx as usize] as i32;
                    }
                }
                *dst = sum;
            }
        });

    out
}

/// Linearly map `min..=max` of the raw response onto `0..=255`
///
/// A flat response (min == max) carries no edges and maps to all zeros.
pub fn normalize(raw: &PixelGrid<i32>) -> GrayGrid {
    let (min, max) = raw
        .as_slice()
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min == max {
        log::warn!("flat edge response ({}), normalizing to zero", min);
        return GrayGrid::new(raw.width(), raw.height());
    }

    let span = (max - min) as f32;
    raw.map(|v| (((v - min) as f32 / span) * 255.0).round() as u8)
}
