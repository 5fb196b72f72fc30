//! Conversions between color and grayscale grids
//! Gray = round((R + G + B) / 3), the reverse broadcasts gray to every channel

use crate::models::{ColorGrid, GrayGrid, Rgb};
use rayon::prelude::*;

/// Average the three channels of every pixel
pub fn color_to_gray(color: &ColorGrid) -> GrayGrid {
    let (width, height) = color.dimensions();
    let mut gray = GrayGrid::new(width, height);
    let src = color.as_slice();

    // Process rows in parallel
    gray.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let line = &src[y * width..(y + 1) * width];
            for (dst, px) in row.iter_mut().zip(line) {
                let avg = ((px.r + px.g + px.b) as f64 / 3.0).round();
                *dst = avg.clamp(0.0, 255.0) as u8;
            }
        });

    gray
}

/// Replicate each gray value to all channels
pub fn gray_to_color(gray: &GrayGrid) -> ColorGrid {
    gray.map(|v| Rgb::splat(v as f32))
}
