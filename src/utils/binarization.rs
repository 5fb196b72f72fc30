use crate::models::GrayGrid;

/// Number of intensity levels
pub const LEVELS: usize = 256;

/// Intensity histogram of a grayscale grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u32; LEVELS],
    total: u64,
}

impl Histogram {
    /// Count every intensity in the grid
    pub fn from_grid(gray: &GrayGrid) -> Self {
        let mut counts = [0u32; LEVELS];
        for &pixel in gray.as_slice() {
            counts[pixel as usize] += 1;
        }
        Self {
            counts,
            total: gray.area() as u64,
        }
    }

    /// Build from raw bucket counts
    pub fn from_counts(counts: [u32; LEVELS]) -> Self {
        let total = counts.iter().map(|&c| c as u64).sum();
        Self { counts, total }
    }

    /// Bucket counts
    pub fn counts(&self) -> &[u32; LEVELS] {
        &self.counts
    }

    /// Number of pixels counted
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Otsu's threshold: the split maximizing between-class variance
///
/// Candidate splits put intensities `0..=t` in the first class for `t` in
/// `0..255`. The first maximal split wins. The returned value is the lowest
/// intensity of the upper class, so `pixel >= threshold` selects it.
pub fn otsu_threshold(hist: &Histogram) -> u8 {
    let total = hist.total();
    if total == 0 {
        return 0;
    }
    let intensity_sum: u64 = hist
        .counts()
        .iter()
        .enumerate()
        .map(|(i, &c)| i as u64 * c as u64)
        .sum();

    let mut best_threshold = 0u8;
    let mut best_sigma = 0.0f64;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    for t in 0..LEVELS - 1 {
        let count = hist.counts()[t] as u64;
        class1_pixels += count;
        class1_sum += t as u64 * count;

        let class2_pixels = total - class1_pixels;
        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_prob = class1_pixels as f64 / total as f64;
        let class2_prob = 1.0 - class1_prob;
        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = (intensity_sum - class1_sum) as f64 / class2_pixels as f64;
        let delta = class1_mean - class2_mean;
        let sigma = class1_prob * class2_prob * delta * delta;

        if sigma > best_sigma {
            best_sigma = sigma;
            best_threshold = (t + 1) as u8;
        }
    }

    best_threshold
}

/// Pixels at or above `threshold` become 255, the rest 0
pub fn binarize(gray: &mut GrayGrid, threshold: u32) {
    for pixel in gray.as_mut_slice() {
        *pixel = if *pixel as u32 >= threshold { 255 } else { 0 };
    }
}

/// Histogram, Otsu selection and binarization in one step
///
/// The binarization cut is `multiplier * otsu`, truncated. Returns the raw Otsu threshold.
pub fn threshold_image(gray: &mut GrayGrid, multiplier: f32) -> u8 {
    let hist = Histogram::from_grid(gray);
    let threshold = otsu_threshold(&hist);
    let cut = (multiplier * threshold as f32) as u32;
    log::debug!("otsu threshold {} (cut {})", threshold, cut);
    binarize(gray, cut);
    threshold
}

/// Positive pixels become 0, zero pixels become 255
pub fn invert(gray: &mut GrayGrid) {
    for pixel in gray.as_mut_slice() {
        *pixel = if *pixel > 0 { 0 } else { 255 };
    }
}

/// Force the outermost `border` rows and columns to 0
pub fn paint_borders(gray: &mut GrayGrid, border: usize) {
    let (width, height) = gray.dimensions();
    for (y, row) in gray.as_mut_slice().chunks_exact_mut(width).enumerate() {
        if y < border || y + border >= height {
            row.fill(0);
            continue;
        }
        let edge = border.min(width);
        row[..edge].fill(0);
        row[width - edge..].fill(0);
    }
}
