use crate::error::Result;
use crate::models::{ColorGrid, GrayGrid};
use crate::utils::grayscale::color_to_gray;
use std::path::Path;

/// Load any image the `image` crate can decode as a color grid.
pub fn load_color<P: AsRef<Path>>(path: P) -> Result<ColorGrid> {
    let img = image::open(path)?;
    ColorGrid::from_rgb_image(&img.to_rgb8())
}

/// Load an image and derive its grayscale grid.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayGrid> {
    load_color(path).map(|color| color_to_gray(&color))
}

/// Save a color grid; the format follows the file extension.
pub fn save_color<P: AsRef<Path>>(color: &ColorGrid, path: P) -> Result<()> {
    color.to_rgb_image().save(path)?;
    Ok(())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryStats {
    /// Count of foreground pixels.
    pub foreground_pixels: usize,
    /// Total pixels in the grid.
    pub total_pixels: usize,
    /// Ratio of foreground pixels to total pixels.
    pub foreground_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &GrayGrid) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray.as_slice() {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = (sum / gray.area() as u64) as u8;
    GrayStats { min, max, avg }
}

/// Compute foreground pixel stats for a binary grid.
pub fn binary_stats(binary: &GrayGrid) -> BinaryStats {
    let foreground = binary.count_foreground();
    let total = binary.area();
    BinaryStats {
        foreground_pixels: foreground,
        total_pixels: total,
        foreground_ratio: foreground as f64 / total as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;
    use crate::models::Rgb;

    #[test]
    fn test_grayscale_stats() {
        let gray = GrayGrid::from_vec(2, 2, vec![10, 20, 30, 41]).unwrap();
        let stats = grayscale_stats(&gray);
        assert_eq!(
            stats,
            GrayStats {
                min: 10,
                max: 41,
                avg: 25
            }
        );
    }

    #[test]
    fn test_binary_stats() {
        let binary = GrayGrid::from_vec(4, 1, vec![0, 255, 0, 255]).unwrap();
        let stats = binary_stats(&binary);
        assert_eq!(stats.foreground_pixels, 2);
        assert_eq!(stats.total_pixels, 4);
        assert!((stats.foreground_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_save_and_load_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bmp");

        let mut color = ColorGrid::filled(6, 4, Rgb::new(12.0, 34.0, 56.0));
        color[(5, 3)] = Rgb::new(255.0, 0.0, 0.0);
        save_color(&color, &path).unwrap();

        let loaded = load_color(&path).unwrap();
        assert_eq!(loaded, color);
        let gray = load_gray(&path).unwrap();
        assert_eq!(gray[(0, 0)], 34);
        assert_eq!(gray[(5, 3)], 85);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_color(dir.path().join("missing.bmp")).unwrap_err();
        assert!(matches!(err, DetectError::ImageCodec(_)));
    }
}
