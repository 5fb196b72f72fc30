/// Compositing of detected outlines onto the source image
use crate::error::{DetectError, Result};
use crate::models::{CircleCandidate, ColorGrid, GrayGrid, Rgb};
use rayon::prelude::*;

/// Highlight color for outline pixels
pub const HIGHLIGHT: Rgb = Rgb {
    r: 255.0,
    g: 0.0,
    b: 0.0,
};

/// Rasterize circle outlines at 1 degree steps into a fresh binary grid
///
/// Outline points outside the grid are dropped.
pub fn draw_circles(circles: &[CircleCandidate], width: usize, height: usize) -> GrayGrid {
    let mut outlines = GrayGrid::new(width, height);
    for circle in circles {
        for p in circle.outline() {
            if p.x >= 0 && p.y >= 0 {
                outlines.set(p.x as usize, p.y as usize, 255);
            }
        }
    }
    outlines
}

/// Paint outline pixels with [`HIGHLIGHT`] and dim everything else to a third
pub fn composite(color: &mut ColorGrid, outlines: &GrayGrid) -> Result<()> {
    if !color.same_size(outlines) {
        return Err(DetectError::DimensionMismatch {
            expected: color.dimensions(),
            actual: outlines.dimensions(),
        });
    }
    let width = color.width();
    let mask = outlines.as_slice();

    color
        .as_mut_slice()
        .par_chunks_mut(width)
        .zip(mask.par_chunks(width))
        .for_each(|(row, mask_row)| {
            for (px, &m) in row.iter_mut().zip(mask_row) {
                if m > 0 {
                    *px = HIGHLIGHT;
                } else {
                    px.r /= 3.0;
                    px.g /= 3.0;
                    px.b /= 3.0;
                }
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn test_composite_highlights_and_dims() {
        let mut color = ColorGrid::filled(4, 3, Rgb::new(90.0, 60.0, 30.0));
        let mut outlines = GrayGrid::new(4, 3);
        outlines.set(2, 1, 255);

        composite(&mut color, &outlines).unwrap();
        assert_eq!(color[(2, 1)], HIGHLIGHT);
        assert_eq!(color[(0, 0)], Rgb::new(30.0, 20.0, 10.0));
        assert_eq!(color[(3, 2)], Rgb::new(30.0, 20.0, 10.0));
    }

    #[test]
    fn test_composite_size_mismatch() {
        let mut color = ColorGrid::new(4, 3);
        let outlines = GrayGrid::new(3, 4);
        let err = composite(&mut color, &outlines).unwrap_err();
        assert!(matches!(
            err,
            DetectError::DimensionMismatch {
                expected: (4, 3),
                actual: (3, 4)
            }
        ));
    }

    #[test]
    fn test_draw_circles_clips_to_grid() {
        let circle = CircleCandidate::new(Point::new(2, 10), 5, 1);
        let outlines = draw_circles(&[circle], 20, 20);
        assert_eq!(outlines.get(7, 10), Some(255));
        assert_eq!(outlines.get(2, 15), Some(255));
        assert_eq!(outlines.get(2, 10), Some(0));
        // left half falls outside
        assert!(outlines.count_foreground() > 0);
        for (y, row) in outlines.rows().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v > 0 {
                    let d = Point::new(x as i32, y as i32).distance_squared(&circle.center);
                    assert!((16..=36).contains(&d), "({}, {}) off the circle", x, y);
                }
            }
        }
    }
}
