/// Per-component bounding boxes and shape-based rejection
use crate::config::SegmentLimits;
use crate::models::{GrayGrid, LabelGrid, Point, Segment};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Why a segment was dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Bounding box area above the allowed fraction of the image
    TooLarge {
        /// Bounding box area
        area: i64,
        /// Largest allowed area
        limit: f64,
    },
    /// Fewer pixels than the points limit
    TooFewPoints {
        /// Pixel count
        count: usize,
    },
    /// Bounding box too far from square
    Distorted {
        /// Signed distortion ratio
        distortion: f32,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooLarge { area, limit } => write!(f, "area {} > {:.0}", area, limit),
            Rejection::TooFewPoints { count } => write!(f, "only {} points", count),
            Rejection::Distorted { distortion } => write!(f, "distortion {:.2}", distortion),
        }
    }
}

/// Builds segments from a label grid and erases the ones that cannot be circles
pub struct SegmentFilter;

impl SegmentFilter {
    /// One segment per non-zero label, in order of first appearance
    pub fn find_segments(labels: &LabelGrid) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut index: HashMap<u32, usize> = HashMap::new();

        for (y, row) in labels.rows().enumerate() {
            for (x, &label) in row.iter().enumerate() {
                if label == 0 {
                    continue;
                }
                let p = Point::new(x as i32, y as i32);
                match index.get(&label) {
                    Some(&i) => segments[i].add_point(p),
                    None => {
                        index.insert(label, segments.len());
                        segments.push(Segment::new(p, label));
                    }
                }
            }
        }

        segments
    }

    /// First rule the segment breaks, if any
    pub fn check(segment: &Segment, limits: &SegmentLimits, image_area: usize) -> Option<Rejection> {
        let limit = limits.size_multiplier as f64 * image_area as f64;
        if segment.area() as f64 > limit {
            return Some(Rejection::TooLarge {
                area: segment.area(),
                limit,
            });
        }
        if segment.count() < limits.points_limit {
            return Some(Rejection::TooFewPoints {
                count: segment.count(),
            });
        }
        let distortion = segment.distortion();
        if distortion.abs() > limits.max_distortion {
            return Some(Rejection::Distorted { distortion });
        }
        None
    }

    /// Drop every segment breaking a rule and erase its pixels from `labels`
    ///
    /// Returns the surviving pixels as a binary grid (255 / 0) together with
    /// the surviving segments.
    pub fn remove_except_circles(
        labels: &mut LabelGrid,
        limits: &SegmentLimits,
    ) -> (GrayGrid, Vec<Segment>) {
        let image_area = labels.area();
        let mut segments = Self::find_segments(labels);
        let found = segments.len();

        segments.retain(|segment| match Self::check(segment, limits, image_area) {
            Some(reason) => {
                log::debug!(
                    "segment {} rejected at {:?}: {}",
                    segment.label(),
                    segment.min(),
                    reason
                );
                false
            }
            None => true,
        });

        let keep: HashSet<u32> = segments.iter().map(|s| s.label()).collect();
        for label in labels.as_mut_slice() {
            if !keep.contains(label) {
                *label = 0;
            }
        }
        let mask = labels.map(|l| if l > 0 { 255 } else { 0 });

        log::debug!("kept {} of {} segments", segments.len(), found);
        (mask, segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelingMethod;
    use crate::detector::labeling::ComponentLabeler;

    fn fill(gray: &mut GrayGrid, x: std::ops::Range<usize>, y: std::ops::Range<usize>) {
        for yy in y {
            for xx in x.clone() {
                gray.set(xx, yy, 255);
            }
        }
    }

    fn labeled(gray: &GrayGrid) -> LabelGrid {
        ComponentLabeler::label(gray, LabelingMethod::Sweep).0
    }

    #[test]
    fn test_two_blobs_bounding_boxes() {
        let mut gray = GrayGrid::new(30, 20);
        fill(&mut gray, 2..6, 3..9);
        fill(&mut gray, 15..27, 10..13);
        gray.set(27, 13, 255);

        let segments = SegmentFilter::find_segments(&labeled(&gray));
        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].label(), 1);
        assert_eq!(segments[0].min(), Point::new(2, 3));
        assert_eq!(segments[0].max(), Point::new(5, 8));
        assert_eq!(segments[0].count(), 24);

        assert_eq!(segments[1].label(), 2);
        assert_eq!(segments[1].min(), Point::new(15, 10));
        assert_eq!(segments[1].max(), Point::new(27, 13));
        assert_eq!(segments[1].count(), 37);
    }

    #[test]
    fn test_points_limit_boundary() {
        let mut gray = GrayGrid::new(40, 40);
        // 7x7 plus one pixel: exactly 50 points
        fill(&mut gray, 5..12, 5..12);
        gray.set(12, 5, 255);
        // 7x7: 49 points
        fill(&mut gray, 25..32, 25..32);

        let mut labels = labeled(&gray);
        let (mask, segments) =
            SegmentFilter::remove_except_circles(&mut labels, &SegmentLimits::default());

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].count(), 50);
        assert_eq!(mask.count_foreground(), 50);
        assert_eq!(mask.get(12, 5), Some(255));
        assert_eq!(mask.get(28, 28), Some(0));
        assert_eq!(labels[(28, 28)], 0);
        assert_eq!(labels[(6, 6)], segments[0].label());
    }

    #[test]
    fn test_distorted_segments_rejected() {
        let mut gray = GrayGrid::new(100, 100);
        fill(&mut gray, 5..65, 5..10); // wide bar
        fill(&mut gray, 80..85, 20..80); // tall bar
        fill(&mut gray, 30..42, 40..50); // mild: (12 - 10) / 12

        let mut labels = labeled(&gray);
        let limits = SegmentLimits::default();
        let image_area = labels.area();

        let all = SegmentFilter::find_segments(&labels);
        assert_eq!(all.len(), 3);
        assert!(matches!(
            SegmentFilter::check(&all[0], &limits, image_area),
            Some(Rejection::Distorted { .. })
        ));
        assert!(matches!(
            SegmentFilter::check(&all[1], &limits, image_area),
            Some(Rejection::Distorted { distortion }) if distortion < -0.4
        ));

        let (mask, segments) = SegmentFilter::remove_except_circles(&mut labels, &limits);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].min(), Point::new(30, 40));
        assert_eq!(mask.count_foreground(), 120);
    }

    #[test]
    fn test_oversized_segment_rejected() {
        let mut gray = GrayGrid::new(40, 40);
        fill(&mut gray, 2..37, 2..37);
        let labels = labeled(&gray);
        let segments = SegmentFilter::find_segments(&labels);
        let reason = SegmentFilter::check(&segments[0], &SegmentLimits::default(), labels.area());
        assert!(matches!(reason, Some(Rejection::TooLarge { area: 1156, .. })));
    }

    #[test]
    fn test_sparse_label_values() {
        // labels that were never compacted
        let mut labels = LabelGrid::new(20, 20);
        for y in 2..10 {
            for x in 2..10 {
                labels[(x, y)] = u32::MAX;
            }
        }
        labels[(15, 15)] = 7;

        let (mask, segments) =
            SegmentFilter::remove_except_circles(&mut labels, &SegmentLimits::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].label(), u32::MAX);
        assert_eq!(mask.count_foreground(), 64);
        assert_eq!(labels[(15, 15)], 0);
        assert_eq!(labels[(5, 5)], u32::MAX);
    }

    #[test]
    fn test_empty_labels() {
        let mut labels = LabelGrid::new(8, 8);
        let (mask, segments) =
            SegmentFilter::remove_except_circles(&mut labels, &SegmentLimits::default());
        assert!(segments.is_empty());
        assert_eq!(mask.count_foreground(), 0);
    }
}
