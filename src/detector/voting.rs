//! Circle search by angular voting
//!
//! Every foreground contour pixel inside a segment's search rectangle casts
//! rays of length `r` around the full circle. The rounded ray endpoints that
//! stay strictly inside the rectangle are counted, and the most voted endpoint
//! is the center candidate for that radius. Radii are evaluated in batches of
//! concurrent workers that start together behind a barrier.

use crate::config::VotingConfig;
use crate::error::{DetectError, Result};
use crate::models::{CircleCandidate, GrayGrid, Point, Rect, Segment};
use std::f64::consts::PI;
use std::sync::Barrier;
use std::thread;

/// Center and radius estimation for filtered segments
pub struct CircleVoter;

impl CircleVoter {
    /// Segment bounding box grown by `padding` and clipped to the grid
    pub fn search_rect(segment: &Segment, padding: i32, width: usize, height: usize) -> Result<Rect> {
        let rect = segment.borders().expand(padding).clamp_to(width, height);
        if rect.is_degenerate() {
            return Err(DetectError::DegenerateSearchRect {
                label: segment.label(),
            });
        }
        Ok(rect)
    }

    /// Ray spacing in degrees: about one pixel of arc at `radius`, at least 1
    pub fn angle_step(radius: u32) -> usize {
        let step = (180.0 / (PI * radius.max(1) as f64)).floor() as i64 - 1;
        step.max(1) as usize
    }

    /// Best center for one radius, `None` when no vote lands inside `rect`
    pub fn vote_for_radius(contours: &GrayGrid, rect: Rect, radius: u32) -> Option<CircleCandidate> {
        let min = rect.min;
        let stride = (rect.width() + 1) as usize;
        let mut votes = vec![0u32; stride * (rect.height() + 1) as usize];
        // endpoints in the order they first received a vote
        let mut seen: Vec<Point> = Vec::new();
        let step = Self::angle_step(radius);
        let r = radius as f64;

        for y0 in min.y..rect.max.y {
            for x0 in min.x..rect.max.x {
                if contours.get(x0 as usize, y0 as usize).unwrap_or(0) == 0 {
                    continue;
                }
                let source = Point::new(x0, y0);
                let mut previous = None;
                for alpha in (0..360).step_by(step) {
                    let end = source.on_circle(r, alpha as f64);
                    if previous == Some(end) {
                        continue;
                    }
                    previous = Some(end);
                    if !rect.contains_strict(end) {
                        continue;
                    }
                    let slot = &mut votes[(end.y - min.y) as usize * stride + (end.x - min.x) as usize];
                    if *slot == 0 {
                        seen.push(end);
                    }
                    *slot += 1;
                }
            }
        }

        let mut best: Option<CircleCandidate> = None;
        for center in seen {
            let count = votes[(center.y - min.y) as usize * stride + (center.x - min.x) as usize];
            if best.is_none_or(|b| count > b.votes) {
                best = Some(CircleCandidate::new(center, radius, count));
            }
        }
        best
    }

    /// Search every configured radius for one segment and keep the most voted candidate
    ///
    /// Radii run in ascending order, so on equal votes the smaller radius wins.
    pub fn detect_circle(
        contours: &GrayGrid,
        segment: &Segment,
        config: &VotingConfig,
    ) -> Result<Option<CircleCandidate>> {
        let rect = Self::search_rect(segment, config.padding, contours.width(), contours.height())?;
        let radii: Vec<u32> = config.radius_range.radii(segment.width()).collect();
        let mut best: Option<CircleCandidate> = None;

        for batch in radii.chunks(config.batch_size()) {
            let candidates = Self::run_batch(batch, |radius| Self::vote_for_radius(contours, rect, radius))?;
            for candidate in candidates.into_iter().flatten() {
                if best.is_none_or(|b| candidate.votes > b.votes) {
                    best = Some(candidate);
                }
            }
        }

        match &best {
            Some(c) => log::debug!(
                "segment {}: radius {} at ({}, {}) with {} votes",
                segment.label(),
                c.radius,
                c.center.x,
                c.center.y,
                c.votes
            ),
            None => log::debug!("segment {}: no votes", segment.label()),
        }
        Ok(best)
    }

    /// One worker per radius; each returns its own result through its join handle
    fn run_batch<F>(batch: &[u32], vote: F) -> Result<Vec<Option<CircleCandidate>>>
    where
        F: Fn(u32) -> Option<CircleCandidate> + Sync,
    {
        let barrier = Barrier::new(batch.len());
        let vote = &vote;

        thread::scope(|s| {
            let handles: Vec<_> = batch
                .iter()
                .map(|&radius| {
                    let barrier = &barrier;
                    let handle = s.spawn(move || {
                        barrier.wait();
                        vote(radius)
                    });
                    (radius, handle)
                })
                .collect();

            // join everything before reporting so no panic escapes the scope
            let joined: Vec<_> = handles
                .into_iter()
                .map(|(radius, handle)| (radius, handle.join()))
                .collect();
            joined
                .into_iter()
                .map(|(radius, result)| result.map_err(|_| DetectError::WorkerPanicked { radius }))
                .collect()
        })
    }

    /// Run [`CircleVoter::detect_circle`] for every segment
    pub fn find_circles(
        contours: &GrayGrid,
        segments: &[Segment],
        config: &VotingConfig,
    ) -> Result<Vec<CircleCandidate>> {
        let mut circles = Vec::with_capacity(segments.len());
        for segment in segments {
            if let Some(circle) = Self::detect_circle(contours, segment, config)? {
                circles.push(circle);
            }
        }
        Ok(circles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RadiusRange;

    fn ring(width: usize, height: usize, center: Point, radius: f64) -> GrayGrid {
        let mut gray = GrayGrid::new(width, height);
        for i in 0..3600 {
            let p = center.on_circle(radius, i as f64 / 10.0);
            gray.set(p.x as usize, p.y as usize, 255);
        }
        gray
    }

    fn segment_around(min: Point, max: Point) -> Segment {
        let mut segment = Segment::new(min, 1);
        segment.add_point(max);
        segment
    }

    #[test]
    fn test_angle_step() {
        assert_eq!(CircleVoter::angle_step(15), 2);
        assert_eq!(CircleVoter::angle_step(20), 1);
        assert_eq!(CircleVoter::angle_step(44), 1);
        assert_eq!(CircleVoter::angle_step(5), 10);
    }

    #[test]
    fn test_ring_single_radius() {
        let contours = ring(200, 200, Point::new(100, 100), 20.0);
        let rect = Rect::new(Point::new(70, 70), Point::new(130, 130));
        let candidate = CircleVoter::vote_for_radius(&contours, rect, 20).unwrap();
        assert!(candidate.center.distance_squared(&Point::new(100, 100)) <= 2);
        assert!(candidate.votes > 100);
    }

    #[test]
    fn test_ring_best_radius() {
        let contours = ring(200, 200, Point::new(100, 100), 20.0);
        // padded by 5 this is the [70,70]-[130,130] box
        let segment = segment_around(Point::new(75, 75), Point::new(125, 125));
        let config = VotingConfig::default();

        let best = CircleVoter::detect_circle(&contours, &segment, &config)
            .unwrap()
            .unwrap();
        assert_eq!(best.radius, 20);
        assert!(best.center.distance_squared(&Point::new(100, 100)) <= 2);
    }

    #[test]
    fn test_adaptive_radius_range() {
        let contours = ring(200, 200, Point::new(100, 100), 20.0);
        let segment = segment_around(Point::new(80, 80), Point::new(120, 120));
        let config = VotingConfig {
            radius_range: RadiusRange::FromSegment {
                margin: 10,
                floor: 3,
            },
            ..VotingConfig::default()
        };
        assert_eq!(config.radius_range.radii(segment.width()), 10..30);

        let best = CircleVoter::detect_circle(&contours, &segment, &config)
            .unwrap()
            .unwrap();
        assert_eq!(best.radius, 20);
        assert!(best.center.distance_squared(&Point::new(100, 100)) <= 2);
    }

    #[test]
    fn test_batch_size_does_not_change_result() {
        let contours = ring(160, 160, Point::new(70, 80), 18.0);
        let segment = segment_around(Point::new(52, 62), Point::new(88, 98));
        let mut config = VotingConfig::default();

        config.max_workers = Some(1);
        let serial = CircleVoter::detect_circle(&contours, &segment, &config).unwrap();
        config.max_workers = Some(4);
        let parallel = CircleVoter::detect_circle(&contours, &segment, &config).unwrap();
        config.max_workers = Some(64);
        let single_batch = CircleVoter::detect_circle(&contours, &segment, &config).unwrap();

        assert_eq!(serial, parallel);
        assert_eq!(serial, single_batch);
        assert_eq!(serial.map(|c| c.radius), Some(18));
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let result = CircleVoter::run_batch(&[15, 16, 17], |radius| {
            if radius == 16 {
                panic!("vote failed");
            }
            Some(CircleCandidate::new(Point::new(1, 1), radius, radius))
        });
        assert!(matches!(result, Err(DetectError::WorkerPanicked { radius: 16 })));

        let result = CircleVoter::run_batch(&[15, 16], |radius| {
            Some(CircleCandidate::new(Point::new(1, 1), radius, 1))
        });
        assert_eq!(result.unwrap().len(), 2);
    }

    #[test]
    fn test_empty_rect_has_no_candidate() {
        let contours = GrayGrid::new(100, 100);
        let rect = Rect::new(Point::new(10, 10), Point::new(60, 60));
        assert_eq!(CircleVoter::vote_for_radius(&contours, rect, 20), None);

        let segment = segment_around(Point::new(20, 20), Point::new(50, 50));
        let found = CircleVoter::find_circles(&contours, &[segment], &VotingConfig::default());
        assert!(found.unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_search_rect() {
        let segment = Segment::new(Point::new(0, 0), 7);
        let err = CircleVoter::search_rect(&segment, 5, 1, 1).unwrap_err();
        assert!(matches!(err, DetectError::DegenerateSearchRect { label: 7 }));

        let err = CircleVoter::search_rect(&Segment::new(Point::new(4, 4), 2), 0, 10, 10);
        assert!(err.is_err());
    }

    #[test]
    fn test_search_rect_is_clamped() {
        let segment = segment_around(Point::new(2, 3), Point::new(40, 30));
        let rect = CircleVoter::search_rect(&segment, 5, 44, 50).unwrap();
        assert_eq!(rect.min, Point::new(0, 0));
        assert_eq!(rect.max, Point::new(43, 35));
    }
}
