use crate::config::DetectorConfig;
use crate::detector::labeling::ComponentLabeler;
use crate::detector::segments::SegmentFilter;
use crate::detector::voting::CircleVoter;
use crate::error::Result;
use crate::models::{CircleCandidate, GrayGrid, Segment};
use crate::utils::binarization::{invert, paint_borders, threshold_image};
use crate::utils::edges::laplacian_of_gaussian;
use crate::utils::morphology::{dilate, erode};
use crate::utils::overlay::draw_circles;
use std::time::{Duration, Instant};

/// Stage-level counters and timings of one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionTelemetry {
    /// Otsu threshold of the edge image
    pub threshold: u8,
    /// Connected components after the closing
    pub components: usize,
    /// Components that passed the segment filter
    pub segments_kept: usize,
    /// Everything before the circle search
    pub preprocess: Duration,
    /// Circle search and outline rendering
    pub circle_search: Duration,
}

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct DetectionReport {
    /// One circle per segment that collected votes
    pub circles: Vec<CircleCandidate>,
    /// Segments that passed the filter
    pub segments: Vec<Segment>,
    /// Closed binary grid with every rejected segment erased
    pub segment_mask: GrayGrid,
    /// Binary grid with the rasterized circle outlines
    pub outlines: GrayGrid,
    /// Counters and timings
    pub telemetry: DetectionTelemetry,
}

/// Edge enhancement, binarization and closing
///
/// Returns the contour grid (binarized edges before the closing), the closed
/// grid, and the Otsu threshold.
pub(crate) fn preprocess(gray: &GrayGrid, config: &DetectorConfig) -> (GrayGrid, GrayGrid, u8) {
    let mut edges = laplacian_of_gaussian(gray, config.kernel);
    let threshold = threshold_image(&mut edges, config.threshold.multiplier);
    invert(&mut edges);
    paint_borders(&mut edges, config.threshold.border_width);

    let contours = edges.clone();
    let morph = &config.morphology;
    for _ in 0..morph.dilate_passes {
        dilate(&mut edges, morph.dilate_size);
    }
    erode(&mut edges, morph.erode_size);

    (contours, edges, threshold)
}

/// Run the full detection pipeline on a grayscale grid
pub fn run(gray: &GrayGrid, config: &DetectorConfig) -> Result<DetectionReport> {
    config.validate()?;
    let mut tel = DetectionTelemetry::default();

    let start = Instant::now();
    let (contours, closed, threshold) = preprocess(gray, config);
    tel.threshold = threshold;

    let (mut labels, components) = ComponentLabeler::label(&closed, config.labeling);
    tel.components = components;
    let (segment_mask, segments) = SegmentFilter::remove_except_circles(&mut labels, &config.limits);
    tel.segments_kept = segments.len();
    tel.preprocess = start.elapsed();

    let start = Instant::now();
    let circles = CircleVoter::find_circles(&contours, &segments, &config.voting)?;
    let outlines = draw_circles(&circles, gray.width(), gray.height());
    tel.circle_search = start.elapsed();

    log::info!(
        "{}x{}: threshold {}, {} components, {} segments, {} circles ({:?} + {:?})",
        gray.width(),
        gray.height(),
        tel.threshold,
        tel.components,
        tel.segments_kept,
        circles.len(),
        tel.preprocess,
        tel.circle_search
    );

    Ok(DetectionReport {
        circles,
        segments,
        segment_mask,
        outlines,
        telemetry: tel,
    })
}
