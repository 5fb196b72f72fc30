//! RustCircles - circle detection with classic image operators
//!
//! A Laplacian-of-Gaussian edge image is binarized with Otsu's method, closed
//! with square structuring elements and split into 8-connected components.
//! Components that are too small, too large or too far from square are
//! dropped, and each remaining one gets a center and radius from a
//! multithreaded angular vote over its thin edge outline.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pipeline configuration and environment overrides
pub mod config;
/// Component labeling, segment filtering and circle voting
pub mod detector;
/// Crate error type
pub mod error;
/// Core data structures (PixelGrid, Point, Segment, CircleCandidate)
pub mod models;
/// End-to-end pipeline and telemetry
pub mod pipeline;
/// Image file helpers and grid statistics
pub mod tools;
/// Image operators (edges, binarization, morphology, grayscale, overlay)
pub mod utils;

pub use config::DetectorConfig;
pub use error::{DetectError, Result};
pub use models::{CircleCandidate, ColorGrid, GrayGrid, Point, Rgb};
pub use pipeline::{DetectionReport, DetectionTelemetry};

use utils::grayscale::color_to_gray;
use utils::overlay::composite;

/// Detect circles in a color image with the default configuration
pub fn detect(image: &ColorGrid) -> Result<Vec<CircleCandidate>> {
    Detector::new().detect(image).map(|report| report.circles)
}

/// Detect circles in a grayscale image with the default configuration
pub fn detect_from_grayscale(gray: &GrayGrid) -> Result<Vec<CircleCandidate>> {
    Detector::new().detect_gray(gray).map(|report| report.circles)
}

/// Reusable circle detector
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    /// Create a new detector with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with a custom configuration
    pub fn with_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect circles in a color image
    pub fn detect(&self, image: &ColorGrid) -> Result<DetectionReport> {
        self.detect_gray(&color_to_gray(image))
    }

    /// Detect circles in a grayscale image
    pub fn detect_gray(&self, gray: &GrayGrid) -> Result<DetectionReport> {
        pipeline::run(gray, &self.config)
    }

    /// Detect circles, then paint their outlines onto `image` and dim the rest
    pub fn annotate(&self, image: &mut ColorGrid) -> Result<DetectionReport> {
        let report = self.detect(image)?;
        composite(image, &report.outlines)?;
        Ok(report)
    }
}
