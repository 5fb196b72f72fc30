//! Detector configuration
//!
//! Defaults are the values the pipeline was tuned with. Every knob can be overridden
//! programmatically with the `with_*` builders or through `CIRCLES_*`
//! environment variables via [`DetectorConfig::from_env`].

use crate::error::{DetectError, Result};

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    parse_env(name).unwrap_or(default)
}

/// Edge enhancement kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogKernel {
    /// 3x3 discrete Laplacian
    Small3,
    /// 5x5 Laplacian of Gaussian
    #[default]
    Large5,
}

/// Binarization settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    /// Scales the Otsu threshold before binarizing
    pub multiplier: f32,
    /// Width of the frame forced to background after inversion
    pub border_width: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            border_width: 2,
        }
    }
}

/// Structuring element sizes for the closing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphologyConfig {
    /// Dilation element size
    pub dilate_size: usize,
    /// How many dilations run before the erosion
    pub dilate_passes: usize,
    /// Erosion element size
    pub erode_size: usize,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            dilate_size: 5,
            dilate_passes: 2,
            erode_size: 7,
        }
    }
}

/// Connected component algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelingMethod {
    /// Alternating top-down / bottom-up min-propagation until nothing changes
    #[default]
    Sweep,
    /// Two-pass union-find
    UnionFind,
}

/// Rejection thresholds for labeled components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLimits {
    /// Max bounding box area as a fraction of the image area
    pub size_multiplier: f32,
    /// Minimum number of pixels
    pub points_limit: usize,
    /// Max absolute aspect distortion
    pub max_distortion: f32,
}

impl Default for SegmentLimits {
    fn default() -> Self {
        Self {
            size_multiplier: 0.4,
            points_limit: 50,
            max_distortion: 0.4,
        }
    }
}

/// Radii tested for every segment, upper bound exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusRange {
    /// Same range for every segment
    Fixed {
        /// First radius tested
        min: u32,
        /// One past the last radius tested
        max: u32,
    },
    /// `[max(w/2 - margin, floor), w/2 + margin)` where `w` is the segment width
    FromSegment {
        /// Distance around half the segment width
        margin: u32,
        /// Smallest radius ever tested
        floor: u32,
    },
}

impl Default for RadiusRange {
    fn default() -> Self {
        RadiusRange::Fixed { min: 15, max: 45 }
    }
}

impl RadiusRange {
    /// Radii to test for a segment of the given width
    pub fn radii(&self, segment_width: i32) -> std::ops::Range<u32> {
        match *self {
            RadiusRange::Fixed { min, max } => min..max,
            RadiusRange::FromSegment { margin, floor } => {
                let half = (segment_width.max(0) / 2) as u32;
                let min = half.saturating_sub(margin).max(floor);
                min..half.saturating_add(margin)
            }
        }
    }
}

/// Circle voting settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotingConfig {
    /// Radius policy
    pub radius_range: RadiusRange,
    /// Pixels added around each segment's bounding box
    pub padding: i32,
    /// Workers per batch, `None` uses the available parallelism
    pub max_workers: Option<usize>,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            radius_range: RadiusRange::default(),
            padding: 5,
            max_workers: None,
        }
    }
}

impl VotingConfig {
    /// Number of radii evaluated concurrently
    pub fn batch_size(&self) -> usize {
        self.max_workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectorConfig {
    /// Edge kernel
    pub kernel: LogKernel,
    /// Binarization
    pub threshold: ThresholdConfig,
    /// Closing
    pub morphology: MorphologyConfig,
    /// Labeling algorithm
    pub labeling: LabelingMethod,
    /// Segment rejection
    pub limits: SegmentLimits,
    /// Circle search
    pub voting: VotingConfig,
}

impl DetectorConfig {
    /// Defaults overlaid with `CIRCLES_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let t = &mut config.threshold;
        t.multiplier = parse_env_or("CIRCLES_THRESHOLD_MULTIPLIER", t.multiplier);
        t.border_width = parse_env_or("CIRCLES_BORDER_WIDTH", t.border_width);

        let l = &mut config.limits;
        l.size_multiplier = parse_env_or("CIRCLES_SIZE_MULTIPLIER", l.size_multiplier);
        l.points_limit = parse_env_or("CIRCLES_POINTS_LIMIT", l.points_limit);
        l.max_distortion = parse_env_or("CIRCLES_MAX_DISTORTION", l.max_distortion);

        if let RadiusRange::Fixed { min, max } = config.voting.radius_range {
            config.voting.radius_range = RadiusRange::Fixed {
                min: parse_env_or("CIRCLES_RADIUS_MIN", min),
                max: parse_env_or("CIRCLES_RADIUS_MAX", max),
            };
        }
        if let Some(workers) = parse_env::<usize>("CIRCLES_MAX_WORKERS") {
            config.voting.max_workers = Some(workers);
        }
        config
    }

    /// Use a different edge kernel
    pub fn with_kernel(mut self, kernel: LogKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Scale the Otsu threshold
    pub fn with_threshold_multiplier(mut self, multiplier: f32) -> Self {
        self.threshold.multiplier = multiplier;
        self
    }

    /// Use a different labeling algorithm
    pub fn with_labeling(mut self, method: LabelingMethod) -> Self {
        self.labeling = method;
        self
    }

    /// Replace the segment limits
    pub fn with_limits(mut self, limits: SegmentLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the radius policy
    pub fn with_radius_range(mut self, range: RadiusRange) -> Self {
        self.voting.radius_range = range;
        self
    }

    /// Cap the number of concurrent voting workers
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.voting.max_workers = Some(workers);
        self
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DetectError::InvalidConfig(msg));

        let m = self.threshold.multiplier;
        if !m.is_finite() || m < 0.0 {
            return invalid(format!("threshold multiplier must be finite and >= 0, got {}", m));
        }
        let morph = &self.morphology;
        if morph.dilate_size == 0 || morph.erode_size == 0 {
            return invalid("structuring element size must be positive".into());
        }
        let l = &self.limits;
        if !(l.size_multiplier.is_finite() && l.size_multiplier > 0.0) {
            return invalid(format!("size multiplier must be > 0, got {}", l.size_multiplier));
        }
        if !(l.max_distortion.is_finite() && l.max_distortion >= 0.0) {
            return invalid(format!("max distortion must be >= 0, got {}", l.max_distortion));
        }
        match self.voting.radius_range {
            RadiusRange::Fixed { min, max } if min == 0 || min >= max => {
                return invalid(format!("radius range {}..{} is empty or starts at 0", min, max));
            }
            RadiusRange::FromSegment { margin, floor } if margin == 0 || floor == 0 => {
                return invalid("adaptive radius margin and floor must be positive".into());
            }
            _ => {}
        }
        if self.voting.padding < 0 {
            return invalid(format!("padding must be >= 0, got {}", self.voting.padding));
        }
        if self.voting.max_workers == Some(0) {
            return invalid("max workers must be at least 1".into());
        }
        Ok(())
    }
}
