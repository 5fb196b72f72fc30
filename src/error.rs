use thiserror::Error;

/// Errors reported by the detection pipeline
#[derive(Debug, Error)]
pub enum DetectError {
    /// Reading or writing an image file failed
    #[error("image codec error: {0}")]
    ImageCodec(#[from] image::ImageError),

    /// A grid was built with zero width or height
    #[error("image has no pixels")]
    EmptyImage,

    /// A raw buffer does not match the requested dimensions
    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// width * height
        expected: usize,
        /// Length of the buffer that was passed in
        actual: usize,
    },

    /// Grids that are processed together have different sizes
    #[error("grid size mismatch: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        /// Size of the reference grid
        expected: (usize, usize),
        /// Size of the offending grid
        actual: (usize, usize),
    },

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The padded bounding box of a segment has no area inside the grid
    #[error("search rectangle of segment {label} has zero area")]
    DegenerateSearchRect {
        /// Label of the segment
        label: u32,
    },

    /// A voting worker thread panicked
    #[error("voting worker for radius {radius} panicked")]
    WorkerPanicked {
        /// Radius the worker was evaluating
        radius: u32,
    },
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, DetectError>;
