//! Circle detection stages that work on binary grids
//!
//! - Connected component labeling (sweep or union-find)
//! - Segment extraction and shape-based rejection
//! - Multithreaded angular voting for center and radius

/// 8-connected component labeling with compacted labels
pub mod labeling;
/// Bounding boxes and rejection rules per component
pub mod segments;
/// Center and radius search by ray voting
pub mod voting;
