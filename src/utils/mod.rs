//! Utility functions for image processing
//!
//! This module provides the pixel-level operators of the pipeline:
//! - Edge enhancement (Laplacian of Gaussian)
//! - Binarization (Otsu's method, inversion, border painting)
//! - Morphology (dilation and erosion with square elements)
//! - Grayscale conversion and outline compositing

pub mod binarization;
pub mod edges;
pub mod grayscale;
pub mod morphology;
pub mod overlay;
