use crate::error::DetectError;
use std::ops::{Index, IndexMut};

/// One color pixel with floating point channels in the 0..=255 range
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Rgb {
    /// Create a new color pixel
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Same value on every channel
    pub fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }
}

/// Rectangular grid of pixels stored row by row in one contiguous buffer
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Grayscale intensities, also used for binary masks (0 / 255)
pub type GrayGrid = PixelGrid<u8>;
/// Connected component labels, 0 is background
pub type LabelGrid = PixelGrid<u32>;
/// Color image with float channels
pub type ColorGrid = PixelGrid<Rgb>;

impl<T: Copy + Default> PixelGrid<T> {
    /// Create a grid filled with `T::default()`
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Create a grid with every pixel set to `value`
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        assert!(
            width > 0 && height > 0,
            "pixel grid must have positive dimensions, got {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, DetectError> {
        if width == 0 || height == 0 {
            return Err(DetectError::EmptyImage);
        }
        if data.len() != width * height {
            return Err(DetectError::BufferSize {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Get pixel at (x, y), `None` when out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Set pixel at (x, y), ignored when out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[y * self.width + x] = value;
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Build a grid of the same size by mapping every pixel
    pub fn map<U, F>(&self, mut f: F) -> PixelGrid<U>
    where
        F: FnMut(T) -> U,
    {
        PixelGrid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl<T> PixelGrid<T> {
    /// Grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True when both grids have the same dimensions
    pub fn same_size<U>(&self, other: &PixelGrid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Raw row-major pixels
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw row-major pixels
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over rows
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width)
    }

    /// Consume the grid and return its buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }
}

impl<T> Index<(usize, usize)> for PixelGrid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.data[self.offset(x, y)]
    }
}

impl<T> IndexMut<(usize, usize)> for PixelGrid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let offset = self.offset(x, y);
        &mut self.data[offset]
    }
}

impl ColorGrid {
    /// Convert from an 8-bit RGB image
    pub fn from_rgb_image(image: &image::RgbImage) -> Result<Self, DetectError> {
        let (width, height) = image.dimensions();
        let data = image
            .pixels()
            .map(|p| Rgb::new(p[0] as f32, p[1] as f32, p[2] as f32))
            .collect();
        Self::from_vec(width as usize, height as usize, data)
    }

    /// Convert to an 8-bit RGB image, channels are rounded and clamped
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        let mut raw = Vec::with_capacity(self.area() * 3);
        for px in &self.data {
            raw.extend_from_slice(&[to_u8(px.r), to_u8(px.g), to_u8(px.b)]);
        }
        image::RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| image::RgbImage::new(self.width as u32, self.height as u32))
    }
}

impl GrayGrid {
    /// Number of non-zero pixels
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }
}
