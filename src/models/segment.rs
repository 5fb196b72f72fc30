use super::point::{Point, Rect};

/// Bounding box and pixel count of one labeled component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    label: u32,
    count: usize,
    xy_min: Point,
    xy_max: Point,
}

impl Segment {
    /// Start a segment from its first pixel
    pub fn new(first: Point, label: u32) -> Self {
        Self {
            label,
            count: 1,
            xy_min: first,
            xy_max: first,
        }
    }

    /// Grow the bounding box to include `p`
    pub fn add_point(&mut self, p: Point) {
        self.xy_min.x = self.xy_min.x.min(p.x);
        self.xy_min.y = self.xy_min.y.min(p.y);
        self.xy_max.x = self.xy_max.x.max(p.x);
        self.xy_max.y = self.xy_max.y.max(p.y);
        self.count += 1;
    }

    /// Component label
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Number of pixels added so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Top-left corner of the bounding box
    pub fn min(&self) -> Point {
        self.xy_min
    }

    /// Bottom-right corner of the bounding box
    pub fn max(&self) -> Point {
        self.xy_max
    }

    /// Bounding box
    pub fn borders(&self) -> Rect {
        Rect::new(self.xy_min, self.xy_max)
    }

    /// Corner-to-corner width (`max.x - min.x`)
    pub fn width(&self) -> i32 {
        self.xy_max.x - self.xy_min.x
    }

    /// Corner-to-corner height (`max.y - min.y`)
    pub fn height(&self) -> i32 {
        self.xy_max.y - self.xy_min.y
    }

    /// `width * height`
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// `(w - h) / w` over the pixel extents; 0 for a square box, negative when taller than wide
    pub fn distortion(&self) -> f32 {
        let w = (self.width() + 1) as f32;
        let h = (self.height() + 1) as f32;
        (w - h) / w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_tracks_points() {
        let mut seg = Segment::new(Point::new(5, 5), 3);
        seg.add_point(Point::new(2, 7));
        seg.add_point(Point::new(9, 1));
        assert_eq!(seg.label(), 3);
        assert_eq!(seg.count(), 3);
        assert_eq!(seg.min(), Point::new(2, 1));
        assert_eq!(seg.max(), Point::new(9, 7));
        assert_eq!(seg.width(), 7);
        assert_eq!(seg.height(), 6);
        assert_eq!(seg.area(), 42);
    }

    #[test]
    fn test_distortion() {
        let mut square = Segment::new(Point::new(0, 0), 1);
        square.add_point(Point::new(9, 9));
        assert_eq!(square.distortion(), 0.0);

        let mut wide = Segment::new(Point::new(0, 0), 1);
        wide.add_point(Point::new(9, 4));
        assert!((wide.distortion() - 0.5).abs() < 1e-6);

        let mut tall = Segment::new(Point::new(0, 0), 1);
        tall.add_point(Point::new(4, 9));
        assert!((tall.distortion() + 1.0).abs() < 1e-6);
    }
}
