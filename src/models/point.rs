/// Integer point for grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// X coordinate (column)
    pub x: i32,
    /// Y coordinate (row)
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Point at distance `radius` from `self` in direction `degrees`, rounded to the grid
    pub fn on_circle(&self, radius: f64, degrees: f64) -> Self {
        let theta = degrees.to_radians();
        Self {
            x: (self.x as f64 + radius * theta.cos()).round() as i32,
            y: (self.y as f64 + radius * theta.sin()).round() as i32,
        }
    }

    /// Squared euclidean distance
    pub fn distance_squared(&self, other: &Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Axis-aligned box between two corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Corner with the smaller x
    pub min: Point,
    /// Corner with the larger x
    pub max: Point,
}

impl Rect {
    /// Build a rect from two corners; the corner with the smaller x becomes `min`
    pub fn new(a: Point, b: Point) -> Self {
        if a.x <= b.x {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// `max.x - min.x`
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// `max.y - min.y`
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Grow by `padding` pixels on every side
    pub fn expand(&self, padding: i32) -> Self {
        Self {
            min: Point::new(self.min.x - padding, self.min.y - padding),
            max: Point::new(self.max.x + padding, self.max.y + padding),
        }
    }

    /// Clip to the pixel range of a `width` x `height` grid
    pub fn clamp_to(&self, width: usize, height: usize) -> Self {
        let max_x = width as i32 - 1;
        let max_y = height as i32 - 1;
        Self {
            min: Point::new(self.min.x.clamp(0, max_x), self.min.y.clamp(0, max_y)),
            max: Point::new(self.max.x.clamp(0, max_x), self.max.y.clamp(0, max_y)),
        }
    }

    /// True when the rect encloses no area
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Strict containment: points on the edge are outside
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_by_x() {
        let r = Rect::new(Point::new(9, 1), Point::new(2, 7));
        assert_eq!(r.min, Point::new(2, 7));
        assert_eq!(r.max, Point::new(9, 1));
        assert_eq!(r.width(), 7);
    }

    #[test]
    fn test_expand_and_clamp() {
        let r = Rect::new(Point::new(2, 3), Point::new(10, 12)).expand(5);
        assert_eq!(r.min, Point::new(-3, -2));
        let c = r.clamp_to(14, 40);
        assert_eq!(c.min, Point::new(0, 0));
        assert_eq!(c.max, Point::new(13, 17));
        assert!(!c.is_degenerate());
        assert!(Rect::new(Point::new(4, 4), Point::new(4, 9)).is_degenerate());
    }

    #[test]
    fn test_contains_strict() {
        let r = Rect::new(Point::new(0, 0), Point::new(4, 4));
        assert!(r.contains_strict(Point::new(1, 3)));
        assert!(!r.contains_strict(Point::new(0, 2)));
        assert!(!r.contains_strict(Point::new(2, 4)));
    }

    #[test]
    fn test_on_circle() {
        let c = Point::new(10, 10);
        assert_eq!(c.on_circle(5.0, 0.0), Point::new(15, 10));
        assert_eq!(c.on_circle(5.0, 90.0), Point::new(10, 15));
        assert_eq!(c.on_circle(5.0, 180.0), Point::new(5, 10));
        assert_eq!(c.distance_squared(&Point::new(13, 14)), 25);
    }
}
