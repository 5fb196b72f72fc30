pub mod circle;
pub mod grid;
pub mod point;
pub mod segment;

pub use circle::CircleCandidate;
pub use grid::{ColorGrid, GrayGrid, LabelGrid, PixelGrid, Rgb};
pub use point::{Point, Rect};
pub use segment::Segment;
