use super::point::Point;

/// Candidate circle: center, radius and the number of votes its center collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleCandidate {
    /// Center in grid coordinates
    pub center: Point,
    /// Radius in pixels
    pub radius: u32,
    /// Votes accumulated at `center` for `radius`
    pub votes: u32,
}

impl CircleCandidate {
    /// Create a new candidate
    pub fn new(center: Point, radius: u32, votes: u32) -> Self {
        Self {
            center,
            radius,
            votes,
        }
    }

    /// Outline points at 1 degree steps
    pub fn outline(&self) -> impl Iterator<Item = Point> + '_ {
        (0..360).map(move |deg| self.center.on_circle(self.radius as f64, deg as f64))
    }
}
