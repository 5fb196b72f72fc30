use rust_circles::models::{GrayGrid, Point};

/// Light background with dark disks on a regular lattice
#[allow(dead_code)]
pub fn synthetic_scene(width: usize, height: usize, radius: i32) -> GrayGrid {
    let mut gray = GrayGrid::filled(width, height, 200);
    let pitch = (radius * 3) as usize;
    for cy in (pitch / 2..height).step_by(pitch) {
        for cx in (pitch / 2..width).step_by(pitch) {
            let center = Point::new(cx as i32, cy as i32);
            for y in cy.saturating_sub(radius as usize)..(cy + radius as usize + 1).min(height) {
                for x in cx.saturating_sub(radius as usize)..(cx + radius as usize + 1).min(width) {
                    let p = Point::new(x as i32, y as i32);
                    if p.distance_squared(&center) <= (radius * radius) as i64 {
                        gray.set(x, y, 40);
                    }
                }
            }
        }
    }
    gray
}

/// Thin ring drawn at 0.1 degree steps
#[allow(dead_code)]
pub fn ring(width: usize, height: usize, center: Point, radius: f64) -> GrayGrid {
    let mut gray = GrayGrid::new(width, height);
    for i in 0..3600 {
        let p = center.on_circle(radius, i as f64 / 10.0);
        gray.set(p.x as usize, p.y as usize, 255);
    }
    gray
}
