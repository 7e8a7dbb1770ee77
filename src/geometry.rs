// src/geometry.rs
use nalgebra::Point2;

/// 2D point, either in normalized camera space or in screen pixels
/// depending on the pipeline stage.
pub type Point = Point2<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

pub fn distance(a: &Point, b: &Point) -> f64 {
    nalgebra::distance(a, b)
}

/// Total arc length of a polyline.
pub fn path_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(&pair[0], &pair[1]))
        .sum()
}

pub fn bounding_box(points: &[Point]) -> Option<BoundingBox> {
    let first = points.first()?;
    let mut bounds = BoundingBox {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };

    for p in &points[1..] {
        bounds.min_x = bounds.min_x.min(p.x);
        bounds.min_y = bounds.min_y.min(p.y);
        bounds.max_x = bounds.max_x.max(p.x);
        bounds.max_y = bounds.max_y.max(p.y);
    }

    Some(bounds)
}

pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let sum = points
        .iter()
        .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
    Some(Point::from(sum / points.len() as f64))
}

/// Linear interpolation between `a` and `b` at parameter `t`.
pub fn lerp(a: &Point, b: &Point, t: f64) -> Point {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_length_sums_segments() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 10.0),
        ];
        assert!((path_length(&points) - 11.0).abs() < 1e-12);
        assert_eq!(path_length(&points[..1]), 0.0);
    }

    #[test]
    fn bounding_box_and_centroid() {
        let points = vec![
            Point::new(1.0, 2.0),
            Point::new(3.0, -2.0),
            Point::new(-1.0, 0.0),
        ];

        let bounds = bounding_box(&points).expect("non-empty");
        assert_eq!(bounds.width(), 4.0);
        assert_eq!(bounds.height(), 4.0);

        let c = centroid(&points).expect("non-empty");
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!(c.y.abs() < 1e-12);

        assert!(bounding_box(&[]).is_none());
        assert!(centroid(&[]).is_none());
    }
}
