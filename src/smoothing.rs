// src/smoothing.rs - Exponential smoothing of the fingertip cursor
use crate::config::SmoothingConfig;
use crate::geometry::{lerp, Point};

/// Exponential moving average over the index fingertip in screen space.
///
/// The cursor only exists while a hand is visible. After a gap the first
/// sample reseeds the filter instead of blending from a stale position.
#[derive(Debug, Clone)]
pub struct CursorSmoother {
    alpha: f64,
    cursor: Option<Point>,
}

impl CursorSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            alpha: config.alpha.clamp(f64::EPSILON, 1.0),
            cursor: None,
        }
    }

    pub fn update(&mut self, raw: Point) -> Point {
        let next = match self.cursor {
            Some(current) => lerp(&current, &raw, self.alpha),
            None => raw,
        };
        self.cursor = Some(next);
        next
    }

    pub fn clear(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother(alpha: f64) -> CursorSmoother {
        CursorSmoother::new(&SmoothingConfig { alpha })
    }

    #[test]
    fn first_sample_seeds_the_cursor() {
        let mut s = smoother(0.35);
        assert_eq!(s.cursor(), None);
        assert_eq!(s.update(Point::new(100.0, 50.0)), Point::new(100.0, 50.0));
    }

    #[test]
    fn blends_towards_new_samples() {
        let mut s = smoother(0.35);
        s.update(Point::new(0.0, 0.0));
        let p = s.update(Point::new(100.0, 200.0));
        assert!((p.x - 35.0).abs() < 1e-9);
        assert!((p.y - 70.0).abs() < 1e-9);

        let p = s.update(Point::new(100.0, 200.0));
        assert!((p.x - (35.0 * 0.65 + 35.0)).abs() < 1e-9);
    }

    #[test]
    fn reseeds_after_clear() {
        let mut s = smoother(0.35);
        s.update(Point::new(0.0, 0.0));
        s.clear();
        assert_eq!(s.cursor(), None);
        assert_eq!(s.update(Point::new(400.0, 300.0)), Point::new(400.0, 300.0));
    }
}
