// src/capture.rs - Stroke point buffer
use crate::config::CaptureConfig;
use crate::geometry::{distance, Point};

/// Screen-space points of the stroke being drawn.
///
/// A point is stored only when it lies farther than `min_distance` from the
/// last stored one, so a slow or resting finger does not pile up duplicates.
#[derive(Debug, Clone, Default)]
pub struct PathBuffer {
    points: Vec<Point>,
    min_distance: f64,
}

impl PathBuffer {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            points: Vec::new(),
            min_distance: config.min_point_distance,
        }
    }

    /// Returns true if the point was stored.
    pub fn push(&mut self, point: Point) -> bool {
        let accept = self
            .points
            .last()
            .map_or(true, |last| distance(last, &point) > self.min_distance);

        if accept {
            self.points.push(point);
        }
        accept
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Hands the stroke over and leaves the buffer empty.
    pub fn take(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }
}
