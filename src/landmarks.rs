// src/landmarks.rs - Adapter between detector output and pipeline points
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::LandmarkError;
use crate::geometry::Point;

pub const HAND_LANDMARK_COUNT: usize = 21;

// MediaPipe hand landmark indices
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

/// One detected hand: 21 landmarks in normalized camera space
/// (x, y in [0, 1], z relative depth).
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Vector3<f64>; HAND_LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: Vec<Vector3<f64>>) -> Result<Self, LandmarkError> {
        let actual = points.len();
        if let Some(index) = points.iter().position(|p| !p.iter().all(|c| c.is_finite())) {
            return Err(LandmarkError::NonFinite { index });
        }

        let points: [Vector3<f64>; HAND_LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::WrongCount {
                expected: HAND_LANDMARK_COUNT,
                actual,
            })?;

        Ok(Self { points })
    }

    /// Builds a frame from raw `[x, y, z]` triples as handed over by the detector.
    pub fn from_raw(raw: &[[f64; 3]]) -> Result<Self, LandmarkError> {
        Self::new(raw.iter().map(|lm| Vector3::new(lm[0], lm[1], lm[2])).collect())
    }

    pub fn landmark(&self, index: usize) -> Option<&Vector3<f64>> {
        self.points.get(index)
    }

    pub fn landmarks(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn thumb_tip(&self) -> Point {
        Point::new(self.points[THUMB_TIP].x, self.points[THUMB_TIP].y)
    }

    pub fn index_tip(&self) -> Point {
        Point::new(self.points[INDEX_TIP].x, self.points[INDEX_TIP].y)
    }

    /// 2D thumb-to-index distance in normalized camera space.
    pub fn pinch_distance(&self) -> f64 {
        crate::geometry::distance(&self.thumb_tip(), &self.index_tip())
    }
}

/// Maps normalized camera coordinates onto the drawing canvas.
pub trait ScreenMapper {
    fn to_screen(&self, normalized: &Point) -> Point;

    /// Canvas size in pixels as (width, height).
    fn canvas_size(&self) -> (f64, f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the canvas, cropping the video.
    Cover,
    /// Show the whole video, letterboxed.
    Contain,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub video_width: f64,
    pub video_height: f64,
    pub fit: FitMode,
    pub mirrored: bool,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64, video_width: f64, video_height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            video_width,
            video_height,
            fit: FitMode::Contain,
            mirrored: false,
        }
    }

    pub fn with_fit(mut self, fit: FitMode) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_mirroring(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    fn scale(&self) -> f64 {
        if self.video_width <= 0.0 || self.video_height <= 0.0 {
            return 1.0;
        }

        let sx = self.canvas_width / self.video_width;
        let sy = self.canvas_height / self.video_height;
        match self.fit {
            FitMode::Cover => sx.max(sy),
            FitMode::Contain => sx.min(sy),
        }
    }
}

impl ScreenMapper for Viewport {
    fn to_screen(&self, normalized: &Point) -> Point {
        let scale = self.scale();
        let scaled_w = self.video_width * scale;
        let scaled_h = self.video_height * scale;
        let offset_x = (self.canvas_width - scaled_w) / 2.0;
        let offset_y = (self.canvas_height - scaled_h) / 2.0;

        let x = if self.mirrored { 1.0 - normalized.x } else { normalized.x };
        Point::new(offset_x + x * scaled_w, offset_y + normalized.y * scaled_h)
    }

    fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_hand() -> Vec<[f64; 3]> {
        (0..HAND_LANDMARK_COUNT)
            .map(|i| [0.3 + i as f64 * 0.01, 0.5, 0.0])
            .collect()
    }

    #[test]
    fn rejects_wrong_landmark_count() {
        let raw = open_hand();
        let err = LandmarkFrame::from_raw(&raw[..20]).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::WrongCount {
                expected: 21,
                actual: 20
            }
        );
    }

    #[test]
    fn rejects_nan_landmarks() {
        let mut raw = open_hand();
        raw[7][1] = f64::NAN;
        assert_eq!(
            LandmarkFrame::from_raw(&raw).unwrap_err(),
            LandmarkError::NonFinite { index: 7 }
        );
    }

    #[test]
    fn pinch_distance_uses_thumb_and_index_tips() {
        let mut raw = open_hand();
        raw[THUMB_TIP] = [0.40, 0.40, 0.2];
        raw[INDEX_TIP] = [0.43, 0.44, -0.3];
        let frame = LandmarkFrame::from_raw(&raw).expect("valid frame");
        assert!((frame.pinch_distance() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn contain_letterboxes_and_mirrors() {
        // 4:3 video inside a 16:9 canvas leaves bars on the left and right.
        let viewport = Viewport::new(1280.0, 720.0, 640.0, 480.0).with_mirroring(true);
        let left_edge = viewport.to_screen(&Point::new(1.0, 0.0));
        assert!((left_edge.x - 160.0).abs() < 1e-9);
        assert!(left_edge.y.abs() < 1e-9);

        let center = viewport.to_screen(&Point::new(0.5, 0.5));
        assert!((center.x - 640.0).abs() < 1e-9);
        assert!((center.y - 360.0).abs() < 1e-9);
    }

    #[test]
    fn cover_crops_the_long_axis() {
        let viewport = Viewport::new(1280.0, 720.0, 640.0, 480.0).with_fit(FitMode::Cover);
        let top_left = viewport.to_screen(&Point::new(0.0, 0.0));
        assert!(top_left.x.abs() < 1e-9);
        assert!((top_left.y + 120.0).abs() < 1e-9);
    }
}
