// src/templates.rs - Gesture labels and the reference shape library
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::normalize::{normalize, NormalizedPath};

pub const DEFAULT_TEMPLATE_POINTS: usize = 32;
pub const DEFAULT_SCALE_EPSILON: f64 = 0.01;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    #[default]
    None,
    Circle,
    Triangle,
    Square,
    Zigzag,
    Checkmark,
    SCurve,
    VerticalLine,
    HorizontalLine,
}

impl GestureLabel {
    pub fn is_none(&self) -> bool {
        *self == GestureLabel::None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::None => "none",
            GestureLabel::Circle => "circle",
            GestureLabel::Triangle => "triangle",
            GestureLabel::Square => "square",
            GestureLabel::Zigzag => "zigzag",
            GestureLabel::Checkmark => "checkmark",
            GestureLabel::SCurve => "s_curve",
            GestureLabel::VerticalLine => "vertical_line",
            GestureLabel::HorizontalLine => "horizontal_line",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical reference shape. Several templates may share a label.
#[derive(Debug, Clone)]
pub struct Template {
    pub label: GestureLabel,
    pub name: &'static str,
    pub path: NormalizedPath,
    /// Loop whose last point repeats its first. A closed stroke may start
    /// anywhere along it.
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
    point_count: usize,
    scale_epsilon: f64,
}

static STANDARD_LIBRARY: Lazy<TemplateLibrary> =
    Lazy::new(|| TemplateLibrary::build(DEFAULT_TEMPLATE_POINTS, DEFAULT_SCALE_EPSILON));

impl TemplateLibrary {
    /// Library built once with the default resampling parameters.
    pub fn standard() -> &'static TemplateLibrary {
        &STANDARD_LIBRARY
    }

    /// Builds every reference shape, normalized exactly like captured strokes.
    /// Lines are left out: they are recognized before template matching.
    pub fn build(point_count: usize, scale_epsilon: f64) -> Self {
        let shapes: Vec<(GestureLabel, &'static str, bool, Vec<Point>)> = vec![
            (GestureLabel::Circle, "circle", true, circle(-FRAC_PI_2)),
            (
                GestureLabel::Square,
                "square",
                true,
                corners(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
            ),
            (
                GestureLabel::Triangle,
                "triangle",
                true,
                corners(&[(0.5, 0.0), (1.0, 1.0), (0.0, 1.0), (0.5, 0.0)]),
            ),
            (
                GestureLabel::Triangle,
                "triangle-v",
                false,
                corners(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]),
            ),
            (
                GestureLabel::Zigzag,
                "zigzag",
                false,
                corners(&[(0.3, 0.0), (0.9, 0.35), (0.1, 0.65), (0.7, 1.0)]),
            ),
            (
                GestureLabel::Checkmark,
                "checkmark",
                false,
                corners(&[(0.0, 0.5), (0.4, 1.0), (1.0, 0.0)]),
            ),
            (
                GestureLabel::SCurve,
                "s-curve",
                false,
                corners(&[(1.0, 0.0), (0.0, 0.2), (1.0, 0.8), (0.0, 1.0)]),
            ),
        ];

        let templates = shapes
            .into_iter()
            .map(|(label, name, closed, points)| Template {
                label,
                name,
                path: normalize(&points, point_count, scale_epsilon),
                closed,
            })
            .collect();

        Self {
            templates,
            point_count,
            scale_epsilon,
        }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn for_label(&self, label: GestureLabel) -> impl Iterator<Item = &Template> {
        self.templates.iter().filter(move |t| t.label == label)
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn scale_epsilon(&self) -> f64 {
        self.scale_epsilon
    }
}

// Clockwise on screen (y grows downwards), one full turn from `start`.
fn circle(start: f64) -> Vec<Point> {
    const STEPS: usize = 32;
    (0..STEPS)
        .map(|i| {
            let angle = start + (i as f64 / (STEPS - 1) as f64) * TAU;
            Point::new(0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin())
        })
        .collect()
}

fn corners(vertices: &[(f64, f64)]) -> Vec<Point> {
    vertices.iter().map(|&(x, y)| Point::new(x, y)).collect()
}
