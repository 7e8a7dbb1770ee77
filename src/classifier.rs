// src/classifier.rs - Stroke classification against the template library
use std::borrow::Cow;

use tracing::debug;

use crate::config::ClassifierConfig;
use crate::geometry::{bounding_box, distance, path_length, Point};
use crate::normalize::{normalize, NormalizedPath};
use crate::templates::{
    GestureLabel, Template, TemplateLibrary, DEFAULT_SCALE_EPSILON, DEFAULT_TEMPLATE_POINTS,
};

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    TooFewPoints,
    TooShort,
    /// Straight stroke recognized from the raw path.
    Line,
    Template {
        name: &'static str,
        reversed: bool,
    },
    /// Nearest template was outside its class threshold.
    NoMatch { nearest: GestureLabel },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: GestureLabel,
    pub verdict: Verdict,
    /// Mean point distance to the best template, when matching ran.
    pub score: Option<f64>,
    pub straightness: Option<f64>,
}

impl Classification {
    fn rejected(verdict: Verdict) -> Self {
        Self {
            label: GestureLabel::None,
            verdict,
            score: None,
            straightness: None,
        }
    }

    pub fn is_match(&self) -> bool {
        !self.label.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelScore {
    pub label: GestureLabel,
    pub score: f64,
}

#[derive(Debug, Clone, Copy)]
struct TemplateMatch {
    label: GestureLabel,
    name: &'static str,
    reversed: bool,
    score: f64,
}

pub struct GestureClassifier {
    config: ClassifierConfig,
    library: Cow<'static, TemplateLibrary>,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let standard = config.resample_points == DEFAULT_TEMPLATE_POINTS
            && config.scale_epsilon == DEFAULT_SCALE_EPSILON;
        let library = if standard {
            Cow::Borrowed(TemplateLibrary::standard())
        } else {
            Cow::Owned(TemplateLibrary::build(
                config.resample_points,
                config.scale_epsilon,
            ))
        };

        Self { config, library }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Classifies a raw stroke given in canvas-normalized coordinates.
    ///
    /// Total over its input: every stroke yields a label, `GestureLabel::None`
    /// included.
    pub fn classify(&self, raw: &[Point]) -> Classification {
        let cfg = &self.config;

        if raw.len() < cfg.min_raw_points {
            debug!(points = raw.len(), "stroke rejected: too few points");
            return Classification::rejected(Verdict::TooFewPoints);
        }

        let length = path_length(raw);
        if length < cfg.min_path_length {
            debug!(length, "stroke rejected: too short");
            return Classification::rejected(Verdict::TooShort);
        }

        let straightness = distance(&raw[0], &raw[raw.len() - 1]) / length;
        if let Some(label) = self.line_direction(raw, straightness) {
            debug!(%label, straightness, "line stroke");
            return Classification {
                label,
                verdict: Verdict::Line,
                score: None,
                straightness: Some(straightness),
            };
        }

        let path = normalize(raw, cfg.resample_points, cfg.scale_epsilon);
        let Some(best) = self.best_match(&path) else {
            return Classification::rejected(Verdict::NoMatch {
                nearest: GestureLabel::None,
            });
        };

        let threshold = cfg.threshold_for(best.label);
        debug!(
            label = %best.label,
            template = best.name,
            reversed = best.reversed,
            score = best.score,
            threshold,
            straightness,
            "best template match"
        );

        if best.score < threshold {
            Classification {
                label: best.label,
                verdict: Verdict::Template {
                    name: best.name,
                    reversed: best.reversed,
                },
                score: Some(best.score),
                straightness: Some(straightness),
            }
        } else {
            Classification {
                label: GestureLabel::None,
                verdict: Verdict::NoMatch {
                    nearest: best.label,
                },
                score: Some(best.score),
                straightness: Some(straightness),
            }
        }
    }

    /// Best score per label over all templates and both drawing directions,
    /// in label order.
    pub fn label_scores(&self, path: &NormalizedPath) -> Vec<LabelScore> {
        let reversed = path.reversed();
        let loop_input = path.is_closed(self.config.closed_gap_ratio);
        let mut scores: Vec<LabelScore> = Vec::new();

        for template in self.library.templates() {
            let score = template_score(path, template, loop_input)
                .min(template_score(&reversed, template, loop_input));

            match scores.iter_mut().find(|s| s.label == template.label) {
                Some(entry) => entry.score = entry.score.min(score),
                None => scores.push(LabelScore {
                    label: template.label,
                    score,
                }),
            }
        }

        scores.sort_by_key(|s| s.label);
        scores
    }

    /// Normalizes a raw stroke the same way `classify` does.
    pub fn normalize(&self, raw: &[Point]) -> NormalizedPath {
        normalize(raw, self.config.resample_points, self.config.scale_epsilon)
    }

    // A straight stroke would be stretched into a meaningless unit square by
    // the anisotropic scaling, so lines are decided from the raw extent.
    fn line_direction(&self, raw: &[Point], straightness: f64) -> Option<GestureLabel> {
        let cfg = &self.config;
        if straightness <= cfg.line_straightness {
            return None;
        }

        let bounds = bounding_box(raw)?;
        let width = bounds.width().max(cfg.line_extent_floor);
        let height = bounds.height().max(cfg.line_extent_floor);

        if height > width * cfg.line_aspect_ratio {
            Some(GestureLabel::VerticalLine)
        } else if width > height * cfg.line_aspect_ratio {
            Some(GestureLabel::HorizontalLine)
        } else {
            // Diagonal: leave it to the templates.
            None
        }
    }

    // Forward pass over every template, then the reversed pass. Strict `<`
    // keeps the first template encountered on ties.
    fn best_match(&self, path: &NormalizedPath) -> Option<TemplateMatch> {
        let reversed = path.reversed();
        let loop_input = path.is_closed(self.config.closed_gap_ratio);
        let mut best: Option<TemplateMatch> = None;

        for (candidate, is_reversed) in [(path, false), (&reversed, true)] {
            for template in self.library.templates() {
                let score = template_score(candidate, template, loop_input);
                if best.map_or(true, |b| score < b.score) {
                    best = Some(TemplateMatch {
                        label: template.label,
                        name: template.name,
                        reversed: is_reversed,
                        score,
                    });
                }
            }
        }

        best
    }
}

// Start-free alignment applies only when both the stroke and the template
// are loops.
fn template_score(candidate: &NormalizedPath, template: &Template, loop_input: bool) -> f64 {
    if loop_input && template.closed {
        candidate.min_rotated_distance(&template.path)
    } else {
        candidate.mean_distance(&template.path)
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
