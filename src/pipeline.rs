// src/pipeline.rs - Per-frame gesture capture, classification and dispatch
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::capture::PathBuffer;
use crate::classifier::{Classification, GestureClassifier};
use crate::config::PipelineConfig;
use crate::cooldown::{CooldownGate, DispatchOutcome, SpellCast};
use crate::error::ConfigError;
use crate::geometry::Point;
use crate::landmarks::{LandmarkFrame, ScreenMapper};
use crate::loadout::{Loadout, SpellDef};
use crate::pinch::{PinchDetector, PinchState, PinchTransition};
use crate::smoothing::CursorSmoother;

/// Coarse drawing state for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing,
    Casting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    DrawStateChanged(DrawState),
    /// A spell went off; `origin` is the last stroke point in screen space.
    Cast { cast: SpellCast, origin: Point },
    CooldownRejected { spell: SpellDef, remaining: Duration },
}

/// Result of one completed stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeResult {
    pub classification: Classification,
    /// `None` when the stroke matched no gesture and nothing was attempted.
    pub dispatch: Option<DispatchOutcome>,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub cursor: Option<Point>,
    pub pinch: PinchState,
    pub draw_state: DrawState,
    pub stroke: Option<StrokeResult>,
    /// A stroke was interrupted by losing the hand and thrown away.
    pub stroke_discarded: bool,
    pub events: Vec<PipelineEvent>,
}

impl FrameOutcome {
    pub fn casts(&self) -> impl Iterator<Item = &SpellCast> {
        self.events.iter().filter_map(|event| match event {
            PipelineEvent::Cast { cast, .. } => Some(cast),
            _ => None,
        })
    }

    /// Replays this frame's events onto a listener.
    pub fn notify<L: CastListener + ?Sized>(&self, listener: &mut L) {
        for event in &self.events {
            match event {
                PipelineEvent::DrawStateChanged(state) => listener.on_draw_state_changed(*state),
                PipelineEvent::Cast { cast, origin } => listener.on_cast(cast, *origin),
                PipelineEvent::CooldownRejected { spell, remaining } => {
                    listener.on_cooldown_rejected(spell, *remaining)
                }
            }
        }
    }
}

/// Game/combat layer hooks. Every method defaults to doing nothing.
pub trait CastListener {
    fn on_cast(&mut self, _cast: &SpellCast, _origin: Point) {}

    fn on_cooldown_rejected(&mut self, _spell: &SpellDef, _remaining: Duration) {}

    fn on_draw_state_changed(&mut self, _state: DrawState) {}
}

/// Owns all mutable per-frame state: pinch flag, cursor, stroke buffer,
/// cooldowns and draw state. Drive it with one `process_frame` call per
/// detector frame.
pub struct GesturePipeline {
    config: PipelineConfig,
    pinch: PinchDetector,
    smoother: CursorSmoother,
    path: PathBuffer,
    classifier: GestureClassifier,
    cooldowns: CooldownGate,
    draw_state: DrawState,
    casting_until: Option<Duration>,
}

impl GesturePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            pinch: PinchDetector::new(&config.pinch),
            smoother: CursorSmoother::new(&config.smoothing),
            path: PathBuffer::new(&config.capture),
            classifier: GestureClassifier::new(config.classifier.clone()),
            cooldowns: CooldownGate::new(),
            draw_state: DrawState::Idle,
            casting_until: None,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cursor(&self) -> Option<Point> {
        self.smoother.cursor()
    }

    pub fn is_pinched(&self) -> bool {
        self.pinch.is_pinched()
    }

    /// Live stroke for the trail renderer.
    pub fn path_points(&self) -> &[Point] {
        self.path.points()
    }

    pub fn draw_state(&self) -> DrawState {
        self.draw_state
    }

    pub fn cooldowns(&self) -> &CooldownGate {
        &self.cooldowns
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Clears cooldowns and any stroke in progress, e.g. on a new game.
    pub fn reset_session(&mut self) {
        self.cooldowns.reset();
        self.path.clear();
        self.pinch.cancel();
        self.smoother.clear();
        self.draw_state = DrawState::Idle;
        self.casting_until = None;
    }

    /// Processes one detector frame. `None` means no hand was detected.
    pub fn process_frame<M, L>(
        &mut self,
        frame: Option<&LandmarkFrame>,
        mapper: &M,
        loadout: &L,
        now: Duration,
    ) -> FrameOutcome
    where
        M: ScreenMapper + ?Sized,
        L: Loadout + ?Sized,
    {
        let mut events = Vec::new();
        let mut stroke = None;
        let mut stroke_discarded = false;

        match frame {
            None => {
                self.smoother.clear();
                if self.pinch.cancel() {
                    let dropped = self.path.take();
                    warn!(points = dropped.len(), "hand lost mid-stroke, discarding");
                    stroke_discarded = true;
                    self.set_draw_state(DrawState::Idle, &mut events);
                }
            }
            Some(frame) => {
                let raw = mapper.to_screen(&frame.index_tip());
                let cursor = self.smoother.update(raw);

                match self.pinch.update(frame.pinch_distance()) {
                    Some(PinchTransition::Down) => {
                        self.path.clear();
                        self.path.push(cursor);
                        self.casting_until = None;
                        self.set_draw_state(DrawState::Drawing, &mut events);
                    }
                    Some(PinchTransition::Up) => {
                        let points = self.path.take();
                        stroke = Some(self.finish_stroke(
                            &points,
                            mapper.canvas_size(),
                            loadout,
                            now,
                            &mut events,
                        ));
                    }
                    None if self.pinch.is_pinched() => {
                        self.path.push(cursor);
                    }
                    None => {}
                }
            }
        }

        if self.draw_state == DrawState::Casting
            && self.casting_until.map_or(true, |until| now >= until)
        {
            self.casting_until = None;
            self.set_draw_state(DrawState::Idle, &mut events);
        }

        FrameOutcome {
            cursor: self.smoother.cursor(),
            pinch: self.pinch.state(),
            draw_state: self.draw_state,
            stroke,
            stroke_discarded,
            events,
        }
    }

    fn finish_stroke<L: Loadout + ?Sized>(
        &mut self,
        points: &[Point],
        (width, height): (f64, f64),
        loadout: &L,
        now: Duration,
        events: &mut Vec<PipelineEvent>,
    ) -> StrokeResult {
        // Classify in canvas-normalized units so thresholds do not depend on
        // the canvas resolution.
        let width = if width > 0.0 { width } else { 1.0 };
        let height = if height > 0.0 { height } else { 1.0 };
        let normalized: Vec<Point> = points
            .iter()
            .map(|p| Point::new(p.x / width, p.y / height))
            .collect();

        let classification = self.classifier.classify(&normalized);
        debug!(
            points = points.len(),
            label = %classification.label,
            verdict = ?classification.verdict,
            "stroke classified"
        );

        if !classification.is_match() {
            self.set_draw_state(DrawState::Idle, events);
            return StrokeResult {
                classification,
                dispatch: None,
                points: points.len(),
            };
        }

        let outcome = self.cooldowns.try_cast(classification.label, loadout, now);
        match &outcome {
            DispatchOutcome::Cast(cast) => {
                let origin = points.last().copied().unwrap_or_else(Point::origin);
                events.push(PipelineEvent::Cast {
                    cast: cast.clone(),
                    origin,
                });
                self.casting_until = Some(now + self.config.dispatch.casting_hold());
                self.set_draw_state(DrawState::Casting, events);
            }
            DispatchOutcome::RejectedCooldown {
                spell, remaining, ..
            } => {
                events.push(PipelineEvent::CooldownRejected {
                    spell: spell.clone(),
                    remaining: *remaining,
                });
                self.set_draw_state(DrawState::Idle, events);
            }
            DispatchOutcome::RejectedUnmapped { .. } => {
                self.set_draw_state(DrawState::Idle, events);
            }
        }

        StrokeResult {
            classification,
            dispatch: Some(outcome),
            points: points.len(),
        }
    }

    fn set_draw_state(&mut self, state: DrawState, events: &mut Vec<PipelineEvent>) {
        if self.draw_state != state {
            self.draw_state = state;
            events.push(PipelineEvent::DrawStateChanged(state));
        }
    }
}
