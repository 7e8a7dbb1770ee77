// src/lib.rs
pub mod capture;
pub mod classifier;
pub mod config;
pub mod cooldown;
pub mod data;
pub mod error;
pub mod geometry;
pub mod landmarks;
pub mod loadout;
pub mod mailbox;
pub mod normalize;
pub mod pinch;
pub mod pipeline;
pub mod smoothing;
pub mod templates;

pub use classifier::{Classification, GestureClassifier, Verdict};
pub use config::PipelineConfig;
pub use cooldown::{CooldownGate, DispatchOutcome, SpellCast};
pub use data::{SessionRecorder, SessionSummary};
pub use error::{ConfigError, LandmarkError, MailboxError};
pub use geometry::Point;
pub use landmarks::{FitMode, LandmarkFrame, ScreenMapper, Viewport};
pub use loadout::{Element, ElementKit, Loadout, SpellDef};
pub use mailbox::{frame_mailbox, DetectorFrame, FramePublisher, FrameReceiver};
pub use pinch::{PinchDetector, PinchState};
pub use pipeline::{
    CastListener, DrawState, FrameOutcome, GesturePipeline, PipelineEvent, StrokeResult,
};
pub use templates::GestureLabel;
