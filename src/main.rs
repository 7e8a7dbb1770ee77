// src/main.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use spell_gesture::{
    CastListener, DrawState, Element, ElementKit, GesturePipeline, LandmarkFrame, PipelineConfig,
    Point, SessionRecorder, SpellCast, SpellDef, Viewport,
};

const USAGE: &str = "usage: spell_gesture <recording.jsonl> [element] [output_dir]";

/// One line of a landmark recording.
#[derive(Debug, Deserialize)]
struct RecordedFrame {
    t_ms: u64,
    landmarks: Option<Vec<[f64; 3]>>,
}

struct LogListener;

impl CastListener for LogListener {
    fn on_cast(&mut self, cast: &SpellCast, origin: Point) {
        info!(
            spell = %cast.spell.name,
            gesture = %cast.gesture,
            x = origin.x,
            y = origin.y,
            cast_id = %cast.cast_id,
            "cast"
        );
    }

    fn on_cooldown_rejected(&mut self, spell: &SpellDef, remaining: Duration) {
        info!(spell = %spell.name, remaining_ms = remaining.as_millis() as u64, "on cooldown");
    }

    fn on_draw_state_changed(&mut self, state: DrawState) {
        debug!(?state, "draw state");
    }
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("SpellGesture")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let recording = PathBuf::from(args.next().context(USAGE)?);
    let element = match args.next() {
        Some(name) => name.parse::<Element>()?,
        None => Element::Fire,
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(default_output_dir);

    let config = match PipelineConfig::default_path() {
        Some(path) => PipelineConfig::load_or_default(&path)?,
        None => PipelineConfig::default(),
    };
    let mut pipeline = GesturePipeline::new(config)?;

    // Webcam-style view: selfie mirrored and letterboxed.
    let viewport = Viewport::new(1280.0, 720.0, 1280.0, 720.0).with_mirroring(true);
    let kit = ElementKit::stock(element);
    let mut recorder = SessionRecorder::new(&output_dir, None);
    let mut listener = LogListener;

    info!(
        recording = %recording.display(),
        %element,
        session = recorder.session_name(),
        "replaying recording"
    );

    let file = File::open(&recording)
        .with_context(|| format!("failed to open {}", recording.display()))?;

    let mut frames = 0usize;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let sample: RecordedFrame = serde_json::from_str(&line)
            .with_context(|| format!("line {}: malformed frame", index + 1))?;
        let hand = match sample.landmarks {
            Some(raw) => match LandmarkFrame::from_raw(&raw) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    warn!(line = index + 1, error = %e, "treating malformed hand as missing");
                    None
                }
            },
            None => None,
        };

        let now = Duration::from_millis(sample.t_ms);
        let outcome = pipeline.process_frame(hand.as_ref(), &viewport, &kit, now);
        outcome.notify(&mut listener);
        if let Some(stroke) = &outcome.stroke {
            recorder.record_stroke(stroke, now);
        }
        frames += 1;
    }

    let summary = recorder.summary();
    info!(
        frames,
        strokes = summary.strokes,
        casts = summary.casts,
        cooldown = summary.cooldown_rejections,
        unmapped = summary.unmapped,
        unrecognized = summary.unrecognized,
        "replay finished"
    );

    let csv_path = recorder.export_csv()?;
    let report_path = recorder.generate_report()?;
    info!(csv = %csv_path.display(), report = %report_path.display(), "session exported");

    Ok(())
}
