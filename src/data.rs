// src/data.rs
use crate::cooldown::DispatchOutcome;
use crate::pipeline::StrokeResult;
use anyhow::Result;
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct StrokeRecord {
    timestamp_ms: u64,
    points: usize,
    gesture: String,
    score: Option<f64>,
    straightness: Option<f64>,
    outcome: &'static str,
    spell_id: Option<String>,
    spell_name: Option<String>,
    cast_id: Option<String>,
    cooldown_remaining_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub strokes: usize,
    pub casts: usize,
    pub cooldown_rejections: usize,
    pub unmapped: usize,
    pub unrecognized: usize,
}

/// Collects completed strokes for one session and writes them out.
pub struct SessionRecorder {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<StrokeRecord>,
}

impl SessionRecorder {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn record_stroke(&mut self, stroke: &StrokeResult, at: Duration) {
        let classification = &stroke.classification;
        let mut record = StrokeRecord {
            timestamp_ms: at.as_millis() as u64,
            points: stroke.points,
            gesture: classification.label.to_string(),
            score: classification.score,
            straightness: classification.straightness,
            outcome: "unrecognized",
            spell_id: None,
            spell_name: None,
            cast_id: None,
            cooldown_remaining_ms: None,
        };

        match &stroke.dispatch {
            Some(DispatchOutcome::Cast(cast)) => {
                record.outcome = "cast";
                record.spell_id = Some(cast.spell.id.clone());
                record.spell_name = Some(cast.spell.name.clone());
                record.cast_id = Some(cast.cast_id.to_string());
            }
            Some(DispatchOutcome::RejectedCooldown {
                spell, remaining, ..
            }) => {
                record.outcome = "cooldown";
                record.spell_id = Some(spell.id.clone());
                record.spell_name = Some(spell.name.clone());
                record.cooldown_remaining_ms = Some(remaining.as_millis() as u64);
            }
            Some(DispatchOutcome::RejectedUnmapped { .. }) => {
                record.outcome = "unmapped";
            }
            None => {}
        }

        self.records.push(record);
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary {
            strokes: self.records.len(),
            ..Default::default()
        };
        for record in &self.records {
            match record.outcome {
                "cast" => summary.casts += 1,
                "cooldown" => summary.cooldown_rejections += 1,
                "unmapped" => summary.unmapped += 1,
                _ => summary.unrecognized += 1,
            }
        }
        summary
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("casts.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(csv_path)
    }

    pub fn generate_report(&self) -> Result<PathBuf> {
        let report_path = self.session_dir().join("report.html");

        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&report_path, self.create_html_report())?;
        Ok(report_path)
    }

    fn create_html_report(&self) -> String {
        let summary = self.summary();
        let hit_rate = if summary.strokes == 0 {
            0.0
        } else {
            summary.casts as f64 / summary.strokes as f64 * 100.0
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Spell Session Report - {name}</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; background: #f5f5f5; }}
        .stats {{ background: white; padding: 20px; border-radius: 8px; }}
        .stat-label {{ font-weight: bold; color: #666; }}
        .stat-value {{ color: #4682EA; font-size: 1.2em; }}
    </style>
</head>
<body>
    <h1>Spell Session Report</h1>
    <div class="stats">
        <h2>Session: {name}</h2>
        <p><span class="stat-label">Strokes:</span> <span class="stat-value">{strokes}</span></p>
        <p><span class="stat-label">Spells cast:</span> <span class="stat-value">{casts} ({hit_rate:.1}%)</span></p>
        <p><span class="stat-label">Blocked by cooldown:</span> <span class="stat-value">{cooldown}</span></p>
        <p><span class="stat-label">No spell bound:</span> <span class="stat-value">{unmapped}</span></p>
        <p><span class="stat-label">Unrecognized:</span> <span class="stat-value">{unrecognized}</span></p>
    </div>
</body>
</html>
"#,
            name = self.session_name,
            strokes = summary.strokes,
            casts = summary.casts,
            cooldown = summary.cooldown_rejections,
            unmapped = summary.unmapped,
            unrecognized = summary.unrecognized,
        )
    }
}
