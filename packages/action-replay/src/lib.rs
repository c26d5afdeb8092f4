//! Replays recorded pose streams through a detection session.
//!
//! Input is JSON lines, one frame per line:
//!
//! ```text
//! {"timestamp": 0, "poses": [{"keypoints": [{"name": "left_wrist", "x": 120.0, "y": 80.0, "score": 0.9}]}]}
//! {"timestamp": 40, "poses": [], "control": "confirm"}
//! ```
//!
//! `control` is optional and stands in for the user's confirm/cancel keys.

pub mod config;
pub mod logging;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use action_detector::{
    ConfigError, DetectError, DetectionSession, DetectorConfig, SessionConfig, SessionControl,
    SessionReport, TaskKind, TimedFrame,
};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read frames: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Frame {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Detect(#[from] DetectError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordedFrame {
    #[serde(flatten)]
    pub timed: TimedFrame,
    #[serde(default)]
    pub control: SessionControl,
}

/// Parses JSON lines, skipping blank ones.
pub fn load_frames<R: BufRead>(reader: R) -> Result<Vec<RecordedFrame>, ReplayError> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = serde_json::from_str(&line).map_err(|source| ReplayError::Frame {
            line: index + 1,
            source,
        })?;
        frames.push(frame);
    }
    Ok(frames)
}

pub fn replay(
    task: TaskKind,
    frames: Vec<RecordedFrame>,
    detector_config: DetectorConfig,
    session_config: SessionConfig,
) -> SessionReport {
    let (timed, controls): (Vec<_>, Vec<_>) =
        frames.into_iter().map(|f| (f.timed, f.control)).unzip();
    let mut controls = controls.into_iter();

    let mut session = DetectionSession::new(task, detector_config, session_config);
    // run pulls one control per frame, in order
    session.run(&mut timed.into_iter(), |_| controls.next().unwrap_or_default())
}

fn load_detector_config(path: Option<&Path>) -> Result<DetectorConfig, ReplayError> {
    let config = match path {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };
    let config = config.with_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Resolves the task, config and input named by `config` and replays it.
pub fn run(config: &Config) -> Result<SessionReport, ReplayError> {
    let task: TaskKind = config.task.parse()?;
    let detector_config = load_detector_config(config.detector_config.as_deref())?;
    let session_config = SessionConfig::from_env();
    session_config.validate()?;

    let frames = match &config.input {
        Some(path) => load_frames(BufReader::new(File::open(path)?))?,
        None => load_frames(std::io::stdin().lock())?,
    };
    tracing::info!(task = %task, frames = frames.len(), "replaying recorded frames");

    Ok(replay(task, frames, detector_config, session_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_detector::SessionOutcome;
    use std::io::Cursor;
    use std::io::Write;

    fn absent_lines(count: i64, step: i64) -> String {
        (0..count)
            .map(|i| format!(r#"{{"timestamp": {}, "poses": []}}"#, i * step))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_load_frames_skips_blank_lines() {
        let input = "\n{\"timestamp\": 5}\n\n{\"timestamp\": 9, \"control\": \"cancel\"}\n";
        let frames = load_frames(Cursor::new(input)).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].control, SessionControl::Continue);
        assert_eq!(frames[1].timed.timestamp_ms, 9);
        assert_eq!(frames[1].control, SessionControl::Cancel);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let input = "{\"timestamp\": 0}\nnot json\n";
        let err = load_frames(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, ReplayError::Frame { line: 2, .. }));
    }

    #[test]
    fn test_replay_leave_seat() {
        let frames = load_frames(Cursor::new(absent_lines(7, 1000))).unwrap();
        let report = replay(
            TaskKind::LeaveSeat,
            frames,
            DetectorConfig::default(),
            SessionConfig::default(),
        );
        assert_eq!(report.outcome, Some(SessionOutcome::Completed));
        assert_eq!(report.elapsed_ms, 5000);
    }

    #[test]
    fn test_replay_honours_recorded_control() {
        let input = "{\"timestamp\": 0}\n{\"timestamp\": 100, \"control\": \"confirm\"}\n{\"timestamp\": 200}\n";
        let frames = load_frames(Cursor::new(input)).unwrap();
        let report = replay(
            TaskKind::Stretch,
            frames,
            DetectorConfig::default(),
            SessionConfig::default(),
        );
        assert_eq!(report.outcome, Some(SessionOutcome::ManuallyConfirmed));
        assert_eq!(report.frames_processed, 2);
    }

    #[test]
    fn test_run_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", absent_lines(3, 1000)).unwrap();

        let config = Config {
            task: "leave_seat".to_string(),
            input: Some(file.path().to_path_buf()),
            detector_config: None,
            log_level: "info".to_string(),
            log_dir: None,
        };
        let report = run(&config).unwrap();
        assert_eq!(report.outcome, Some(SessionOutcome::SourceExhausted));
        assert_eq!(report.last_text().as_deref(), Some("away 2/5 seconds"));
    }

    #[test]
    fn test_run_rejects_unknown_task() {
        let config = Config {
            task: "nap".to_string(),
            input: None,
            detector_config: None,
            log_level: "info".to_string(),
            log_dir: None,
        };
        let err = run(&config).unwrap_err();
        assert!(matches!(err, ReplayError::Detect(DetectError::InvalidTask(_))));
    }

    #[test]
    fn test_detector_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"absenceTargetMs": 2000}}"#).unwrap();
        let config = load_detector_config(Some(file.path())).unwrap();
        assert_eq!(config.absence_target_ms, 2000);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{"nearRatio": 0.5, "farRatio": 0.4}}"#).unwrap();
        assert!(matches!(
            load_detector_config(Some(bad.path())),
            Err(ReplayError::Config(ConfigError::Invalid { .. }))
        ));
    }
}
