//! One tracking session for a single task.
//!
//! Wraps an [`ActionDetector`] with what a reminder screen needs around the
//! raw classifier: an overall timeout, manual confirm/cancel from the user,
//! and rejection of frames that go back in time.

use serde::{Deserialize, Serialize};

use crate::config::{DetectorConfig, SessionConfig};
use crate::detector::ActionDetector;
use crate::error::DetectError;
use crate::types::{Detection, PoseFrame, Status, TaskKind};

/// A pose frame stamped with its capture time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    #[serde(flatten)]
    pub frame: PoseFrame,
}

impl TimedFrame {
    pub fn new(timestamp_ms: i64, frame: PoseFrame) -> Self {
        Self {
            timestamp_ms,
            frame,
        }
    }
}

/// Camera plus pose-estimation pipeline, seen from the engine.
pub trait PoseSource {
    /// Next frame, or `None` once the source has nothing more to give.
    fn next_frame(&mut self) -> Option<TimedFrame>;
}

impl<I> PoseSource for I
where
    I: Iterator<Item = TimedFrame>,
{
    fn next_frame(&mut self) -> Option<TimedFrame> {
        self.next()
    }
}

/// User input accompanying a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionControl {
    #[default]
    Continue,
    Confirm,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Completed,
    ManuallyConfirmed,
    TimedOut,
    Cancelled,
    SourceExhausted,
}

impl SessionOutcome {
    /// Whether the reminder counts as fulfilled.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::ManuallyConfirmed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionStep {
    Pending(Detection),
    Finished(SessionOutcome),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub task: TaskKind,
    pub outcome: Option<SessionOutcome>,
    pub frames_processed: u64,
    pub elapsed_ms: i64,
    pub last_status: Option<Status>,
}

impl SessionReport {
    pub fn last_text(&self) -> Option<String> {
        self.last_status.map(|s| s.to_string())
    }
}

pub struct DetectionSession {
    task: TaskKind,
    detector: ActionDetector,
    config: SessionConfig,
    started_at: Option<i64>,
    last_timestamp: Option<i64>,
    frames_processed: u64,
    last_status: Option<Status>,
    outcome: Option<SessionOutcome>,
}

impl DetectionSession {
    pub fn new(task: TaskKind, detector_config: DetectorConfig, config: SessionConfig) -> Self {
        Self::with_detector(task, ActionDetector::new(detector_config), config)
    }

    pub fn with_detector(task: TaskKind, detector: ActionDetector, config: SessionConfig) -> Self {
        Self {
            task,
            detector,
            config,
            started_at: None,
            last_timestamp: None,
            frames_processed: 0,
            last_status: None,
            outcome: None,
        }
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn detector(&self) -> &ActionDetector {
        &self.detector
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Processes one frame.
    ///
    /// A finished session keeps returning its outcome. A frame older than
    /// the previous one is rejected without touching any state.
    pub fn step(
        &mut self,
        timed: &TimedFrame,
        control: SessionControl,
    ) -> Result<SessionStep, DetectError> {
        if let Some(outcome) = self.outcome {
            return Ok(SessionStep::Finished(outcome));
        }

        let now = timed.timestamp_ms;
        if let Some(previous) = self.last_timestamp {
            if now < previous {
                tracing::warn!(task = %self.task, previous, current = now, "rejecting out-of-order frame");
                return Err(DetectError::NonMonotonicTimestamp {
                    previous,
                    current: now,
                });
            }
        }
        self.last_timestamp = Some(now);
        let started = *self.started_at.get_or_insert(now);
        self.frames_processed += 1;

        let detection = self.detector.detect(self.task, &timed.frame, now);
        self.last_status = Some(detection.status);
        tracing::debug!(task = %self.task, now_ms = now, status = %detection.status, done = detection.done, "session step");

        let outcome = if detection.done {
            Some(SessionOutcome::Completed)
        } else {
            match control {
                SessionControl::Cancel => Some(SessionOutcome::Cancelled),
                SessionControl::Confirm => Some(SessionOutcome::ManuallyConfirmed),
                SessionControl::Continue
                    if now.saturating_sub(started) > self.config.timeout_ms =>
                {
                    Some(SessionOutcome::TimedOut)
                }
                SessionControl::Continue => None,
            }
        };

        Ok(match outcome {
            Some(outcome) => {
                self.finish(outcome);
                SessionStep::Finished(outcome)
            }
            None => SessionStep::Pending(detection),
        })
    }

    /// Drives frames from `source` until the session finishes.
    ///
    /// `control` is asked once per frame for user input. Out-of-order
    /// frames are skipped.
    pub fn run<S, F>(&mut self, source: &mut S, mut control: F) -> SessionReport
    where
        S: PoseSource + ?Sized,
        F: FnMut(&TimedFrame) -> SessionControl,
    {
        while self.outcome.is_none() {
            let Some(timed) = source.next_frame() else {
                self.finish(SessionOutcome::SourceExhausted);
                break;
            };
            let input = control(&timed);
            if let Err(err) = self.step(&timed, input) {
                tracing::debug!(error = %err, "frame skipped");
            }
        }
        self.report()
    }

    pub fn report(&self) -> SessionReport {
        let elapsed_ms = match (self.started_at, self.last_timestamp) {
            (Some(start), Some(last)) => last.saturating_sub(start),
            _ => 0,
        };
        SessionReport {
            task: self.task,
            outcome: self.outcome,
            frames_processed: self.frames_processed,
            elapsed_ms,
            last_status: self.last_status,
        }
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        tracing::info!(
            task = %self.task,
            outcome = ?outcome,
            frames = self.frames_processed,
            "detection session finished"
        );
        if outcome == SessionOutcome::Completed {
            self.detector.reset_task(self.task);
        }
        self.outcome = Some(outcome);
    }
}
