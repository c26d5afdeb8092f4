//! # action-detector - rest action detection from pose keypoints
//!
//! Turns a stream of 2D body keypoints into rest-reminder events:
//!
//! - **drink_water** - a hand held at the face, then lowered
//! - **leave_seat** - nobody in view for a few seconds
//! - **stretch** - both wrists held above the shoulders
//!
//! Each task is a small state machine fed once per frame. Distances are
//! measured against the shoulder width so the thresholds hold at any camera
//! distance. Camera capture and the pose network live outside this crate;
//! frames come in through [`PoseSource`] or direct calls.
//!
//! ## Modules
//!
//! - [`types`] - keypoints, poses, tasks, phases, statuses
//! - [`geometry`] - confidence-filtered lookup and shoulder scale
//! - [`smoothing`] - exponential smoothing
//! - [`tasks`] - the three state machines
//! - [`store`] - per-task state records
//! - [`detector`] - config plus store behind a single call
//! - [`session`] - timeout, manual confirm/cancel, frame ordering
//! - [`config`] - thresholds and durations
//!
//! ## Example
//!
//! ```rust
//! use action_detector::{ActionDetector, DetectorConfig, PoseFrame, TaskKind};
//!
//! let mut detector = ActionDetector::new(DetectorConfig::default());
//! let first = detector.detect(TaskKind::LeaveSeat, &PoseFrame::empty(), 0);
//! assert_eq!(first.text(), "away 0/5 seconds");
//!
//! let later = detector.detect(TaskKind::LeaveSeat, &PoseFrame::empty(), 5_000);
//! assert!(later.done);
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod session;
pub mod smoothing;
pub mod store;
pub mod tasks;
pub mod types;

pub use config::{DetectorConfig, SessionConfig};
pub use detector::{ActionDetector, Clock, SystemClock};
pub use error::{ConfigError, DetectError};
pub use session::{
    DetectionSession, PoseSource, SessionControl, SessionOutcome, SessionReport, SessionStep,
    TimedFrame,
};
pub use store::TaskStateStore;
pub use types::*;
