//! Common Types
//!
//! Pose input, task identifiers, per-task state and detection output shared
//! by every module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DetectError;

// ==================== Pose Input ====================

/// A named 2D landmark produced by the pose source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Confidence in [0, 1]; missing means fully confident.
    #[serde(default)]
    pub score: Option<f64>,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Score with the "absent means 1.0" rule applied.
    #[inline]
    pub fn confidence(&self) -> f64 {
        self.score.unwrap_or(1.0)
    }
}

/// Keypoints of one detected body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }
}

/// Everything the pose source reported for one camera frame.
///
/// Only the first pose is consulted; an empty frame means nobody is in view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    #[serde(default)]
    pub poses: Vec<Pose>,
}

impl PoseFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(pose: Pose) -> Self {
        Self { poses: vec![pose] }
    }

    pub fn primary(&self) -> Option<&Pose> {
        self.poses.first()
    }

    pub fn has_body(&self) -> bool {
        !self.poses.is_empty()
    }
}

/// Landmarks the task machines look at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    LeftShoulder,
    RightShoulder,
    LeftWrist,
    RightWrist,
    LeftIndex,
    RightIndex,
    LeftEyeOuter,
    RightEyeOuter,
    LeftEye,
    RightEye,
}

impl Landmark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Tasks ====================

/// The closed set of rest actions the engine recognises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    DrinkWater,
    LeaveSeat,
    Stretch,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [Self::DrinkWater, Self::LeaveSeat, Self::Stretch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DrinkWater => "drink_water",
            Self::LeaveSeat => "leave_seat",
            Self::Stretch => "stretch",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| DetectError::InvalidTask(s.to_string()))
    }
}

/// Union of every task's phases; each machine uses its own subset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Initial,
    HandNearMouth,
    HandAway,
    ArmsUp,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::HandNearMouth => "hand_near_mouth",
            Self::HandAway => "hand_away",
            Self::ArmsUp => "arms_up",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-task record carried across frames.
///
/// Timestamps are wall-clock milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    pub phase: Phase,
    pub phase_entered_at: Option<i64>,
    pub absence_started_at: Option<i64>,
    pub stretch_hold_started_at: Option<i64>,
    /// Only drink_water smooths its signal.
    pub smoothed_distance: Option<f64>,
}

// ==================== Output ====================

/// What the engine reports for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Status {
    Detecting,
    InsufficientKeypoints,
    // drink_water
    WaitingForHand,
    HandApproached,
    HoldNear,
    PutCupDown,
    ConfirmPutDown,
    DrinkComplete,
    // leave_seat
    SeatedDetected,
    Away { elapsed_secs: u64, target_secs: u64 },
    LeftSeatComplete,
    // stretch
    StretchInsufficientKeypoints,
    WaitingForArms,
    HoldArmsUp,
    StretchComplete,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detecting => f.write_str("detecting…"),
            Self::InsufficientKeypoints => f.write_str(
                "insufficient keypoints (move closer to the camera or use a full-body model)",
            ),
            Self::WaitingForHand => f.write_str("waiting for hand to approach…"),
            Self::HandApproached => f.write_str("hand approached"),
            Self::HoldNear => f.write_str("hold near position…"),
            Self::PutCupDown => f.write_str("put the cup down"),
            Self::ConfirmPutDown => f.write_str("confirm put-down…"),
            Self::DrinkComplete => f.write_str("drinking action complete"),
            Self::SeatedDetected => f.write_str("seated posture detected"),
            Self::Away {
                elapsed_secs,
                target_secs,
            } => write!(f, "away {elapsed_secs}/{target_secs} seconds"),
            Self::LeftSeatComplete => f.write_str("left seat — complete"),
            Self::StretchInsufficientKeypoints => f.write_str("insufficient keypoints (stretch)"),
            Self::WaitingForArms => f.write_str("waiting for both hands above shoulders…"),
            Self::HoldArmsUp => f.write_str("hold arms up…"),
            Self::StretchComplete => f.write_str("stretch complete"),
        }
    }
}

/// Per-frame result: a status plus whether the task completed on this frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub status: Status,
    pub done: bool,
}

impl Detection {
    pub fn pending(status: Status) -> Self {
        Self {
            status,
            done: false,
        }
    }

    pub fn complete(status: Status) -> Self {
        Self { status, done: true }
    }

    pub fn text(&self) -> String {
        self.status.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_round_trips_wire_names() {
        for task in TaskKind::ALL {
            assert_eq!(task.as_str().parse::<TaskKind>().unwrap(), task);
        }
    }

    #[test]
    fn test_unknown_task_is_invalid() {
        let err = "nap".parse::<TaskKind>().unwrap_err();
        assert!(matches!(err, DetectError::InvalidTask(ref name) if name == "nap"));
    }

    #[test]
    fn test_keypoint_without_score_is_fully_confident() {
        let kp: Keypoint = serde_json::from_str(r#"{"name":"nose","x":1.0,"y":2.0}"#).unwrap();
        assert_eq!(kp.score, None);
        assert_eq!(kp.confidence(), 1.0);
    }

    #[test]
    fn test_frame_primary_is_first_pose() {
        let first = Pose::new(vec![Keypoint::new("nose", 1.0, 1.0)]);
        let second = Pose::new(vec![Keypoint::new("nose", 9.0, 9.0)]);
        let frame = PoseFrame {
            poses: vec![first.clone(), second],
        };
        assert_eq!(frame.primary(), Some(&first));
        assert!(!PoseFrame::empty().has_body());
    }

    #[test]
    fn test_status_text() {
        let away = Status::Away {
            elapsed_secs: 3,
            target_secs: 5,
        };
        assert_eq!(away.to_string(), "away 3/5 seconds");
        assert_eq!(Status::LeftSeatComplete.to_string(), "left seat — complete");
        assert_eq!(Detection::complete(Status::DrinkComplete).text(), "drinking action complete");
    }

    #[test]
    fn test_fresh_task_state() {
        let state = TaskState::default();
        assert_eq!(state.phase, Phase::Initial);
        assert!(state.phase_entered_at.is_none());
        assert!(state.absence_started_at.is_none());
        assert!(state.stretch_hold_started_at.is_none());
        assert!(state.smoothed_distance.is_none());
    }
}
