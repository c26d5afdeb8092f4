//! Stretching: both wrists held clearly above both shoulders.
//!
//! Image y grows downward, so "above" means a smaller y.

use super::{enter, held_for};
use crate::config::DetectorConfig;
use crate::geometry::{pick, shoulder_scale};
use crate::types::{Detection, Landmark, Phase, PoseFrame, Status, TaskKind, TaskState};

/// Whether each arm is raised, `None` when a wrist or shoulder is missing.
pub fn arms_raised(frame: &PoseFrame, config: &DetectorConfig) -> Option<(bool, bool)> {
    let pose = frame.primary();
    let min = config.min_confidence;
    let left_wrist = pick(pose, Landmark::LeftWrist, min)?;
    let right_wrist = pick(pose, Landmark::RightWrist, min)?;
    let left_shoulder = pick(pose, Landmark::LeftShoulder, min)?;
    let right_shoulder = pick(pose, Landmark::RightShoulder, min)?;

    let scale = shoulder_scale(pose, min, config.fallback_scale);
    let y_threshold = config.stretch_height_ratio * scale;

    Some((
        left_wrist.y < left_shoulder.y - y_threshold,
        right_wrist.y < right_shoulder.y - y_threshold,
    ))
}

pub fn step(
    state: &mut TaskState,
    frame: &PoseFrame,
    now_ms: i64,
    config: &DetectorConfig,
) -> Detection {
    let Some((left_up, right_up)) = arms_raised(frame, config) else {
        return Detection::pending(Status::StretchInsufficientKeypoints);
    };
    let both_up = left_up && right_up;

    match state.phase {
        Phase::Initial if both_up => {
            enter(TaskKind::Stretch, state, Phase::ArmsUp, now_ms);
            state.stretch_hold_started_at = Some(now_ms);
            Detection::pending(Status::HoldArmsUp)
        }
        Phase::ArmsUp => {
            if both_up && held_for(state.stretch_hold_started_at, now_ms, config.stretch_hold_ms) {
                Detection::complete(Status::StretchComplete)
            } else if !both_up {
                enter(TaskKind::Stretch, state, Phase::Initial, now_ms);
                Detection::pending(Status::Detecting)
            } else {
                Detection::pending(Status::HoldArmsUp)
            }
        }
        _ => Detection::pending(Status::WaitingForArms),
    }
}
