//! Drinking water: a hand comes up to the face, stays there, then leaves.
//!
//! ```text
//! initial --d < near--> hand_near_mouth --held, d < near--> hand_away --d > far--> done
//!    ^                        |
//!    +-------- d > far -------+
//! ```
//!
//! `far` sits above `near` so a hand hovering around one cutoff cannot
//! flicker the phase.

use super::{enter, held_for};
use crate::config::DetectorConfig;
use crate::geometry::{euclidean_distance, pick_first, shoulder_scale};
use crate::smoothing::smooth;
use crate::types::{Detection, Landmark, Phase, Pose, PoseFrame, Status, TaskKind, TaskState};

/// Hand candidates then eye candidates for each side, best first.
const SIDES: [([Landmark; 2], [Landmark; 2]); 2] = [
    (
        [Landmark::LeftIndex, Landmark::LeftWrist],
        [Landmark::LeftEyeOuter, Landmark::LeftEye],
    ),
    (
        [Landmark::RightIndex, Landmark::RightWrist],
        [Landmark::RightEyeOuter, Landmark::RightEye],
    ),
];

/// Smallest hand-to-eye distance over the sides that can be measured.
pub fn hand_to_eye_distance(pose: Option<&Pose>, min_score: f64) -> Option<f64> {
    SIDES
        .iter()
        .filter_map(|(hands, eyes)| {
            let hand = pick_first(pose, hands, min_score)?;
            let eye = pick_first(pose, eyes, min_score)?;
            Some(euclidean_distance(hand, eye))
        })
        .filter(|d| d.is_finite())
        .reduce(f64::min)
}

pub fn step(
    state: &mut TaskState,
    frame: &PoseFrame,
    now_ms: i64,
    config: &DetectorConfig,
) -> Detection {
    let pose = frame.primary();
    let Some(raw) = hand_to_eye_distance(pose, config.min_confidence) else {
        return Detection::pending(Status::InsufficientKeypoints);
    };

    let scale = shoulder_scale(pose, config.min_confidence, config.fallback_scale);
    let d = smooth(&mut state.smoothed_distance, raw, config.smoothing_alpha);
    let near = config.near_ratio * scale;
    let far = config.far_ratio * scale;

    match state.phase {
        Phase::Initial if d < near => {
            enter(TaskKind::DrinkWater, state, Phase::HandNearMouth, now_ms);
            Detection::pending(Status::HandApproached)
        }
        Phase::HandNearMouth => {
            if d < near && held_for(state.phase_entered_at, now_ms, config.drink_hold_ms) {
                enter(TaskKind::DrinkWater, state, Phase::HandAway, now_ms);
                Detection::pending(Status::PutCupDown)
            } else if d > far {
                enter(TaskKind::DrinkWater, state, Phase::Initial, now_ms);
                Detection::pending(Status::Detecting)
            } else {
                Detection::pending(Status::HoldNear)
            }
        }
        Phase::HandAway if d > far => Detection::complete(Status::DrinkComplete),
        Phase::Initial => Detection::pending(Status::WaitingForHand),
        Phase::HandAway => Detection::pending(Status::ConfirmPutDown),
        // not a drink_water phase
        Phase::ArmsUp => Detection::pending(Status::Detecting),
    }
}
