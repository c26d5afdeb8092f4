#![allow(dead_code)]

use action_detector::{Keypoint, Pose, PoseFrame};

/// Shoulder width used by every fixture below.
pub const SCALE: f64 = 100.0;

pub fn body(points: &[(&str, f64, f64)]) -> PoseFrame {
    PoseFrame::single(Pose::new(
        points
            .iter()
            .map(|&(name, x, y)| Keypoint::new(name, x, y).with_score(0.95))
            .collect(),
    ))
}

/// Right fingertip `distance` below the right outer eye corner.
pub fn hand_at(distance: f64) -> PoseFrame {
    body(&[
        ("left_shoulder", 100.0, 300.0),
        ("right_shoulder", 100.0 + SCALE, 300.0),
        ("right_eye_outer", 180.0, 100.0),
        ("right_index", 180.0, 100.0 + distance),
    ])
}

/// Wrists at the given heights, shoulders at y = 300.
pub fn wrists_at(left_y: f64, right_y: f64) -> PoseFrame {
    body(&[
        ("left_shoulder", 100.0, 300.0),
        ("right_shoulder", 100.0 + SCALE, 300.0),
        ("left_wrist", 80.0, left_y),
        ("right_wrist", 220.0, right_y),
    ])
}

pub fn arms_up() -> PoseFrame {
    wrists_at(150.0, 150.0)
}

pub fn arms_down() -> PoseFrame {
    wrists_at(400.0, 400.0)
}
