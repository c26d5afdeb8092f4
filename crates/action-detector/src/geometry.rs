//! Keypoint lookup, confidence filtering and shoulder-width scale.

use crate::types::{Keypoint, Landmark, Pose};

/// Shoulder distances below this are treated as degenerate.
const MIN_SCALE: f64 = 1e-6;

#[inline]
pub fn euclidean_distance(a: &Keypoint, b: &Keypoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Returns the landmark only if present, finite and at least `min_score`
/// confident. No pose means nothing is found.
pub fn pick<'a>(pose: Option<&'a Pose>, landmark: Landmark, min_score: f64) -> Option<&'a Keypoint> {
    let name = landmark.as_str();
    pose?
        .keypoints
        .iter()
        .find(|kp| kp.name == name)
        .filter(|kp| kp.confidence() >= min_score && kp.x.is_finite() && kp.y.is_finite())
}

/// Tries `candidates` in priority order and stops at the first usable one.
pub fn pick_first<'a>(
    pose: Option<&'a Pose>,
    candidates: &[Landmark],
    min_score: f64,
) -> Option<&'a Keypoint> {
    candidates
        .iter()
        .find_map(|&landmark| pick(pose, landmark, min_score))
}

/// Shoulder width of the body, or `fallback` when it cannot be measured.
pub fn shoulder_scale(pose: Option<&Pose>, min_score: f64, fallback: f64) -> f64 {
    let left = pick(pose, Landmark::LeftShoulder, min_score);
    let right = pick(pose, Landmark::RightShoulder, min_score);

    match (left, right) {
        (Some(l), Some(r)) => {
            let width = euclidean_distance(l, r);
            if width.is_finite() && width > MIN_SCALE {
                width
            } else {
                fallback
            }
        }
        _ => fallback,
    }
}
