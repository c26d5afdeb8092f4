//! Leaving the seat: nobody in view for long enough.

use crate::config::DetectorConfig;
use crate::types::{Detection, PoseFrame, Status, TaskState};

pub fn step(
    state: &mut TaskState,
    frame: &PoseFrame,
    now_ms: i64,
    config: &DetectorConfig,
) -> Detection {
    if frame.has_body() {
        if state.absence_started_at.take().is_some() {
            tracing::debug!(now_ms, "body back in view, absence timer cleared");
        }
        return Detection::pending(Status::SeatedDetected);
    }

    let started = *state.absence_started_at.get_or_insert(now_ms);
    let elapsed = now_ms.saturating_sub(started).max(0);

    if elapsed >= config.absence_target_ms {
        return Detection::complete(Status::LeftSeatComplete);
    }

    Detection::pending(Status::Away {
        elapsed_secs: (elapsed / 1000) as u64,
        target_secs: config.absence_target_secs(),
    })
}
