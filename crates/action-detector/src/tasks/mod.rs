//! Per-task state machines.
//!
//! Each machine takes the task's own [`TaskState`], the current frame and
//! its timestamp, fires at most one transition and reports a [`Detection`].

pub mod drink;
pub mod leave_seat;
pub mod stretch;

use crate::config::DetectorConfig;
use crate::types::{Detection, Phase, PoseFrame, TaskKind, TaskState};

pub fn step(
    task: TaskKind,
    state: &mut TaskState,
    frame: &PoseFrame,
    now_ms: i64,
    config: &DetectorConfig,
) -> Detection {
    match task {
        TaskKind::DrinkWater => drink::step(state, frame, now_ms, config),
        TaskKind::LeaveSeat => leave_seat::step(state, frame, now_ms, config),
        TaskKind::Stretch => stretch::step(state, frame, now_ms, config),
    }
}

/// Moves `state` into `to`, stamping the entry time.
fn enter(task: TaskKind, state: &mut TaskState, to: Phase, now_ms: i64) {
    tracing::debug!(task = %task, from = %state.phase, to = %to, now_ms, "phase transition");
    state.phase = to;
    state.phase_entered_at = Some(now_ms);
}

/// True once `now_ms` is at least `hold_ms` past `since`.
#[inline]
fn held_for(since: Option<i64>, now_ms: i64, hold_ms: i64) -> bool {
    since.is_some_and(|start| now_ms.saturating_sub(start) >= hold_ms)
}
