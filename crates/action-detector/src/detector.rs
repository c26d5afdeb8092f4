//! Detector facade: configuration plus the state store behind one call.

use crate::config::DetectorConfig;
use crate::error::DetectError;
use crate::store::TaskStateStore;
use crate::tasks;
use crate::types::{Detection, PoseFrame, TaskKind, TaskState};

/// Source of "now" in wall-clock milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionDetector {
    config: DetectorConfig,
    store: TaskStateStore,
}

impl ActionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            store: TaskStateStore::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Feeds one frame to `task`'s machine.
    ///
    /// Frames for a task must arrive in non-decreasing `now_ms` order.
    pub fn detect(&mut self, task: TaskKind, frame: &PoseFrame, now_ms: i64) -> Detection {
        let state = self.store.get_or_insert(task);
        let detection = tasks::step(task, state, frame, now_ms, &self.config);
        tracing::trace!(
            task = %task,
            phase = %state.phase,
            status = %detection.status,
            done = detection.done,
            now_ms,
            "frame classified"
        );
        detection
    }

    /// Like [`detect`](Self::detect) but with the task given by its wire
    /// name. Unknown names fail before any state is created.
    pub fn detect_named(
        &mut self,
        task: &str,
        frame: &PoseFrame,
        now_ms: i64,
    ) -> Result<Detection, DetectError> {
        let task: TaskKind = task.parse()?;
        Ok(self.detect(task, frame, now_ms))
    }

    /// Stamps the frame with `clock` before classifying it.
    pub fn detect_now<C: Clock>(&mut self, task: TaskKind, frame: &PoseFrame, clock: &C) -> Detection {
        self.detect(task, frame, clock.now_ms())
    }

    pub fn state(&self, task: TaskKind) -> Option<&TaskState> {
        self.store.get(task)
    }

    pub fn reset_task(&mut self, task: TaskKind) {
        self.store.reset(task);
    }

    /// Starts a new tracking session for every task.
    pub fn reset_all(&mut self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Keypoint, Phase, Pose, Status};

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_unknown_task_creates_no_state() {
        let mut detector = ActionDetector::default();
        let err = detector
            .detect_named("jumping_jacks", &PoseFrame::empty(), 0)
            .unwrap_err();
        assert_eq!(err, DetectError::InvalidTask("jumping_jacks".to_string()));
        for task in TaskKind::ALL {
            assert!(detector.state(task).is_none());
        }
    }

    #[test]
    fn test_named_dispatch() {
        let mut detector = ActionDetector::default();
        let d = detector
            .detect_named("leave_seat", &PoseFrame::empty(), 0)
            .unwrap();
        assert_eq!(d.text(), "away 0/5 seconds");
        assert!(detector.state(TaskKind::LeaveSeat).is_some());
    }

    #[test]
    fn test_detect_now_uses_clock() {
        let mut detector = ActionDetector::default();
        detector.detect_now(TaskKind::LeaveSeat, &PoseFrame::empty(), &FixedClock(1_000));
        let d = detector.detect_now(TaskKind::LeaveSeat, &PoseFrame::empty(), &FixedClock(6_000));
        assert!(d.done);
    }

    #[test]
    fn test_system_clock_is_wall_time() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_non_finite_override_keeps_drink_working() {
        let config = DetectorConfig::default().with_overrides(|key| {
            (key == "ACTION_NEAR_RATIO").then(|| "NaN".to_string())
        });
        let mut detector = ActionDetector::new(config);
        let hand_at_eye = PoseFrame::single(Pose::new(vec![
            Keypoint::new("left_shoulder", 100.0, 200.0),
            Keypoint::new("right_shoulder", 200.0, 200.0),
            Keypoint::new("left_eye", 120.0, 100.0),
            Keypoint::new("left_wrist", 120.0, 101.0),
        ]));
        for t in 0..30 {
            detector.detect(TaskKind::DrinkWater, &hand_at_eye, t * 200);
        }
        assert_eq!(
            detector.state(TaskKind::DrinkWater).unwrap().phase,
            Phase::HandAway
        );
    }

    #[test]
    fn test_reset_task_restarts_machine() {
        let mut detector = ActionDetector::default();
        let arms_up = PoseFrame::single(Pose::new(vec![
            Keypoint::new("left_shoulder", 100.0, 200.0),
            Keypoint::new("right_shoulder", 200.0, 200.0),
            Keypoint::new("left_wrist", 90.0, 50.0),
            Keypoint::new("right_wrist", 210.0, 50.0),
        ]));
        let d = detector.detect(TaskKind::Stretch, &arms_up, 0);
        assert_eq!(d.status, Status::HoldArmsUp);
        assert_eq!(detector.state(TaskKind::Stretch).unwrap().phase, Phase::ArmsUp);

        detector.reset_task(TaskKind::Stretch);
        assert!(detector.state(TaskKind::Stretch).is_none());

        detector.detect(TaskKind::LeaveSeat, &PoseFrame::empty(), 0);
        detector.reset_all();
        assert!(detector.state(TaskKind::LeaveSeat).is_none());
    }
}
