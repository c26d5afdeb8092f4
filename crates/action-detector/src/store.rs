use std::collections::HashMap;

use crate::types::{TaskKind, TaskState};

/// Per-task state, one record per task that has been queried.
///
/// Owned by whoever runs the session; separate stores never share state.
#[derive(Debug, Clone, Default)]
pub struct TaskStateStore {
    states: HashMap<TaskKind, TaskState>,
}

impl TaskStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, task: TaskKind) -> Option<&TaskState> {
        self.states.get(&task)
    }

    /// Returns the task's record, creating a fresh one on first use.
    pub fn get_or_insert(&mut self, task: TaskKind) -> &mut TaskState {
        self.states.entry(task).or_insert_with(|| {
            tracing::debug!(task = %task, "task state created");
            TaskState::default()
        })
    }

    /// Drops one task's record; the next query starts from `initial`.
    pub fn reset(&mut self, task: TaskKind) {
        self.states.remove(&task);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    #[test]
    fn test_lazy_creation() {
        let mut store = TaskStateStore::new();
        assert!(store.get(TaskKind::Stretch).is_none());
        store.get_or_insert(TaskKind::Stretch).phase = Phase::ArmsUp;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(TaskKind::Stretch).unwrap().phase, Phase::ArmsUp);
        // second lookup keeps the existing record
        assert_eq!(store.get_or_insert(TaskKind::Stretch).phase, Phase::ArmsUp);
    }

    #[test]
    fn test_reset_only_touches_one_task() {
        let mut store = TaskStateStore::new();
        store.get_or_insert(TaskKind::Stretch).phase = Phase::ArmsUp;
        store.get_or_insert(TaskKind::LeaveSeat).absence_started_at = Some(7);

        store.reset(TaskKind::Stretch);
        assert!(store.get(TaskKind::Stretch).is_none());
        assert_eq!(store.get(TaskKind::LeaveSeat).unwrap().absence_started_at, Some(7));

        store.clear();
        assert!(store.is_empty());
    }
}
