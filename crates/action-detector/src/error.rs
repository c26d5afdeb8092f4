use thiserror::Error;

/// Errors raised while dispatching frames to the task machines.
///
/// Missing bodies and weak keypoints are not errors; they come back as
/// ordinary statuses.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectError {
    #[error("invalid task: {0}")]
    InvalidTask(String),
    #[error("frame timestamp {current} is earlier than previous frame {previous}")]
    NonMonotonicTimestamp { previous: i64, current: i64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
