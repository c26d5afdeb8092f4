use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub task: String,
    pub input: Option<PathBuf>,
    pub detector_config: Option<PathBuf>,
    pub log_level: String,
    /// Directory for the daily rolling log file; `None` keeps logs on stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let task = lookup("REPLAY_TASK").unwrap_or_else(|| "drink_water".to_string());
        let input = lookup("REPLAY_INPUT")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let detector_config = lookup("REPLAY_CONFIG")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let log_dir = lookup("REPLAY_LOG_DIR")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self {
            task,
            input,
            detector_config,
            log_level,
            log_dir,
        }
    }

    /// Positional `<task> [input]` arguments win over the environment.
    /// An input of `-` means stdin.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(task) = args.next() {
            self.task = task;
        }
        if let Some(input) = args.next() {
            self.input = (input != "-").then(|| PathBuf::from(input));
        }
        self
    }
}
