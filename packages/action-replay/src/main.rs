use std::process::ExitCode;

use action_replay::config::Config;
use action_replay::logging;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env().with_args(std::env::args().skip(1));
    let _log_guard = logging::init_tracing(&config);

    let report = match action_replay::run(&config) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "replay failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode report");
            return ExitCode::FAILURE;
        }
    }

    if report.outcome.is_some_and(|o| o.is_success()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
