//! Log level selection from `RUST_LOG`.

pub use crate::error_classifier::LogLevel;
use std::env;

/// Target name directives must use to address this binary specifically.
const CRATE_TARGET: &str = "admin_console";

pub fn get_rust_log_level() -> LogLevel {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    parse_rust_log_level(&rust_log)
}

fn parse_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(LogLevel::Trace),
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warn),
        "error" => Some(LogLevel::Error),
        _ => None,
    }
}

/// Picks a level out of an env_logger-style directive list.
///
/// A directive for this crate wins over a bare level; directives for other
/// targets are ignored. Falls back to info.
pub fn parse_rust_log_level(rust_log: &str) -> LogLevel {
    let mut global = None;
    for directive in rust_log.split(',') {
        match directive.split_once('=') {
            Some((target, level)) if target.trim() == CRATE_TARGET => {
                if let Some(level) = parse_level(level) {
                    return level;
                }
            }
            Some(_) => {}
            None => global = global.or_else(|| parse_level(directive)),
        }
    }
    global.unwrap_or(LogLevel::Info)
}

pub fn should_log(event_level: LogLevel, threshold: LogLevel) -> bool {
    event_level >= threshold
}

pub fn should_log_with_env(event_level: LogLevel) -> bool {
    should_log(event_level, get_rust_log_level())
}

/// Emits `msg` through the `log` facade at `level`.
pub fn log_at(level: LogLevel, msg: &str) {
    let level: log::Level = level.into();
    log::log!(level, "{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_levels() {
        assert_eq!(parse_rust_log_level("debug"), LogLevel::Debug);
        assert_eq!(parse_rust_log_level("WARN"), LogLevel::Warn);
        assert_eq!(parse_rust_log_level("error"), LogLevel::Error);
        assert_eq!(parse_rust_log_level("trace"), LogLevel::Trace);
        assert_eq!(parse_rust_log_level("invalid"), LogLevel::Info);
        assert_eq!(parse_rust_log_level(""), LogLevel::Info);
    }

    #[test]
    fn test_crate_directive_wins() {
        assert_eq!(
            parse_rust_log_level("info,admin_console=trace"),
            LogLevel::Trace
        );
        assert_eq!(
            parse_rust_log_level("admin_console=debug,reqwest=info"),
            LogLevel::Debug
        );
    }

    #[test]
    fn test_other_targets_are_ignored() {
        assert_eq!(parse_rust_log_level("reqwest=trace,warn"), LogLevel::Warn);
        assert_eq!(parse_rust_log_level("hyper=debug"), LogLevel::Info);
    }

    #[test]
    fn test_should_log() {
        assert!(should_log(LogLevel::Error, LogLevel::Debug));
        assert!(should_log(LogLevel::Warn, LogLevel::Warn));
        assert!(!should_log(LogLevel::Debug, LogLevel::Error));
    }
}
