use crate::api::error::ApiError;
use log::LevelFilter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_api_error(&self, error: &ApiError) -> LogLevel {
        match (error, error.status()) {
            // Critical: nothing will work until the operator reconfigures
            (ApiError::Configuration(_), _) | (_, Some(401 | 403)) => LogLevel::Error,

            // Non-critical: throttling
            (_, Some(429)) => LogLevel::Debug,

            // Temporary server or network issues
            (_, Some(500..=599)) | (ApiError::Transport(_), _) => LogLevel::Warn,

            // Business-rule rejections
            _ => LogLevel::Info,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16) -> ApiError {
        ApiError::Rejected {
            status,
            message: "nope".to_string(),
        }
    }

    #[test]
    fn test_classify_api_error() {
        let classifier = ErrorClassifier::new();

        assert_eq!(
            classifier.classify_api_error(&ApiError::Configuration("x".into())),
            LogLevel::Error
        );
        assert_eq!(classifier.classify_api_error(&rejected(401)), LogLevel::Error);
        assert_eq!(classifier.classify_api_error(&rejected(403)), LogLevel::Error);
        assert_eq!(classifier.classify_api_error(&rejected(429)), LogLevel::Debug);
        assert_eq!(classifier.classify_api_error(&rejected(502)), LogLevel::Warn);
        assert_eq!(classifier.classify_api_error(&rejected(404)), LogLevel::Info);
        assert_eq!(
            classifier.classify_api_error(&ApiError::Transport("x".into())),
            LogLevel::Warn
        );
    }
}
