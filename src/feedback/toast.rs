//! Toast model and its dismissal state machine.

use crate::logging::LogLevel;
use chrono::{DateTime, Local};
use std::fmt::Display;
use uuid::Uuid;

/// Opaque toast identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to pick a toast by hand.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.simple().to_string().starts_with(&prefix.to_lowercase())
    }
}

impl Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn default_title(&self) -> &'static str {
        match self {
            ToastKind::Success => "Success",
            ToastKind::Error => "Error",
            ToastKind::Warning => "Warning",
            ToastKind::Info => "Information",
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            ToastKind::Error => LogLevel::Error,
            ToastKind::Warning => LogLevel::Warn,
            ToastKind::Success | ToastKind::Info => LogLevel::Info,
        }
    }
}

/// A toast is pending until it is dismissed; there is no way back.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ToastState {
    Pending,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Local>,
    state: ToastState,
}

impl Toast {
    pub fn new(kind: ToastKind, message: String, title: Option<String>) -> Self {
        Self {
            id: ToastId::new(),
            kind,
            title: title.unwrap_or_else(|| kind.default_title().to_string()),
            message,
            created_at: Local::now(),
            state: ToastState::Pending,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ToastState {
        self.state
    }

    /// Moves the toast to `Dismissed`. Returns false if it already was.
    pub fn dismiss(&mut self) -> bool {
        match self.state {
            ToastState::Pending => {
                self.state = ToastState::Dismissed;
                true
            }
            ToastState::Dismissed => false,
        }
    }
}

impl Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
