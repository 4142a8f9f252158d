//! Event System
//!
//! Feedback events flowing from the notification queue to whatever renders them.

use crate::feedback::Toast;
use crate::logging::{LogLevel, should_log_with_env};
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum RemovalReason {
    /// The toast's lifetime ran out.
    Expired,
    /// The user closed the toast.
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// A toast became visible.
    Shown(Toast),
    /// A toast left the visible set. Emitted at most once per toast.
    Removed { toast: Toast, reason: RemovalReason },
}

impl FeedbackEvent {
    pub fn should_display(&self) -> bool {
        match self {
            FeedbackEvent::Shown(_) => true,
            // Removal notices are bookkeeping; only show them when debugging
            FeedbackEvent::Removed { .. } => should_log_with_env(LogLevel::Debug),
        }
    }
}

impl Display for FeedbackEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackEvent::Shown(toast) => write!(
                f,
                "[{}] {} ({})",
                toast.created_at.format("%H:%M:%S"),
                toast,
                toast.id.short()
            ),
            FeedbackEvent::Removed { toast, reason } => {
                write!(f, "{} toast {}", reason, toast.id.short())
            }
        }
    }
}

/// Sends feedback events without ever failing the caller.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<FeedbackEvent>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<FeedbackEvent>) -> Self {
        Self { sender }
    }

    /// Send an event; a closed renderer is not the sender's problem.
    pub async fn send_event(&self, event: FeedbackEvent) {
        let _ = self.sender.send(event).await;
    }
}
