//! Transient user feedback: toasts that expire on their own or are dismissed early.

pub mod queue;
pub mod toast;

pub use queue::FeedbackQueue;
pub use toast::{Toast, ToastKind};
