//! Notification queue
//!
//! Every toast owns a timer that removes it after a fixed lifetime. Manual
//! dismissal removes it earlier and cancels that timer. Both paths go through
//! [`FeedbackQueue::remove`], which only acts on toasts that are still visible.

use crate::consts::cli_consts::toast_lifetime;
use crate::events::{EventSender, FeedbackEvent, RemovalReason};
use crate::feedback::toast::{Toast, ToastId, ToastKind};
use crate::logging::log_at;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct QueueInner {
    /// Visible toasts, oldest first.
    visible: Vec<Toast>,
    /// Pending expiry timers, one per visible toast.
    timers: HashMap<ToastId, CancellationToken>,
}

/// Unbounded queue of visible toasts.
#[derive(Clone, Debug)]
pub struct FeedbackQueue {
    inner: Arc<Mutex<QueueInner>>,
    lifetime: Duration,
    events: EventSender,
}

impl FeedbackQueue {
    pub fn new(events: EventSender) -> Self {
        Self::with_lifetime(events, toast_lifetime())
    }

    pub fn with_lifetime(events: EventSender, lifetime: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner::default())),
            lifetime,
            events,
        }
    }

    /// Shows a toast immediately and schedules its removal.
    ///
    /// When `title` is `None` it is derived from `kind`.
    pub async fn notify(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        title: Option<&str>,
    ) -> ToastId {
        let toast = Toast::new(kind, message.into(), title.map(str::to_string));
        let id = toast.id;
        log_at(kind.log_level(), &toast.to_string());

        let cancel = CancellationToken::new();
        {
            let mut inner = self.inner.lock().await;
            inner.visible.push(toast.clone());
            inner.timers.insert(id, cancel.clone());
        }

        self.events.send_event(FeedbackEvent::Shown(toast)).await;
        self.schedule_expiry(id, cancel);
        id
    }

    pub async fn success(&self, message: impl Into<String>) -> ToastId {
        self.notify(message, ToastKind::Success, None).await
    }

    pub async fn error(&self, message: impl Into<String>) -> ToastId {
        self.notify(message, ToastKind::Error, None).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> ToastId {
        self.notify(message, ToastKind::Warning, None).await
    }

    pub async fn info(&self, message: impl Into<String>) -> ToastId {
        self.notify(message, ToastKind::Info, None).await
    }

    /// User-triggered early removal. Returns false if the toast was already gone.
    pub async fn dismiss(&self, id: ToastId) -> bool {
        self.remove(id, RemovalReason::Dismissed).await
    }

    /// Snapshot of the visible toasts, oldest first.
    pub async fn visible(&self) -> Vec<Toast> {
        self.inner.lock().await.visible.clone()
    }

    /// Finds a visible toast whose id starts with `prefix`.
    pub async fn find_by_prefix(&self, prefix: &str) -> Option<ToastId> {
        let inner = self.inner.lock().await;
        inner
            .visible
            .iter()
            .find(|toast| toast.id.matches_prefix(prefix))
            .map(|toast| toast.id)
    }

    fn schedule_expiry(&self, id: ToastId, cancel: CancellationToken) {
        let queue = self.clone();
        let lifetime = self.lifetime;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(lifetime) => {
                    queue.remove(id, RemovalReason::Expired).await;
                }
            }
        });
    }

    /// Removes a toast if it is still visible; a no-op otherwise.
    async fn remove(&self, id: ToastId, reason: RemovalReason) -> bool {
        let toast = {
            let mut inner = self.inner.lock().await;
            let Some(position) = inner.visible.iter().position(|toast| toast.id == id) else {
                return false;
            };
            let mut toast = inner.visible.remove(position);
            if let Some(timer) = inner.timers.remove(&id) {
                timer.cancel();
            }
            if !toast.dismiss() {
                return false;
            }
            toast
        };

        debug!("{} toast {}", reason, id.short());
        self.events
            .send_event(FeedbackEvent::Removed { toast, reason })
            .await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::toast::ToastState;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    fn queue() -> (FeedbackQueue, mpsc::Receiver<FeedbackEvent>) {
        let (tx, rx) = mpsc::channel(128);
        (FeedbackQueue::new(EventSender::new(tx)), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_toast_is_visible_then_expires() {
        let (queue, mut events) = queue();

        let id = queue
            .notify(
                "Task created successfully",
                ToastKind::Success,
                None,
            )
            .await;

        let visible = queue.visible().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Success");
        assert_eq!(visible[0].message, "Task created successfully");
        assert!(matches!(events.try_recv(), Ok(FeedbackEvent::Shown(t)) if t.id == id));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(queue.visible().await.len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(queue.visible().await.is_empty());
        match events.try_recv() {
            Ok(FeedbackEvent::Removed { toast, reason }) => {
                assert_eq!(toast.id, id);
                assert_eq!(reason, RemovalReason::Expired);
                assert_eq!(toast.state(), ToastState::Dismissed);
            }
            other => panic!("expected removal, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismissal_then_timer_is_a_no_op() {
        let (queue, mut events) = queue();
        let id = queue.info("hello").await;
        let _shown = events.try_recv().unwrap();

        assert!(queue.dismiss(id).await);
        assert!(queue.visible().await.is_empty());

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert!(!queue.dismiss(id).await);
        assert!(matches!(
            events.try_recv(),
            Ok(FeedbackEvent::Removed {
                reason: RemovalReason::Dismissed,
                ..
            })
        ));
        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_toasts_append_without_reordering() {
        let (queue, _events) = queue();
        let first = queue.success("one").await;
        let second = queue.error("two").await;
        let third = queue.info("three").await;

        queue.dismiss(second).await;

        let ids: Vec<ToastId> = queue.visible().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_accumulate_without_limit() {
        let (queue, _events) = queue();
        for n in 0..40 {
            queue.info(format!("toast {}", n)).await;
        }
        assert_eq!(queue.visible().await.len(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_toast_expires_on_its_own_timer() {
        let (queue, _events) = queue();
        let early = queue.info("early").await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let late = queue.info("late").await;

        tokio::time::sleep(Duration::from_millis(2500)).await;

        let ids: Vec<ToastId> = queue.visible().await.iter().map(|t| t.id).collect();
        assert!(!ids.contains(&early));
        assert_eq!(ids, vec![late]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_by_prefix() {
        let (queue, _events) = queue();
        let id = queue.warning("careful").await;

        assert_eq!(queue.find_by_prefix(&id.short()).await, Some(id));
        assert_eq!(queue.find_by_prefix("zzzz").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_renderer_does_not_break_notify() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let queue = FeedbackQueue::new(EventSender::new(tx));

        let id = queue.error("nobody listens").await;

        assert!(queue.dismiss(id).await);
    }
}
