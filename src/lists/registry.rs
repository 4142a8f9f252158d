//! The four named list controllers of the console.

use super::controller::{ListController, ReloadOutcome};
use super::resources::{Broadcasts, Tasks, Users, Withdrawals};
use crate::api::ApiClient;
use crate::feedback::FeedbackQueue;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ListKind {
    Tasks,
    Users,
    Withdrawals,
    Broadcasts,
}

/// Owns one controller per entity. Controllers never see each other.
#[derive(Clone)]
pub struct ControllerRegistry {
    pub tasks: Arc<ListController<Tasks>>,
    pub users: Arc<ListController<Users>>,
    pub withdrawals: Arc<ListController<Withdrawals>>,
    pub broadcasts: Arc<ListController<Broadcasts>>,
}

/// Runs the same controller method on whichever list `kind` names.
macro_rules! dispatch {
    ($registry:expr, $kind:expr, |$controller:ident| $body:expr) => {
        match $kind {
            ListKind::Tasks => {
                let $controller = &$registry.tasks;
                $body
            }
            ListKind::Users => {
                let $controller = &$registry.users;
                $body
            }
            ListKind::Withdrawals => {
                let $controller = &$registry.withdrawals;
                $body
            }
            ListKind::Broadcasts => {
                let $controller = &$registry.broadcasts;
                $body
            }
        }
    };
}

impl ControllerRegistry {
    pub fn new(client: ApiClient, feedback: FeedbackQueue) -> Self {
        Self {
            tasks: Arc::new(ListController::new(client.clone(), feedback.clone())),
            users: Arc::new(ListController::new(client.clone(), feedback.clone())),
            withdrawals: Arc::new(ListController::new(client.clone(), feedback.clone())),
            broadcasts: Arc::new(ListController::new(client, feedback)),
        }
    }

    /// Reloads every list concurrently; completions interleave freely.
    pub async fn reload_all(&self) -> [(ListKind, ReloadOutcome); 4] {
        let (tasks, users, withdrawals, broadcasts) = futures::join!(
            self.tasks.reload(),
            self.users.reload(),
            self.withdrawals.reload(),
            self.broadcasts.reload()
        );
        [
            (ListKind::Tasks, tasks),
            (ListKind::Users, users),
            (ListKind::Withdrawals, withdrawals),
            (ListKind::Broadcasts, broadcasts),
        ]
    }

    pub async fn reload(&self, kind: ListKind) -> ReloadOutcome {
        dispatch!(self, kind, |controller| controller.reload().await)
    }

    pub async fn change_page(&self, kind: ListKind, delta: i64) -> ReloadOutcome {
        dispatch!(self, kind, |controller| controller.change_page(delta).await)
    }

    pub async fn set_filter(&self, kind: ListKind, name: &str, value: &str) -> ReloadOutcome {
        dispatch!(self, kind, |controller| controller.set_filter(name, value).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;
    use crate::events::EventSender;
    use crate::test_support::{json_response, legacy_client};
    use serde_json::json;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[test]
    fn test_list_kind_parses_case_insensitively() {
        assert_eq!("Withdrawals".parse::<ListKind>(), Ok(ListKind::Withdrawals));
        assert_eq!(ListKind::Broadcasts.to_string(), "broadcasts");
        assert!("payouts".parse::<ListKind>().is_err());
    }

    #[tokio::test]
    async fn test_reload_all_hits_every_endpoint_once() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        for (path, key) in [
            ("/admin/tasks/?", "tasks"),
            ("/admin/users?", "users"),
            ("/admin/transactions/withdrawals?", "withdrawals"),
            ("/admin/notifications?", "notifications"),
        ] {
            transport
                .expect_send()
                .withf(move |req| req.url.contains(path))
                .times(1)
                .returning(move |_| {
                    let mut body = json!({ "success": true });
                    body[key] = json!([]);
                    Ok(json_response(200, body))
                });
        }
        let (tx, _rx) = mpsc::channel(16);
        let registry = ControllerRegistry::new(
            legacy_client(&dir, transport),
            FeedbackQueue::new(EventSender::new(tx)),
        );

        let outcomes = registry.reload_all().await;

        for (kind, outcome) in outcomes {
            assert_eq!(outcome, ReloadOutcome::Applied(0), "{}", kind);
        }
    }

    #[tokio::test]
    async fn test_paging_one_list_leaves_others_alone() {
        let dir = tempdir().unwrap();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(json_response(200, json!({ "success": true, "users": [] }))));
        let (tx, _rx) = mpsc::channel(16);
        let registry = ControllerRegistry::new(
            legacy_client(&dir, transport),
            FeedbackQueue::new(EventSender::new(tx)),
        );

        registry.change_page(ListKind::Users, 2).await;

        assert_eq!(registry.users.state().await.page, 3);
        assert_eq!(registry.tasks.state().await.page, 1);
    }
}
