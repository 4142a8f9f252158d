//! Admin actions
//!
//! Mutations and one-off reads issued outside the list controllers. Each
//! action reports its outcome through the notification queue exactly once and
//! refreshes the affected list the way the dashboard did.

use crate::api::error::{ApiError, ApiResult};
use crate::api::{ApiClient, RequestOptions};
use crate::error_classifier::ErrorClassifier;
use crate::feedback::FeedbackQueue;
use crate::lists::ControllerRegistry;
use crate::lists::resources::{display_date, lenient};
use crate::logging::log_at;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Fields of a task as submitted by the task form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub reward: f64,
    pub category: String,
    pub target_url: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl TaskDraft {
    fn to_body(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "reward": self.reward,
            "type": self.category,
            "requirements": {
                "target_url": self.target_url,
                "image_url": self.image_url,
            },
            "is_active": self.is_active,
        })
    }
}

/// Who receives an in-app broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastTarget {
    AllUsers,
    User(String),
}

/// Server reply to a mutation; only the message is of interest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Acknowledgement {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    stats: DashboardStats,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Headline numbers of the legacy dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub activated_users: u64,
    pub total_tasks: u64,
    pub active_tasks: u64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_withdrawals: f64,
    pub pending_withdrawals: u64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_deposits: f64,
}

/// Platform KPIs served by the console API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub total_users: u64,
    pub active_users: u64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_commissions_usd: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_payouts_usd: f64,
}

impl Analytics {
    /// Commissions earned minus payouts sent.
    pub fn profit(&self) -> f64 {
        self.total_commissions_usd - self.total_payouts_usd
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PayoutRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub amount_usd: f64,
    pub gateway: String,
    pub destination: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
}

impl PayoutRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "ID",
        "User",
        "Amount",
        "Gateway",
        "Destination",
        "Status",
        "Created",
    ];

    pub fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user_id.clone(),
            format!("${:.2}", self.amount_usd),
            self.gateway.clone(),
            self.destination.clone().unwrap_or_default(),
            self.status.clone(),
            display_date(&self.created_at),
        ]
    }
}

/// Entry point for every admin operation that is not a list reload.
#[derive(Clone)]
pub struct AdminActions {
    legacy: ApiClient,
    console: ApiClient,
    feedback: FeedbackQueue,
    lists: ControllerRegistry,
    classifier: ErrorClassifier,
}

impl AdminActions {
    pub fn new(
        legacy: ApiClient,
        console: ApiClient,
        feedback: FeedbackQueue,
        lists: ControllerRegistry,
    ) -> Self {
        Self {
            legacy,
            console,
            feedback,
            lists,
            classifier: ErrorClassifier::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Legacy endpoints
    // -------------------------------------------------------------------------

    pub async fn create_task(&self, draft: &TaskDraft) -> ApiResult<()> {
        let result = self
            .legacy
            .post::<Acknowledgement>("/admin/tasks", draft.to_body())
            .await;
        self.settle(result, "Task created successfully", "Failed to create task")
            .await?;
        self.lists.tasks.reload().await;
        Ok(())
    }

    pub async fn update_task(&self, task_id: &str, draft: &TaskDraft) -> ApiResult<()> {
        let result = self
            .legacy
            .put::<Acknowledgement>(&format!("/admin/tasks/{}", task_id), draft.to_body())
            .await;
        self.settle(result, "Task updated successfully", "Failed to update task")
            .await?;
        self.lists.tasks.reload().await;
        Ok(())
    }

    pub async fn toggle_task(&self, task_id: &str, active: bool) -> ApiResult<()> {
        let result = self
            .legacy
            .put::<Acknowledgement>(
                &format!("/admin/tasks/{}/status", task_id),
                json!({ "is_active": active }),
            )
            .await;
        let success = if active {
            "Task activated successfully"
        } else {
            "Task deactivated successfully"
        };
        self.settle(result, success, "Failed to update task status")
            .await?;
        self.lists.tasks.reload().await;
        Ok(())
    }

    pub async fn delete_task(&self, task_id: &str) -> ApiResult<()> {
        let result = self
            .legacy
            .request::<Acknowledgement>(
                &format!("/admin/tasks/{}", task_id),
                RequestOptions::delete(),
            )
            .await;
        self.settle(result, "Task deleted successfully", "Failed to delete task")
            .await?;
        self.lists.tasks.reload().await;
        Ok(())
    }

    pub async fn set_user_status(&self, user_id: &str, status: &str) -> ApiResult<()> {
        let result = self
            .legacy
            .put::<Acknowledgement>(
                &format!("/admin/users/{}/status", user_id),
                json!({ "status": status }),
            )
            .await;
        let success = if status == "active" {
            "User activated successfully"
        } else {
            "User deactivated successfully"
        };
        self.settle(result, success, "Failed to update user status")
            .await?;
        self.lists.users.reload().await;
        Ok(())
    }

    /// Approves a withdrawal and marks it approved in the loaded list.
    pub async fn approve_withdrawal(&self, transaction_id: &str) -> ApiResult<()> {
        let result = self
            .legacy
            .post::<Acknowledgement>(
                "/admin/approve-withdrawal",
                json!({ "transaction_id": transaction_id }),
            )
            .await;
        let ack = match result {
            Ok(ack) => ack,
            Err(error) => return self.fail("Failed to update withdrawal", error).await,
        };

        self.lists
            .withdrawals
            .update_items(|items| {
                for item in items
                    .iter_mut()
                    .filter(|item| item.transaction_id == transaction_id)
                {
                    item.status = "approved".to_string();
                }
            })
            .await;
        let message = ack
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "Withdrawal approved".to_string());
        self.feedback.success(message).await;
        Ok(())
    }

    pub async fn send_broadcast(
        &self,
        title: &str,
        message: &str,
        kind: &str,
        target: &BroadcastTarget,
    ) -> ApiResult<()> {
        let user_id = match target {
            BroadcastTarget::AllUsers => Value::Null,
            BroadcastTarget::User(id) => Value::String(id.clone()),
        };
        let result = self
            .legacy
            .post::<Acknowledgement>(
                "/notifications/create",
                json!({ "title": title, "message": message, "type": kind, "user_id": user_id }),
            )
            .await;
        self.settle(result, "Broadcast sent successfully", "Failed to send broadcast")
            .await?;
        self.lists.broadcasts.reload().await;
        Ok(())
    }

    pub async fn load_stats(&self) -> ApiResult<DashboardStats> {
        let result = self
            .legacy
            .get::<StatsEnvelope>("/admin/dashboard/stats")
            .await;
        let envelope = self
            .settle(
                result,
                "Statistics loaded successfully",
                "Failed to load statistics",
            )
            .await?;
        Ok(envelope.stats)
    }

    // -------------------------------------------------------------------------
    // Console endpoints
    // -------------------------------------------------------------------------

    pub async fn load_analytics(&self) -> ApiResult<Analytics> {
        match self.console_data::<Analytics>("/admin/analytics").await {
            Ok(analytics) => Ok(analytics),
            Err(error) => self.fail("Analytics", error).await,
        }
    }

    pub async fn list_payouts(&self) -> ApiResult<Vec<PayoutRecord>> {
        match self.console_data::<Vec<PayoutRecord>>("/payouts").await {
            Ok(payouts) => Ok(payouts),
            Err(error) => self.fail("Payouts", error).await,
        }
    }

    pub async fn approve_payout(&self, payout_id: &str) -> ApiResult<()> {
        let result = self
            .console
            .post::<Acknowledgement>(&format!("/payouts/{}/approve", payout_id), json!({}))
            .await;
        self.settle_bare(result, "Payout approved").await
    }

    pub async fn reject_payout(&self, payout_id: &str, reason: Option<&str>) -> ApiResult<()> {
        let path = format!(
            "/payouts/{}/reject?reason={}",
            payout_id,
            urlencoding::encode(reason.unwrap_or_default())
        );
        let result = self
            .console
            .post::<Acknowledgement>(&path, json!({}))
            .await;
        self.settle_bare(result, "Payout rejected").await
    }

    pub async fn suspend_user(&self, user_id: &str, suspend: bool) -> ApiResult<()> {
        let path = format!("/admin/users/{}/suspend?suspend={}", user_id, suspend);
        let result = self
            .console
            .request::<Acknowledgement>(&path, RequestOptions::with_method(Method::PATCH))
            .await;
        let success = if suspend {
            "User suspended"
        } else {
            "User unsuspended"
        };
        self.settle_bare(result, success).await
    }

    pub async fn send_email(&self, subject: &str, body: &str, to_all: bool) -> ApiResult<()> {
        let result = self
            .console
            .post::<Acknowledgement>(
                "/admin/emails/send",
                json!({ "subject": subject, "body": body, "to_all": to_all }),
            )
            .await;
        match result {
            Ok(_) => {
                self.feedback.success("Broadcast queued").await;
                Ok(())
            }
            Err(error) => self.fail("Broadcast", error).await,
        }
    }

    async fn console_data<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Ok(self.console.get::<DataEnvelope<T>>(path).await?.data)
    }

    /// Toasts `success` or "`context`: error" and passes the result through.
    async fn settle<T>(&self, result: ApiResult<T>, success: &str, context: &str) -> ApiResult<T> {
        match result {
            Ok(value) => {
                self.feedback.success(success).await;
                Ok(value)
            }
            Err(error) => self.fail(context, error).await,
        }
    }

    /// Like [`Self::settle`], but failures show only the server's message.
    async fn settle_bare<T>(&self, result: ApiResult<T>, success: &str) -> ApiResult<()> {
        match result {
            Ok(_) => {
                self.feedback.success(success).await;
                Ok(())
            }
            Err(error) => {
                log_at(self.classifier.classify_api_error(&error), &error.to_string());
                self.feedback.error(error.to_string()).await;
                Err(error)
            }
        }
    }

    async fn fail<T>(&self, context: &str, error: ApiError) -> ApiResult<T> {
        log_at(
            self.classifier.classify_api_error(&error),
            &format!("{}: {}", context, error),
        );
        self.feedback.error(format!("{}: {}", context, error)).await;
        Err(error)
    }
}
