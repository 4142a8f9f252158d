//! The four entity lists of the console and their wire formats.

use super::{Filters, Resource};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// Tolerant field decoders; the admin API is loose about numbers and ids.
pub(crate) mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
            Value::String(s) if s.trim().is_empty() => Ok(0.0),
            Value::String(s) => s.trim().parse().map_err(D::Error::custom),
            Value::Null => Ok(0.0),
            other => Err(D::Error::custom(format!("expected a number, got {}", other))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(D::Error::custom(format!("expected a string, got {}", other))),
        }
    }
}

/// Date part of an API timestamp, or the raw text if it is not a timestamp.
pub(crate) fn display_date(timestamp: &Option<String>) -> String {
    let Some(raw) = timestamp.as_deref() else {
        return "-".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn filter<'a>(filters: &'a Filters, name: &str) -> Option<&'a str> {
    filters
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

// =============================================================================
// TASKS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskRequirements {
    pub target_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub task_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(deserialize_with = "lenient::number")]
    pub reward: f64,
    pub is_active: bool,
    pub description: String,
    pub created_at: Option<String>,
    pub requirements: Option<TaskRequirements>,
}

pub struct Tasks;

impl Resource for Tasks {
    type Item = TaskRecord;

    const NAME: &'static str = "tasks";
    const ENDPOINT: &'static str = "/admin/tasks/";
    const ITEMS_KEY: &'static str = "tasks";
    const LOADED_MESSAGE: Option<&'static str> = Some("Tasks loaded successfully");
    const COLUMNS: &'static [&'static str] =
        &["ID", "Title", "Category", "Reward", "Active", "Created"];

    fn matches(item: &TaskRecord, filters: &Filters) -> bool {
        if let Some(category) = filter(filters, "category") {
            if item.category != category {
                return false;
            }
        }
        if let Some(active) = filter(filters, "active") {
            if item.is_active != (active == "true") {
                return false;
            }
        }
        true
    }

    fn row(item: &TaskRecord) -> Vec<String> {
        vec![
            item.task_id.clone(),
            item.title.clone(),
            item.category.clone(),
            money(item.reward),
            if item.is_active { "yes" } else { "no" }.to_string(),
            display_date(&item.created_at),
        ]
    }
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub wallet_balance: f64,
    pub status: String,
    pub created_at: Option<String>,
}

pub struct Users;

impl Resource for Users {
    type Item = UserRecord;

    const NAME: &'static str = "users";
    const ENDPOINT: &'static str = "/admin/users";
    const ITEMS_KEY: &'static str = "users";
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Email", "Phone", "Balance", "Status", "Joined"];

    fn matches(item: &UserRecord, filters: &Filters) -> bool {
        if let Some(search) = filter(filters, "search") {
            let needle = search.to_lowercase();
            if !item.full_name.to_lowercase().contains(&needle)
                && !item.email.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(status) = filter(filters, "status") {
            if item.status != status {
                return false;
            }
        }
        true
    }

    fn row(item: &UserRecord) -> Vec<String> {
        vec![
            item.user_id.clone(),
            item.full_name.clone(),
            item.email.clone(),
            item.phone.clone().unwrap_or_default(),
            money(item.wallet_balance),
            item.status.clone(),
            display_date(&item.created_at),
        ]
    }
}

// =============================================================================
// WITHDRAWALS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WithdrawalRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub transaction_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
    pub method: String,
    pub phone: Option<String>,
    pub recipient_email: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
}

impl WithdrawalRecord {
    /// Where the money goes: phone number, else e-mail.
    pub fn address(&self) -> &str {
        self.phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .or(self.recipient_email.as_deref().filter(|email| !email.is_empty()))
            .unwrap_or("N/A")
    }
}

pub struct Withdrawals;

impl Resource for Withdrawals {
    type Item = WithdrawalRecord;

    const NAME: &'static str = "withdrawals";
    const ENDPOINT: &'static str = "/admin/transactions/withdrawals";
    const ITEMS_KEY: &'static str = "withdrawals";
    const SERVER_FILTERS: &'static [&'static str] = &["status"];
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "User",
        "Amount",
        "Wallet",
        "Address",
        "Status",
        "Requested",
    ];

    fn row(item: &WithdrawalRecord) -> Vec<String> {
        vec![
            item.transaction_id.clone(),
            item.user_id.clone(),
            money(item.amount),
            item.method.clone(),
            item.address().to_string(),
            item.status.clone(),
            display_date(&item.created_at),
        ]
    }
}

// =============================================================================
// BROADCASTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BroadcastRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub notification_id: String,
    pub title: String,
    pub message: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub created_at: Option<String>,
}

impl BroadcastRecord {
    pub fn target(&self) -> &'static str {
        if self.user_id.is_some() { "specific" } else { "all" }
    }
}

pub struct Broadcasts;

impl Resource for Broadcasts {
    type Item = BroadcastRecord;

    const NAME: &'static str = "broadcasts";
    const ENDPOINT: &'static str = "/admin/notifications";
    const ITEMS_KEY: &'static str = "notifications";
    const COLUMNS: &'static [&'static str] =
        &["ID", "Title", "Target", "Type", "Sent by", "Date", "Views"];

    fn matches(item: &BroadcastRecord, filters: &Filters) -> bool {
        filter(filters, "type").is_none_or(|kind| item.kind == kind)
    }

    fn row(item: &BroadcastRecord) -> Vec<String> {
        vec![
            item.notification_id.clone(),
            item.title.clone(),
            item.target().to_string(),
            item.kind.clone(),
            item.user_name.clone().unwrap_or_else(|| "Admin".to_string()),
            display_date(&item.created_at),
            if item.is_read { "Read" } else { "Unread" }.to_string(),
        ]
    }
}
