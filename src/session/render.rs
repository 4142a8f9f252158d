//! Plain-text rendering of lists, toasts and dashboard figures.

use crate::actions::{Analytics, DashboardStats, PayoutRecord};
use crate::events::FeedbackEvent;
use crate::feedback::{Toast, ToastKind};
use crate::lists::{ListState, Resource};

const COLOR_SUCCESS: &str = "\x1b[1;32m";
const COLOR_ERROR: &str = "\x1b[1;31m";
const COLOR_WARNING: &str = "\x1b[1;33m";
const COLOR_INFO: &str = "\x1b[1;36m";
const COLOR_DIM: &str = "\x1b[2m";
const COLOR_RESET: &str = "\x1b[0m";

fn color_of(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => COLOR_SUCCESS,
        ToastKind::Error => COLOR_ERROR,
        ToastKind::Warning => COLOR_WARNING,
        ToastKind::Info => COLOR_INFO,
    }
}

/// Left-aligned columns separated by two spaces.
pub fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = vec![pad_line(columns, &widths)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    if rows.is_empty() {
        out.push("(no items)".to_string());
    }
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(pad_line(&cells, &widths));
    }
    out.join("\n")
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// A list's header (name, page, active filters) followed by its table.
pub fn render_list<R: Resource>(state: &ListState<R::Item>) -> String {
    let mut header = format!("{} (page {})", R::NAME, state.page);
    if !state.filters.is_empty() {
        let filters: Vec<String> = state
            .filters
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        header.push_str(&format!(" [{}]", filters.join(", ")));
    }
    let rows: Vec<Vec<String>> = state.items.iter().map(R::row).collect();
    format!("{}\n{}", header, render_table(R::COLUMNS, &rows))
}

pub fn render_feedback(event: &FeedbackEvent) -> String {
    match event {
        FeedbackEvent::Shown(toast) => {
            format!("{}{}{}", color_of(toast.kind), event, COLOR_RESET)
        }
        FeedbackEvent::Removed { .. } => format!("{}{}{}", COLOR_DIM, event, COLOR_RESET),
    }
}

pub fn render_toasts(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return "No visible notifications".to_string();
    }
    let rows: Vec<Vec<String>> = toasts
        .iter()
        .map(|toast| {
            vec![
                toast.id.short(),
                toast.kind.to_string(),
                toast.title.clone(),
                toast.message.clone(),
            ]
        })
        .collect();
    render_table(&["ID", "Kind", "Title", "Message"], &rows)
}

pub fn render_stats(stats: &DashboardStats) -> String {
    render_table(
        &["Metric", "Value"],
        &[
            vec!["Total users".into(), stats.total_users.to_string()],
            vec!["Activated users".into(), stats.activated_users.to_string()],
            vec!["Total tasks".into(), stats.total_tasks.to_string()],
            vec!["Active tasks".into(), stats.active_tasks.to_string()],
            vec![
                "Total withdrawals".into(),
                format!("${:.2}", stats.total_withdrawals),
            ],
            vec![
                "Pending withdrawals".into(),
                stats.pending_withdrawals.to_string(),
            ],
            vec![
                "Total deposits".into(),
                format!("${:.2}", stats.total_deposits),
            ],
        ],
    )
}

pub fn render_analytics(analytics: &Analytics) -> String {
    render_table(
        &["Metric", "Value"],
        &[
            vec!["Total users".into(), analytics.total_users.to_string()],
            vec!["Active users".into(), analytics.active_users.to_string()],
            vec![
                "Total payouts".into(),
                format!("${:.2}", analytics.total_payouts_usd),
            ],
            vec![
                "Platform profit".into(),
                format!("${:.2}", analytics.profit()),
            ],
        ],
    )
}

pub fn render_payouts(payouts: &[PayoutRecord]) -> String {
    let rows: Vec<Vec<String>> = payouts.iter().map(PayoutRecord::row).collect();
    format!("payouts\n{}", render_table(PayoutRecord::COLUMNS, &rows))
}
