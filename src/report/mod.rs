//! Structured result payloads handed to presentation layers.
//!
//! The core never renders terminal output; it returns data with an explicit
//! format intent and lets the consumer decide how to draw it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::services::{CategoryTotal, MonthlyTrend, SummaryStats};
use crate::ledger::budget::BudgetStatus;
use crate::ledger::goal::GoalStatus;
use crate::ledger::transaction::Transaction;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-facing outcome message; the degraded form of every failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEntry {
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub entries: Vec<ChartEntry>,
}

/// Format intent attached to a computed result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderPayload {
    Table(TableData),
    Chart(ChartData),
    Text(String),
    Message(StatusMessage),
}

/// Tabulates transactions in listing order.
pub fn transactions_table(transactions: &[&Transaction]) -> RenderPayload {
    let rows = transactions
        .iter()
        .map(|txn| {
            vec![
                short_id(&txn.id.to_string()),
                txn.date.to_string(),
                txn.kind.to_string(),
                txn.amount.to_string(),
                txn.category.clone(),
                txn.description.clone(),
            ]
        })
        .collect();
    RenderPayload::Table(TableData {
        title: None,
        headers: ["ID", "Date", "Type", "Amount", "Category", "Description"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows,
    })
}

pub fn summary_table(stats: &SummaryStats) -> RenderPayload {
    let rows = vec![
        vec!["Total Income".into(), stats.total_income.to_string()],
        vec!["Total Expenses".into(), stats.total_expenses.to_string()],
        vec!["Net Balance".into(), stats.net_balance.to_string()],
        vec!["Savings Rate".into(), format!("{:.1}%", stats.savings_rate)],
        vec!["Transactions".into(), stats.total_count.to_string()],
    ];
    RenderPayload::Table(TableData {
        title: Some("Summary".into()),
        headers: vec!["Metric".into(), "Value".into()],
        rows,
    })
}

/// Category breakdown as a chart mapping, largest first.
pub fn breakdown_chart(title: impl Into<String>, totals: &[CategoryTotal]) -> RenderPayload {
    RenderPayload::Chart(ChartData {
        title: title.into(),
        entries: totals
            .iter()
            .map(|entry| ChartEntry {
                label: entry.category.clone(),
                value: entry.total,
            })
            .collect(),
    })
}

pub fn trend_table(trends: &[MonthlyTrend]) -> RenderPayload {
    let rows = trends
        .iter()
        .map(|trend| {
            vec![
                trend.month.clone(),
                trend.income.to_string(),
                trend.expenses.to_string(),
                trend.net_balance.to_string(),
            ]
        })
        .collect();
    RenderPayload::Table(TableData {
        title: Some("Monthly Trends".into()),
        headers: vec![
            "Month".into(),
            "Income".into(),
            "Expenses".into(),
            "Net".into(),
        ],
        rows,
    })
}

pub fn budget_status_table(statuses: &[BudgetStatus]) -> RenderPayload {
    let rows = statuses
        .iter()
        .map(|status| {
            vec![
                status.name.clone(),
                status.category.clone(),
                status.spent.to_string(),
                status.amount.to_string(),
                format!("{:.1}%", status.percentage_spent),
                status.health.to_string(),
            ]
        })
        .collect();
    RenderPayload::Table(TableData {
        title: Some("Budgets".into()),
        headers: vec![
            "Name".into(),
            "Category".into(),
            "Spent".into(),
            "Cap".into(),
            "Used".into(),
            "Status".into(),
        ],
        rows,
    })
}

pub fn goal_status_table(statuses: &[GoalStatus]) -> RenderPayload {
    let rows = statuses
        .iter()
        .map(|status| {
            vec![
                status.name.clone(),
                status.current_amount.to_string(),
                status.target_amount.to_string(),
                format!("{:.1}%", status.progress_percentage),
                status.status_text.clone(),
            ]
        })
        .collect();
    RenderPayload::Table(TableData {
        title: Some("Goals".into()),
        headers: vec![
            "Name".into(),
            "Saved".into(),
            "Target".into(),
            "Progress".into(),
            "Status".into(),
        ],
        rows,
    })
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_to_eight_chars() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
