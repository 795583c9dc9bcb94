use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::BudgetPeriod;
use super::transaction::title_case;
use crate::errors::FinanceError;

pub const DEFAULT_ALERT_THRESHOLD: f64 = 80.0;

/// A spending cap for one category over a recurring period.
///
/// `current_spent` accumulates within the period and is zeroed by
/// [`Budget::reset_on`]; keeping it in sync with the ledger is the caller's
/// job (pull-based, no subscription).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: f64,
    #[serde(default = "default_true")]
    pub alert_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_alert_sent: Option<DateTime<Utc>>,
    pub current_spent: Decimal,
    pub last_reset_date: NaiveDate,
    #[serde(default)]
    pub rollover_unused: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Construction input for [`Budget`]; defaults are applied centrally in
/// [`Budget::from_draft`].
#[derive(Debug, Clone, Default)]
pub struct BudgetDraft {
    pub name: String,
    pub category: String,
    pub amount: Decimal,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub alert_threshold: Option<f64>,
    pub rollover_unused: bool,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl BudgetDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn with_period(mut self, period: BudgetPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = Some(threshold);
        self
    }

    pub fn with_rollover(mut self, rollover: bool) -> Self {
        self.rollover_unused = rollover;
        self
    }
}

impl Budget {
    /// Validates the draft and derives the period end date when absent.
    pub fn from_draft(draft: BudgetDraft) -> Result<Self, FinanceError> {
        if draft.name.trim().is_empty() {
            return Err(FinanceError::Validation("budget name is required".into()));
        }
        if draft.amount <= Decimal::ZERO {
            return Err(FinanceError::Validation(
                "budget amount must be positive".into(),
            ));
        }
        let threshold = draft.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
        if !(0.0..=100.0).contains(&threshold) || threshold == 0.0 {
            return Err(FinanceError::Validation(format!(
                "alert threshold must be within (0, 100], got {threshold}"
            )));
        }
        let now = Utc::now();
        let period = draft.period.unwrap_or_default();
        let start_date = draft.start_date.unwrap_or_else(|| now.date_naive());
        let end_date = draft.end_date.unwrap_or_else(|| period.advance(start_date));
        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name,
            category: title_case(&draft.category),
            amount: draft.amount,
            period,
            start_date,
            end_date,
            alert_threshold: threshold,
            alert_enabled: true,
            last_alert_sent: None,
            current_spent: Decimal::ZERO,
            last_reset_date: start_date,
            rollover_unused: draft.rollover_unused,
            is_active: true,
            tags: draft.tags,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.amount - self.current_spent
    }

    /// Share of the cap consumed, as a percentage. Zero caps yield 0.
    pub fn spent_percentage(&self) -> f64 {
        if self.amount == Decimal::ZERO {
            return 0.0;
        }
        (self.current_spent / self.amount * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    }

    pub fn is_over_budget(&self) -> bool {
        self.current_spent > self.amount
    }

    pub fn alert_threshold_reached(&self) -> bool {
        self.spent_percentage() >= self.alert_threshold
    }

    /// Calendar days left in the period as of the given date, clamped to 0.
    pub fn days_remaining_on(&self, as_of: NaiveDate) -> i64 {
        (self.end_date - as_of).num_days().max(0)
    }

    /// Remaining cap spread over the remaining days; zero once the period
    /// has no days left.
    pub fn daily_budget_remaining_on(&self, as_of: NaiveDate) -> Decimal {
        let days_left = self.days_remaining_on(as_of);
        if days_left == 0 {
            return Decimal::ZERO;
        }
        self.remaining_amount() / Decimal::from(days_left)
    }

    /// Accrues spending against the cap. The amount must be positive.
    pub fn add_expense(&mut self, amount: Decimal) -> Result<(), FinanceError> {
        if amount <= Decimal::ZERO {
            return Err(FinanceError::Validation(
                "expense amount must be positive".into(),
            ));
        }
        self.current_spent += amount;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// True when `as_of` is strictly past the period end.
    pub fn should_reset_on(&self, as_of: NaiveDate) -> bool {
        as_of > self.end_date
    }

    /// Rolls the budget into a new period anchored at `as_of`.
    ///
    /// Unused remainder is carried into the cap when `rollover_unused` is
    /// set. Not idempotent within a period: callers gate on
    /// [`Budget::should_reset_on`] so rollover is applied once per elapsed
    /// period.
    pub fn reset_on(&mut self, as_of: NaiveDate) {
        if self.rollover_unused && self.remaining_amount() > Decimal::ZERO {
            self.amount += self.remaining_amount();
        }
        self.current_spent = Decimal::ZERO;
        self.last_reset_date = as_of;
        self.start_date = as_of;
        self.end_date = self.period.advance(as_of);
        self.last_alert_sent = None;
        self.updated_at = Utc::now();
    }

    /// Full derived snapshot for the given date; a pure read of the
    /// persisted fields.
    pub fn status_on(&self, as_of: NaiveDate) -> BudgetStatus {
        BudgetStatus {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            amount: self.amount,
            spent: self.current_spent,
            remaining: self.remaining_amount(),
            percentage_spent: self.spent_percentage(),
            is_over_budget: self.is_over_budget(),
            days_remaining: self.days_remaining_on(as_of),
            daily_budget_remaining: self.daily_budget_remaining_on(as_of),
            alert_threshold_reached: self.alert_threshold_reached(),
            health: self.health(),
        }
    }

    fn health(&self) -> BudgetHealth {
        if self.is_over_budget() {
            BudgetHealth::OverBudget
        } else if self.alert_threshold_reached() {
            BudgetHealth::Warning
        } else if self.spent_percentage() > 50.0 {
            BudgetHealth::OnTrack
        } else {
            BudgetHealth::Good
        }
    }
}

/// Point-in-time view of a budget's derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_spent: f64,
    pub is_over_budget: bool,
    pub days_remaining: i64,
    pub daily_budget_remaining: Decimal,
    pub alert_threshold_reached: bool,
    pub health: BudgetHealth,
}

/// Health ladder, highest severity first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetHealth {
    OverBudget,
    Warning,
    OnTrack,
    Good,
}

impl fmt::Display for BudgetHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetHealth::OverBudget => write!(f, "OVER BUDGET"),
            BudgetHealth::Warning => write!(f, "WARNING"),
            BudgetHealth::OnTrack => write!(f, "ON TRACK"),
            BudgetHealth::Good => write!(f, "GOOD"),
        }
    }
}
