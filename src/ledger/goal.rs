use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FinanceError;

const MILESTONE_PERCENTAGES: [u32; 4] = [25, 50, 75, 100];
const PROJECTION_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Savings,
    DebtPayoff,
    Investment,
    Purchase,
}

impl Default for GoalType {
    fn default() -> Self {
        GoalType::Savings
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for GoalPriority {
    fn default() -> Self {
        GoalPriority::Medium
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    Weekly,
    Monthly,
    Quarterly,
}

/// Automatic contribution plan attached to a goal. The schedule itself is
/// driven by an external layer; the core only stores the settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoContribute {
    pub amount: Decimal,
    pub frequency: ContributionFrequency,
}

/// A fixed percentage checkpoint of the target amount.
///
/// `achieved` transitions false to true exactly once and never reverts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub percentage: u32,
    pub achieved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_date: Option<NaiveDate>,
    pub description: String,
}

/// One entry of the append-only contribution log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

/// A savings target tracked by explicit contributions, independent of the
/// transaction ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub goal_type: GoalType,
    pub priority: GoalPriority,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_contribute: Option<AutoContribute>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Construction input for [`Goal`].
#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub name: String,
    pub description: String,
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub goal_type: Option<GoalType>,
    pub priority: Option<GoalPriority>,
    /// Explicit milestones; when empty, the 25/50/75/100% set is generated.
    pub milestones: Vec<Milestone>,
    pub auto_contribute: Option<AutoContribute>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, target_amount: Decimal, target_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            target_amount,
            target_date: Some(target_date),
            ..Self::default()
        }
    }

    pub fn describing(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn of_type(mut self, goal_type: GoalType) -> Self {
        self.goal_type = Some(goal_type);
        self
    }

    pub fn with_priority(mut self, priority: GoalPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl Goal {
    pub fn from_draft(draft: GoalDraft) -> Result<Self, FinanceError> {
        if draft.name.trim().is_empty() {
            return Err(FinanceError::Validation("goal name is required".into()));
        }
        if draft.target_amount <= Decimal::ZERO {
            return Err(FinanceError::Validation(
                "goal target amount must be positive".into(),
            ));
        }
        let target_date = draft
            .target_date
            .ok_or_else(|| FinanceError::Validation("goal target date is required".into()))?;
        let now = Utc::now();
        let milestones = if draft.milestones.is_empty() {
            default_milestones(draft.target_amount)
        } else {
            draft.milestones
        };
        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            target_amount: draft.target_amount,
            current_amount: Decimal::ZERO,
            target_date,
            category: draft.category,
            goal_type: draft.goal_type.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            milestones,
            contributions: Vec::new(),
            auto_contribute: draft.auto_contribute,
            created_at: now,
            updated_at: now,
            completed_at: None,
            is_active: true,
            tags: draft.tags,
            notes: draft.notes,
        })
    }

    pub fn remaining_amount(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    /// Progress toward the target, clamped to `[0, 100]`.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount == Decimal::ZERO {
            return 0.0;
        }
        let pct = (self.current_amount / self.target_amount * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0);
        pct.min(100.0)
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn days_remaining_on(&self, as_of: NaiveDate) -> i64 {
        (self.target_date - as_of).num_days().max(0)
    }

    pub fn daily_savings_needed_on(&self, as_of: NaiveDate) -> Decimal {
        let days_left = self.days_remaining_on(as_of);
        if days_left == 0 {
            return Decimal::ZERO;
        }
        self.remaining_amount() / Decimal::from(days_left)
    }

    /// Compares actual progress against linear expected progress between
    /// creation and the target date, with a 10% tolerance band. Degenerate
    /// spans are always on track.
    pub fn is_on_track_on(&self, as_of: NaiveDate) -> bool {
        let start = self.created_at.date_naive();
        let total_days = (self.target_date - start).num_days();
        if total_days <= 0 {
            return true;
        }
        let elapsed_days = (as_of - start).num_days();
        let expected = elapsed_days as f64 / total_days as f64 * 100.0;
        self.progress_percentage() >= expected * 0.9
    }

    /// Records a contribution and refreshes milestones and completion.
    ///
    /// Amounts must be positive: `current_amount` only ever increases, which
    /// keeps milestone achievement trivially monotonic. Corrections are a
    /// presentation-layer concern.
    pub fn add_contribution(
        &mut self,
        amount: Decimal,
        description: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<(), FinanceError> {
        if amount <= Decimal::ZERO {
            return Err(FinanceError::Validation(
                "contribution amount must be positive".into(),
            ));
        }
        let now = Utc::now();
        let today = now.date_naive();
        self.contributions.push(Contribution {
            id: Uuid::new_v4(),
            amount,
            description: description.unwrap_or_else(|| format!("Contribution of ${amount}")),
            date: date.unwrap_or(today),
            timestamp: now,
        });
        self.current_amount += amount;
        self.updated_at = now;
        self.check_milestones(today);
        if self.is_completed() && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Marks newly crossed milestones, in ascending percentage order.
    fn check_milestones(&mut self, today: NaiveDate) {
        self.milestones.sort_by_key(|m| m.percentage);
        for milestone in &mut self.milestones {
            if !milestone.achieved && self.current_amount >= milestone.amount {
                milestone.achieved = true;
                milestone.achieved_date = Some(today);
            }
        }
    }

    /// Lowest-percentage milestone not yet achieved.
    pub fn next_milestone(&self) -> Option<&Milestone> {
        self.milestones
            .iter()
            .filter(|m| !m.achieved)
            .min_by_key(|m| m.percentage)
    }

    pub fn achieved_milestones(&self) -> Vec<&Milestone> {
        self.milestones.iter().filter(|m| m.achieved).collect()
    }

    /// Extrapolates a completion date from the recent contribution rate.
    ///
    /// Requires at least two contributions; uses up to the last ten. The
    /// daily rate divides their sum by the day span between the earliest and
    /// latest timestamps in that window (minimum one day). Fractional days
    /// round up.
    pub fn projected_completion_on(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        if self.contributions.len() < 2 {
            return None;
        }
        let window_start = self.contributions.len().saturating_sub(PROJECTION_WINDOW);
        let recent = &self.contributions[window_start..];
        let total: Decimal = recent.iter().map(|c| c.amount).sum();
        let earliest = recent.iter().map(|c| c.timestamp).min()?;
        let latest = recent.iter().map(|c| c.timestamp).max()?;
        let span_days = (latest - earliest).num_days().max(1);
        let daily_rate = total / Decimal::from(span_days);
        if daily_rate <= Decimal::ZERO {
            return None;
        }
        let days_needed = (self.remaining_amount() / daily_rate)
            .to_f64()
            .unwrap_or(0.0)
            .ceil() as i64;
        as_of.checked_add_signed(chrono::Duration::days(days_needed))
    }

    /// Full derived snapshot for the given date.
    pub fn status_on(&self, as_of: NaiveDate) -> GoalStatus {
        let is_on_track = self.is_on_track_on(as_of);
        GoalStatus {
            id: self.id,
            name: self.name.clone(),
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            remaining_amount: self.remaining_amount(),
            progress_percentage: self.progress_percentage(),
            is_completed: self.is_completed(),
            is_on_track,
            days_remaining: self.days_remaining_on(as_of),
            daily_savings_needed: self.daily_savings_needed_on(as_of),
            next_milestone: self.next_milestone().cloned(),
            achieved_milestones: self.achieved_milestones().len(),
            total_milestones: self.milestones.len(),
            projected_completion: self.projected_completion_on(as_of),
            status_text: self.status_text(is_on_track).to_string(),
        }
    }

    fn status_text(&self, is_on_track: bool) -> &'static str {
        let progress = self.progress_percentage();
        if self.is_completed() {
            "COMPLETED"
        } else if !is_on_track {
            "BEHIND SCHEDULE"
        } else if progress > 75.0 {
            "ALMOST THERE"
        } else if progress > 50.0 {
            "GOOD PROGRESS"
        } else if progress > 25.0 {
            "GETTING STARTED"
        } else {
            "JUST STARTED"
        }
    }
}

/// Point-in-time view of a goal's derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalStatus {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub remaining_amount: Decimal,
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub is_on_track: bool,
    pub days_remaining: i64,
    pub daily_savings_needed: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_milestone: Option<Milestone>,
    pub achieved_milestones: usize,
    pub total_milestones: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_completion: Option<NaiveDate>,
    pub status_text: String,
}

fn default_milestones(target_amount: Decimal) -> Vec<Milestone> {
    MILESTONE_PERCENTAGES
        .iter()
        .map(|&pct| {
            let amount = target_amount * Decimal::from(pct) / Decimal::ONE_HUNDRED;
            Milestone {
                id: Uuid::new_v4(),
                name: format!("{pct}% Complete"),
                amount,
                percentage: pct,
                achieved: false,
                achieved_date: None,
                description: format!("Reach {pct}% of your goal (${amount})"),
            }
        })
        .collect()
}
