//! Savings goal tracking: contributions, milestones, and projections.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{FinanceError, FinanceResult};
use crate::ledger::goal::{Goal, GoalDraft, GoalStatus, Milestone};
use crate::ledger::Ledger;

/// Stateless goal operations over [`Ledger`] snapshots.
pub struct GoalService;

impl GoalService {
    pub fn create(ledger: &mut Ledger, draft: GoalDraft) -> FinanceResult<Uuid> {
        let goal = Goal::from_draft(draft)?;
        let id = ledger.add_goal(goal)?;
        tracing::info!(%id, "goal created");
        Ok(id)
    }

    /// Records a contribution against the goal. Amounts must be positive.
    pub fn contribute(
        ledger: &mut Ledger,
        id: Uuid,
        amount: Decimal,
        description: Option<String>,
        date: Option<NaiveDate>,
    ) -> FinanceResult<()> {
        let goal = ledger
            .goal_mut(id)
            .ok_or_else(|| FinanceError::NotFound(format!("goal {id}")))?;
        goal.add_contribution(amount, description, date)?;
        if goal.completed_at.is_some() {
            tracing::info!(goal = %goal.name, "goal completed");
        }
        ledger.touch();
        Ok(())
    }

    pub fn progress_percentage(ledger: &Ledger, id: Uuid) -> FinanceResult<f64> {
        ledger
            .goal(id)
            .map(Goal::progress_percentage)
            .ok_or_else(|| FinanceError::NotFound(format!("goal {id}")))
    }

    pub fn is_on_track_on(ledger: &Ledger, id: Uuid, as_of: NaiveDate) -> FinanceResult<bool> {
        ledger
            .goal(id)
            .map(|goal| goal.is_on_track_on(as_of))
            .ok_or_else(|| FinanceError::NotFound(format!("goal {id}")))
    }

    pub fn projected_completion_on(
        ledger: &Ledger,
        id: Uuid,
        as_of: NaiveDate,
    ) -> FinanceResult<Option<NaiveDate>> {
        ledger
            .goal(id)
            .map(|goal| goal.projected_completion_on(as_of))
            .ok_or_else(|| FinanceError::NotFound(format!("goal {id}")))
    }

    pub fn next_milestone(ledger: &Ledger, id: Uuid) -> FinanceResult<Option<&Milestone>> {
        ledger
            .goal(id)
            .map(Goal::next_milestone)
            .ok_or_else(|| FinanceError::NotFound(format!("goal {id}")))
    }

    /// Derived status snapshot for today.
    pub fn status(ledger: &Ledger, id: Uuid) -> FinanceResult<GoalStatus> {
        Self::status_on(ledger, id, Utc::now().date_naive())
    }

    pub fn status_on(ledger: &Ledger, id: Uuid, as_of: NaiveDate) -> FinanceResult<GoalStatus> {
        ledger
            .goal(id)
            .map(|goal| goal.status_on(as_of))
            .ok_or_else(|| FinanceError::NotFound(format!("goal {id}")))
    }

    /// Status snapshots for every active goal.
    pub fn statuses_on(ledger: &Ledger, as_of: NaiveDate) -> Vec<GoalStatus> {
        ledger
            .goals
            .iter()
            .filter(|goal| goal.is_active)
            .map(|goal| goal.status_on(as_of))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn ledger_with_goal(target: Decimal) -> (Ledger, Uuid) {
        let mut ledger = Ledger::new("Goals");
        let target_date = Utc::now().date_naive() + Duration::days(90);
        let id = GoalService::create(
            &mut ledger,
            GoalDraft::new("Emergency Fund", target, target_date),
        )
        .unwrap();
        (ledger, id)
    }

    #[test]
    fn contribute_requires_an_existing_goal() {
        let mut ledger = Ledger::new("Goals");
        let err = GoalService::contribute(&mut ledger, Uuid::new_v4(), dec!(10), None, None)
            .expect_err("missing goal must fail");
        assert!(matches!(err, FinanceError::NotFound(_)));
    }

    #[test]
    fn halfway_contributions_leave_the_75_percent_milestone_next() {
        let (mut ledger, id) = ledger_with_goal(dec!(1000));
        GoalService::contribute(&mut ledger, id, dec!(250), None, None).unwrap();
        GoalService::contribute(&mut ledger, id, dec!(250), None, None).unwrap();

        assert_eq!(GoalService::progress_percentage(&ledger, id).unwrap(), 50.0);
        let next = GoalService::next_milestone(&ledger, id).unwrap().unwrap();
        assert_eq!(next.percentage, 75);
    }

    #[test]
    fn statuses_skip_inactive_goals() {
        let (mut ledger, id) = ledger_with_goal(dec!(1000));
        ledger.goal_mut(id).unwrap().is_active = false;
        assert!(GoalService::statuses_on(&ledger, Utc::now().date_naive()).is_empty());
    }
}
