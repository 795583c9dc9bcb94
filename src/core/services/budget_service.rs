//! Budget tracking over ledger data: spend accrual, alerting thresholds, and
//! period rollover.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{FinanceError, FinanceResult};
use crate::ledger::budget::{Budget, BudgetDraft, BudgetStatus};
use crate::ledger::transaction::TransactionKind;
use crate::ledger::{Ledger, TransactionFilter};

/// Stateless budgeting operations over [`Ledger`] snapshots.
pub struct BudgetService;

impl BudgetService {
    pub fn create(ledger: &mut Ledger, draft: BudgetDraft) -> FinanceResult<Uuid> {
        let budget = Budget::from_draft(draft)?;
        let id = ledger.add_budget(budget)?;
        tracing::info!(%id, "budget created");
        Ok(id)
    }

    /// Accrues an expense against the budget's current period.
    pub fn record_expense(ledger: &mut Ledger, id: Uuid, amount: Decimal) -> FinanceResult<()> {
        let budget = ledger
            .budget_mut(id)
            .ok_or_else(|| FinanceError::NotFound(format!("budget {id}")))?;
        budget.add_expense(amount)?;
        if budget.alert_enabled && budget.alert_threshold_reached() && budget.last_alert_sent.is_none()
        {
            budget.last_alert_sent = Some(Utc::now());
            tracing::warn!(
                budget = %budget.name,
                spent = %budget.current_spent,
                "budget alert threshold reached"
            );
        }
        ledger.touch();
        Ok(())
    }

    /// Derived status snapshot for today.
    pub fn status(ledger: &Ledger, id: Uuid) -> FinanceResult<BudgetStatus> {
        Self::status_on(ledger, id, Utc::now().date_naive())
    }

    pub fn status_on(ledger: &Ledger, id: Uuid, as_of: NaiveDate) -> FinanceResult<BudgetStatus> {
        ledger
            .budget(id)
            .map(|budget| budget.status_on(as_of))
            .ok_or_else(|| FinanceError::NotFound(format!("budget {id}")))
    }

    /// Status snapshots for every active budget.
    pub fn statuses_on(ledger: &Ledger, as_of: NaiveDate) -> Vec<BudgetStatus> {
        ledger
            .budgets
            .iter()
            .filter(|budget| budget.is_active)
            .map(|budget| budget.status_on(as_of))
            .collect()
    }

    pub fn should_reset_on(ledger: &Ledger, id: Uuid, as_of: NaiveDate) -> FinanceResult<bool> {
        ledger
            .budget(id)
            .map(|budget| budget.should_reset_on(as_of))
            .ok_or_else(|| FinanceError::NotFound(format!("budget {id}")))
    }

    /// Rolls one budget into a new period. Callers gate on
    /// [`BudgetService::should_reset_on`]; resetting twice within a period
    /// double-applies rollover.
    pub fn reset_on(ledger: &mut Ledger, id: Uuid, as_of: NaiveDate) -> FinanceResult<()> {
        let budget = ledger
            .budget_mut(id)
            .ok_or_else(|| FinanceError::NotFound(format!("budget {id}")))?;
        budget.reset_on(as_of);
        tracing::info!(budget = %budget.name, "budget period reset");
        ledger.touch();
        Ok(())
    }

    /// Resets every active budget whose period has elapsed, returning the
    /// ids that rolled over.
    pub fn reset_due_budgets(ledger: &mut Ledger, as_of: NaiveDate) -> Vec<Uuid> {
        let due: Vec<Uuid> = ledger
            .budgets
            .iter()
            .filter(|budget| budget.is_active && budget.should_reset_on(as_of))
            .map(|budget| budget.id)
            .collect();
        for id in &due {
            if let Some(budget) = ledger.budget_mut(*id) {
                budget.reset_on(as_of);
            }
        }
        if !due.is_empty() {
            ledger.touch();
        }
        due
    }

    /// Pull-based re-aggregation: recomputes `current_spent` from the
    /// ledger's expense transactions in the budget's category and period
    /// window, bounded by `as_of`. Returns the recomputed figure.
    pub fn sync_spent_from_ledger(
        ledger: &mut Ledger,
        id: Uuid,
        as_of: NaiveDate,
    ) -> FinanceResult<Decimal> {
        let (category, start, end) = {
            let budget = ledger
                .budget(id)
                .ok_or_else(|| FinanceError::NotFound(format!("budget {id}")))?;
            (
                budget.category.clone(),
                budget.start_date,
                budget.end_date.min(as_of),
            )
        };
        let filter = TransactionFilter::default()
            .with_kind(TransactionKind::Expense)
            .in_category(category)
            .between(start, end);
        let spent: Decimal = ledger
            .query(&filter)
            .iter()
            .map(|txn| txn.amount)
            .sum();
        let budget = ledger
            .budget_mut(id)
            .ok_or_else(|| FinanceError::NotFound(format!("budget {id}")))?;
        budget.current_spent = spent;
        budget.updated_at = Utc::now();
        ledger.touch();
        Ok(spent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::period::BudgetPeriod;
    use crate::ledger::transaction::{Transaction, TransactionDraft};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn record_expense_requires_an_existing_budget() {
        let mut ledger = Ledger::new("Budgets");
        let err = BudgetService::record_expense(&mut ledger, Uuid::new_v4(), dec!(10))
            .expect_err("missing budget must fail");
        assert!(matches!(err, FinanceError::NotFound(_)));
    }

    #[test]
    fn sync_spent_totals_category_expenses_in_window() {
        let mut ledger = Ledger::new("Budgets");
        let id = BudgetService::create(
            &mut ledger,
            BudgetDraft::new("Food", "food", dec!(500))
                .with_period(BudgetPeriod::Monthly)
                .starting(date(2024, 1, 1)),
        )
        .unwrap();

        for (amount, day) in [(dec!(120), 5), (dec!(80), 20)] {
            let txn = Transaction::from_draft(
                TransactionDraft::new(amount, "food", "groceries", TransactionKind::Expense)
                    .on(date(2024, 1, day)),
            )
            .unwrap();
            ledger.add_transaction(txn).unwrap();
        }
        // Different category and out-of-window spend stay out of the total.
        let other_category = Transaction::from_draft(
            TransactionDraft::new(dec!(999), "rent", "rent", TransactionKind::Expense)
                .on(date(2024, 1, 10)),
        )
        .unwrap();
        ledger.add_transaction(other_category).unwrap();
        let next_period = Transaction::from_draft(
            TransactionDraft::new(dec!(50), "food", "late", TransactionKind::Expense)
                .on(date(2024, 2, 10)),
        )
        .unwrap();
        ledger.add_transaction(next_period).unwrap();

        let spent =
            BudgetService::sync_spent_from_ledger(&mut ledger, id, date(2024, 1, 31)).unwrap();
        assert_eq!(spent, dec!(200));
        assert_eq!(ledger.budget(id).unwrap().current_spent, dec!(200));
    }

    #[test]
    fn reset_due_budgets_skips_current_periods() {
        let mut ledger = Ledger::new("Budgets");
        let due = BudgetService::create(
            &mut ledger,
            BudgetDraft::new("Food", "food", dec!(500))
                .with_period(BudgetPeriod::Monthly)
                .starting(date(2024, 1, 1)),
        )
        .unwrap();
        let current = BudgetService::create(
            &mut ledger,
            BudgetDraft::new("Rent", "rent", dec!(1500))
                .with_period(BudgetPeriod::Monthly)
                .starting(date(2024, 2, 1)),
        )
        .unwrap();

        let rolled = BudgetService::reset_due_budgets(&mut ledger, date(2024, 2, 15));
        assert_eq!(rolled, vec![due]);
        assert_eq!(ledger.budget(due).unwrap().start_date, date(2024, 2, 15));
        assert_eq!(ledger.budget(current).unwrap().start_date, date(2024, 2, 1));
    }
}
