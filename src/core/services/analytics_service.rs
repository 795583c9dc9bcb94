//! Read-only aggregation over the transaction ledger: totals, category
//! breakdowns, and monthly trends.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::transaction::{Transaction, TransactionKind};
use crate::ledger::Ledger;

/// Aggregate statistics over a transaction slice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    pub average_income: Decimal,
    pub average_expense: Decimal,
    pub min_income: Decimal,
    pub max_income: Decimal,
    pub min_expense: Decimal,
    pub max_expense: Decimal,
    pub net_balance: Decimal,
    /// Net balance over income as a percentage; 0 when there is no income.
    pub savings_rate: f64,
    pub total_count: usize,
}

/// One category's summed amount within a breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// One calendar month of a trend report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyTrend {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    pub net_balance: Decimal,
}

/// Aggregates ledger data for summaries and reports.
pub struct AnalyticsService;

impl AnalyticsService {
    /// Summary statistics over the optional date range and account.
    ///
    /// Empty denominators are designed zero results: no income means a
    /// savings rate of 0, not an error.
    pub fn aggregate(
        ledger: &Ledger,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        account: Option<&str>,
    ) -> SummaryStats {
        let mut income = Accumulator::default();
        let mut expense = Accumulator::default();

        for txn in ledger.transactions.iter().filter(|txn| {
            in_range(txn, start_date, end_date)
                && account.map_or(true, |account| txn.account == account)
        }) {
            match txn.kind {
                TransactionKind::Income => income.add(txn.amount),
                TransactionKind::Expense => expense.add(txn.amount),
            }
        }

        let net_balance = income.total - expense.total;
        let savings_rate = if income.total > Decimal::ZERO {
            (net_balance / income.total * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };

        SummaryStats {
            total_income: income.total,
            total_expenses: expense.total,
            income_count: income.count,
            expense_count: expense.count,
            average_income: income.average(),
            average_expense: expense.average(),
            min_income: income.min.unwrap_or(Decimal::ZERO),
            max_income: income.max.unwrap_or(Decimal::ZERO),
            min_expense: expense.min.unwrap_or(Decimal::ZERO),
            max_expense: expense.max.unwrap_or(Decimal::ZERO),
            net_balance,
            savings_rate,
            total_count: income.count + expense.count,
        }
    }

    /// Per-category sums, largest first. Both kinds are included unless one
    /// is requested.
    pub fn category_breakdown(
        ledger: &Ledger,
        kind: Option<TransactionKind>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<CategoryTotal> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for txn in ledger.transactions.iter().filter(|txn| {
            in_range(txn, start_date, end_date) && kind.map_or(true, |kind| txn.kind == kind)
        }) {
            *totals.entry(txn.category.clone()).or_insert(Decimal::ZERO) += txn.amount;
        }
        let mut breakdown: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect();
        breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
        breakdown
    }

    /// Per-month income/expense totals over the trailing `months` window,
    /// most recent month first. Months without transactions do not appear.
    pub fn monthly_trend(ledger: &Ledger, months: u32, as_of: NaiveDate) -> Vec<MonthlyTrend> {
        let window_start = as_of - Duration::days(i64::from(months) * 30);
        let mut by_month: HashMap<String, MonthlyTrend> = HashMap::new();

        for txn in ledger
            .transactions
            .iter()
            .filter(|txn| txn.date >= window_start)
        {
            let key = txn.date.format("%Y-%m").to_string();
            let entry = by_month.entry(key.clone()).or_insert_with(|| MonthlyTrend {
                month: key,
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
                income_count: 0,
                expense_count: 0,
                net_balance: Decimal::ZERO,
            });
            match txn.kind {
                TransactionKind::Income => {
                    entry.income += txn.amount;
                    entry.income_count += 1;
                }
                TransactionKind::Expense => {
                    entry.expenses += txn.amount;
                    entry.expense_count += 1;
                }
            }
        }

        let mut trends: Vec<MonthlyTrend> = by_month
            .into_values()
            .map(|mut trend| {
                trend.net_balance = trend.income - trend.expenses;
                trend
            })
            .collect();
        trends.sort_by(|a, b| b.month.cmp(&a.month));
        trends
    }
}

fn in_range(txn: &Transaction, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.map_or(true, |start| txn.date >= start) && end.map_or(true, |end| txn.date <= end)
}

#[derive(Default)]
struct Accumulator {
    total: Decimal,
    count: usize,
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl Accumulator {
    fn add(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
        self.min = Some(self.min.map_or(amount, |min| min.min(amount)));
        self.max = Some(self.max.map_or(amount, |max| max.max(amount)));
    }

    fn average(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        self.total / Decimal::from(self.count as u64)
    }
}
