use chrono::NaiveDate;
use finance_core::core::services::{AnalyticsService, TransactionService};
use finance_core::ledger::{Ledger, TransactionDraft, TransactionKind};
use finance_core::report::{self, RenderPayload};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn january_ledger() -> Ledger {
    let mut ledger = Ledger::new("Analytics");
    let drafts = vec![
        TransactionDraft::new(dec!(1000), "salary", "Salary", TransactionKind::Income)
            .on(date(2024, 1, 5)),
        TransactionDraft::new(dec!(300), "food", "Food", TransactionKind::Expense)
            .on(date(2024, 1, 10)),
        TransactionDraft::new(dec!(200), "rent", "Rent", TransactionKind::Expense)
            .on(date(2024, 1, 15)),
    ];
    for draft in drafts {
        TransactionService::add(&mut ledger, draft).unwrap();
    }
    ledger
}

#[test]
fn month_window_aggregate_totals_income_and_expenses() {
    let ledger = january_ledger();
    let stats = AnalyticsService::aggregate(
        &ledger,
        Some(date(2024, 1, 1)),
        Some(date(2024, 1, 31)),
        None,
    );
    assert_eq!(stats.total_income, dec!(1000));
    assert_eq!(stats.total_expenses, dec!(500));
    assert_eq!(stats.net_balance, dec!(500));
    assert_eq!(stats.savings_rate, 50.0);
    assert_eq!(stats.income_count, 1);
    assert_eq!(stats.expense_count, 2);
}

#[test]
fn aggregate_with_no_income_has_zero_savings_rate() {
    let mut ledger = Ledger::new("Analytics");
    TransactionService::add(
        &mut ledger,
        TransactionDraft::new(dec!(120), "food", "groceries", TransactionKind::Expense)
            .on(date(2024, 1, 3)),
    )
    .unwrap();
    let stats = AnalyticsService::aggregate(&ledger, None, None, None);
    assert_eq!(stats.savings_rate, 0.0);
}

#[test]
fn aggregate_can_scope_to_an_account() {
    let mut ledger = january_ledger();
    TransactionService::add(
        &mut ledger,
        TransactionDraft::new(dec!(50), "food", "cash snack", TransactionKind::Expense)
            .on(date(2024, 1, 20))
            .in_account("cash"),
    )
    .unwrap();
    let stats = AnalyticsService::aggregate(&ledger, None, None, Some("cash"));
    assert_eq!(stats.total_expenses, dec!(50));
    assert_eq!(stats.total_count, 1);
}

#[test]
fn category_breakdown_is_sorted_descending() {
    let ledger = january_ledger();
    let breakdown = AnalyticsService::category_breakdown(
        &ledger,
        Some(TransactionKind::Expense),
        Some(date(2024, 1, 1)),
        Some(date(2024, 1, 31)),
    );
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].category, "Food");
    assert_eq!(breakdown[0].total, dec!(300));
    assert_eq!(breakdown[1].category, "Rent");
}

#[test]
fn monthly_trend_is_most_recent_first_and_skips_empty_months() {
    let mut ledger = january_ledger();
    TransactionService::add(
        &mut ledger,
        TransactionDraft::new(dec!(800), "salary", "pay", TransactionKind::Income)
            .on(date(2024, 3, 5)),
    )
    .unwrap();

    let trends = AnalyticsService::monthly_trend(&ledger, 6, date(2024, 3, 20));
    let months: Vec<&str> = trends.iter().map(|t| t.month.as_str()).collect();
    // February had no activity and therefore no row.
    assert_eq!(months, vec!["2024-03", "2024-01"]);
    assert_eq!(trends[1].net_balance, dec!(500));
}

#[test]
fn report_builders_wrap_results_with_format_intent() {
    let ledger = january_ledger();
    let stats = AnalyticsService::aggregate(&ledger, None, None, None);
    match report::summary_table(&stats) {
        RenderPayload::Table(table) => {
            assert_eq!(table.headers.len(), 2);
            assert!(table.rows.iter().any(|row| row[0] == "Net Balance"));
        }
        other => panic!("expected a table payload, got {other:?}"),
    }

    let breakdown = AnalyticsService::category_breakdown(&ledger, None, None, None);
    match report::breakdown_chart("Spending", &breakdown) {
        RenderPayload::Chart(chart) => {
            assert_eq!(chart.title, "Spending");
            assert!(!chart.entries.is_empty());
        }
        other => panic!("expected a chart payload, got {other:?}"),
    }

    let trends = AnalyticsService::monthly_trend(&ledger, 3, date(2024, 1, 31));
    match report::trend_table(&trends) {
        RenderPayload::Table(table) => assert_eq!(table.rows.len(), 1),
        other => panic!("expected a table payload, got {other:?}"),
    }

    let listing = TransactionService::query(&ledger, &Default::default());
    match report::transactions_table(&listing) {
        RenderPayload::Table(table) => {
            assert_eq!(table.rows.len(), 3);
            // Ids are shown truncated to eight characters.
            assert_eq!(table.rows[0][0].len(), 8);
        }
        other => panic!("expected a table payload, got {other:?}"),
    }
}
