use chrono::NaiveDate;
use finance_core::core::services::TransactionService;
use finance_core::errors::FinanceError;
use finance_core::ledger::{
    Ledger, SortField, SortOrder, TransactionDraft, TransactionFilter, TransactionKind,
    TransactionPatch,
};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_ledger() -> Ledger {
    let mut ledger = Ledger::new("Queries");
    let drafts = vec![
        TransactionDraft::new(dec!(1000), "salary", "monthly pay", TransactionKind::Income)
            .on(date(2024, 1, 5))
            .in_account("checking"),
        TransactionDraft::new(dec!(300), "food", "groceries", TransactionKind::Expense)
            .on(date(2024, 1, 10))
            .tagged(["weekly".to_string()])
            .with_merchant("GreenMart"),
        TransactionDraft::new(dec!(200), "rent", "january rent", TransactionKind::Expense)
            .on(date(2024, 1, 15))
            .essential(true),
        TransactionDraft::new(dec!(45), "food", "dinner out", TransactionKind::Expense)
            .on(date(2024, 2, 2))
            .tagged(["restaurant".to_string(), "weekend".to_string()])
            .essential(false),
    ];
    for draft in drafts {
        TransactionService::add(&mut ledger, draft).unwrap();
    }
    ledger
}

#[test]
fn filters_are_a_conjunction() {
    let ledger = seeded_ledger();
    let filter = TransactionFilter {
        kind: Some(TransactionKind::Expense),
        category: Some("food".into()),
        start_date: Some(date(2024, 1, 1)),
        end_date: Some(date(2024, 1, 31)),
        ..TransactionFilter::default()
    };
    let results = TransactionService::query(&ledger, &filter);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].description, "groceries");
}

#[test]
fn tag_filter_matches_any_requested_tag() {
    let ledger = seeded_ledger();
    let filter = TransactionFilter {
        tags: vec!["restaurant".into(), "unused".into()],
        ..TransactionFilter::default()
    };
    let results = TransactionService::query(&ledger, &filter);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].description, "dinner out");
}

#[test]
fn amount_range_and_essential_flags_combine() {
    let ledger = seeded_ledger();
    let filter = TransactionFilter {
        min_amount: Some(dec!(40)),
        max_amount: Some(dec!(400)),
        is_essential: Some(false),
        ..TransactionFilter::default()
    };
    let results = TransactionService::query(&ledger, &filter);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].amount, dec!(45));
}

#[test]
fn default_sort_is_date_descending() {
    let ledger = seeded_ledger();
    let results = TransactionService::query(&ledger, &TransactionFilter::default());
    let dates: Vec<NaiveDate> = results.iter().map(|txn| txn.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 2, 2),
            date(2024, 1, 15),
            date(2024, 1, 10),
            date(2024, 1, 5)
        ]
    );
}

#[test]
fn equal_dates_break_ties_by_recency() {
    let mut ledger = Ledger::new("Ties");
    let first = TransactionService::add(
        &mut ledger,
        TransactionDraft::new(dec!(10), "misc", "first", TransactionKind::Expense)
            .on(date(2024, 3, 1)),
    )
    .unwrap();
    let second = TransactionService::add(
        &mut ledger,
        TransactionDraft::new(dec!(20), "misc", "second", TransactionKind::Expense)
            .on(date(2024, 3, 1)),
    )
    .unwrap();

    let results = TransactionService::query(&ledger, &TransactionFilter::default());
    assert_eq!(results[0].id, second, "most recently created first");
    assert_eq!(results[1].id, first);
}

#[test]
fn sort_by_amount_ascending() {
    let ledger = seeded_ledger();
    let filter = TransactionFilter {
        sort_by: SortField::Amount,
        order: SortOrder::Ascending,
        ..TransactionFilter::default()
    };
    let amounts: Vec<_> = TransactionService::query(&ledger, &filter)
        .iter()
        .map(|txn| txn.amount)
        .collect();
    assert_eq!(amounts, vec![dec!(45), dec!(200), dec!(300), dec!(1000)]);
}

#[test]
fn invalid_sort_token_falls_back_to_date() {
    assert_eq!(SortField::parse_or_default("nonsense"), SortField::Date);
}

#[test]
fn limit_and_offset_paginate() {
    let ledger = seeded_ledger();
    let filter = TransactionFilter {
        limit: Some(2),
        offset: 1,
        ..TransactionFilter::default()
    };
    let results = TransactionService::query(&ledger, &filter);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].date, date(2024, 1, 15));
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let ledger = seeded_ledger();
    assert_eq!(TransactionService::search(&ledger, "GROCER", None).len(), 1);
    assert_eq!(TransactionService::search(&ledger, "greenmart", None).len(), 1);
    assert_eq!(TransactionService::search(&ledger, "rent", None).len(), 1);
    assert!(TransactionService::search(&ledger, "plumbing", None).is_empty());
}

#[test]
fn update_patches_fields_and_reports_missing_ids() {
    let mut ledger = seeded_ledger();
    let id = ledger.transactions[0].id;
    let patched = TransactionService::update(
        &mut ledger,
        id,
        TransactionPatch {
            description: Some("adjusted".into()),
            ..TransactionPatch::default()
        },
    );
    assert!(patched);
    assert_eq!(ledger.transaction(id).unwrap().description, "adjusted");

    assert!(!TransactionService::update(
        &mut ledger,
        uuid::Uuid::new_v4(),
        TransactionPatch::default()
    ));
}

#[test]
fn prefix_resolution_refuses_ambiguity() {
    let mut ledger = Ledger::new("Prefixes");
    let id = TransactionService::add(
        &mut ledger,
        TransactionDraft::new(dec!(5), "misc", "only", TransactionKind::Expense),
    )
    .unwrap();

    let resolved = TransactionService::resolve(&ledger, &id.to_string()[..8]).unwrap();
    assert_eq!(resolved.unwrap().id, id);

    for i in 0..64 {
        TransactionService::add(
            &mut ledger,
            TransactionDraft::new(dec!(5), "misc", format!("filler {i}"), TransactionKind::Expense),
        )
        .unwrap();
    }
    let ambiguous = "0123456789abcdef".chars().any(|ch| {
        matches!(
            TransactionService::resolve(&ledger, &ch.to_string()),
            Err(FinanceError::AmbiguousId(_))
        )
    });
    assert!(ambiguous, "some single-hex prefix must collide across 65 ids");
}
