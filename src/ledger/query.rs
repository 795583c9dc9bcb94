use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::transaction::{title_case, Transaction, TransactionKind};

/// Conjunction of optional predicates over transactions. Tag filters match
/// when the transaction carries ANY of the requested tags; everything else
/// is ANDed.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub account: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub tags: Vec<String>,
    pub merchant: Option<String>,
    pub is_essential: Option<bool>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl TransactionFilter {
    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if txn.category != title_case(category) {
                return false;
            }
        }
        if let Some(account) = &self.account {
            if &txn.account != account {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if txn.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if txn.date > end {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if txn.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if txn.amount > max {
                return false;
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| txn.tags.contains(tag)) {
            return false;
        }
        if let Some(merchant) = &self.merchant {
            if txn.merchant.as_deref() != Some(merchant.as_str()) {
                return false;
            }
        }
        if let Some(essential) = self.is_essential {
            if txn.is_essential != essential {
                return false;
            }
        }
        true
    }

    /// Comparator for the configured sort. Equal dates fall back to
    /// `created_at` descending so listings stay recency-stable.
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let primary = match self.sort_by {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
            SortField::Category => a.category.cmp(&b.category),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let primary = match self.order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        if primary == Ordering::Equal && self.sort_by == SortField::Date {
            return b.created_at.cmp(&a.created_at);
        }
        primary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Amount,
    Category,
    CreatedAt,
}

impl Default for SortField {
    fn default() -> Self {
        SortField::Date
    }
}

impl SortField {
    /// Lenient parse used by command surfaces; unknown fields fall back to
    /// the date ordering.
    pub fn parse_or_default(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "amount" => SortField::Amount,
            "category" => SortField::Category,
            "created_at" | "created" => SortField::CreatedAt,
            _ => SortField::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Descending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_fields_fall_back_to_date() {
        assert_eq!(SortField::parse_or_default("amount"), SortField::Amount);
        assert_eq!(SortField::parse_or_default("merchant"), SortField::Date);
        assert_eq!(SortField::parse_or_default(""), SortField::Date);
    }
}
