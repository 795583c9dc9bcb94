use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FinanceError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(token: &str) -> Result<Self, FinanceError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FinanceError::Validation(format!(
                "unknown transaction type `{other}`"
            ))),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Recurrence metadata carried by generated or template transactions.
///
/// `parent_id` is a non-owning back-reference used for lineage only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurringRule {
    pub frequency: RecurringFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

/// A single income or expense record.
///
/// The amount is always stored non-negative; the sign is derived from the
/// kind at read time via [`Transaction::signed_amount`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub account: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringRule>,
    #[serde(default = "default_true")]
    pub is_essential: bool,
    /// Auto-categorization confidence in `[0, 1]`; informational only.
    #[serde(default = "default_confidence")]
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_confidence() -> f64 {
    1.0
}

/// Fully named construction input for [`Transaction`]; optional fields are
/// defaulted centrally and validated once in [`Transaction::from_draft`].
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub kind: Option<TransactionKind>,
    pub date: Option<NaiveDate>,
    pub account: Option<String>,
    pub tags: Vec<String>,
    pub subcategory: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub recurring: Option<RecurringRule>,
    pub is_essential: Option<bool>,
    pub confidence_score: Option<f64>,
}

impl TransactionDraft {
    pub fn new(
        amount: Decimal,
        category: impl Into<String>,
        description: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            description: description.into(),
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn in_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn tagged(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn essential(mut self, flag: bool) -> Self {
        self.is_essential = Some(flag);
        self
    }
}

impl Transaction {
    /// Builds a transaction from a draft, normalizing as the ledger expects:
    /// negative amounts become absolute values, the category is title-cased,
    /// tags are de-duplicated and the confidence score is clamped.
    pub fn from_draft(draft: TransactionDraft) -> Result<Self, FinanceError> {
        let kind = draft
            .kind
            .ok_or_else(|| FinanceError::Validation("transaction type is required".into()))?;
        if draft.category.trim().is_empty() {
            return Err(FinanceError::Validation("category is required".into()));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            amount: draft.amount.abs(),
            category: title_case(&draft.category),
            description: draft.description,
            kind,
            date: draft.date.unwrap_or_else(|| now.date_naive()),
            account: draft.account.unwrap_or_else(|| "default".into()),
            tags: dedup_tags(draft.tags),
            subcategory: draft.subcategory,
            merchant: draft.merchant,
            payment_method: draft.payment_method,
            location: draft.location,
            notes: draft.notes,
            recurring: draft.recurring,
            is_essential: draft.is_essential.unwrap_or(true),
            confidence_score: draft.confidence_score.unwrap_or(1.0).clamp(0.0, 1.0),
            created_at: now,
            updated_at: now,
        })
    }

    /// Amount with the sign implied by the transaction kind.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }

    /// Applies a partial update, re-normalizing the touched fields and
    /// bumping `updated_at`. `created_at` is never changed.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount.abs();
        }
        if let Some(category) = patch.category {
            self.category = title_case(&category);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(account) = patch.account {
            self.account = account;
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
        if let Some(subcategory) = patch.subcategory {
            self.subcategory = subcategory;
        }
        if let Some(merchant) = patch.merchant {
            self.merchant = merchant;
        }
        if let Some(payment_method) = patch.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(recurring) = patch.recurring {
            self.recurring = recurring;
        }
        if let Some(flag) = patch.is_essential {
            self.is_essential = flag;
        }
        if let Some(score) = patch.confidence_score {
            self.confidence_score = score.clamp(0.0, 1.0);
        }
        self.updated_at = Utc::now();
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.updated_at = Utc::now();
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        if self.tags.len() != before {
            self.updated_at = Utc::now();
        }
    }
}

/// Partial update for a transaction. Inner `Option`s distinguish
/// "leave unchanged" from "clear the value".
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub kind: Option<TransactionKind>,
    pub date: Option<NaiveDate>,
    pub account: Option<String>,
    pub tags: Option<Vec<String>>,
    pub subcategory: Option<Option<String>>,
    pub merchant: Option<Option<String>>,
    pub payment_method: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub recurring: Option<Option<RecurringRule>>,
    pub is_essential: Option<bool>,
    pub confidence_score: Option<f64>,
}

/// Title-cases free-form category input: every alphabetic run starts with an
/// uppercase letter, the rest lowercased.
pub(crate) fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut word_start = true;
    for ch in input.trim().chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}
