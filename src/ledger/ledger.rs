use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    budget::Budget,
    goal::Goal,
    query::TransactionFilter,
    transaction::{Transaction, TransactionKind},
};
use crate::errors::FinanceError;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Category suggestions offered before the ledger has history of its own.
pub static DEFAULT_CATEGORIES: Lazy<CategoryCatalog> = Lazy::new(|| CategoryCatalog {
    income: ["Salary", "Freelance", "Investment", "Gift", "Other Income"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    expense: [
        "Food",
        "Rent",
        "Transportation",
        "Entertainment",
        "Healthcare",
        "Shopping",
        "Utilities",
        "Education",
        "Other Expense",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect(),
});

/// Distinct categories grouped by transaction kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCatalog {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

/// The persisted aggregate: every transaction, budget, and goal of one book,
/// saved and loaded as a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    // --- transactions ---

    /// Stores a transaction, rejecting ids that are already present.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid, FinanceError> {
        if self.transaction(transaction.id).is_some() {
            return Err(FinanceError::Duplicate(transaction.id.to_string()));
        }
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        Ok(id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    /// Resolves a full id or an unambiguous id prefix.
    ///
    /// A prefix matching more than one record is an error, never an
    /// arbitrary pick.
    pub fn transaction_by_prefix(&self, prefix: &str) -> Result<Option<&Transaction>, FinanceError> {
        resolve_prefix(&self.transactions, |txn| txn.id, prefix)
    }

    /// Applies a patch; false when the id is unknown.
    pub fn update_transaction(
        &mut self,
        id: Uuid,
        patch: super::transaction::TransactionPatch,
    ) -> bool {
        match self.transaction_mut(id) {
            Some(txn) => {
                txn.apply(patch);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    /// Filtered, sorted, paginated view over the transactions.
    pub fn query(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect();
        matches.sort_by(|a, b| filter.compare(a, b));
        matches
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Case-insensitive substring search over description, category, notes
    /// and merchant, most recent first.
    pub fn search(&self, text: &str, limit: Option<usize>) -> Vec<&Transaction> {
        let needle = text.to_lowercase();
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|txn| {
                txn.description.to_lowercase().contains(&needle)
                    || txn.category.to_lowercase().contains(&needle)
                    || txn
                        .notes
                        .as_ref()
                        .is_some_and(|notes| notes.to_lowercase().contains(&needle))
                    || txn
                        .merchant
                        .as_ref()
                        .is_some_and(|merchant| merchant.to_lowercase().contains(&needle))
            })
            .collect();
        matches.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        matches.truncate(limit.unwrap_or(50));
        matches
    }

    /// Distinct categories seen in the ledger, grouped by kind and sorted.
    /// Falls back to the default catalog while the ledger is empty.
    pub fn categories(&self) -> CategoryCatalog {
        if self.transactions.is_empty() {
            return DEFAULT_CATEGORIES.clone();
        }
        let mut income = Vec::new();
        let mut expense = Vec::new();
        for txn in &self.transactions {
            let bucket = match txn.kind {
                TransactionKind::Income => &mut income,
                TransactionKind::Expense => &mut expense,
            };
            if !bucket.contains(&txn.category) {
                bucket.push(txn.category.clone());
            }
        }
        income.sort();
        expense.sort();
        CategoryCatalog { income, expense }
    }

    // --- budgets ---

    pub fn add_budget(&mut self, budget: Budget) -> Result<Uuid, FinanceError> {
        if self.budget(budget.id).is_some() {
            return Err(FinanceError::Duplicate(budget.id.to_string()));
        }
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        Ok(id)
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: Uuid) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn budget_by_prefix(&self, prefix: &str) -> Result<Option<&Budget>, FinanceError> {
        resolve_prefix(&self.budgets, |budget| budget.id, prefix)
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let index = self.budgets.iter().position(|budget| budget.id == id)?;
        let removed = self.budgets.remove(index);
        self.touch();
        Some(removed)
    }

    // --- goals ---

    pub fn add_goal(&mut self, goal: Goal) -> Result<Uuid, FinanceError> {
        if self.goal(goal.id).is_some() {
            return Err(FinanceError::Duplicate(goal.id.to_string()));
        }
        let id = goal.id;
        self.goals.push(goal);
        self.touch();
        Ok(id)
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn goal_mut(&mut self, id: Uuid) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn goal_by_prefix(&self, prefix: &str) -> Result<Option<&Goal>, FinanceError> {
        resolve_prefix(&self.goals, |goal| goal.id, prefix)
    }

    pub fn remove_goal(&mut self, id: Uuid) -> Option<Goal> {
        let index = self.goals.iter().position(|goal| goal.id == id)?;
        let removed = self.goals.remove(index);
        self.touch();
        Some(removed)
    }
}

fn resolve_prefix<'a, T>(
    items: &'a [T],
    id_of: impl Fn(&T) -> Uuid,
    prefix: &str,
) -> Result<Option<&'a T>, FinanceError> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(None);
    }
    if let Ok(full) = Uuid::parse_str(&needle) {
        return Ok(items.iter().find(|item| id_of(item) == full));
    }
    let mut matches = items
        .iter()
        .filter(|item| id_of(item).to_string().starts_with(&needle));
    let first = matches.next();
    if matches.next().is_some() {
        return Err(FinanceError::AmbiguousId(prefix.to_string()));
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::{TransactionDraft, TransactionKind};
    use rust_decimal_macros::dec;

    fn sample(description: &str) -> Transaction {
        Transaction::from_draft(TransactionDraft::new(
            dec!(10),
            "misc",
            description,
            TransactionKind::Expense,
        ))
        .unwrap()
    }

    #[test]
    fn duplicate_transaction_ids_are_rejected() {
        let mut ledger = Ledger::new("Test");
        let txn = sample("one");
        let clone = txn.clone();
        ledger.add_transaction(txn).unwrap();
        assert!(matches!(
            ledger.add_transaction(clone),
            Err(FinanceError::Duplicate(_))
        ));
        assert_eq!(ledger.transactions.len(), 1);
    }

    #[test]
    fn prefix_lookup_resolves_full_and_partial_ids() {
        let mut ledger = Ledger::new("Test");
        let txn = sample("one");
        let id = ledger.add_transaction(txn).unwrap();

        let full = ledger.transaction_by_prefix(&id.to_string()).unwrap();
        assert_eq!(full.unwrap().id, id);

        let prefix = &id.to_string()[..8];
        let by_prefix = ledger.transaction_by_prefix(prefix).unwrap();
        assert_eq!(by_prefix.unwrap().id, id);

        assert!(ledger.transaction_by_prefix("zzzzzzzz").unwrap().is_none());
    }

    #[test]
    fn ambiguous_prefixes_error_instead_of_picking() {
        let mut ledger = Ledger::new("Test");
        for i in 0..64 {
            ledger.add_transaction(sample(&format!("txn {i}"))).unwrap();
        }
        // Single hex characters collide across 64 random v4 ids in practice;
        // find one that does and assert the lookup refuses to choose.
        let mut found_ambiguous = false;
        for ch in "0123456789abcdef".chars() {
            let prefix = ch.to_string();
            match ledger.transaction_by_prefix(&prefix) {
                Err(FinanceError::AmbiguousId(p)) => {
                    assert_eq!(p, prefix);
                    found_ambiguous = true;
                    break;
                }
                _ => continue,
            }
        }
        assert!(found_ambiguous, "expected at least one ambiguous hex prefix");
    }

    #[test]
    fn update_and_remove_signal_missing_ids() {
        let mut ledger = Ledger::new("Test");
        assert!(!ledger.update_transaction(Uuid::new_v4(), Default::default()));
        assert!(ledger.remove_transaction(Uuid::new_v4()).is_none());
    }

    #[test]
    fn categories_fall_back_to_defaults_when_empty() {
        let ledger = Ledger::new("Test");
        let catalog = ledger.categories();
        assert!(catalog.expense.contains(&"Food".to_string()));

        let mut ledger = Ledger::new("Test");
        ledger.add_transaction(sample("one")).unwrap();
        let catalog = ledger.categories();
        assert_eq!(catalog.expense, vec!["Misc".to_string()]);
        assert!(catalog.income.is_empty());
    }
}
