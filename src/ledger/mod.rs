//! Ledger domain models, persistence-friendly types, and helpers.

pub mod budget;
pub mod goal;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod query;
pub mod transaction;

pub use budget::{Budget, BudgetDraft, BudgetHealth, BudgetStatus};
pub use goal::{
    AutoContribute, Contribution, ContributionFrequency, Goal, GoalDraft, GoalPriority,
    GoalStatus, GoalType, Milestone,
};
pub use ledger::{CategoryCatalog, Ledger};
pub use period::BudgetPeriod;
pub use query::{SortField, SortOrder, TransactionFilter};
pub use transaction::{
    RecurringFrequency, RecurringRule, Transaction, TransactionDraft, TransactionKind,
    TransactionPatch,
};
