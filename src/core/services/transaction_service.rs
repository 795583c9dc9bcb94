//! Business logic helpers for managing transactions.

use uuid::Uuid;

use crate::errors::FinanceResult;
use crate::ledger::transaction::{Transaction, TransactionDraft, TransactionPatch};
use crate::ledger::{Ledger, TransactionFilter};

/// Provides validated CRUD helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Builds a transaction from the draft and stores it, returning its id.
    pub fn add(ledger: &mut Ledger, draft: TransactionDraft) -> FinanceResult<Uuid> {
        let transaction = Transaction::from_draft(draft)?;
        let id = ledger.add_transaction(transaction)?;
        tracing::info!(%id, "transaction added");
        Ok(id)
    }

    /// Applies a partial update; false when the id is unknown.
    pub fn update(ledger: &mut Ledger, id: Uuid, patch: TransactionPatch) -> bool {
        let updated = ledger.update_transaction(id, patch);
        if updated {
            tracing::info!(%id, "transaction updated");
        }
        updated
    }

    /// Deletes by id; false when the id is unknown.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> bool {
        match ledger.remove_transaction(id) {
            Some(removed) => {
                tracing::info!(id = %removed.id, "transaction deleted");
                true
            }
            None => false,
        }
    }

    pub fn get(ledger: &Ledger, id: Uuid) -> Option<&Transaction> {
        ledger.transaction(id)
    }

    /// Resolves a full id or an unambiguous prefix.
    pub fn resolve<'a>(
        ledger: &'a Ledger,
        reference: &str,
    ) -> FinanceResult<Option<&'a Transaction>> {
        ledger.transaction_by_prefix(reference)
    }

    pub fn query<'a>(ledger: &'a Ledger, filter: &TransactionFilter) -> Vec<&'a Transaction> {
        ledger.query(filter)
    }

    pub fn search<'a>(
        ledger: &'a Ledger,
        text: &str,
        limit: Option<usize>,
    ) -> Vec<&'a Transaction> {
        ledger.search(text, limit)
    }
}
