//! Lossless CSV and JSON round-trips for transactions.
//!
//! Amounts travel as exact decimal strings; a re-import reconstructs the same
//! observable values with no floating drift.

use std::io::{Read, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FinanceResult;
use crate::ledger::transaction::{Transaction, TransactionDraft, TransactionKind};
use crate::ledger::Ledger;

/// Flat CSV row for a transaction: the export column contract.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    id: Uuid,
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: Decimal,
    category: String,
    description: String,
}

/// Writes every transaction as `id,date,type,amount,category,description`.
pub fn export_transactions_csv<W: Write>(ledger: &Ledger, writer: W) -> FinanceResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for txn in &ledger.transactions {
        csv_writer.serialize(CsvRecord {
            id: txn.id,
            date: txn.date,
            kind: txn.kind,
            amount: txn.amount,
            category: txn.category.clone(),
            description: txn.description.clone(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads transactions back from the CSV column contract. Ids are preserved;
/// fields outside the contract take their defaults.
pub fn import_transactions_csv<R: Read>(reader: R) -> FinanceResult<Vec<Transaction>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    for record in csv_reader.deserialize() {
        let record: CsvRecord = record?;
        let mut txn = Transaction::from_draft(
            TransactionDraft::new(record.amount, record.category, record.description, record.kind)
                .on(record.date),
        )?;
        txn.id = record.id;
        transactions.push(txn);
    }
    Ok(transactions)
}

/// Writes the full ledger document, entities exactly as persisted.
pub fn export_ledger_json<W: Write>(ledger: &Ledger, writer: W) -> FinanceResult<()> {
    serde_json::to_writer_pretty(writer, ledger)?;
    Ok(())
}

pub fn import_ledger_json<R: Read>(reader: R) -> FinanceResult<Ledger> {
    Ok(serde_json::from_reader(reader)?)
}
