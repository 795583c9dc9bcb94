pub mod json_backend;

use crate::{errors::FinanceError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, FinanceError>;

/// Abstraction over persistence backends capable of storing ledgers.
///
/// Implementations must round-trip amounts losslessly: the core stores exact
/// decimals and a backend may not degrade them to binary floats.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn delete(&self, name: &str) -> Result<()>;
    fn list(&self) -> Result<Vec<String>>;
}

pub use json_backend::JsonStore;
