//! Record store adapter and the store object that owns mutation cycles.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use spendlog_domain::{Expense, ExpenseInput};

use crate::CoreError;

/// Abstraction over persistence backends holding the single expense list.
pub trait ExpenseStorage: Send + Sync {
    /// Loads the stored list. A backend with nothing stored returns an empty list.
    fn load(&self) -> Result<Vec<Expense>, CoreError>;
    /// Replaces the whole stored list.
    fn save_all(&self, expenses: &[Expense]) -> Result<(), CoreError>;
    /// Removes every stored record.
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-process backend, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<Vec<Expense>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExpenseStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        self.records
            .read()
            .map(|records| records.clone())
            .map_err(|_| CoreError::StorageUnavailable("memory store lock poisoned".into()))
    }

    fn save_all(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| CoreError::StorageUnavailable("memory store lock poisoned".into()))?;
        *records = expenses.to_vec();
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.save_all(&[])
    }
}

/// Store object over a backend. Every mutation is a whole-list
/// read-modify-write that returns the new snapshot.
pub struct ExpenseBook<S: ExpenseStorage> {
    storage: S,
}

impl<S: ExpenseStorage> ExpenseBook<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current snapshot; storage failures degrade to an empty list.
    pub fn read(&self) -> Vec<Expense> {
        self.try_read().unwrap_or_else(|err| {
            warn!(error = %err, "expense store unreadable, using empty snapshot");
            Vec::new()
        })
    }

    /// Current snapshot, surfacing storage failures instead of hiding them.
    pub fn try_read(&self) -> Result<Vec<Expense>, CoreError> {
        self.storage.load()
    }

    /// Replaces the stored list; failures are logged and dropped.
    pub fn write_all(&self, expenses: &[Expense]) {
        if let Err(err) = self.storage.save_all(expenses) {
            warn!(error = %err, count = expenses.len(), "failed to persist expenses");
        }
    }

    fn persist(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        self.storage.save_all(expenses).map_err(|err| {
            warn!(error = %err, count = expenses.len(), "failed to persist expenses");
            err
        })
    }

    pub fn clear(&self) {
        match self.storage.clear() {
            Ok(()) => info!("cleared all expenses"),
            Err(err) => warn!(error = %err, "failed to clear expense store"),
        }
    }

    /// Records a new expense ahead of the existing ones.
    pub fn create(
        &self,
        input: ExpenseInput,
        now: DateTime<Utc>,
    ) -> Result<Vec<Expense>, CoreError> {
        let expense = Expense::new(input, now);
        debug!(id = %expense.id, "creating expense");
        let mut expenses = self.try_read()?;
        expenses.insert(0, expense);
        self.persist(&expenses)?;
        Ok(expenses)
    }

    pub fn update(
        &self,
        id: Uuid,
        input: ExpenseInput,
        now: DateTime<Utc>,
    ) -> Result<Vec<Expense>, CoreError> {
        let mut expenses = self.try_read()?;
        let expense = expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(CoreError::ExpenseNotFound(id))?;
        expense.apply(input, now);
        debug!(%id, "updated expense");
        self.persist(&expenses)?;
        Ok(expenses)
    }

    /// Removes the expense if present; unknown ids leave the list untouched.
    pub fn delete(&self, id: Uuid) -> Result<Vec<Expense>, CoreError> {
        let mut expenses = self.try_read()?;
        let before = expenses.len();
        expenses.retain(|expense| expense.id != id);
        if expenses.len() != before {
            debug!(%id, "deleted expense");
            self.persist(&expenses)?;
        }
        Ok(expenses)
    }

    pub fn find(&self, id: Uuid) -> Option<Expense> {
        self.read().into_iter().find(|expense| expense.id == id)
    }
}
