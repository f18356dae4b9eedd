//! spendlog-core
//!
//! Summarization, filtering, trend and validation services for spendlog.
//! Depends on spendlog-domain. No CLI, no terminal I/O; storage is reached
//! only through the [`storage::ExpenseStorage`] trait.

pub mod error;
pub mod filter_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod trend_service;
pub mod validation;

pub use error::CoreError;
pub use filter_service::*;
pub use storage::{ExpenseBook, ExpenseStorage, MemoryStorage};
pub use summary_service::*;
pub use time::Clock;
pub use trend_service::*;
pub use validation::*;

#[cfg(test)]
mod tests;
