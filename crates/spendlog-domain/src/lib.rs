//! spendlog-domain
//!
//! Pure domain models (Expense, Category, form input) and calendar helpers.
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod expense;

pub use category::*;
pub use common::*;
pub use expense::*;
