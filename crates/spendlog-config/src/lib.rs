//! spendlog-config
//!
//! User preferences for the spendlog shell: currency display, where the
//! expense store and exports live, and dashboard sizing.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
