use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use spendlog_config::{Config, ConfigManager};
use spendlog_core::{Clock, ExpenseBook};
use spendlog_export::{Exporter, PdfOptions};
use spendlog_storage_json::JsonExpenseStorage;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub book: ExpenseBook<JsonExpenseStorage>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub clock: Box<dyn Clock>,
    pub exporter: Exporter,
    pub running: bool,
}

impl ShellContext {
    pub fn store_path(&self) -> PathBuf {
        self.book.storage().path().to_path_buf()
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }
}

/// PDF settings derived from the user's configuration.
pub fn pdf_options(config: &Config) -> PdfOptions {
    PdfOptions {
        currency_symbol: config.currency_symbol.clone(),
        ..PdfOptions::default()
    }
}
