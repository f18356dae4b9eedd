//! Dispatch, error reporting and store plumbing for the shell.

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use spendlog_config::{Config, ConfigError, ConfigManager};
use spendlog_core::{CoreError, ExpenseBook, ValidationErrors};
use spendlog_domain::Expense;
use spendlog_export::{ExportError, Exporter};
use spendlog_storage_json::JsonExpenseStorage;
use tracing::debug;
use uuid::Uuid;

use super::commands;
use super::formatters::CliFormatters;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
use super::system_clock::clock_from_env;
pub use crate::cli::shell_context::{CliMode, ShellContext};
use crate::cli::shell_context::pdf_options;
use crate::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(utils::app_data_dir())?;
        let config = config_manager.load()?;
        apply_config(&config);
        let book = ExpenseBook::new(JsonExpenseStorage::new(resolve_store_path(&config)));
        debug!(store = %book.storage().path().display(), "opened expense store");

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            book,
            exporter: Exporter::new(pdf_options(&config)),
            config_manager,
            config,
            clock: clock_from_env(),
            running: true,
        })
    }

    /// Name and usage line of every registered command.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        "spendlog> ".to_string()
    }

    pub(crate) fn formatters(&self) -> CliFormatters {
        CliFormatters::new(&self.config)
    }

    /// Saves the configuration and rebuilds everything derived from it.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        apply_config(&self.config);
        self.exporter = Exporter::new(pdf_options(&self.config));
        let store_path = resolve_store_path(&self.config);
        if store_path != self.store_path() {
            self.book = ExpenseBook::new(JsonExpenseStorage::new(store_path));
        }
        Ok(())
    }

    pub(crate) fn export_dir(&self) -> PathBuf {
        match (&self.config.export_dir, utils::sandboxed_export_dir()) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => dir,
            (None, None) => self.config.resolve_export_dir(),
        }
    }

    /// Finds the expense whose id is `token` or starts with it.
    pub(crate) fn resolve_expense(&self, token: &str) -> Result<Expense, CommandError> {
        let needle = token.trim().to_lowercase().replace('-', "");
        if needle.is_empty() {
            return Err(CommandError::InvalidArguments("expense id is required".into()));
        }
        if let Ok(id) = Uuid::parse_str(token.trim()) {
            return self
                .book
                .find(id)
                .ok_or(CommandError::Core(CoreError::ExpenseNotFound(id)));
        }
        let mut matches = self
            .book
            .read()
            .into_iter()
            .filter(|expense| expense.id.simple().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense),
            (None, _) => Err(CommandError::Message(format!(
                "No expense matches id `{}`.",
                token
            ))),
            (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
                "id `{}` is ambiguous; use more characters",
                token
            ))),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        Ok(self.confirm("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_info("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Validation(errors) => {
                cli_io::print_error("Expense not saved:");
                for (field, message) in errors.iter() {
                    output::line(format!("  - {}: {}", field, message));
                }
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}

/// Store location: configured data dir, then `SPENDLOG_HOME`, then the platform data dir.
fn resolve_store_path(config: &Config) -> PathBuf {
    match (&config.data_dir, utils::home_override()) {
        (None, Some(home)) => home.join(&config.store_file),
        _ => config.resolve_store_path(),
    }
}

fn apply_config(config: &Config) {
    let color_enabled = config.ui_color_enabled
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();
    colored::control::set_override(color_enabled);
    output::set_preferences(OutputPreferences { color_enabled });
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = crate::cli::shell::parse_command_line(line)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

#[cfg(test)]
pub(crate) fn test_context(dir: &std::path::Path, today: &str) -> ShellContext {
    use chrono::{DateTime, NaiveDate, Utc};
    use spendlog_core::time::FixedClock;

    let mut registry = CommandRegistry::new();
    commands::register_all(&mut registry);
    let config = Config {
        data_dir: Some(dir.to_path_buf()),
        export_dir: Some(dir.join("exports")),
        ui_color_enabled: false,
        ..Config::default()
    };
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap();
    let noon = today.and_hms_opt(12, 0, 0).unwrap();
    ShellContext {
        mode: CliMode::Script,
        registry,
        theme: ColorfulTheme::default(),
        book: ExpenseBook::new(JsonExpenseStorage::new(config.resolve_store_path())),
        exporter: Exporter::new(pdf_options(&config)),
        config_manager: ConfigManager::new(dir.join("config.json")),
        config,
        clock: Box::new(FixedClock(DateTime::from_naive_utc_and_offset(noon, Utc))),
        running: true,
    }
}
