use std::fmt;

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::cli::core::CommandError;
use crate::cli::output;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for free-form text, pre-filled with `initial`. Empty answers are allowed
/// so validation can report them.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: &str,
) -> Result<String, CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(CommandError::from)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Splits `--flag value` pairs from free arguments.
#[derive(Debug, Default)]
pub struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    pub options: Vec<(&'a str, &'a str)>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(args: &[&'a str], flags: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            match flags.iter().find(|flag| **flag == arg) {
                Some(flag) => {
                    let value = iter.next().ok_or_else(|| {
                        CommandError::InvalidArguments(format!("`{}` expects a value", flag))
                    })?;
                    parsed.options.push((arg, value));
                }
                None if arg.starts_with("--") => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown option `{}`",
                        arg
                    )))
                }
                None => parsed.positional.push(arg),
            }
        }
        Ok(parsed)
    }

    /// Last value given for `flag`.
    pub fn value(&self, flag: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| *name == flag)
            .map(|(_, value)| *value)
    }

    pub fn values(&self, flag: &str) -> impl Iterator<Item = &'a str> + '_ {
        let flag = flag.to_string();
        self.options
            .iter()
            .filter(move |(name, _)| *name == flag)
            .map(|(_, value)| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_flags_from_positionals() {
        let args = ["coffee", "--category", "Food", "beans", "--from", "2024-01-01"];
        let parsed = ParsedArgs::parse(&args, &["--category", "--from"]).unwrap();
        assert_eq!(parsed.positional, vec!["coffee", "beans"]);
        assert_eq!(parsed.value("--category"), Some("Food"));
        assert_eq!(parsed.values("--from").collect::<Vec<_>>(), vec!["2024-01-01"]);
        assert_eq!(parsed.value("--to"), None);
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(ParsedArgs::parse(&["--category"], &["--category"]).is_err());
        assert!(ParsedArgs::parse(&["--colour", "red"], &["--category"]).is_err());
    }

    #[test]
    fn parse_date_requires_iso_format() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("02/29/2024").is_err());
    }
}
