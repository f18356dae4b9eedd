use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
    path::PathBuf,
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use spendlog_config::Config;
use spendlog_domain::Category;
use spendlog_export::ExportFormat;
use tracing::{debug, info, warn};

use crate::cli::commands::{expense::LIST_FLAGS, export::EXPORT_FLAGS};
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::utils;

/// Set to any value to read commands from stdin without a line editor.
pub const SCRIPT_ENV: &str = "SPENDLOG_CLI_SCRIPT";
const HISTORY_FILE: &str = "history.txt";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    info!(?mode, store = %context.store_path().display(), "shell started");

    match mode {
        CliMode::Interactive => {
            let mut source = ReadlineSource::open(&context)?;
            output::info("Welcome to spendlog. Type `help` to list commands.");
            let outcome = run_session(&mut context, &mut source);
            source.close();
            outcome
        }
        CliMode::Script => run_session(&mut context, &mut StdinSource::new(io::stdin().lock())),
    }
}

/// One read from a line source.
pub(crate) enum ShellInput {
    Line(String),
    Interrupted,
    Closed,
}

/// Where the session pulls its command lines from.
pub(crate) trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<ShellInput, CliError>;
}

/// Line editor with completion, usage hints and a history file in the app directory.
struct ReadlineSource {
    editor: Editor<CommandHelper, DefaultHistory>,
    history: PathBuf,
}

impl ReadlineSource {
    fn open(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(context.command_usages())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

        let history = utils::app_data_dir().join(HISTORY_FILE);
        if let Err(err) = editor.load_history(&history) {
            debug!(error = %err, path = %history.display(), "no shell history loaded");
        }
        Ok(Self { editor, history })
    }

    fn close(mut self) {
        if let Err(err) = self.editor.save_history(&self.history) {
            warn!(error = %err, path = %self.history.display(), "failed to save shell history");
        }
    }
}

impl LineSource for ReadlineSource {
    fn next_line(&mut self, prompt: &str) -> Result<ShellInput, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    self.editor.add_history_entry(trimmed).ok();
                }
                Ok(ShellInput::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ShellInput::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(ShellInput::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Plain buffered reader used in script mode; no prompt is printed.
pub(crate) struct StdinSource<R> {
    reader: R,
}

impl<R: BufRead> StdinSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for StdinSource<R> {
    fn next_line(&mut self, _prompt: &str) -> Result<ShellInput, CliError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(ShellInput::Closed);
        }
        Ok(ShellInput::Line(line))
    }
}

/// Runs commands until the source closes or a command asks to exit.
/// Command failures are reported and the session carries on.
pub(crate) fn run_session(
    context: &mut ShellContext,
    source: &mut dyn LineSource,
) -> Result<(), CliError> {
    let mut line_number = 0usize;
    while context.running {
        let line = match source.next_line(&context.prompt())? {
            ShellInput::Line(line) => line,
            ShellInput::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            ShellInput::Closed => break,
        };
        line_number += 1;

        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                if context.mode == CliMode::Script {
                    warn!(line = line_number, error = %err, "script command failed");
                }
                context.report_error(err)?;
            }
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match parse_command_line(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    let outcome = context.dispatch(&command, raw, &args);
    if matches!(outcome, Ok(LoopControl::Exit)) {
        context.running = false;
    }
    outcome
}

/// Completion vocabulary: command names, then per-command arguments.
struct CommandHelper {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandHelper {
    fn new(mut commands: Vec<(&'static str, &'static str)>) -> Self {
        commands.sort_by_key(|(name, _)| *name);
        commands.dedup_by_key(|(name, _)| *name);
        Self { commands }
    }

    fn usage(&self, command: &str) -> Option<&'static str> {
        self.commands
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(command))
            .map(|(_, usage)| *usage)
    }

    /// Words that may follow `previous` tokens on a line starting with `command`.
    fn argument_words(&self, command: &str, previous: &[&str]) -> Vec<String> {
        fn words(items: &[&str]) -> Vec<String> {
            items.iter().map(|item| item.to_string()).collect()
        }
        if previous.last() == Some(&"--category") {
            let mut names: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
            if command == "list" {
                names.insert(0, "all".into());
            }
            return names;
        }
        match (command, previous.len()) {
            ("help", 0) => self.commands.iter().map(|(name, _)| name.to_string()).collect(),
            ("export", 0) => ExportFormat::ALL
                .iter()
                .map(|format| format.extension().to_string())
                .collect(),
            ("export", _) => words(&EXPORT_FLAGS),
            ("list", _) => words(&LIST_FLAGS),
            ("config", 0) => words(&["show", "set", "reset"]),
            ("config", 1) if previous[0] == "set" => words(&Config::KEYS),
            ("add", 2) | ("edit", 3) => Category::ALL.iter().map(|c| c.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Candidates for the word under the cursor and where that word starts.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let previous: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool = match previous.split_first() {
            None => self.commands.iter().map(|(name, _)| name.to_string()).collect(),
            Some((command, rest)) => self.argument_words(&command.to_ascii_lowercase(), rest),
        };
        let matches = pool
            .into_iter()
            .filter(|word| word.to_ascii_lowercase().starts_with(&needle))
            .collect();
        (start, matches)
    }

    /// Usage tail shown after a bare command name followed by a space.
    fn usage_hint(&self, line: &str, pos: usize) -> Option<String> {
        if pos != line.len() || !line.ends_with(' ') {
            return None;
        }
        let mut words = line.split_whitespace();
        let (Some(command), None) = (words.next(), words.next()) else {
            return None;
        };
        let usage = self.usage(command)?;
        let tail = usage.split_once(' ')?.1;
        Some(tail.to_string())
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        self.usage_hint(line, pos)
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_context;
    use tempfile::tempdir;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("summary", "summary"),
            ("list", "list [search text] [--category <name|all>]"),
            ("export", "export <csv|json|pdf> [--out <path>]"),
            ("exit", "exit"),
            ("add", "add <date> <amount> <category> <description...>"),
            ("config", "config <show|set|reset>"),
        ])
    }

    #[test]
    fn completes_command_names_at_line_start() {
        let helper = helper();
        assert_eq!(helper.candidates("ex", 2), (0, vec!["exit".into(), "export".into()]));
        assert_eq!(helper.candidates("  li", 4), (2, vec!["list".into()]));
    }

    #[test]
    fn completes_arguments_from_the_domain() {
        let helper = helper();
        assert_eq!(helper.candidates("export p", 8), (7, vec!["pdf".into()]));
        assert_eq!(
            helper.candidates("list --category tr", 18).1,
            vec!["Transportation".to_string()]
        );
        assert_eq!(helper.candidates("list --category a", 17).1, vec!["all".to_string()]);
        assert_eq!(helper.candidates("add 2024-02-01 5 b", 18).1, vec!["Bills".to_string()]);
        assert_eq!(
            helper.candidates("config set curr", 15).1,
            vec!["currency_symbol".to_string()]
        );
        assert!(helper.candidates("summary x", 9).1.is_empty());
    }

    #[test]
    fn hints_the_usage_after_a_bare_command() {
        let helper = helper();
        assert_eq!(
            helper.usage_hint("export ", 7).as_deref(),
            Some("<csv|json|pdf> [--out <path>]")
        );
        assert_eq!(helper.usage_hint("export", 6), None);
        assert_eq!(helper.usage_hint("export csv ", 11), None);
        assert_eq!(helper.usage_hint("summary ", 8), None);
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add 2024-02-01 12.5 Food "Lunch with team""#).unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[4], "Lunch with team");
        assert!(parse_command_line(r#"add "unterminated"#).is_err());
    }

    #[test]
    fn session_survives_failures_and_stops_at_exit() {
        let dir = tempdir().unwrap();
        let mut context = test_context(dir.path(), "2024-02-20");
        let script = "\
# seed the store
add 2024-02-01 9 Food Bagel
add 2099-01-01 5 Food Future
bogus
exit
add 2024-02-02 3 Food Never
";
        let mut source = StdinSource::new(script.as_bytes());
        run_session(&mut context, &mut source).unwrap();

        let expenses = context.book.read();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].description, "Bagel");
        assert!(!context.running);
    }
}
