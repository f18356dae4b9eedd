use spendlog_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>|reset]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("show") => {
            show_config(&context.config);
            Ok(())
        }
        Some("set") => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.config.set(&key, &value)?;
            context.persist_config()?;
            io::print_success(format!(
                "`{}` set to `{}`.",
                key,
                context.config.get(&key).unwrap_or_default()
            ));
            Ok(())
        }
        Some("reset") => {
            if !context.confirm("Restore default preferences?")? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.config = Config::default();
            context.persist_config()?;
            io::print_success("Preferences reset to defaults.");
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(config: &Config) {
    output::section("Preferences");
    for key in Config::KEYS {
        output::line(format!(
            "  {:<26} {}",
            key,
            config.get(key).unwrap_or_default()
        ));
    }
}
