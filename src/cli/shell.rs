use std::borrow::Cow;
use std::io::{self, BufRead};

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

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::templates::IMPORTED_TEMPLATE_KEY;

/// Set to run the shell non-interactively over stdin.
pub const SCRIPT_ENV: &str = "BUDGET_PLANNER_CLI_SCRIPT";

const COMMENT_PREFIX: char = '#';

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::debug!(?mode, template = %context.session.template_key(), "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let templates = context
        .session
        .catalog()
        .keys()
        .chain(std::iter::once(IMPORTED_TEMPLATE_KEY))
        .map(str::to_string)
        .collect();
    editor.set_helper(Some(CommandHelper::new(context.command_usages(), templates)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    cli_io::print_info(format!(
        "Template `{}` loaded. Type `help` to list commands.",
        context.session.template_name()
    ));

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        if line.trim_start().starts_with(COMMENT_PREFIX) {
            continue;
        }
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Tab-completes command names and template keys.
/// Hints a command's arguments once its name and a space are typed.
struct CommandHelper {
    usages: Vec<(String, &'static str)>,
    templates: Vec<String>,
}

impl CommandHelper {
    fn new(usages: Vec<(&'static str, &'static str)>, templates: Vec<String>) -> Self {
        let mut usages: Vec<(String, &'static str)> = usages
            .into_iter()
            .map(|(name, usage)| (name.to_ascii_lowercase(), usage))
            .collect();
        usages.sort_by(|a, b| a.0.cmp(&b.0));
        usages.dedup_by(|a, b| a.0 == b.0);
        Self { usages, templates }
    }

    fn candidates<'a>(pool: impl Iterator<Item = &'a String>, needle: &str) -> Vec<Pair> {
        let needle = needle.to_ascii_lowercase();
        pool.filter(|name| name.to_ascii_lowercase().starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }

    /// Argument part of the usage line for `command`, if it takes any.
    fn argument_hint(&self, command: &str) -> Option<&'static str> {
        let command = command.to_ascii_lowercase();
        let (_, usage) = self.usages.iter().find(|(name, _)| *name == command)?;
        let (_, arguments) = usage.split_once(' ')?;
        Some(arguments)
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
        let prefix = &line[..pos];
        let typed = prefix.trim_start();
        let offset = prefix.len() - typed.len();

        let Some((command, rest)) = typed.split_once(char::is_whitespace) else {
            let names = self.usages.iter().map(|(name, _)| name);
            return Ok((offset, Self::candidates(names, typed)));
        };
        if !command.eq_ignore_ascii_case("use") {
            return Ok((pos, Vec::new()));
        }
        let argument = rest.trim_start();
        Ok((pos - argument.len(), Self::candidates(self.templates.iter(), argument)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        let command = line.trim_start().strip_suffix(' ')?;
        if command.contains(char::is_whitespace) {
            return None;
        }
        self.argument_hint(command).map(str::to_string)
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if output::preferences().plain {
            return Cow::Borrowed(hint);
        }
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    split(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("use \"Default").is_err());
    }

    #[test]
    fn hint_shows_arguments_after_command_name() {
        let helper = CommandHelper::new(
            vec![("budget", "budget <group> <item> <amount>"), ("exit", "exit")],
            Vec::new(),
        );
        assert_eq!(helper.argument_hint("BUDGET"), Some("<group> <item> <amount>"));
        assert_eq!(helper.argument_hint("exit"), None);
        assert_eq!(helper.argument_hint("nope"), None);
    }

    #[test]
    fn template_candidates_match_prefix_ignoring_case() {
        let templates = vec!["Default".to_string(), "Force Structure Planner".to_string()];
        let pairs = CommandHelper::candidates(templates.iter(), "fo");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "Force Structure Planner");
    }
}
