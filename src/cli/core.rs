//! Shell context, dispatch, and the error types shared by every command.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::config::{Config, ConfigManager};
use crate::core::Session;
use crate::domain::ItemKey;
use crate::errors::{ImportError, PlannerError};
use crate::money::parse_decimal;

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that end the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] PlannerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

/// Per-command failures; reported and the shell keeps running.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] PlannerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
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

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub session: Session,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });

        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                cli_io::print_warning(format!("{err}; using default settings."));
                Config::default()
            }
        };

        let mut session = Session::new();
        session.set_display_scale(config.scale);
        if let Err(err) = session.select_template(&config.default_template) {
            tracing::warn!(
                template = %config.default_template,
                error = %err,
                "configured template unavailable"
            );
        }

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            session,
            config_manager,
            config,
            running: true,
        })
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        format!("budget [{}]> ", self.session.template_key())
    }

    /// `(name, usage)` for every command and alias, for completion hints.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .flat_map(|entry| {
                std::iter::once(entry.name)
                    .chain(entry.aliases.iter().copied())
                    .map(move |name| (name, entry.usage))
            })
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            let outcome = handler(self, args);
            self.flush_warning();
            match outcome {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    fn flush_warning(&mut self) {
        if let Some(warning) = self.session.take_warning() {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let lowered = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &lowered), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{best}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Asks before a destructive step; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match &err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(PlannerError::GroupNotFound(id)) => {
                cli_io::print_error(format!("Group not found: {id}"));
                cli_io::print_hint("Use `summary` to list the groups of the current template.");
                Ok(())
            }
            CommandError::Core(PlannerError::Import(ImportError::MissingColumns { .. })) => {
                cli_io::print_error(err.to_string());
                cli_io::print_hint(
                    "The first row needs 'Group' (or 'Section') and 'Item' headers.",
                );
                Ok(())
            }
            CommandError::Core(PlannerError::NotEditable(_)) => {
                cli_io::print_error(err.to_string());
                cli_io::print_hint("Only custom and imported groups can be renamed or resized.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    /// Maps a group argument to its id: a 1-based position, an id, or a name.
    pub(crate) fn group_id(&self, input: &str) -> Result<String, CommandError> {
        let dataset = self.session.dataset();
        if let Ok(position) = input.trim().parse::<usize>() {
            if let Some(group) = position.checked_sub(1).and_then(|idx| dataset.groups().nth(idx)) {
                return Ok(group.id.clone());
            }
        }
        Ok(self.session.resolve_group(input)?.id.clone())
    }

    pub(crate) fn item_ref(
        &self,
        group: &str,
        item: &str,
    ) -> Result<(String, ItemKey), CommandError> {
        let id = self.group_id(group)?;
        Ok(self.session.resolve_item(&id, item)?)
    }

    pub(crate) fn save_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}

/// Extracts `args[idx]` or fails with the command's usage line.
pub(crate) fn required_arg<'a>(
    args: &[&'a str],
    idx: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(idx)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}

/// Joins the remaining arguments into one name, e.g. an unquoted multi-word item name.
pub(crate) fn rest_arg(args: &[&str], from: usize, usage: &str) -> Result<String, CommandError> {
    let joined = args.get(from..).map(|rest| rest.join(" ")).unwrap_or_default();
    if joined.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(joined)
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, CommandError> {
    parse_decimal(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a number")))
}

#[cfg(test)]
pub(crate) fn process_script(
    config_manager: ConfigManager,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_config_manager(CliMode::Script, config_manager)?;
    for line in lines {
        match crate::cli::shell::handle_line(&mut app, line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayScale;
    use tempfile::TempDir;

    fn script(lines: &[&str]) -> (ShellContext, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let context = process_script(manager, lines).expect("script runs");
        (context, dir)
    }

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("add-item 2 \"Night vision goggles\"").unwrap();
        assert_eq!(tokens, vec!["add-item", "2", "Night vision goggles"]);
    }

    #[test]
    fn script_selects_template_and_edits_quantity() {
        let (context, _dir) = script(&[
            "use Force Structure Planner",
            "quantity 1 \"Arash 2 drones\" 20",
        ]);
        let session = &context.session;
        assert_eq!(session.template_key(), "Force Structure Planner");
        let (group, key) = session
            .resolve_item("offensive_missile_forces", "Arash 2 drones")
            .expect("item");
        let item = session
            .dataset()
            .group(&group)
            .and_then(|g| g.item(&key))
            .expect("item");
        assert_eq!(item.budget, Decimal::from(2_000_000));
    }

    #[test]
    fn errors_do_not_stop_the_script() {
        let (context, _dir) = script(&[
            "use Custom Template-Small",
            "budget missing 1 100",
            "rename-group custom_group_1 Supplies",
        ]);
        assert_eq!(
            context.session.dataset().group("custom_group_1").map(|g| g.name.as_str()),
            Some("Supplies")
        );
    }

    #[test]
    fn exit_stops_processing() {
        let (context, _dir) = script(&["use Custom Template-Small", "exit", "new-group"]);
        assert_eq!(context.session.dataset().len(), 1);
    }

    #[test]
    fn config_scale_applies_at_start() {
        let dir = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let mut config = Config::default();
        config.set("scale", "millions").expect("scale");
        manager.save(&config).expect("save");

        let context = ShellContext::with_config_manager(CliMode::Script, manager).expect("context");
        assert_eq!(context.session.display_scale(), DisplayScale::Millions);
    }

    #[test]
    fn group_positions_are_one_based() {
        let (context, _dir) = script(&["use Force Structure Planner"]);
        assert_eq!(
            context.group_id("1").expect("group"),
            "offensive_missile_forces"
        );
        assert!(context.group_id("0").is_err());
    }
}
