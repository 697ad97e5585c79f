use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "List commands or describe one", "help [command]", cmd_help)
            .with_aliases(&["h"]),
        CommandEntry::new("exit", "Leave the planner", "exit", cmd_exit).with_aliases(&["quit"]),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = build_info::current();
    output_section(format!("budget_planner {build}"));
    let rows = [
        ("built", build.timestamp.to_string()),
        ("target", format!("{} [{}]", build.target, build.profile)),
        ("compiler", build.rustc.to_string()),
        ("templates", context.session.catalog().len().to_string()),
    ];
    for (label, value) in rows {
        io::print_info(format!("  {label:<10} {value}"));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        help::print_overview(&context.registry);
        return Ok(());
    };
    match context.command(name) {
        Some(entry) => help::print_command(entry),
        None => context.suggest_command(name),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
