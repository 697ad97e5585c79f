use crate::cli::core::{required_arg, rest_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::domain::{MAX_ITEMS_PER_GROUP, MIN_ITEMS_PER_GROUP};

const DELETE_USAGE: &str = "delete-group <group>";
const RENAME_USAGE: &str = "rename-group <group> <new name>";
const ITEMS_USAGE: &str = "items <group> <count>";
const TOGGLE_USAGE: &str = "toggle <group>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "new-group",
            "Append a custom group with ten empty items",
            "new-group",
            cmd_new_group,
        ),
        CommandEntry::new(
            "delete-group",
            "Remove a group and its items",
            DELETE_USAGE,
            cmd_delete_group,
        ),
        CommandEntry::new(
            "rename-group",
            "Rename a custom or imported group",
            RENAME_USAGE,
            cmd_rename_group,
        ),
        CommandEntry::new(
            "items",
            "Set how many items a custom or imported group holds (1-20)",
            ITEMS_USAGE,
            cmd_items,
        ),
        CommandEntry::new(
            "toggle",
            "Expand or collapse a group",
            TOGGLE_USAGE,
            cmd_toggle,
        ),
    ]
}

fn cmd_new_group(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let id = context.session.create_group()?;
    let name = context
        .session
        .dataset()
        .group(&id)
        .map(|group| group.name.clone())
        .unwrap_or_else(|| id.clone());
    io::print_success(format!("Created `{name}` ({id})."));
    Ok(())
}

fn cmd_delete_group(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.group_id(required_arg(args, 0, DELETE_USAGE)?)?;
    if !context.confirm(&format!("Delete group `{id}` and all of its items?"))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.delete_group(&id)?;
    io::print_success(format!("Deleted group `{id}`."));
    Ok(())
}

fn cmd_rename_group(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.group_id(required_arg(args, 0, RENAME_USAGE)?)?;
    let name = rest_arg(args, 1, RENAME_USAGE)?;
    context.session.rename_group(&id, &name)?;
    io::print_success(format!("Group `{id}` renamed to `{}`.", name.trim()));
    Ok(())
}

fn cmd_items(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.group_id(required_arg(args, 0, ITEMS_USAGE)?)?;
    let raw = required_arg(args, 1, ITEMS_USAGE)?;
    let requested: usize = raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "`{raw}` is not an item count ({MIN_ITEMS_PER_GROUP}-{MAX_ITEMS_PER_GROUP})"
        ))
    })?;
    context.session.set_num_items(&id, requested)?;
    let applied = context
        .session
        .dataset()
        .group(&id)
        .map(|group| group.visible_count())
        .unwrap_or_default();
    if applied != requested {
        io::print_warning(format!(
            "Item count must be between {MIN_ITEMS_PER_GROUP} and {MAX_ITEMS_PER_GROUP}; \
             using {applied}."
        ));
    }
    io::print_success(format!("Group `{id}` now holds {applied} item(s)."));
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.group_id(required_arg(args, 0, TOGGLE_USAGE)?)?;
    context.session.toggle_expand(&id)?;
    let expanded = context
        .session
        .dataset()
        .group(&id)
        .map(|group| group.expanded)
        .unwrap_or_default();
    io::print_info(format!(
        "Group `{id}` {}.",
        if expanded { "expanded" } else { "collapsed" }
    ));
    Ok(())
}
