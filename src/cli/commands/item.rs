use crate::cli::core::{
    parse_amount, required_arg, rest_arg, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::domain::ItemKey;
use crate::money::{format_currency, format_quantity};

const BUDGET_USAGE: &str = "budget <group> <item> <amount>";
const SLIDE_USAGE: &str = "slide <group> <item> <value in display units>";
const QUANTITY_USAGE: &str = "quantity <group> <item> <value>";
const COST_USAGE: &str = "cost <group> <item> <value>";
const ADD_USAGE: &str = "add-item <group> <name>";
const DELETE_USAGE: &str = "delete-item <group> <item>";
const RENAME_USAGE: &str = "rename-item <group> <item> <new name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "budget",
            "Set an item's budget; quantity follows",
            BUDGET_USAGE,
            cmd_budget,
        ),
        CommandEntry::new(
            "slide",
            "Set an item's budget in the current display scale",
            SLIDE_USAGE,
            cmd_slide,
        ),
        CommandEntry::new(
            "quantity",
            "Set an item's quantity; budget follows",
            QUANTITY_USAGE,
            cmd_quantity,
        ),
        CommandEntry::new(
            "cost",
            "Set an item's unit cost; budget follows",
            COST_USAGE,
            cmd_cost,
        ),
        CommandEntry::new("add-item", "Add an item to a group", ADD_USAGE, cmd_add_item),
        CommandEntry::new(
            "delete-item",
            "Remove an item from a group",
            DELETE_USAGE,
            cmd_delete_item,
        ),
        CommandEntry::new(
            "rename-item",
            "Rename an item of a custom or imported group",
            RENAME_USAGE,
            cmd_rename_item,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, key) = target(context, args, BUDGET_USAGE)?;
    let amount = parse_amount(required_arg(args, 2, BUDGET_USAGE)?)?;
    context.session.set_budget(&group, &key, amount)?;
    print_item(context, &group, &key);
    Ok(())
}

fn cmd_slide(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, key) = target(context, args, SLIDE_USAGE)?;
    let scaled = parse_amount(required_arg(args, 2, SLIDE_USAGE)?)?;
    context.session.set_budget_scaled(&group, &key, scaled)?;
    print_item(context, &group, &key);
    Ok(())
}

fn cmd_quantity(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, key) = target(context, args, QUANTITY_USAGE)?;
    let raw = required_arg(args, 2, QUANTITY_USAGE)?;
    context.session.set_quantity(&group, &key, raw)?;
    print_item(context, &group, &key);
    Ok(())
}

fn cmd_cost(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, key) = target(context, args, COST_USAGE)?;
    let raw = required_arg(args, 2, COST_USAGE)?;
    context.session.set_unit_cost(&group, &key, raw)?;
    print_item(context, &group, &key);
    Ok(())
}

fn cmd_add_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let group = context.group_id(required_arg(args, 0, ADD_USAGE)?)?;
    let name = rest_arg(args, 1, ADD_USAGE)?;
    let key = context.session.add_item(&group, &name)?;
    io::print_success(format!("Added `{}` to `{group}`.", name.trim()));
    print_item(context, &group, &key);
    Ok(())
}

fn cmd_delete_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, key) = target(context, args, DELETE_USAGE)?;
    let name = item_name(context, &group, &key);
    if !context.confirm(&format!("Delete `{name}`?"))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.delete_item(&group, &key)?;
    io::print_success(format!("Deleted `{name}` from `{group}`."));
    Ok(())
}

fn cmd_rename_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group, key) = target(context, args, RENAME_USAGE)?;
    let name = rest_arg(args, 2, RENAME_USAGE)?;
    let previous = item_name(context, &group, &key);
    context.session.rename_item(&group, &key, &name)?;
    io::print_success(format!("Renamed `{previous}` to `{}`.", name.trim()));
    Ok(())
}

fn target(
    context: &ShellContext,
    args: &[&str],
    usage: &str,
) -> Result<(String, ItemKey), CommandError> {
    let group = required_arg(args, 0, usage)?;
    let item = required_arg(args, 1, usage)?;
    context.item_ref(group, item)
}

fn item_name(context: &ShellContext, group: &str, key: &ItemKey) -> String {
    context
        .session
        .dataset()
        .group(group)
        .and_then(|g| g.item(key))
        .map(|item| item.name.clone())
        .unwrap_or_else(|| key.to_string())
}

fn print_item(context: &ShellContext, group: &str, key: &ItemKey) {
    let session = &context.session;
    if let Some(item) = session.dataset().group(group).and_then(|g| g.item(key)) {
        io::print_info(format!(
            "  {}: {} x {} = {} ({})",
            item.name,
            format_quantity(item.quantity),
            format_currency(item.unit_cost),
            format_currency(item.budget),
            session.format_scaled(item.budget)
        ));
    }
}
