use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::domain::Group;
use crate::money::{format_currency, format_quantity};
use crate::report::{chart, Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "show",
            "Show groups and their items",
            "show [group]",
            cmd_show,
        ),
        CommandEntry::new(
            "summary",
            "Show the budget limit, allocation, and group subtotals",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "chart",
            "Draw the allocation chart",
            "chart [pie|bar]",
            cmd_chart,
        ),
    ]
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let session = &context.session;
    if let Some(input) = args.first() {
        let id = context.group_id(input)?;
        let group = session.resolve_group(&id)?;
        print_group(context, group, true);
        return Ok(());
    }

    if session.dataset().is_empty() {
        io::print_info("The working dataset has no groups. Use `new-group` or `import`.");
        return Ok(());
    }
    for group in session.dataset().groups() {
        print_group(context, group, group.expanded);
    }
    Ok(())
}

fn print_group(context: &ShellContext, group: &Group, expanded: bool) {
    let session = &context.session;
    output_section(format!(
        "{} ({})",
        group.name,
        session.format_scaled(group.subtotal())
    ));
    if !expanded {
        io::print_info(format!(
            "  {} item(s) collapsed; `toggle {}` to expand.",
            group.items.len(),
            group.id
        ));
        return;
    }

    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Item").max_width(40),
        TableColumn::right("Quantity"),
        TableColumn::right("Unit Cost"),
        TableColumn::right("Budget"),
        TableColumn::right("Range"),
    ])
    .plain(output::preferences().plain);
    for (idx, (_, item)) in group.visible_items().enumerate() {
        table.push_row(vec![
            (idx + 1).to_string(),
            item.name.clone(),
            format_quantity(item.quantity),
            format_currency(item.unit_cost),
            format_currency(item.budget),
            format!(
                "{} - {}",
                session.format_scaled(item.min),
                session.format_scaled(item.max)
            ),
        ]);
    }
    output::lines(table.render_lines());
    let hidden = group.hidden_count();
    if hidden > 0 {
        io::print_hint(format!(
            "{hidden} more item(s) hidden; `items {} <count>` shows more.",
            group.id
        ));
    }
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.session;
    let summary = session.summary();

    output_section(format!("Summary: {}", session.template_name()));
    io::print_info(format!(
        "  Total budget limit : {}",
        session.format_scaled(summary.total_budget_limit)
    ));
    io::print_info(format!(
        "  Allocated          : {}",
        session.format_scaled(summary.allocated)
    ));
    io::print_info(format!(
        "  Remaining          : {}",
        session.format_scaled(summary.remaining_display())
    ));
    if summary.is_over_budget() {
        io::print_warning(format!(
            "Over budget by {}",
            session.format_scaled(-summary.remaining)
        ));
    }

    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Group").max_width(40),
        TableColumn::left("Id"),
        TableColumn::right("Subtotal"),
    ])
    .plain(output::preferences().plain);
    for (idx, group) in summary.groups.iter().enumerate() {
        table.push_row(vec![
            (idx + 1).to_string(),
            group.name.clone(),
            group.id.clone(),
            session.format_scaled(group.subtotal),
        ]);
    }
    output::blank_line();
    output::lines(table.render_lines());
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let session = &context.session;
    let summary = session.summary();
    let width = io::terminal_width();
    let plain = output::preferences().plain;
    let scale = session.display_scale();

    match args.first().map(|kind| kind.to_ascii_lowercase()).as_deref() {
        None | Some("pie") => {
            let series = SummaryService::pie_series(&summary);
            output_section("Allocation by group");
            output::lines(chart::bar_lines(&series, scale, width, plain));
            output::blank_line();
            output::lines(chart::share_lines(&series, scale));
        }
        Some("bar") => {
            let series = SummaryService::bar_series(&summary);
            output_section("Group subtotals");
            if series.is_empty() {
                io::print_info("No groups to chart.");
            } else {
                output::lines(chart::bar_lines(&series, scale, width, plain));
            }
        }
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown chart `{other}`; expected `pie` or `bar`"
            )))
        }
    }
    Ok(())
}
