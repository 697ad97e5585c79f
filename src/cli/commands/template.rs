use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::money::format_currency;
use crate::report::{Table, TableColumn};
use crate::templates::IMPORTED_TEMPLATE_KEY;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "templates",
            "List the available templates",
            "templates",
            cmd_templates,
        ),
        CommandEntry::new(
            "use",
            "Replace the working dataset with a template",
            "use [template]",
            cmd_use,
        ),
    ]
}

fn cmd_templates(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.session;
    let mut table = Table::new(vec![
        TableColumn::left(""),
        TableColumn::left("Template"),
        TableColumn::right("Budget limit"),
        TableColumn::left("Scale"),
    ])
    .plain(output::preferences().plain);

    let marker = |key: &str| {
        if key == session.template_key() {
            "*".to_string()
        } else {
            String::new()
        }
    };
    for template in session.catalog().iter() {
        table.push_row(vec![
            marker(&template.key),
            template.key.clone(),
            format_currency(template.total_budget_limit),
            template.scale.to_string(),
        ]);
    }
    table.push_row(vec![
        marker(IMPORTED_TEMPLATE_KEY),
        IMPORTED_TEMPLATE_KEY.to_string(),
        "-".to_string(),
        "large".to_string(),
    ]);

    output_section("Templates");
    output::lines(table.render_lines());
    Ok(())
}

fn cmd_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = if args.is_empty() {
        if !context.can_prompt() {
            return Err(CommandError::InvalidArguments("usage: use <template>".into()));
        }
        let mut keys: Vec<String> = context.session.catalog().keys().map(str::to_string).collect();
        keys.push(IMPORTED_TEMPLATE_KEY.to_string());
        let current = keys
            .iter()
            .position(|key| key == context.session.template_key())
            .unwrap_or(0);
        match io::select_item(&context.theme, "Select template", &keys, current)? {
            Some(idx) => keys[idx].clone(),
            None => {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
        }
    } else {
        args.join(" ")
    };

    context.session.select_template(&key)?;
    let session = &context.session;
    io::print_success(format!(
        "Template `{}` selected: {} group(s), budget limit {}.",
        session.template_name(),
        session.dataset().len(),
        session.format_scaled(session.total_budget_limit())
    ));
    Ok(())
}
