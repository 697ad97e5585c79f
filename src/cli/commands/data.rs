use std::path::{Path, PathBuf};

use crate::cli::core::{parse_amount, required_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::domain::DisplayScale;
use crate::errors::PlannerError;

const IMPORT_USAGE: &str = "import [file.csv]";
const EXPORT_USAGE: &str = "export <file.csv>";
const REPORT_USAGE: &str = "report <file.txt> [page height]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "total",
            "Show or set the total budget limit",
            "total [amount]",
            cmd_total,
        ),
        CommandEntry::new(
            "scale",
            "Show or set the display scale",
            "scale [standard|thousands|millions|billions|trillions]",
            cmd_scale,
        ),
        CommandEntry::new(
            "import",
            "Load a spreadsheet as the Imported Template",
            IMPORT_USAGE,
            cmd_import,
        ),
        CommandEntry::new(
            "export",
            "Write the working dataset as a spreadsheet",
            EXPORT_USAGE,
            cmd_export,
        ),
        CommandEntry::new(
            "report",
            "Write the current view as a paginated text document",
            REPORT_USAGE,
            cmd_report,
        ),
        CommandEntry::new(
            "dump",
            "Print the working dataset as JSON",
            "dump",
            cmd_dump,
        ),
    ]
}

fn cmd_total(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let session = &mut context.session;
    if let Some(raw) = args.first() {
        let requested = parse_amount(raw)?;
        let applied = session.set_total_budget_limit(requested);
        if applied != requested {
            io::print_warning(format!(
                "Total budget limit clamped to {}.",
                session.format_scaled(applied)
            ));
        }
        io::print_success(format!(
            "Total budget limit set to {}.",
            session.format_scaled(applied)
        ));
        return Ok(());
    }

    io::print_info(format!(
        "Total budget limit: {} (control range up to {})",
        session.format_scaled(session.total_budget_limit()),
        session.format_scaled(session.budget_ceiling())
    ));
    Ok(())
}

fn cmd_scale(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        output_section("Display scale");
        for scale in DisplayScale::ALL {
            let marker = if scale == context.session.display_scale() {
                "*"
            } else {
                " "
            };
            io::print_info(format!(
                "{marker} {:<10} {}",
                scale.label(),
                scale.format(scale.divisor(), 0)
            ));
        }
        return Ok(());
    };

    let scale: DisplayScale = raw.parse().map_err(CommandError::InvalidArguments)?;
    context.session.set_display_scale(scale);
    io::print_success(format!("Display scale set to {scale}."));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(raw) => PathBuf::from(raw),
        None if context.can_prompt() => {
            PathBuf::from(io::prompt_text(&context.theme, "Spreadsheet to import")?.trim())
        }
        None => return Err(CommandError::InvalidArguments(format!("usage: {IMPORT_USAGE}"))),
    };
    let outcome = context.session.import_path(&path)?;
    io::print_success(format!(
        "Imported {} group(s) from {} ({} row(s) read, {} skipped).",
        outcome.dataset.len(),
        path.display(),
        outcome.rows_read,
        outcome.rows_skipped
    ));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = output_path(context, required_arg(args, 0, EXPORT_USAGE)?);
    let rows = context.session.export_path(&path)?;
    io::print_success(format!("Exported {rows} row(s) to {}.", path.display()));
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = output_path(context, required_arg(args, 0, REPORT_USAGE)?);
    let page_height = match args.get(1) {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a line count"))
        })?,
        None => context.config.page_height,
    };
    let document = context.session.report(page_height)?;
    document.write_to(&path)?;
    io::print_success(format!(
        "Wrote {} page(s) to {}.",
        document.page_count(),
        path.display()
    ));
    Ok(())
}

fn cmd_dump(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let json =
        serde_json::to_string_pretty(context.session.dataset()).map_err(PlannerError::from)?;
    output::lines(json.lines());
    Ok(())
}

fn output_path(context: &ShellContext, raw: &str) -> PathBuf {
    context.config.resolve_output(Path::new(raw))
}
