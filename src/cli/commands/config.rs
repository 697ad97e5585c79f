use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage saved preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 2 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set_config_value(context, &key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; expected `show` or `set`"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  default_template : {}", config.default_template));
    io::print_info(format!("  scale            : {}", config.scale));
    io::print_info(format!("  page_height      : {}", config.page_height));
    io::print_info(format!(
        "  export_dir       : {}",
        config
            .export_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "(current directory)".into())
    ));
    io::print_info(format!("  file             : {}", context.config_manager.path().display()));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    if key == "default_template" {
        // Store the canonical key so later start-ups resolve it exactly.
        let template = context.session.catalog().lookup(value)?;
        let canonical = template.key.clone();
        context.config.set(key, &canonical)?;
    } else {
        context.config.set(key, value)?;
    }
    if key == "scale" {
        context.session.set_display_scale(context.config.scale);
    }
    context.save_config()?;
    io::print_success(format!("Saved `{key}`."));
    Ok(())
}
