use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry, CommandTopic};

pub fn print_overview(registry: &CommandRegistry) {
    for topic in CommandTopic::ALL {
        let mut entries = registry.by_topic(topic).peekable();
        if entries.peek().is_none() {
            continue;
        }
        output_section(topic);
        for entry in entries {
            io::print_info(format!("  {:<14} {}", entry.name, entry.description));
        }
    }
    output::blank_line();
    io::print_hint("`help <command>` shows usage.");
    io::print_hint("Groups and items take an id, a name, or a 1-based position.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(entry.name);
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  usage: {}", entry.usage));
    if !entry.aliases.is_empty() {
        io::print_info(format!("  aliases: {}", entry.aliases.join(", ")));
    }
}
