use std::collections::HashMap;
use std::fmt;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Heading a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTopic {
    Templates,
    Viewing,
    Items,
    Groups,
    Data,
    Shell,
}

impl CommandTopic {
    pub const ALL: [CommandTopic; 6] = [
        CommandTopic::Templates,
        CommandTopic::Viewing,
        CommandTopic::Items,
        CommandTopic::Groups,
        CommandTopic::Data,
        CommandTopic::Shell,
    ];
}

impl fmt::Display for CommandTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CommandTopic::Templates => "Templates",
            CommandTopic::Viewing => "Viewing",
            CommandTopic::Items => "Line items",
            CommandTopic::Groups => "Groups",
            CommandTopic::Data => "Budget & files",
            CommandTopic::Shell => "Shell",
        };
        f.write_str(label)
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub aliases: &'static [&'static str],
    pub topic: CommandTopic,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            aliases: &[],
            topic: CommandTopic::Shell,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Commands in registration order, addressable by name or alias (case-insensitive).
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every entry under `topic`.
    /// A later entry with a taken name replaces the earlier one.
    pub fn register_topic(&mut self, topic: CommandTopic, entries: Vec<CommandEntry>) {
        for mut entry in entries {
            entry.topic = topic;
            self.register(entry);
        }
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let index = match self.lookup.get(entry.name) {
            Some(&index) => {
                self.entries[index] = entry;
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        let entry = &self.entries[index];
        for key in std::iter::once(&entry.name).chain(entry.aliases) {
            self.lookup.insert(key.to_lowercase(), index);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup
            .get(&name.to_lowercase())
            .map(|&index| &self.entries[index])
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn by_topic(&self, topic: CommandTopic) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter().filter(move |entry| entry.topic == topic)
    }

    /// Names and aliases, for completion and suggestions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| std::iter::once(entry.name).chain(entry.aliases.iter().copied()))
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}
