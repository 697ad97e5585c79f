pub mod config;
pub mod data;
pub mod group;
pub mod item;
pub mod system;
pub mod template;
pub mod view;

use crate::cli::registry::{CommandRegistry, CommandTopic};

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_topic(CommandTopic::Templates, template::definitions());
    registry.register_topic(CommandTopic::Viewing, view::definitions());
    registry.register_topic(CommandTopic::Items, item::definitions());
    registry.register_topic(CommandTopic::Groups, group::definitions());
    registry.register_topic(CommandTopic::Data, data::definitions());
    registry.register_topic(CommandTopic::Data, config::definitions());
    registry.register_topic(CommandTopic::Shell, system::definitions());
}
