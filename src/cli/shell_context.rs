use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    domain::UserProfile,
    storage::JsonStorage,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub storage: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Signed-in operator; reloaded from storage before each use.
    pub user: Option<UserProfile>,
    pub last_command: Option<String>,
    pub running: bool,
}

