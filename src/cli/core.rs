//! Shell context construction, dispatch and the helpers shared by commands.

use std::io;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tracing::debug;

use crate::{
    config::{Config, ConfigManager},
    core::context::RequestContext,
    core::errors::DairyError,
    core::services::{FarmerService, ServiceError},
    core::time::{Clock, SystemClock},
    core::utils::PathResolver,
    domain::{Farmer, MonthPeriod, UserProfile},
    notify::Notifier,
    report::Letterhead,
    storage::{CenterDirectory, JsonStorage},
};

pub use crate::core::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_clock(mode, Arc::new(SystemClock))
    }

    pub fn with_clock(mode: CliMode, clock: Arc<dyn Clock>) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(PathResolver::base_dir())?;
        let config = config_manager.load()?;
        output::set_color_enabled(mode == CliMode::Interactive && config.ui_color_enabled);

        let storage = JsonStorage::with_clock(config_manager.base_dir(), None, clock)?;

        let mut context = Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            storage,
            config_manager,
            config,
            user: None,
            last_command: None,
            running: true,
        };
        context.restore_last_user()?;
        Ok(context)
    }

    fn restore_last_user(&mut self) -> Result<(), CliError> {
        let Some(email) = self.config.last_user.clone() else {
            return Ok(());
        };
        if let Some(profile) = self.storage.user_by_email(&email)? {
            debug!(user = %profile.email, "restored previous session");
            self.user = Some(profile);
        }
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.user {
            Some(user) => format!("dairy({})> ", user.email),
            None => "dairy> ".to_string(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn clock(&self) -> Arc<dyn Clock> {
        self.storage.clock()
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock().today()
    }

    /// Signed-in profile, refreshed so role and center changes apply at once.
    pub(crate) fn current_user(&mut self) -> Result<UserProfile, CommandError> {
        let id = self.user.as_ref().map(|user| user.id).ok_or(CommandError::NotLoggedIn)?;
        let profile = self
            .storage
            .user(id)?
            .ok_or_else(|| DairyError::UserNotFound(id.to_string()))?;
        self.user = Some(profile.clone());
        Ok(profile)
    }

    pub(crate) fn request_context(&mut self) -> Result<RequestContext, CommandError> {
        Ok(RequestContext::for_user(&self.current_user()?))
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(|err| CommandError::Core(err.into()))
    }

    pub(crate) fn notifier(&self) -> Notifier {
        Notifier::from_config(&self.config)
    }

    /// Page header for printed documents, from the caller's center when known.
    pub(crate) fn letterhead(&self, ctx: &RequestContext) -> Letterhead {
        let center = ctx
            .dairy_center_id
            .and_then(|id| self.storage.center(id).ok().flatten());
        match center {
            Some(center) => Letterhead::for_center(&center, self.config.currency_symbol.clone()),
            None => Letterhead::new(
                self.config.center_label.clone(),
                self.config.currency_symbol.clone(),
            ),
        }
    }

    pub(crate) fn resolve_farmer(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Result<Farmer, CommandError> {
        Ok(FarmerService::resolve(ctx, &self.storage, key)?)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_command(self.registry.names(), input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Prints a failed command. Never stops the loop.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotLoggedIn => {
                cli_io::print_error("Not logged in.");
                cli_io::print_hint("Use `login <email>` first.");
                Ok(())
            }
            CommandError::Core(DairyError::NoDairyCenter) => {
                cli_io::print_error("No dairy center assigned");
                cli_io::print_hint("Ask a super admin to run `user assign <email> <center>`.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    /// Asks before a destructive step; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }
}

fn closest_command<'a>(names: impl Iterator<Item = &'a str>, input: &str) -> Option<&'a str> {
    let input = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &input), name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

/// `YYYY-MM-DD`, `today` or `yesterday`.
pub(crate) fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    match input.to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
        }),
    }
}

/// `YYYY-MM`, or the month containing `today` when absent.
pub(crate) fn parse_month(input: Option<&str>, today: NaiveDate) -> Result<MonthPeriod, CommandError> {
    let Some(raw) = input else {
        return Ok(MonthPeriod::containing(today));
    };
    let invalid =
        || CommandError::InvalidArguments(format!("invalid month `{}` (use YYYY-MM)", raw));
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    MonthPeriod::new(year, month).map_err(|_| invalid())
}

pub(crate) fn parse_number(input: &str, what: &str) -> Result<f64, CommandError> {
    input
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid {} `{}`", what, input)))
}

/// Splits `--flag value` pairs out of `args`; the rest stays positional.
pub(crate) fn split_options<'a>(
    args: &[&'a str],
    flags: &[&str],
) -> Result<(Vec<&'a str>, Vec<(String, &'a str)>), CommandError> {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--") {
            if !flags.contains(&name) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    arg
                )));
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("option `{}` needs a value", arg))
            })?;
            options.push((name.to_string(), *value));
        } else {
            positional.push(*arg);
        }
    }
    Ok((positional, options))
}

pub(crate) fn option<'a>(options: &[(String, &'a str)], name: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| *value)
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Not logged in. Use `login <email>` first.")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] DairyError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn suggestions_need_a_close_match() {
        let names = ["collect", "entries", "statement"];
        assert_eq!(closest_command(names.iter().copied(), "colect"), Some("collect"));
        assert_eq!(closest_command(names.iter().copied(), "STATMENT"), Some("statement"));
        assert_eq!(closest_command(names.iter().copied(), "xyzzyplugh"), None);
    }

    #[test]
    fn dates_accept_keywords() {
        assert_eq!(parse_date("today", june(10)).unwrap(), june(10));
        assert_eq!(parse_date("yesterday", june(1)).unwrap(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(parse_date("2024-06-03", june(10)).unwrap(), june(3));
        assert!(parse_date("03/06/2024", june(10)).is_err());
    }

    #[test]
    fn months_default_to_current() {
        assert_eq!(parse_month(None, june(10)).unwrap(), MonthPeriod::new(2024, 6).unwrap());
        assert_eq!(
            parse_month(Some("2023-12"), june(10)).unwrap(),
            MonthPeriod::new(2023, 12).unwrap()
        );
        assert!(parse_month(Some("2023-13"), june(10)).is_err());
        assert!(parse_month(Some("december"), june(10)).is_err());
    }

    #[test]
    fn options_are_split_from_positionals() {
        let args = ["2024-06", "--farmer", "Ravi", "--session", "am"];
        let (positional, options) = split_options(&args, &["farmer", "session"]).unwrap();
        assert_eq!(positional, vec!["2024-06"]);
        assert_eq!(option(&options, "farmer"), Some("Ravi"));
        assert_eq!(option(&options, "session"), Some("am"));
        assert!(split_options(&["--nope", "x"], &["farmer"]).is_err());
        assert!(split_options(&["--farmer"], &["farmer"]).is_err());
    }
}
