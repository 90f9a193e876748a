use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::CliMode;
use crate::config::Config;

const USAGE: &str = "config [show|set <key> <value>|backup [note]|backups|restore <name>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences and the rate policy",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context.config());
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context
                .config
                .set_field(&key, &value)
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            context.persist_config()?;
            if key == "ui_color_enabled" {
                output::set_color_enabled(
                    context.mode == CliMode::Interactive && context.config.ui_color_enabled,
                );
            }
            io::print_success(format!("`{}` updated.", key));
            Ok(())
        }
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())
                .map_err(|err| CommandError::Core(err.into()))?;
            io::print_success(format!("Configuration backed up as `{}`.", name));
            Ok(())
        }
        "backups" => {
            let names = context
                .config_manager
                .list_backups()
                .map_err(|err| CommandError::Core(err.into()))?;
            if names.is_empty() {
                io::print_info("No configuration backups yet.");
            }
            for name in names {
                io::print_info(format!("  {}", name));
            }
            Ok(())
        }
        "restore" => {
            let name = args
                .get(1)
                .ok_or_else(|| CommandError::InvalidArguments("usage: config restore <name>".into()))?;
            context.config = context
                .config_manager
                .restore(name)
                .map_err(|err| CommandError::Core(err.into()))?;
            io::print_success(format!("Configuration restored from `{}`.", name));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {}", USAGE))),
    }
}

fn show_config(config: &Config) {
    let policy = &config.rate_policy;
    output_section("Configuration");
    io::print_info(format!("  locale           : {}", config.locale));
    io::print_info(format!("  currency_symbol  : {}", config.currency_symbol));
    io::print_info(format!("  center_label     : {}", config.center_label));
    io::print_info(format!("  country_code     : {}", config.country_code));
    io::print_info(format!("  ui_color_enabled : {}", config.ui_color_enabled));
    io::print_info(format!("  base_fat         : {}", policy.base_fat));
    io::print_info(format!("  base_rate        : {}", policy.base_rate));
    io::print_info(format!("  rate_increase    : {}", policy.rate_increase));
    io::print_info(format!("  fat_step         : {}", policy.fat_step));
}
