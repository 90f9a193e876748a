use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "backup [create [note]|list|restore <name>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backup",
        "Snapshot or restore the data store",
        USAGE,
        cmd_backup,
    )]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    ctx.require_super_admin()?;
    let sub = args.first().map(|s| s.to_lowercase());
    match sub.as_deref() {
        None | Some("list") => {
            let backups = context.storage.list_backups()?;
            if backups.is_empty() {
                io::print_info("No backups yet.");
            }
            for backup in backups {
                let stamp = backup
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown time".into());
                io::print_info(format!("  {}  ({})", backup.id, stamp));
            }
            Ok(())
        }
        Some("create") => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let backup = context.storage.backup(note.as_deref())?;
            io::print_success(format!("Backup `{}` written.", backup.id));
            Ok(())
        }
        Some("restore") => {
            let name = args
                .get(1)
                .ok_or_else(|| CommandError::InvalidArguments("usage: backup restore <name>".into()))?;
            if !context.confirm(&format!("Replace current data with `{}`?", name))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.storage.restore(name)?;
            io::print_success(format!("Data restored from `{}`.", name));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown backup action `{}`; usage: {}",
            other, USAGE
        ))),
    }
}
