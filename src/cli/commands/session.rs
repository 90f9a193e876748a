use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::AdminService;
use crate::storage::CenterDirectory;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Sign in by email (new addresses are registered)",
            "login <email> [full name]",
            cmd_login,
        ),
        CommandEntry::new("logout", "Sign out", "logout", cmd_logout),
        CommandEntry::new(
            "whoami",
            "Show the signed-in user, role and dairy center",
            "whoami",
            cmd_whoami,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let email = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: login <email> [full name]".into()))?;
    let full_name = if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        None
    };
    let profile = AdminService::sign_in(&context.storage, email, full_name)?;
    context.config.last_user = Some(profile.email.clone());
    context.persist_config()?;
    io::print_success(format!("Signed in as {} ({}).", profile.email, profile.role));
    if profile.dairy_center_id.is_none() && !profile.role.is_super_admin() {
        io::print_warning("No dairy center assigned");
    }
    context.user = Some(profile);
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.user.take().is_none() {
        io::print_info("Not signed in.");
        return Ok(());
    }
    context.config.last_user = None;
    context.persist_config()?;
    io::print_success("Signed out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let profile = context.current_user()?;
    io::print_info(format!("Email : {}", profile.email));
    if let Some(name) = &profile.full_name {
        io::print_info(format!("Name  : {}", name));
    }
    io::print_info(format!("Role  : {}", profile.role));
    let center = match profile.dairy_center_id {
        Some(id) => context
            .storage
            .center(id)?
            .map(|center| center.name)
            .unwrap_or_else(|| id.to_string()),
        None => "none".to_string(),
    };
    io::print_info(format!("Center: {}", center));
    Ok(())
}
