use uuid::Uuid;

use crate::cli::core::{option, split_options, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::context::RequestContext;
use crate::core::services::AdminService;
use crate::domain::{short_id, CenterInput, DairyCenter, Role, UserProfile};
use crate::report::table::{Table, TableColumn};

const CENTER_USAGE: &str =
    "center [show|list|add <name> [--address a] [--phone p]|edit <center> [--name n] [--address a] [--phone p]|remove <center>]";
const USER_USAGE: &str = "user [list|role <email> <super_admin|dairy_director|none>|assign <email> <center|none>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "center",
            "Show or administer dairy centers",
            CENTER_USAGE,
            cmd_center,
        ),
        CommandEntry::new(
            "user",
            "Administer user roles and center assignments",
            USER_USAGE,
            cmd_user,
        ),
    ]
}

fn cmd_center(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    let sub = args.first().map(|s| s.to_lowercase());
    match sub.as_deref() {
        None | Some("show") => {
            let center = AdminService::current_center(&ctx, &context.storage)?;
            print_center(&center);
            Ok(())
        }
        Some("list") => {
            let centers = AdminService::list_centers(&ctx, &context.storage)?;
            if centers.is_empty() {
                io::print_info("No dairy centers yet. Use `center add <name>`.");
                return Ok(());
            }
            let mut table = Table::new(vec![
                TableColumn::left("Id"),
                TableColumn::left("Name").max(30),
                TableColumn::left("Phone"),
            ]);
            for center in &centers {
                table.push_row(vec![
                    short_id(center.id),
                    center.name.clone(),
                    center.phone.clone().unwrap_or_default(),
                ]);
            }
            output_section("Dairy centers");
            io::print_block(&table.render());
            Ok(())
        }
        Some("add") => {
            let (positional, options) = split_options(&args[1..], &["address", "phone"])?;
            if positional.is_empty() {
                return Err(CommandError::InvalidArguments(format!("usage: {}", CENTER_USAGE)));
            }
            let input = CenterInput {
                name: positional.join(" "),
                address: option(&options, "address").map(str::to_string),
                phone: option(&options, "phone").map(str::to_string),
            };
            let center = AdminService::add_center(&ctx, &context.storage, input)?;
            io::print_success(format!(
                "Dairy center `{}` created ({}).",
                center.name,
                short_id(center.id)
            ));
            Ok(())
        }
        Some("edit") => {
            let (positional, options) =
                split_options(&args[1..], &["name", "address", "phone"])?;
            let key = positional.first().ok_or_else(|| {
                CommandError::InvalidArguments(format!("usage: {}", CENTER_USAGE))
            })?;
            let center = find_center(&ctx, context, key)?;
            let input = CenterInput {
                name: option(&options, "name")
                    .map(str::to_string)
                    .unwrap_or(center.name),
                address: option(&options, "address")
                    .map(str::to_string)
                    .or(center.address),
                phone: option(&options, "phone").map(str::to_string).or(center.phone),
            };
            let updated = AdminService::edit_center(&ctx, &context.storage, center.id, input)?;
            io::print_success(format!("Dairy center `{}` updated.", updated.name));
            Ok(())
        }
        Some("remove") => {
            let key = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: center remove <center>".into())
            })?;
            let center = find_center(&ctx, context, key)?;
            if !context.confirm(&format!("Remove dairy center `{}`?", center.name))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            AdminService::remove_center(&ctx, &context.storage, center.id)?;
            io::print_success(format!("Dairy center `{}` removed.", center.name));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown center action `{}`; usage: {}",
            other, CENTER_USAGE
        ))),
    }
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    let sub = args.first().map(|s| s.to_lowercase());
    match sub.as_deref() {
        None | Some("list") => {
            let users = AdminService::list_users(&ctx, &context.storage)?;
            let centers = AdminService::list_centers(&ctx, &context.storage)?;
            let mut table = Table::new(vec![
                TableColumn::left("Email").max(32),
                TableColumn::left("Role"),
                TableColumn::left("Center").max(24),
            ]);
            for user in &users {
                let center = user
                    .dairy_center_id
                    .and_then(|id| centers.iter().find(|c| c.id == id))
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "-".into());
                table.push_row(vec![user.email.clone(), user.role.to_string(), center]);
            }
            output_section("Users");
            io::print_block(&table.render());
            Ok(())
        }
        Some("role") => {
            let (email, role) = match args {
                [_, email, role] => (*email, *role),
                _ => {
                    return Err(CommandError::InvalidArguments(
                        "usage: user role <email> <super_admin|dairy_director|none>".into(),
                    ))
                }
            };
            let role: Role = role.parse()?;
            let user = find_user(&ctx, context, email)?;
            let updated = AdminService::assign_role(&ctx, &context.storage, user.id, role)?;
            io::print_success(format!("{} is now {}.", updated.email, updated.role));
            Ok(())
        }
        Some("assign") => {
            let (email, center_key) = match args {
                [_, email, center] => (*email, *center),
                _ => {
                    return Err(CommandError::InvalidArguments(
                        "usage: user assign <email> <center|none>".into(),
                    ))
                }
            };
            let user = find_user(&ctx, context, email)?;
            let center = if center_key.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(find_center(&ctx, context, center_key)?)
            };
            let updated = AdminService::assign_center(
                &ctx,
                &context.storage,
                user.id,
                center.as_ref().map(|c| c.id),
            )?;
            match center {
                Some(center) => io::print_success(format!(
                    "{} assigned to `{}`.",
                    updated.email, center.name
                )),
                None => io::print_success(format!("{} unassigned.", updated.email)),
            }
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown user action `{}`; usage: {}",
            other, USER_USAGE
        ))),
    }
}

fn print_center(center: &DairyCenter) {
    output_section(&center.name);
    io::print_info(format!("Id     : {}", center.id));
    if let Some(address) = &center.address {
        io::print_info(format!("Address: {}", address));
    }
    if let Some(phone) = &center.phone {
        io::print_info(format!("Phone  : {}", phone));
    }
}

/// Center by full id, short id or case-insensitive name.
fn find_center(
    ctx: &RequestContext,
    context: &ShellContext,
    key: &str,
) -> Result<DairyCenter, CommandError> {
    let centers = AdminService::list_centers(ctx, &context.storage)?;
    let lowered = key.to_lowercase();
    let parsed = Uuid::parse_str(key).ok();
    centers
        .into_iter()
        .find(|center| {
            Some(center.id) == parsed
                || short_id(center.id) == lowered
                || center.name.to_lowercase() == lowered
        })
        .ok_or_else(|| CommandError::InvalidArguments(format!("dairy center `{}` not found", key)))
}

fn find_user(
    ctx: &RequestContext,
    context: &ShellContext,
    email: &str,
) -> Result<UserProfile, CommandError> {
    let needle = email.trim().to_lowercase();
    AdminService::list_users(ctx, &context.storage)?
        .into_iter()
        .find(|user| user.email == needle)
        .ok_or_else(|| CommandError::InvalidArguments(format!("user `{}` not found", email)))
}
