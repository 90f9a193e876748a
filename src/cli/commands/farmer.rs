use crate::cli::core::{option, split_options, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::FarmerService;
use crate::domain::{short_id, Farmer, FarmerInput};
use crate::report::table::{Table, TableColumn};

const USAGE: &str = "farmer [list [search]|show <farmer>|add <name> [--phone p] [--village v]|edit <farmer> [--name n] [--phone p] [--village v]|remove <farmer>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "farmer",
        "Register and manage the farmers of your center",
        USAGE,
        cmd_farmer,
    )]
}

fn cmd_farmer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    let sub = args.first().map(|s| s.to_lowercase());
    match sub.as_deref() {
        None | Some("list") => {
            let needle = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
            let farmers = FarmerService::search(&ctx, &context.storage, &needle)?;
            print_farmers(&farmers);
            Ok(())
        }
        Some("show") => {
            let key = required(args, 1)?;
            let farmer = context.resolve_farmer(&ctx, key)?;
            output_section(&farmer.name);
            io::print_info(format!("Id     : {}", farmer.id));
            io::print_info(format!("Phone  : {}", farmer.phone.as_deref().unwrap_or("-")));
            io::print_info(format!(
                "Village: {}",
                farmer.village.as_deref().unwrap_or("-")
            ));
            io::print_info(format!(
                "Since  : {}",
                farmer.created_at.format("%d/%m/%Y")
            ));
            Ok(())
        }
        Some("add") => {
            let (positional, options) = split_options(&args[1..], &["phone", "village"])?;
            if positional.is_empty() {
                return Err(CommandError::InvalidArguments(format!("usage: {}", USAGE)));
            }
            let input = FarmerInput {
                name: positional.join(" "),
                phone: option(&options, "phone").map(str::to_string),
                village: option(&options, "village").map(str::to_string),
            };
            let farmer = FarmerService::add(&ctx, &context.storage, input)?;
            io::print_success(format!(
                "Farmer `{}` added ({}).",
                farmer.name,
                short_id(farmer.id)
            ));
            Ok(())
        }
        Some("edit") => {
            let (positional, options) =
                split_options(&args[1..], &["name", "phone", "village"])?;
            let key = positional
                .first()
                .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", USAGE)))?;
            let farmer = context.resolve_farmer(&ctx, key)?;
            let input = FarmerInput {
                name: option(&options, "name")
                    .map(str::to_string)
                    .unwrap_or(farmer.name),
                phone: option(&options, "phone").map(str::to_string).or(farmer.phone),
                village: option(&options, "village")
                    .map(str::to_string)
                    .or(farmer.village),
            };
            let updated = FarmerService::edit(&ctx, &context.storage, farmer.id, input)?;
            io::print_success(format!("Farmer `{}` updated.", updated.name));
            Ok(())
        }
        Some("remove") => {
            let key = required(args, 1)?;
            let farmer = context.resolve_farmer(&ctx, key)?;
            if !context.confirm(&format!(
                "Remove farmer `{}`? Past entries are kept.",
                farmer.name
            ))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            FarmerService::remove(&ctx, &context.storage, farmer.id)?;
            io::print_success(format!("Farmer `{}` removed.", farmer.name));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown farmer action `{}`; usage: {}",
            other, USAGE
        ))),
    }
}

fn required<'a>(args: &[&'a str], index: usize) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", USAGE)))
}

fn print_farmers(farmers: &[Farmer]) {
    if farmers.is_empty() {
        io::print_info("No farmers found. Use `farmer add <name>`.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Name").max(28),
        TableColumn::left("Phone"),
        TableColumn::left("Village").max(20),
    ]);
    for farmer in farmers {
        table.push_row(vec![
            short_id(farmer.id),
            farmer.name.clone(),
            farmer.phone.clone().unwrap_or_default(),
            farmer.village.clone().unwrap_or_default(),
        ]);
    }
    output_section(format!("Farmers ({})", farmers.len()));
    io::print_block(&table.render());
}
