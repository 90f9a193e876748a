use std::path::PathBuf;

use crate::cli::core::{option, parse_month, split_options, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::context::RequestContext;
use crate::core::services::{CollectionService, SummaryService};
use crate::core::utils::PathResolver;
use crate::domain::{short_id, CollectionEntry, MonthPeriod, MonthlyStatement};
use crate::report;

const STATEMENT_USAGE: &str = "statement <farmer|all> [YYYY-MM] [--out <path>]";
const MESSAGE_USAGE: &str = "message [receipt <entry-id>|statement <farmer> [YYYY-MM]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "report",
            "Month totals for the whole center",
            "report [YYYY-MM]",
            cmd_report,
        ),
        CommandEntry::new(
            "statement",
            "Print or save a farmer's monthly statement",
            STATEMENT_USAGE,
            cmd_statement,
        ),
        CommandEntry::new(
            "message",
            "Compose a receipt or statement message with a WhatsApp link",
            MESSAGE_USAGE,
            cmd_message,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    let period = parse_month(args.first().copied(), context.today())?;
    let summary = CollectionService::month_summary(&ctx, &context.storage, period)?;
    let entries = CollectionService::entries_for_month(&ctx, &context.storage, period)?;
    let farmers = SummaryService::farmer_totals(&entries);
    let days = SummaryService::daily_breakdown(period, &entries);
    let head = context.letterhead(&ctx);
    output_section(format!("{} report", period));
    io::print_block(&report::render_period_report(&head, &summary, &farmers, &days));
    Ok(())
}

fn cmd_statement(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["out"])?;
    let key = positional
        .first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", STATEMENT_USAGE)))?;
    let ctx = context.request_context()?;
    let period = parse_month(positional.get(1).copied(), context.today())?;
    if key.eq_ignore_ascii_case("all") {
        return statements_for_all(context, &ctx, period, option(&options, "out"));
    }
    let farmer = context.resolve_farmer(&ctx, key)?;
    let Some(statement) =
        CollectionService::statement(&ctx, &context.storage, &context.storage, farmer.id, period)?
    else {
        io::print_info(format!(
            "No entries for {} in {}.",
            farmer.name, period
        ));
        return Ok(());
    };
    let head = context.letterhead(&ctx);
    let document = report::render_statement(&head, &statement);
    match option(&options, "out") {
        Some(path) => {
            let path = PathBuf::from(path);
            report::write_document(&path, &document)?;
            io::print_success(format!("Statement saved to {}.", path.display()));
        }
        None => {
            io::print_block(&document);
            let default = PathResolver::exports_dir_in(context.config_manager.base_dir())
                .join(statement_file_name(&statement));
            io::print_hint(format!(
                "Use `--out {}` to save a printable copy.",
                default.display()
            ));
        }
    }
    Ok(())
}

/// Every farmer's statement; `out` is a directory when given.
fn statements_for_all(
    context: &ShellContext,
    ctx: &RequestContext,
    period: MonthPeriod,
    out: Option<&str>,
) -> CommandResult {
    let statements =
        CollectionService::statements(ctx, &context.storage, &context.storage, period)?;
    if statements.is_empty() {
        io::print_info(format!("No entries in {}.", period));
        return Ok(());
    }
    let head = context.letterhead(ctx);
    match out {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            for statement in &statements {
                let path = dir.join(statement_file_name(statement));
                report::write_document(&path, &report::render_statement(&head, statement))?;
            }
            io::print_success(format!(
                "{} statements saved to {}.",
                statements.len(),
                dir.display()
            ));
        }
        None => {
            for statement in &statements {
                io::print_block(&report::render_statement(&head, statement));
            }
        }
    }
    Ok(())
}

fn cmd_message(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    let notifier = context.notifier();
    let sub = args.first().map(|s| s.to_lowercase());
    let (text, phone) = match sub.as_deref() {
        Some("receipt") => {
            let key = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments("usage: message receipt <entry-id>".into())
            })?;
            let entry = find_entry(
                &CollectionService::list(&ctx, &context.storage, None, None, None)?,
                key,
            )?;
            let phone = context
                .resolve_farmer(&ctx, &entry.farmer_id.to_string())
                .ok()
                .and_then(|farmer| farmer.phone);
            (notifier.entry_receipt(&entry), phone)
        }
        Some("statement") => {
            let key = args.get(1).ok_or_else(|| {
                CommandError::InvalidArguments(format!("usage: {}", MESSAGE_USAGE))
            })?;
            let period = parse_month(args.get(2).copied(), context.today())?;
            let farmer = context.resolve_farmer(&ctx, key)?;
            let statement = CollectionService::statement(
                &ctx,
                &context.storage,
                &context.storage,
                farmer.id,
                period,
            )?
            .ok_or_else(|| {
                CommandError::Message(format!("No entries for {} in {}.", farmer.name, period))
            })?;
            let phone = statement.phone.clone();
            (notifier.statement_message(&statement), phone)
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {}",
                MESSAGE_USAGE
            )))
        }
    };
    io::print_block(&text);
    match phone {
        Some(phone) => io::print_info(format!("Send: {}", notifier.link(&phone, &text)?)),
        None => io::print_warning("Farmer has no phone number; no link generated."),
    }
    Ok(())
}

/// Entry by full id or short id prefix.
fn find_entry(entries: &[CollectionEntry], key: &str) -> Result<CollectionEntry, CommandError> {
    let key = key.trim().to_lowercase();
    let mut matches = entries
        .iter()
        .filter(|entry| entry.id.to_string() == key || short_id(entry.id).starts_with(&key));
    match (matches.next(), matches.next()) {
        (Some(entry), None) if !key.is_empty() => Ok(entry.clone()),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "`{}` matches several entries",
            key
        ))),
        _ => Err(CommandError::InvalidArguments(format!(
            "entry `{}` not found",
            key
        ))),
    }
}

fn statement_file_name(statement: &MonthlyStatement) -> String {
    let slug: String = statement
        .farmer_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!(
        "statement_{}_{:04}-{:02}.txt",
        slug.trim_matches('-'),
        statement.year,
        statement.month
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Session;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn entry() -> CollectionEntry {
        CollectionEntry {
            id: Uuid::new_v4(),
            dairy_center_id: Uuid::nil(),
            farmer_id: Uuid::nil(),
            farmer_name: "Ram".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            session: Session::Morning,
            fat_percentage: 4.0,
            quantity_liters: 1.0,
            rate_per_liter: 35.0,
            total_amount: 35.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn entries_are_found_by_short_id() {
        let entries = vec![entry(), entry()];
        let target = &entries[1];
        let found = find_entry(&entries, &short_id(target.id)).unwrap();
        assert_eq!(found.id, target.id);
        assert!(find_entry(&entries, "").is_err());
        assert!(find_entry(&entries, "zzzz").is_err());
    }

    #[test]
    fn statement_file_names_are_slugged() {
        let statement = MonthlyStatement {
            farmer_id: Uuid::nil(),
            farmer_name: "Ram Prasad".into(),
            phone: None,
            month: 3,
            year: 2024,
            entries: vec![],
            total_quantity: 0.0,
            total_amount: 0.0,
            average_fat: 0.0,
        };
        assert_eq!(
            statement_file_name(&statement),
            "statement_ram-prasad_2024-03.txt"
        );
    }
}
