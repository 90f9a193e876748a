use crate::cli::core::{
    option, parse_date, parse_month, parse_number, split_options, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::{CollectionService, RateService};
use crate::domain::{short_id, DateRange, EntryDraft, Session};
use crate::report;

const COLLECT_USAGE: &str = "collect <farmer> <morning|evening> <fat%> <liters> [YYYY-MM-DD]";
const ENTRIES_USAGE: &str =
    "entries [YYYY-MM-DD|today|YYYY-MM] [--farmer <farmer>] [--session <morning|evening>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "rate",
            "Price per liter for a fat percentage",
            "rate <fat%> [liters]",
            cmd_rate,
        ),
        CommandEntry::new(
            "collect",
            "Record a milk delivery",
            COLLECT_USAGE,
            cmd_collect,
        ),
        CommandEntry::new(
            "entries",
            "List recorded deliveries, newest first",
            ENTRIES_USAGE,
            cmd_entries,
        ),
        CommandEntry::new(
            "today",
            "Today's collection dashboard",
            "today",
            cmd_today,
        ),
    ]
}

fn cmd_rate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let fat = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: rate <fat%> [liters]".into()))?;
    let fat = parse_number(fat, "fat percentage")?;
    let policy = context.config.rate_policy;
    let currency = context.config.currency_symbol.clone();
    match args.get(1) {
        Some(quantity) => {
            let quantity = parse_number(quantity, "quantity")?;
            let quote = RateService::quote(&policy, fat, quantity);
            io::print_info(format!(
                "Fat {}% → {}{:.2}/L × {} L = {}{:.2}",
                fat, currency, quote.rate, quantity, currency, quote.amount
            ));
        }
        None => io::print_info(format!(
            "Fat {}% → {}{:.2}/L",
            fat,
            currency,
            policy.rate_for(fat)
        )),
    }
    Ok(())
}

fn cmd_collect(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (farmer_key, session, fat, quantity, date) = match args {
        [farmer, session, fat, quantity] => (*farmer, *session, *fat, *quantity, None),
        [farmer, session, fat, quantity, date] => {
            (*farmer, *session, *fat, *quantity, Some(*date))
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {}",
                COLLECT_USAGE
            )))
        }
    };
    let ctx = context.request_context()?;
    let farmer = context.resolve_farmer(&ctx, farmer_key)?;
    let session: Session = session.parse()?;
    let date = date
        .map(|raw| parse_date(raw, context.today()))
        .transpose()?;
    let draft = EntryDraft {
        farmer_id: farmer.id,
        session,
        fat_percentage: parse_number(fat, "fat percentage")?,
        quantity_liters: parse_number(quantity, "quantity")?,
        date,
    };
    let policy = context.config.rate_policy;
    let entry = CollectionService::record(&ctx, &context.storage, &policy, draft)?;
    let currency = &context.config.currency_symbol;
    io::print_success(format!(
        "Recorded {} L from {} ({} {}) at {}{:.2}/L = {}{:.2} [{}]",
        entry.quantity_liters,
        entry.farmer_name,
        entry.date.format("%d/%m/%Y"),
        entry.session,
        currency,
        entry.rate_per_liter,
        currency,
        entry.total_amount,
        short_id(entry.id)
    ));
    Ok(())
}

fn cmd_entries(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["farmer", "session"])?;
    let ctx = context.request_context()?;
    let today = context.today();
    let (range, title) = match positional.first() {
        None => (
            DateRange::single_day(today),
            format!("Entries for {}", today.format("%d/%m/%Y")),
        ),
        Some(raw) if raw.len() == 7 => {
            let period = parse_month(Some(*raw), today)?;
            (period.range(), format!("Entries for {}", period))
        }
        Some(raw) => {
            let date = parse_date(raw, today)?;
            (
                DateRange::single_day(date),
                format!("Entries for {}", date.format("%d/%m/%Y")),
            )
        }
    };
    let farmer = option(&options, "farmer")
        .map(|key| context.resolve_farmer(&ctx, key))
        .transpose()?;
    let session = option(&options, "session")
        .map(str::parse::<Session>)
        .transpose()?;
    let entries = CollectionService::list(
        &ctx,
        &context.storage,
        Some(range),
        farmer.as_ref().map(|f| f.id),
        session,
    )?;
    let head = context.letterhead(&ctx);
    io::print_block(&report::render_entry_table(&head, &title, &entries));
    Ok(())
}

fn cmd_today(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ctx = context.request_context()?;
    let clock = context.clock();
    let summary = CollectionService::today_summary(&ctx, &context.storage, clock.as_ref())?;
    let head = context.letterhead(&ctx);
    output_section("Today's collection");
    io::print_block(&report::render_daily_summary(&head, &summary));
    Ok(())
}
