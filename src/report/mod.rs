//! Printable plain-text documents: monthly statements and entry listings.

pub mod table;

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use tracing::info;

use crate::core::errors::Result;
use crate::domain::{CollectionEntry, DairyCenter, DailySummary, FarmerTotals, MonthlyStatement, PeriodSummary};

use table::{Table, TableColumn};

/// Page header and currency used when rendering.
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub title: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub currency_symbol: String,
}

impl Letterhead {
    pub fn new(title: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            address: None,
            phone: None,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn for_center(center: &DairyCenter, currency_symbol: impl Into<String>) -> Self {
        Self {
            title: center.name.clone(),
            address: center.address.clone(),
            phone: center.phone.clone(),
            currency_symbol: currency_symbol.into(),
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        if let Some(address) = &self.address {
            lines.push(address.clone());
        }
        if let Some(phone) = &self.phone {
            lines.push(format!("Phone: {}", phone));
        }
        lines
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

/// Full monthly statement for one farmer.
pub fn render_statement(head: &Letterhead, statement: &MonthlyStatement) -> String {
    let mut out = head.lines();
    out.push(String::new());
    out.push("MONTHLY MILK STATEMENT".into());
    out.push(format!("Farmer: {}", statement.farmer_name));
    if let Some(phone) = &statement.phone {
        out.push(format!("Phone: {}", phone));
    }
    out.push(format!("Period: {}", statement.period_label()));
    out.push(String::new());
    out.push(entry_table(head, &statement.entries, false));
    out.push(String::new());
    out.push(format!("Total Quantity: {:.1} L", statement.total_quantity));
    out.push(format!("Average Fat:    {:.2}%", statement.average_fat));
    out.push(format!("Total Amount:   {}", head.money(statement.total_amount)));
    out.join("\n") + "\n"
}

/// Entry listing with a totals line, including the farmer column.
pub fn render_entry_table(head: &Letterhead, title: &str, entries: &[CollectionEntry]) -> String {
    let mut out = head.lines();
    out.push(String::new());
    out.push(title.to_string());
    out.push(String::new());
    if entries.is_empty() {
        out.push("No entries.".into());
    } else {
        out.push(entry_table(head, entries, true));
        let quantity: f64 = entries.iter().map(|e| e.quantity_liters).sum();
        let amount: f64 = entries.iter().map(|e| e.total_amount).sum();
        out.push(String::new());
        out.push(format!(
            "{} entries, {:.1} L, {}",
            entries.len(),
            quantity,
            head.money(amount)
        ));
    }
    out.join("\n") + "\n"
}

/// Dashboard block for one day.
pub fn render_daily_summary(head: &Letterhead, summary: &DailySummary) -> String {
    [
        format!("Date:      {}", summary.date.format("%d/%m/%Y")),
        format!("Total:     {:.1} L", summary.total_quantity),
        format!("Amount:    {}", head.money(summary.total_amount)),
        format!("Morning:   {:.1} L", summary.morning_quantity),
        format!("Evening:   {:.1} L", summary.evening_quantity),
        format!("Farmers:   {}", summary.farmers_count),
        format!("Entries:   {}", summary.entry_count),
    ]
    .join("\n")
}

/// Month report: header cards, a per-farmer table and one row per collection day.
pub fn render_period_report(
    head: &Letterhead,
    summary: &PeriodSummary,
    farmers: &[FarmerTotals],
    days: &[DailySummary],
) -> String {
    let mut out = vec![
        format!("Report: {}", summary.period),
        format!("Total Quantity:  {:.1} L", summary.total_quantity),
        format!("Total Amount:    {}", head.money(summary.total_amount)),
        format!("Farmers:         {}", summary.unique_farmers),
        format!("Entries:         {}", summary.entry_count),
    ];
    if !farmers.is_empty() {
        let mut table = Table::new(vec![
            TableColumn::left("Farmer").max(24),
            TableColumn::right("Entries"),
            TableColumn::right("Qty (L)"),
            TableColumn::right("Avg Fat"),
            TableColumn::right("Amount"),
        ]);
        for totals in farmers {
            table.push_row(vec![
                totals.farmer_name.clone(),
                totals.entry_count.to_string(),
                format!("{:.1}", totals.total_quantity),
                format!("{:.2}%", totals.average_fat),
                head.money(totals.total_amount),
            ]);
        }
        out.push(String::new());
        out.push(table.render());
    }
    if !days.is_empty() {
        let mut table = Table::new(vec![
            TableColumn::left("Date"),
            TableColumn::right("Morning"),
            TableColumn::right("Evening"),
            TableColumn::right("Qty (L)"),
            TableColumn::right("Farmers"),
            TableColumn::right("Amount"),
        ]);
        for day in days {
            table.push_row(vec![
                day.date.format("%d/%m/%Y").to_string(),
                format!("{:.1}", day.morning_quantity),
                format!("{:.1}", day.evening_quantity),
                format!("{:.1}", day.total_quantity),
                day.farmers_count.to_string(),
                head.money(day.total_amount),
            ]);
        }
        out.push(String::new());
        out.push(table.render());
    }
    out.join("\n")
}

/// Writes `text` to `path`, creating parent directories.
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    info!(path = %path.display(), "document written");
    Ok(())
}

fn entry_table(head: &Letterhead, entries: &[CollectionEntry], with_farmer: bool) -> String {
    let mut columns = vec![TableColumn::left("Date"), TableColumn::left("Session")];
    if with_farmer {
        columns.push(TableColumn::left("Farmer").max(24));
    }
    columns.extend([
        TableColumn::right("Fat %"),
        TableColumn::right("Qty (L)"),
        TableColumn::right("Rate"),
        TableColumn::right("Amount"),
    ]);
    let mut table = Table::new(columns);
    for entry in entries {
        let mut row = vec![
            entry.date.format("%d/%m/%Y").to_string(),
            entry.session.label().to_string(),
        ];
        if with_farmer {
            row.push(entry.farmer_name.clone());
        }
        row.extend([
            format!("{:.1}", entry.fat_percentage),
            format!("{:.1}", entry.quantity_liters),
            format!("{:.2}", entry.rate_per_liter),
            head.money(entry.total_amount),
        ]);
        table.push_row(row);
    }
    table.render()
}
