//! Receipt and statement messages handed to the farmer's messaging app.
//!
//! Nothing is sent from here: the output is plain text plus a `wa.me` deep
//! link the operator opens on their device.

use crate::config::Config;
use crate::core::errors::{DairyError, Result};
use crate::domain::{CollectionEntry, MonthlyStatement, Session};

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Formats outgoing messages with the business details from [`Config`].
#[derive(Debug, Clone)]
pub struct Notifier {
    center_label: String,
    currency_symbol: String,
    country_code: String,
}

impl Notifier {
    pub fn new(
        center_label: impl Into<String>,
        currency_symbol: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            center_label: center_label.into(),
            currency_symbol: currency_symbol.into(),
            country_code: country_code.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.center_label.clone(),
            config.currency_symbol.clone(),
            config.country_code.clone(),
        )
    }

    /// Receipt for a single delivery.
    pub fn entry_receipt(&self, entry: &CollectionEntry) -> String {
        let session = match entry.session {
            Session::Morning => "🌅 Morning",
            Session::Evening => "🌙 Evening",
        };
        format!(
            "🥛 Milk Collection Receipt\n\n\
             Dear {name},\n\n\
             Date: {date}\n\
             Session: {session}\n\n\
             Fat: {fat}%\n\
             Quantity: {qty} L\n\
             Rate: {cur}{rate}/L\n\
             Total: {cur}{total:.2}\n\n\
             Thank you for your supply!\n\
             - {label}",
            name = entry.farmer_name,
            date = entry.date.format("%d/%m/%Y"),
            session = session,
            fat = entry.fat_percentage,
            qty = entry.quantity_liters,
            rate = entry.rate_per_liter,
            total = entry.total_amount,
            cur = self.currency_symbol,
            label = self.center_label,
        )
    }

    /// Monthly summary for a farmer.
    pub fn statement_message(&self, statement: &MonthlyStatement) -> String {
        format!(
            "📊 Monthly Milk Statement\n\n\
             Dear {name},\n\n\
             Month: {period}\n\n\
             Summary:\n\
             • Total Quantity: {qty:.1} L\n\
             • Average Fat: {fat:.2}%\n\
             • Total Amount: {cur}{amount:.2}\n\n\
             Thank you for your continued supply!\n\
             - {label}",
            name = statement.farmer_name,
            period = statement.period_label(),
            qty = statement.total_quantity,
            fat = statement.average_fat,
            amount = statement.total_amount,
            cur = self.currency_symbol,
            label = self.center_label,
        )
    }

    pub fn link(&self, phone: &str, text: &str) -> Result<String> {
        whatsapp_link(phone, &self.country_code, text)
    }
}

/// Builds a `wa.me` deep link with `text` prefilled.
///
/// Formatting characters in `phone` are ignored. A number that already carries
/// the country code (or a trunk `0`) is not prefixed twice.
pub fn whatsapp_link(phone: &str, country_code: &str, text: &str) -> Result<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let code: String = country_code.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(DairyError::InvalidInput(format!(
            "`{}` is not a phone number",
            phone
        )));
    }
    let international = if phone.trim_start().starts_with('+') {
        digits
    } else {
        let local = digits.trim_start_matches('0');
        format!("{}{}", code, local)
    };
    Ok(format!(
        "{}{}?text={}",
        WHATSAPP_BASE,
        international,
        urlencoding::encode(text)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn entry() -> CollectionEntry {
        CollectionEntry {
            id: Uuid::new_v4(),
            dairy_center_id: Uuid::new_v4(),
            farmer_id: Uuid::new_v4(),
            farmer_name: "Ramesh".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            session: Session::Evening,
            fat_percentage: 4.5,
            quantity_liters: 10.0,
            rate_per_liter: 40.0,
            total_amount: 400.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn receipt_lists_delivery_details() {
        let notifier = Notifier::from_config(&Config::default());
        let text = notifier.entry_receipt(&entry());
        assert!(text.starts_with("🥛 Milk Collection Receipt"));
        assert!(text.contains("Dear Ramesh,"));
        assert!(text.contains("Date: 07/03/2024"));
        assert!(text.contains("Session: 🌙 Evening"));
        assert!(text.contains("Fat: 4.5%"));
        assert!(text.contains("Quantity: 10 L"));
        assert!(text.contains("Rate: ₹40/L"));
        assert!(text.contains("Total: ₹400.00"));
        assert!(text.ends_with("- Milk Center"));
    }

    #[test]
    fn statement_message_rounds_figures() {
        let notifier = Notifier::new("Surendra Milk Center", "₹", "91");
        let statement = MonthlyStatement {
            farmer_id: Uuid::new_v4(),
            farmer_name: "Gopal".into(),
            phone: None,
            month: 3,
            year: 2024,
            entries: vec![entry()],
            total_quantity: 10.0,
            total_amount: 350.0,
            average_fat: 4.0,
        };
        let text = notifier.statement_message(&statement);
        assert!(text.contains("Month: March 2024"));
        assert!(text.contains("• Total Quantity: 10.0 L"));
        assert!(text.contains("• Average Fat: 4.00%"));
        assert!(text.contains("• Total Amount: ₹350.00"));
        assert!(text.ends_with("- Surendra Milk Center"));
    }

    #[test]
    fn link_prefixes_country_code_and_encodes_text() {
        let link = whatsapp_link("98765 43210", "91", "Total: ₹400 & more").unwrap();
        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(link.ends_with("Total%3A%20%E2%82%B9400%20%26%20more"));
    }

    #[test]
    fn link_keeps_international_numbers() {
        let link = whatsapp_link("+44 7700 900123", "91", "hi").unwrap();
        assert_eq!(link, "https://wa.me/447700900123?text=hi");
        let trunk = whatsapp_link("09876543210", "91", "hi").unwrap();
        assert_eq!(trunk, "https://wa.me/919876543210?text=hi");
    }

    #[test]
    fn link_requires_digits() {
        assert!(whatsapp_link("n/a", "91", "hi").is_err());
    }
}
