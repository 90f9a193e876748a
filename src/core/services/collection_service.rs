//! Recording and querying milk deliveries for the caller's dairy center.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::context::RequestContext;
use crate::core::services::{RatePolicy, RateService, ServiceError, ServiceResult};
use crate::core::services::{StatementService, SummaryService};
use crate::core::time::Clock;
use crate::domain::{
    CollectionEntry, DailySummary, DateRange, EntryDraft, EntryFilter, MonthPeriod,
    MonthlyStatement, NewEntry, PeriodSummary, Session,
};
use crate::storage::{EntrySink, EntrySource, FarmerDirectory};

/// Highest fat percentage accepted at the collection counter.
pub const MAX_FAT_PERCENTAGE: f64 = 15.0;

/// Largest single delivery accepted, in liters.
pub const MAX_QUANTITY_LITERS: f64 = 10_000.0;

pub struct CollectionService;

impl CollectionService {
    /// Rejects drafts that cannot describe a real delivery.
    pub fn validate(draft: &EntryDraft) -> ServiceResult<()> {
        if !draft.fat_percentage.is_finite()
            || draft.fat_percentage < 0.0
            || draft.fat_percentage > MAX_FAT_PERCENTAGE
        {
            return Err(ServiceError::Invalid(format!(
                "Fat percentage must be between 0 and {}",
                MAX_FAT_PERCENTAGE
            )));
        }
        if !draft.quantity_liters.is_finite() || draft.quantity_liters <= 0.0 {
            return Err(ServiceError::Invalid(
                "Quantity must be greater than zero".into(),
            ));
        }
        if draft.quantity_liters > MAX_QUANTITY_LITERS {
            return Err(ServiceError::Invalid(format!(
                "Quantity must not exceed {} liters",
                MAX_QUANTITY_LITERS
            )));
        }
        Ok(())
    }

    /// Prices `draft` with `policy` and stores it under the caller's center.
    ///
    /// The rate is frozen into the stored entry.
    pub fn record(
        ctx: &RequestContext,
        sink: &dyn EntrySink,
        policy: &RatePolicy,
        draft: EntryDraft,
    ) -> ServiceResult<CollectionEntry> {
        let dairy_center_id = ctx.require_center()?;
        if let Err(err) = Self::validate(&draft) {
            warn!(error = %err, "collection entry rejected");
            return Err(err);
        }
        let quote = RateService::quote(policy, draft.fat_percentage, draft.quantity_liters);
        if !quote.rate.is_finite() || !quote.amount.is_finite() {
            warn!(rate = quote.rate, amount = quote.amount, "collection entry not priceable");
            return Err(ServiceError::Invalid(
                "Rate policy produced an unusable price for this delivery".into(),
            ));
        }
        let entry = sink.create_entry(NewEntry {
            dairy_center_id,
            farmer_id: draft.farmer_id,
            session: draft.session,
            fat_percentage: draft.fat_percentage,
            quantity_liters: draft.quantity_liters,
            rate: quote.rate,
            amount: quote.amount,
            date: draft.date,
        })?;
        info!(
            farmer = %entry.farmer_id,
            session = %entry.session,
            amount = entry.total_amount,
            "milk collection recorded"
        );
        Ok(entry)
    }

    /// Entries of the caller's center, newest first.
    pub fn list(
        ctx: &RequestContext,
        source: &dyn EntrySource,
        date_range: Option<DateRange>,
        farmer_id: Option<Uuid>,
        session: Option<Session>,
    ) -> ServiceResult<Vec<CollectionEntry>> {
        let mut filter = EntryFilter::for_center(ctx.require_center()?);
        if let Some(range) = date_range {
            filter = filter.with_range(range);
        }
        if let Some(farmer_id) = farmer_id {
            filter = filter.with_farmer(farmer_id);
        }
        if let Some(session) = session {
            filter = filter.with_session(session);
        }
        Ok(source.list_entries(&filter)?)
    }

    pub fn entries_for_day(
        ctx: &RequestContext,
        source: &dyn EntrySource,
        date: NaiveDate,
    ) -> ServiceResult<Vec<CollectionEntry>> {
        Self::list(ctx, source, Some(DateRange::single_day(date)), None, None)
    }

    pub fn entries_for_month(
        ctx: &RequestContext,
        source: &dyn EntrySource,
        period: MonthPeriod,
    ) -> ServiceResult<Vec<CollectionEntry>> {
        Self::list(ctx, source, Some(period.range()), None, None)
    }

    /// Dashboard figures for the clock's current day.
    pub fn today_summary(
        ctx: &RequestContext,
        source: &dyn EntrySource,
        clock: &dyn Clock,
    ) -> ServiceResult<DailySummary> {
        let today = clock.today();
        let entries = Self::entries_for_day(ctx, source, today)?;
        Ok(SummaryService::daily_summary(today, &entries))
    }

    pub fn month_summary(
        ctx: &RequestContext,
        source: &dyn EntrySource,
        period: MonthPeriod,
    ) -> ServiceResult<PeriodSummary> {
        let entries = Self::entries_for_month(ctx, source, period)?;
        Ok(SummaryService::period_summary(period, &entries))
    }

    /// Statement for one farmer of the caller's center.
    ///
    /// `Ok(None)` when the farmer has no deliveries in `period`.
    pub fn statement(
        ctx: &RequestContext,
        farmers: &dyn FarmerDirectory,
        source: &dyn EntrySource,
        farmer_id: Uuid,
        period: MonthPeriod,
    ) -> ServiceResult<Option<MonthlyStatement>> {
        let dairy_center_id = ctx.require_center()?;
        let farmer = farmers
            .farmer(farmer_id)?
            .filter(|farmer| farmer.dairy_center_id == dairy_center_id)
            .ok_or_else(|| ServiceError::Invalid("Farmer not found".into()))?;
        let entries = Self::list(ctx, source, Some(period.range()), Some(farmer_id), None)?;
        Ok(StatementService::build_statement(&farmer, period, &entries))
    }

    /// Statements for every farmer of the caller's center with deliveries in `period`.
    pub fn statements(
        ctx: &RequestContext,
        farmers: &dyn FarmerDirectory,
        source: &dyn EntrySource,
        period: MonthPeriod,
    ) -> ServiceResult<Vec<MonthlyStatement>> {
        let dairy_center_id = ctx.require_center()?;
        let roster = farmers.list_farmers(dairy_center_id)?;
        let entries = Self::entries_for_month(ctx, source, period)?;
        Ok(StatementService::build_all(&roster, period, &entries))
    }
}
