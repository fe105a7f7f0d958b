//! Evaluation facade: fetch the record snapshot, aggregate, delegate.

use chrono::{DateTime, NaiveDate, Utc};

use frms_core::aggregate::{aggregate, CumulativeTotals};
use frms_core::long_haul::{self, LongHaulNextDuty, LongHaulScenario};
use frms_core::models::LimitType;
use frms_core::short_haul::{self, ShortHaulNextDuty};

use crate::error::EngineError;
use crate::provider::{DutyRecordProvider, FleetCatalog};

/// Ties a duty-record provider and fleet catalog to the pure calculators.
///
/// Holds no mutable state; every evaluation works on the snapshot fetched
/// for that call, so concurrent use needs no synchronization.
pub struct FrmsEngine<P> {
    provider: P,
    catalog: FleetCatalog,
}

impl<P: DutyRecordProvider> FrmsEngine<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            catalog: FleetCatalog::builtin(),
        }
    }

    pub fn with_catalog(provider: P, catalog: FleetCatalog) -> Self {
        Self { provider, catalog }
    }

    pub fn catalog(&self) -> &FleetCatalog {
        &self.catalog
    }

    /// Rolling cumulative totals for a pilot as of a home-base calendar day.
    pub async fn cumulative_totals(
        &self,
        pilot_id: &str,
        fleet_id: &str,
        as_of: NaiveDate,
    ) -> Result<CumulativeTotals, EngineError> {
        let config = self.catalog.get(fleet_id)?;
        let records = self
            .provider
            .duty_records(pilot_id, fleet_id)
            .await
            .map_err(EngineError::Provider)?;
        tracing::debug!(
            pilot = %pilot_id,
            fleet = %fleet_id,
            records = records.len(),
            %as_of,
            "aggregating duty records"
        );

        let totals = aggregate(&records, as_of, config);
        if totals.excluded_records > 0 {
            tracing::warn!(
                pilot = %pilot_id,
                excluded = totals.excluded_records,
                "records excluded for unparseable dates"
            );
        }
        Ok(totals)
    }

    /// Next-duty limits for a short-haul fleet, with restriction overlays.
    pub async fn short_haul_next_duty(
        &self,
        pilot_id: &str,
        fleet_id: &str,
        as_of: NaiveDate,
        earliest_sign_on: DateTime<Utc>,
        limit: LimitType,
    ) -> Result<ShortHaulNextDuty, EngineError> {
        let config = self.catalog.get(fleet_id)?;
        let records = self
            .provider
            .duty_records(pilot_id, fleet_id)
            .await
            .map_err(EngineError::Provider)?;
        let totals = aggregate(&records, as_of, config);
        let result = short_haul::next_duty(&records, &totals, earliest_sign_on, limit, config)?;
        tracing::debug!(
            pilot = %pilot_id,
            window = result.window,
            restrictions = result.restrictions.len(),
            "short-haul next-duty limits evaluated"
        );
        Ok(result)
    }

    /// Next-duty limits for a long-haul fleet under a scenario selection.
    pub async fn long_haul_next_duty(
        &self,
        pilot_id: &str,
        fleet_id: &str,
        as_of: NaiveDate,
        scenario: &LongHaulScenario,
    ) -> Result<LongHaulNextDuty, EngineError> {
        let config = self.catalog.get(fleet_id)?;
        let records = self
            .provider
            .duty_records(pilot_id, fleet_id)
            .await
            .map_err(EngineError::Provider)?;
        let totals = aggregate(&records, as_of, config);
        let result = long_haul::next_duty(config, Some(&totals), scenario)?;
        tracing::debug!(
            pilot = %pilot_id,
            rows = result.rows.len(),
            "long-haul next-duty limits evaluated"
        );
        Ok(result)
    }
}
