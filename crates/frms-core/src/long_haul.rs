//! Next-duty limit calculator, long-haul path.
//!
//! Filters the fleet's limit-row table by crew complement, rest-facility
//! class, and (for two-pilot planning) the selected sign-on window, then
//! resolves ceilings for the active limit type. Also supplies the
//! expected-duty-hours bands consumed by the rest calculator.

use serde::{Deserialize, Serialize};

use crate::aggregate::CumulativeTotals;
use crate::error::FrmsError;
use crate::models::{CrewComplement, LimitType, RestFacilityClass};
use crate::rest::{expected_duty_bands, DutyBand};
use crate::rules::{valid_rest_facilities, FleetCategory, FleetConfig, LongHaulLimitRow};

/// Immutable scenario selection passed in by the caller; the engine never
/// holds selection state itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongHaulScenario {
    pub crew: CrewComplement,
    pub limit: LimitType,
    pub facility: RestFacilityClass,
    /// Sign-on window label filter; applied for two-pilot planning.
    #[serde(default)]
    pub sign_on_window: Option<String>,
    /// Operating duty when true, deadheading when false.
    pub operating: bool,
}

/// A limit-table row resolved for the active limit type.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLimitRow {
    pub sign_on_window: Option<&'static str>,
    pub duty_hours: f64,
    /// `None` when the note replaces the numeric flight-time display.
    pub flight_time_hours: Option<f64>,
    pub max_sectors: Option<u32>,
    pub note: Option<&'static str>,
    pub extended_variant: bool,
}

/// Limits, duty bands, and advisories for the next long-haul duty.
#[derive(Debug, Clone, Serialize)]
pub struct LongHaulNextDuty {
    pub crew: CrewComplement,
    pub limit: LimitType,
    pub facility: RestFacilityClass,
    pub rows: Vec<ResolvedLimitRow>,
    /// Expected-duty-hours bands for the rest requirement calculator.
    pub duty_bands: Vec<DutyBand>,
    /// Cumulative-total-derived advisories.
    pub restrictions: Vec<String>,
}

/// Evaluate the next-duty limits for a long-haul fleet.
pub fn next_duty(
    config: &FleetConfig,
    totals: Option<&CumulativeTotals>,
    scenario: &LongHaulScenario,
) -> Result<LongHaulNextDuty, FrmsError> {
    let rules = config
        .long_haul_rules()
        .ok_or_else(|| FrmsError::CategoryMismatch {
            fleet_id: config.fleet_id.clone(),
            expected: FleetCategory::LongHaul,
        })?;

    if !valid_rest_facilities(scenario.crew, scenario.limit).contains(&scenario.facility) {
        return Err(FrmsError::InvalidRestFacility {
            crew: scenario.crew,
            facility: scenario.facility,
            limit: scenario.limit,
        });
    }

    let rows = rules
        .rows
        .iter()
        .filter(|row| row_applies(row, scenario))
        .map(|row| resolve_row(row, scenario.limit))
        .collect();

    Ok(LongHaulNextDuty {
        crew: scenario.crew,
        limit: scenario.limit,
        facility: scenario.facility,
        rows,
        duty_bands: expected_duty_bands(scenario.crew, scenario.limit, scenario.operating),
        restrictions: totals.map(CumulativeTotals::restriction_notes).unwrap_or_default(),
    })
}

fn row_applies(row: &LongHaulLimitRow, scenario: &LongHaulScenario) -> bool {
    if row.crew != scenario.crew || !row.facilities.contains(&scenario.facility) {
        return false;
    }
    // Extended-duty variants exist only for four-pilot crews with two
    // class-1 facilities on relevant sectors.
    if row.extended_variant
        && !(scenario.crew == CrewComplement::FourPilot
            && scenario.facility == RestFacilityClass::TwoClass1)
    {
        return false;
    }
    // Two-pilot planning rows are additionally banded by sign-on window.
    if scenario.crew == CrewComplement::TwoPilot && scenario.limit == LimitType::Planning {
        if let Some(selected) = scenario.sign_on_window.as_deref() {
            return row
                .sign_on
                .as_ref()
                .map(|range| range.label == selected)
                .unwrap_or(false);
        }
    }
    true
}

fn resolve_row(row: &LongHaulLimitRow, limit: LimitType) -> ResolvedLimitRow {
    ResolvedLimitRow {
        sign_on_window: row.sign_on.as_ref().map(|range| range.label),
        duty_hours: row.duty.for_limit(limit),
        // A note replaces the numeric flight-time display.
        flight_time_hours: if row.note.is_some() {
            None
        } else {
            row.flight.map(|pair| pair.for_limit(limit))
        },
        max_sectors: row.max_sectors,
        note: row.note,
        extended_variant: row.extended_variant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(
        crew: CrewComplement,
        limit: LimitType,
        facility: RestFacilityClass,
    ) -> LongHaulScenario {
        LongHaulScenario {
            crew,
            limit,
            facility,
            sign_on_window: None,
            operating: true,
        }
    }

    #[test]
    fn test_two_pilot_planning_window_selects_one_or_two_rows() {
        let config = FleetConfig::long_haul();
        let mut s = scenario(
            CrewComplement::TwoPilot,
            LimitType::Planning,
            RestFacilityClass::None,
        );
        s.sign_on_window = Some("0600-1159".to_string());
        let morning = next_duty(&config, None, &s).unwrap();
        assert_eq!(morning.rows.len(), 2);

        s.sign_on_window = Some("1200-1759".to_string());
        let afternoon = next_duty(&config, None, &s).unwrap();
        assert_eq!(afternoon.rows.len(), 1);
        assert_eq!(afternoon.rows[0].duty_hours, 12.0);
    }

    #[test]
    fn test_extended_variant_only_for_four_pilot_two_class_1() {
        let config = FleetConfig::long_haul();
        let with_bunks = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::FourPilot,
                LimitType::Operational,
                RestFacilityClass::TwoClass1,
            ),
        )
        .unwrap();
        assert_eq!(with_bunks.rows.len(), 2);
        let extended = with_bunks
            .rows
            .iter()
            .find(|r| r.extended_variant)
            .expect("extended variant present");
        // The note replaces the numeric flight-time display.
        assert!(extended.flight_time_hours.is_none());
        assert!(extended.note.unwrap().contains("FD10.4.3"));

        let mixed = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::FourPilot,
                LimitType::Operational,
                RestFacilityClass::OneClass1OneClass2,
            ),
        )
        .unwrap();
        assert_eq!(mixed.rows.len(), 1);
        assert!(!mixed.rows[0].extended_variant);
    }

    #[test]
    fn test_passenger_seat_rejected_for_planning() {
        let config = FleetConfig::long_haul();
        let result = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::FourPilot,
                LimitType::Planning,
                RestFacilityClass::SeatInPassengerCompartment,
            ),
        );
        assert!(matches!(
            result,
            Err(FrmsError::InvalidRestFacility { .. })
        ));

        let operational = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::FourPilot,
                LimitType::Operational,
                RestFacilityClass::SeatInPassengerCompartment,
            ),
        );
        assert!(operational.is_ok());
    }

    #[test]
    fn test_limit_type_changes_values_not_rows() {
        let config = FleetConfig::long_haul();
        let planning = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::ThreePilot,
                LimitType::Planning,
                RestFacilityClass::Class1,
            ),
        )
        .unwrap();
        let operational = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::ThreePilot,
                LimitType::Operational,
                RestFacilityClass::Class1,
            ),
        )
        .unwrap();
        assert_eq!(planning.rows.len(), operational.rows.len());
        assert_eq!(planning.rows[0].duty_hours, 16.5);
        assert_eq!(operational.rows[0].duty_hours, 18.0);
    }

    #[test]
    fn test_invalid_facility_for_three_pilot() {
        let config = FleetConfig::long_haul();
        let result = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::ThreePilot,
                LimitType::Planning,
                RestFacilityClass::TwoClass1,
            ),
        );
        assert!(matches!(
            result,
            Err(FrmsError::InvalidRestFacility { .. })
        ));
    }

    #[test]
    fn test_duty_bands_follow_scenario() {
        let config = FleetConfig::long_haul();
        let result = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::FourPilot,
                LimitType::Operational,
                RestFacilityClass::TwoClass2,
            ),
        )
        .unwrap();
        assert_eq!(result.duty_bands.len(), 2);
        assert_eq!(result.duty_bands[0].upper_hours, Some(18.0));
    }

    #[test]
    fn test_wrong_fleet_category_is_an_error() {
        let config = FleetConfig::short_haul();
        let result = next_duty(
            &config,
            None,
            &scenario(
                CrewComplement::TwoPilot,
                LimitType::Planning,
                RestFacilityClass::None,
            ),
        );
        assert!(matches!(result, Err(FrmsError::CategoryMismatch { .. })));
    }
}
