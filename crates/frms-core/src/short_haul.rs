//! Next-duty limit calculator, short-haul path.
//!
//! Sign-on-window lookup with sector-banded duty ceilings, plus the three
//! restriction overlays: back-of-clock, late-night status, and
//! consecutive-duty status. Overlays surface as data and advisory
//! strings, never as errors.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;

use crate::aggregate::CumulativeTotals;
use crate::error::FrmsError;
use crate::models::{DutyRecord, LimitType};
use crate::rules::{DutyTimeWindow, FleetCategory, FleetConfig};

/// Duty ceiling for one sector band, resolved for the active limit type.
#[derive(Debug, Clone, Serialize)]
pub struct SectorLimit {
    pub label: &'static str,
    pub max_sectors: u32,
    pub duty_hours: f64,
}

/// Active back-of-clock restriction.
#[derive(Debug, Clone, Serialize)]
pub struct BackOfClockRestriction {
    /// The delayed earliest-sign-on floor.
    pub earliest_sign_on: DateTime<Utc>,
    pub reason: String,
}

/// Late-night exposure against the fleet's 7-night ceilings.
#[derive(Debug, Clone, Serialize)]
pub struct LateNightStatus {
    pub consecutive_late_nights: u32,
    pub max_consecutive: u32,
    pub duty_hours_in_7_nights: f64,
    pub max_duty_hours_in_7_nights: f64,
    /// Recovery recommendation when at or near a ceiling.
    pub recovery: Option<String>,
}

/// Limits and overlays for the next short-haul duty period.
#[derive(Debug, Clone, Serialize)]
pub struct ShortHaulNextDuty {
    pub limit: LimitType,
    /// Label of the selected sign-on window.
    pub window: &'static str,
    pub sector_limits: Vec<SectorLimit>,
    pub flight_time_hours: f64,
    /// Reduced ceiling applying when the duty involves night flying.
    pub flight_time_night_hours: f64,
    /// Earliest permissible sign-on after any back-of-clock override.
    pub earliest_sign_on: DateTime<Utc>,
    pub back_of_clock: Option<BackOfClockRestriction>,
    pub late_night: Option<LateNightStatus>,
    /// Consecutive-duty counters at or over their ceilings.
    pub consecutive_duty_flags: Vec<String>,
    /// Cumulative-total-derived advisories.
    pub restrictions: Vec<String>,
}

/// Evaluate the next-duty limits for a short-haul fleet.
///
/// `earliest_sign_on` is the minimum-rest-derived earliest sign-on instant
/// supplied by the rest requirement calculator; a back-of-clock pattern in
/// the record history may delay it further.
pub fn next_duty(
    records: &[DutyRecord],
    totals: &CumulativeTotals,
    earliest_sign_on: DateTime<Utc>,
    limit: LimitType,
    config: &FleetConfig,
) -> Result<ShortHaulNextDuty, FrmsError> {
    let rules = config
        .short_haul_rules()
        .ok_or_else(|| FrmsError::CategoryMismatch {
            fleet_id: config.fleet_id.clone(),
            expected: FleetCategory::ShortHaul,
        })?;

    let offset = config.home_base_offset();

    let back_of_clock = back_of_clock_restriction(records, config, rules, earliest_sign_on);
    let effective_sign_on = back_of_clock
        .as_ref()
        .map(|r| r.earliest_sign_on)
        .unwrap_or(earliest_sign_on);

    let local_sign_on = effective_sign_on.with_timezone(&offset).time();
    let window = select_window(&rules.sign_on_windows, local_sign_on)
        .expect("sign-on window table is non-empty");

    let sector_limits = window
        .sector_bands
        .iter()
        .map(|band| SectorLimit {
            label: band.label,
            max_sectors: band.max_sectors,
            duty_hours: band.duty.for_limit(limit),
        })
        .collect();

    let late_night = totals.consecutive.as_ref().map(|counters| {
        let at_consecutive_ceiling =
            counters.consecutive_late_nights >= counters.max_consecutive_late_nights;
        let near_hours_ceiling = counters.late_night_duty_hours_in_7_nights
            >= config.warning_ratio * counters.max_late_night_duty_hours_in_7_nights;
        let recovery = (at_consecutive_ceiling || near_hours_ceiling).then(|| {
            "Schedule two consecutive home-base local nights free of late-night \
             operations before further late-night duty"
                .to_string()
        });
        LateNightStatus {
            consecutive_late_nights: counters.consecutive_late_nights,
            max_consecutive: counters.max_consecutive_late_nights,
            duty_hours_in_7_nights: counters.late_night_duty_hours_in_7_nights,
            max_duty_hours_in_7_nights: counters.max_late_night_duty_hours_in_7_nights,
            recovery,
        }
    });

    let consecutive_duty_flags = totals
        .consecutive
        .as_ref()
        .map(consecutive_flags)
        .unwrap_or_default();

    Ok(ShortHaulNextDuty {
        limit,
        window: window.label,
        sector_limits,
        flight_time_hours: window.flight_time.for_limit(limit),
        flight_time_night_hours: window.flight_time_night.for_limit(limit),
        earliest_sign_on: effective_sign_on,
        back_of_clock,
        late_night,
        consecutive_duty_flags,
        restrictions: totals.restriction_notes(),
    })
}

/// Select the window containing `t`, or the next chronologically
/// applicable window when none contains it.
pub fn select_window(windows: &[DutyTimeWindow], t: NaiveTime) -> Option<&DutyTimeWindow> {
    if let Some(window) = windows.iter().find(|w| w.contains(t)) {
        return Some(window);
    }
    windows.iter().min_by_key(|w| {
        w.start
            .signed_duration_since(t)
            .num_minutes()
            .rem_euclid(24 * 60)
    })
}

fn back_of_clock_restriction(
    records: &[DutyRecord],
    config: &FleetConfig,
    rules: &crate::rules::ShortHaulRules,
    earliest_sign_on: DateTime<Utc>,
) -> Option<BackOfClockRestriction> {
    let offset = config.home_base_offset();
    let last_sign_off = records
        .iter()
        .filter(|r| r.date.is_some())
        .filter_map(|r| r.sign_off)
        .max()?;

    let local_sign_off = last_sign_off.with_timezone(&offset).time();
    let bock = &rules.back_of_clock;
    if local_sign_off < bock.sign_off_start || local_sign_off > bock.sign_off_end {
        return None;
    }

    let floor = last_sign_off + Duration::minutes((bock.min_rest_hours * 60.0) as i64);
    if floor <= earliest_sign_on {
        return None;
    }

    Some(BackOfClockRestriction {
        earliest_sign_on: floor,
        reason: format!(
            "Previous duty signed off at {} local, inside the {}-{} body-clock low; \
             next sign-on delayed until {:.0} h rest is complete",
            local_sign_off.format("%H:%M"),
            bock.sign_off_start.format("%H%M"),
            bock.sign_off_end.format("%H%M"),
            bock.min_rest_hours
        ),
    })
}

fn consecutive_flags(counters: &crate::aggregate::ConsecutiveCounters) -> Vec<String> {
    let mut flags = Vec::new();
    if counters.consecutive_duty_days >= counters.max_consecutive_duty_days {
        flags.push(format!(
            "Consecutive duty days at limit: {} of {}",
            counters.consecutive_duty_days, counters.max_consecutive_duty_days
        ));
    }
    if counters.duty_days_in_11 >= counters.max_duty_days_in_11 {
        flags.push(format!(
            "Duty days in 11 days at limit: {} of {}",
            counters.duty_days_in_11, counters.max_duty_days_in_11
        ));
    }
    if counters.consecutive_early_starts >= counters.max_consecutive_early_starts {
        flags.push(format!(
            "Consecutive early starts at limit: {} of {}",
            counters.consecutive_early_starts, counters.max_consecutive_early_starts
        ));
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::rules::{LimitPair, SectorBand};
    use chrono::{NaiveDate, TimeZone};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn empty_totals(config: &FleetConfig) -> CumulativeTotals {
        aggregate(&[], NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(), config)
    }

    fn duty_day(d: u32, sign_on_utc: (u32, u32, u32), sign_off_utc: (u32, u32, u32)) -> DutyRecord {
        DutyRecord {
            date: Some(NaiveDate::from_ymd_opt(2026, 8, d).unwrap()),
            sign_on: Some(
                Utc.with_ymd_and_hms(2026, 8, sign_on_utc.0, sign_on_utc.1, sign_on_utc.2, 0)
                    .unwrap(),
            ),
            sign_off: Some(
                Utc.with_ymd_and_hms(2026, 8, sign_off_utc.0, sign_off_utc.1, sign_off_utc.2, 0)
                    .unwrap(),
            ),
            sectors: 4,
            flight_time_hours: 6.0,
            duty_time_hours: 9.0,
            fleet: "B737".to_string(),
            is_positioning: false,
            is_simulator: false,
        }
    }

    #[test]
    fn test_0600_sign_on_selects_morning_window() {
        let config = FleetConfig::short_haul();
        let totals = empty_totals(&config);
        // 20:00 UTC on the 27th = 06:00 local (UTC+10) on the 28th.
        let sign_on = Utc.with_ymd_and_hms(2026, 8, 27, 20, 0, 0).unwrap();
        let result =
            next_duty(&[], &totals, sign_on, LimitType::Planning, &config).unwrap();
        assert_eq!(result.window, "0500-1459");
        assert_eq!(result.sector_limits[0].duty_hours, 11.0);
    }

    #[test]
    fn test_operational_limit_reads_same_table() {
        let config = FleetConfig::short_haul();
        let totals = empty_totals(&config);
        let sign_on = Utc.with_ymd_and_hms(2026, 8, 27, 20, 0, 0).unwrap();
        let planning =
            next_duty(&[], &totals, sign_on, LimitType::Planning, &config).unwrap();
        let operational =
            next_duty(&[], &totals, sign_on, LimitType::Operational, &config).unwrap();
        assert_eq!(planning.window, operational.window);
        assert_eq!(operational.sector_limits[0].duty_hours, 12.0);
        assert!(operational.flight_time_hours > planning.flight_time_hours);
    }

    #[test]
    fn test_overnight_window_contains_0400() {
        let config = FleetConfig::short_haul();
        let totals = empty_totals(&config);
        // 18:00 UTC on the 27th = 04:00 local on the 28th.
        let sign_on = Utc.with_ymd_and_hms(2026, 8, 27, 18, 0, 0).unwrap();
        let result =
            next_duty(&[], &totals, sign_on, LimitType::Planning, &config).unwrap();
        assert_eq!(result.window, "2000-0459");
    }

    #[test]
    fn test_gap_falls_through_to_next_window() {
        // Synthetic two-window table with a gap between 10:00 and 15:00.
        let windows = vec![
            DutyTimeWindow {
                label: "0500-0959",
                start: hm(5, 0),
                end: hm(9, 59),
                sector_bands: vec![SectorBand {
                    label: "1-4 sectors",
                    max_sectors: 4,
                    duty: LimitPair::new(11.0, 12.0),
                }],
                flight_time: LimitPair::new(9.0, 9.5),
                flight_time_night: LimitPair::new(8.0, 8.5),
            },
            DutyTimeWindow {
                label: "1500-1959",
                start: hm(15, 0),
                end: hm(19, 59),
                sector_bands: vec![],
                flight_time: LimitPair::new(8.5, 9.0),
                flight_time_night: LimitPair::new(7.5, 8.0),
            },
        ];
        let selected = select_window(&windows, hm(11, 30)).unwrap();
        assert_eq!(selected.label, "1500-1959");
        // Wraps around past midnight to the earliest window.
        let selected = select_window(&windows, hm(21, 0)).unwrap();
        assert_eq!(selected.label, "0500-0959");
    }

    #[test]
    fn test_back_of_clock_delays_sign_on() {
        let config = FleetConfig::short_haul();
        // Sign-off 17:30 UTC on the 27th = 03:30 local on the 28th.
        let records = vec![duty_day(27, (27, 8, 0), (27, 17, 30))];
        let totals = aggregate(
            &records,
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            &config,
        );
        // Rest calculator would otherwise allow sign-on at 13:00 local.
        let requested = Utc.with_ymd_and_hms(2026, 8, 28, 3, 0, 0).unwrap();
        let result =
            next_duty(&records, &totals, requested, LimitType::Planning, &config).unwrap();
        let restriction = result.back_of_clock.expect("restriction should be active");
        // 12 h after the 17:30 UTC sign-off.
        assert_eq!(
            restriction.earliest_sign_on,
            Utc.with_ymd_and_hms(2026, 8, 28, 5, 30, 0).unwrap()
        );
        assert_eq!(result.earliest_sign_on, restriction.earliest_sign_on);
        assert!(restriction.reason.contains("03:30"));
        // 05:30 UTC = 15:30 local: the delayed floor moves the window.
        assert_eq!(result.window, "1500-1959");
    }

    #[test]
    fn test_back_of_clock_inactive_for_daytime_sign_off() {
        let config = FleetConfig::short_haul();
        // Sign-off 08:00 UTC = 18:00 local.
        let records = vec![duty_day(27, (26, 22, 0), (27, 8, 0))];
        let totals = aggregate(
            &records,
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            &config,
        );
        let requested = Utc.with_ymd_and_hms(2026, 8, 27, 20, 0, 0).unwrap();
        let result =
            next_duty(&records, &totals, requested, LimitType::Planning, &config).unwrap();
        assert!(result.back_of_clock.is_none());
        assert_eq!(result.earliest_sign_on, requested);
    }

    #[test]
    fn test_consecutive_duty_flags_at_ceiling() {
        let config = FleetConfig::short_haul();
        // Six consecutive duty days ending at the as-of day.
        let records: Vec<DutyRecord> = (23..=28)
            .map(|d| duty_day(d, (d - 1, 22, 0), (d, 8, 0)))
            .collect();
        let totals = aggregate(
            &records,
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            &config,
        );
        let requested = Utc.with_ymd_and_hms(2026, 8, 28, 20, 0, 0).unwrap();
        let result =
            next_duty(&records, &totals, requested, LimitType::Planning, &config).unwrap();
        assert!(result
            .consecutive_duty_flags
            .iter()
            .any(|f| f.contains("Consecutive duty days at limit: 6 of 6")));
    }

    #[test]
    fn test_wrong_fleet_category_is_an_error() {
        let config = FleetConfig::long_haul();
        let totals = empty_totals(&config);
        let sign_on = Utc.with_ymd_and_hms(2026, 8, 27, 20, 0, 0).unwrap();
        let result = next_duty(&[], &totals, sign_on, LimitType::Planning, &config);
        assert!(matches!(result, Err(FrmsError::CategoryMismatch { .. })));
    }
}
