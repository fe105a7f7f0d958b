//! Time-window aggregation over the duty-record history.
//!
//! Produces an immutable [`CumulativeTotals`] snapshot: rolling sums over
//! closed date ranges ending at the as-of day in the fleet's home-base
//! calendar, plus the streak counters the short-haul overlays consume.
//! Recomputation is idempotent and side-effect-free.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{ComplianceStatus, DutyRecord};
use crate::rules::{FleetConfig, LateNightLimits};

/// A rolling-window sum paired with its ceiling and status.
#[derive(Debug, Clone, Serialize)]
pub struct WindowTotal {
    pub window_days: u32,
    pub hours: f64,
    pub limit_hours: f64,
    pub status: ComplianceStatus,
}

/// Streak counters with their applicable ceilings. Present only for
/// fleets whose configuration defines consecutive-duty rules.
#[derive(Debug, Clone, Serialize)]
pub struct ConsecutiveCounters {
    pub consecutive_duty_days: u32,
    pub max_consecutive_duty_days: u32,
    pub duty_days_in_11: u32,
    pub max_duty_days_in_11: u32,
    pub consecutive_early_starts: u32,
    pub max_consecutive_early_starts: u32,
    pub consecutive_late_nights: u32,
    pub max_consecutive_late_nights: u32,
    pub late_night_duty_hours_in_7_nights: f64,
    pub max_late_night_duty_hours_in_7_nights: f64,
}

/// Computed snapshot of cumulative exposure as of a given day.
///
/// Window totals are `None` when there is no dated record at all, so
/// callers can distinguish "zero hours flown" from "unknown".
#[derive(Debug, Clone, Serialize)]
pub struct CumulativeTotals {
    pub as_of: NaiveDate,
    /// Flight time over the fleet's 28/30-day window.
    pub flight_time_window: Option<WindowTotal>,
    /// Flight time over the trailing 365 days.
    pub flight_time_annual: Option<WindowTotal>,
    pub duty_time_7day: Option<WindowTotal>,
    pub duty_time_14day: Option<WindowTotal>,
    pub consecutive: Option<ConsecutiveCounters>,
    /// Records dropped for lacking a parseable date.
    pub excluded_records: usize,
}

impl CumulativeTotals {
    /// Flatten warning/violation window totals into advisory strings for
    /// the next-duty calculators.
    pub fn restriction_notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        let windows = [
            ("flight time", &self.flight_time_window),
            ("flight time", &self.flight_time_annual),
            ("duty time", &self.duty_time_7day),
            ("duty time", &self.duty_time_14day),
        ];
        for (kind, total) in windows {
            if let Some(t) = total {
                match t.status {
                    ComplianceStatus::Compliant => {}
                    ComplianceStatus::Warning => notes.push(format!(
                        "Approaching {}-day {} limit: {:.1} of {:.1} h",
                        t.window_days, kind, t.hours, t.limit_hours
                    )),
                    ComplianceStatus::Violation => notes.push(format!(
                        "{}-day {} limit reached: {:.1} of {:.1} h",
                        t.window_days, kind, t.hours, t.limit_hours
                    )),
                }
            }
        }
        notes
    }
}

/// Compute the cumulative-totals snapshot for `records` as of `as_of`.
pub fn aggregate(records: &[DutyRecord], as_of: NaiveDate, config: &FleetConfig) -> CumulativeTotals {
    let dated: Vec<&DutyRecord> = records.iter().filter(|r| r.date.is_some()).collect();
    let excluded_records = records.len() - dated.len();

    if dated.is_empty() {
        return CumulativeTotals {
            as_of,
            flight_time_window: None,
            flight_time_annual: None,
            duty_time_7day: None,
            duty_time_14day: None,
            consecutive: consecutive_counters(&dated, as_of, config),
            excluded_records,
        };
    }

    let flight_window = window_sum(&dated, as_of, config.flight_time_window_days, flight_hours);
    let flight_annual = window_sum(&dated, as_of, 365, flight_hours);
    let duty_7 = window_sum(&dated, as_of, 7, duty_hours);
    let duty_14 = window_sum(&dated, as_of, 14, duty_hours);

    let total = |window_days: u32, hours: f64, limit_hours: f64| WindowTotal {
        window_days,
        hours,
        limit_hours,
        status: config.classify(hours, limit_hours),
    };

    CumulativeTotals {
        as_of,
        flight_time_window: Some(total(
            config.flight_time_window_days,
            flight_window,
            config.flight_time_window_limit_hours,
        )),
        flight_time_annual: Some(total(365, flight_annual, config.flight_time_annual_limit_hours)),
        duty_time_7day: Some(total(7, duty_7, config.duty_time_7day_limit_hours)),
        duty_time_14day: Some(total(14, duty_14, config.duty_time_14day_limit_hours)),
        consecutive: consecutive_counters(&dated, as_of, config),
        excluded_records,
    }
}

/// Flight-time contribution: positioning and simulator duty accrue duty
/// time only.
fn flight_hours(record: &DutyRecord) -> f64 {
    if record.is_positioning || record.is_simulator {
        0.0
    } else {
        record.flight_time_hours.max(0.0)
    }
}

fn duty_hours(record: &DutyRecord) -> f64 {
    record.duty_time_hours.max(0.0)
}

/// Sum a field over records whose date lies in the closed range
/// `[as_of - window + 1, as_of]`.
fn window_sum(
    dated: &[&DutyRecord],
    as_of: NaiveDate,
    window_days: u32,
    field: fn(&DutyRecord) -> f64,
) -> f64 {
    let start = as_of
        .checked_sub_days(Days::new(u64::from(window_days) - 1))
        .unwrap_or(NaiveDate::MIN);
    dated
        .iter()
        .filter(|r| {
            let date = r.date.expect("pre-filtered to dated records");
            date >= start && date <= as_of
        })
        .map(|r| field(r))
        .sum()
}

fn consecutive_counters(
    dated: &[&DutyRecord],
    as_of: NaiveDate,
    config: &FleetConfig,
) -> Option<ConsecutiveCounters> {
    let rules = config.short_haul_rules()?;

    let duty_days: BTreeSet<NaiveDate> = dated.iter().filter_map(|r| r.date).collect();

    // A duty on the as-of day or the day before anchors the streak; a
    // snapshot taken before today's duty is filed must not reset it.
    let anchor = if duty_days.contains(&as_of) {
        Some(as_of)
    } else {
        as_of
            .pred_opt()
            .filter(|d| duty_days.contains(d))
    };

    let consecutive_duty_days = streak_len(&duty_days, anchor);

    let eleven_day_start = as_of.checked_sub_days(Days::new(10)).unwrap_or(NaiveDate::MIN);
    let duty_days_in_11 = duty_days
        .iter()
        .filter(|d| **d >= eleven_day_start && **d <= as_of)
        .count() as u32;

    let offset = config.home_base_offset();
    let early_days: BTreeSet<NaiveDate> = dated
        .iter()
        .filter(|r| {
            r.sign_on
                .map(|t| t.with_timezone(&offset).time() < config.early_start_before)
                .unwrap_or(false)
        })
        .filter_map(|r| r.date)
        .collect();
    let consecutive_early_starts = streak_within(&duty_days, &early_days, anchor);

    let late_days: BTreeSet<NaiveDate> = dated
        .iter()
        .filter(|r| is_late_night(r, config, &rules.late_night))
        .filter_map(|r| r.date)
        .collect();
    let late_anchor = anchor.filter(|d| late_days.contains(d)).or_else(|| {
        as_of.pred_opt().filter(|d| late_days.contains(d))
    });
    let consecutive_late_nights = streak_len(&late_days, late_anchor);

    let seven_night_start = as_of.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN);
    let late_night_duty_hours_in_7_nights: f64 = dated
        .iter()
        .filter(|r| is_late_night(r, config, &rules.late_night))
        .filter(|r| {
            let date = r.date.expect("pre-filtered to dated records");
            date >= seven_night_start && date <= as_of
        })
        .map(|r| duty_hours(r))
        .sum();

    Some(ConsecutiveCounters {
        consecutive_duty_days,
        max_consecutive_duty_days: rules.consecutive.max_consecutive_duty_days,
        duty_days_in_11,
        max_duty_days_in_11: rules.consecutive.max_duty_days_in_11,
        consecutive_early_starts,
        max_consecutive_early_starts: rules.consecutive.max_consecutive_early_starts,
        consecutive_late_nights,
        max_consecutive_late_nights: rules.late_night.max_consecutive,
        late_night_duty_hours_in_7_nights,
        max_late_night_duty_hours_in_7_nights: rules.late_night.max_duty_hours_in_7_nights,
    })
}

/// Length of the contiguous run of days in `days` ending at `anchor`.
fn streak_len(days: &BTreeSet<NaiveDate>, anchor: Option<NaiveDate>) -> u32 {
    let Some(mut day) = anchor else { return 0 };
    let mut len = 0;
    while days.contains(&day) {
        len += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    len
}

/// Length of the contiguous run of duty days ending at `anchor` for which
/// every day is also in `qualifying` (e.g. early-start days).
fn streak_within(
    duty_days: &BTreeSet<NaiveDate>,
    qualifying: &BTreeSet<NaiveDate>,
    anchor: Option<NaiveDate>,
) -> u32 {
    let Some(mut day) = anchor else { return 0 };
    let mut len = 0;
    while duty_days.contains(&day) && qualifying.contains(&day) {
        len += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    len
}

/// A duty encroaches the late-night window when its sign-on or sign-off
/// local time-of-day falls inside it.
fn is_late_night(record: &DutyRecord, config: &FleetConfig, limits: &LateNightLimits) -> bool {
    let offset = config.home_base_offset();
    let in_window = |t: NaiveTime| {
        if limits.window_start <= limits.window_end {
            t >= limits.window_start && t <= limits.window_end
        } else {
            t >= limits.window_start || t <= limits.window_end
        }
    };
    let sign_on = record.sign_on.map(|t| t.with_timezone(&offset).time());
    let sign_off = record.sign_off.map(|t| t.with_timezone(&offset).time());
    sign_on.map(&in_window).unwrap_or(false) || sign_off.map(&in_window).unwrap_or(false)
}
