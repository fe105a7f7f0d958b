//! Fleet rule configuration: statutory ceilings and limit tables.
//!
//! Static reference data loaded once per session. One [`FleetConfig`] per
//! fleet category; the tables are plain data with no behavior beyond
//! band/window membership tests.

use chrono::{FixedOffset, NaiveTime};

use crate::models::{ComplianceStatus, CrewComplement, LimitType, RestFacilityClass};

/// Warning threshold as a fraction of the ceiling. Inferred from observed
/// product behavior; kept as data so the confirmed regulatory value can be
/// sourced without code changes.
pub const DEFAULT_WARNING_RATIO: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetCategory {
    /// Short-haul narrow-body (28-day flight-time window).
    ShortHaul,
    /// Long-haul wide-body (30-day flight-time window).
    LongHaul,
}

/// A planning/operational ceiling pair taken from the same table row.
#[derive(Debug, Clone, Copy)]
pub struct LimitPair {
    pub planning: f64,
    pub operational: f64,
}

impl LimitPair {
    pub const fn new(planning: f64, operational: f64) -> Self {
        Self {
            planning,
            operational,
        }
    }

    pub fn for_limit(&self, limit: LimitType) -> f64 {
        match limit {
            LimitType::Planning => self.planning,
            LimitType::Operational => self.operational,
        }
    }
}

/// Sector-count band within a sign-on window (1-4, 5, 6 sectors).
#[derive(Debug, Clone)]
pub struct SectorBand {
    pub label: &'static str,
    pub max_sectors: u32,
    pub duty: LimitPair,
}

/// A sign-on time-of-day window and the ceilings that apply when the next
/// duty begins inside it.
#[derive(Debug, Clone)]
pub struct DutyTimeWindow {
    pub label: &'static str,
    pub start: NaiveTime,
    /// Inclusive end minute; the window may wrap midnight.
    pub end: NaiveTime,
    pub sector_bands: Vec<SectorBand>,
    pub flight_time: LimitPair,
    /// Reduced flight-time ceiling when the duty involves night flying.
    pub flight_time_night: LimitPair,
}

impl DutyTimeWindow {
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            t >= self.start && t <= self.end
        } else {
            // Wraps midnight, e.g. 2000-0459.
            t >= self.start || t <= self.end
        }
    }
}

/// Back-of-clock trigger: a sign-off inside the body-clock low window
/// delays the earliest next sign-on.
#[derive(Debug, Clone)]
pub struct BackOfClockRule {
    pub sign_off_start: NaiveTime,
    pub sign_off_end: NaiveTime,
    pub min_rest_hours: f64,
}

/// Late-night operation ceilings over a trailing 7-night window.
#[derive(Debug, Clone)]
pub struct LateNightLimits {
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub max_consecutive: u32,
    pub max_duty_hours_in_7_nights: f64,
}

#[derive(Debug, Clone)]
pub struct ConsecutiveDutyLimits {
    pub max_consecutive_duty_days: u32,
    pub max_duty_days_in_11: u32,
    pub max_consecutive_early_starts: u32,
}

#[derive(Debug, Clone)]
pub struct ShortHaulRules {
    pub sign_on_windows: Vec<DutyTimeWindow>,
    pub back_of_clock: BackOfClockRule,
    pub late_night: LateNightLimits,
    pub consecutive: ConsecutiveDutyLimits,
}

/// Sign-on time range for long-haul two-pilot planning rows.
#[derive(Debug, Clone)]
pub struct SignOnTimeRange {
    pub label: &'static str,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SignOnTimeRange {
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            t >= self.start && t <= self.end
        } else {
            t >= self.start || t <= self.end
        }
    }
}

/// One row of the long-haul duty-limit table.
#[derive(Debug, Clone)]
pub struct LongHaulLimitRow {
    pub crew: CrewComplement,
    /// Rest-facility classes this row applies to.
    pub facilities: &'static [RestFacilityClass],
    /// Sign-on range filter; `None` applies at any sign-on time.
    pub sign_on: Option<SignOnTimeRange>,
    pub duty: LimitPair,
    /// `None` when [`Self::note`] replaces the numeric flight-time display.
    pub flight: Option<LimitPair>,
    pub max_sectors: Option<u32>,
    pub note: Option<&'static str>,
    /// Extended-duty variant applicable only for four-pilot crews with two
    /// class-1 facilities on relevant sectors.
    pub extended_variant: bool,
}

#[derive(Debug, Clone)]
pub struct LongHaulRules {
    pub rows: Vec<LongHaulLimitRow>,
}

/// Per-category rule tables; a closed sum so every calculator branch is
/// forced to decide when a category is added.
#[derive(Debug, Clone)]
pub enum FleetRules {
    ShortHaul(ShortHaulRules),
    LongHaul(LongHaulRules),
}

/// Statutory ceilings and tables for one fleet category.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    pub fleet_id: String,
    pub category: FleetCategory,
    /// Home-base UTC offset in hours; rolling windows and time-of-day
    /// tests are evaluated in this calendar.
    pub home_base_offset_hours: i32,
    /// 28 days short-haul, 30 days long-haul.
    pub flight_time_window_days: u32,
    pub flight_time_window_limit_hours: f64,
    pub flight_time_annual_limit_hours: f64,
    pub duty_time_7day_limit_hours: f64,
    pub duty_time_14day_limit_hours: f64,
    pub warning_ratio: f64,
    /// Sign-on before this local time counts as an early start.
    pub early_start_before: NaiveTime,
    pub rules: FleetRules,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time-of-day constant")
}

impl FleetConfig {
    /// Short-haul narrow-body tables.
    pub fn short_haul() -> Self {
        Self {
            fleet_id: "B737".to_string(),
            category: FleetCategory::ShortHaul,
            home_base_offset_hours: 10,
            flight_time_window_days: 28,
            flight_time_window_limit_hours: 100.0,
            flight_time_annual_limit_hours: 1000.0,
            duty_time_7day_limit_hours: 60.0,
            duty_time_14day_limit_hours: 100.0,
            warning_ratio: DEFAULT_WARNING_RATIO,
            early_start_before: hm(6, 0),
            rules: FleetRules::ShortHaul(ShortHaulRules {
                sign_on_windows: vec![
                    DutyTimeWindow {
                        label: "0500-1459",
                        start: hm(5, 0),
                        end: hm(14, 59),
                        sector_bands: vec![
                            SectorBand {
                                label: "1-4 sectors",
                                max_sectors: 4,
                                duty: LimitPair::new(11.0, 12.0),
                            },
                            SectorBand {
                                label: "5 sectors",
                                max_sectors: 5,
                                duty: LimitPair::new(10.5, 11.5),
                            },
                            SectorBand {
                                label: "6 sectors",
                                max_sectors: 6,
                                duty: LimitPair::new(10.0, 11.0),
                            },
                        ],
                        flight_time: LimitPair::new(9.0, 9.5),
                        flight_time_night: LimitPair::new(8.0, 8.5),
                    },
                    DutyTimeWindow {
                        label: "1500-1959",
                        start: hm(15, 0),
                        end: hm(19, 59),
                        sector_bands: vec![
                            SectorBand {
                                label: "1-4 sectors",
                                max_sectors: 4,
                                duty: LimitPair::new(10.0, 11.0),
                            },
                            SectorBand {
                                label: "5 sectors",
                                max_sectors: 5,
                                duty: LimitPair::new(9.5, 10.5),
                            },
                            SectorBand {
                                label: "6 sectors",
                                max_sectors: 6,
                                duty: LimitPair::new(9.0, 10.0),
                            },
                        ],
                        flight_time: LimitPair::new(8.5, 9.0),
                        flight_time_night: LimitPair::new(7.5, 8.0),
                    },
                    DutyTimeWindow {
                        label: "2000-0459",
                        start: hm(20, 0),
                        end: hm(4, 59),
                        sector_bands: vec![
                            SectorBand {
                                label: "1-4 sectors",
                                max_sectors: 4,
                                duty: LimitPair::new(9.0, 10.0),
                            },
                            SectorBand {
                                label: "5 sectors",
                                max_sectors: 5,
                                duty: LimitPair::new(8.5, 9.5),
                            },
                            SectorBand {
                                label: "6 sectors",
                                max_sectors: 6,
                                duty: LimitPair::new(8.0, 9.0),
                            },
                        ],
                        flight_time: LimitPair::new(8.0, 8.5),
                        flight_time_night: LimitPair::new(7.0, 7.5),
                    },
                ],
                back_of_clock: BackOfClockRule {
                    sign_off_start: hm(2, 0),
                    sign_off_end: hm(5, 59),
                    min_rest_hours: 12.0,
                },
                late_night: LateNightLimits {
                    window_start: hm(23, 0),
                    window_end: hm(5, 30),
                    max_consecutive: 4,
                    max_duty_hours_in_7_nights: 30.0,
                },
                consecutive: ConsecutiveDutyLimits {
                    max_consecutive_duty_days: 6,
                    max_duty_days_in_11: 9,
                    max_consecutive_early_starts: 4,
                },
            }),
        }
    }

    /// Long-haul wide-body tables.
    pub fn long_haul() -> Self {
        use CrewComplement::*;
        use RestFacilityClass::*;

        Self {
            fleet_id: "B787".to_string(),
            category: FleetCategory::LongHaul,
            home_base_offset_hours: 10,
            flight_time_window_days: 30,
            flight_time_window_limit_hours: 110.0,
            flight_time_annual_limit_hours: 1000.0,
            duty_time_7day_limit_hours: 60.0,
            duty_time_14day_limit_hours: 100.0,
            warning_ratio: DEFAULT_WARNING_RATIO,
            early_start_before: hm(6, 0),
            rules: FleetRules::LongHaul(LongHaulRules {
                rows: vec![
                    // Two-pilot, sign-on-banded.
                    LongHaulLimitRow {
                        crew: TwoPilot,
                        facilities: &[None],
                        sign_on: Some(SignOnTimeRange {
                            label: "0600-1159",
                            start: hm(6, 0),
                            end: hm(11, 59),
                        }),
                        duty: LimitPair::new(13.0, 15.0),
                        flight: Some(LimitPair::new(10.5, 11.5)),
                        max_sectors: Some(3),
                        note: Option::None,
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: TwoPilot,
                        facilities: &[None],
                        sign_on: Some(SignOnTimeRange {
                            label: "0600-1159",
                            start: hm(6, 0),
                            end: hm(11, 59),
                        }),
                        duty: LimitPair::new(14.0, 16.0),
                        flight: Some(LimitPair::new(11.0, 12.0)),
                        max_sectors: Some(1),
                        note: Some("Single sector only"),
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: TwoPilot,
                        facilities: &[None],
                        sign_on: Some(SignOnTimeRange {
                            label: "1200-1759",
                            start: hm(12, 0),
                            end: hm(17, 59),
                        }),
                        duty: LimitPair::new(12.0, 14.0),
                        flight: Some(LimitPair::new(10.0, 11.0)),
                        max_sectors: Some(3),
                        note: Option::None,
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: TwoPilot,
                        facilities: &[None],
                        sign_on: Some(SignOnTimeRange {
                            label: "1800-0559",
                            start: hm(18, 0),
                            end: hm(5, 59),
                        }),
                        duty: LimitPair::new(11.0, 13.0),
                        flight: Some(LimitPair::new(9.5, 10.5)),
                        max_sectors: Some(2),
                        note: Option::None,
                        extended_variant: false,
                    },
                    // Three-pilot, facility-banded.
                    LongHaulLimitRow {
                        crew: ThreePilot,
                        facilities: &[Class1],
                        sign_on: Option::None,
                        duty: LimitPair::new(16.5, 18.0),
                        flight: Some(LimitPair::new(13.0, 14.5)),
                        max_sectors: Some(2),
                        note: Option::None,
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: ThreePilot,
                        facilities: &[Class2],
                        sign_on: Option::None,
                        duty: LimitPair::new(15.0, 16.5),
                        flight: Some(LimitPair::new(12.0, 13.0)),
                        max_sectors: Some(2),
                        note: Option::None,
                        extended_variant: false,
                    },
                    // Four-pilot, facility-banded.
                    LongHaulLimitRow {
                        crew: FourPilot,
                        facilities: &[TwoClass1],
                        sign_on: Option::None,
                        duty: LimitPair::new(18.0, 20.0),
                        flight: Some(LimitPair::new(16.0, 17.0)),
                        max_sectors: Some(2),
                        note: Option::None,
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: FourPilot,
                        facilities: &[TwoClass1],
                        sign_on: Option::None,
                        duty: LimitPair::new(20.0, 22.0),
                        flight: Option::None,
                        max_sectors: Some(1),
                        note: Some(
                            "Relevant sectors only, under the FD10.4.3 extended-operations clause",
                        ),
                        extended_variant: true,
                    },
                    LongHaulLimitRow {
                        crew: FourPilot,
                        facilities: &[OneClass1OneClass2],
                        sign_on: Option::None,
                        duty: LimitPair::new(17.0, 19.0),
                        flight: Some(LimitPair::new(15.0, 16.0)),
                        max_sectors: Some(2),
                        note: Option::None,
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: FourPilot,
                        facilities: &[TwoClass2],
                        sign_on: Option::None,
                        duty: LimitPair::new(16.0, 18.0),
                        flight: Some(LimitPair::new(14.0, 15.0)),
                        max_sectors: Some(2),
                        note: Option::None,
                        extended_variant: false,
                    },
                    LongHaulLimitRow {
                        crew: FourPilot,
                        facilities: &[SeatInPassengerCompartment],
                        sign_on: Option::None,
                        duty: LimitPair::new(14.0, 16.0),
                        flight: Some(LimitPair::new(12.0, 13.0)),
                        max_sectors: Some(1),
                        note: Some("In-flight relief from a passenger-compartment seat"),
                        extended_variant: false,
                    },
                ],
            }),
        }
    }

    pub fn home_base_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.home_base_offset_hours * 3600)
            .expect("home-base offset within +/-24h")
    }

    pub fn short_haul_rules(&self) -> Option<&ShortHaulRules> {
        match &self.rules {
            FleetRules::ShortHaul(rules) => Some(rules),
            FleetRules::LongHaul(_) => Option::None,
        }
    }

    pub fn long_haul_rules(&self) -> Option<&LongHaulRules> {
        match &self.rules {
            FleetRules::ShortHaul(_) => Option::None,
            FleetRules::LongHaul(rules) => Some(rules),
        }
    }

    /// Classify a current value against a ceiling using this fleet's
    /// warning ratio.
    pub fn classify(&self, current: f64, limit: f64) -> ComplianceStatus {
        crate::compliance::classify(current, limit, self.warning_ratio)
    }
}

/// The rest-facility classes offerable for a complement and limit type.
///
/// Anything outside this subset must be rejected by the long-haul
/// calculator.
pub fn valid_rest_facilities(
    crew: CrewComplement,
    limit: LimitType,
) -> &'static [RestFacilityClass] {
    use RestFacilityClass::*;
    match (crew, limit) {
        (CrewComplement::TwoPilot, _) => &[None],
        (CrewComplement::ThreePilot, _) => &[Class1, Class2],
        (CrewComplement::FourPilot, LimitType::Planning) => {
            &[TwoClass1, OneClass1OneClass2, TwoClass2]
        }
        (CrewComplement::FourPilot, LimitType::Operational) => &[
            TwoClass1,
            OneClass1OneClass2,
            TwoClass2,
            SeatInPassengerCompartment,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_contains_handles_midnight_wrap() {
        let config = FleetConfig::short_haul();
        let rules = config.short_haul_rules().unwrap();
        let overnight = &rules.sign_on_windows[2];
        assert!(overnight.contains(hm(23, 0)));
        assert!(overnight.contains(hm(3, 30)));
        assert!(!overnight.contains(hm(12, 0)));
    }

    #[test]
    fn test_windows_cover_the_clock_without_overlap() {
        let config = FleetConfig::short_haul();
        let rules = config.short_haul_rules().unwrap();
        for minute in 0..(24 * 60) {
            let t = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap();
            let hits = rules
                .sign_on_windows
                .iter()
                .filter(|w| w.contains(t))
                .count();
            assert_eq!(hits, 1, "minute {minute} covered by {hits} windows");
        }
    }

    #[test]
    fn test_passenger_seat_only_four_pilot_operational() {
        use RestFacilityClass::SeatInPassengerCompartment;
        for crew in [
            CrewComplement::TwoPilot,
            CrewComplement::ThreePilot,
            CrewComplement::FourPilot,
        ] {
            for limit in [LimitType::Planning, LimitType::Operational] {
                let allowed = valid_rest_facilities(crew, limit)
                    .contains(&SeatInPassengerCompartment);
                let expected = crew == CrewComplement::FourPilot
                    && limit == LimitType::Operational;
                assert_eq!(allowed, expected);
            }
        }
    }

    #[test]
    fn test_operational_ceilings_not_below_planning() {
        let config = FleetConfig::long_haul();
        for row in &config.long_haul_rules().unwrap().rows {
            assert!(row.duty.operational >= row.duty.planning);
            if let Some(flight) = row.flight {
                assert!(flight.operational >= flight.planning);
            }
            // A missing numeric flight ceiling must be explained by a note.
            if row.flight.is_none() {
                assert!(row.note.is_some());
            }
        }
    }

    #[test]
    fn test_fleet_window_lengths() {
        assert_eq!(FleetConfig::short_haul().flight_time_window_days, 28);
        assert_eq!(FleetConfig::long_haul().flight_time_window_days, 30);
    }
}
