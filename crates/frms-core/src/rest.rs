//! Minimum pre-duty and post-duty rest requirements.
//!
//! Fixed threshold-banded tables per (crew complement, limit type), with
//! a separate table for deadheading duty. The single exception to table
//! lookup is two-pilot operational post-duty rest for duty between 11 and
//! 12 hours, which is computed: 10 h plus 1 h per 15 minutes (or part
//! thereof) in excess of 11 h.

use serde::Serialize;

use crate::band::{find_band, Band};
use crate::models::{CrewComplement, LimitType, RestRequirementRow};

/// An expected-duty-hours band offered to the rest calculator.
#[derive(Debug, Clone, Serialize)]
pub struct DutyBand {
    pub label: &'static str,
    /// Inclusive upper bound in hours; `None` for the open-ended band.
    pub upper_hours: Option<f64>,
}

/// The ordered expected-duty-hours bands for a scenario. Boundaries
/// depend on complement, limit type, and operating-vs-deadheading.
pub fn expected_duty_bands(
    crew: CrewComplement,
    limit: LimitType,
    operating: bool,
) -> Vec<DutyBand> {
    let band = |label, upper_hours| DutyBand { label, upper_hours };
    if !operating {
        return vec![band("<=12", Some(12.0)), band(">12", None)];
    }
    match (crew, limit) {
        (CrewComplement::TwoPilot, LimitType::Planning) => {
            vec![band("<=11", Some(11.0)), band(">11", None)]
        }
        (CrewComplement::TwoPilot, LimitType::Operational) => vec![
            band("<=11", Some(11.0)),
            band(">11 and <=12", Some(12.0)),
            band(">12", None),
        ],
        (CrewComplement::ThreePilot, _) => {
            vec![band("<=16", Some(16.0)), band(">16", None)]
        }
        (CrewComplement::FourPilot, _) => {
            vec![band("<=18", Some(18.0)), band(">18", None)]
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RestSpec {
    hours: f64,
    condition: Option<&'static str>,
}

impl RestSpec {
    const fn plain(hours: f64) -> Self {
        Self {
            hours,
            condition: None,
        }
    }

    const fn with(hours: f64, condition: &'static str) -> Self {
        Self {
            hours,
            condition: Some(condition),
        }
    }
}

type RestTable = Vec<Band<Vec<RestSpec>>>;

fn rows_for(band: &Band<Vec<RestSpec>>) -> Vec<RestRequirementRow> {
    band.value
        .iter()
        .map(|spec| RestRequirementRow {
            duty_band: band.label.to_string(),
            min_rest_hours: spec.hours,
            condition: spec.condition.map(str::to_string),
        })
        .collect()
}

fn deadheading_pre() -> RestTable {
    vec![
        Band::up_to(12.0, "<=12", vec![RestSpec::plain(10.0)]),
        Band::over(">12", vec![RestSpec::plain(12.0)]),
    ]
}

fn deadheading_post() -> RestTable {
    vec![
        Band::up_to(
            12.0,
            "<=12",
            vec![RestSpec::with(12.0, "At home base or in suitable accommodation")],
        ),
        Band::over(">12", vec![RestSpec::plain(14.0)]),
    ]
}

fn operating_pre(crew: CrewComplement, limit: LimitType) -> RestTable {
    match (crew, limit) {
        (CrewComplement::TwoPilot, LimitType::Planning) => vec![
            Band::up_to(
                11.0,
                "<=11",
                vec![
                    RestSpec::with(10.0, "At home base"),
                    RestSpec::with(12.0, "Away from home base"),
                ],
            ),
            Band::over(">11", vec![RestSpec::plain(12.0)]),
        ],
        (CrewComplement::TwoPilot, LimitType::Operational) => vec![
            Band::up_to(11.0, "<=11", vec![RestSpec::plain(10.0)]),
            Band::up_to(12.0, ">11 and <=12", vec![RestSpec::plain(11.0)]),
            Band::over(">12", vec![RestSpec::plain(12.0)]),
        ],
        (CrewComplement::ThreePilot, LimitType::Planning) => vec![
            Band::up_to(16.0, "<=16", vec![RestSpec::plain(12.0)]),
            Band::over(">16", vec![RestSpec::plain(14.0)]),
        ],
        (CrewComplement::ThreePilot, LimitType::Operational) => vec![
            Band::up_to(
                16.0,
                "<=16",
                vec![RestSpec::with(
                    10.0,
                    "May be reduced at an outstation with commander concurrence",
                )],
            ),
            Band::over(">16", vec![RestSpec::plain(12.0)]),
        ],
        (CrewComplement::FourPilot, LimitType::Planning) => vec![
            Band::up_to(18.0, "<=18", vec![RestSpec::plain(14.0)]),
            Band::over(
                ">18",
                vec![RestSpec::with(16.0, "Must include one local night")],
            ),
        ],
        (CrewComplement::FourPilot, LimitType::Operational) => vec![
            Band::up_to(18.0, "<=18", vec![RestSpec::plain(12.0)]),
            Band::over(">18", vec![RestSpec::plain(14.0)]),
        ],
    }
}

fn operating_post(crew: CrewComplement, limit: LimitType) -> RestTable {
    match (crew, limit) {
        (CrewComplement::TwoPilot, LimitType::Planning) => vec![
            Band::up_to(11.0, "<=11", vec![RestSpec::plain(12.0)]),
            Band::over(">11", vec![RestSpec::plain(14.0)]),
        ],
        // The (11, 12] band here is computed, not tabled; see
        // `post_duty_rest`.
        (CrewComplement::TwoPilot, LimitType::Operational) => vec![
            Band::up_to(11.0, "<=11", vec![RestSpec::plain(10.0)]),
            Band::over(
                ">12",
                vec![RestSpec::with(
                    14.0,
                    "Plus one local night before the next sign-on",
                )],
            ),
        ],
        (CrewComplement::ThreePilot, LimitType::Planning) => vec![
            Band::up_to(16.0, "<=16", vec![RestSpec::plain(14.0)]),
            Band::over(
                ">16",
                vec![RestSpec::with(18.0, "Must include two local nights")],
            ),
        ],
        (CrewComplement::ThreePilot, LimitType::Operational) => vec![
            Band::up_to(16.0, "<=16", vec![RestSpec::plain(12.0)]),
            Band::over(
                ">16",
                vec![RestSpec::with(16.0, "Must include one local night")],
            ),
        ],
        (CrewComplement::FourPilot, LimitType::Planning) => vec![
            Band::up_to(
                18.0,
                "<=18",
                vec![RestSpec::with(18.0, "Must include two local nights")],
            ),
            Band::over(
                ">18",
                vec![RestSpec::with(24.0, "Must include two local nights")],
            ),
        ],
        (CrewComplement::FourPilot, LimitType::Operational) => vec![
            Band::up_to(18.0, "<=18", vec![RestSpec::plain(14.0)]),
            Band::over(
                ">18",
                vec![RestSpec::with(22.0, "Must include two local nights")],
            ),
        ],
    }
}

/// Minimum rest required before a duty of the expected length.
pub fn pre_duty_rest(
    crew: CrewComplement,
    limit: LimitType,
    expected_duty_hours: f64,
    operating: bool,
) -> Vec<RestRequirementRow> {
    let table = if operating {
        operating_pre(crew, limit)
    } else {
        deadheading_pre()
    };
    find_band(&table, expected_duty_hours)
        .map(rows_for)
        .unwrap_or_default()
}

/// Minimum rest required after a completed duty of `previous_duty_minutes`.
///
/// Takes minutes rather than hours because the two-pilot operational
/// 11-12 h band rounds the excess up to 15-minute increments.
pub fn post_duty_rest(
    crew: CrewComplement,
    limit: LimitType,
    previous_duty_minutes: u32,
    operating: bool,
) -> Vec<RestRequirementRow> {
    if operating
        && crew == CrewComplement::TwoPilot
        && limit == LimitType::Operational
        && previous_duty_minutes > 11 * 60
        && previous_duty_minutes <= 12 * 60
    {
        let excess_minutes = previous_duty_minutes - 11 * 60;
        let additional_hours = excess_minutes.div_ceil(15);
        return vec![RestRequirementRow {
            duty_band: ">11 and <=12".to_string(),
            min_rest_hours: 10.0 + f64::from(additional_hours),
            condition: Some(format!(
                "10 h plus 1 h per 15 min (or part thereof) in excess of 11 h \
                 ({excess_minutes} min excess)"
            )),
        }];
    }

    let table = if operating {
        operating_post(crew, limit)
    } else {
        deadheading_post()
    };
    let hours = f64::from(previous_duty_minutes) / 60.0;
    find_band(&table, hours).map(rows_for).unwrap_or_default()
}
