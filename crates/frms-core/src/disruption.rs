//! Disruption rest calculation (FD10.2.1 family).
//!
//! Evaluates the three independent clauses, selects the binding
//! (maximum) one, and applies the timezone adjustment. Inapplicable
//! clauses are exposed as `None` ("N/A"), never silently zero.

use serde::Serialize;

use crate::models::CrewComplement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionClause {
    /// Clause (i): standard rest from previous duty length.
    Standard,
    /// Clause (ii): proportional extension for duty beyond 12 h.
    ProportionalExtension,
    /// Clause (iii): next duty planned to exceed 16 h (augmented crews).
    NextDutyLength,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisruptionRestResult {
    /// Clause (i) value; always applicable.
    pub standard_hours: f64,
    /// Clause (ii) value; `None` unless previous duty exceeded 12 h.
    pub proportional_hours: Option<f64>,
    /// Clause (iii) value; `None` for two-pilot crews or when the next
    /// duty is not planned beyond 16 h.
    pub next_duty_hours: Option<f64>,
    /// The binding clause.
    pub selected: DisruptionClause,
    /// Maximum clause value, before timezone adjustment.
    pub rest_hours: f64,
    /// `max(0, |tz difference| - 3)` hours.
    pub tz_adjustment_hours: f64,
    pub total_rest_hours: f64,
}

/// Compute disruption rest for a crew after an extended or displaced duty.
pub fn disruption_rest(
    crew: CrewComplement,
    previous_duty_hours: f64,
    tz_difference_hours: f64,
    next_duty_over_16: bool,
) -> DisruptionRestResult {
    let standard_hours = match crew {
        CrewComplement::TwoPilot => {
            if previous_duty_hours > 11.0 {
                12.0
            } else {
                10.0
            }
        }
        CrewComplement::ThreePilot | CrewComplement::FourPilot => {
            if previous_duty_hours > 16.0 {
                24.0
            } else {
                12.0
            }
        }
    };

    let proportional_hours = (previous_duty_hours > 12.0)
        .then(|| 12.0 + 1.5 * (previous_duty_hours - 12.0));

    let next_duty_hours =
        (next_duty_over_16 && crew.is_augmented()).then_some(24.0);

    // The maximum clause binds; ties resolve in clause order.
    let mut selected = DisruptionClause::Standard;
    let mut rest_hours = standard_hours;
    if let Some(hours) = proportional_hours {
        if hours > rest_hours {
            selected = DisruptionClause::ProportionalExtension;
            rest_hours = hours;
        }
    }
    if let Some(hours) = next_duty_hours {
        if hours > rest_hours {
            selected = DisruptionClause::NextDutyLength;
            rest_hours = hours;
        }
    }

    let tz_adjustment_hours = (tz_difference_hours.abs() - 3.0).max(0.0);

    DisruptionRestResult {
        standard_hours,
        proportional_hours,
        next_duty_hours,
        selected,
        rest_hours,
        tz_adjustment_hours,
        total_rest_hours: rest_hours + tz_adjustment_hours,
    }
}
