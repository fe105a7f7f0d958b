//! Core data models for the FRMS engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single duty period as captured in the logbook.
///
/// Produced by the ingestion collaborator; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyRecord {
    /// Calendar day of the duty in the fleet's home-base timezone.
    /// `None` when the source date could not be parsed; such records are
    /// excluded from aggregation and counted, never treated as an error.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub sign_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sign_off: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sectors: u32,
    #[serde(default)]
    pub flight_time_hours: f64,
    #[serde(default)]
    pub duty_time_hours: f64,
    /// Fleet tag linking the record to a [`crate::rules::FleetConfig`].
    pub fleet: String,
    /// Positioning (paxing) duty: counts toward duty time, not flight time.
    #[serde(default)]
    pub is_positioning: bool,
    /// Simulator duty: counts toward duty time, not flight time.
    #[serde(default)]
    pub is_simulator: bool,
}

/// Accept a missing, null, or unparseable date as `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

/// Operating crew complement for the next duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewComplement {
    TwoPilot,
    ThreePilot,
    FourPilot,
}

impl CrewComplement {
    pub fn label(&self) -> &'static str {
        match self {
            CrewComplement::TwoPilot => "two pilot",
            CrewComplement::ThreePilot => "three pilot",
            CrewComplement::FourPilot => "four pilot",
        }
    }

    /// True for augmented (relief-crew) operations.
    pub fn is_augmented(&self) -> bool {
        !matches!(self, CrewComplement::TwoPilot)
    }
}

/// In-flight crew rest accommodation class.
///
/// Only a subset is offerable for a given (complement, limit type); see
/// [`crate::rules::valid_rest_facilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestFacilityClass {
    /// No onboard rest facility (unaugmented operations).
    None,
    /// Fully enclosed bunk.
    Class1,
    /// Reclining seat in a separate rest area.
    Class2,
    TwoClass1,
    OneClass1OneClass2,
    TwoClass2,
    /// Seat in the passenger compartment; four-pilot operational only.
    SeatInPassengerCompartment,
}

impl RestFacilityClass {
    pub fn label(&self) -> &'static str {
        match self {
            RestFacilityClass::None => "none",
            RestFacilityClass::Class1 => "class 1",
            RestFacilityClass::Class2 => "class 2",
            RestFacilityClass::TwoClass1 => "two class 1",
            RestFacilityClass::OneClass1OneClass2 => "one class 1 + one class 2",
            RestFacilityClass::TwoClass2 => "two class 2",
            RestFacilityClass::SeatInPassengerCompartment => "seat in passenger compartment",
        }
    }
}

/// Planning limits are the conservative pre-assignment ceilings;
/// operational limits are the higher ceilings permitted once committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitType {
    Planning,
    Operational,
}

/// Derived compliance state for a (current value, ceiling) pair.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    Violation,
}

/// One row of a minimum-rest answer: a duty-length threshold band, the
/// rest it requires, and an optional free-text condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestRequirementRow {
    /// Band label, e.g. `"<=12"` or `">12"`.
    pub duty_band: String,
    pub min_rest_hours: f64,
    pub condition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_date_accepts_bad_input() {
        let json = r#"{"date":"not-a-date","fleet":"B737"}"#;
        let record: DutyRecord = serde_json::from_str(json).unwrap();
        assert!(record.date.is_none());
        assert_eq!(record.sectors, 0);
    }

    #[test]
    fn test_lenient_date_parses_iso() {
        let json = r#"{"date":"2026-03-14","fleet":"B737","sectors":4}"#;
        let record: DutyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.date,
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
        assert_eq!(record.sectors, 4);
    }

    #[test]
    fn test_missing_date_is_none() {
        let json = r#"{"fleet":"B787"}"#;
        let record: DutyRecord = serde_json::from_str(json).unwrap();
        assert!(record.date.is_none());
    }
}
