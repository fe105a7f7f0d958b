pub mod aggregate;
pub mod band;
pub mod compliance;
pub mod disruption;
pub mod error;
pub mod long_haul;
pub mod mbtt;
pub mod models;
pub mod rest;
pub mod rules;
pub mod short_haul;

pub use aggregate::{aggregate, ConsecutiveCounters, CumulativeTotals, WindowTotal};
pub use band::{find_band, Band};
pub use compliance::classify;
pub use disruption::{disruption_rest, DisruptionClause, DisruptionRestResult};
pub use error::FrmsError;
pub use long_haul::{LongHaulNextDuty, LongHaulScenario, ResolvedLimitRow};
pub use mbtt::{minimum_base_turnaround, CreditedHoursCategory, DaysAwayCategory, MbttResult};
pub use models::{
    ComplianceStatus, CrewComplement, DutyRecord, LimitType, RestFacilityClass,
    RestRequirementRow,
};
pub use rest::{expected_duty_bands, post_duty_rest, pre_duty_rest, DutyBand};
pub use rules::{
    valid_rest_facilities, FleetCategory, FleetConfig, FleetRules, LongHaulLimitRow,
    ShortHaulRules,
};
pub use short_haul::{BackOfClockRestriction, LateNightStatus, ShortHaulNextDuty};
