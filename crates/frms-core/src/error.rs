//! Typed error conditions for the rule engine.

use crate::models::{CrewComplement, LimitType, RestFacilityClass};
use crate::rules::FleetCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrmsError {
    /// No fleet configuration for the given identifier. Fatal at the call
    /// site: it indicates a programming/data error, not a runtime state.
    #[error("no fleet configuration for '{0}'")]
    UnknownFleet(String),

    /// A calculator for one fleet category was called with the other's
    /// configuration.
    #[error("fleet '{fleet_id}' is not a {expected:?} fleet")]
    CategoryMismatch {
        fleet_id: String,
        expected: FleetCategory,
    },

    /// The rest facility is not offerable for this complement and limit
    /// type; the combination must be rejected, not silently accepted.
    #[error("rest facility '{}' is not available for {} {:?} limits", .facility.label(), .crew.label(), .limit)]
    InvalidRestFacility {
        crew: CrewComplement,
        facility: RestFacilityClass,
        limit: LimitType,
    },
}
