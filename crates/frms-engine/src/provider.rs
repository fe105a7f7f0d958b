//! Collaborator contracts: duty-record supply and fleet lookup.

use std::collections::HashMap;
use std::future::Future;

use frms_core::models::DutyRecord;
use frms_core::rules::FleetConfig;
use frms_core::FrmsError;

/// Supplies the duty-record snapshot for a pilot on a fleet.
///
/// The fetch is the engine's single upstream suspension point;
/// implementations are expected to be network- or disk-backed. Records
/// may arrive unordered; the engine does not require sorting.
pub trait DutyRecordProvider: Send + Sync {
    fn duty_records(
        &self,
        pilot_id: &str,
        fleet_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<DutyRecord>>> + Send;
}

/// Fleet-id to configuration lookup, seeded with the built-in tables.
///
/// A miss is fatal at the call site: it indicates a programming or data
/// error, not a runtime condition.
#[derive(Debug, Clone)]
pub struct FleetCatalog {
    configs: HashMap<String, FleetConfig>,
}

impl FleetCatalog {
    /// Catalog holding the built-in short-haul and long-haul fleets.
    pub fn builtin() -> Self {
        let mut catalog = Self {
            configs: HashMap::new(),
        };
        catalog.insert(FleetConfig::short_haul());
        catalog.insert(FleetConfig::long_haul());
        catalog
    }

    pub fn insert(&mut self, config: FleetConfig) {
        self.configs.insert(config.fleet_id.clone(), config);
    }

    pub fn get(&self, fleet_id: &str) -> Result<&FleetConfig, FrmsError> {
        self.configs
            .get(fleet_id)
            .ok_or_else(|| FrmsError::UnknownFleet(fleet_id.to_string()))
    }
}

impl Default for FleetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
