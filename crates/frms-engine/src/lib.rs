//! FRMS evaluation facade.
//!
//! Wires an async duty-record provider and a fleet catalog into the pure
//! calculators in `frms-core`. The engine performs no I/O of its own and
//! never mutates its inputs; every call works on the snapshot fetched for
//! that call.

mod engine;
mod error;
mod provider;
pub mod telemetry;

pub use engine::FrmsEngine;
pub use error::EngineError;
pub use provider::{DutyRecordProvider, FleetCatalog};
