//! Engine-level error type.

use frms_core::FrmsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Rules(#[from] FrmsError),

    #[error("duty record provider failed: {0}")]
    Provider(#[source] anyhow::Error),
}
