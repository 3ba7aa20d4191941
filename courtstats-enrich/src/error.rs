//! Error types for courtstats-enrich
//!
//! Nothing here reaches the enrichment caller: every variant degrades to
//! "value not found" at the fetcher or orchestrator boundary. The variants
//! exist so that boundary can tell an expected absence from a failure when
//! it logs.

use std::time::Duration;
use thiserror::Error;

/// Knowledge base request errors
#[derive(Debug, Error)]
pub enum KbError {
    /// Entity, property or search hit does not exist (expected, frequent)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Server asked for a longer wait than we accept
    #[error("Rate limited: advised wait {advised:?} exceeds ceiling")]
    RateLimited { advised: Duration },

    /// Non-retryable HTTP status
    #[error("Request rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// Every attempt failed with a transient error
    #[error("Failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl KbError {
    /// Expected absence rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, KbError::NotFound(_))
    }
}

/// Transport-level failure (network fault, timeout)
#[derive(Debug, Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

/// Field extraction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No claim, or the knowledge base could not be reached
    #[error("Not found: {0}")]
    NotFound(String),

    /// Claim present but its shape or unit cannot be converted
    #[error("Malformed claim: {0}")]
    Malformed(String),
}

impl From<KbError> for ExtractError {
    fn from(err: KbError) -> Self {
        ExtractError::NotFound(err.to_string())
    }
}
