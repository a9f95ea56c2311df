//! Error taxonomy for the resolution engine.
//!
//! Malformed license expressions are not errors: the parser recovers them into
//! [`LicenseExpression::Invalid`](crate::license::LicenseExpression::Invalid).
//! Unresolved components are not errors either; they are a normal outcome
//! reported through [`Status::Unresolved`](crate::models::Status::Unresolved).

use std::time::Duration;

use thiserror::Error;

use crate::models::LicenseMap;

/// A programmer error in the arguments handed to the engine. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid argument: {0}")]
pub struct InvalidArgument(pub String);

/// Failure talking to a license data provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider answered with HTTP status {code}")]
    Status { code: u16 },

    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("could not decode provider response: {0}")]
    Decode(String),
}

/// Failure of a whole resolution run.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// Raised only in fail-fast mode. `partial` holds every requested id with
    /// whatever observations were merged before the failure.
    #[error("license data provider `{provider}` is unavailable: {source}")]
    ProviderUnavailable {
        provider: String,
        #[source]
        source: ProviderError,
        partial: LicenseMap,
    },
}
